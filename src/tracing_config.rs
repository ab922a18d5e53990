//! Tracing configuration for debugging stub resolution.
//!
//! Supports three output formats controlled by `PYI_LOG_FORMAT`:
//!
//! - `text` (default): Standard `tracing-subscriber` flat output
//! - `tree`: Hierarchical indented output via `tracing-tree`; each query
//!   span nests the locator, overload and deepening events it caused
//! - `json`: One JSON object per span/event, for tooling
//!
//! ## Quick start
//!
//! ```bash
//! # Which stub did each query land on?
//! PYI_LOG=pyi_checker=debug PYI_LOG_FORMAT=tree my-analyzer src/
//!
//! # Everything, including every evaluated type
//! PYI_LOG=trace PYI_LOG_FORMAT=json my-analyzer src/
//! ```
//!
//! The subscriber is only initialised when `PYI_LOG` (or `RUST_LOG`) is set,
//! so hosts that never opt in pay nothing.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

const LOG_ENV: &str = "PYI_LOG";
const LOG_FORMAT_ENV: &str = "PYI_LOG_FORMAT";

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Standard flat text lines (default).
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name; anything unrecognised is `Text`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var(LOG_FORMAT_ENV).unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `PYI_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var(LOG_ENV) {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `PYI_LOG` nor `RUST_LOG` is set, or when the
/// host already installed a global subscriber. Output goes to stderr.
pub fn init_tracing() {
    if std::env::var(LOG_ENV).is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    let format = LogFormat::from_env();

    let installed = match format {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init()
        }
        LogFormat::Text => {
            let text_layer = fmt::layer().with_writer(std::io::stderr);
            Registry::default().with(filter).with(text_layer).try_init()
        }
    };

    if installed.is_ok() {
        tracing::debug!(?format, "pyi tracing initialised");
    }
}
