//! Common types and utilities for the pyi stub type provider.
//!
//! This crate provides foundational types used across all pyi crates:
//! - String interning (`Atom`, `Interner`)
//! - Tree-walk and evaluation limits

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Centralized limits and thresholds
pub mod limits;
