//! Source file snapshots.

use crate::node_arena::NodeArena;

/// One parsed file: a real module (`m.py`) or an interface stub (`m.pyi`).
#[derive(Clone, Debug)]
pub struct SourceFile {
    pub path: String,
    pub is_stub: bool,
    pub arena: NodeArena,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, is_stub: bool, arena: NodeArena) -> Self {
        Self {
            path: path.into(),
            is_stub,
            arena,
        }
    }

    /// Path with the `.py` / `.pyi` extension removed.
    ///
    /// `pkg/mod.py` and `pkg/mod.pyi` share the stem `pkg/mod`, which is how
    /// real modules are paired with their stubs when no explicit association
    /// exists.
    pub fn module_stem(&self) -> &str {
        self.path
            .strip_suffix(".pyi")
            .or_else(|| self.path.strip_suffix(".py"))
            .unwrap_or(&self.path)
    }
}
