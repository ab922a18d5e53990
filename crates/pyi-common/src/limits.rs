//! Centralized limits and thresholds.
//!
//! Declaration trees and stub trees are caller-supplied snapshots, so every
//! walk over them is bounded. A corrupted tree (for example a parent cycle)
//! must terminate instead of spinning.

/// Maximum number of parent hops when walking from a declaration up to its
/// owning module.
///
/// Real Python code rarely nests classes more than a handful of levels deep;
/// hitting this limit means the parent links form a cycle.
pub const MAX_TREE_WALK_ITERATIONS: usize = 10_000;

/// Maximum depth when walking an initializer expression in a deep context.
///
/// ```python
/// a = b
/// b = c
/// c = a   # reference cycle, stops here
/// ```
pub const MAX_INITIALIZER_DEPTH: u32 = 64;

/// Maximum depth when converting a type annotation into a type.
pub const MAX_ANNOTATION_DEPTH: u32 = 128;

/// Maximum number of members collected for one overload group during a
/// class-body scan. Reaching it ends the scan early; the members gathered so
/// far are still used.
pub const MAX_OVERLOAD_GROUP_SIZE: usize = 256;
