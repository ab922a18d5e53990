//! Stub association index.
//!
//! `StubIndex` is the narrow view the provider has of the host's file index:
//! which stub belongs to a real file, and which declarations a scope owns
//! under a given name. `Program` is an in-memory implementation over
//! `SourceFile` snapshots.

use crate::error::{ProviderError, Result};
use pyi_common::{Atom, Interner};
use pyi_syntax::{FileId, Node, NodeArena, NodeRef, SourceFile};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use std::sync::Arc;
use tracing::{debug, trace};

/// Declarations found under one name; almost always zero or one, more for
/// overload groups.
pub type NameMatches = SmallVec<[NodeRef; 2]>;

pub trait StubIndex: Sync {
    /// The snapshot registered under `id`.
    fn file(&self, id: FileId) -> Option<&SourceFile>;

    /// The stub file associated with a real file, if any.
    fn associated_stub(&self, file: FileId) -> Option<FileId>;

    /// Declarations directly owned by `scope` and named `name`, in
    /// declaration order.
    fn find_by_name(&self, scope: NodeRef, name: Atom) -> NameMatches {
        self.file(scope.file)
            .map(|file| {
                file.arena
                    .children_named(scope.node, name)
                    .map(|node| scope.sibling(node))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// The arena holding `file`, or `UnknownFile`.
pub(crate) fn arena_of<I: StubIndex + ?Sized>(index: &I, file: FileId) -> Result<&NodeArena> {
    index
        .file(file)
        .map(|f| &f.arena)
        .ok_or(ProviderError::UnknownFile(file))
}

/// The node behind a handle, or `UnknownFile` / `DanglingNode`.
pub(crate) fn node_of<I: StubIndex + ?Sized>(index: &I, decl: NodeRef) -> Result<&Node> {
    arena_of(index, decl.file)?
        .get(decl.node)
        .ok_or(ProviderError::DanglingNode {
            file: decl.file,
            node: decl.node,
        })
}

// =============================================================================
// Program
// =============================================================================

/// In-memory stub index over a set of source files.
///
/// All files must be built with the same string interner, which the program
/// also hands to the type interner so that names in trees and in types are
/// the same atoms.
pub struct Program {
    strings: Arc<Interner>,
    files: Vec<SourceFile>,
    stubs: FxHashMap<FileId, FileId>,
}

impl Program {
    pub fn new(strings: Arc<Interner>) -> Self {
        Self {
            strings,
            files: Vec::new(),
            stubs: FxHashMap::default(),
        }
    }

    pub fn strings(&self) -> &Arc<Interner> {
        &self.strings
    }

    pub fn add_file(&mut self, file: SourceFile) -> FileId {
        let id = FileId(self.files.len() as u32);
        trace!(file = id.0, path = %file.path, is_stub = file.is_stub, "Program::add_file");
        self.files.push(file);
        id
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn files(&self) -> impl Iterator<Item = (FileId, &SourceFile)> {
        self.files
            .iter()
            .enumerate()
            .map(|(i, file)| (FileId(i as u32), file))
    }

    pub fn find_file(&self, path: &str) -> Option<FileId> {
        self.files().find(|(_, f)| f.path == path).map(|(id, _)| id)
    }

    /// Associate a real file with its stub, replacing any earlier pairing.
    pub fn associate(&mut self, real: FileId, stub: FileId) -> Result<()> {
        if self.file(real).is_none() {
            return Err(ProviderError::UnknownFile(real));
        }
        match self.file(stub) {
            None => return Err(ProviderError::UnknownFile(stub)),
            Some(f) if !f.is_stub => return Err(ProviderError::NotAStub(stub)),
            Some(_) => {}
        }
        self.stubs.insert(real, stub);
        Ok(())
    }

    /// Pair every real file with the stub sharing its module stem
    /// (`pkg/m.py` with `pkg/m.pyi`). Explicit associations are kept.
    ///
    /// Returns the number of new pairings.
    pub fn associate_by_path(&mut self) -> usize {
        let stubs_by_stem: FxHashMap<&str, FileId> = self
            .files()
            .filter(|(_, f)| f.is_stub)
            .map(|(id, f)| (f.module_stem(), id))
            .collect();

        let pairs: Vec<(FileId, FileId)> = self
            .files()
            .filter(|(id, f)| !f.is_stub && !self.stubs.contains_key(id))
            .filter_map(|(id, f)| stubs_by_stem.get(f.module_stem()).map(|&stub| (id, stub)))
            .collect();

        for &(real, stub) in &pairs {
            debug!(real = real.0, stub = stub.0, "Program::associate_by_path");
            self.stubs.insert(real, stub);
        }
        pairs.len()
    }
}

impl StubIndex for Program {
    fn file(&self, id: FileId) -> Option<&SourceFile> {
        self.files.get(id.0 as usize)
    }

    fn associated_stub(&self, file: FileId) -> Option<FileId> {
        self.stubs.get(&file).copied()
    }
}

#[cfg(test)]
#[path = "../tests/stub_index_tests.rs"]
mod tests;
