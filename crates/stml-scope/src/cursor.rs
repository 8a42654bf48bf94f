use stml_core::StmlError;

use crate::tree::{ScopeId, ScopeTree};

/// One step of a path from the root: a named child or an appended child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorStep {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CursorPosition {
    #[default]
    Global,
    /// `node` is the open anonymous scope; it joins the append list of the
    /// scope at `parent_path` when the cursor leaves it.
    Anonymous {
        parent_path: Vec<CursorStep>,
        node: ScopeId,
    },
}

/// Tracks where the next anonymous append happens.
///
/// The cursor never holds a reference into the tree. It stores the parent's
/// path and re-resolves it on every access, so a parent replaced behind its
/// back shows up as a `SCOPE_CONSISTENCY` error instead of a silent write
/// into a detached scope.
#[derive(Debug, Clone, Default)]
pub struct ScopeCursor {
    position: CursorPosition,
}

impl ScopeCursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> &CursorPosition {
        &self.position
    }

    pub fn is_global(&self) -> bool {
        matches!(self.position, CursorPosition::Global)
    }

    pub fn parent_path(&self) -> Option<&[CursorStep]> {
        match &self.position {
            CursorPosition::Global => None,
            CursorPosition::Anonymous { parent_path, .. } => Some(parent_path),
        }
    }

    /// Opens a new anonymous child under the scope at `parent_path`.
    pub fn enter<V>(
        &mut self,
        tree: &mut ScopeTree<V>,
        parent_path: Vec<CursorStep>,
    ) -> Result<ScopeId, StmlError> {
        if !self.is_global() {
            return Err(StmlError::violation(
                "SCOPE_CONSISTENCY",
                "Cannot enter an anonymous scope while another one is open.",
            ));
        }
        let parent = resolve_path(tree, &parent_path)?;
        ensure_open(tree, parent)?;
        let node = tree.create_child(parent)?;
        log::debug!(
            "entered anonymous scope under \"{}\"",
            tree.describe(parent)
        );
        self.position = CursorPosition::Anonymous { parent_path, node };
        Ok(node)
    }

    /// Commits the open anonymous scope to its parent's append list and opens
    /// a fresh sibling. Leaves the cursor unchanged when it fails.
    pub fn reenter<V>(&mut self, tree: &mut ScopeTree<V>) -> Result<ScopeId, StmlError> {
        let CursorPosition::Anonymous { parent_path, node } = &self.position else {
            return Err(StmlError::violation(
                "SCOPE_CONSISTENCY",
                "Cannot reenter an anonymous scope from the global position.",
            ));
        };
        let parent = resolve_parent(tree, parent_path, *node)?;
        ensure_open(tree, parent)?;
        tree.commit_appended(*node)?;
        let fresh = tree.create_child(parent)?;
        log::debug!(
            "reentered anonymous scope under \"{}\", {} entries appended",
            tree.describe(parent),
            tree.node(parent)?.appended().len()
        );
        let parent_path = parent_path.clone();
        self.position = CursorPosition::Anonymous {
            parent_path,
            node: fresh,
        };
        Ok(fresh)
    }

    /// Commits the open anonymous scope, if any, and returns to the root.
    pub fn pop<V>(&mut self, tree: &mut ScopeTree<V>) -> Result<Option<ScopeId>, StmlError> {
        let CursorPosition::Anonymous { parent_path, node } = &self.position else {
            return Ok(None);
        };
        let node = *node;
        resolve_parent(tree, parent_path, node)?;
        tree.commit_appended(node)?;
        log::debug!("popped anonymous scope \"{}\"", tree.describe(node));
        self.to_root();
        Ok(Some(node))
    }

    /// Drops the anonymous position without committing it.
    pub fn to_root(&mut self) {
        self.position = CursorPosition::Global;
    }

    /// Scope the cursor currently addresses.
    pub fn current<V>(&self, tree: &ScopeTree<V>) -> Result<ScopeId, StmlError> {
        match &self.position {
            CursorPosition::Global => Ok(ScopeId::ROOT),
            CursorPosition::Anonymous { parent_path, node } => {
                resolve_parent(tree, parent_path, *node)?;
                Ok(*node)
            }
        }
    }

    /// Parent of the open anonymous scope; `None` at the global position.
    pub fn parent<V>(&self, tree: &ScopeTree<V>) -> Result<Option<ScopeId>, StmlError> {
        match &self.position {
            CursorPosition::Global => Ok(None),
            CursorPosition::Anonymous { parent_path, node } => {
                resolve_parent(tree, parent_path, *node).map(Some)
            }
        }
    }
}

fn resolve_parent<V>(
    tree: &ScopeTree<V>,
    parent_path: &[CursorStep],
    node: ScopeId,
) -> Result<ScopeId, StmlError> {
    let parent = resolve_path(tree, parent_path)?;
    if tree.node(node)?.parent() != Some(parent) {
        return Err(StmlError::violation(
            "SCOPE_CONSISTENCY",
            format!(
                "Anonymous scope no longer belongs to \"{}\".",
                tree.describe(parent)
            ),
        ));
    }
    Ok(parent)
}

pub(crate) fn resolve_path<V>(
    tree: &ScopeTree<V>,
    path: &[CursorStep],
) -> Result<ScopeId, StmlError> {
    let mut current = ScopeId::ROOT;
    for step in path {
        let node = tree.node(current)?;
        let next = match step {
            CursorStep::Key(key) => node.get(key).and_then(|entry| entry.as_scope()),
            CursorStep::Index(index) => node.appended().get(*index).copied(),
        };
        current = next.ok_or_else(|| {
            StmlError::violation(
                "SCOPE_CONSISTENCY",
                format!(
                    "Cursor path step {:?} under \"{}\" no longer leads to a scope.",
                    step,
                    tree.describe(current)
                ),
            )
        })?;
    }
    Ok(current)
}

fn ensure_open<V>(tree: &ScopeTree<V>, parent: ScopeId) -> Result<(), StmlError> {
    if tree.node(parent)?.policy().is_closed() {
        return Err(StmlError::violation(
            "SCOPE_CLOSED_ADD",
            format!(
                "Cannot append an anonymous scope to closed scope \"{}\".",
                tree.describe(parent)
            ),
        ));
    }
    Ok(())
}
