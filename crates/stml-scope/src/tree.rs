use std::collections::BTreeMap;

use stml_core::{FieldPolicy, StmlError};

/// Index of a node in its [`ScopeTree`]. Ids are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    pub const ROOT: ScopeId = ScopeId(0);

    pub fn index(self) -> usize {
        self.0
    }
}

/// What a key of a scope holds.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry<V> {
    Value(V),
    Scope(ScopeId),
}

impl<V> Entry<V> {
    pub fn as_scope(&self) -> Option<ScopeId> {
        match self {
            Self::Scope(id) => Some(*id),
            Self::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&V> {
        match self {
            Self::Value(value) => Some(value),
            Self::Scope(_) => None,
        }
    }
}

/// One namespace level.
///
/// Besides its named entries a node always carries its own policy and the
/// ordered list of anonymous children appended to it. Neither can collide
/// with a user key.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeNode<V> {
    id: ScopeId,
    parent: Option<ScopeId>,
    policy: FieldPolicy,
    entries: BTreeMap<String, Entry<V>>,
    appended: Vec<ScopeId>,
}

impl<V> ScopeNode<V> {
    fn new(id: ScopeId, parent: Option<ScopeId>, policy: FieldPolicy) -> Self {
        Self {
            id,
            parent,
            policy,
            entries: BTreeMap::new(),
            appended: Vec::new(),
        }
    }

    pub fn id(&self) -> ScopeId {
        self.id
    }

    /// Back-link used for lookups only; the parent owns this node, not the
    /// other way round.
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn policy(&self) -> FieldPolicy {
        self.policy
    }

    pub fn get(&self, key: &str) -> Option<&Entry<V>> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &Entry<V>)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn appended(&self) -> &[ScopeId] {
        &self.appended
    }
}

/// Arena owning every node of one document.
#[derive(Debug, Clone)]
pub struct ScopeTree<V> {
    nodes: Vec<ScopeNode<V>>,
}

impl<V> ScopeTree<V> {
    pub fn new(root_policy: FieldPolicy) -> Self {
        Self {
            nodes: vec![ScopeNode::new(ScopeId::ROOT, None, root_policy)],
        }
    }

    pub fn root(&self) -> &ScopeNode<V> {
        &self.nodes[ScopeId::ROOT.0]
    }

    /// Number of nodes ever created, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: ScopeId) -> Result<&ScopeNode<V>, StmlError> {
        self.nodes.get(id.0).ok_or_else(|| stale_id(id))
    }

    fn node_mut(&mut self, id: ScopeId) -> Result<&mut ScopeNode<V>, StmlError> {
        self.nodes.get_mut(id.0).ok_or_else(|| stale_id(id))
    }

    pub(crate) fn create_child(&mut self, parent: ScopeId) -> Result<ScopeId, StmlError> {
        self.node(parent)?;
        let id = ScopeId(self.nodes.len());
        self.nodes
            .push(ScopeNode::new(id, Some(parent), FieldPolicy::Default));
        Ok(id)
    }

    pub(crate) fn set_policy(&mut self, id: ScopeId, policy: FieldPolicy) -> Result<(), StmlError> {
        self.node_mut(id)?.policy = policy;
        Ok(())
    }

    /// Stores `entry` under `key`, returning the previous occupant. Policy
    /// checks are the caller's job.
    pub(crate) fn insert_entry(
        &mut self,
        id: ScopeId,
        key: &str,
        entry: Entry<V>,
    ) -> Result<Option<Entry<V>>, StmlError> {
        Ok(self.node_mut(id)?.entries.insert(key.to_string(), entry))
    }

    /// Appends `child` to its parent's anonymous list unless it is already
    /// there. Returns whether the list changed.
    pub(crate) fn commit_appended(&mut self, child: ScopeId) -> Result<bool, StmlError> {
        let parent = self.node(child)?.parent.ok_or_else(|| {
            StmlError::violation(
                "SCOPE_CONSISTENCY",
                "The root scope cannot be appended to a parent.",
            )
        })?;
        let list = &mut self.node_mut(parent)?.appended;
        if list.contains(&child) {
            return Ok(false);
        }
        list.push(child);
        Ok(true)
    }

    /// Human readable address of a node, rebuilt from the parent links.
    /// Nodes no longer reachable from the root are rendered as `<detached>`.
    pub fn describe(&self, id: ScopeId) -> String {
        let mut parts = Vec::new();
        let mut current = id;
        loop {
            let Ok(node) = self.node(current) else {
                return "<detached>".to_string();
            };
            let Some(parent_id) = node.parent else {
                break;
            };
            let Ok(parent) = self.node(parent_id) else {
                return "<detached>".to_string();
            };
            if let Some((key, _)) = parent
                .entries
                .iter()
                .find(|(_, entry)| entry.as_scope() == Some(current))
            {
                parts.push(render_key(key));
            } else if let Some(position) = parent.appended.iter().position(|child| *child == current)
            {
                parts.push(format!("[{}]", position));
            } else {
                return "<detached>".to_string();
            }
            current = parent_id;
        }

        let mut out = String::new();
        for part in parts.iter().rev() {
            if !out.is_empty() && !part.starts_with('[') {
                out.push('.');
            }
            out.push_str(part);
        }
        out
    }
}

impl<V> Default for ScopeTree<V> {
    fn default() -> Self {
        Self::new(FieldPolicy::Default)
    }
}

fn render_key(key: &str) -> String {
    if key.chars().any(|ch| matches!(ch, '.' | ' ' | '[' | ']' | '\'' | '"')) {
        if key.contains('\'') {
            format!("\"{}\"", key)
        } else {
            format!("'{}'", key)
        }
    } else {
        key.to_string()
    }
}

fn stale_id(id: ScopeId) -> StmlError {
    StmlError::violation(
        "SCOPE_CONSISTENCY",
        format!("Scope id {} does not belong to this tree.", id.0),
    )
}
