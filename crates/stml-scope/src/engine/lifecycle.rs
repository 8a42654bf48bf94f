use super::*;

#[derive(Debug, Clone, Default)]
pub struct ScopeEngineOptions {
    /// Policy of the root scope.
    pub root_policy: FieldPolicy,
    /// Raw segments remembered for shorthand dots before the first named
    /// scope is created.
    pub initial_content: Vec<String>,
}

/// Result of [`ScopeEngine::look_up`].
#[derive(Debug)]
pub enum Lookup<'a, V> {
    Value(&'a V),
    Scope(&'a ScopeNode<V>),
    NotFound,
}

impl<'a, V> Lookup<'a, V> {
    pub fn value(&self) -> Option<&'a V> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn scope(&self) -> Option<&'a ScopeNode<V>> {
        match self {
            Self::Scope(node) => Some(node),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        !matches!(self, Self::NotFound)
    }
}

/// Hierarchical namespace of one STML document.
///
/// Named scopes are addressed by dotted paths, anonymous scopes are appended
/// to their parent's list and read back by index. Every scope carries a
/// [`FieldPolicy`] that is consulted before any write. Named operations pop
/// the open anonymous scope first; `assign_local` and the no-argument policy
/// operations act on it instead.
#[derive(Debug, Clone)]
pub struct ScopeEngine<V> {
    pub(super) tree: ScopeTree<V>,
    pub(super) cursor: ScopeCursor,
    pub(super) current_content: Vec<String>,
    pub(super) was_using_array: bool,
}

impl<V> ScopeEngine<V> {
    pub fn new() -> Self {
        Self::with_options(ScopeEngineOptions::default())
    }

    pub fn with_options(options: ScopeEngineOptions) -> Self {
        Self {
            tree: ScopeTree::new(options.root_policy),
            cursor: ScopeCursor::new(),
            current_content: options.initial_content,
            was_using_array: false,
        }
    }

    pub fn tree(&self) -> &ScopeTree<V> {
        &self.tree
    }

    pub fn root(&self) -> &ScopeNode<V> {
        self.tree.root()
    }

    pub fn cursor(&self) -> &ScopeCursor {
        &self.cursor
    }

    /// Raw segments of the last named scope address.
    pub fn current_content(&self) -> &[String] {
        &self.current_content
    }

    pub fn is_using_array(&self) -> bool {
        self.was_using_array
    }

    pub fn describe(&self, id: ScopeId) -> String {
        self.tree.describe(id)
    }

    /// Commits the open anonymous scope, if any, to its parent and moves the
    /// cursor back to the root. Hosts call this at the end of a document.
    pub fn pop_anonymous(&mut self) -> Result<(), StmlError> {
        self.cursor.pop(&mut self.tree)?;
        self.was_using_array = false;
        Ok(())
    }

    pub(super) fn parse_name(&self, name: &str) -> Result<(String, Vec<Segment>), StmlError> {
        let normalized = normalize_name(name, &self.current_content)?;
        let segments = parse_path(&normalized)?;
        Ok((normalized, segments))
    }

    /// Scope addressed by the cursor: the root or the open anonymous scope.
    pub(super) fn cursor_scope(&self) -> Result<ScopeId, StmlError> {
        self.cursor.current(&self.tree)
    }
}

impl<V> Default for ScopeEngine<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod lifecycle_tests {
    use super::*;
    use super::engine_test_support::*;

    #[test]
    fn new_engine_starts_global_with_default_root() {
        let engine = engine();
        assert!(engine.cursor().is_global());
        assert!(!engine.is_using_array());
        assert!(engine.current_content().is_empty());
        assert_eq!(engine.root().policy(), FieldPolicy::Default);
        assert_eq!(engine.tree().len(), 1);
    }

    #[test]
    fn options_set_root_policy_and_remembered_segments() {
        let mut engine: ScopeEngine<i64> = ScopeEngine::with_options(ScopeEngineOptions {
            root_policy: FieldPolicy::Closed,
            initial_content: vec!["x".to_string()],
        });
        assert_eq!(engine.root().policy(), FieldPolicy::Closed);
        assert_eq!(engine.current_content(), ["x".to_string()]);
        assert_eq!(
            engine.current_policy(None).expect("root policy"),
            FieldPolicy::Closed
        );
    }

    #[test]
    fn pop_anonymous_is_a_noop_at_global_position() {
        let mut engine = engine();
        engine.pop_anonymous().expect("pop");
        assert!(engine.cursor().is_global());
        assert!(engine.root().appended().is_empty());
    }

    #[test]
    fn pop_anonymous_commits_the_open_entry() {
        let mut engine = engine();
        engine.create_named_scope("items.").expect("anonymous");
        assert!(engine.is_using_array());
        assert!(!engine.cursor().is_global());
        assert_eq!(engine.current_content(), ["items".to_string()]);

        engine.pop_anonymous().expect("pop");
        assert!(!engine.is_using_array());
        assert!(engine.cursor().is_global());
        assert!(is_scope_at(&mut engine, "items[0]"));
    }

    #[test]
    fn lookup_helpers_report_kind() {
        let mut engine = engine();
        engine.assign("k", 4).expect("assign");
        let found = engine.look_up("k").expect("lookup");
        assert!(found.is_found());
        assert_eq!(found.value(), Some(&4));
        assert!(found.scope().is_none());
        assert!(!engine.look_up("missing").expect("lookup").is_found());
    }
}
