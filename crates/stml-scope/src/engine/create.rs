use super::*;

impl<V> ScopeEngine<V> {
    /// Creates the scope at `name`, or opens a new anonymous scope when the
    /// address ends with a dot.
    ///
    /// Existing scopes on the way are reused. A value in the way is replaced
    /// by a scope unless the scope holding it is final.
    pub fn create_named_scope(&mut self, name: &str) -> Result<(), StmlError> {
        let (normalized, mut segments) = self.parse_name(name)?;
        let anonymous = matches!(segments.last(), Some(Segment::Anonymous));
        if anonymous {
            segments.pop();
        }

        let reenter = anonymous && {
            let open_parent = self.cursor.parent(&self.tree)?;
            open_parent.is_some() && open_parent == self.peek_scope(&segments)
        };
        if !reenter {
            self.pop_anonymous()?;
        }
        // Remembered before the walk, so a rejected walk still moves the
        // shorthand base.
        self.current_content = content_segments(&normalized);

        if !anonymous {
            let id = self.walk_create(&segments, &mut Vec::new())?;
            log::debug!("created named scope \"{}\"", self.tree.describe(id));
            return Ok(());
        }

        if reenter {
            self.cursor.reenter(&mut self.tree)?;
        } else {
            let mut parent_path = Vec::with_capacity(segments.len());
            self.walk_create(&segments, &mut parent_path)?;
            self.cursor.enter(&mut self.tree, parent_path)?;
        }
        self.was_using_array = true;
        Ok(())
    }

    /// Walks `segments` from the root, creating missing named scopes, and
    /// records the steps taken.
    pub(super) fn walk_create(
        &mut self,
        segments: &[Segment],
        steps: &mut Vec<CursorStep>,
    ) -> Result<ScopeId, StmlError> {
        let mut current = ScopeId::ROOT;
        for segment in segments {
            match segment {
                Segment::Key(key) => {
                    current = self.child_scope(current, key)?;
                    steps.push(CursorStep::Key(key.clone()));
                }
                Segment::Index { key, index } => {
                    if let Some(key) = key {
                        current = self.existing_child_scope(current, key, *index)?;
                        steps.push(CursorStep::Key(key.clone()));
                    }
                    current = self.appended_scope(current, *index)?;
                    steps.push(CursorStep::Index(*index));
                }
                Segment::Anonymous => {
                    return Err(StmlError::malformed(
                        "NAME_ANONYMOUS_TARGET",
                        "An anonymous marker can only end an address.",
                    ));
                }
            }
        }
        Ok(current)
    }

    fn child_scope(&mut self, containing: ScopeId, key: &str) -> Result<ScopeId, StmlError> {
        let node = self.tree.node(containing)?;
        match node.get(key) {
            Some(Entry::Scope(id)) => return Ok(*id),
            Some(Entry::Value(_)) if node.policy().is_final() => {
                return Err(StmlError::violation(
                    "SCOPE_FINAL_OVERRIDE",
                    format!(
                        "Cannot replace value \"{}\" with a scope in final scope \"{}\".",
                        key,
                        self.tree.describe(containing)
                    ),
                ));
            }
            None if node.policy().is_closed() => {
                return Err(StmlError::violation(
                    "SCOPE_CLOSED_ADD",
                    format!(
                        "Cannot add scope \"{}\" to closed scope \"{}\".",
                        key,
                        self.tree.describe(containing)
                    ),
                ));
            }
            _ => {}
        }

        let child = self.tree.create_child(containing)?;
        self.tree
            .insert_entry(containing, key, Entry::Scope(child))?;
        Ok(child)
    }

    fn existing_child_scope(
        &self,
        containing: ScopeId,
        key: &str,
        index: usize,
    ) -> Result<ScopeId, StmlError> {
        match self.tree.node(containing)?.get(key) {
            Some(Entry::Scope(id)) => Ok(*id),
            Some(Entry::Value(_)) => Err(StmlError::violation(
                "SCOPE_NOT_A_SCOPE",
                format!("Cannot index value \"{}\" with [{}].", key, index),
            )),
            None => Err(StmlError::violation(
                "SCOPE_INDEX_OUT_OF_RANGE",
                format!(
                    "Scope \"{}\" has no anonymous scopes under \"{}\".",
                    self.tree.describe(containing),
                    key
                ),
            )),
        }
    }

    fn appended_scope(&self, containing: ScopeId, index: usize) -> Result<ScopeId, StmlError> {
        let node = self.tree.node(containing)?;
        node.appended().get(index).copied().ok_or_else(|| {
            StmlError::violation(
                "SCOPE_INDEX_OUT_OF_RANGE",
                format!(
                    "Index {} is out of range for \"{}\" with {} anonymous scope(s).",
                    index,
                    self.tree.describe(containing),
                    node.appended().len()
                ),
            )
        })
    }

    /// Resolves `segments` to an existing scope without touching the tree.
    pub(super) fn peek_scope(&self, segments: &[Segment]) -> Option<ScopeId> {
        let mut current = ScopeId::ROOT;
        for segment in segments {
            let node = self.tree.node(current).ok()?;
            current = match segment {
                Segment::Key(key) => node.get(key)?.as_scope()?,
                Segment::Index { key, index } => {
                    let list_owner = match key {
                        Some(key) => self.tree.node(node.get(key)?.as_scope()?).ok()?,
                        None => node,
                    };
                    list_owner.appended().get(*index).copied()?
                }
                Segment::Anonymous => return None,
            };
        }
        Some(current)
    }
}
