use super::*;

impl<V> ScopeEngine<V> {
    /// Resolves `name` to a value or a scope.
    ///
    /// The walk stops at the first value it meets, so segments past a value
    /// are ignored. Anonymous scopes are reachable by index only.
    pub fn look_up(&mut self, name: &str) -> Result<Lookup<'_, V>, StmlError> {
        let (normalized, segments) = self.parse_name(name)?;
        if matches!(segments.last(), Some(Segment::Anonymous)) {
            return Err(anonymous_target(&normalized));
        }
        self.pop_anonymous()?;

        let tree = &self.tree;
        let mut current = ScopeId::ROOT;
        for segment in &segments {
            let node = tree.node(current)?;
            match segment {
                Segment::Key(key) => match node.get(key) {
                    Some(Entry::Scope(id)) => current = *id,
                    Some(Entry::Value(value)) => return Ok(Lookup::Value(value)),
                    None => return Ok(Lookup::NotFound),
                },
                Segment::Index { key, index } => {
                    let owner = match key {
                        None => node,
                        Some(key) => match node.get(key) {
                            Some(Entry::Scope(id)) => tree.node(*id)?,
                            Some(Entry::Value(_)) => {
                                return Err(StmlError::violation(
                                    "SCOPE_NOT_A_SCOPE",
                                    format!(
                                        "Cannot index value \"{}\" in \"{}\".",
                                        key, normalized
                                    ),
                                ));
                            }
                            None => return Ok(Lookup::NotFound),
                        },
                    };
                    match owner.appended().get(*index) {
                        Some(id) => current = *id,
                        None => return Ok(Lookup::NotFound),
                    }
                }
                Segment::Anonymous => return Err(anonymous_target(&normalized)),
            }
        }
        Ok(Lookup::Scope(tree.node(current)?))
    }
}

pub(super) fn anonymous_target(normalized: &str) -> StmlError {
    StmlError::malformed(
        "NAME_ANONYMOUS_TARGET",
        format!(
            "Address \"{}\" ends with an anonymous marker; anonymous scopes are addressed by index.",
            normalized
        ),
    )
}
