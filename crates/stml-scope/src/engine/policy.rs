use super::*;

impl<V> ScopeEngine<V> {
    /// Forbids overwriting entries of the target scope. `None` targets the
    /// cursor's scope.
    pub fn finalize(&mut self, name: Option<&str>) -> Result<(), StmlError> {
        self.transition(name, FieldPolicy::finalized)
    }

    /// Forbids adding entries to the target scope. `None` targets the
    /// cursor's scope.
    pub fn close(&mut self, name: Option<&str>) -> Result<(), StmlError> {
        self.transition(name, FieldPolicy::closed)
    }

    pub fn current_policy(&mut self, name: Option<&str>) -> Result<FieldPolicy, StmlError> {
        let target = self.policy_target(name)?;
        Ok(self.tree.node(target)?.policy())
    }

    fn transition(
        &mut self,
        name: Option<&str>,
        step: fn(FieldPolicy) -> FieldPolicy,
    ) -> Result<(), StmlError> {
        let target = self.policy_target(name)?;
        let before = self.tree.node(target)?.policy();
        let after = step(before);
        self.tree.set_policy(target, after)?;
        if before != after {
            log::debug!(
                "scope \"{}\" policy {} -> {}",
                self.tree.describe(target),
                before,
                after
            );
        }
        Ok(())
    }

    fn policy_target(&mut self, name: Option<&str>) -> Result<ScopeId, StmlError> {
        let Some(name) = name else {
            return self.cursor_scope();
        };
        match self.look_up(name)? {
            Lookup::Scope(node) => Ok(node.id()),
            Lookup::Value(_) => Err(StmlError::violation(
                "SCOPE_NOT_A_SCOPE",
                format!("\"{}\" holds a value, not a scope.", name),
            )),
            Lookup::NotFound => Err(StmlError::violation(
                "SCOPE_NOT_FOUND",
                format!("Scope \"{}\" does not exist.", name),
            )),
        }
    }
}
