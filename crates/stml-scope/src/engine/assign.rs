use super::lookup::anonymous_target;
use super::*;
use crate::name::{parse_segment, split_segments};

impl<V> ScopeEngine<V> {
    /// Stores `value` at `name`, creating missing intermediate scopes.
    pub fn assign(&mut self, name: &str, value: V) -> Result<(), StmlError> {
        let (normalized, mut segments) = self.parse_name(name)?;
        let key = match segments.pop() {
            Some(Segment::Key(key)) => key,
            Some(Segment::Index { .. }) => {
                return Err(StmlError::malformed(
                    "NAME_INDEX_TARGET",
                    format!(
                        "Cannot assign to indexed address \"{}\"; anonymous scopes are not values.",
                        normalized
                    ),
                ));
            }
            Some(Segment::Anonymous) | None => return Err(anonymous_target(&normalized)),
        };
        self.pop_anonymous()?;

        let target = self.walk_create(&segments, &mut Vec::new())?;
        self.write_entry(target, &key, value)
    }

    /// Stores `value` under a single key of the cursor's scope: the open
    /// anonymous scope, or the root.
    pub fn assign_local(&mut self, key: &str, value: V) -> Result<(), StmlError> {
        let key = local_key(key)?;
        let target = self.cursor_scope()?;
        self.write_entry(target, &key, value)
    }

    fn write_entry(&mut self, target: ScopeId, key: &str, value: V) -> Result<(), StmlError> {
        let node = self.tree.node(target)?;
        let exists = node.contains_key(key);
        if exists && node.policy().is_final() {
            return Err(StmlError::violation(
                "SCOPE_FINAL_OVERRIDE",
                format!(
                    "Cannot overwrite \"{}\" in final scope \"{}\".",
                    key,
                    self.tree.describe(target)
                ),
            ));
        }
        if !exists && node.policy().is_closed() {
            return Err(StmlError::violation(
                "SCOPE_CLOSED_ADD",
                format!(
                    "Cannot add \"{}\" to closed scope \"{}\".",
                    key,
                    self.tree.describe(target)
                ),
            ));
        }
        self.tree.insert_entry(target, key, Entry::Value(value))?;
        Ok(())
    }
}

fn local_key(raw: &str) -> Result<String, StmlError> {
    let invalid = || {
        StmlError::malformed(
            "NAME_LOCAL_KEY",
            format!("\"{}\" is not a single local key.", raw),
        )
    };
    let trimmed = raw.trim();
    let segments = split_segments(trimmed);
    if trimmed.is_empty() || segments.len() != 1 {
        return Err(invalid());
    }
    match parse_segment(trimmed) {
        Ok(Segment::Key(key)) => Ok(key),
        _ => Err(invalid()),
    }
}
