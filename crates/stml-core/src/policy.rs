use std::fmt;

use serde::{Deserialize, Serialize};

/// Write policy attached to every scope.
///
/// Two independent flags: a *final* scope refuses to overwrite entries it
/// already holds, a *closed* scope refuses new entries. The four states form
/// a lattice with `Immutable` at the top, and the only transitions
/// ([`FieldPolicy::finalized`], [`FieldPolicy::closed`]) move upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldPolicy {
    /// Variable and open.
    #[default]
    Default,
    /// Final and open.
    Final,
    /// Variable and closed.
    Closed,
    /// Final and closed.
    Immutable,
}

impl FieldPolicy {
    pub const ALL: [FieldPolicy; 4] = [
        FieldPolicy::Default,
        FieldPolicy::Final,
        FieldPolicy::Closed,
        FieldPolicy::Immutable,
    ];

    pub const fn from_flags(is_final: bool, is_closed: bool) -> Self {
        match (is_final, is_closed) {
            (false, false) => Self::Default,
            (true, false) => Self::Final,
            (false, true) => Self::Closed,
            (true, true) => Self::Immutable,
        }
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Final | Self::Immutable)
    }

    pub const fn is_closed(self) -> bool {
        matches!(self, Self::Closed | Self::Immutable)
    }

    pub const fn is_open(self) -> bool {
        !self.is_closed()
    }

    pub const fn is_variable(self) -> bool {
        !self.is_final()
    }

    pub const fn permits_any_write(self) -> bool {
        self.is_open() && self.is_variable()
    }

    /// Same policy with overwriting forbidden. Not to be confused with
    /// [`FieldPolicy::is_final`].
    pub const fn finalized(self) -> Self {
        Self::from_flags(true, self.is_closed())
    }

    /// Same policy with additions forbidden. Not to be confused with
    /// [`FieldPolicy::is_closed`].
    pub const fn closed(self) -> Self {
        Self::from_flags(self.is_final(), true)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Default => "DEFAULT",
            Self::Final => "FINAL",
            Self::Closed => "CLOSED",
            Self::Immutable => "IMMUTABLE",
        }
    }

    /// True when `self` is at least as strict as `other` on both flags.
    pub const fn is_at_least(self, other: FieldPolicy) -> bool {
        (self.is_final() || !other.is_final()) && (self.is_closed() || !other.is_closed())
    }
}

impl fmt::Display for FieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
