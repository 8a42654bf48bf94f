use stml_core::{FieldPolicy, StmlError, StmlValue};

use crate::cursor::{CursorStep, ScopeCursor};
use crate::name::{content_segments, normalize_name, parse_path, Segment};
use crate::tree::{Entry, ScopeId, ScopeNode, ScopeTree};

mod assign;
mod create;
mod lifecycle;
mod lookup;
mod policy;

pub use lifecycle::{Lookup, ScopeEngine, ScopeEngineOptions};

/// Scope engine over STML literal values.
pub type StmlScope = ScopeEngine<StmlValue>;
