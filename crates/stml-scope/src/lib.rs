mod cursor;
mod engine;
mod name;
mod tree;

pub use cursor::{CursorPosition, CursorStep, ScopeCursor};
pub use engine::{Lookup, ScopeEngine, ScopeEngineOptions, StmlScope};
pub use name::{normalize_name, remove_quotes, split_segments};
pub use tree::{Entry, ScopeId, ScopeNode, ScopeTree};
