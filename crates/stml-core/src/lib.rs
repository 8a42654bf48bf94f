pub mod error;
pub mod policy;
pub mod types;
pub mod value;

pub use error::{StmlError, StmlErrorKind};
pub use policy::FieldPolicy;
pub use types::*;
pub use value::*;
