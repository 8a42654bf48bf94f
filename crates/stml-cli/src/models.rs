/// One statement file read from disk.
#[derive(Debug, Clone)]
pub(crate) struct LoadedDocument {
    /// Path relative to the scanned directory, `/`-separated.
    pub(crate) name: String,
    pub(crate) source: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Statement {
    Scope(String),
    Set { path: String, literal: String },
    Let { key: String, literal: String },
    Get(String),
    Final(Option<String>),
    Close(Option<String>),
    Policy(Option<String>),
}
