use thiserror::Error;

/// Errors produced while compiling a route into the trie.
///
/// Recognition misses and generation failures are not errors; they surface
/// as `None` from [`RouterTable::recognize`](crate::RouterTable::recognize)
/// and [`RouterTable::generate`](crate::RouterTable::generate).
#[derive(Debug, Error)]
pub enum CompileError {
    /// A `)` with no open optional section.
    #[error("unbalanced ')' at byte {position} in template '{template}'")]
    UnbalancedClose { template: String, position: usize },

    /// An optional section opened with `(` and never closed.
    #[error("unclosed optional section in template '{template}'")]
    UnclosedOptional { template: String },

    /// A `:` not followed by at least one identifier character.
    #[error("invalid variable name at byte {position} in template '{template}'")]
    InvalidVariable { template: String, position: usize },

    /// A validation or condition pattern failed to compile.
    #[error("invalid pattern for '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex_lite::Error,
    },

    /// A request condition names an attribute outside the router's canonical order.
    #[error("request condition on unknown attribute '{key}'")]
    UnknownRequestKey { key: String },
}
