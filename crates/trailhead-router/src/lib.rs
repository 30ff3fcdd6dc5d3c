//! Prefix-trie URL router.
//!
//! Compiles route templates such as `/posts/:id(.:format)` into a trie with
//! literal, regex and wildcard edges, plus a secondary trie per terminal node
//! that discriminates on request attributes (method, content type, ...) in a
//! fixed canonical order. Supports recognition with backtracking, partial
//! (mounted) routes, and reverse generation of paths from named routes.

pub mod encoding;
mod error;
mod request;
mod route;
mod router;
mod shared;
mod table;
pub mod template;
mod trie;

pub use error::CompileError;
pub use request::RequestAttributes;
pub use route::{
    Condition, ConditionSpec, PathAlternative, Route, RouteDefinition, RouteId, RouteOptions,
};
pub use router::{RouteHandle, Router};
pub use shared::SharedRouter;
pub use table::{compile, Inserted, Match, RouterTable, Shadowed, DEFAULT_REQUEST_KEYS};
pub use template::Token;
pub use trie::normalize_path;
