use crate::error::CompileError;
use crate::request::RequestAttributes;
use crate::route::{RouteDefinition, RouteId, RouteOptions};
use crate::table::{Match, RouterTable};

/// Registration-oriented front end over a [`RouterTable`].
///
/// ```
/// use trailhead_router::{RouteOptions, Router};
///
/// let mut router = Router::new();
/// router
///     .register("/posts/:id", "posts#show", RouteOptions::new().matching("id", r"\d+"))
///     .unwrap()
///     .name("post");
///
/// let m = router.recognize("/posts/42", &[("method", "GET")]).unwrap();
/// assert_eq!(m.destination, "posts#show");
/// assert_eq!(m.param("id"), Some("42"));
/// assert_eq!(router.generate("post", [("id", 7)]).as_deref(), Some("/posts/7"));
/// ```
#[derive(Debug, Default)]
pub struct Router {
    table: RouterTable,
}

/// Returned by [`Router::register`] to name the route just added.
#[derive(Debug)]
pub struct RouteHandle<'r> {
    table: &'r mut RouterTable,
    id: RouteId,
}

impl RouteHandle<'_> {
    pub fn id(&self) -> RouteId {
        self.id
    }

    /// Index the route under `name` for [`Router::generate`].
    pub fn name(self, name: impl Into<String>) -> Self {
        self.table.assign_name(self.id, name.into());
        self
    }
}

impl Router {
    /// A router checking only the `method` attribute.
    pub fn new() -> Self {
        Self::default()
    }

    /// A router checking request attributes in the given canonical order.
    pub fn with_request_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table: RouterTable::new(keys),
        }
    }

    pub fn register(
        &mut self,
        template: impl Into<String>,
        destination: impl Into<String>,
        options: RouteOptions,
    ) -> Result<RouteHandle<'_>, CompileError> {
        let id = self
            .table
            .insert(RouteDefinition::new(template, destination).with_options(options))?
            .id;
        Ok(RouteHandle {
            table: &mut self.table,
            id,
        })
    }

    pub fn recognize<A>(&self, path: &str, attributes: &A) -> Option<Match>
    where
        A: RequestAttributes + ?Sized,
    {
        self.table.recognize(path, attributes)
    }

    pub fn generate<I, K, V>(&self, name: &str, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.table.generate(name, params)
    }

    pub fn table(&self) -> &RouterTable {
        &self.table
    }

    pub fn into_table(self) -> RouterTable {
        self.table
    }
}
