//! Atomically swappable route table.
//!
//! Tables are immutable once built. To change the routes, compile a new
//! table off to the side and [`swap`](SharedRouter::swap) it in; requests
//! already holding the previous snapshot finish against it.

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::request::RequestAttributes;
use crate::table::{Match, RouterTable};

#[derive(Debug)]
pub struct SharedRouter {
    current: ArcSwap<RouterTable>,
}

impl SharedRouter {
    pub fn new(table: RouterTable) -> Self {
        Self {
            current: ArcSwap::from_pointee(table),
        }
    }

    /// The table currently in service.
    pub fn load(&self) -> Arc<RouterTable> {
        self.current.load_full()
    }

    /// Put `table` in service and return the one it replaces.
    pub fn swap(&self, table: RouterTable) -> Arc<RouterTable> {
        let routes = table.len();
        let previous = self.current.swap(Arc::new(table));
        tracing::debug!(
            routes,
            previous_routes = previous.len(),
            "route table swapped"
        );
        previous
    }

    pub fn recognize<A>(&self, path: &str, attributes: &A) -> Option<Match>
    where
        A: RequestAttributes + ?Sized,
    {
        self.current.load().recognize(path, attributes)
    }

    pub fn generate<I, K, V>(&self, name: &str, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.current.load().generate(name, params)
    }
}

impl From<RouterTable> for SharedRouter {
    fn from(table: RouterTable) -> Self {
        Self::new(table)
    }
}
