use std::collections::HashMap;

use crate::encoding::{decode_component, encode_segment, query_string};
use crate::error::CompileError;
use crate::request::RequestAttributes;
use crate::route::{PathAlternative, Route, RouteDefinition, RouteId};
use crate::trie::{normalize_path, Destination, Node};

/// Canonical request attribute order used when none is configured.
pub const DEFAULT_REQUEST_KEYS: &[&str] = &["method"];

/// The result of a successful recognition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Destination of the winning route.
    pub destination: String,
    pub route: RouteId,
    /// Captured variables in the winning alternative's template order.
    pub params: Vec<(String, String)>,
    /// Whether the route matched as a prefix of the path.
    pub partial: bool,
    /// Unconsumed path (`/`-prefixed) for partial matches, empty otherwise.
    pub remainder: String,
}

impl Match {
    /// Value captured for variable `name`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Outcome of inserting a route into a [`RouterTable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inserted {
    pub id: RouteId,
    /// Alternatives that can never match because an earlier route already
    /// owns the same path and request conditions.
    pub shadowed: Vec<Shadowed>,
}

/// An alternative of a freshly inserted route hidden by an earlier route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shadowed {
    /// Index into the inserted route's alternatives.
    pub alternative: usize,
    /// Route that keeps the slot.
    pub by: RouteId,
}

/// A compiled route table.
///
/// Built once by inserting route definitions, then queried read-only. To
/// change the routes, build a new table and swap it in (see
/// [`SharedRouter`](crate::SharedRouter)).
#[derive(Debug)]
pub struct RouterTable {
    request_keys: Vec<String>,
    routes: Vec<Route>,
    names: HashMap<String, RouteId>,
    destinations: HashMap<String, RouteId>,
    root: Node,
}

impl Default for RouterTable {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_KEYS.iter().copied())
    }
}

impl RouterTable {
    /// Create an empty table checking request attributes in the given order.
    pub fn new<I, S>(request_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            request_keys: request_keys.into_iter().map(Into::into).collect(),
            routes: Vec::new(),
            names: HashMap::new(),
            destinations: HashMap::new(),
            root: Node::default(),
        }
    }

    /// Compile a route and insert every alternative of it into the trie.
    ///
    /// Alternatives whose path and conditions are already taken by an earlier
    /// route are reported in [`Inserted::shadowed`]; the earlier route keeps
    /// matching.
    pub fn insert(&mut self, definition: RouteDefinition) -> Result<Inserted, CompileError> {
        let route = Route::compile(definition, &self.request_keys)?;
        let id = RouteId(self.routes.len());

        let mut shadowed = Vec::new();
        let conditions: Vec<_> = self
            .request_keys
            .iter()
            .map(|key| route.condition(key))
            .collect();

        for (index, alternative) in route.alternatives().iter().enumerate() {
            let node = alternative
                .steps
                .iter()
                .fold(&mut self.root, |node, step| node.extend(step));
            let destination = Destination {
                route: id,
                alternative: index,
                partial: route.is_partial(),
            };
            match node.attach(&conditions, destination) {
                // Two alternatives of one route collapsing onto the same path.
                Some(existing) if existing.route == id => {}
                Some(existing) => {
                    tracing::warn!(
                        template = %route.template(),
                        alternative = %alternative.path(),
                        destination = %route.destination(),
                        shadowed_by = existing.route.index(),
                        "path and conditions already taken by an earlier route"
                    );
                    shadowed.push(Shadowed {
                        alternative: index,
                        by: existing.route,
                    });
                }
                None => {}
            }
        }

        tracing::debug!(
            template = %route.template(),
            destination = %route.destination(),
            alternatives = route.alternatives().len(),
            "route compiled"
        );

        self.destinations
            .entry(route.destination().to_string())
            .or_insert(id);
        let name = route.name.clone();
        self.routes.push(route);
        if let Some(name) = name {
            self.assign_name(id, name);
        }
        Ok(Inserted { id, shadowed })
    }

    /// Index route `id` under `name` for reverse generation.
    pub(crate) fn assign_name(&mut self, id: RouteId, name: String) {
        if let Some(previous) = self.names.insert(name.clone(), id) {
            if previous != id {
                tracing::warn!(name = %name, "route name reassigned to a later route");
                if let Some(route) = self.routes.get_mut(previous.0) {
                    route.name = None;
                }
            }
        }
        if let Some(route) = self.routes.get_mut(id.0) {
            route.name = Some(name);
        }
    }

    /// Resolve a request path plus attributes to a destination.
    pub fn recognize<A>(&self, path: &str, attributes: &A) -> Option<Match>
    where
        A: RequestAttributes + ?Sized,
    {
        let normalized = normalize_path(path);
        let parts: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

        let mut captured = Vec::new();
        let Some(found) = self
            .root
            .find(&parts, &self.request_keys, attributes, &mut captured)
        else {
            tracing::trace!(path = %normalized, "no route matched");
            return None;
        };

        let route = &self.routes[found.destination.route.0];
        let alternative = &route.alternatives()[found.destination.alternative];
        let params = alternative
            .variable_names()
            .iter()
            .cloned()
            .zip(captured)
            .map(|(name, value)| (name, decode_component(&value).into_owned()))
            .collect();

        tracing::trace!(
            path = %normalized,
            destination = %route.destination(),
            partial = found.destination.partial,
            "route matched"
        );

        Some(Match {
            destination: route.destination().to_string(),
            route: found.destination.route,
            params,
            partial: found.destination.partial,
            remainder: found.remainder,
        })
    }

    /// Build a path for the route registered under `name`.
    ///
    /// Alternatives are tried from the one including the most optional
    /// sections down. The first whose variables are all present and valid is
    /// rendered; parameters it does not consume become the query string.
    /// Returns `None` if no route has that name or no alternative fits.
    pub fn generate<I, K, V>(&self, name: &str, params: I) -> Option<String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        let Some(route) = self.route_by_name(name) else {
            tracing::debug!(name = %name, "no route registered under this name");
            return None;
        };
        let params: Vec<(String, String)> = params
            .into_iter()
            .map(|(key, value)| (key.into(), value.to_string()))
            .collect();

        let generated = generate_route(route, &params);
        if generated.is_none() {
            tracing::debug!(name = %name, "parameters satisfy no alternative of the route");
        }
        generated
    }

    /// Look up a route by name, falling back to the first route with that
    /// destination.
    pub fn route_by_name(&self, name: &str) -> Option<&Route> {
        self.names
            .get(name)
            .or_else(|| self.destinations.get(name))
            .and_then(|id| self.route(*id))
    }

    pub fn route(&self, id: RouteId) -> Option<&Route> {
        self.routes.get(id.0)
    }

    /// Routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Canonical request attribute order.
    pub fn request_keys(&self) -> &[String] {
        &self.request_keys
    }
}

/// Compile a whole set of route definitions into a fresh table.
pub fn compile<I, K, S>(definitions: I, request_keys: K) -> Result<RouterTable, CompileError>
where
    I: IntoIterator<Item = RouteDefinition>,
    K: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut table = RouterTable::new(request_keys);
    for definition in definitions {
        table.insert(definition)?;
    }
    Ok(table)
}

fn generate_route(route: &Route, params: &[(String, String)]) -> Option<String> {
    let mut candidates: Vec<&PathAlternative> = route.alternatives().iter().rev().collect();
    candidates.sort_by(|a, b| b.optionals().cmp(&a.optionals()));

    let alternative = candidates.into_iter().find(|alternative| {
        alternative.variable_names().iter().all(|name| {
            param(params, name).is_some_and(|value| route.accepts(name, value))
        })
    })?;

    let consumed = alternative.variable_names();
    let encoded: Vec<(&str, String)> = consumed
        .iter()
        .filter_map(|name| {
            param(params, name).map(|value| (name.as_str(), encode_segment(value)))
        })
        .collect();
    let path = alternative.render(|name| {
        encoded
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    });
    let query = query_string(
        params
            .iter()
            .filter(|(key, _)| !consumed.contains(key))
            .map(|(key, value)| (key.as_str(), value.as_str())),
    );
    Some(path + &query)
}

/// A non-empty parameter value.
fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .filter(|value| !value.is_empty())
}
