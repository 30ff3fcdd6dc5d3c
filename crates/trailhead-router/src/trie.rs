use std::collections::HashMap;

use regex_lite::Regex;

use crate::encoding::decode_component;
use crate::request::{RequestAttributes, RequestNode};
use crate::route::{capture_name, Condition, RouteId, Step};

/// Where a path alternative terminates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Destination {
    pub route: RouteId,
    /// Index into the route's alternatives.
    pub alternative: usize,
    /// Copied from the route so recognition can stop early.
    pub partial: bool,
}

/// A successful walk through the trie.
#[derive(Debug)]
pub(crate) struct Found {
    pub destination: Destination,
    /// Unconsumed part of the path, `/`-prefixed, empty for full matches.
    pub remainder: String,
}

/// A single node in the path trie.
#[derive(Debug, Default)]
pub(crate) struct Node {
    /// Literal children keyed by segment.
    lookup: HashMap<String, Node>,
    /// Regex children, tried in insertion order.
    matchers: Vec<Matcher>,
    /// Wildcard child, consumes exactly one segment.
    catchall: Option<Box<Node>>,
    /// Destination of an unconditioned route terminating here.
    destination: Option<Destination>,
    /// Attribute trie for routes terminating here, once any is conditioned.
    request: Option<Box<RequestNode>>,
}

/// A regex edge over the remaining path.
#[derive(Debug)]
struct Matcher {
    regex: Regex,
    captures: usize,
    node: Node,
}

impl Node {
    /// Walk or create the child reached through `step`.
    pub(crate) fn extend(&mut self, step: &Step) -> &mut Node {
        match step {
            Step::Literal(segment) => self.lookup.entry(segment.clone()).or_default(),
            Step::Pattern { regex, captures } => {
                let position = self
                    .matchers
                    .iter()
                    .position(|matcher| matcher.regex.as_str() == regex.as_str());
                let position = match position {
                    Some(position) => position,
                    None => {
                        self.matchers.push(Matcher {
                            regex: regex.clone(),
                            captures: *captures,
                            node: Node::default(),
                        });
                        self.matchers.len() - 1
                    }
                };
                &mut self.matchers[position].node
            }
            Step::Catchall => self.catchall.get_or_insert_with(Box::default).as_mut(),
        }
    }

    /// Record `destination` at this node under the given request conditions.
    ///
    /// Returns the destination already holding the same slot, if any. The
    /// earlier destination is kept.
    pub(crate) fn attach(
        &mut self,
        conditions: &[Option<&Condition>],
        destination: Destination,
    ) -> Option<Destination> {
        let constrained = conditions.iter().any(Option::is_some);
        let slot = if constrained || self.request.is_some() {
            self.request_root().merge(conditions).destination_mut()
        } else {
            &mut self.destination
        };

        if let Some(existing) = slot {
            return Some(*existing);
        }
        *slot = Some(destination);
        None
    }

    /// The attribute trie, created on first use. An unconditioned destination
    /// already stored here moves into it as the default branch.
    fn request_root(&mut self) -> &mut RequestNode {
        let root = self.request.get_or_insert_with(Box::default);
        if let Some(existing) = self.destination.take() {
            *root.settle().destination_mut() = Some(existing);
        }
        root
    }

    /// Resolve the attribute dimension at this node.
    fn resolve<A>(&self, keys: &[String], attributes: &A) -> Option<Destination>
    where
        A: RequestAttributes + ?Sized,
    {
        match &self.request {
            Some(root) => root.find(keys, attributes),
            None => self.destination,
        }
    }

    /// Depth-first search for the remaining `parts`.
    ///
    /// Strategies are tried in the order literal, regex, wildcard; a strategy
    /// whose subtree dead-ends is abandoned and its captures discarded.
    pub(crate) fn find<A>(
        &self,
        parts: &[&str],
        keys: &[String],
        attributes: &A,
        params: &mut Vec<String>,
    ) -> Option<Found>
    where
        A: RequestAttributes + ?Sized,
    {
        if self.request.is_some() || self.destination.is_some_and(|d| d.partial) {
            if let Some(destination) = self.resolve(keys, attributes) {
                if destination.partial {
                    return Some(Found {
                        destination,
                        remainder: remainder(parts),
                    });
                }
            }
        }

        let Some((&segment, rest)) = parts.split_first() else {
            return self.resolve(keys, attributes).map(|destination| Found {
                destination,
                remainder: String::new(),
            });
        };

        let literal = match self.lookup.get(segment) {
            Some(child) => Some(child),
            None => self.lookup.get(decode_component(segment).as_ref()),
        };
        if let Some(child) = literal {
            if let Some(found) = child.find(rest, keys, attributes, params) {
                return Some(found);
            }
        }

        if !self.matchers.is_empty() {
            let whole = parts.join("/");
            for matcher in &self.matchers {
                let Some(captures) = matcher.regex.captures(&whole) else {
                    continue;
                };
                let consumed = captures.get(0).map_or(0, |m| m.end());

                let mark = params.len();
                for index in 0..matcher.captures {
                    let value = captures
                        .name(&capture_name(index))
                        .map_or_else(String::new, |m| m.as_str().to_string());
                    params.push(value);
                }

                let tail = &whole[consumed..];
                let resplit: Vec<&str> = if tail.is_empty() {
                    Vec::new()
                } else {
                    tail.split('/').collect()
                };
                if let Some(found) = matcher.node.find(&resplit, keys, attributes, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        if let Some(child) = &self.catchall {
            params.push(segment.to_string());
            if let Some(found) = child.find(rest, keys, attributes, params) {
                return Some(found);
            }
            params.pop();
        }

        None
    }
}

fn remainder(parts: &[&str]) -> String {
    if parts.is_empty() {
        String::new()
    } else {
        format!("/{}", parts.join("/"))
    }
}

/// Normalize a request path: drop the query string, collapse double slashes,
/// strip the trailing slash.
pub fn normalize_path(path: &str) -> String {
    let path = path.split_once('?').map_or(path, |(path, _)| path);
    let mut normalized = String::with_capacity(path.len() + 1);
    let mut prev_slash = false;

    if !path.starts_with('/') {
        normalized.push('/');
        prev_slash = true;
    }

    for ch in path.chars() {
        if ch == '/' {
            if !prev_slash {
                normalized.push('/');
            }
            prev_slash = true;
        } else {
            normalized.push(ch);
            prev_slash = false;
        }
    }

    // Strip trailing slash (but keep root "/")
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }

    normalized
}
