//! Request-attribute dimension of the trie.
//!
//! Every path-trie node where a conditioned route terminates owns a small
//! secondary trie that discriminates on request attributes (method, content
//! type, ...). Each node of that trie inspects one attribute, identified by
//! its position in the router's canonical order. Along any root-to-leaf path
//! those positions only increase, whatever order routes were registered in.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use crate::route::Condition;
use crate::trie::Destination;

/// Read access to the non-path attributes of a request.
pub trait RequestAttributes {
    /// Value of the attribute `key`, if the request carries it.
    fn attribute(&self, key: &str) -> Option<&str>;
}

impl RequestAttributes for () {
    fn attribute(&self, _key: &str) -> Option<&str> {
        None
    }
}

impl<S: BuildHasher> RequestAttributes for HashMap<String, String, S> {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<S: BuildHasher> RequestAttributes for HashMap<&str, &str, S> {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.get(key).copied()
    }
}

impl RequestAttributes for BTreeMap<String, String> {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> RequestAttributes for [(K, V)] {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.iter()
            .find(|(name, _)| name.as_ref() == key)
            .map(|(_, value)| value.as_ref())
    }
}

impl<K: AsRef<str>, V: AsRef<str>, const N: usize> RequestAttributes for [(K, V); N] {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.as_slice().attribute(key)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> RequestAttributes for Vec<(K, V)> {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.as_slice().attribute(key)
    }
}

/// A node of the request-attribute trie.
///
/// A node with `key == None` is a leaf and may hold a destination. A node
/// with a key never holds one: any destination parked on it before it gained
/// a key has been moved down its catchall chain.
#[derive(Debug, Default)]
pub(crate) struct RequestNode {
    /// Canonical position of the attribute inspected here.
    key: Option<usize>,
    /// Exact attribute values.
    lookup: HashMap<String, RequestNode>,
    /// Attribute patterns, tried in insertion order.
    patterns: Vec<(Condition, RequestNode)>,
    /// Taken whatever the attribute value is, or when it is missing.
    catchall: Option<Box<RequestNode>>,
    destination: Option<Destination>,
}

impl RequestNode {
    /// Merge a route's conditions into this trie and return the leaf that
    /// should receive its destination.
    ///
    /// `conditions` is indexed by canonical position; `None` means the route
    /// accepts any value for that attribute.
    pub(crate) fn merge(&mut self, conditions: &[Option<&Condition>]) -> &mut RequestNode {
        let mut node = self;
        for (index, condition) in conditions.iter().enumerate() {
            node = node.descend_past(index);
            match condition {
                Some(condition) => {
                    match node.key {
                        None => node.assign_key(index),
                        Some(key) if key > index => node.insert_before(index),
                        Some(_) => {}
                    }
                    node = node.branch(condition);
                }
                None => {
                    if node.key == Some(index) {
                        node = node.catchall_mut();
                    }
                }
            }
        }
        node.settle()
    }

    /// Follow catchalls down to a leaf.
    pub(crate) fn settle(&mut self) -> &mut RequestNode {
        let mut node = self;
        while node.key.is_some() {
            node = node.catchall_mut();
        }
        node
    }

    pub(crate) fn destination_mut(&mut self) -> &mut Option<Destination> {
        &mut self.destination
    }

    /// Resolve the attribute dimension for a request.
    ///
    /// Exact values are tried first, then patterns, then the catchall. A
    /// branch that dead-ends falls back to the next one.
    pub(crate) fn find<A>(&self, keys: &[String], attributes: &A) -> Option<Destination>
    where
        A: RequestAttributes + ?Sized,
    {
        let Some(index) = self.key else {
            return self.destination;
        };

        if let Some(value) = keys.get(index).and_then(|key| attributes.attribute(key)) {
            if let Some(found) = self
                .lookup
                .get(value)
                .and_then(|child| child.find(keys, attributes))
            {
                return Some(found);
            }
            for (condition, child) in &self.patterns {
                if condition.matches(value) {
                    if let Some(found) = child.find(keys, attributes) {
                        return Some(found);
                    }
                }
            }
        }

        self.catchall
            .as_ref()
            .and_then(|child| child.find(keys, attributes))
    }

    /// Skip nodes inspecting attributes earlier than `index` through their catchall.
    fn descend_past(&mut self, index: usize) -> &mut RequestNode {
        let mut node = self;
        while node.key.is_some_and(|key| key < index) {
            node = node.catchall_mut();
        }
        node
    }

    /// Start inspecting attribute `index` on a leaf.
    fn assign_key(&mut self, index: usize) {
        self.key = Some(index);
        if let Some(parked) = self.destination.take() {
            let fallback = self.catchall_mut().settle();
            if fallback.destination.is_none() {
                fallback.destination = Some(parked);
            }
        }
    }

    /// Put a check on attribute `index` in front of this node, which tests a
    /// later attribute. The existing subtree becomes the catchall branch so
    /// routes that never asked about `index` stay reachable.
    fn insert_before(&mut self, index: usize) {
        let demoted = std::mem::take(self);
        self.key = Some(index);
        self.catchall = Some(Box::new(demoted));
    }

    fn branch(&mut self, condition: &Condition) -> &mut RequestNode {
        match condition {
            Condition::Exact(value) => self.lookup.entry(value.clone()).or_default(),
            Condition::Pattern { source, .. } => {
                let position = self.patterns.iter().position(|(existing, _)| {
                    matches!(existing, Condition::Pattern { source: other, .. } if other == source)
                });
                let position = match position {
                    Some(position) => position,
                    None => {
                        self.patterns
                            .push((condition.clone(), RequestNode::default()));
                        self.patterns.len() - 1
                    }
                };
                &mut self.patterns[position].1
            }
        }
    }

    fn catchall_mut(&mut self) -> &mut RequestNode {
        self.catchall.get_or_insert_with(Box::default).as_mut()
    }

    /// Canonical positions inspected along the catchall spine, for tests.
    #[cfg(test)]
    fn spine(&self) -> Vec<usize> {
        let mut keys = Vec::new();
        let mut node = self;
        while let Some(key) = node.key {
            keys.push(key);
            match &node.catchall {
                Some(next) => node = next,
                None => break,
            }
        }
        keys
    }
}
