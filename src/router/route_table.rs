use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::http_helpers::Method;
use crate::middleware::{Handler, MiddlewareChain};

/// A registered route: the original pattern, the route-level middleware
/// (group middleware first, then per-call middleware), and the business
/// handler.
pub struct Route {
    pub pattern: String,
    pub(crate) middlewares: MiddlewareChain,
    pub(crate) handler: Arc<dyn Handler>,
}

/// The route registry, keyed by static prefix (the pattern minus its
/// parameter segments), then by method.
///
/// Registration runs single-threaded before the server starts; afterwards
/// the table is only ever read, so dispatch shares it without locking.
/// Scan order is the order prefixes were first registered in, which makes
/// dispatch and the startup route listing deterministic.
#[derive(Default)]
pub struct RouteTable {
    entries: FxHashMap<String, Vec<(Method, Route)>>,
    order: Vec<String>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a route under its grouping key.
    ///
    /// Panics when a route with the same key and method already exists:
    /// a duplicate registration is a configuration error in route setup,
    /// caught before the server starts serving.
    pub fn insert(&mut self, method: Method, prefix: String, route: Route) {
        if !self.entries.contains_key(&prefix) {
            self.order.push(prefix.clone());
        }
        let routes = self.entries.entry(prefix).or_default();
        if routes.iter().any(|(m, _)| *m == method) {
            panic!("duplicate route: {} [{}]", route.pattern, method.as_str());
        }
        routes.push((method, route));
    }

    /// Prefix groups in first-registration order.
    pub(crate) fn scan(&self) -> impl Iterator<Item = &[(Method, Route)]> {
        self.order.iter().map(|prefix| self.entries[prefix].as_slice())
    }

    /// Every registered (pattern, method) pair, in scan order.
    pub fn registered(&self) -> Vec<(&str, Method)> {
        self.scan()
            .flatten()
            .map(|(method, route)| (route.pattern.as_str(), *method))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
