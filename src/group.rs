use std::sync::Arc;

use crate::app::App;
use crate::http_helpers::Method;
use crate::middleware::{Handler, Middleware};
use crate::router::normalize_path;

/// A group of routes sharing a path prefix and inherited middleware.
///
/// Exists only during registration: it pre-computes full patterns and the
/// combined middleware list, then delegates to the app's shared route table.
/// Group middleware runs before any per-route middleware.
pub struct Group<'a> {
    app: &'a mut App,
    prefix: String,
    middlewares: Vec<Arc<dyn Middleware>>,
}

impl<'a> Group<'a> {
    pub(crate) fn new(app: &'a mut App, prefix: &str, middlewares: Vec<Arc<dyn Middleware>>) -> Self {
        Self {
            app,
            prefix: normalize_path(prefix),
            middlewares,
        }
    }

    /// Register a GET route under the group's prefix.
    pub fn get(
        &mut self,
        route: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: Arc<dyn Handler>,
    ) {
        self.handle(Method::Get, route, middleware, handler);
    }

    /// Register a POST route under the group's prefix.
    pub fn post(
        &mut self,
        route: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: Arc<dyn Handler>,
    ) {
        self.handle(Method::Post, route, middleware, handler);
    }

    /// Register an UPDATE route under the group's prefix.
    pub fn update(
        &mut self,
        route: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: Arc<dyn Handler>,
    ) {
        self.handle(Method::Update, route, middleware, handler);
    }

    /// Register a PATCH route under the group's prefix.
    pub fn patch(
        &mut self,
        route: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: Arc<dyn Handler>,
    ) {
        self.handle(Method::Patch, route, middleware, handler);
    }

    /// Register a DELETE route under the group's prefix.
    pub fn delete(
        &mut self,
        route: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: Arc<dyn Handler>,
    ) {
        self.handle(Method::Delete, route, middleware, handler);
    }

    fn handle(
        &mut self,
        method: Method,
        route: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: Arc<dyn Handler>,
    ) {
        let full_route = if self.prefix == "/" {
            normalize_path(route)
        } else {
            format!("{}{}", self.prefix, normalize_path(route))
        };
        let mut middlewares = self.middlewares.clone();
        middlewares.extend(middleware);
        self.app.handle(method, &full_route, middlewares, handler);
    }
}
