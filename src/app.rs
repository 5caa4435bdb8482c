use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;

use crate::adapter;
use crate::context::Context;
use crate::group::Group;
use crate::http_helpers::{HttpRequest, HttpResponse, Method};
use crate::middleware::{Handler, Middleware, MiddlewareChain};
use crate::router::{find_route, normalize_path, static_prefix, Route, RouteTable};

const DEFAULT_PORT: u16 = 3000;

/// The application: an owned route table plus the global middleware chain.
///
/// All registration happens before [`App::start`]; from then on the app is
/// shared read-only across request tasks.
pub struct App {
    routes: RouteTable,
    middlewares: MiddlewareChain,
}

impl App {
    pub fn new() -> Self {
        Self {
            routes: RouteTable::new(),
            middlewares: MiddlewareChain::new(),
        }
    }

    /// Append a middleware to the application's global chain. Call order is
    /// execution order.
    pub fn use_middleware(&mut self, middleware: Arc<dyn Middleware>) {
        self.middlewares.push(middleware);
    }

    /// Register a GET route with the given path and handler.
    pub fn get(
        &mut self,
        route: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: Arc<dyn Handler>,
    ) {
        self.handle(Method::Get, route, middleware.into_iter().collect(), handler);
    }

    /// Register a POST route with the given path and handler.
    pub fn post(
        &mut self,
        route: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: Arc<dyn Handler>,
    ) {
        self.handle(Method::Post, route, middleware.into_iter().collect(), handler);
    }

    /// Register an UPDATE route with the given path and handler.
    pub fn update(
        &mut self,
        route: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: Arc<dyn Handler>,
    ) {
        self.handle(Method::Update, route, middleware.into_iter().collect(), handler);
    }

    /// Register a PATCH route with the given path and handler.
    pub fn patch(
        &mut self,
        route: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: Arc<dyn Handler>,
    ) {
        self.handle(Method::Patch, route, middleware.into_iter().collect(), handler);
    }

    /// Register a DELETE route with the given path and handler.
    pub fn delete(
        &mut self,
        route: &str,
        middleware: Option<Arc<dyn Middleware>>,
        handler: Arc<dyn Handler>,
    ) {
        self.handle(Method::Delete, route, middleware.into_iter().collect(), handler);
    }

    /// Create a route group with the given prefix and inherited middleware.
    /// Useful for modular route organization.
    pub fn group(&mut self, prefix: &str, middlewares: Vec<Arc<dyn Middleware>>) -> Group<'_> {
        Group::new(self, prefix, middlewares)
    }

    pub(crate) fn handle(
        &mut self,
        method: Method,
        route: &str,
        middlewares: Vec<Arc<dyn Middleware>>,
        handler: Arc<dyn Handler>,
    ) {
        let pattern = normalize_path(route);
        let prefix = static_prefix(&pattern);
        let mut chain = MiddlewareChain::new();
        for middleware in middlewares {
            chain.push(middleware);
        }
        self.routes.insert(
            method,
            prefix,
            Route {
                pattern,
                middlewares: chain,
                handler,
            },
        );
    }

    /// Every registered (pattern, method) pair, in scan order.
    pub fn registered_routes(&self) -> Vec<(&str, Method)> {
        self.routes.registered()
    }

    /// Route an inbound request to its handler and return the finished
    /// response.
    ///
    /// Flow: normalize, match, then the global middleware chain, the route's
    /// own chain, and the handler, stopping at the first terminated context.
    pub async fn dispatch(&self, request: HttpRequest) -> HttpResponse {
        let path = normalize_path(&request.path);
        let Some(method) = Method::from_string(&request.method) else {
            tracing::debug!("no route for {} {}", request.method, path);
            return not_found();
        };
        let Some((route, params)) = find_route(&self.routes, method, &path) else {
            tracing::debug!("no route for {} {}", method.as_str(), path);
            return not_found();
        };

        let mut ctx = Context::with_params(request, params);
        if !self.middlewares.run(&mut ctx).await {
            return ctx.into_response();
        }
        if !route.middlewares.run(&mut ctx).await {
            return ctx.into_response();
        }
        route.handler.call(&mut ctx).await;
        ctx.into_response()
    }

    /// Serve on an already-bound listener. This is what [`App::start`] runs
    /// after binding; tests use it directly with an ephemeral port.
    pub async fn listen(self, listener: TcpListener) -> Result<()> {
        adapter::serve(Arc::new(self), listener).await
    }

    /// Begin serving on the given port (`0` falls back to 3000), logging
    /// every registered route first. Bind or serve failure is fatal.
    pub async fn start(self, port: u16) {
        let port = if port == 0 { DEFAULT_PORT } else { port };
        for (pattern, method) in self.registered_routes() {
            tracing::info!("registered route {} [{}]", pattern, method.as_str());
        }

        let addr = format!("0.0.0.0:{port}");
        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => listener,
            Err(err) => {
                tracing::error!("failed to bind {addr}: {err}");
                std::process::exit(1);
            }
        };
        tracing::info!("server is running on :{port}");

        if let Err(err) = self.listen(listener).await {
            tracing::error!("server error: {err}");
            std::process::exit(1);
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

fn not_found() -> HttpResponse {
    let mut response = HttpResponse::new();
    response.status = 404;
    response.insert_header("Content-Type", "text/plain; charset=utf-8");
    response.write(b"404 page not found\n");
    response
}
