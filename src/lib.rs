//! Express-style HTTP framework: routing with `:name` path parameters,
//! global/group/route middleware with cooperative early exit, and a
//! per-request context for handlers.
//!
//! Routes are registered up front; once [`App::start`] is called the route
//! table is immutable and requests are dispatched concurrently against it.

pub mod adapter;
mod app;
mod context;
mod group;
pub mod http_helpers;
pub mod middleware;
pub mod router;

pub use app::App;
pub use context::Context;
pub use group::Group;
pub use http_helpers::{Body, Cookie, HttpRequest, HttpResponse, Method};
pub use middleware::{FnHandler, FnMiddleware, Handler, Middleware, MiddlewareChain};

// Re-exports so users only depend on this crate for trait impls and params
pub use async_trait::async_trait;
pub use rustc_hash::FxHashMap;
