use async_trait::async_trait;

use crate::context::Context;

mod chain;
pub use self::chain::MiddlewareChain;

/// A request interceptor. Runs before the handler and may mutate the
/// context, write to the response, or call `Context::end` to stop the chain.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, ctx: &mut Context);
}

/// The business handler a route dispatches to.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn call(&self, ctx: &mut Context);
}

/// Functional middleware - simpler alternative using closures
pub struct FnMiddleware {
    handler: Box<dyn Fn(&mut Context) + Send + Sync>,
}

impl FnMiddleware {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
        }
    }
}

#[async_trait]
impl Middleware for FnMiddleware {
    async fn handle(&self, ctx: &mut Context) {
        (self.handler)(ctx)
    }
}

/// Functional handler built from a closure
pub struct FnHandler {
    handler: Box<dyn Fn(&mut Context) + Send + Sync>,
}

impl FnHandler {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&mut Context) + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
        }
    }
}

#[async_trait]
impl Handler for FnHandler {
    async fn call(&self, ctx: &mut Context) {
        (self.handler)(ctx)
    }
}
