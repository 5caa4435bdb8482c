use std::sync::Arc;

use crate::context::Context;
use crate::middleware::Middleware;

/// An ordered middleware list with cooperative early exit.
///
/// Execution is an explicit front-to-back loop: after every middleware the
/// termination flag is checked, and a terminated context stops the chain
/// before the next step runs.
#[derive(Default)]
pub struct MiddlewareChain {
    stack: Vec<Arc<dyn Middleware>>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, middleware: Arc<dyn Middleware>) {
        self.stack.push(middleware);
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Run the chain. Returns `false` when a middleware terminated the
    /// context, in which case no later step may execute.
    pub async fn run(&self, ctx: &mut Context) -> bool {
        for middleware in &self.stack {
            middleware.handle(ctx).await;
            if ctx.is_terminated() {
                return false;
            }
        }
        true
    }
}
