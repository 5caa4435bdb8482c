//! Small demo app: path params, query lookup, JSON replies, and a gating
//! middleware. Run with `cargo run --example hello`, then e.g.
//! `curl localhost:3000/json`.

use std::sync::Arc;

use espresso::{App, FnHandler, FnMiddleware};
use serde::Serialize;

#[derive(Serialize)]
struct Profile {
    name: String,
    job: String,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let mut app = App::new();

    // Global request log.
    app.use_middleware(Arc::new(FnMiddleware::new(|ctx| {
        tracing::info!("request: {} {}", ctx.method(), ctx.path());
    })));

    // "/search?s=hello" answers "hello".
    app.get(
        "/search",
        None,
        Arc::new(FnHandler::new(|ctx| {
            let s = ctx.query("s");
            ctx.send(&s);
        })),
    );

    // A JSON reply with the content type set for us.
    app.get(
        "/json",
        None,
        Arc::new(FnHandler::new(|ctx| {
            ctx.json(&Profile {
                name: "Ali".to_string(),
                job: "dev".to_string(),
            })
        })),
    );

    // Echo the posted body, gated by an auth middleware that always
    // redirects. The handler never runs.
    let auth = Arc::new(FnMiddleware::new(|ctx| {
        tracing::info!("user not authenticated, redirecting");
        ctx.redirect("/json", 308);
    }));
    app.post(
        "/post",
        Some(auth),
        Arc::new(FnHandler::new(|ctx| match ctx.read_body_string() {
            Ok(body) => ctx.send(&body),
            Err(_) => ctx.error("error reading body", 400),
        })),
    );

    // Grouped routes share a prefix.
    let mut api = app.group("/api", vec![]);
    api.get(
        "/users/:id",
        None,
        Arc::new(FnHandler::new(|ctx| {
            let id = ctx.param("id").to_string();
            ctx.send(&id);
        })),
    );

    // Catch-all param route, registered last so it cannot shadow the
    // literal routes above (first registered wins).
    app.get(
        "/:id",
        None,
        Arc::new(FnHandler::new(|ctx| {
            let id = ctx.param("id").to_string();
            ctx.send(&id);
        })),
    );

    app.start(3000).await;
}
