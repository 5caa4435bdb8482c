//! Engine-level dispatch tests: registration, matching, parameter
//! extraction, and chain ordering, exercised without a live socket.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use espresso::{App, FnHandler, FnMiddleware, HttpRequest};

fn text_handler(body: &'static str) -> Arc<FnHandler> {
    Arc::new(FnHandler::new(move |ctx| ctx.send(body)))
}

#[tokio::test]
async fn test_param_extraction_invokes_handler_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut app = App::new();
    {
        let calls = calls.clone();
        app.get(
            "/users/:id",
            None,
            Arc::new(FnHandler::new(move |ctx| {
                calls.fetch_add(1, Ordering::SeqCst);
                let id = ctx.param("id").to_string();
                ctx.send(&id);
            })),
        );
    }

    let res = app.dispatch(HttpRequest::new("GET", "/users/42")).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body, b"42");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_substituted_params_round_trip() {
    let mut app = App::new();
    app.get(
        "/users/:id/posts/:post",
        None,
        Arc::new(FnHandler::new(|ctx| {
            let joined = format!("{}+{}", ctx.param("id"), ctx.param("post"));
            ctx.send(&joined);
        })),
    );

    let res = app
        .dispatch(HttpRequest::new("GET", "/users/alice/posts/7"))
        .await;
    assert_eq!(res.body, b"alice+7");
}

#[tokio::test]
async fn test_query_lookup() {
    let mut app = App::new();
    app.get(
        "/search",
        None,
        Arc::new(FnHandler::new(|ctx| {
            let q = ctx.query("q");
            ctx.send(&q);
        })),
    );

    let res = app
        .dispatch(HttpRequest::new("GET", "/search").with_query("q=hello"))
        .await;
    assert_eq!(res.body, b"hello");
}

#[tokio::test]
async fn test_trailing_slash_addresses_same_route() {
    let mut app = App::new();
    app.get("/users", None, text_handler("list"));

    let with_slash = app.dispatch(HttpRequest::new("GET", "/users/")).await;
    let without = app.dispatch(HttpRequest::new("GET", "/users")).await;
    assert_eq!(with_slash.status, 200);
    assert_eq!(with_slash.body, without.body);
}

#[tokio::test]
async fn test_miss_is_not_found() {
    let mut app = App::new();
    app.get("/users", None, text_handler("list"));

    let wrong_path = app.dispatch(HttpRequest::new("GET", "/posts")).await;
    assert_eq!(wrong_path.status, 404);

    let wrong_method = app.dispatch(HttpRequest::new("POST", "/users")).await;
    assert_eq!(wrong_method.status, 404);

    // PUT is outside the supported verb set entirely.
    let unknown_method = app.dispatch(HttpRequest::new("PUT", "/users")).await;
    assert_eq!(unknown_method.status, 404);
}

#[tokio::test]
async fn test_segment_count_never_matches() {
    let mut app = App::new();
    app.get("/users/:id", None, text_handler("one"));

    assert_eq!(app.dispatch(HttpRequest::new("GET", "/users")).await.status, 404);
    assert_eq!(
        app.dispatch(HttpRequest::new("GET", "/users/1/posts")).await.status,
        404
    );
}

#[tokio::test]
async fn test_request_method_casing_is_ignored() {
    let mut app = App::new();
    app.update("/users/:id", None, text_handler("updated"));

    let res = app.dispatch(HttpRequest::new("update", "/users/9")).await;
    assert_eq!(res.body, b"updated");
}

#[tokio::test]
async fn test_redirect_middleware_skips_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut app = App::new();
    let auth = Arc::new(FnMiddleware::new(|ctx| ctx.redirect("/login", 308)));
    {
        let calls = calls.clone();
        app.post(
            "/users",
            Some(auth),
            Arc::new(FnHandler::new(move |ctx| {
                calls.fetch_add(1, Ordering::SeqCst);
                ctx.send("created");
            })),
        );
    }

    let res = app.dispatch(HttpRequest::new("POST", "/users")).await;
    assert_eq!(res.status, 308);
    assert_eq!(res.header("Location"), Some("/login"));
    assert!(res.body.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_global_termination_skips_route_chain() {
    let reached = Arc::new(AtomicUsize::new(0));
    let mut app = App::new();
    app.use_middleware(Arc::new(FnMiddleware::new(|ctx| {
        ctx.status(403);
        ctx.end();
    })));
    {
        let reached = reached.clone();
        let route_mw = Arc::new(FnMiddleware::new(move |_| {
            reached.fetch_add(1, Ordering::SeqCst);
        }));
        app.get("/private", Some(route_mw), text_handler("secret"));
    }

    let res = app.dispatch(HttpRequest::new("GET", "/private")).await;
    assert_eq!(res.status, 403);
    assert!(res.body.is_empty());
    assert_eq!(reached.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_chain_order_global_group_route_handler() {
    let order = Arc::new(Mutex::new(Vec::new()));
    let record = |label: &'static str, order: &Arc<Mutex<Vec<&'static str>>>| {
        let order = order.clone();
        Arc::new(FnMiddleware::new(move |_| order.lock().unwrap().push(label)))
    };

    let mut app = App::new();
    app.use_middleware(record("global", &order));
    let mut api = app.group("/api", vec![record("group", &order)]);
    {
        let order = order.clone();
        api.get(
            "/users/:id",
            Some(record("route", &order)),
            Arc::new(FnHandler::new(move |ctx| {
                order.lock().unwrap().push("handler");
                let id = ctx.param("id").to_string();
                ctx.send(&id);
            })),
        );
    }

    let res = app.dispatch(HttpRequest::new("GET", "/api/users/42")).await;
    assert_eq!(res.body, b"42");
    assert_eq!(
        *order.lock().unwrap(),
        vec!["global", "group", "route", "handler"]
    );
}

#[tokio::test]
async fn test_ambiguous_patterns_resolve_by_registration_order() {
    let mut app = App::new();
    app.get("/a/b", None, text_handler("literal"));
    app.get("/a/:x", None, text_handler("param"));

    let res = app.dispatch(HttpRequest::new("GET", "/a/b")).await;
    assert_eq!(res.body, b"literal");
    let res = app.dispatch(HttpRequest::new("GET", "/a/c")).await;
    assert_eq!(res.body, b"param");

    // Reversed registration flips the winner; either way it is deterministic.
    let mut app = App::new();
    app.get("/a/:x", None, text_handler("param"));
    app.get("/a/b", None, text_handler("literal"));
    let res = app.dispatch(HttpRequest::new("GET", "/a/b")).await;
    assert_eq!(res.body, b"param");
}

#[tokio::test]
#[should_panic(expected = "duplicate route")]
async fn test_duplicate_registration_panics() {
    let mut app = App::new();
    app.get("/users", None, text_handler("a"));
    app.get("/users/", None, text_handler("b"));
}

#[tokio::test]
async fn test_group_prefix_is_normalized() {
    let mut app = App::new();
    let mut api = app.group("api/", vec![]);
    api.get("users", None, text_handler("list"));

    assert_eq!(
        app.registered_routes(),
        vec![("/api/users", espresso::Method::Get)]
    );
    let res = app.dispatch(HttpRequest::new("GET", "/api/users")).await;
    assert_eq!(res.body, b"list");
}
