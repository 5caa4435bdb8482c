use std::sync::Arc;

use anyhow::{Context as _, Result};
use axum::body::Body as AxumBody;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Router;
use tokio::net::TcpListener;

use crate::app::App;
use crate::http_helpers::{Body, HttpRequest, HttpResponse};

// The engine owns all routing, so the axum router carries a single fallback
// that forwards every request into the dispatcher.
pub async fn serve(app: Arc<App>, listener: TcpListener) -> Result<()> {
    let router = Router::new().fallback(move |req: Request| {
        let app = app.clone();
        async move { handle_request(app, req).await }
    });

    axum::serve(listener, router)
        .await
        .context("server encountered an error")?;
    Ok(())
}

async fn handle_request(app: Arc<App>, req: Request) -> Response {
    let request = into_engine_request(req).await;
    let response = app.dispatch(request).await;
    into_axum_response(response)
}

/// Build the engine's request descriptor from the wire request, buffering
/// the body. A failed body read is recorded on the descriptor rather than
/// answered here: whether that is a 400 or something else is the handler's
/// decision.
async fn into_engine_request(req: Request) -> HttpRequest {
    let (parts, body) = req.into_parts();

    let body = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) if bytes.is_empty() => Body::Empty,
        Ok(bytes) => Body::Bytes(bytes.to_vec()),
        Err(err) => Body::Failed(err.to_string()),
    };

    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    HttpRequest {
        method: parts.method.as_str().to_string(),
        path: parts.uri.path().to_string(),
        query: parts.uri.query().unwrap_or_default().to_string(),
        headers,
        body,
    }
}

fn into_axum_response(response: HttpResponse) -> Response {
    let mut builder = Response::builder()
        .status(StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR));
    for (name, value) in &response.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder.body(AxumBody::from(response.body)).unwrap_or_else(|err| {
        tracing::error!("failed to encode response: {err}");
        let mut fallback = Response::new(AxumBody::from("internal server error"));
        *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        fallback
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_axum_response_carries_status_and_headers() {
        let mut response = HttpResponse::new();
        response.status = 308;
        response.insert_header("Location", "/login");
        let converted = into_axum_response(response);
        assert_eq!(converted.status(), StatusCode::PERMANENT_REDIRECT);
        assert_eq!(converted.headers()["location"], "/login");
    }

    #[test]
    fn test_invalid_header_becomes_server_error() {
        let mut response = HttpResponse::new();
        response.append_header("X-Bad\nHeader", "value");
        let converted = into_axum_response(response);
        assert_eq!(converted.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_into_engine_request_buffers_body() {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/users?active=true")
            .header("X-Request-Id", "abc")
            .body(AxumBody::from("payload"))
            .unwrap();

        let request = into_engine_request(req).await;
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/users");
        assert_eq!(request.query, "active=true");
        assert_eq!(request.header("x-request-id"), Some("abc"));
        match request.body {
            Body::Bytes(bytes) => assert_eq!(bytes, b"payload"),
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
