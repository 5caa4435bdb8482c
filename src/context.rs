use anyhow::{anyhow, Result};
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::http_helpers::{reason_phrase, Body, Cookie, HttpRequest, HttpResponse};

/// Per-request state passed through middleware and handler.
///
/// Created fresh by the dispatcher for each matched request and dropped when
/// the request completes; it never crosses request boundaries.
pub struct Context {
    request: HttpRequest,
    response: HttpResponse,
    params: FxHashMap<String, String>,
    terminated: bool,
}

impl Context {
    pub fn new(request: HttpRequest) -> Self {
        Self::with_params(request, FxHashMap::default())
    }

    pub fn with_params(request: HttpRequest, params: FxHashMap<String, String>) -> Self {
        Self {
            request,
            response: HttpResponse::new(),
            params,
            terminated: false,
        }
    }

    /// Marks the context as terminated, stopping further middleware execution.
    pub fn end(&mut self) {
        self.terminated = true;
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// The value of a URL parameter by its key, or `""` when the matched
    /// pattern had no such parameter.
    /// Example: for route `/users/:id`, `param("id")` returns the actual id.
    pub fn param(&self, key: &str) -> &str {
        self.params.get(key).map(String::as_str).unwrap_or("")
    }

    /// The value of a query parameter, or `""` when absent.
    /// Example: for `/search?q=test`, `query("q")` returns `"test"`.
    pub fn query(&self, key: &str) -> String {
        self.request
            .query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .unwrap_or_default()
    }

    /// Write a string to the response body.
    pub fn send(&mut self, body: &str) {
        self.response.write(body.as_bytes());
    }

    /// Write raw bytes to the response body.
    pub fn send_bytes(&mut self, bytes: &[u8]) {
        self.response.write(bytes);
    }

    /// Serialize `data` as the JSON response body and set the content type.
    ///
    /// A value that cannot be serialized becomes a generic 500 reply; the
    /// failure is logged, never a crash.
    pub fn json<T: Serialize>(&mut self, data: &T) {
        match serde_json::to_vec(data) {
            Ok(encoded) => {
                self.response.insert_header("Content-Type", "application/json");
                self.response.write(&encoded);
            }
            Err(err) => {
                tracing::error!("response serialization failed: {err}");
                self.error("invalid json", 500);
            }
        }
    }

    /// Send a plain-text error reply with the given status code.
    pub fn error(&mut self, message: &str, code: u16) {
        self.response.status = code;
        self.response
            .insert_header("Content-Type", "text/plain; charset=utf-8");
        self.response.body.clear();
        self.response.write(message.as_bytes());
        self.response.write(b"\n");
    }

    /// Set the response status code.
    pub fn status(&mut self, code: u16) {
        self.response.status = code;
    }

    /// Reply with only a status code and its canonical reason text.
    pub fn send_status(&mut self, code: u16) {
        self.response.status = code;
        self.send(reason_phrase(code));
    }

    /// Set a response header, overwriting any existing value.
    pub fn set_header(&mut self, key: &str, value: &str) {
        self.response.insert_header(key, value);
    }

    /// Append a response header value without overwriting existing ones.
    pub fn add_header(&mut self, key: &str, value: &str) {
        self.response.append_header(key, value);
    }

    /// A header value from the incoming request, if set.
    pub fn get_header(&self, key: &str) -> Option<&str> {
        self.request.header(key)
    }

    /// Set an HTTP cookie on the response.
    pub fn set_cookie(&mut self, cookie: &Cookie) {
        self.response.append_header("Set-Cookie", &cookie.encode());
    }

    /// A named cookie from the request, if present.
    pub fn cookie(&self, name: &str) -> Option<Cookie> {
        Cookie::find(self.request.header("Cookie")?, name)
    }

    /// The full request body as bytes. Errs when the upstream read failed;
    /// what to answer is then the handler's call, nothing has been written.
    pub fn read_body(&self) -> Result<Vec<u8>> {
        match &self.request.body {
            Body::Empty => Ok(Vec::new()),
            Body::Bytes(bytes) => Ok(bytes.clone()),
            Body::Failed(err) => Err(anyhow!("failed to read request body: {err}")),
        }
    }

    /// The request body as UTF-8 text.
    pub fn read_body_string(&self) -> Result<String> {
        Ok(String::from_utf8(self.read_body()?)?)
    }

    /// Redirect to `location` with the given status code and terminate the
    /// chain, so no later step emits a body.
    pub fn redirect(&mut self, location: &str, code: u16) {
        self.response.status = code;
        self.response.insert_header("Location", location);
        self.end();
    }

    /// The request path.
    pub fn path(&self) -> &str {
        &self.request.path
    }

    /// The HTTP request method (e.g. GET, POST).
    pub fn method(&self) -> &str {
        &self.request.method
    }

    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    pub fn response(&self) -> &HttpResponse {
        &self.response
    }

    pub(crate) fn into_response(self) -> HttpResponse {
        self.response
    }
}
