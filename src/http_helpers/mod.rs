#[path = "http_method.enum.rs"]
mod http_method;
pub use self::http_method::Method;

#[path = "http_request.struct.rs"]
mod http_request;
pub use self::http_request::{Body, HttpRequest};

#[path = "http_response.struct.rs"]
mod http_response;
pub use self::http_response::{reason_phrase, HttpResponse};

#[path = "cookie.struct.rs"]
mod cookie;
pub use self::cookie::Cookie;
