use rustc_hash::FxHashMap;

use crate::http_helpers::Method;
use crate::router::route_table::{Route, RouteTable};

/// Find the route for an inbound (method, normalized path) pair.
///
/// Prefix groups are scanned in first-registration order and the first
/// pattern that matches wins. That makes the winner between overlapping
/// patterns (`/a/b` vs `/a/:x`) deterministic: whichever was registered
/// first. Callers that need a different precedence should not register
/// patterns that can match the same path shape.
pub fn find_route<'a>(
    table: &'a RouteTable,
    method: Method,
    path: &str,
) -> Option<(&'a Route, FxHashMap<String, String>)> {
    for routes in table.scan() {
        for (registered_method, route) in routes {
            if *registered_method != method {
                continue;
            }
            if let Some(params) = match_pattern(&route.pattern, path) {
                return Some((route, params));
            }
        }
    }
    None
}

/// Segment-wise pattern match. Segment counts must agree exactly; a literal
/// segment compares case-sensitively, a `:name` segment binds any non-empty
/// request segment.
pub fn match_pattern(pattern: &str, path: &str) -> Option<FxHashMap<String, String>> {
    let pattern_segments: Vec<&str> = pattern.trim_matches('/').split('/').collect();
    let request_segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    if pattern_segments.len() != request_segments.len() {
        return None;
    }

    let mut params = FxHashMap::default();
    for (pattern_segment, request_segment) in pattern_segments.iter().zip(&request_segments) {
        if let Some(name) = pattern_segment.strip_prefix(':') {
            if request_segment.is_empty() {
                return None;
            }
            params.insert(name.to_string(), request_segment.to_string());
        } else if pattern_segment != request_segment {
            return None;
        }
    }
    Some(params)
}
