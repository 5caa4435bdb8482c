/// Canonicalize a route pattern or request path: add the leading slash if
/// missing, drop trailing slashes unless the path is the bare root. Nothing
/// else changes, so `:name` markers and letter case survive.
///
/// Applied to both registered patterns and inbound paths, which is what makes
/// `/users/` and `/users` address the same route.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    while normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }
    normalized
}

/// The pattern with parameter segments stripped, used as the route table's
/// grouping key. `/users/:id` and `/users/:name` share the prefix `/users`.
pub fn static_prefix(pattern: &str) -> String {
    let statics: Vec<&str> = pattern
        .trim_matches('/')
        .split('/')
        .filter(|segment| !segment.starts_with(':'))
        .collect();
    format!("/{}", statics.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_leading_slash() {
        assert_eq!(normalize_path("users"), "/users");
        assert_eq!(normalize_path("users/:id"), "/users/:id");
    }

    #[test]
    fn test_normalize_strips_trailing_slash() {
        assert_eq!(normalize_path("/users/"), "/users");
        assert_eq!(normalize_path("/users///"), "/users");
    }

    #[test]
    fn test_normalize_keeps_root() {
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path(""), "/");
    }

    #[test]
    fn test_normalize_preserves_case_and_params() {
        assert_eq!(normalize_path("/Users/:ID"), "/Users/:ID");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for path in ["/", "", "users/", "/a/b/", "/a/:b", "a//", "/x/y"] {
            let once = normalize_path(path);
            assert_eq!(normalize_path(&once), once, "path: {path:?}");
        }
    }

    #[test]
    fn test_static_prefix() {
        assert_eq!(static_prefix("/users/:id"), "/users");
        assert_eq!(static_prefix("/users/:id/posts"), "/users/posts");
        assert_eq!(static_prefix("/users"), "/users");
        assert_eq!(static_prefix("/:id"), "/");
        assert_eq!(static_prefix("/"), "/");
    }
}
