//! Path normalization and pattern matching.
//!
//! A pattern is a `/`-separated list of segments. A segment written `:name`
//! captures exactly one non-empty segment of the request path; every other
//! segment must match literally.

use crate::error::RouteError;

/// Canonical form of a request path or pattern.
///
/// Drops any query string or fragment, collapses runs of `/`, removes the
/// trailing slash and guarantees a single leading `/`. The empty path becomes
/// `/`. Applying it twice is the same as applying it once.
pub fn normalize_path(raw: &str) -> String {
    let path = raw.split(['?', '#']).next().unwrap_or_default();

    let mut normalized = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        normalized.push('/');
        normalized.push_str(segment);
    }

    if normalized.is_empty() {
        normalized.push('/');
    }
    normalized
}

/// Removes `base` from the front of an already normalized `path`.
///
/// Returns `None` when the path lives outside the base.
pub fn strip_base_path(path: &str, base: &str) -> Option<String> {
    let base = normalize_path(base);
    if base == "/" {
        return Some(path.to_string());
    }
    if path == base {
        return Some("/".to_string());
    }
    path.strip_prefix(&base)
        .filter(|rest| rest.starts_with('/'))
        .map(str::to_string)
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route pattern such as `/api/users/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let source = normalize_path(pattern);
        let invalid = |reason: String| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        if pattern.contains(['?', '#']) {
            return Err(invalid("query strings are not allowed in patterns".into()));
        }

        let mut parsed = Vec::new();
        for segment in segments(&source) {
            match segment.strip_prefix(':') {
                Some(name) => {
                    if name.is_empty() {
                        return Err(invalid("parameter name is empty".into()));
                    }
                    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                        return Err(invalid(format!("`{}` is not a valid parameter name", name)));
                    }
                    if parsed.contains(&Segment::Param(name.to_string())) {
                        return Err(invalid(format!("parameter `{}` appears twice", name)));
                    }
                    parsed.push(Segment::Param(name.to_string()));
                }
                None => parsed.push(Segment::Literal(segment.to_string())),
            }
        }

        Ok(Self {
            source,
            segments: parsed,
        })
    }

    /// Normalized pattern text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the pattern has no captures.
    pub fn is_static(&self) -> bool {
        self.param_count() == 0
    }

    pub fn param_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Param(_)))
            .count()
    }

    /// Pattern text with every capture name erased. Two patterns with the
    /// same shape can never both be reachable.
    pub fn shape(&self) -> String {
        if self.segments.is_empty() {
            return "/".to_string();
        }
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Literal(text) => format!("/{}", text),
                Segment::Param(_) => "/:".to_string(),
            })
            .collect()
    }

    /// Matches a normalized path, returning the captures in declaration order.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let mut params = Params::default();
        let mut input = segments(path);

        for segment in &self.segments {
            let value = input.next()?;
            match segment {
                Segment::Literal(text) if text == value => {}
                Segment::Literal(_) => return None,
                Segment::Param(name) => params.push(name.clone(), value.to_string()),
            }
        }

        if input.next().is_some() {
            return None;
        }
        Some(params)
    }
}

/// Captured path parameters, in the order they appear in the pattern.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    fn push(&mut self, name: String, value: String) {
        self.0.push((name, value));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Value of the `index`-th capture.
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(|(_, value)| value.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_and_trims() {
        assert_eq!(normalize_path("/api/users/42/"), "/api/users/42");
        assert_eq!(normalize_path("//api///users"), "/api/users");
        assert_eq!(normalize_path("api/users"), "/api/users");
        assert_eq!(normalize_path("/api/users?page=2"), "/api/users");
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("///"), "/");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["/", "", "/a", "/a/", "//a//b//", "/a/b?x=1", "a/b/c/", "/api/users/42#frag"] {
            let once = normalize_path(raw);
            assert_eq!(normalize_path(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_strip_base_path() {
        assert_eq!(strip_base_path("/hr/api/users", "/hr/"), Some("/api/users".into()));
        assert_eq!(strip_base_path("/hr", "hr"), Some("/".into()));
        assert_eq!(strip_base_path("/hrx/api", "/hr"), None);
        assert_eq!(strip_base_path("/api", "/"), Some("/api".into()));
    }

    #[test]
    fn test_parse_rejects_bad_params() {
        assert!(PathPattern::parse("/users/:").is_err());
        assert!(PathPattern::parse("/users/:a-b").is_err());
        assert!(PathPattern::parse("/users/:id/posts/:id").is_err());
        assert!(PathPattern::parse("/users?x=1").is_err());
    }

    #[test]
    fn test_root_pattern_matches_root() {
        let root = PathPattern::parse("/").unwrap();
        assert!(root.is_static());
        assert!(root.matches("/").is_some());
        assert!(root.matches("/api").is_none());
    }

    #[test]
    fn test_params_in_declared_order() {
        let pattern = PathPattern::parse("/api/pr/stats/monthly/:year/:month").unwrap();
        assert_eq!(pattern.param_count(), 2);

        let params = pattern.matches("/api/pr/stats/monthly/2024/7").unwrap();
        assert_eq!(params.len(), 2);
        assert_eq!(params.get_index(0), Some("2024"));
        assert_eq!(params.get_index(1), Some("7"));
        assert_eq!(params.get("month"), Some("7"));
        let names: Vec<_> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["year", "month"]);
    }

    #[test]
    fn test_wrong_count_or_literal_does_not_match() {
        let pattern = PathPattern::parse("/api/users/:id").unwrap();
        assert!(pattern.matches("/api/users").is_none());
        assert!(pattern.matches("/api/users/42/extra").is_none());
        assert!(pattern.matches("/api/tasks/42").is_none());
    }

    #[test]
    fn test_shape_ignores_param_names() {
        let a = PathPattern::parse("/api/tasks/:id").unwrap();
        let b = PathPattern::parse("/api/tasks/:task_id/").unwrap();
        assert_eq!(a.shape(), b.shape());
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_param_values_are_verbatim() {
        let pattern = PathPattern::parse("/files/:name").unwrap();
        let params = pattern.matches("/files/a%20b").unwrap();
        assert_eq!(params.get("name"), Some("a%20b"));
    }
}
