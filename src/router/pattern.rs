use std::collections::{BTreeMap, HashSet};

use crate::error::RouteError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// A route path such as `/note/:id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(pattern: &str) -> Result<Self, RouteError> {
        let invalid = |reason: &str| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        };
        if !pattern.starts_with('/') {
            return Err(invalid("must start with '/'"));
        }

        let mut seen = HashSet::new();
        let mut segments = Vec::new();
        for part in split_path(pattern) {
            if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(invalid("empty parameter name"));
                }
                if !seen.insert(name) {
                    return Err(invalid("duplicate parameter name"));
                }
                segments.push(Segment::Param(name.to_string()));
            } else {
                segments.push(Segment::Static(part.to_string()));
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// Join a child path onto its parent. Absolute child paths stand alone.
    pub fn join(parent: &str, child: &str) -> String {
        if child.starts_with('/') {
            return child.to_string();
        }
        if child.is_empty() {
            return parent.to_string();
        }
        format!("{}/{}", parent.trim_end_matches('/'), child)
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn has_params(&self) -> bool {
        self.segments
            .iter()
            .any(|segment| matches!(segment, Segment::Param(_)))
    }

    /// Match already-split path segments, returning the captured params.
    pub fn matches(&self, parts: &[&str]) -> Option<BTreeMap<String, String>> {
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Static(expected) if expected == part => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(params)
    }
}

/// Split a request path into segments, dropping the query, the fragment,
/// and empty segments (so `/thoughts/` and `/thoughts` are the same).
pub fn split_path(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or("");
    path.split('/').filter(|part| !part.is_empty()).collect()
}

/// The path part of a request, normalised to a leading `/` without a trailing one.
pub fn normalize_path(path: &str) -> String {
    format!("/{}", split_path(path).join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_param_capture() {
        let pattern = PathPattern::parse("/note/:id").unwrap();
        let params = pattern.matches(&split_path("/note/42")).unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert!(pattern.has_params());
    }

    #[test]
    fn test_static_mismatch_and_length() {
        let pattern = PathPattern::parse("/note/:id").unwrap();
        assert!(pattern.matches(&split_path("/notes/42")).is_none());
        assert!(pattern.matches(&split_path("/note")).is_none());
        assert!(pattern.matches(&split_path("/note/42/edit")).is_none());
    }

    #[test]
    fn test_root_matches_only_root() {
        let pattern = PathPattern::parse("/").unwrap();
        assert!(pattern.matches(&split_path("/")).is_some());
        assert!(pattern.matches(&split_path("")).is_some());
        assert!(pattern.matches(&split_path("/login")).is_none());
    }

    #[test]
    fn test_query_fragment_and_trailing_slash_ignored() {
        assert_eq!(split_path("/thoughts/?page=2#top"), vec!["thoughts"]);
        assert_eq!(normalize_path("thoughts//"), "/thoughts");
        assert_eq!(normalize_path("/"), "/");
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(
            PathPattern::parse("note/:id"),
            Err(RouteError::InvalidPattern { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/note/:"),
            Err(RouteError::InvalidPattern { .. })
        ));
        assert!(matches!(
            PathPattern::parse("/a/:id/b/:id"),
            Err(RouteError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_join() {
        assert_eq!(PathPattern::join("/", "thoughts"), "/thoughts");
        assert_eq!(PathPattern::join("/notes", ":id"), "/notes/:id");
        assert_eq!(PathPattern::join("/notes", "/login"), "/login");
        assert_eq!(PathPattern::join("/notes", ""), "/notes");
    }
}
