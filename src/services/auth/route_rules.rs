//! Path classifier: maps `(method, path)` to the access level a request needs.
//!
//! Rules are matched in declaration order and the first match wins. A path that
//! no rule covers requires a credential (`AccessLevel::Authenticated`); the table
//! never falls open.

use axum::http::Method;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccessLevel {
    Public,
    Authenticated,
    AuthenticatedAdmin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `*`: exactly one non-empty segment.
    Any,
}

#[derive(Debug, Clone)]
pub struct RouteRule {
    segments: Vec<Segment>,
    methods: Vec<Method>,
    level: AccessLevel,
}

impl RouteRule {
    /// `pattern` is a slash-separated path where `*` stands for any single segment,
    /// e.g. `/api/v1/products/*`.
    pub fn new(pattern: &str, methods: &[Method], level: AccessLevel) -> Self {
        let segments = path_segments(pattern)
            .into_iter()
            .map(|s| match s {
                "*" => Segment::Any,
                other => Segment::Literal(other.to_string()),
            })
            .collect();

        Self {
            segments,
            methods: methods.to_vec(),
            level,
        }
    }

    pub fn level(&self) -> AccessLevel {
        self.level
    }

    fn matches(&self, method: &Method, segments: &[&str]) -> bool {
        if !self.methods.contains(method) || self.segments.len() != segments.len() {
            return false;
        }

        self.segments
            .iter()
            .zip(segments)
            .all(|(rule, actual)| match rule {
                Segment::Any => !actual.is_empty(),
                Segment::Literal(lit) => lit == actual,
            })
    }
}

/// Immutable, ordered rule set. Built once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    pub fn classify(&self, method: &Method, path: &str) -> AccessLevel {
        // HEAD is served by GET handlers, so it must be guarded like GET.
        let method = if *method == Method::HEAD {
            &Method::GET
        } else {
            method
        };
        let segments = path_segments(path);

        self.rules
            .iter()
            .find(|rule| rule.matches(method, &segments))
            .map(RouteRule::level)
            .unwrap_or(AccessLevel::Authenticated)
    }

    /// Route rules for the catalog/order API mounted under `prefix` (e.g. `/api/v1`).
    pub fn catalog(prefix: &str) -> Self {
        use AccessLevel::*;

        let p = |path: &str| format!("{}{}", prefix.trim_end_matches('/'), path);
        let read = [Method::GET, Method::OPTIONS];
        let write = [Method::POST, Method::PUT, Method::DELETE];

        let mut rules = vec![RouteRule::new(&p("/health"), &[Method::GET], Public)];

        for resource in ["/categories", "/categories/*", "/products", "/products/*"] {
            rules.push(RouteRule::new(&p(resource), &read, Public));
            rules.push(RouteRule::new(&p(resource), &write, AuthenticatedAdmin));
        }
        rules.extend([
            RouteRule::new(&p("/products/get/count"), &read, Public),
            RouteRule::new(&p("/products/get/featured/*"), &read, Public),
            // users
            RouteRule::new(&p("/users/login"), &[Method::POST], Public),
            RouteRule::new(&p("/users/register"), &[Method::POST], Public),
            RouteRule::new(&p("/users"), &[Method::GET, Method::POST], AuthenticatedAdmin),
            RouteRule::new(&p("/users/get/count"), &[Method::GET], AuthenticatedAdmin),
            RouteRule::new(&p("/users/*"), &[Method::DELETE], AuthenticatedAdmin),
            RouteRule::new(&p("/users/*"), &[Method::GET, Method::PUT], Authenticated),
            // orders
            RouteRule::new(&p("/orders"), &[Method::POST], Authenticated),
            RouteRule::new(&p("/orders"), &[Method::GET], AuthenticatedAdmin),
            RouteRule::new(&p("/orders/get/count"), &[Method::GET], AuthenticatedAdmin),
            RouteRule::new(&p("/orders/get/totalsales"), &[Method::GET], AuthenticatedAdmin),
            RouteRule::new(&p("/orders/get/userorders/*"), &[Method::GET], Authenticated),
            RouteRule::new(&p("/orders/*"), &[Method::GET], Authenticated),
            RouteRule::new(&p("/orders/*"), &[Method::PUT, Method::DELETE], AuthenticatedAdmin),
        ]);

        Self::new(rules)
    }
}

/// Splits a request path into segments. The query string and trailing slashes are
/// ignored; empty inner segments (`//`) are kept so they never match a rule segment.
fn path_segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let path = path.trim_end_matches('/');
    let path = path.strip_prefix('/').unwrap_or(path);

    if path.is_empty() {
        return Vec::new();
    }
    path.split('/').collect()
}
