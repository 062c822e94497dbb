use crate::dashboard::{Scope, Slice};

/// Namespace shared by every dashboard cache entry.
pub const DASHBOARD_NAMESPACE: &str = "dashboard";

/// Set listing every namespace that has tracked keys (used by backends that
/// cannot enumerate keys cheaply).
pub const NAMESPACE_REGISTRY_KEY: &str = "_cache:namespaces";

/// Returns the cache key for a composed dashboard.
///
/// `filters` is the stable filter token produced by
/// [`DashboardFilters::cache_token`](crate::dashboard::DashboardFilters::cache_token).
pub fn composed_key(scope: &Scope, filters: &str) -> String {
    format!("{}:composed:{}:{}", DASHBOARD_NAMESPACE, scope, filters)
}

/// Returns the cache key for a single dashboard slice.
pub fn slice_key(slice: Slice, scope: &Scope, filters: &str) -> String {
    format!("{}:{}:{}:{}", DASHBOARD_NAMESPACE, slice, scope, filters)
}

/// Returns the pattern matching every cached artifact of one scope,
/// composed and per-slice alike.
pub fn scope_pattern(scope: &Scope) -> String {
    format!("{}:*:{}:*", DASHBOARD_NAMESPACE, scope)
}

/// Returns the pattern matching every cached entry of one slice across scopes.
pub fn slice_pattern(slice: Slice) -> String {
    format!("{}:{}:*", DASHBOARD_NAMESPACE, slice)
}

/// Returns the pattern matching every dashboard entry.
pub fn dashboard_pattern() -> String {
    format!("{}:*", DASHBOARD_NAMESPACE)
}

/// Returns the set key used to track the keys written under a namespace.
pub fn tracking_key(namespace: &str) -> String {
    format!("{}:_keys", namespace)
}

/// Extracts the namespace (first `:`-separated segment) of a key or pattern.
///
/// Returns `None` when the first segment is empty or contains a wildcard,
/// since such a pattern may span namespaces.
///
/// # Examples
///
/// ```
/// use stockroom_core::cache::namespace_of;
///
/// assert_eq!(namespace_of("dashboard:summary:global:default"), Some("dashboard"));
/// assert_eq!(namespace_of("dash*:summary"), None);
/// assert_eq!(namespace_of("*"), None);
/// ```
pub fn namespace_of(key: &str) -> Option<&str> {
    let first = key.split(':').next()?;
    if first.is_empty() || first.contains('*') {
        return None;
    }
    Some(first)
}
