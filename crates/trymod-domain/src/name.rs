/// Suffix stripped from the last path segment of repository specifiers.
pub const REPOSITORY_SUFFIX: &str = ".git";

/// Derives the short on-disk alias for a package specifier.
///
/// Specifiers without a `/` are returned unchanged. Otherwise the last
/// non-empty `/`-separated segment is used, minus a trailing `.git`. Scoped
/// names contain a `/`, so `@scope/pkg` becomes `pkg`.
///
/// A specifier made only of separators, or whose last segment is exactly
/// `.git`, yields an empty string; callers reject that before touching the
/// filesystem.
#[must_use]
pub fn normalize_package_name(spec: &str) -> String {
    if !spec.contains('/') {
        return spec.to_string();
    }
    let Some(last) = spec.split('/').filter(|segment| !segment.is_empty()).last() else {
        return String::new();
    };
    last.strip_suffix(REPOSITORY_SUFFIX)
        .unwrap_or(last)
        .to_string()
}

/// Maps a normalized name onto the identifier used in the REPL scope.
#[must_use]
pub fn binding_key(normalized: &str) -> String {
    normalized.replace(['-', '.'], "_")
}
