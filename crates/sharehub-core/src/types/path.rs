//! Path helpers for share sources and targets.
//!
//! Share paths are plain `/`-separated strings rooted at a user's
//! namespace (`/<user>/files/...`). They are never resolved against the
//! host filesystem here; these helpers only normalize and compare them.
//!
//! Prefix comparisons are path-boundary aware: `/a/b` is within `/a` but
//! `/a/bc` is not.

/// Name of the segment that terminates a user's storage root.
pub const FILES_SEGMENT: &str = "files";

/// Collapse repeated slashes and strip trailing slashes.
///
/// The root path `/` is preserved; an empty input stays empty.
pub fn normalize(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.push(c);
    }
    while out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

/// Parent directory of a normalized path, following `dirname` semantics.
///
/// `/a/b` -> `/a`, `/a` -> `/`, `/` -> `/`, `a` -> `.`.
pub fn parent(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// Prefix of `path` through its first `files` segment.
///
/// `/bob/files/Share/Docs` -> `/bob/files`. Returns `None` when the path
/// has no `files` segment.
pub fn user_root(path: &str) -> Option<&str> {
    let mut offset = 0;
    for segment in path.split('/') {
        let end = offset + segment.len();
        if segment == FILES_SEGMENT {
            return Some(&path[..end]);
        }
        offset = end + 1;
    }
    None
}

/// Whether `path` equals `prefix` or lies beneath it.
pub fn is_within(path: &str, prefix: &str) -> bool {
    suffix(path, prefix).is_some()
}

/// The part of `path` that follows `prefix`, including its leading slash.
///
/// Returns `Some("")` when the paths are equal and `None` when `path` is
/// not within `prefix`.
pub fn suffix<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    if prefix == "/" {
        return match path {
            "/" => Some(""),
            p if p.starts_with('/') => Some(p),
            _ => None,
        };
    }
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() || rest.starts_with('/') {
        Some(rest)
    } else {
        None
    }
}

/// Rewrite the `old` prefix of `path` to `new`.
///
/// The result is normalized, so rewriting onto or from `/` never yields
/// `//x` or drops a separator. Returns `None` when `path` is not within
/// `old`.
pub fn replace_prefix(path: &str, old: &str, new: &str) -> Option<String> {
    suffix(path, old).map(|rest| normalize(&format!("{new}{rest}")))
}

/// Path of `path` relative to `root`, without a leading slash.
///
/// Returns `None` when `path` is `root` itself or lies outside it.
pub fn relative_under<'a>(path: &'a str, root: &str) -> Option<&'a str> {
    suffix(path, root)
        .map(|rest| rest.trim_start_matches('/'))
        .filter(|rest| !rest.is_empty())
}
