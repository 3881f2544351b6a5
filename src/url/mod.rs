//! URL resolution and local-path mapping
//!
//! Every link and asset reference is reduced to its canonical absolute
//! form before it touches the registry or the filesystem: two
//! references that resolve to the same absolute URL are the same
//! entity. The local path for a resource mirrors the URL's path
//! component under the output root, so `scheme://host/a/b/c` lands at
//! `root/a/b/c`.

use std::path::{Path, PathBuf};
use url::Url;

/// Resolves a reference (possibly relative) against a base URL.
///
/// Returns None for references that should be silently skipped:
/// empty strings, fragment-only anchors, malformed references, and
/// anything that does not resolve to an http(s) URL (mailto:, tel:,
/// javascript:, data: and friends all fall out of the scheme check).
pub fn resolve_reference(base: &Url, reference: &str) -> Option<Url> {
    let reference = reference.trim();

    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }

    match base.join(reference) {
        Ok(resolved) => {
            if resolved.scheme() == "http" || resolved.scheme() == "https" {
                Some(resolved)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Maps a URL to its mirror location under the output root.
///
/// The URL's path component is appended to the root verbatim, minus
/// the leading slash. The scheme, host, and query are not part of the
/// mapping.
pub fn local_path(root: &Path, url: &Url) -> PathBuf {
    root.join(url.path().trim_start_matches('/'))
}

/// Returns true if this URL's mirrored page should be written to disk.
///
/// Pages are persisted only when the URL path ends in the literal
/// suffix "html"; everything else is crawled for links but never
/// written.
pub fn is_persistable_page(url: &Url) -> bool {
    url.path().ends_with("html")
}
