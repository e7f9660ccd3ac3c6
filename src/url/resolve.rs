use crate::url::normalize::{is_scheme, normalize_url, split_url};

/// Resolves an `href` found on a page against that page's URL
///
/// Returns `None` for hrefs that never lead to a crawlable page:
/// - empty hrefs and same-page `#fragment` links
/// - `javascript:` and `mailto:` links
/// - any other non-HTTP scheme (`tel:`, `data:`, `ftp:`, ...)
///
/// Relative references are resolved against the base page's directory,
/// with `.` segments dropped and `..` popping one segment (a no-op at the
/// root). The base path and query are taken as written, so the result
/// keeps them unencoded. The result always goes through [`normalize_url`].
///
/// # Examples
///
/// ```
/// use sumi_index::url::resolve_link;
///
/// let base = "http://a.com/dir/page.html";
/// assert_eq!(resolve_link(base, "../x?y=1").as_deref(), Some("http://a.com/x?y=1"));
/// assert_eq!(resolve_link(base, "#top"), None);
/// ```
pub fn resolve_link(base_url: &str, href: &str) -> Option<String> {
    let href = href.trim();

    if href.is_empty()
        || href.starts_with('#')
        || starts_with_ignore_case(href, "javascript:")
        || starts_with_ignore_case(href, "mailto:")
    {
        return None;
    }

    // Protocol-relative: //host/path
    if href.starts_with("//") {
        let base = split_url(base_url.trim()).ok()?;
        return normalize_url(&format!("{}:{}", base.scheme, href)).ok();
    }

    // Already absolute
    if let Some((scheme, _)) = href.split_once(':') {
        if is_scheme(scheme) {
            let scheme = scheme.to_ascii_lowercase();
            if scheme == "http" || scheme == "https" {
                return normalize_url(href).ok();
            }
            return None;
        }
    }

    let base = split_url(base_url.trim()).ok()?;

    let reference = href.split('#').next().unwrap_or_default();
    let (reference_path, query) = match reference.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (reference, None),
    };

    let base_path = base.path;
    let merged_path = if reference_path.is_empty() {
        // Query-only reference keeps the base path
        base_path.to_string()
    } else if reference_path.starts_with('/') {
        reference_path.to_string()
    } else {
        format!("{}{}", directory_of(base_path), reference_path)
    };

    let mut target = base.origin();
    target.push_str(&remove_dot_segments(&merged_path));
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }

    normalize_url(&target).ok()
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len()
        && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// The path up to and including its last `/`
fn directory_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..=idx],
        None => "/",
    }
}

/// Collapses `.` and `..` segments and empty segments into a rooted path
fn remove_dot_segments(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    format!("/{}", segments.join("/"))
}
