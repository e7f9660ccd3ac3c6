use crate::UrlError;
use url::Url;

/// A validated absolute URL split into its parts
///
/// Scheme, host and port come from the parsed URL. Path and query are
/// slices of the input exactly as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UrlParts<'a> {
    pub(crate) scheme: String,
    pub(crate) host: String,
    pub(crate) port: Option<u16>,
    pub(crate) path: &'a str,
    pub(crate) query: Option<&'a str>,
}

impl UrlParts<'_> {
    /// `scheme://host[:port]`
    pub(crate) fn origin(&self) -> String {
        match self.port {
            Some(port) => format!("{}://{}:{}", self.scheme, self.host, port),
            None => format!("{}://{}", self.scheme, self.host),
        }
    }
}

/// Normalizes a URL into the canonical form used as the storage key
///
/// # Normalization Steps
///
/// 1. Trim whitespace; reject empty input
/// 2. Prefix `http://` when the string carries no `scheme://`
/// 3. Parse; reject malformed URLs and URLs without a host
/// 4. Accept only `http` and `https`
/// 5. Lowercase scheme and host; default ports are dropped
/// 6. Empty path becomes `/`; trailing slashes are removed from any other path
/// 7. Keep the query string verbatim, drop the fragment
///
/// Path and query are taken from the input as written: nothing is
/// percent-encoded, `.` and `..` segments stay, and hosts are not
/// converted to punycode.
///
/// The result is `scheme://host[:port]path[?query]`. Two inputs that
/// normalize to the same string are the same page.
///
/// # Examples
///
/// ```
/// use sumi_index::url::normalize_url;
///
/// assert_eq!(normalize_url("example.com/path/").unwrap(), "http://example.com/path");
/// assert_eq!(normalize_url("HTTP://EXAMPLE.com").unwrap(), "http://example.com/");
/// assert_eq!(normalize_url("a.com/p?q=a b").unwrap(), "http://a.com/p?q=a b");
/// assert!(normalize_url("ftp://x.com").is_err());
/// ```
pub fn normalize_url(url_str: &str) -> Result<String, UrlError> {
    let trimmed = url_str.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let candidate = if has_scheme_separator(trimmed) {
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let parts = split_url(&candidate)?;

    let mut normalized = parts.origin();
    normalized.push_str(canonical_path(parts.path));

    if let Some(query) = parts.query.filter(|q| !q.is_empty()) {
        normalized.push('?');
        normalized.push_str(query);
    }

    Ok(normalized)
}

/// Validates an absolute `http`/`https` URL and splits it into parts
pub(crate) fn split_url(input: &str) -> Result<UrlParts<'_>, UrlError> {
    let url = Url::parse(input).map_err(|e| UrlError::Parse(format!("{}: {}", input, e)))?;

    let scheme = url.scheme().to_ascii_lowercase();
    if scheme != "http" && scheme != "https" {
        return Err(UrlError::InvalidScheme(scheme));
    }

    let Some((_, after_scheme)) = input.split_once("://") else {
        return Err(UrlError::Parse(format!("{}: missing '://'", input)));
    };

    let without_fragment = after_scheme.split('#').next().unwrap_or_default();
    let (before_query, query) = match without_fragment.split_once('?') {
        Some((before, query)) => (before, Some(query)),
        None => (without_fragment, None),
    };
    let (authority, path) = match before_query.find(|c: char| c == '/' || c == '\\') {
        Some(idx) => before_query.split_at(idx),
        None => (before_query, ""),
    };

    let host = authority_host(authority).to_lowercase();
    if host.is_empty() || url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(UrlParts {
        scheme,
        host,
        port: url.port(),
        path,
        query,
    })
}

/// The host of an authority, without userinfo or port
fn authority_host(authority: &str) -> &str {
    let host_port = authority
        .rsplit_once('@')
        .map_or(authority, |(_, host_port)| host_port);

    if host_port.starts_with('[') {
        // IPv6 literal
        host_port
            .find(']')
            .map_or(host_port, |end| &host_port[..=end])
    } else {
        host_port.split(':').next().unwrap_or_default()
    }
}

/// Returns true when the string starts with `scheme://`
fn has_scheme_separator(s: &str) -> bool {
    let Some((scheme, _)) = s.split_once("://") else {
        return false;
    };
    is_scheme(scheme)
}

/// Checks RFC 3986 scheme syntax: ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )
pub(crate) fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        _ => false,
    }
}

/// Root stays `/`; every other path loses its trailing slashes
fn canonical_path(path: &str) -> &str {
    let stripped = path.trim_end_matches('/');
    if stripped.is_empty() {
        "/"
    } else {
        stripped
    }
}
