use percent_encoding::percent_decode_str;
use shared::domain::SessionId;

/// Source of the page's `document.cookie` style header.
pub trait CookieSource: Send + Sync {
    fn cookie_header(&self) -> Option<String>;
}

/// Looks up `name` in a `a=1; b=2` cookie header.
///
/// The cookie must occur exactly once; duplicates are treated as absent. The
/// value runs up to the next `;` and is percent-decoded. A value that does not
/// decode to UTF-8 is treated as absent.
pub fn read_cookie(header: &str, name: &str) -> Option<String> {
    let haystack = format!("; {header}");
    let needle = format!("; {name}=");
    let mut parts = haystack.split(needle.as_str());
    parts.next()?;
    let tail = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let raw = tail.split(';').next().unwrap_or_default();
    percent_decode_str(raw)
        .decode_utf8()
        .ok()
        .map(|value| value.into_owned())
}

/// Reads the session identifier cookie. Empty values count as missing.
pub fn session_id(source: &dyn CookieSource, name: &str) -> Option<SessionId> {
    let header = source.cookie_header()?;
    read_cookie(&header, name)
        .filter(|value| !value.is_empty())
        .map(SessionId)
}
