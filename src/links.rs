//! URL helpers: joining dashboard links and snapshot file naming

use crate::error::{ReviewError, Result};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Everything except unreserved characters and `/` is escaped
const PATH_QUOTE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Percent-encode everything except unreserved characters and `/`
pub fn quote(input: &str) -> String {
    utf8_percent_encode(input, PATH_QUOTE).to_string()
}

/// Decode `%XX` escapes; malformed escapes are kept literally
pub fn unquote(input: &str) -> String {
    percent_decode_str(input).decode_utf8_lossy().into_owned()
}

/// Convert a URL to an unambiguous file name
///
/// ```
/// use openqa_review::links::url_to_filename;
///
/// assert_eq!(
///     url_to_filename("http://openqa.opensuse.org/tests/foo/3"),
///     "http%3A::openqa.opensuse.org:tests:foo:3"
/// );
/// ```
pub fn url_to_filename(url: &str) -> String {
    quote(url).replace('/', ":")
}

/// Inverse of [`url_to_filename`]
pub fn filename_to_url(name: &str) -> String {
    unquote(&name.replace(':', "/"))
}

/// Resolve `reference` against `base` the way a browser resolves a link
///
/// # Errors
/// `InvalidUrl` if `base` is not an absolute URL or `reference` cannot be
/// resolved against it.
pub fn join_url(base: &str, reference: &str) -> Result<String> {
    let base_url = Url::parse(base).map_err(|source| ReviewError::InvalidUrl {
        url: base.to_string(),
        source,
    })?;
    let joined = base_url
        .join(reference)
        .map_err(|source| ReviewError::InvalidUrl {
            url: reference.to_string(),
            source,
        })?;
    Ok(joined.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOT: &str = "https://openqa.opensuse.org/";

    #[test]
    fn test_filename_round_trip() {
        let url = "http://openqa.opensuse.org/tests/foo/3";
        assert_eq!(filename_to_url(&url_to_filename(url)), url);
    }

    #[test]
    fn test_quote_query_characters() {
        assert_eq!(
            quote("/tests/overview?build=0123&groupid=1"),
            "/tests/overview%3Fbuild%3D0123%26groupid%3D1"
        );
        assert_eq!(quote("Build 12@x"), "Build%2012%40x");
    }

    #[test]
    fn test_unquote_malformed_kept() {
        assert_eq!(unquote("100%"), "100%");
        assert_eq!(unquote("a%zzb"), "a%zzb");
        assert_eq!(unquote("a%40b"), "a@b");
    }

    #[test]
    fn test_join_host_relative() {
        assert_eq!(join_url(ROOT, "/tests/1").unwrap(), "https://openqa.opensuse.org/tests/1");
        assert_eq!(
            join_url("https://openqa.opensuse.org/base/", "/tests/1").unwrap(),
            "https://openqa.opensuse.org/tests/1"
        );
    }

    #[test]
    fn test_join_path_relative() {
        assert_eq!(
            join_url("https://openqa.opensuse.org/base/", "tests/1").unwrap(),
            "https://openqa.opensuse.org/base/tests/1"
        );
        assert_eq!(
            join_url("https://openqa.opensuse.org", "tests/1").unwrap(),
            "https://openqa.opensuse.org/tests/1"
        );
    }

    #[test]
    fn test_join_parent_segments() {
        assert_eq!(
            join_url("https://openqa.opensuse.org/group_overview/1", "../tests/1").unwrap(),
            "https://openqa.opensuse.org/tests/1"
        );
    }

    #[test]
    fn test_join_scheme_relative() {
        assert_eq!(
            join_url(ROOT, "//cdn.example.org/tests/1").unwrap(),
            "https://cdn.example.org/tests/1"
        );
    }

    #[test]
    fn test_join_query_only() {
        assert_eq!(
            join_url("https://openqa.opensuse.org/tests/overview", "?build=0002").unwrap(),
            "https://openqa.opensuse.org/tests/overview?build=0002"
        );
    }

    #[test]
    fn test_join_absolute_reference() {
        assert_eq!(
            join_url("https://a.example/", "https://b.example/tests/2").unwrap(),
            "https://b.example/tests/2"
        );
    }

    #[test]
    fn test_join_rejects_relative_base() {
        let err = join_url("openqa.opensuse.org", "/tests/1").unwrap_err();
        assert!(matches!(err, ReviewError::InvalidUrl { ref url, .. } if url == "openqa.opensuse.org"));
    }
}
