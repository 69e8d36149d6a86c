use axum::http::{header::COOKIE, HeaderMap};
use std::collections::HashMap;

use super::access_mode::AccessMode;
use crate::filter::SearchFilters;

pub const PUBLIC_FILTERS_COOKIE: &str = "duech_filters";
pub const EDITOR_FILTERS_COOKIE: &str = "duech_editor_filters";

/// Saved filters live for 30 days
pub const FILTERS_MAX_AGE_SECS: i64 = 30 * 24 * 60 * 60;

/// Attributes for a `Set-Cookie` value. `Path=/` and `SameSite=Lax` are always set.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub max_age: Option<i64>,
}

/// All cookies sent with the request. Pairs without a name or `=` are skipped.
pub fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| {
            let (name, value) = pair.split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

pub fn get_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    parse_cookies(headers).remove(name)
}

pub fn build_set_cookie(name: &str, value: &str, options: CookieOptions) -> String {
    let mut cookie = format!("{}={}; Path=/; SameSite=Lax", name, value);
    if let Some(max_age) = options.max_age {
        cookie.push_str(&format!("; Max-Age={}", max_age.max(0)));
    }
    if options.http_only {
        cookie.push_str("; HttpOnly");
    }
    if options.secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn expire_cookie(name: &str, http_only: bool, secure: bool) -> String {
    build_set_cookie(name, "", CookieOptions { http_only, secure, max_age: Some(0) })
}

pub fn filters_cookie_name(mode: AccessMode) -> &'static str {
    match mode {
        AccessMode::Public => PUBLIC_FILTERS_COOKIE,
        AccessMode::Editor => EDITOR_FILTERS_COOKIE,
    }
}

/// Filters saved by an earlier search. An unreadable cookie counts as no cookie.
pub fn read_filters(headers: &HeaderMap, mode: AccessMode) -> Option<SearchFilters> {
    let name = filters_cookie_name(mode);
    let raw = get_cookie(headers, name)?;
    if raw.is_empty() {
        return None;
    }

    let decoded = match urlencoding::decode(&raw) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::debug!("Ignoring {} cookie: {}", name, e);
            return None;
        }
    };
    match serde_json::from_str::<SearchFilters>(&decoded) {
        Ok(filters) if mode == AccessMode::Public => Some(filters.without_editor_fields()),
        Ok(filters) => Some(filters),
        Err(e) => {
            tracing::debug!("Ignoring {} cookie: {}", name, e);
            None
        }
    }
}

pub fn filters_cookie(filters: &SearchFilters, mode: AccessMode, secure: bool) -> Option<String> {
    let json = serde_json::to_string(filters).ok()?;
    let options = CookieOptions { http_only: false, secure, max_age: Some(FILTERS_MAX_AGE_SECS) };
    Some(build_set_cookie(filters_cookie_name(mode), &urlencoding::encode(&json), options))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn parses_pairs_and_skips_junk() {
        let cookies = parse_cookies(&headers("a=1; junk; =empty; b = two ;c=\"q\""));
        assert_eq!(cookies.get("a").map(String::as_str), Some("1"));
        assert_eq!(cookies.get("b").map(String::as_str), Some("two"));
        assert_eq!(cookies.get("c").map(String::as_str), Some("q"));
        assert_eq!(cookies.len(), 3);
    }

    #[test]
    fn builds_set_cookie_attributes() {
        let cookie = build_set_cookie(
            "duech_session",
            "tok",
            CookieOptions { http_only: true, secure: true, max_age: Some(60) },
        );
        assert_eq!(cookie, "duech_session=tok; Path=/; SameSite=Lax; Max-Age=60; HttpOnly; Secure");
        assert_eq!(expire_cookie("x", false, false), "x=; Path=/; SameSite=Lax; Max-Age=0");
    }

    #[test]
    fn filters_survive_the_cookie() {
        let filters = SearchFilters {
            query: Some("año nuevo".into()),
            categories: vec!["loc. sust.".into()],
            letters: vec!['ñ'],
            ..Default::default()
        };
        let set_cookie = filters_cookie(&filters, AccessMode::Public, false).unwrap();
        assert!(set_cookie.starts_with("duech_filters="));
        assert!(set_cookie.contains("Max-Age=2592000"));

        let value = set_cookie.split(';').next().unwrap();
        assert_eq!(read_filters(&headers(value), AccessMode::Public), Some(filters));
        // Editor searches keep their own cookie
        assert_eq!(read_filters(&headers(value), AccessMode::Editor), None);
    }

    #[test]
    fn public_cookie_drops_editor_fields() {
        let raw = urlencoding::encode(r#"{"query":"fome","status":"draft"}"#).into_owned();
        let read = read_filters(&headers(&format!("duech_filters={}", raw)), AccessMode::Public).unwrap();
        assert_eq!(read.query.as_deref(), Some("fome"));
        assert_eq!(read.status, None);
    }

    #[test]
    fn garbage_cookie_is_ignored() {
        assert_eq!(read_filters(&headers("duech_filters=%7Bnot-json"), AccessMode::Public), None);
        assert_eq!(read_filters(&headers("duech_filters=%FF%FE"), AccessMode::Public), None);
    }
}
