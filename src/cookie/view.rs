//! Read-only helpers over cookie collections.

use super::record::{parse_cookie_pair, parse_set_cookie, CookieRecord};
use hyper::header::{COOKIE, SET_COOKIE};
use hyper::{HeaderMap, Request, Response};

/// Parse every entry of an already-split header value list
///
/// Entries the parser rejects are skipped. Output order follows input order.
pub fn extract_from_header_list<'a, I, F>(raw_list: I, parser: F) -> Vec<CookieRecord>
where
    I: IntoIterator<Item = &'a str>,
    F: Fn(&str) -> Option<CookieRecord>,
{
    raw_list.into_iter().filter_map(parser).collect()
}

/// Cookies sent by the client, in header order
pub fn cookies_from_request<B>(req: &Request<B>) -> Vec<CookieRecord> {
    cookie_header_tokens(req.headers())
}

/// Cookies set by a response, one per `Set-Cookie` header
pub fn cookies_from_response<B>(res: &Response<B>) -> Vec<CookieRecord> {
    let values = res
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok());
    extract_from_header_list(values, parse_set_cookie)
}

/// Find a cookie by exact name; the last occurrence wins
pub fn lookup<'a>(cookies: &'a [CookieRecord], name: &str) -> Option<&'a CookieRecord> {
    cookies.iter().rev().find(|c| c.name == name)
}

fn cookie_header_tokens(headers: &HeaderMap) -> Vec<CookieRecord> {
    // Non-ASCII header values are dropped like any other malformed entry
    let tokens = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'));
    extract_from_header_list(tokens, parse_cookie_pair)
}
