//! Anchored CSP 1.0 value grammars, written as small composable rules.
//!
//! ```text
//! source-expression = "*" / "data:" / host-source
//! host-source       = [ scheme ] ( ipv6 / [ "*." ] domain ) [ port ]
//! report-uri        = [ scheme ] ( ipv6 / domain ) [ port ] [ path-query ]
//!                   / path-query
//! scheme            = "http://" / "https://"
//! domain            = 1*( ALPHA / DIGIT / "-" / "." / pct-encoded )  ; no leading "."
//!                     ; must contain "." or be "localhost"
//! ipv6              = "[" *( 0*4HEXDIG ":" ) 0*4HEXDIG "]"          ; at least one ":"
//! port              = ":" 1*DIGIT
//! path-query        = "/" *( unreserved / sub-delims / gen-delims / pct-encoded )
//! ```
//!
//! Every comparison is ASCII case-insensitive. Each rule takes the remaining
//! input and returns what it consumed together with what is left, so a value
//! only matches when the composed rules leave nothing behind. There is no
//! credential component: `user:pass@host` can never match.

use crate::constants::{DATA_SCHEME, WILDCARD};
use crate::utils::strip_prefix_ignore_case;

const LOCALHOST: &str = "localhost";
const HTTP_PREFIX: &str = "http://";
const HTTPS_PREFIX: &str = "https://";
const WILDCARD_LABEL: &str = "*.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    Http,
    Https,
}

/// The named components of a matched host source expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostSource<'a> {
    pub scheme: Option<Scheme>,
    pub wildcard: bool,
    pub host: &'a str,
    pub port: Option<&'a str>,
}

pub fn scheme(input: &str) -> Option<(Scheme, &str)> {
    if let Some(rest) = strip_prefix_ignore_case(input, HTTPS_PREFIX) {
        return Some((Scheme::Https, rest));
    }
    strip_prefix_ignore_case(input, HTTP_PREFIX).map(|rest| (Scheme::Http, rest))
}

/// Optional leading `*.` label.
pub fn wildcard_label(input: &str) -> (bool, &str) {
    match input.strip_prefix(WILDCARD_LABEL) {
        Some(rest) => (true, rest),
        None => (false, input),
    }
}

/// A domain-like token. The dot/`localhost` requirement is checked by the
/// caller since a wildcard label already satisfies it.
pub fn domain(input: &str) -> Option<(&str, &str)> {
    let bytes = input.as_bytes();
    let mut end = 0;

    while end < bytes.len() {
        match bytes[end] {
            b'%' if is_pct_encoded(&bytes[end..]) => end += 3,
            b'.' if end > 0 => end += 1,
            b if b.is_ascii_alphanumeric() || b == b'-' => end += 1,
            _ => break,
        }
    }

    if end == 0 {
        None
    } else {
        Some(input.split_at(end))
    }
}

/// A bracketed IPv6 literal, brackets included in the match.
pub fn ipv6(input: &str) -> Option<(&str, &str)> {
    let inner_start = input.strip_prefix('[')?;
    let close = inner_start.find(']')?;
    let inner = &inner_start[..close];

    let valid = inner.contains(':')
        && inner
            .split(':')
            .all(|group| group.len() <= 4 && group.bytes().all(|b| b.is_ascii_hexdigit()));

    if valid {
        Some(input.split_at(close + 2))
    } else {
        None
    }
}

/// `:<digits>`, returning the digits.
pub fn port(input: &str) -> Option<(&str, &str)> {
    let rest = input.strip_prefix(':')?;
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    Some(rest.split_at(digits))
}

/// `/` followed by RFC 3986 path and query characters.
pub fn path_query(input: &str) -> Option<(&str, &str)> {
    if !input.starts_with('/') {
        return None;
    }

    let bytes = input.as_bytes();
    let mut end = 1;

    while end < bytes.len() {
        match bytes[end] {
            b'%' if is_pct_encoded(&bytes[end..]) => end += 3,
            b if is_path_char(b) => end += 1,
            _ => break,
        }
    }

    Some(input.split_at(end))
}

/// `ipv6 / [ "*." ] domain`, returning `(wildcard, host, rest)`.
fn host(input: &str, allow_wildcard: bool) -> Option<(bool, &str, &str)> {
    if let Some((literal, rest)) = ipv6(input) {
        return Some((false, literal, rest));
    }

    let (wildcard, input) = if allow_wildcard {
        wildcard_label(input)
    } else {
        (false, input)
    };
    let (token, rest) = domain(input)?;

    if wildcard || token.contains('.') || token.eq_ignore_ascii_case(LOCALHOST) {
        Some((wildcard, token, rest))
    } else {
        None
    }
}

fn optional<'a, T>(
    input: &'a str,
    rule: impl Fn(&'a str) -> Option<(T, &'a str)>,
) -> (Option<T>, &'a str) {
    match rule(input) {
        Some((matched, rest)) => (Some(matched), rest),
        None => (None, input),
    }
}

pub fn parse_host_source(value: &str) -> Option<HostSource<'_>> {
    let (scheme, rest) = optional(value, scheme);
    let (wildcard, host, rest) = host(rest, true)?;
    let (port, rest) = optional(rest, port);

    if !rest.is_empty() {
        return None;
    }

    Some(HostSource {
        scheme,
        wildcard,
        host,
        port,
    })
}

#[inline]
pub fn is_wildcard(value: &str) -> bool {
    value == WILDCARD
}

#[inline]
pub fn is_data_scheme(value: &str) -> bool {
    value.eq_ignore_ascii_case(DATA_SCHEME)
}

pub fn is_source_expression(value: &str) -> bool {
    is_wildcard(value) || is_data_scheme(value) || parse_host_source(value).is_some()
}

pub fn is_report_uri(value: &str) -> bool {
    if value.starts_with('/') {
        return is_complete(path_query(value));
    }

    let (_, rest) = optional(value, scheme);
    let Some((_, _, rest)) = host(rest, false) else {
        return false;
    };
    let (_, rest) = optional(rest, port);

    rest.is_empty() || is_complete(path_query(rest))
}

#[inline]
fn is_complete<T>(matched: Option<(T, &str)>) -> bool {
    matches!(matched, Some((_, rest)) if rest.is_empty())
}

#[inline]
fn is_pct_encoded(bytes: &[u8]) -> bool {
    bytes.len() >= 3
        && bytes[0] == b'%'
        && bytes[1].is_ascii_hexdigit()
        && bytes[2].is_ascii_hexdigit()
}

#[inline]
fn is_path_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"_!#$&'()*+,./:;=?@[]~-".contains(&b)
}
