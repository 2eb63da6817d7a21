use crate::constants::{DATA_SCHEME, NONE_KEYWORD, QUOTE, WILDCARD};
use crate::utils::BufferWriter;
use bytes::BytesMut;
use std::{borrow::Cow, fmt};

/// A single validated value of a directive.
///
/// Sources only come out of the [`Validator`](crate::core::Validator), so a
/// `Source` found in a policy always conforms to the grammar of the directive
/// that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// A directive keyword such as `self`, rendered single-quoted.
    Keyword(Cow<'static, str>),
    /// The bare `*`.
    Wildcard,
    /// The `data:` scheme marker.
    Data,
    /// A host expression, e.g. `https://*.example.com:8443`.
    Host(Cow<'static, str>),
    /// One of the `sandbox` allowances, rendered unquoted.
    SandboxFlag(Cow<'static, str>),
    /// An absolute or relative `report-uri` target.
    ReportUri(Cow<'static, str>),
}

impl Source {
    #[inline(always)]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self, Source::Wildcard)
    }

    #[inline(always)]
    pub const fn is_data(&self) -> bool {
        matches!(self, Source::Data)
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        self.keyword() == Some(NONE_KEYWORD)
    }

    #[inline]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.keyword() == Some(keyword)
    }

    /// The value as a policy author writes it, keywords unquoted.
    #[inline]
    pub fn raw(&self) -> &str {
        match self {
            Source::Keyword(value)
            | Source::Host(value)
            | Source::SandboxFlag(value)
            | Source::ReportUri(value) => value,
            Source::Wildcard => WILDCARD,
            Source::Data => DATA_SCHEME,
        }
    }

    /// Whether `value` names this source, comparing the way the validator
    /// accepted it: `data:` in any case, everything else exactly.
    #[inline]
    pub fn matches_raw(&self, value: &str) -> bool {
        match self {
            Source::Data => value.eq_ignore_ascii_case(DATA_SCHEME),
            other => other.raw() == value,
        }
    }

    #[inline]
    pub fn keyword(&self) -> Option<&str> {
        match self {
            Source::Keyword(keyword) => Some(keyword),
            _ => None,
        }
    }

    #[inline]
    pub fn host(&self) -> Option<&str> {
        match self {
            Source::Host(host) => Some(host),
            _ => None,
        }
    }

    #[inline]
    pub fn estimated_size(&self) -> usize {
        match self {
            Source::Keyword(keyword) => keyword.len() + 2 * QUOTE.len(),
            other => other.raw().len(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Keyword(keyword) => write!(f, "{}{}{}", QUOTE, keyword, QUOTE),
            other => f.write_str(other.raw()),
        }
    }
}

impl BufferWriter for Source {
    fn write_to_buffer(&self, buffer: &mut BytesMut) {
        match self {
            Source::Keyword(keyword) => {
                buffer.reserve(keyword.len() + 2 * QUOTE.len());
                buffer.extend_from_slice(QUOTE.as_bytes());
                buffer.extend_from_slice(keyword.as_bytes());
                buffer.extend_from_slice(QUOTE.as_bytes());
            }
            other => buffer.extend_from_slice(other.raw().as_bytes()),
        }
    }
}
