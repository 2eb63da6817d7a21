use crate::constants::{DEFAULT_BUFFER_CAPACITY, DIRECTIVE_TERMINATOR};
use crate::core::directives::Directive;
use crate::error::CspError;
use crate::utils::BufferWriter;
use actix_web::http::header::HeaderValue;
use bytes::BytesMut;
use indexmap::IndexMap;
use std::{borrow::Cow, fmt};

/// One CSP policy: directives in insertion order, each holding validated
/// sources.
///
/// Only [`PolicyStore`](crate::core::PolicyStore) mutates a policy, so every
/// directive in here went through the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CspPolicy {
    directives: IndexMap<Cow<'static, str>, Directive>,
}

impl CspPolicy {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a directive, keeping its original position.
    pub(crate) fn insert(&mut self, directive: Directive) -> &mut Self {
        match self.directives.get_mut(directive.name()) {
            Some(existing) => *existing = directive,
            None => {
                let name = Cow::Owned(directive.name().to_owned());
                self.directives.insert(name, directive);
            }
        }
        self
    }

    /// Removes `values` from `name`, dropping the directive once nothing is left.
    pub(crate) fn subtract<S: AsRef<str>>(&mut self, name: &str, values: &[S]) -> &mut Self {
        if let Some(directive) = self.directives.get_mut(name) {
            directive.subtract(values);
            if directive.is_empty() {
                self.directives.shift_remove(name);
            }
        }
        self
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        self.directives.clear();
    }

    #[inline]
    pub fn get_directive(&self, name: &str) -> Option<&Directive> {
        self.directives.get(name)
    }

    #[inline]
    pub fn directives(&self) -> impl Iterator<Item = &Directive> {
        self.directives.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// The header value, e.g. `default-src 'self';img-src *;`.
    ///
    /// An empty policy renders to an empty string; callers should not emit
    /// a header for it at all.
    #[inline]
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// The rendered policy as a header value, or `None` for an empty policy.
    pub fn header_value(&self) -> Result<Option<HeaderValue>, CspError> {
        if self.is_empty() {
            return Ok(None);
        }

        let mut buffer = BytesMut::with_capacity(self.estimated_size().max(DEFAULT_BUFFER_CAPACITY));
        self.write_to_buffer(&mut buffer);

        HeaderValue::from_maybe_shared(buffer.freeze())
            .map(Some)
            .map_err(|e| CspError::HeaderError(format!("Failed to create header value: {}", e)))
    }

    #[inline]
    pub fn estimated_size(&self) -> usize {
        self.directives
            .values()
            .map(|d| d.estimated_size() + DIRECTIVE_TERMINATOR.len())
            .sum()
    }
}

impl fmt::Display for CspPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for directive in self.directives.values() {
            write!(f, "{};", directive)?;
        }
        Ok(())
    }
}

impl BufferWriter for CspPolicy {
    fn write_to_buffer(&self, buffer: &mut BytesMut) {
        for directive in self.directives.values() {
            directive.write_to_buffer(buffer);
            buffer.extend_from_slice(DIRECTIVE_TERMINATOR);
        }
    }
}
