use crate::constants::{NONE_KEYWORD, WILDCARD};
use crate::core::directives::{Directive, DirectiveKind, DirectiveRule, DirectiveTable};
use crate::core::grammar;
use crate::core::source::Source;
use crate::error::CspError;
use indexmap::IndexSet;
use std::{borrow::Cow, sync::Arc};

/// Checks directive names and values against the CSP 1.0 grammar.
///
/// Validation is a pure transformation: the caller's values are read, never
/// touched, and a normalized [`Directive`] comes back. Keywords are turned
/// into [`Source::Keyword`] (quoted on render), expressions are kept verbatim.
#[derive(Debug, Clone)]
pub struct Validator {
    table: Arc<DirectiveTable>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(DirectiveTable::csp1())
    }
}

impl Validator {
    #[inline]
    pub fn new(table: Arc<DirectiveTable>) -> Self {
        Self { table }
    }

    #[inline]
    pub fn table(&self) -> &DirectiveTable {
        &self.table
    }

    pub fn validate<I, S>(&self, directive: &str, values: I) -> Result<Directive, CspError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (name, rule) = self
            .table
            .get_key_value(directive)
            .ok_or_else(|| rejected(CspError::UnknownDirective(directive.to_owned())))?;

        let values: IndexSet<String> = values
            .into_iter()
            .map(|value| value.as_ref().to_owned())
            .collect();

        let mut validated = Directive::new(name.clone());

        match rule.kind() {
            DirectiveKind::ReportUri => {
                for uri in values {
                    if !grammar::is_report_uri(&uri) {
                        return Err(rejected(CspError::InvalidReportUri(uri)));
                    }
                    validated.push(Source::ReportUri(Cow::Owned(uri)));
                }
            }
            DirectiveKind::Sandbox => {
                for keyword in values {
                    if !rule.is_keyword(&keyword) {
                        return Err(rejected(CspError::InvalidSandboxKeyword(keyword)));
                    }
                    validated.push(Source::SandboxFlag(Cow::Owned(keyword)));
                }
            }
            DirectiveKind::SourceList => {
                if values.len() > 1 {
                    check_exclusive(directive, rule, &values)?;
                }
                for value in values {
                    validated.push(source_value(directive, rule, value)?);
                }
            }
        }

        Ok(validated)
    }

    /// Whether `directive` is known at all.
    #[inline]
    pub fn is_known(&self, directive: &str) -> bool {
        self.table.contains(directive)
    }
}

fn check_exclusive(
    directive: &str,
    rule: &DirectiveRule,
    values: &IndexSet<String>,
) -> Result<(), CspError> {
    let exclusive = if rule.is_keyword(NONE_KEYWORD) && values.contains(NONE_KEYWORD) {
        Some(NONE_KEYWORD)
    } else if values.contains(WILDCARD) {
        Some(WILDCARD)
    } else {
        None
    };

    match exclusive {
        Some(value) => Err(rejected(CspError::ExclusivityViolation {
            directive: directive.to_owned(),
            value: value.to_owned(),
        })),
        None => Ok(()),
    }
}

fn source_value(directive: &str, rule: &DirectiveRule, value: String) -> Result<Source, CspError> {
    if rule.is_keyword(&value) {
        return Ok(Source::Keyword(Cow::Owned(value)));
    }
    if grammar::is_wildcard(&value) {
        return Ok(Source::Wildcard);
    }
    if grammar::is_data_scheme(&value) {
        return Ok(Source::Data);
    }
    if grammar::parse_host_source(&value).is_some() {
        return Ok(Source::Host(Cow::Owned(value)));
    }

    Err(rejected(CspError::InvalidSourceValue {
        directive: directive.to_owned(),
        value,
    }))
}

#[inline]
fn rejected(err: CspError) -> CspError {
    log::debug!("CSP policy rejected: {}", err);
    err
}
