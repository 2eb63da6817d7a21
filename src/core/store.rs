use crate::constants::{SCOPE_ALL, SCOPE_BOTH, SCOPE_ENFORCE, SCOPE_REPORT_ONLY};
use crate::core::directives::Directive;
use crate::core::policy::CspPolicy;
use crate::core::validator::Validator;
use crate::error::CspError;
use crate::middleware::negotiate::HeaderPair;
use actix_web::http::header::{HeaderName, HeaderValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::{fmt, str::FromStr};

const OP_CLEAR: &str = "clear";
const OP_ADD: &str = "addToPolicy";
const OP_REMOVE: &str = "removeFromPolicy";

/// Which of the two policies an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Enforce,
    ReportOnly,
    /// Both policies. Only meaningful for `clear`.
    All,
}

impl Scope {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Scope::Enforce => SCOPE_ENFORCE,
            Scope::ReportOnly => SCOPE_REPORT_ONLY,
            Scope::All => SCOPE_ALL,
        }
    }

    /// Parses a scope name, reporting `operation` on failure.
    pub fn parse(operation: &str, value: &str) -> Result<Self, CspError> {
        match value {
            SCOPE_ENFORCE => Ok(Scope::Enforce),
            SCOPE_REPORT_ONLY => Ok(Scope::ReportOnly),
            SCOPE_ALL | SCOPE_BOTH => Ok(Scope::All),
            _ => Err(invalid_scope(operation, value)),
        }
    }

    #[inline]
    const fn includes_enforce(&self) -> bool {
        matches!(self, Scope::Enforce | Scope::All)
    }

    #[inline]
    const fn includes_report_only(&self) -> bool {
        matches!(self, Scope::ReportOnly | Scope::All)
    }
}

impl FromStr for Scope {
    type Err = CspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse("scope", s)
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What `remove` subtracts from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RemovalMode {
    /// Only the policy named by the scope, mirroring `add`.
    #[default]
    Scoped,
    /// Both policies whatever the scope, for configurations written against
    /// that older behavior.
    BothPolicies,
}

/// Author-supplied values of one directive. Deserializes from a single string
/// or a list of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "OneOrMany")]
pub struct SourceValues(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl From<OneOrMany> for SourceValues {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::One(single) => Self(vec![single]),
            OneOrMany::Many(values) => Self(values),
        }
    }
}

impl SourceValues {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn extend<I, V>(&mut self, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.0.extend(values.into_iter().map(Into::into));
    }
}

impl<V: Into<String>> FromIterator<V> for SourceValues {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<Vec<String>> for SourceValues {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

/// Directive name to author values, in declaration order.
pub type PolicyMap = IndexMap<String, SourceValues>;

/// Appends `values` to `directive` in `map`, creating the entry if needed.
pub fn extend_policy_map<I, V>(map: &mut PolicyMap, directive: impl Into<String>, values: I)
where
    I: IntoIterator<Item = V>,
    V: Into<String>,
{
    map.entry(directive.into()).or_default().extend(values);
}

/// Mutations requested for a single compilation pass.
///
/// Scopes stay strings here because they arrive from request metadata; an
/// unknown one surfaces as [`CspError::InvalidScope`] when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyMutations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear: Option<String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub remove_from_policy: IndexMap<String, PolicyMap>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub add_to_policy: IndexMap<String, PolicyMap>,
}

impl PolicyMutations {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self, scope: Scope) -> &mut Self {
        self.clear = Some(scope.as_str().to_owned());
        self
    }

    pub fn add<I, V>(&mut self, scope: Scope, directive: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let map = self
            .add_to_policy
            .entry(scope.as_str().to_owned())
            .or_default();
        extend_policy_map(map, directive, values);
        self
    }

    pub fn remove<I, V>(&mut self, scope: Scope, directive: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let map = self
            .remove_from_policy
            .entry(scope.as_str().to_owned())
            .or_default();
        extend_policy_map(map, directive, values);
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clear.is_none() && self.remove_from_policy.is_empty() && self.add_to_policy.is_empty()
    }
}

/// Owns the enforce and report-only policies of one compilation pass.
///
/// Every committed change has been validated, so both policies can be
/// rendered at any time. A store is request-scoped; hand each request its
/// own copy.
#[derive(Debug, Clone, Default)]
pub struct PolicyStore {
    enforce: CspPolicy,
    report_only: CspPolicy,
    validator: Validator,
    removal_mode: RemovalMode,
}

impl PolicyStore {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_validator(validator: Validator) -> Self {
        Self {
            validator,
            ..Self::default()
        }
    }

    #[inline]
    pub fn with_removal_mode(mut self, mode: RemovalMode) -> Self {
        self.removal_mode = mode;
        self
    }

    /// Seeds a store from the two initial mappings, validating both.
    pub fn from_maps(
        validator: Validator,
        enforce: &PolicyMap,
        report_only: &PolicyMap,
    ) -> Result<Self, CspError> {
        let mut store = Self::with_validator(validator);
        store.add(Scope::Enforce, enforce)?;
        store.add(Scope::ReportOnly, report_only)?;
        Ok(store)
    }

    #[inline]
    pub fn enforce(&self) -> &CspPolicy {
        &self.enforce
    }

    #[inline]
    pub fn report_only(&self) -> &CspPolicy {
        &self.report_only
    }

    #[inline]
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    #[inline]
    pub fn removal_mode(&self) -> RemovalMode {
        self.removal_mode
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.enforce.is_empty() && self.report_only.is_empty()
    }

    pub fn clear(&mut self, scope: Scope) -> &mut Self {
        log::debug!("clearing CSP policy scope '{}'", scope);
        if scope.includes_enforce() {
            self.enforce.clear();
        }
        if scope.includes_report_only() {
            self.report_only.clear();
        }
        self
    }

    /// Merges `partial` into the policy named by `scope`.
    ///
    /// Each merged directive is revalidated as a whole. Nothing is committed
    /// unless every directive of `partial` passes.
    pub fn add(&mut self, scope: Scope, partial: &PolicyMap) -> Result<(), CspError> {
        let target = match scope {
            Scope::Enforce => &self.enforce,
            Scope::ReportOnly => &self.report_only,
            Scope::All => return Err(invalid_scope(OP_ADD, scope.as_str())),
        };

        let mut staged: SmallVec<[Directive; 8]> = SmallVec::with_capacity(partial.len());
        for (name, values) in partial {
            let existing = target
                .get_directive(name)
                .into_iter()
                .flat_map(Directive::raw_values);
            let merged = existing.chain(values.iter());
            staged.push(self.validator.validate(name, merged)?);
        }

        let target = match scope {
            Scope::Enforce => &mut self.enforce,
            _ => &mut self.report_only,
        };
        for directive in staged {
            target.insert(directive);
        }

        log::debug!("added {} directive(s) to CSP policy scope '{}'", partial.len(), scope);
        Ok(())
    }

    /// Subtracts `partial` from the targeted policy. A directive left without
    /// values is deleted.
    pub fn remove(&mut self, scope: Scope, partial: &PolicyMap) -> Result<(), CspError> {
        if scope == Scope::All {
            return Err(invalid_scope(OP_REMOVE, scope.as_str()));
        }

        let targets = match self.removal_mode {
            RemovalMode::Scoped => scope,
            RemovalMode::BothPolicies => Scope::All,
        };

        for (name, values) in partial {
            if targets.includes_enforce() {
                self.enforce.subtract(name, values.as_slice());
            }
            if targets.includes_report_only() {
                self.report_only.subtract(name, values.as_slice());
            }
        }

        log::debug!("removed from CSP policy scope '{}'", targets);
        Ok(())
    }

    /// Applies clear, then remove, then add. All or nothing: on error the
    /// store keeps its previous state.
    pub fn apply(&mut self, mutations: &PolicyMutations) -> Result<(), CspError> {
        let mut staged = self.clone();

        if let Some(scope) = &mutations.clear {
            staged.clear(Scope::parse(OP_CLEAR, scope)?);
        }
        for (scope, partial) in &mutations.remove_from_policy {
            staged.remove(Scope::parse(OP_REMOVE, scope)?, partial)?;
        }
        for (scope, partial) in &mutations.add_to_policy {
            staged.add(Scope::parse(OP_ADD, scope)?, partial)?;
        }

        *self = staged;
        Ok(())
    }

    /// Header name/value pairs for every non-empty policy.
    pub fn headers(&self, names: &HeaderPair) -> Result<Vec<(HeaderName, HeaderValue)>, CspError> {
        let mut headers = Vec::with_capacity(2);

        if let Some(value) = self.enforce.header_value()? {
            headers.push((names.enforce().clone(), value));
        }
        if let Some(value) = self.report_only.header_value()? {
            headers.push((names.report_only().clone(), value));
        }

        Ok(headers)
    }
}

#[inline]
fn invalid_scope(operation: &str, scope: &str) -> CspError {
    CspError::InvalidScope {
        operation: operation.to_owned(),
        scope: scope.to_owned(),
    }
}
