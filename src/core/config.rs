use crate::core::store::{
    extend_policy_map, PolicyMap, PolicyMutations, PolicyStore, RemovalMode,
};
use crate::core::validator::Validator;
use crate::error::CspError;
use crate::monitoring::stats::CspStats;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, sync::Arc};

/// Declarative policy configuration, e.g.
///
/// ```json
/// {
///   "enforce": { "default-src": "self", "img-src": ["self", "https://cdn.example.com"] },
///   "report-only": { "script-src": "self", "report-uri": "/csp-report" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PolicyDocument {
    #[serde(default)]
    pub enforce: PolicyMap,
    #[serde(default)]
    pub report_only: PolicyMap,
    #[serde(default)]
    pub removal_mode: RemovalMode,
}

impl PolicyDocument {
    pub fn from_json(json: &str) -> Result<Self, CspError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Shared middleware configuration: a validated seed store that every
/// request copies, plus runtime statistics.
///
/// The seed is validated before a `CspConfig` exists, so a malformed policy
/// fails at startup instead of on the first request.
#[derive(Clone)]
pub struct CspConfig {
    seed: Arc<ArcSwap<PolicyStore>>,
    validator: Validator,
    stats: Arc<CspStats>,
}

impl CspConfig {
    pub fn new(document: PolicyDocument) -> Result<Self, CspError> {
        CspConfigBuilder::new().document(document).build()
    }

    pub fn from_json(json: &str) -> Result<Self, CspError> {
        Self::new(PolicyDocument::from_json(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CspError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    fn compile_seed(validator: &Validator, document: &PolicyDocument) -> Result<PolicyStore, CspError> {
        PolicyStore::from_maps(validator.clone(), &document.enforce, &document.report_only)
            .map(|store| store.with_removal_mode(document.removal_mode))
    }

    /// A fresh request-scoped store seeded with the configured policies.
    #[inline]
    pub fn store(&self) -> PolicyStore {
        self.seed.load().as_ref().clone()
    }

    #[inline]
    pub fn seed(&self) -> Arc<PolicyStore> {
        self.seed.load_full()
    }

    /// Runs one compilation pass: copy the seed, apply `mutations`.
    pub fn compile(&self, mutations: Option<&PolicyMutations>) -> Result<PolicyStore, CspError> {
        self.stats.increment_compile_count();

        let mut store = self.store();
        if let Some(mutations) = mutations {
            if let Err(e) = store.apply(mutations) {
                self.stats.increment_compile_failure_count();
                return Err(e);
            }
        }
        Ok(store)
    }

    /// Swaps in a new seed. The current seed stays active if `document` is
    /// invalid.
    pub fn reload(&self, document: PolicyDocument) -> Result<(), CspError> {
        let store = Self::compile_seed(&self.validator, &document)?;
        self.seed.store(Arc::new(store));
        self.stats.increment_policy_update_count();
        log::info!("CSP policy reloaded");
        Ok(())
    }

    pub fn reload_json(&self, json: &str) -> Result<(), CspError> {
        self.reload(PolicyDocument::from_json(json)?)
    }

    #[inline]
    pub fn stats(&self) -> &Arc<CspStats> {
        &self.stats
    }
}

#[derive(Debug, Default)]
pub struct CspConfigBuilder {
    document: PolicyDocument,
    validator: Option<Validator>,
    stats: Option<Arc<CspStats>>,
}

impl CspConfigBuilder {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn document(mut self, document: PolicyDocument) -> Self {
        self.document = document;
        self
    }

    pub fn enforce<I, V>(mut self, directive: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        extend_policy_map(&mut self.document.enforce, directive, values);
        self
    }

    pub fn report_only<I, V>(mut self, directive: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        extend_policy_map(&mut self.document.report_only, directive, values);
        self
    }

    #[inline]
    pub fn removal_mode(mut self, mode: RemovalMode) -> Self {
        self.document.removal_mode = mode;
        self
    }

    #[inline]
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    #[inline]
    pub fn stats(mut self, stats: Arc<CspStats>) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn build(self) -> Result<CspConfig, CspError> {
        let validator = self.validator.unwrap_or_default();
        let seed = CspConfig::compile_seed(&validator, &self.document)?;

        Ok(CspConfig {
            seed: Arc::new(ArcSwap::from_pointee(seed)),
            validator,
            stats: self.stats.unwrap_or_else(|| Arc::new(CspStats::new())),
        })
    }
}
