pub mod constants;
pub mod core;
pub mod error;
pub mod middleware;
pub mod monitoring;
pub mod prelude;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::{
    CspConfig, CspConfigBuilder, CspPolicy, Directive, DirectiveTable, PolicyDocument, PolicyMap,
    PolicyMutations, PolicyStore, RemovalMode, Scope, Source, SourceValues, Validator,
};
pub use crate::error::CspError;
pub use crate::middleware::{
    csp_middleware, negotiate, CspExtensions, CspMiddleware, HeaderPair, HeaderVariant,
};
pub use crate::monitoring::{CspStats, PerformanceTimer};
