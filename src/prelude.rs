pub use crate::core::{
    CspConfig, CspConfigBuilder, CspPolicy, PolicyDocument, PolicyMutations, PolicyStore, Scope,
    Source, Validator,
};
pub use crate::error::CspError;
pub use crate::middleware::{csp_middleware, CspExtensions, CspMiddleware, HeaderPair};
