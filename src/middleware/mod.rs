pub mod csp;
pub mod extensions;
pub mod negotiate;

pub use csp::{csp_middleware, CspMiddleware, CspMiddlewareService};
pub use extensions::CspExtensions;
pub use negotiate::{negotiate, HeaderPair, HeaderVariant};
