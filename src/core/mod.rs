pub mod config;
pub mod directives;
pub mod grammar;
pub mod policy;
pub mod source;
pub mod store;
pub mod validator;

pub use config::{CspConfig, CspConfigBuilder, PolicyDocument};
pub use directives::{Directive, DirectiveKind, DirectiveRule, DirectiveTable, DirectiveTableBuilder};
pub use policy::CspPolicy;
pub use source::Source;
pub use store::{PolicyMap, PolicyMutations, PolicyStore, RemovalMode, Scope, SourceValues};
pub use validator::Validator;
