#[path = "../helpers/mod.rs"]
mod helpers;

mod csp;
mod negotiate;
