//! Application services: one module per use-case.

pub mod joke_lookup;
pub mod scenario;
