//! A GraphQL gateway over the Rick and Morty REST API.
//!
//! Queries are resolved lazily against the upstream: a field is only fetched
//! when the client selects it.

#![warn(unreachable_pub)]

mod axum_factory;
mod configuration;
pub mod error;
mod executable;
pub mod graph;
mod router;
pub mod upstream;

pub use crate::configuration::Configuration;
pub use crate::configuration::ConfigurationError;
pub use crate::executable::Executable;
pub use crate::executable::main;
pub use crate::router::GatewayRouter;
pub use crate::router::ShutdownKind;
