//! Catalog REST API Module
//!
//! Layers, leaves first: bearer token providers, an HTTP transport with
//! retry handling, a static route table, and a typed client that reads and
//! writes glossary entities through them.

pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod resilience;
pub mod rest;
pub mod routes;

pub use auth::{AccessToken, AuthProvider, StaticTokenProvider, TokenExpiry};
pub use client::{CatalogClient, ListOptions};
pub use error::ApiError;
pub use models::{
    CreateGlossaryRequest, CreateGlossaryTermRequest, Entity, EntityList, EntityReference,
    Glossary, GlossaryTerm, Payload, Resource, TagLabel,
};
pub use resilience::{ResilienceConfig, RetryConfig};
pub use rest::{ClientConfig, Outcome, RestClient};
