//! Magpie - a defensive client layer for OpenAI-compatible chat APIs
//!
//! This crate provides:
//! - A normalizer that turns whatever a provider sent back into one
//!   uniform completion shape, including reassembly of serialized SSE
//!   streams served as plain bodies
//! - Diagnostics attached to every failure log record
//! - A thin non-streaming chat client over raw HTTP

pub mod auth;
pub mod config;
pub mod error;
pub mod provider;
pub mod response;
pub mod telemetry;

pub use auth::AuthConfig;
pub use config::Config;
pub use error::{ClientError, ResponseError};
pub use provider::{ChatClient, ProviderConfig, RequestOptions};
pub use response::{normalize, NormalizedOutput, RawResponse, ResponseDetails};
pub use telemetry::Telemetry;
