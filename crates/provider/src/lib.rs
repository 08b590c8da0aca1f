//! tccloud Provider
//!
//! Tencent Cloud PTS and MPS resources for a declarative configuration
//! runtime. Resources are attribute tables plus four remote calls; the
//! provider drives them through the retry executor, the field mapper and the
//! composite identity codec.

pub mod api;
pub mod client;
pub mod config;
pub mod data_sources;
pub mod lifecycle;
pub mod mapper;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod state;
pub mod transport;

pub use client::{ApiClient, Service, Transport};
pub use config::ProviderConfig;
pub use provider::{Diagnostic, PlanResponse, Severity, StateResponse, TencentCloudProvider};
pub use resources::Budgets;
pub use state::DynamicValue;
