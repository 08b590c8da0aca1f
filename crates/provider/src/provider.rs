//! Tencent Cloud Provider Implementation
//!
//! The entry points a configuration runtime calls. Every operation returns
//! its result together with diagnostics instead of failing outright, so the
//! runtime can show the user what went wrong and which attribute caused it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use tccloud_common::{Error, Result};

use crate::client::ApiClient;
use crate::config::ProviderConfig;
use crate::data_sources::{self, DataSource};
use crate::lifecycle::{Change, Lifecycle};
use crate::mapper::{changed_attributes, flatten, normalize};
use crate::resources::{self, Budgets, Resource};
use crate::schema::{Mutability, ProviderSchema, PROVIDER_ATTRIBUTES};
use crate::state::DynamicValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// A message for the user about one operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, err: &Error) -> Self {
        let attribute = match err.root() {
            Error::ImmutableAttribute { attribute } => Some(attribute.clone()),
            _ => None,
        };
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: err.to_string(),
            attribute,
        }
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

/// Whether any diagnostic is an error.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| d.severity == Severity::Error)
}

/// New state of a resource or data source. `Null` means there is none.
#[derive(Debug, Clone, Serialize)]
pub struct StateResponse {
    pub state: DynamicValue,
    pub diagnostics: Vec<Diagnostic>,
}

impl StateResponse {
    fn ok(state: DynamicValue) -> Self {
        Self {
            state,
            diagnostics: Vec::new(),
        }
    }

    fn failed(state: DynamicValue, diagnostic: Diagnostic) -> Self {
        Self {
            state,
            diagnostics: vec![diagnostic],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PlanResponse {
    pub change: Change,
    pub planned_state: DynamicValue,
    /// Attributes whose change replaces the resource.
    pub requires_replace: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Tencent Cloud Provider
pub struct TencentCloudProvider {
    client: RwLock<Option<Arc<ApiClient>>>,
    budgets: RwLock<Budgets>,
    resources: HashMap<&'static str, Box<dyn Resource>>,
    data_sources: HashMap<&'static str, Box<dyn DataSource>>,
}

impl Default for TencentCloudProvider {
    fn default() -> Self {
        Self::new()
    }
}

async fn timed<T>(operation: &'static str, type_name: &str, fut: impl std::future::Future<Output = T>) -> T {
    let span = info_span!("provider", op = operation, resource = type_name, log_id = %Uuid::new_v4());
    async {
        let started = Instant::now();
        let out = fut.await;
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "{} finished", operation);
        out
    }
    .instrument(span)
    .await
}

impl TencentCloudProvider {
    pub fn new() -> Self {
        Self {
            client: RwLock::new(None),
            budgets: RwLock::new(Budgets::default()),
            resources: resources::registry()
                .into_iter()
                .map(|r| (r.type_name(), r))
                .collect(),
            data_sources: data_sources::registry()
                .into_iter()
                .map(|d| (d.type_name(), d))
                .collect(),
        }
    }

    /// A provider that is already configured with `client`.
    pub fn with_client(client: ApiClient, budgets: Budgets) -> Self {
        Self {
            client: RwLock::new(Some(Arc::new(client))),
            budgets: RwLock::new(budgets),
            ..Self::new()
        }
    }

    fn resource(&self, type_name: &str) -> Result<&dyn Resource> {
        self.resources
            .get(type_name)
            .map(|r| r.as_ref())
            .ok_or_else(|| Error::UnsupportedType {
                kind: "resource".to_string(),
                name: type_name.to_string(),
            })
    }

    fn data_source(&self, type_name: &str) -> Result<&dyn DataSource> {
        self.data_sources
            .get(type_name)
            .map(|d| d.as_ref())
            .ok_or_else(|| Error::UnsupportedType {
                kind: "data source".to_string(),
                name: type_name.to_string(),
            })
    }

    async fn session(&self) -> Result<(Arc<ApiClient>, Budgets)> {
        let client = self
            .client
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::InvalidConfig("provider is not configured".to_string()))?;
        let budgets = self.budgets.read().await.clone();
        Ok((client, budgets))
    }

    pub fn schema(&self) -> ProviderSchema {
        let mut resources: Vec<_> = self.resources.values().map(|r| r.schema()).collect();
        resources.sort_by_key(|doc| doc.type_name);
        let mut data_sources: Vec<_> = self.data_sources.values().map(|d| d.schema()).collect();
        data_sources.sort_by_key(|doc| doc.type_name);

        ProviderSchema {
            provider: PROVIDER_ATTRIBUTES,
            resources,
            data_sources,
        }
    }

    /// Configure from the provider block alone, with environment fallback.
    pub async fn configure(&self, block: &DynamicValue) -> Vec<Diagnostic> {
        self.configure_with(ProviderConfig::default(), block).await
    }

    /// Configure from file settings overridden by the provider block. Settings
    /// still unset fall back to the environment.
    pub async fn configure_with(&self, mut config: ProviderConfig, block: &DynamicValue) -> Vec<Diagnostic> {
        timed("configure", "provider", async {
            info!("Configuring provider");
            let built = config
                .merge_block(block)
                .and_then(|_| {
                    config.apply_env();
                    ApiClient::from_config(&config)
                });

            match built {
                Ok(client) => {
                    *self.client.write().await = Some(Arc::new(client));
                    *self.budgets.write().await = Budgets {
                        read: config.read_policy(),
                        write: config.write_policy(),
                    };
                    info!("Provider configured for region {}", config.region());
                    Vec::new()
                }
                Err(e) => {
                    error!("Failed to configure provider: {}", e);
                    vec![Diagnostic::error("Invalid provider configuration", &e)]
                }
            }
        })
        .await
    }

    /// Static checks: required attributes, types and block sizes.
    pub fn validate_resource_config(&self, type_name: &str, config: &DynamicValue) -> Vec<Diagnostic> {
        match self.resource(type_name) {
            Ok(resource) => validate(resource.attributes(), config),
            Err(e) => vec![Diagnostic::error("Unsupported resource type", &e)],
        }
    }

    pub fn validate_data_source_config(&self, type_name: &str, config: &DynamicValue) -> Vec<Diagnostic> {
        match self.data_source(type_name) {
            Ok(source) => validate(source.attributes(), config),
            Err(e) => vec![Diagnostic::error("Unsupported data source type", &e)],
        }
    }

    /// Work out the state an apply would produce.
    pub fn plan_resource_change(
        &self,
        type_name: &str,
        prior: &DynamicValue,
        proposed: &DynamicValue,
    ) -> PlanResponse {
        let change = Change::between(Some(prior), Some(proposed));
        let mut response = PlanResponse {
            change,
            planned_state: DynamicValue::Null,
            requires_replace: Vec::new(),
            diagnostics: Vec::new(),
        };

        let resource = match self.resource(type_name) {
            Ok(resource) => resource,
            Err(e) => {
                response.diagnostics.push(Diagnostic::error("Unsupported resource type", &e));
                return response;
            }
        };
        if matches!(change, Change::Delete | Change::NoOp) {
            return response;
        }

        response.diagnostics = validate(resource.attributes(), proposed);
        let mut planned = normalized(resource, proposed);

        if change == Change::Update {
            for attr in changed_attributes(resource.attributes(), prior, proposed) {
                match attr.mutability {
                    Mutability::Mutable => {}
                    Mutability::ForceNew => response.requires_replace.push(attr.name.to_string()),
                    Mutability::Immutable => response.diagnostics.push(
                        Diagnostic::error(
                            "Attribute cannot be changed",
                            &Error::ImmutableAttribute {
                                attribute: attr.name.to_string(),
                            },
                        )
                        .with_attribute(attr.name),
                    ),
                }
            }

            // computed values survive an in-place update
            if response.requires_replace.is_empty() {
                if let (Some(fields), Some(prior_fields)) = (planned.as_map_mut(), prior.as_map()) {
                    for attr in resource.attributes().iter().filter(|a| !a.is_writable()) {
                        if let Some(value) = prior_fields.get(attr.name) {
                            fields.insert(attr.name.to_string(), value.clone());
                        }
                    }
                    if let Some(id) = prior_fields.get("id") {
                        fields.insert("id".to_string(), id.clone());
                    }
                }
            } else if let Some(fields) = planned.as_map_mut() {
                fields.remove("id");
            }
        }

        response.planned_state = planned;
        response
    }

    /// Make the remote side match `planned`.
    pub async fn apply_resource_change(
        &self,
        type_name: &str,
        prior: &DynamicValue,
        planned: &DynamicValue,
    ) -> StateResponse {
        timed("apply_resource_change", type_name, async {
            let resource = match self.resource(type_name) {
                Ok(resource) => resource,
                Err(e) => return StateResponse::failed(prior.clone(), Diagnostic::error("Unsupported resource type", &e)),
            };
            let (client, budgets) = match self.session().await {
                Ok(session) => session,
                Err(e) => return StateResponse::failed(prior.clone(), Diagnostic::error("Provider not configured", &e)),
            };

            let change = Change::between(Some(prior), Some(planned));
            let mut lifecycle = Lifecycle::new(type_name, change.initial_state());
            info!("Applying {:?} to {}", change, type_name);

            let result = match change {
                Change::NoOp => return StateResponse::ok(DynamicValue::Null),
                Change::Create => {
                    run(&mut lifecycle, change, resources::create(resource, &client, &budgets, planned)).await
                }
                Change::Delete => run(&mut lifecycle, change, async {
                    resources::delete(resource, &client, &budgets, prior)
                        .await
                        .map(|_| DynamicValue::Null)
                })
                .await,
                Change::Update if needs_replacement(resource, prior, planned) => {
                    info!("Replacing {}", type_name);
                    let deleted = run(&mut lifecycle, Change::Delete, async {
                        resources::delete(resource, &client, &budgets, prior)
                            .await
                            .map(|_| DynamicValue::Null)
                    })
                    .await;
                    match deleted {
                        Ok(_) => {
                            run(&mut lifecycle, Change::Create, resources::create(resource, &client, &budgets, planned))
                                .await
                        }
                        Err(e) => Err(e),
                    }
                }
                Change::Update => {
                    run(&mut lifecycle, change, resources::update(resource, &client, &budgets, prior, planned))
                        .await
                }
            };

            match result {
                Ok(state) => StateResponse::ok(state),
                Err(e) => {
                    error!("Failed to apply {}: {}", type_name, e);
                    // without rollback, the prior state is still the best record we have
                    let state = match lifecycle.state() {
                        crate::lifecycle::LifecycleState::CreateFailed => DynamicValue::Null,
                        _ => prior.clone(),
                    };
                    StateResponse::failed(state, Diagnostic::error("Failed to apply resource change", &e))
                }
            }
        })
        .await
    }

    /// Refresh a resource. A resource that is gone reads as null state.
    pub async fn read_resource(&self, type_name: &str, current: &DynamicValue) -> StateResponse {
        timed("read_resource", type_name, async {
            let resource = match self.resource(type_name) {
                Ok(resource) => resource,
                Err(e) => return StateResponse::failed(current.clone(), Diagnostic::error("Unsupported resource type", &e)),
            };
            let (client, budgets) = match self.session().await {
                Ok(session) => session,
                Err(e) => return StateResponse::failed(current.clone(), Diagnostic::error("Provider not configured", &e)),
            };

            match resources::read(resource, &client, &budgets, current).await {
                Ok(state) => StateResponse::ok(state),
                Err(e) if e.is_not_found() => {
                    warn!("{} is gone, removing it from state: {}", type_name, e);
                    StateResponse::failed(
                        DynamicValue::Null,
                        Diagnostic::warning("Resource not found", e.to_string()),
                    )
                }
                Err(e) => StateResponse::failed(current.clone(), Diagnostic::error("Failed to read resource", &e)),
            }
        })
        .await
    }

    /// Adopt an existing remote object by composite id.
    pub async fn import_resource_state(&self, type_name: &str, id: &str) -> StateResponse {
        timed("import_resource_state", type_name, async {
            let outcome = async {
                let resource = self.resource(type_name)?;
                let (client, budgets) = self.session().await?;
                resources::import(resource, &client, &budgets, id).await
            }
            .await;

            match outcome {
                Ok(state) => StateResponse::ok(state),
                Err(e) => StateResponse::failed(DynamicValue::Null, Diagnostic::error("Failed to import resource", &e)),
            }
        })
        .await
    }

    pub async fn read_data_source(&self, type_name: &str, config: &DynamicValue) -> StateResponse {
        timed("read_data_source", type_name, async {
            let outcome = async {
                let source = self.data_source(type_name)?;
                let (client, budgets) = self.session().await?;
                data_sources::read(source, &client, &budgets, config).await
            }
            .await;

            match outcome {
                Ok(read) => {
                    let mut response = StateResponse::ok(read.state);
                    if read.skipped > 0 {
                        response.diagnostics.push(Diagnostic::warning(
                            "Skipped malformed records",
                            format!("{} records did not match the API model", read.skipped),
                        ));
                    }
                    response
                }
                Err(e) => StateResponse::failed(DynamicValue::Null, Diagnostic::error("Failed to read data source", &e)),
            }
        })
        .await
    }
}

/// Run one step of an apply, moving the lifecycle along with it.
async fn run(
    lifecycle: &mut Lifecycle,
    change: Change,
    step: impl std::future::Future<Output = Result<DynamicValue>>,
) -> Result<DynamicValue> {
    lifecycle.begin(change)?;
    let result = step.await;
    lifecycle.finish(result.is_ok())?;
    result
}

fn needs_replacement(resource: &dyn Resource, prior: &DynamicValue, planned: &DynamicValue) -> bool {
    let changed = changed_attributes(resource.attributes(), prior, planned);
    changed.iter().any(|a| a.mutability == Mutability::ForceNew)
        && !changed.iter().any(|a| a.mutability == Mutability::Immutable)
}

fn normalized(resource: &dyn Resource, config: &DynamicValue) -> DynamicValue {
    match config {
        DynamicValue::Map(fields) => DynamicValue::Map(
            fields
                .iter()
                .map(|(key, value)| {
                    let value = match crate::schema::find(resource.attributes(), key) {
                        Some(attr) => normalize(attr, value),
                        None => value.clone(),
                    };
                    (key.clone(), value)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

fn validate(attrs: &[crate::schema::Attribute], config: &DynamicValue) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    if let Err(e) = flatten(attrs, config) {
        diagnostics.push(Diagnostic::error("Invalid configuration", &e));
    }
    if let Some(fields) = config.as_map() {
        for key in fields.keys().filter(|k| k.as_str() != "id") {
            if crate::schema::find(attrs, key).is_none() {
                diagnostics.push(
                    Diagnostic::warning("Unknown attribute", format!("`{}` is not part of the schema", key))
                        .with_attribute(key.clone()),
                );
            }
        }
    }
    diagnostics
}
