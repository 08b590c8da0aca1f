//! Resource Implementations
//!
//! Each resource type supplies its attribute table, identity layout and the
//! four remote calls. The functions in this module drive those calls the
//! same way for every type: build the request with the mapper, run it under
//! the retry executor, encode the identity and read the result back.

pub mod alert_channel;
pub mod blocks;
pub mod cron_job;
pub mod file;
pub mod job;
pub mod mps_schedule;
pub mod project;
pub mod scenario;

use std::collections::BTreeMap;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use tccloud_common::{retry, CompositeId, Error, IdentityLayout, Result, RetryPolicy};

use crate::client::ApiClient;
use crate::mapper::{changed_attributes, flatten, is_absent, unflatten};
use crate::schema::{find, has_write_only, Attribute, Mutability, SchemaDoc};
use crate::state::{get_string_attr, string_value, DynamicValue};

/// Trait for resource operations
#[async_trait]
pub trait Resource: Send + Sync {
    /// Resource type name
    fn type_name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn attributes(&self) -> &'static [Attribute];

    /// Natural keys making up the composite id, in order
    fn identity(&self) -> IdentityLayout;

    /// Create the remote object and return its identity
    async fn create(&self, client: &ApiClient, request: Map<String, Value>) -> Result<CompositeId>;

    /// Fetch the current snapshot, `None` when the object does not exist
    async fn describe(&self, client: &ApiClient, id: &CompositeId) -> Result<Option<Value>>;

    /// Apply the `Mutable` attributes listed in `changed`
    async fn update(
        &self,
        client: &ApiClient,
        id: &CompositeId,
        request: Map<String, Value>,
        changed: &[&'static str],
    ) -> Result<()>;

    /// Delete the remote object
    async fn delete(&self, client: &ApiClient, id: &CompositeId) -> Result<()>;

    fn schema(&self) -> SchemaDoc {
        SchemaDoc {
            type_name: self.type_name(),
            description: self.description(),
            identity: self.identity().parts.to_vec(),
            attributes: self.attributes(),
        }
    }
}

/// Every resource type the provider serves.
pub fn registry() -> Vec<Box<dyn Resource>> {
    vec![
        Box::new(project::ProjectResource),
        Box::new(scenario::ScenarioResource),
        Box::new(job::JobResource),
        Box::new(file::FileResource),
        Box::new(cron_job::CronJobResource),
        Box::new(alert_channel::AlertChannelResource),
        Box::new(mps_schedule::MpsScheduleResource),
    ]
}

/// Retry budgets for one provider invocation.
#[derive(Debug, Clone)]
pub struct Budgets {
    pub read: RetryPolicy,
    pub write: RetryPolicy,
}

impl Default for Budgets {
    fn default() -> Self {
        Self {
            read: RetryPolicy::read(),
            write: RetryPolicy::write(),
        }
    }
}

/// Describe calls that answer a missing object with an error code rather
/// than an empty set.
fn is_missing(err: &Error) -> bool {
    err.is_not_found()
        || err
            .code()
            .is_some_and(|code| code == "ResourceNotFound" || code.starts_with("ResourceNotFound."))
}

fn op_name(resource: &dyn Resource, operation: &str) -> String {
    format!("{}.{}", resource.type_name(), operation)
}

/// Decode the `id` attribute of a state tree.
pub fn state_id(resource: &dyn Resource, state: &DynamicValue) -> Result<CompositeId> {
    let raw = get_string_attr(state, "id");
    if raw.is_empty() {
        return Err(Error::InvalidConfig(format!(
            "{} state has no id",
            resource.type_name()
        )));
    }
    resource.identity().decode(&raw)
}

/// Copy write-only values from `prior` into a freshly read tree.
///
/// Nested records are paired by `name` when they have one, otherwise by
/// position.
fn carry_write_only(
    attrs: &[Attribute],
    fields: &mut BTreeMap<String, DynamicValue>,
    prior: &DynamicValue,
) {
    for attr in attrs {
        if attr.write_only {
            if is_absent(fields.get(attr.name)) {
                if let Some(value) = prior.get(attr.name).filter(|v| !is_absent(Some(v))) {
                    fields.insert(attr.name.to_string(), value.clone());
                }
            }
            continue;
        }

        let Some(nested) = attr.kind.nested().filter(|n| has_write_only(n)) else {
            continue;
        };
        let Some(prior_records) = prior.get(attr.name).and_then(DynamicValue::as_list) else {
            continue;
        };
        let Some(DynamicValue::List(records)) = fields.get_mut(attr.name) else {
            continue;
        };
        for (index, record) in records.iter_mut().enumerate() {
            let matched = match record.get("name").and_then(DynamicValue::as_string) {
                Some(name) => prior_records
                    .iter()
                    .find(|p| p.get("name").and_then(DynamicValue::as_string) == Some(name)),
                None => prior_records.get(index),
            };
            if let (Some(prior_record), Some(record_fields)) = (matched, record.as_map_mut()) {
                carry_write_only(nested, record_fields, prior_record);
            }
        }
    }
}

/// Build the state tree for a snapshot.
///
/// Identity parts missing from the snapshot are filled from the id, and
/// write-only values are kept from `prior`.
fn snapshot_state(
    resource: &dyn Resource,
    id: &CompositeId,
    snapshot: &Value,
    prior: Option<&DynamicValue>,
) -> DynamicValue {
    let attrs = resource.attributes();
    let mut state = unflatten(attrs, snapshot);
    if let Some(fields) = state.as_map_mut() {
        let layout = resource.identity();
        for (name, value) in layout.parts.iter().zip(id.parts()) {
            if find(attrs, name).is_some() && is_absent(fields.get(*name)) {
                fields.insert(name.to_string(), string_value(value));
            }
        }

        if let Some(prior) = prior {
            carry_write_only(attrs, fields, prior);
        }

        fields.insert("id".to_string(), string_value(id.to_string()));
    }
    state
}

async fn describe_existing(
    resource: &dyn Resource,
    client: &ApiClient,
    policy: &RetryPolicy,
    id: &CompositeId,
) -> Result<Value> {
    let op = op_name(resource, "read");
    let snapshot = retry(policy, &op, || resource.describe(client, id)).await?;
    snapshot.ok_or_else(|| Error::not_found(resource.type_name(), id.to_string()))
}

/// Read after a write: an object that is not visible yet is lag, not loss.
async fn read_after_write(
    resource: &dyn Resource,
    client: &ApiClient,
    policy: &RetryPolicy,
    id: &CompositeId,
) -> Result<Value> {
    let op = op_name(resource, "read");
    retry(policy, &op, || async move {
        match resource.describe(client, id).await {
            Ok(Some(snapshot)) => Ok(snapshot),
            Ok(None) => Err(Error::Unstable(format!(
                "{} {} is not visible yet",
                resource.type_name(),
                id
            ))),
            Err(err) if is_missing(&err) => Err(Error::Unstable(err.to_string())),
            Err(err) => Err(err),
        }
    })
    .await
}

/// Create the resource described by `config` and return its new state.
pub async fn create(
    resource: &dyn Resource,
    client: &ApiClient,
    budgets: &Budgets,
    config: &DynamicValue,
) -> Result<DynamicValue> {
    let op = op_name(resource, "create");
    let started = Instant::now();
    info!("Creating {}", resource.type_name());

    let result = async {
        let request = flatten(resource.attributes(), config)?;
        let id = retry(&budgets.write, &op, || resource.create(client, request.clone())).await?;
        info!("Created {} {}", resource.type_name(), id);

        let snapshot = read_after_write(resource, client, &budgets.write, &id).await?;
        Ok(snapshot_state(resource, &id, &snapshot, Some(config)))
    }
    .await
    .map_err(|e: Error| e.context(op.clone()));

    debug!(operation = %op, elapsed_ms = started.elapsed().as_millis() as u64, "Finished");
    result
}

/// Refresh `prior` from the remote side. A vanished object is
/// [`Error::NotFound`].
pub async fn read(
    resource: &dyn Resource,
    client: &ApiClient,
    budgets: &Budgets,
    prior: &DynamicValue,
) -> Result<DynamicValue> {
    let op = op_name(resource, "read");
    let started = Instant::now();

    let result = async {
        let id = state_id(resource, prior)?;
        let snapshot = match describe_existing(resource, client, &budgets.read, &id).await {
            Err(err) if is_missing(&err) && !err.is_not_found() => {
                Err(Error::not_found(resource.type_name(), id.to_string()))
            }
            other => other,
        }?;
        Ok(snapshot_state(resource, &id, &snapshot, Some(prior)))
    }
    .await
    .map_err(|e: Error| e.context(op.clone()));

    debug!(operation = %op, elapsed_ms = started.elapsed().as_millis() as u64, "Finished");
    result
}

/// Reject changes the resource cannot apply in place.
pub fn check_mutability(resource: &dyn Resource, changed: &[&Attribute]) -> Result<()> {
    for attr in changed {
        match attr.mutability {
            Mutability::Immutable => {
                return Err(Error::ImmutableAttribute {
                    attribute: attr.name.to_string(),
                })
            }
            Mutability::ForceNew => {
                return Err(Error::InvalidConfig(format!(
                    "changing `{}` replaces the {}; destroy and create it instead",
                    attr.name,
                    resource.type_name()
                )))
            }
            Mutability::Mutable => {}
        }
    }
    Ok(())
}

/// Move the resource from `prior` to `planned`.
pub async fn update(
    resource: &dyn Resource,
    client: &ApiClient,
    budgets: &Budgets,
    prior: &DynamicValue,
    planned: &DynamicValue,
) -> Result<DynamicValue> {
    let op = op_name(resource, "update");
    let started = Instant::now();
    info!("Updating {}", resource.type_name());

    let result = async {
        let id = state_id(resource, prior)?;
        let attrs = resource.attributes();
        let changed = changed_attributes(attrs, prior, planned);
        check_mutability(resource, &changed)?;

        if changed.is_empty() {
            debug!("No attribute of {} changed", id);
        } else {
            let names: Vec<&'static str> = changed.iter().map(|a| a.name).collect();
            let request = flatten(attrs, planned)?;
            retry(&budgets.write, &op, || {
                resource.update(client, &id, request.clone(), &names)
            })
            .await?;
            info!("Updated {} {}: {}", resource.type_name(), id, names.join(", "));
        }

        let snapshot = read_after_write(resource, client, &budgets.write, &id).await?;
        Ok(snapshot_state(resource, &id, &snapshot, Some(planned)))
    }
    .await
    .map_err(|e: Error| e.context(op.clone()));

    debug!(operation = %op, elapsed_ms = started.elapsed().as_millis() as u64, "Finished");
    result
}

/// Delete the resource recorded in `prior`. Deleting something already
/// gone succeeds.
pub async fn delete(
    resource: &dyn Resource,
    client: &ApiClient,
    budgets: &Budgets,
    prior: &DynamicValue,
) -> Result<()> {
    let op = op_name(resource, "delete");
    let started = Instant::now();
    info!("Deleting {}", resource.type_name());

    let result = async {
        let id = state_id(resource, prior)?;
        match retry(&budgets.write, &op, || resource.delete(client, &id)).await {
            Err(err) if is_missing(&err) => {
                warn!("{} {} was already gone", resource.type_name(), id);
                Ok(())
            }
            other => other,
        }
    }
    .await
    .map_err(|e: Error| e.context(op.clone()));

    debug!(operation = %op, elapsed_ms = started.elapsed().as_millis() as u64, "Finished");
    result
}

/// Adopt an existing remote object given only its composite id.
pub async fn import(
    resource: &dyn Resource,
    client: &ApiClient,
    budgets: &Budgets,
    raw_id: &str,
) -> Result<DynamicValue> {
    let op = op_name(resource, "import");
    info!("Importing {} {}", resource.type_name(), raw_id);

    async {
        let id = resource.identity().decode(raw_id)?;
        let snapshot = describe_existing(resource, client, &budgets.read, &id).await?;
        Ok(snapshot_state(resource, &id, &snapshot, None))
    }
    .await
    .map_err(|e: Error| e.context(op))
}

/// Fetch a required identity part by name.
pub(crate) fn id_part<'a>(layout: &IdentityLayout, id: &'a CompositeId, name: &str) -> Result<&'a str> {
    layout.get(id, name).ok_or_else(|| Error::IdentityCorrupt {
        id: id.to_string(),
        expected: layout.len(),
        found: id.parts().len(),
    })
}

/// Read a string field out of a flattened request.
pub(crate) fn request_str(request: &Map<String, Value>, api_name: &str) -> Result<String> {
    request
        .get(api_name)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::InvalidConfig(format!("`{}` is required", api_name)))
}
