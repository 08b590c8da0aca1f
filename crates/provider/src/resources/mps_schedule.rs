//! MPS schedule resource
//!
//! A schedule watches a bucket and runs a workflow of activities on every
//! uploaded file.

use serde_json::{Map, Value};

use tccloud_common::{CompositeId, Error, IdentityLayout, Result};

use super::blocks::{ACTIVITY, TASK_NOTIFY_CONFIG, TASK_OUTPUT_STORAGE, WORKFLOW_TRIGGER};
use super::{id_part, Resource};
use crate::api::mps::{CreateScheduleRequest, ModifyScheduleRequest};
use crate::api::{request_from, snapshot_of};
use crate::client::ApiClient;
use crate::schema::{Attribute, Kind};

const LAYOUT: IdentityLayout = IdentityLayout::new(&["schedule_id"]);

const ATTRIBUTES: &[Attribute] = &[
    Attribute::required("schedule_name", "ScheduleName", Kind::String),
    Attribute::required("trigger", "Trigger", Kind::Block(WORKFLOW_TRIGGER))
        .doc("Event source that starts the workflow."),
    Attribute::required("activities", "Activities", Kind::BlockList(ACTIVITY))
        .doc("Workflow steps; `reardrive_index` links them into a graph."),
    Attribute::optional("output_storage", "OutputStorage", Kind::Block(TASK_OUTPUT_STORAGE)),
    Attribute::optional("output_dir", "OutputDir", Kind::String),
    Attribute::optional("task_notify_config", "TaskNotifyConfig", Kind::Block(TASK_NOTIFY_CONFIG)),
    Attribute::optional("resource_id", "ResourceId", Kind::String).immutable(),
    Attribute::computed("schedule_id", "ScheduleId", Kind::Int),
    Attribute::computed("status", "Status", Kind::String),
    Attribute::computed("create_time", "CreateTime", Kind::String),
    Attribute::computed("update_time", "UpdateTime", Kind::String),
];

/// Schedule ids are numeric on the wire.
fn schedule_id(id: &CompositeId) -> Result<i64> {
    let raw = id_part(&LAYOUT, id, "schedule_id")?;
    raw.parse()
        .map_err(|_| Error::InvalidIdentity(format!("schedule id `{}` is not a number", raw)))
}

pub struct MpsScheduleResource;

#[async_trait::async_trait]
impl Resource for MpsScheduleResource {
    fn type_name(&self) -> &'static str {
        "tencentcloud_mps_schedule"
    }

    fn description(&self) -> &'static str {
        "An MPS orchestration schedule."
    }

    fn attributes(&self) -> &'static [Attribute] {
        ATTRIBUTES
    }

    fn identity(&self) -> IdentityLayout {
        LAYOUT
    }

    async fn create(&self, client: &ApiClient, request: Map<String, Value>) -> Result<CompositeId> {
        let request: CreateScheduleRequest = request_from(request)?;
        let schedule_id = client.mps().create_schedule(&request).await?;
        LAYOUT.encode(&[schedule_id.to_string()])
    }

    async fn describe(&self, client: &ApiClient, id: &CompositeId) -> Result<Option<Value>> {
        let schedule_id = schedule_id(id)?;
        match client.mps().describe_schedule(schedule_id).await? {
            Some(schedule) => Ok(Some(snapshot_of(&schedule)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        client: &ApiClient,
        id: &CompositeId,
        request: Map<String, Value>,
        changed: &[&'static str],
    ) -> Result<()> {
        let full: ModifyScheduleRequest = request_from(request)?;
        let changed = |name: &str| changed.iter().any(|c| *c == name);

        // ModifySchedule only touches the fields it is given.
        let request = ModifyScheduleRequest {
            schedule_id: Some(schedule_id(id)?),
            schedule_name: full.schedule_name.filter(|_| changed("schedule_name")),
            trigger: full.trigger.filter(|_| changed("trigger")),
            activities: full.activities.filter(|_| changed("activities")),
            output_storage: full.output_storage.filter(|_| changed("output_storage")),
            output_dir: full.output_dir.filter(|_| changed("output_dir")),
            task_notify_config: full.task_notify_config.filter(|_| changed("task_notify_config")),
            resource_id: None,
        };
        client.mps().modify_schedule(&request).await
    }

    async fn delete(&self, client: &ApiClient, id: &CompositeId) -> Result<()> {
        client.mps().delete_schedule(schedule_id(id)?).await
    }
}
