//! PTS job resource
//!
//! Creating a job starts a load test run. Deleting one that is still running
//! aborts it before removing the record.

use serde_json::{Map, Value};
use tracing::info;

use tccloud_common::{CompositeId, Error, IdentityLayout, Result};

use super::blocks::{
    DOMAIN_NAME_CONFIG, FILE_INFO, LOAD, LOAD_SOURCE, NOTIFICATION_HOOK, SCRIPT_INFO, TEST_DATA,
};
use super::{id_part, request_str, Resource};
use crate::api::pts::{StartJobRequest, UpdateJobRequest, JOB_ACTIVE_STATUSES};
use crate::api::{request_from, snapshot_of};
use crate::client::ApiClient;
use crate::schema::{Attribute, Kind, Scalar};

const LAYOUT: IdentityLayout = IdentityLayout::new(&["project_id", "scenario_id", "job_id"]);

const STRINGS: Kind = Kind::List(Scalar::String);

const ATTRIBUTES: &[Attribute] = &[
    Attribute::required("scenario_id", "ScenarioId", Kind::String).force_new(),
    Attribute::required("job_owner", "JobOwner", Kind::String).immutable(),
    Attribute::required("project_id", "ProjectId", Kind::String).force_new(),
    Attribute::optional("debug", "Debug", Kind::Bool)
        .immutable()
        .write_only()
        .doc("Run in debug mode."),
    Attribute::optional("note", "Note", Kind::String),
    Attribute::computed("job_id", "JobId", Kind::String),
    Attribute::computed("load", "Load", Kind::Block(LOAD)),
    Attribute::computed("configs", "Configs", STRINGS),
    Attribute::computed("datasets", "Datasets", Kind::BlockList(TEST_DATA)),
    Attribute::computed("extensions", "Extensions", STRINGS),
    Attribute::computed("status", "Status", Kind::Int).doc("Run status; see the PTS job status codes."),
    Attribute::computed("start_time", "StartTime", Kind::String),
    Attribute::computed("end_time", "EndTime", Kind::String),
    Attribute::computed("max_virtual_user_count", "MaxVirtualUserCount", Kind::Int),
    Attribute::computed("error_rate", "ErrorRate", Kind::Float),
    Attribute::computed("load_sources", "LoadSources", Kind::Block(LOAD_SOURCE)),
    Attribute::computed("duration", "Duration", Kind::Int),
    Attribute::computed("max_requests_per_second", "MaxRequestsPerSecond", Kind::Int),
    Attribute::computed("request_total", "RequestTotal", Kind::Float),
    Attribute::computed("requests_per_second", "RequestsPerSecond", Kind::Float),
    Attribute::computed("response_time_average", "ResponseTimeAverage", Kind::Float),
    Attribute::computed("response_time_p99", "ResponseTimeP99", Kind::Float),
    Attribute::computed("response_time_p95", "ResponseTimeP95", Kind::Float),
    Attribute::computed("response_time_p90", "ResponseTimeP90", Kind::Float),
    Attribute::computed("response_time_max", "ResponseTimeMax", Kind::Float),
    Attribute::computed("response_time_min", "ResponseTimeMin", Kind::Float),
    Attribute::computed("test_scripts", "TestScripts", Kind::BlockList(SCRIPT_INFO)),
    Attribute::computed("protocols", "Protocols", Kind::BlockList(FILE_INFO)),
    Attribute::computed("request_files", "RequestFiles", Kind::BlockList(FILE_INFO)),
    Attribute::computed("plugins", "Plugins", Kind::BlockList(FILE_INFO)),
    Attribute::computed("cron_id", "CronId", Kind::String),
    Attribute::computed("type", "Type", Kind::String),
    Attribute::computed("domain_name_config", "DomainNameConfig", Kind::Block(DOMAIN_NAME_CONFIG)),
    Attribute::computed("abort_reason", "AbortReason", Kind::Int),
    Attribute::computed("created_at", "CreatedAt", Kind::String),
    Attribute::computed("notification_hooks", "NotificationHooks", Kind::BlockList(NOTIFICATION_HOOK)),
    Attribute::computed("network_receive_rate", "NetworkReceiveRate", Kind::Float),
    Attribute::computed("network_send_rate", "NetworkSendRate", Kind::Float),
    Attribute::computed("message", "Message", Kind::String),
];

pub struct JobResource;

struct JobKey<'a> {
    project_id: &'a str,
    scenario_id: &'a str,
    job_id: &'a str,
}

fn job_key(id: &CompositeId) -> Result<JobKey<'_>> {
    Ok(JobKey {
        project_id: id_part(&LAYOUT, id, "project_id")?,
        scenario_id: id_part(&LAYOUT, id, "scenario_id")?,
        job_id: id_part(&LAYOUT, id, "job_id")?,
    })
}

#[async_trait::async_trait]
impl Resource for JobResource {
    fn type_name(&self) -> &'static str {
        "tencentcloud_pts_job"
    }

    fn description(&self) -> &'static str {
        "One run of a PTS scenario."
    }

    fn attributes(&self) -> &'static [Attribute] {
        ATTRIBUTES
    }

    fn identity(&self) -> IdentityLayout {
        LAYOUT
    }

    async fn create(&self, client: &ApiClient, request: Map<String, Value>) -> Result<CompositeId> {
        let project_id = request_str(&request, "ProjectId")?;
        let scenario_id = request_str(&request, "ScenarioId")?;
        let request: StartJobRequest = request_from(request)?;
        let job_id = client.pts().start_job(&request).await?;
        LAYOUT.encode(&[project_id, scenario_id, job_id])
    }

    async fn describe(&self, client: &ApiClient, id: &CompositeId) -> Result<Option<Value>> {
        let key = job_key(id)?;
        match client
            .pts()
            .describe_job(key.project_id, key.scenario_id, key.job_id)
            .await?
        {
            Some(job) => Ok(Some(snapshot_of(&job)?)),
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
        if let Some(name) = changed.iter().find(|name| **name != "note") {
            return Err(Error::ImmutableAttribute {
                attribute: name.to_string(),
            });
        }

        let key = job_key(id)?;
        let update = UpdateJobRequest {
            job_id: Some(key.job_id.to_string()),
            project_id: Some(key.project_id.to_string()),
            scenario_id: Some(key.scenario_id.to_string()),
            note: request.get("Note").and_then(Value::as_str).map(str::to_string),
        };
        client.pts().update_job(&update).await
    }

    async fn delete(&self, client: &ApiClient, id: &CompositeId) -> Result<()> {
        let key = job_key(id)?;
        let pts = client.pts();

        let job = pts
            .describe_job(key.project_id, key.scenario_id, key.job_id)
            .await?;
        let running = job
            .and_then(|job| job.status)
            .is_some_and(|status| JOB_ACTIVE_STATUSES.contains(&status));
        if running {
            info!("Aborting running job {}", id);
            pts.abort_job(key.project_id, key.scenario_id, key.job_id)
                .await?;
        }

        pts.delete_job(key.project_id, key.scenario_id, key.job_id)
            .await
    }
}
