//! PTS cron job resource

use serde_json::{Map, Value};

use tccloud_common::{CompositeId, IdentityLayout, Result};

use super::{id_part, request_str, Resource};
use crate::api::pts::{CreateCronJobRequest, UpdateCronJobRequest};
use crate::api::{request_from, snapshot_of};
use crate::client::ApiClient;
use crate::schema::{Attribute, Kind};

const LAYOUT: IdentityLayout = IdentityLayout::new(&["project_id", "cron_job_id"]);

const ATTRIBUTES: &[Attribute] = &[
    Attribute::required("name", "Name", Kind::String),
    Attribute::required("project_id", "ProjectId", Kind::String).force_new(),
    Attribute::required("scenario_id", "ScenarioId", Kind::String),
    Attribute::required("scenario_name", "ScenarioName", Kind::String),
    Attribute::required("frequency_type", "FrequencyType", Kind::Int)
        .doc("1 once, 2 daily, 3 weekly, 4 advanced (cron expression)."),
    Attribute::required("cron_expression", "CronExpression", Kind::String),
    Attribute::required("job_owner", "JobOwner", Kind::String),
    Attribute::optional("end_time", "EndTime", Kind::String),
    Attribute::optional("notice_id", "NoticeId", Kind::String),
    Attribute::optional("note", "Note", Kind::String),
    Attribute::computed("cron_job_id", "CronJobId", Kind::String),
    Attribute::computed("abort_reason", "AbortReason", Kind::Int),
    Attribute::computed("status", "Status", Kind::Int),
    Attribute::computed("created_at", "CreatedAt", Kind::String),
    Attribute::computed("updated_at", "UpdatedAt", Kind::String),
    Attribute::computed("app_id", "AppId", Kind::Int),
    Attribute::computed("uin", "Uin", Kind::String),
    Attribute::computed("sub_account_uin", "SubAccountUin", Kind::String),
];

pub struct CronJobResource;

#[async_trait::async_trait]
impl Resource for CronJobResource {
    fn type_name(&self) -> &'static str {
        "tencentcloud_pts_cron_job"
    }

    fn description(&self) -> &'static str {
        "A schedule that starts jobs for a PTS scenario."
    }

    fn attributes(&self) -> &'static [Attribute] {
        ATTRIBUTES
    }

    fn identity(&self) -> IdentityLayout {
        LAYOUT
    }

    async fn create(&self, client: &ApiClient, request: Map<String, Value>) -> Result<CompositeId> {
        let project_id = request_str(&request, "ProjectId")?;
        let request: CreateCronJobRequest = request_from(request)?;
        let cron_job_id = client.pts().create_cron_job(&request).await?;
        LAYOUT.encode(&[project_id, cron_job_id])
    }

    async fn describe(&self, client: &ApiClient, id: &CompositeId) -> Result<Option<Value>> {
        let project_id = id_part(&LAYOUT, id, "project_id")?;
        let cron_job_id = id_part(&LAYOUT, id, "cron_job_id")?;
        match client.pts().describe_cron_job(project_id, cron_job_id).await? {
            Some(cron_job) => Ok(Some(snapshot_of(&cron_job)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        client: &ApiClient,
        id: &CompositeId,
        request: Map<String, Value>,
        _changed: &[&'static str],
    ) -> Result<()> {
        let mut request: UpdateCronJobRequest = request_from(request)?;
        request.project_id = Some(id_part(&LAYOUT, id, "project_id")?.to_string());
        request.cron_job_id = Some(id_part(&LAYOUT, id, "cron_job_id")?.to_string());
        client.pts().update_cron_job(&request).await
    }

    async fn delete(&self, client: &ApiClient, id: &CompositeId) -> Result<()> {
        let project_id = id_part(&LAYOUT, id, "project_id")?;
        let cron_job_id = id_part(&LAYOUT, id, "cron_job_id")?;
        client.pts().delete_cron_job(project_id, cron_job_id).await
    }
}
