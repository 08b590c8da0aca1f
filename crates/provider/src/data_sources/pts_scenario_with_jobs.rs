//! PTS scenarios together with their recent jobs

use serde_json::{Map, Value};

use tccloud_common::Result;

use super::{DataSource, RESULT_OUTPUT_FILE};
use crate::api::pts::{DescribeScenarioWithJobsRequest, ScenarioWithJobs};
use crate::api::{request_from, snapshot_of};
use crate::client::ApiClient;
use crate::resources::blocks::{
    DOMAIN_NAME_CONFIG, FILE_INFO, LOAD, LOAD_SOURCE, NOTIFICATION_HOOK, SCRIPT_INFO, SLA_POLICY,
    TEST_DATA,
};
use crate::schema::{Attribute, Kind, Scalar};

const STRINGS: Kind = Kind::List(Scalar::String);

const RELATED_JOBS_PARAMS: &[Attribute] = &[
    Attribute::optional("offset", "Offset", Kind::Int),
    Attribute::optional("limit", "Limit", Kind::Int),
    Attribute::optional("order_by", "OrderBy", Kind::String),
    Attribute::optional("ascend", "Ascend", Kind::Bool),
];

const SCENARIO: &[Attribute] = &[
    Attribute::computed("scenario_id", "ScenarioId", Kind::String),
    Attribute::computed("name", "Name", Kind::String),
    Attribute::computed("description", "Description", Kind::String),
    Attribute::computed("type", "Type", Kind::String),
    Attribute::computed("status", "Status", Kind::Int),
    Attribute::computed("load", "Load", Kind::Block(LOAD)),
    Attribute::computed("encoded_scripts", "EncodedScripts", Kind::String),
    Attribute::computed("configs", "Configs", STRINGS),
    Attribute::computed("extensions", "Extensions", STRINGS),
    Attribute::computed("datasets", "Datasets", Kind::BlockList(TEST_DATA)),
    Attribute::computed("sla_id", "SLAId", Kind::String),
    Attribute::computed("cron_id", "CronId", Kind::String),
    Attribute::computed("created_at", "CreatedAt", Kind::String),
    Attribute::computed("updated_at", "UpdatedAt", Kind::String),
    Attribute::computed("project_id", "ProjectId", Kind::String),
    Attribute::computed("app_id", "AppId", Kind::Int),
    Attribute::computed("uin", "Uin", Kind::String),
    Attribute::computed("sub_account_uin", "SubAccountUin", Kind::String),
    Attribute::computed("test_scripts", "TestScripts", Kind::BlockList(SCRIPT_INFO)),
    Attribute::computed("protocols", "Protocols", Kind::BlockList(FILE_INFO)),
    Attribute::computed("request_files", "RequestFiles", Kind::BlockList(FILE_INFO)),
    Attribute::computed("sla_policy", "SLAPolicy", Kind::Block(SLA_POLICY)),
    Attribute::computed("plugins", "Plugins", Kind::BlockList(FILE_INFO)),
    Attribute::computed("domain_name_config", "DomainNameConfig", Kind::Block(DOMAIN_NAME_CONFIG)),
    Attribute::computed("notification_hooks", "NotificationHooks", Kind::BlockList(NOTIFICATION_HOOK)),
    Attribute::computed("owner", "Owner", Kind::String),
    Attribute::computed("project_name", "ProjectName", Kind::String),
];

const JOB: &[Attribute] = &[
    Attribute::computed("job_id", "JobId", Kind::String),
    Attribute::computed("scenario_id", "ScenarioId", Kind::String),
    Attribute::computed("load", "Load", Kind::Block(LOAD)),
    Attribute::computed("configs", "Configs", STRINGS),
    Attribute::computed("datasets", "Datasets", Kind::BlockList(TEST_DATA)),
    Attribute::computed("extensions", "Extensions", STRINGS),
    Attribute::computed("status", "Status", Kind::Int),
    Attribute::computed("start_time", "StartTime", Kind::String),
    Attribute::computed("end_time", "EndTime", Kind::String),
    Attribute::computed("max_virtual_user_count", "MaxVirtualUserCount", Kind::Int),
    Attribute::computed("note", "Note", Kind::String),
    Attribute::computed("error_rate", "ErrorRate", Kind::Float),
    Attribute::computed("job_owner", "JobOwner", Kind::String),
    Attribute::computed("load_sources", "LoadSources", Kind::Block(LOAD_SOURCE)),
    Attribute::computed("duration", "Duration", Kind::Int),
    Attribute::computed("max_requests_per_second", "MaxRequestsPerSecond", Kind::Int),
    Attribute::computed("request_total", "RequestTotal", Kind::Float),
    Attribute::computed("requests_per_second", "RequestsPerSecond", Kind::Float),
    Attribute::computed("response_time_average", "ResponseTimeAverage", Kind::Float),
    Attribute::computed("response_time_p99", "ResponseTimeP99", Kind::Float),
    Attribute::computed("response_time_p95", "ResponseTimeP95", Kind::Float),
    Attribute::computed("response_time_p90", "ResponseTimeP90", Kind::Float),
    Attribute::computed("scripts", "Scripts", STRINGS),
    Attribute::computed("response_time_max", "ResponseTimeMax", Kind::Float),
    Attribute::computed("response_time_min", "ResponseTimeMin", Kind::Float),
    Attribute::computed("load_source_infos", "LoadSourceInfos", Kind::BlockList(LOAD_SOURCE)),
    Attribute::computed("test_scripts", "TestScripts", Kind::BlockList(SCRIPT_INFO)),
    Attribute::computed("protocols", "Protocols", Kind::BlockList(FILE_INFO)),
    Attribute::computed("request_files", "RequestFiles", Kind::BlockList(FILE_INFO)),
    Attribute::computed("plugins", "Plugins", Kind::BlockList(FILE_INFO)),
    Attribute::computed("cron_id", "CronId", Kind::String),
    Attribute::computed("type", "Type", Kind::String),
    Attribute::computed("domain_name_config", "DomainNameConfig", Kind::Block(DOMAIN_NAME_CONFIG)),
    Attribute::computed("debug", "Debug", Kind::Bool),
    Attribute::computed("abort_reason", "AbortReason", Kind::Int),
    Attribute::computed("created_at", "CreatedAt", Kind::String),
    Attribute::computed("project_id", "ProjectId", Kind::String),
    Attribute::computed("notification_hooks", "NotificationHooks", Kind::BlockList(NOTIFICATION_HOOK)),
    Attribute::computed("network_receive_rate", "NetworkReceiveRate", Kind::Float),
    Attribute::computed("network_send_rate", "NetworkSendRate", Kind::Float),
    Attribute::computed("message", "Message", Kind::String),
    Attribute::computed("project_name", "ProjectName", Kind::String),
    Attribute::computed("scenario_name", "ScenarioName", Kind::String),
];

const SCENARIO_WITH_JOBS: &[Attribute] = &[
    Attribute::computed("scenario", "Scenario", Kind::Block(SCENARIO)),
    Attribute::computed("jobs", "Jobs", Kind::BlockList(JOB)),
];

const ATTRIBUTES: &[Attribute] = &[
    Attribute::required("project_ids", "ProjectIds", STRINGS),
    Attribute::optional("scenario_ids", "ScenarioIds", STRINGS),
    Attribute::optional("scenario_name", "ScenarioName", Kind::String),
    Attribute::optional("scenario_status", "ScenarioStatus", Kind::Int),
    Attribute::optional("order_by", "OrderBy", Kind::String),
    Attribute::optional("ascend", "Ascend", Kind::Bool),
    Attribute::optional(
        "scenario_related_jobs_params",
        "ScenarioRelatedJobsParams",
        Kind::Block(RELATED_JOBS_PARAMS),
    )
    .doc("Which jobs to return with each scenario."),
    Attribute::optional("ignore_script", "IgnoreScript", Kind::Bool),
    Attribute::optional("ignore_dataset", "IgnoreDataset", Kind::Bool),
    Attribute::optional("scenario_type", "ScenarioType", Kind::String),
    Attribute::optional("owner", "Owner", Kind::String),
    Attribute::local(RESULT_OUTPUT_FILE, Kind::String).doc("File to write the results to."),
    Attribute::computed(
        "scenario_with_jobs_set",
        "ScenarioWithJobsSet",
        Kind::BlockList(SCENARIO_WITH_JOBS),
    ),
];

pub struct PtsScenarioWithJobsDataSource;

#[async_trait::async_trait]
impl DataSource for PtsScenarioWithJobsDataSource {
    fn type_name(&self) -> &'static str {
        "tencentcloud_pts_scenario_with_jobs"
    }

    fn description(&self) -> &'static str {
        "Lists PTS scenarios with their related jobs."
    }

    fn attributes(&self) -> &'static [Attribute] {
        ATTRIBUTES
    }

    fn result_attribute(&self) -> &'static str {
        "scenario_with_jobs_set"
    }

    fn record_attributes(&self) -> &'static [Attribute] {
        SCENARIO_WITH_JOBS
    }

    async fn fetch(&self, client: &ApiClient, filter: Map<String, Value>) -> Result<Vec<Value>> {
        let filter: DescribeScenarioWithJobsRequest = request_from(filter)?;
        client.pts().describe_scenario_with_jobs(&filter).await
    }

    fn parse_record(&self, raw: Value) -> Result<Value> {
        let record: ScenarioWithJobs = serde_json::from_value(raw)?;
        snapshot_of(&record)
    }

    fn record_id(&self, record: &Value) -> Option<String> {
        record
            .pointer("/Scenario/ScenarioId")
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}
