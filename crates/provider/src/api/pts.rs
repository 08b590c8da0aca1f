//! PTS (load testing) API, version 2021-07-28

use serde::Deserialize;
use serde_json::Value;

use tccloud_common::Result;

use super::missing_field;
use crate::client::{paginate, ApiClient, Service};

model!(TagSpec {
    tag_key: String,
    tag_value: String,
});

model!(Project {
    project_id: String,
    name: String,
    description: String,
    tags: Vec<TagSpec>,
    status: i64,
    created_at: String,
    updated_at: String,
    app_id: i64,
    uin: String,
    sub_account_uin: String,
});

model!(Stage {
    duration_seconds: i64,
    target_virtual_users: i64,
});

model!(Concurrency {
    stages: Vec<Stage>,
    iteration_count: i64,
    max_requests_per_second: i64,
    graceful_stop_seconds: i64,
    resources: i64,
});

model!(RequestsPerSecond {
    max_requests_per_second: i64,
    duration_seconds: i64,
    target_virtual_users: i64,
    resources: i64,
    start_requests_per_second: i64,
    target_requests_per_second: i64,
    graceful_stop_seconds: i64,
});

model!(ScriptOrigin {
    machine_number: i64,
    machine_specification: String,
    duration_seconds: i64,
});

model!(LoadSpec {
    concurrency: Concurrency,
    requests_per_second: RequestsPerSecond,
    script_origin: ScriptOrigin,
});

model!(VpcLoadDistribution {
    region_id: i64,
    region: String,
    vpc_id: String,
    subnet_ids: Vec<String>,
});

model!(GeoRegionsLoadItem {
    region_id: i64,
    region: String,
    percentage: i64,
});

model!(Load {
    load_spec: LoadSpec,
    vpc_load_distribution: VpcLoadDistribution,
    geo_regions_load_distribution: Vec<GeoRegionsLoadItem>,
});

model!(TestData {
    name: String,
    split: bool,
    header_in_file: bool,
    header_columns: Vec<String>,
    line_count: i64,
    updated_at: String,
    size: i64,
    head_lines: Vec<String>,
    tail_lines: Vec<String>,
    r#type: String,
    file_id: String,
});

model!(ScriptInfo {
    name: String,
    size: i64,
    r#type: String,
    updated_at: String,
    encoded_content: String,
    encoded_http_archive: String,
    load_weight: i64,
    file_id: String,
});

model!(FileInfo {
    name: String,
    size: i64,
    r#type: String,
    updated_at: String,
    file_id: String,
});

model!(SlaLabel {
    label_name: String,
    label_value: String,
});

model!(SlaRule {
    metric: String,
    aggregation: String,
    condition: String,
    value: f64,
    label_filter: Vec<SlaLabel>,
    abort_flag: bool,
    r#for: String,
});

model!(AlertChannel {
    notice_id: String,
    #[serde(rename = "AMPConsumerId")]
    amp_consumer_id: String,
});

model!(SlaPolicy {
    #[serde(rename = "SLARules")]
    sla_rules: Vec<SlaRule>,
    alert_channel: AlertChannel,
});

model!(HostAlias {
    host_names: Vec<String>,
    #[serde(rename = "IP")]
    ip: String,
});

model!(DnsConfig {
    nameservers: Vec<String>,
});

model!(DomainNameConfig {
    host_aliases: Vec<HostAlias>,
    #[serde(rename = "DNSConfig")]
    dns_config: DnsConfig,
});

model!(NotificationHook {
    events: Vec<String>,
    #[serde(rename = "URL")]
    url: String,
});

model!(Scenario {
    scenario_id: String,
    name: String,
    description: String,
    r#type: String,
    status: i64,
    load: Load,
    encoded_scripts: String,
    configs: Vec<String>,
    extensions: Vec<String>,
    datasets: Vec<TestData>,
    #[serde(rename = "SLAId")]
    sla_id: String,
    cron_id: String,
    created_at: String,
    updated_at: String,
    project_id: String,
    app_id: i64,
    uin: String,
    sub_account_uin: String,
    test_scripts: Vec<ScriptInfo>,
    protocols: Vec<FileInfo>,
    request_files: Vec<FileInfo>,
    #[serde(rename = "SLAPolicy")]
    sla_policy: SlaPolicy,
    plugins: Vec<FileInfo>,
    domain_name_config: DomainNameConfig,
    notification_hooks: Vec<NotificationHook>,
    owner: String,
    project_name: String,
});

model!(LoadSource {
    #[serde(rename = "IP")]
    ip: String,
    pod_name: String,
    region: String,
});

model!(Job {
    job_id: String,
    scenario_id: String,
    load: Load,
    configs: Vec<String>,
    datasets: Vec<TestData>,
    extensions: Vec<String>,
    status: i64,
    start_time: String,
    end_time: String,
    max_virtual_user_count: i64,
    note: String,
    error_rate: f64,
    job_owner: String,
    load_sources: LoadSource,
    duration: i64,
    max_requests_per_second: i64,
    request_total: f64,
    requests_per_second: f64,
    response_time_average: f64,
    response_time_p99: f64,
    response_time_p95: f64,
    response_time_p90: f64,
    scripts: Vec<String>,
    response_time_max: f64,
    response_time_min: f64,
    load_source_infos: Vec<LoadSource>,
    test_scripts: Vec<ScriptInfo>,
    protocols: Vec<FileInfo>,
    request_files: Vec<FileInfo>,
    plugins: Vec<FileInfo>,
    cron_id: String,
    r#type: String,
    domain_name_config: DomainNameConfig,
    debug: bool,
    abort_reason: i64,
    created_at: String,
    project_id: String,
    notification_hooks: Vec<NotificationHook>,
    network_receive_rate: f64,
    network_send_rate: f64,
    message: String,
    project_name: String,
    scenario_name: String,
});

model!(File {
    file_id: String,
    kind: i64,
    name: String,
    size: i64,
    r#type: String,
    updated_at: String,
    line_count: i64,
    head_lines: Vec<String>,
    tail_lines: Vec<String>,
    header_in_file: bool,
    header_columns: Vec<String>,
    file_infos: Vec<FileInfo>,
    status: i64,
    created_at: String,
    project_id: String,
    app_id: i64,
    uin: String,
    sub_account_uin: String,
});

model!(CronJob {
    cron_job_id: String,
    name: String,
    project_id: String,
    scenario_id: String,
    scenario_name: String,
    cron_expression: String,
    end_time: String,
    abort_reason: i64,
    status: i64,
    notice_id: String,
    created_at: String,
    updated_at: String,
    frequency_type: i64,
    note: String,
    job_owner: String,
    app_id: i64,
    uin: String,
    sub_account_uin: String,
});

model!(AlertChannelRecord {
    notice_id: String,
    #[serde(rename = "AMPConsumerId")]
    amp_consumer_id: String,
    project_id: String,
    status: u64,
    created_at: String,
    updated_at: String,
    app_id: i64,
    uin: String,
    sub_account_uin: String,
});

model!(ScenarioRelatedJobsParams {
    offset: i64,
    limit: i64,
    order_by: String,
    ascend: bool,
});

model!(ScenarioWithJobs {
    scenario: Scenario,
    jobs: Vec<Job>,
});

// requests

model!(CreateProjectRequest {
    name: String,
    description: String,
    tags: Vec<TagSpec>,
});

model!(UpdateProjectRequest {
    project_id: String,
    name: String,
    description: String,
    status: i64,
    tags: Vec<TagSpec>,
});

model!(CreateScenarioRequest {
    name: String,
    r#type: String,
    project_id: String,
    description: String,
    load: Load,
    configs: Vec<String>,
    datasets: Vec<TestData>,
    extensions: Vec<String>,
    #[serde(rename = "SLAId")]
    sla_id: String,
    cron_id: String,
    scripts: Vec<String>,
    test_scripts: Vec<ScriptInfo>,
    protocols: Vec<FileInfo>,
    request_files: Vec<FileInfo>,
    #[serde(rename = "SLAPolicy")]
    sla_policy: SlaPolicy,
    plugins: Vec<FileInfo>,
    domain_name_config: DomainNameConfig,
    owner: String,
});

model!(UpdateScenarioRequest {
    scenario_id: String,
    name: String,
    description: String,
    r#type: String,
    load: Load,
    encoded_scripts: String,
    configs: Vec<String>,
    datasets: Vec<TestData>,
    extensions: Vec<String>,
    #[serde(rename = "SLAId")]
    sla_id: String,
    cron_id: String,
    status: i64,
    project_id: String,
    test_scripts: Vec<ScriptInfo>,
    protocols: Vec<FileInfo>,
    request_files: Vec<FileInfo>,
    #[serde(rename = "SLAPolicy")]
    sla_policy: SlaPolicy,
    plugins: Vec<FileInfo>,
    domain_name_config: DomainNameConfig,
    notification_hooks: Vec<NotificationHook>,
    owner: String,
});

model!(StartJobRequest {
    scenario_id: String,
    job_owner: String,
    project_id: String,
    debug: bool,
    note: String,
});

model!(UpdateJobRequest {
    job_id: String,
    project_id: String,
    scenario_id: String,
    note: String,
});

model!(CreateFileRequest {
    file_id: String,
    project_id: String,
    kind: i64,
    name: String,
    size: i64,
    r#type: String,
    line_count: i64,
    head_lines: Vec<String>,
    tail_lines: Vec<String>,
    header_in_file: bool,
    header_columns: Vec<String>,
    file_infos: Vec<FileInfo>,
});

model!(CreateCronJobRequest {
    name: String,
    project_id: String,
    scenario_id: String,
    scenario_name: String,
    frequency_type: i64,
    cron_expression: String,
    job_owner: String,
    end_time: String,
    notice_id: String,
    note: String,
});

model!(UpdateCronJobRequest {
    project_id: String,
    cron_job_id: String,
    note: String,
    cron_expression: String,
    frequency_type: i64,
    name: String,
    scenario_id: String,
    scenario_name: String,
    job_owner: String,
    end_time: String,
    notice_id: String,
});

model!(CreateAlertChannelRequest {
    notice_id: String,
    project_id: String,
    #[serde(rename = "AMPConsumerId")]
    amp_consumer_id: String,
});

model!(DescribeScenarioWithJobsRequest {
    offset: i64,
    limit: i64,
    project_ids: Vec<String>,
    scenario_ids: Vec<String>,
    scenario_name: String,
    scenario_status: i64,
    order_by: String,
    ascend: bool,
    scenario_related_jobs_params: ScenarioRelatedJobsParams,
    ignore_script: bool,
    ignore_dataset: bool,
    scenario_type: String,
    owner: String,
});

// responses

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateProjectResponse {
    project_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateScenarioResponse {
    scenario_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct StartJobResponse {
    job_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateCronJobResponse {
    cron_job_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeProjectsResponse {
    #[serde(default)]
    project_set: Vec<Project>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeScenariosResponse {
    #[serde(default)]
    scenario_set: Vec<Scenario>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeJobsResponse {
    #[serde(default)]
    job_set: Vec<Job>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeFilesResponse {
    #[serde(default)]
    file_set: Vec<File>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeCronJobsResponse {
    #[serde(default)]
    cron_job_set: Vec<CronJob>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeAlertChannelsResponse {
    #[serde(default)]
    alert_channel_set: Vec<AlertChannelRecord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeScenarioWithJobsResponse {
    #[serde(default)]
    scenario_with_jobs_set: Vec<Value>,
}

#[derive(Deserialize)]
struct Empty {}

/// Job statuses in which a job still holds load generators.
pub const JOB_ACTIVE_STATUSES: &[i64] = &[1, 2, 3, 4, 5, 6, 11];

/// Abort reason sent when a job is destroyed while running.
const ABORT_REASON_USER: i64 = 0;

/// Typed PTS calls
pub struct PtsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> PtsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    async fn call<Resp: serde::de::DeserializeOwned>(&self, action: &str, request: Value) -> Result<Resp> {
        self.client.call(Service::Pts, action, &request).await
    }

    // Projects

    pub async fn create_project(&self, request: &CreateProjectRequest) -> Result<String> {
        let response: CreateProjectResponse =
            self.client.call(Service::Pts, "CreateProject", request).await?;
        response
            .project_id
            .ok_or_else(|| missing_field("CreateProject", "ProjectId"))
    }

    pub async fn describe_project(&self, project_id: &str) -> Result<Option<Project>> {
        let response: DescribeProjectsResponse = self
            .call(
                "DescribeProjects",
                serde_json::json!({"ProjectIds": [project_id], "Offset": 0, "Limit": 1}),
            )
            .await?;
        Ok(response.project_set.into_iter().next())
    }

    pub async fn update_project(&self, request: &UpdateProjectRequest) -> Result<()> {
        let _: Empty = self.client.call(Service::Pts, "UpdateProject", request).await?;
        Ok(())
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<()> {
        let _: Empty = self
            .call("DeleteProjects", serde_json::json!({"ProjectIds": [project_id]}))
            .await?;
        Ok(())
    }

    // Scenarios

    pub async fn create_scenario(&self, request: &CreateScenarioRequest) -> Result<String> {
        let response: CreateScenarioResponse =
            self.client.call(Service::Pts, "CreateScenario", request).await?;
        response
            .scenario_id
            .ok_or_else(|| missing_field("CreateScenario", "ScenarioId"))
    }

    pub async fn describe_scenario(&self, project_id: &str, scenario_id: &str) -> Result<Option<Scenario>> {
        let response: DescribeScenariosResponse = self
            .call(
                "DescribeScenarios",
                serde_json::json!({
                    "ProjectIds": [project_id],
                    "ScenarioIds": [scenario_id],
                    "Offset": 0,
                    "Limit": 1
                }),
            )
            .await?;
        Ok(response.scenario_set.into_iter().next())
    }

    pub async fn update_scenario(&self, request: &UpdateScenarioRequest) -> Result<()> {
        let _: Empty = self.client.call(Service::Pts, "UpdateScenario", request).await?;
        Ok(())
    }

    pub async fn delete_scenario(&self, project_id: &str, scenario_id: &str) -> Result<()> {
        let _: Empty = self
            .call(
                "DeleteScenarios",
                serde_json::json!({"ProjectId": project_id, "ScenarioIds": [scenario_id]}),
            )
            .await?;
        Ok(())
    }

    // Jobs

    pub async fn start_job(&self, request: &StartJobRequest) -> Result<String> {
        let response: StartJobResponse = self.client.call(Service::Pts, "StartJob", request).await?;
        response.job_id.ok_or_else(|| missing_field("StartJob", "JobId"))
    }

    pub async fn describe_job(&self, project_id: &str, scenario_id: &str, job_id: &str) -> Result<Option<Job>> {
        let response: DescribeJobsResponse = self
            .call(
                "DescribeJobs",
                serde_json::json!({
                    "ProjectIds": [project_id],
                    "ScenarioIds": [scenario_id],
                    "JobIds": [job_id],
                    "Offset": 0,
                    "Limit": 1
                }),
            )
            .await?;
        Ok(response.job_set.into_iter().next())
    }

    pub async fn update_job(&self, request: &UpdateJobRequest) -> Result<()> {
        let _: Empty = self.client.call(Service::Pts, "UpdateJob", request).await?;
        Ok(())
    }

    pub async fn abort_job(&self, project_id: &str, scenario_id: &str, job_id: &str) -> Result<()> {
        let _: Empty = self
            .call(
                "AbortJob",
                serde_json::json!({
                    "ProjectId": project_id,
                    "ScenarioId": scenario_id,
                    "JobId": job_id,
                    "AbortReason": ABORT_REASON_USER
                }),
            )
            .await?;
        Ok(())
    }

    pub async fn delete_job(&self, project_id: &str, scenario_id: &str, job_id: &str) -> Result<()> {
        let _: Empty = self
            .call(
                "DeleteJobs",
                serde_json::json!({
                    "ProjectId": project_id,
                    "ScenarioIds": [scenario_id],
                    "JobIds": [job_id]
                }),
            )
            .await?;
        Ok(())
    }

    // Files

    pub async fn create_file(&self, request: &CreateFileRequest) -> Result<()> {
        let _: Empty = self.client.call(Service::Pts, "CreateFile", request).await?;
        Ok(())
    }

    pub async fn describe_file(&self, project_id: &str, file_id: &str) -> Result<Option<File>> {
        let response: DescribeFilesResponse = self
            .call(
                "DescribeFiles",
                serde_json::json!({
                    "ProjectIds": [project_id],
                    "FileIds": [file_id],
                    "Offset": 0,
                    "Limit": 1
                }),
            )
            .await?;
        Ok(response.file_set.into_iter().next())
    }

    pub async fn delete_file(&self, project_id: &str, file_id: &str) -> Result<()> {
        let _: Empty = self
            .call(
                "DeleteFiles",
                serde_json::json!({"ProjectId": project_id, "FileIds": [file_id]}),
            )
            .await?;
        Ok(())
    }

    // Cron jobs

    pub async fn create_cron_job(&self, request: &CreateCronJobRequest) -> Result<String> {
        let response: CreateCronJobResponse =
            self.client.call(Service::Pts, "CreateCronJob", request).await?;
        response
            .cron_job_id
            .ok_or_else(|| missing_field("CreateCronJob", "CronJobId"))
    }

    pub async fn describe_cron_job(&self, project_id: &str, cron_job_id: &str) -> Result<Option<CronJob>> {
        let response: DescribeCronJobsResponse = self
            .call(
                "DescribeCronJobs",
                serde_json::json!({
                    "ProjectIds": [project_id],
                    "CronJobIds": [cron_job_id],
                    "Offset": 0,
                    "Limit": 1
                }),
            )
            .await?;
        Ok(response.cron_job_set.into_iter().next())
    }

    pub async fn update_cron_job(&self, request: &UpdateCronJobRequest) -> Result<()> {
        let _: Empty = self.client.call(Service::Pts, "UpdateCronJob", request).await?;
        Ok(())
    }

    pub async fn delete_cron_job(&self, project_id: &str, cron_job_id: &str) -> Result<()> {
        let _: Empty = self
            .call(
                "DeleteCronJobs",
                serde_json::json!({"ProjectId": project_id, "CronJobIds": [cron_job_id]}),
            )
            .await?;
        Ok(())
    }

    // Alert channels

    pub async fn create_alert_channel(&self, request: &CreateAlertChannelRequest) -> Result<()> {
        let _: Empty = self
            .client
            .call(Service::Pts, "CreateAlertChannel", request)
            .await?;
        Ok(())
    }

    pub async fn describe_alert_channel(
        &self,
        project_id: &str,
        notice_id: &str,
    ) -> Result<Option<AlertChannelRecord>> {
        let response: DescribeAlertChannelsResponse = self
            .call(
                "DescribeAlertChannels",
                serde_json::json!({
                    "ProjectIds": [project_id],
                    "NoticeIds": [notice_id],
                    "Offset": 0u64,
                    "Limit": 1u64
                }),
            )
            .await?;
        Ok(response.alert_channel_set.into_iter().next())
    }

    pub async fn delete_alert_channel(&self, project_id: &str, notice_id: &str) -> Result<()> {
        let _: Empty = self
            .call(
                "DeleteAlertChannel",
                serde_json::json!({"ProjectId": project_id, "NoticeId": notice_id}),
            )
            .await?;
        Ok(())
    }

    // Scenario listing

    /// Every `ScenarioWithJobs` record matching `filter`, unparsed.
    pub async fn describe_scenario_with_jobs(
        &self,
        filter: &DescribeScenarioWithJobsRequest,
    ) -> Result<Vec<Value>> {
        paginate(|offset, limit| {
            let mut request = filter.clone();
            request.offset = Some(offset);
            request.limit = Some(limit);
            async move {
                let response: DescribeScenarioWithJobsResponse = self
                    .client
                    .call(Service::Pts, "DescribeScenarioWithJobs", &request)
                    .await?;
                Ok(response.scenario_with_jobs_set)
            }
        })
        .await
    }
}
