//! MPS (media processing) API, version 2019-06-12

use serde::Deserialize;
use serde_json::Value;

use tccloud_common::Result;

use super::missing_field;
use crate::client::{paginate, ApiClient, Service};

model!(AwsSqs {
    #[serde(rename = "SQSRegion")]
    sqs_region: String,
    #[serde(rename = "SQSQueueName")]
    sqs_queue_name: String,
    s3_secret_id: String,
    s3_secret_key: String,
});

model!(CosFileUploadTrigger {
    bucket: String,
    region: String,
    dir: String,
    formats: Vec<String>,
});

model!(AwsS3FileUploadTrigger {
    s3_bucket: String,
    s3_region: String,
    dir: String,
    formats: Vec<String>,
    s3_secret_id: String,
    s3_secret_key: String,
    #[serde(rename = "AwsSQS")]
    aws_sqs: AwsSqs,
});

model!(WorkflowTrigger {
    r#type: String,
    cos_file_upload_trigger: CosFileUploadTrigger,
    aws_s3_file_upload_trigger: AwsS3FileUploadTrigger,
});

model!(Activity {
    activity_type: String,
    reardrive_index: Vec<i64>,
    /// Task parameters; passed through untouched.
    activity_para: Value,
});

model!(CosOutputStorage {
    bucket: String,
    region: String,
});

model!(S3OutputStorage {
    s3_bucket: String,
    s3_region: String,
    s3_secret_id: String,
    s3_secret_key: String,
});

model!(TaskOutputStorage {
    r#type: String,
    cos_output_storage: CosOutputStorage,
    s3_output_storage: S3OutputStorage,
});

model!(TaskNotifyConfig {
    cmq_model: String,
    cmq_region: String,
    topic_name: String,
    queue_name: String,
    notify_mode: String,
    notify_type: String,
    notify_url: String,
    #[serde(rename = "AwsSQS")]
    aws_sqs: AwsSqs,
});

model!(SchedulesInfo {
    schedule_id: i64,
    schedule_name: String,
    r#type: String,
    status: String,
    trigger: WorkflowTrigger,
    activities: Vec<Activity>,
    output_storage: TaskOutputStorage,
    output_dir: String,
    task_notify_config: TaskNotifyConfig,
    resource_id: String,
    create_time: String,
    update_time: String,
});

model!(CreateScheduleRequest {
    schedule_name: String,
    trigger: WorkflowTrigger,
    activities: Vec<Activity>,
    output_storage: TaskOutputStorage,
    output_dir: String,
    task_notify_config: TaskNotifyConfig,
    resource_id: String,
});

model!(ModifyScheduleRequest {
    schedule_id: i64,
    schedule_name: String,
    trigger: WorkflowTrigger,
    activities: Vec<Activity>,
    output_storage: TaskOutputStorage,
    output_dir: String,
    task_notify_config: TaskNotifyConfig,
    resource_id: String,
});

model!(DescribeSchedulesRequest {
    schedule_ids: Vec<i64>,
    trigger_type: String,
    status: String,
    offset: i64,
    limit: i64,
});

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CreateScheduleResponse {
    schedule_id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DescribeSchedulesResponse {
    #[serde(default)]
    schedule_info_set: Vec<Value>,
}

#[derive(Deserialize)]
struct Empty {}

/// Typed MPS calls
pub struct MpsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> MpsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn create_schedule(&self, request: &CreateScheduleRequest) -> Result<i64> {
        let response: CreateScheduleResponse = self
            .client
            .call(Service::Mps, "CreateSchedule", request)
            .await?;
        response
            .schedule_id
            .ok_or_else(|| missing_field("CreateSchedule", "ScheduleId"))
    }

    pub async fn describe_schedule(&self, schedule_id: i64) -> Result<Option<SchedulesInfo>> {
        let filter = DescribeSchedulesRequest {
            schedule_ids: Some(vec![schedule_id]),
            ..Default::default()
        };
        let records = self.describe_schedules(&filter).await?;
        match records.into_iter().next() {
            Some(raw) => Ok(Some(serde_json::from_value(raw)?)),
            None => Ok(None),
        }
    }

    /// Every schedule matching `filter`, unparsed.
    pub async fn describe_schedules(&self, filter: &DescribeSchedulesRequest) -> Result<Vec<Value>> {
        paginate(|offset, limit| {
            let mut request = filter.clone();
            request.offset = Some(offset);
            request.limit = Some(limit);
            async move {
                let response: DescribeSchedulesResponse = self
                    .client
                    .call(Service::Mps, "DescribeSchedules", &request)
                    .await?;
                Ok(response.schedule_info_set)
            }
        })
        .await
    }

    pub async fn modify_schedule(&self, request: &ModifyScheduleRequest) -> Result<()> {
        let _: Empty = self
            .client
            .call(Service::Mps, "ModifySchedule", request)
            .await?;
        Ok(())
    }

    pub async fn delete_schedule(&self, schedule_id: i64) -> Result<()> {
        let _: Empty = self
            .client
            .call(
                Service::Mps,
                "DeleteSchedule",
                &serde_json::json!({"ScheduleId": schedule_id}),
            )
            .await?;
        Ok(())
    }
}
