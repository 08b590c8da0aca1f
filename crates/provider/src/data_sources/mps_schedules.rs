//! MPS schedules data source

use serde_json::{Map, Value};

use tccloud_common::Result;

use super::{DataSource, RESULT_OUTPUT_FILE};
use crate::api::mps::{DescribeSchedulesRequest, SchedulesInfo};
use crate::api::{request_from, snapshot_of};
use crate::client::ApiClient;
use crate::resources::blocks::{ACTIVITY, TASK_NOTIFY_CONFIG, TASK_OUTPUT_STORAGE, WORKFLOW_TRIGGER};
use crate::schema::{Attribute, Kind, Scalar};

const SCHEDULE_INFO: &[Attribute] = &[
    Attribute::computed("schedule_id", "ScheduleId", Kind::Int),
    Attribute::computed("schedule_name", "ScheduleName", Kind::String),
    Attribute::computed("type", "Type", Kind::String),
    Attribute::computed("status", "Status", Kind::String).doc("`Enabled` or `Disabled`."),
    Attribute::computed("trigger", "Trigger", Kind::Block(WORKFLOW_TRIGGER)),
    Attribute::computed("activities", "Activities", Kind::BlockList(ACTIVITY)),
    Attribute::computed("output_storage", "OutputStorage", Kind::Block(TASK_OUTPUT_STORAGE)),
    Attribute::computed("output_dir", "OutputDir", Kind::String),
    Attribute::computed("task_notify_config", "TaskNotifyConfig", Kind::Block(TASK_NOTIFY_CONFIG)),
    Attribute::computed("resource_id", "ResourceId", Kind::String),
    Attribute::computed("create_time", "CreateTime", Kind::String),
    Attribute::computed("update_time", "UpdateTime", Kind::String),
];

const ATTRIBUTES: &[Attribute] = &[
    Attribute::optional("schedule_ids", "ScheduleIds", Kind::List(Scalar::Int)),
    Attribute::optional("trigger_type", "TriggerType", Kind::String)
        .doc("`CosFileUpload` or `AwsS3FileUpload`."),
    Attribute::optional("status", "Status", Kind::String),
    Attribute::local(RESULT_OUTPUT_FILE, Kind::String).doc("File to write the results to."),
    Attribute::computed("schedule_info_set", "ScheduleInfoSet", Kind::BlockList(SCHEDULE_INFO)),
];

pub struct MpsSchedulesDataSource;

#[async_trait::async_trait]
impl DataSource for MpsSchedulesDataSource {
    fn type_name(&self) -> &'static str {
        "tencentcloud_mps_schedules"
    }

    fn description(&self) -> &'static str {
        "Lists MPS orchestration schedules."
    }

    fn attributes(&self) -> &'static [Attribute] {
        ATTRIBUTES
    }

    fn result_attribute(&self) -> &'static str {
        "schedule_info_set"
    }

    fn record_attributes(&self) -> &'static [Attribute] {
        SCHEDULE_INFO
    }

    async fn fetch(&self, client: &ApiClient, filter: Map<String, Value>) -> Result<Vec<Value>> {
        let filter: DescribeSchedulesRequest = request_from(filter)?;
        client.mps().describe_schedules(&filter).await
    }

    fn parse_record(&self, raw: Value) -> Result<Value> {
        let schedule: SchedulesInfo = serde_json::from_value(raw)?;
        snapshot_of(&schedule)
    }

    fn record_id(&self, record: &Value) -> Option<String> {
        record.get("ScheduleId").and_then(Value::as_i64).map(|id| id.to_string())
    }
}
