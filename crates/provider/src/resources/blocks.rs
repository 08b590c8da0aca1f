//! Nested attribute tables shared by resources and data sources.

use crate::schema::{Attribute, Kind, Scalar};

const STRINGS: Kind = Kind::List(Scalar::String);

// PTS

pub const TAG_SPEC: &[Attribute] = &[
    Attribute::optional("tag_key", "TagKey", Kind::String),
    Attribute::optional("tag_value", "TagValue", Kind::String),
];

pub const STAGE: &[Attribute] = &[
    Attribute::optional("duration_seconds", "DurationSeconds", Kind::Int),
    Attribute::optional("target_virtual_users", "TargetVirtualUsers", Kind::Int),
];

pub const CONCURRENCY: &[Attribute] = &[
    Attribute::optional("stages", "Stages", Kind::BlockList(STAGE)).doc("Ramp stages, applied in order."),
    Attribute::optional("iteration_count", "IterationCount", Kind::Int),
    Attribute::optional("max_requests_per_second", "MaxRequestsPerSecond", Kind::Int),
    Attribute::optional("graceful_stop_seconds", "GracefulStopSeconds", Kind::Int),
    Attribute::optional("resources", "Resources", Kind::Int),
];

pub const REQUESTS_PER_SECOND: &[Attribute] = &[
    Attribute::optional("max_requests_per_second", "MaxRequestsPerSecond", Kind::Int),
    Attribute::optional("duration_seconds", "DurationSeconds", Kind::Int),
    Attribute::optional("target_virtual_users", "TargetVirtualUsers", Kind::Int),
    Attribute::optional("resources", "Resources", Kind::Int),
    Attribute::optional("start_requests_per_second", "StartRequestsPerSecond", Kind::Int),
    Attribute::optional("target_requests_per_second", "TargetRequestsPerSecond", Kind::Int),
    Attribute::optional("graceful_stop_seconds", "GracefulStopSeconds", Kind::Int),
];

pub const SCRIPT_ORIGIN: &[Attribute] = &[
    Attribute::required("machine_number", "MachineNumber", Kind::Int),
    Attribute::required("machine_specification", "MachineSpecification", Kind::String),
    Attribute::required("duration_seconds", "DurationSeconds", Kind::Int),
];

pub const LOAD_SPEC: &[Attribute] = &[
    Attribute::optional("concurrency", "Concurrency", Kind::Block(CONCURRENCY)),
    Attribute::optional("requests_per_second", "RequestsPerSecond", Kind::Block(REQUESTS_PER_SECOND)),
    Attribute::optional("script_origin", "ScriptOrigin", Kind::Block(SCRIPT_ORIGIN)),
];

pub const VPC_LOAD_DISTRIBUTION: &[Attribute] = &[
    Attribute::required("region_id", "RegionId", Kind::Int),
    Attribute::optional("region", "Region", Kind::String),
    Attribute::optional("vpc_id", "VpcId", Kind::String),
    Attribute::optional("subnet_ids", "SubnetIds", Kind::Set(Scalar::String)),
];

pub const GEO_REGIONS_LOAD_ITEM: &[Attribute] = &[
    Attribute::required("region_id", "RegionId", Kind::Int),
    Attribute::optional("region", "Region", Kind::String),
    Attribute::optional("percentage", "Percentage", Kind::Int),
];

pub const LOAD: &[Attribute] = &[
    Attribute::optional("load_spec", "LoadSpec", Kind::Block(LOAD_SPEC)),
    Attribute::optional(
        "vpc_load_distribution",
        "VpcLoadDistribution",
        Kind::Block(VPC_LOAD_DISTRIBUTION),
    ),
    Attribute::optional(
        "geo_regions_load_distribution",
        "GeoRegionsLoadDistribution",
        Kind::BlockList(GEO_REGIONS_LOAD_ITEM),
    ),
];

pub const TEST_DATA: &[Attribute] = &[
    Attribute::required("name", "Name", Kind::String),
    Attribute::required("split", "Split", Kind::Bool),
    Attribute::optional("header_in_file", "HeaderInFile", Kind::Bool),
    Attribute::optional("header_columns", "HeaderColumns", STRINGS),
    Attribute::optional("line_count", "LineCount", Kind::Int),
    Attribute::optional("updated_at", "UpdatedAt", Kind::String),
    Attribute::optional("size", "Size", Kind::Int),
    Attribute::optional("head_lines", "HeadLines", STRINGS),
    Attribute::optional("tail_lines", "TailLines", STRINGS),
    Attribute::optional("type", "Type", Kind::String),
    Attribute::optional("file_id", "FileId", Kind::String),
];

pub const SCRIPT_INFO: &[Attribute] = &[
    Attribute::required("name", "Name", Kind::String),
    Attribute::required("size", "Size", Kind::Int),
    Attribute::required("type", "Type", Kind::String),
    Attribute::required("updated_at", "UpdatedAt", Kind::String),
    Attribute::optional("encoded_content", "EncodedContent", Kind::String)
        .write_only()
        .doc("Base64 script body."),
    Attribute::optional("encoded_http_archive", "EncodedHttpArchive", Kind::String),
    Attribute::optional("load_weight", "LoadWeight", Kind::Int),
    Attribute::optional("file_id", "FileId", Kind::String),
];

pub const FILE_INFO: &[Attribute] = &[
    Attribute::optional("name", "Name", Kind::String),
    Attribute::optional("size", "Size", Kind::Int),
    Attribute::optional("type", "Type", Kind::String),
    Attribute::optional("updated_at", "UpdatedAt", Kind::String),
    Attribute::optional("file_id", "FileId", Kind::String),
];

pub const SLA_LABEL: &[Attribute] = &[
    Attribute::optional("label_name", "LabelName", Kind::String),
    Attribute::optional("label_value", "LabelValue", Kind::String),
];

pub const SLA_RULE: &[Attribute] = &[
    Attribute::optional("metric", "Metric", Kind::String),
    Attribute::optional("aggregation", "Aggregation", Kind::String),
    Attribute::optional("condition", "Condition", Kind::String),
    Attribute::optional("value", "Value", Kind::Float),
    Attribute::optional("label_filter", "LabelFilter", Kind::BlockList(SLA_LABEL)),
    Attribute::optional("abort_flag", "AbortFlag", Kind::Bool),
    Attribute::optional("for", "For", Kind::String),
];

pub const ALERT_CHANNEL: &[Attribute] = &[
    Attribute::optional("notice_id", "NoticeId", Kind::String),
    Attribute::optional("amp_consumer_id", "AMPConsumerId", Kind::String),
];

pub const SLA_POLICY: &[Attribute] = &[
    Attribute::optional("sla_rules", "SLARules", Kind::BlockList(SLA_RULE)),
    Attribute::optional("alert_channel", "AlertChannel", Kind::Block(ALERT_CHANNEL)),
];

pub const HOST_ALIAS: &[Attribute] = &[
    Attribute::optional("host_names", "HostNames", STRINGS),
    Attribute::optional("ip", "IP", Kind::String),
];

pub const DNS_CONFIG: &[Attribute] = &[Attribute::optional("nameservers", "Nameservers", STRINGS)];

pub const DOMAIN_NAME_CONFIG: &[Attribute] = &[
    Attribute::optional("host_aliases", "HostAliases", Kind::BlockList(HOST_ALIAS)),
    Attribute::optional("dns_config", "DNSConfig", Kind::Block(DNS_CONFIG)),
];

pub const NOTIFICATION_HOOK: &[Attribute] = &[
    Attribute::optional("events", "Events", STRINGS),
    Attribute::optional("url", "URL", Kind::String),
];

pub const LOAD_SOURCE: &[Attribute] = &[
    Attribute::optional("ip", "IP", Kind::String),
    Attribute::optional("pod_name", "PodName", Kind::String),
    Attribute::optional("region", "Region", Kind::String),
];

// MPS

pub const AWS_SQS: &[Attribute] = &[
    Attribute::required("sqs_region", "SQSRegion", Kind::String),
    Attribute::required("sqs_queue_name", "SQSQueueName", Kind::String),
    Attribute::optional("s3_secret_id", "S3SecretId", Kind::String),
    Attribute::optional("s3_secret_key", "S3SecretKey", Kind::String),
];

pub const COS_FILE_UPLOAD_TRIGGER: &[Attribute] = &[
    Attribute::required("bucket", "Bucket", Kind::String),
    Attribute::required("region", "Region", Kind::String),
    Attribute::optional("dir", "Dir", Kind::String),
    Attribute::optional("formats", "Formats", STRINGS),
];

pub const AWS_S3_FILE_UPLOAD_TRIGGER: &[Attribute] = &[
    Attribute::required("s3_bucket", "S3Bucket", Kind::String),
    Attribute::required("s3_region", "S3Region", Kind::String),
    Attribute::optional("dir", "Dir", Kind::String),
    Attribute::optional("formats", "Formats", STRINGS),
    Attribute::optional("s3_secret_id", "S3SecretId", Kind::String),
    Attribute::optional("s3_secret_key", "S3SecretKey", Kind::String),
    Attribute::optional("aws_sqs", "AwsSQS", Kind::Block(AWS_SQS)),
];

pub const WORKFLOW_TRIGGER: &[Attribute] = &[
    Attribute::required("type", "Type", Kind::String).doc("`CosFileUpload` or `AwsS3FileUpload`."),
    Attribute::optional(
        "cos_file_upload_trigger",
        "CosFileUploadTrigger",
        Kind::Block(COS_FILE_UPLOAD_TRIGGER),
    ),
    Attribute::optional(
        "aws_s3_file_upload_trigger",
        "AwsS3FileUploadTrigger",
        Kind::Block(AWS_S3_FILE_UPLOAD_TRIGGER),
    ),
];

pub const ACTIVITY: &[Attribute] = &[
    Attribute::required("activity_type", "ActivityType", Kind::String),
    Attribute::optional("reardrive_index", "ReardriveIndex", Kind::List(Scalar::Int))
        .doc("Indexes of the activities that follow this one."),
    Attribute::optional("activity_para", "ActivityPara", Kind::Json)
        .doc("Task parameters as JSON text, passed through untouched."),
];

pub const COS_OUTPUT_STORAGE: &[Attribute] = &[
    Attribute::optional("bucket", "Bucket", Kind::String),
    Attribute::optional("region", "Region", Kind::String),
];

pub const S3_OUTPUT_STORAGE: &[Attribute] = &[
    Attribute::required("s3_bucket", "S3Bucket", Kind::String),
    Attribute::optional("s3_region", "S3Region", Kind::String),
    Attribute::optional("s3_secret_id", "S3SecretId", Kind::String),
    Attribute::optional("s3_secret_key", "S3SecretKey", Kind::String),
];

pub const TASK_OUTPUT_STORAGE: &[Attribute] = &[
    Attribute::required("type", "Type", Kind::String).doc("`COS` or `AWS-S3`."),
    Attribute::optional("cos_output_storage", "CosOutputStorage", Kind::Block(COS_OUTPUT_STORAGE)),
    Attribute::optional("s3_output_storage", "S3OutputStorage", Kind::Block(S3_OUTPUT_STORAGE)),
];

pub const TASK_NOTIFY_CONFIG: &[Attribute] = &[
    Attribute::optional("cmq_model", "CmqModel", Kind::String),
    Attribute::optional("cmq_region", "CmqRegion", Kind::String),
    Attribute::optional("topic_name", "TopicName", Kind::String),
    Attribute::optional("queue_name", "QueueName", Kind::String),
    Attribute::optional("notify_mode", "NotifyMode", Kind::String),
    Attribute::optional("notify_type", "NotifyType", Kind::String),
    Attribute::optional("notify_url", "NotifyUrl", Kind::String),
    Attribute::optional("aws_sqs", "AwsSQS", Kind::Block(AWS_SQS)),
];
