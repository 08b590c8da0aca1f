//! Resource lifecycle against an in-memory cloud.

mod common;

use serde_json::json;

use common::{provider, tree, FakeCloud};
use tccloud_provider::lifecycle::Change;
use tccloud_provider::mapper::changed_attributes;
use tccloud_provider::provider::has_errors;
use tccloud_provider::resources::{self, Resource};
use tccloud_provider::state::get_string_attr;
use tccloud_provider::{DynamicValue, Severity, StateResponse, TencentCloudProvider};

const PROJECT: &str = "tencentcloud_pts_project";
const SCENARIO: &str = "tencentcloud_pts_scenario";
const JOB: &str = "tencentcloud_pts_job";
const FILE: &str = "tencentcloud_pts_file";
const CRON_JOB: &str = "tencentcloud_pts_cron_job";
const ALERT_CHANNEL: &str = "tencentcloud_pts_alert_channel";
const SCHEDULE: &str = "tencentcloud_mps_schedule";

/// Plan then apply, the way a runtime drives a change.
async fn plan_and_apply(
    provider: &TencentCloudProvider,
    type_name: &str,
    prior: &DynamicValue,
    config: &DynamicValue,
) -> StateResponse {
    let plan = provider.plan_resource_change(type_name, prior, config);
    assert!(!has_errors(&plan.diagnostics), "plan failed: {:?}", plan.diagnostics);
    provider
        .apply_resource_change(type_name, prior, &plan.planned_state)
        .await
}

fn assert_converged(type_name: &str, state: &DynamicValue, config: &DynamicValue) {
    let resource = resources::registry()
        .into_iter()
        .find(|r| r.type_name() == type_name)
        .unwrap();
    let changed: Vec<_> = changed_attributes(resource.attributes(), state, config)
        .iter()
        .map(|a| a.name)
        .collect();
    assert!(changed.is_empty(), "{} drifted after apply: {:?}", type_name, changed);
}

#[tokio::test(start_paused = true)]
async fn test_project_lifecycle() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let config = tree(json!({
        "name": "checkout",
        "description": "load tests for checkout",
        "tags": [{"tag_key": "team", "tag_value": "payments"}]
    }));

    let plan = provider.plan_resource_change(PROJECT, &DynamicValue::Null, &config);
    assert_eq!(plan.change, Change::Create);

    let created = provider
        .apply_resource_change(PROJECT, &DynamicValue::Null, &plan.planned_state)
        .await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let project_id = get_string_attr(&created.state, "project_id");
    assert!(project_id.starts_with("project-"));
    assert_eq!(get_string_attr(&created.state, "id"), project_id);
    assert_eq!(created.state.get("status"), Some(&DynamicValue::Int(1)));
    assert_converged(PROJECT, &created.state, &config);

    let config = tree(json!({
        "name": "checkout",
        "description": "renamed",
        "tags": [{"tag_key": "team", "tag_value": "payments"}]
    }));
    let updated = plan_and_apply(&provider, PROJECT, &created.state, &config).await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    assert_eq!(get_string_attr(&updated.state, "description"), "renamed");
    assert_eq!(get_string_attr(&updated.state, "id"), project_id);
    assert_eq!(
        cloud.last_request("UpdateProject").unwrap()["ProjectId"],
        json!(project_id)
    );

    let read = provider.read_resource(PROJECT, &updated.state).await;
    assert!(read.diagnostics.is_empty());
    assert_eq!(read.state, updated.state);

    let deleted = provider
        .apply_resource_change(PROJECT, &read.state, &DynamicValue::Null)
        .await;
    assert!(deleted.diagnostics.is_empty());
    assert!(deleted.state.is_null());
    assert!(cloud.project(&project_id).is_none());
}

#[tokio::test(start_paused = true)]
async fn test_unchanged_update_skips_the_api() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let config = tree(json!({"name": "quiet"}));

    let created = plan_and_apply(&provider, PROJECT, &DynamicValue::Null, &config).await;
    let again = plan_and_apply(&provider, PROJECT, &created.state, &config).await;

    assert!(again.diagnostics.is_empty());
    assert_eq!(cloud.count("UpdateProject"), 0);
    assert_eq!(again.state, created.state);
}

#[tokio::test(start_paused = true)]
async fn test_create_waits_for_the_object_to_appear() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    cloud.lag("DescribeProjects", 3);

    let created = plan_and_apply(&provider, PROJECT, &DynamicValue::Null, &tree(json!({"name": "slow"}))).await;

    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_eq!(get_string_attr(&created.state, "name"), "slow");
    assert_eq!(cloud.count("DescribeProjects"), 4);
    assert_eq!(cloud.count("CreateProject"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_transient_errors_are_retried() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    cloud.fail("CreateProject", "RequestLimitExceeded", 2);

    let created = plan_and_apply(&provider, PROJECT, &DynamicValue::Null, &tree(json!({"name": "busy"}))).await;

    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_eq!(cloud.count("CreateProject"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_permanent_error_fails_create_without_state() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    cloud.fail("CreateProject", "InvalidParameterValue", 1);

    let created = plan_and_apply(&provider, PROJECT, &DynamicValue::Null, &tree(json!({"name": "bad"}))).await;

    assert!(created.state.is_null());
    assert_eq!(created.diagnostics.len(), 1);
    assert_eq!(created.diagnostics[0].severity, Severity::Error);
    assert!(created.diagnostics[0].detail.contains("InvalidParameterValue"));
    assert_eq!(cloud.count("CreateProject"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_create_gives_up_at_the_deadline() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    cloud.lag("DescribeProjects", u32::MAX);

    let created = plan_and_apply(&provider, PROJECT, &DynamicValue::Null, &tree(json!({"name": "never"}))).await;

    assert!(created.state.is_null());
    assert!(has_errors(&created.diagnostics));
    assert!(cloud.count("DescribeProjects") > 1);
}

#[tokio::test(start_paused = true)]
async fn test_vanished_resource_reads_as_null() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let created = plan_and_apply(&provider, PROJECT, &DynamicValue::Null, &tree(json!({"name": "gone"}))).await;

    cloud.drop_project(&get_string_attr(&created.state, "project_id"));
    let read = provider.read_resource(PROJECT, &created.state).await;

    assert!(read.state.is_null());
    assert_eq!(read.diagnostics.len(), 1);
    assert_eq!(read.diagnostics[0].severity, Severity::Warning);
    assert_eq!(read.diagnostics[0].summary, "Resource not found");
}

#[tokio::test(start_paused = true)]
async fn test_remote_clear_of_optional_field_shows_as_drift() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let config = tree(json!({"name": "checkout", "description": "load tests"}));
    let created = plan_and_apply(&provider, PROJECT, &DynamicValue::Null, &config).await;
    assert_converged(PROJECT, &created.state, &config);

    cloud.edit_project(&get_string_attr(&created.state, "project_id"), |record| {
        record.as_object_mut().unwrap().remove("Description");
    });
    let read = provider.read_resource(PROJECT, &created.state).await;

    assert!(read.diagnostics.is_empty(), "{:?}", read.diagnostics);
    assert!(read.state.get("description").is_none());
    let resource = resources::registry()
        .into_iter()
        .find(|r| r.type_name() == PROJECT)
        .unwrap();
    let changed: Vec<_> = changed_attributes(resource.attributes(), &read.state, &config)
        .iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(changed, vec!["description"]);
}

#[tokio::test(start_paused = true)]
async fn test_delete_of_missing_object_succeeds() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let created = plan_and_apply(&provider, PROJECT, &DynamicValue::Null, &tree(json!({"name": "twice"}))).await;

    cloud.drop_project(&get_string_attr(&created.state, "project_id"));
    let deleted = provider
        .apply_resource_change(PROJECT, &created.state, &DynamicValue::Null)
        .await;

    assert!(deleted.state.is_null());
    assert!(deleted.diagnostics.is_empty(), "{:?}", deleted.diagnostics);
}

#[tokio::test(start_paused = true)]
async fn test_scenario_project_is_immutable() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let config = json!({
        "name": "browse",
        "type": "pts-http",
        "project_id": "project-1",
        "load": [{
            "load_spec": [{
                "concurrency": [{
                    "stages": [{"duration_seconds": 60, "target_virtual_users": 10}],
                    "graceful_stop_seconds": 3
                }]
            }]
        }],
        "sla_policy": [{
            "sla_rules": [{"metric": "requests.duration", "aggregation": "p99", "condition": "<", "value": 1.5}]
        }]
    });

    let created = plan_and_apply(&provider, SCENARIO, &DynamicValue::Null, &tree(config.clone())).await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let scenario_id = get_string_attr(&created.state, "scenario_id");
    assert_eq!(
        get_string_attr(&created.state, "id"),
        format!("project-1#{}", scenario_id)
    );
    assert_converged(SCENARIO, &created.state, &tree(config.clone()));

    let mut moved = config;
    moved["project_id"] = json!("project-2");
    let moved = tree(moved);

    let plan = provider.plan_resource_change(SCENARIO, &created.state, &moved);
    assert!(has_errors(&plan.diagnostics));
    assert_eq!(plan.diagnostics[0].attribute.as_deref(), Some("project_id"));

    // applying anyway is refused and keeps the prior state
    let applied = provider
        .apply_resource_change(SCENARIO, &created.state, &moved)
        .await;
    assert_eq!(applied.state, created.state);
    assert_eq!(applied.diagnostics[0].attribute.as_deref(), Some("project_id"));
    assert!(applied.diagnostics[0].detail.contains("`project_id` do not support change now"));
    assert_eq!(cloud.count("UpdateScenario"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_scenario_update_sends_full_request() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let config = json!({"name": "browse", "type": "pts-http", "project_id": "project-1"});
    let created = plan_and_apply(&provider, SCENARIO, &DynamicValue::Null, &tree(config.clone())).await;

    let mut renamed = config;
    renamed["description"] = json!("now documented");
    let updated = plan_and_apply(&provider, SCENARIO, &created.state, &tree(renamed)).await;

    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    let request = cloud.last_request("UpdateScenario").unwrap();
    assert_eq!(request["Name"], json!("browse"));
    assert_eq!(request["Description"], json!("now documented"));
    assert_eq!(request["ScenarioId"], json!(get_string_attr(&created.state, "scenario_id")));
    assert_eq!(get_string_attr(&updated.state, "description"), "now documented");
}

#[tokio::test(start_paused = true)]
async fn test_scenario_script_bodies_converge() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let config = json!({
        "name": "browse",
        "type": "pts-js",
        "project_id": "project-1",
        "test_scripts": [
            {"name": "a.js", "size": 10, "type": "js", "updated_at": "2024-01-01", "encoded_content": "ZXhwb3J0IGRlZmF1bHQ="},
            {"name": "b.js", "size": 12, "type": "js", "updated_at": "2024-01-02", "encoded_content": "aW1wb3J0IGh0dHA="}
        ]
    });

    let created = plan_and_apply(&provider, SCENARIO, &DynamicValue::Null, &tree(config.clone())).await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_converged(SCENARIO, &created.state, &tree(config.clone()));

    let scenario_id = get_string_attr(&created.state, "scenario_id");
    let stored = cloud.scenario(&scenario_id).unwrap();
    assert!(stored["TestScripts"][0].get("EncodedContent").is_none());

    // a refresh keeps the bodies and shows no change
    let read = provider.read_resource(SCENARIO, &created.state).await;
    assert!(read.diagnostics.is_empty(), "{:?}", read.diagnostics);
    assert_eq!(read.state, created.state);
    let plan = provider.plan_resource_change(SCENARIO, &read.state, &tree(config.clone()));
    assert_eq!(plan.change, Change::Update);
    assert!(plan.requires_replace.is_empty());
    assert_converged(SCENARIO, &plan.planned_state, &tree(config.clone()));

    let mut edited = config;
    edited["test_scripts"][1]["encoded_content"] = json!("Y2hhbmdlZA==");
    let updated = plan_and_apply(&provider, SCENARIO, &read.state, &tree(edited.clone())).await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    let request = cloud.last_request("UpdateScenario").unwrap();
    assert_eq!(request["TestScripts"][1]["EncodedContent"], json!("Y2hhbmdlZA=="));
    assert_converged(SCENARIO, &updated.state, &tree(edited));
}

#[tokio::test(start_paused = true)]
async fn test_job_runs_and_is_aborted_on_destroy() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let config = tree(json!({
        "scenario_id": "scenario-7",
        "project_id": "project-1",
        "job_owner": "alice",
        "debug": true,
        "note": "baseline"
    }));

    let created = plan_and_apply(&provider, JOB, &DynamicValue::Null, &config).await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let job_id = get_string_attr(&created.state, "job_id");
    assert_eq!(
        get_string_attr(&created.state, "id"),
        format!("project-1#scenario-7#{}", job_id)
    );
    // never echoed by the API, kept from configuration
    assert_eq!(created.state.get("debug"), Some(&DynamicValue::Bool(true)));
    assert_eq!(created.state.get("response_time_p99"), Some(&DynamicValue::Float(12.5)));
    assert_converged(JOB, &created.state, &config);

    let noted = tree(json!({
        "scenario_id": "scenario-7",
        "project_id": "project-1",
        "job_owner": "alice",
        "debug": true,
        "note": "second look"
    }));
    let updated = plan_and_apply(&provider, JOB, &created.state, &noted).await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    assert_eq!(cloud.job(&job_id).unwrap()["Note"], json!("second look"));

    let deleted = provider
        .apply_resource_change(JOB, &updated.state, &DynamicValue::Null)
        .await;
    assert!(deleted.diagnostics.is_empty(), "{:?}", deleted.diagnostics);
    assert!(cloud.job(&job_id).is_none());

    let calls = cloud.calls();
    let abort = calls.iter().position(|c| c == "AbortJob").unwrap();
    let delete = calls.iter().position(|c| c == "DeleteJobs").unwrap();
    assert!(abort < delete);
}

#[tokio::test(start_paused = true)]
async fn test_job_owner_cannot_change() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let config = json!({"scenario_id": "scenario-7", "project_id": "project-1", "job_owner": "alice"});
    let created = plan_and_apply(&provider, JOB, &DynamicValue::Null, &tree(config.clone())).await;

    let mut handed_over = config;
    handed_over["job_owner"] = json!("bob");
    let plan = provider.plan_resource_change(JOB, &created.state, &tree(handed_over));

    assert!(has_errors(&plan.diagnostics));
    assert_eq!(plan.diagnostics[0].attribute.as_deref(), Some("job_owner"));
}

#[tokio::test(start_paused = true)]
async fn test_cron_job_moves_project_by_replacement() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let config = json!({
        "name": "nightly",
        "project_id": "project-1",
        "scenario_id": "scenario-1",
        "scenario_name": "browse",
        "frequency_type": 4,
        "cron_expression": "0 2 * * *",
        "job_owner": "alice"
    });
    let created = plan_and_apply(&provider, CRON_JOB, &DynamicValue::Null, &tree(config.clone())).await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let old_id = get_string_attr(&created.state, "cron_job_id");

    let mut moved = config;
    moved["project_id"] = json!("project-2");
    let moved = tree(moved);
    let plan = provider.plan_resource_change(CRON_JOB, &created.state, &moved);
    assert_eq!(plan.requires_replace, vec!["project_id".to_string()]);
    assert!(plan.planned_state.get("id").is_none());

    let replaced = provider
        .apply_resource_change(CRON_JOB, &created.state, &plan.planned_state)
        .await;
    assert!(replaced.diagnostics.is_empty(), "{:?}", replaced.diagnostics);
    let new_id = get_string_attr(&replaced.state, "cron_job_id");
    assert_ne!(new_id, old_id);
    assert_eq!(get_string_attr(&replaced.state, "id"), format!("project-2#{}", new_id));
    assert_eq!(cloud.count("DeleteCronJobs"), 1);
    assert_eq!(cloud.count("UpdateCronJob"), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cron_job_updates_in_place() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let config = json!({
        "name": "nightly",
        "project_id": "project-1",
        "scenario_id": "scenario-1",
        "scenario_name": "browse",
        "frequency_type": 4,
        "cron_expression": "0 2 * * *",
        "job_owner": "alice"
    });
    let created = plan_and_apply(&provider, CRON_JOB, &DynamicValue::Null, &tree(config.clone())).await;

    let mut later = config;
    later["cron_expression"] = json!("0 4 * * *");
    let updated = plan_and_apply(&provider, CRON_JOB, &created.state, &tree(later)).await;

    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    assert_eq!(get_string_attr(&updated.state, "id"), get_string_attr(&created.state, "id"));
    assert_eq!(get_string_attr(&updated.state, "cron_expression"), "0 4 * * *");
    let request = cloud.last_request("UpdateCronJob").unwrap();
    assert_eq!(request["CronJobId"], json!(get_string_attr(&created.state, "cron_job_id")));
}

#[tokio::test(start_paused = true)]
async fn test_file_is_keyed_by_caller_ids() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let config = tree(json!({
        "file_id": "file-1",
        "project_id": "project-1",
        "kind": 2,
        "name": "users.csv",
        "size": 2048,
        "type": "text/csv",
        "header_in_file": true,
        "header_columns": ["id", "email"]
    }));

    let created = plan_and_apply(&provider, FILE, &DynamicValue::Null, &config).await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_eq!(get_string_attr(&created.state, "id"), "project-1#file-1");
    assert_eq!(created.state.get("status"), Some(&DynamicValue::Int(0)));
    assert_converged(FILE, &created.state, &config);

    let renamed = tree(json!({
        "file_id": "file-1",
        "project_id": "project-1",
        "kind": 2,
        "name": "customers.csv",
        "size": 2048,
        "type": "text/csv",
        "header_in_file": true,
        "header_columns": ["id", "email"]
    }));
    let plan = provider.plan_resource_change(FILE, &created.state, &renamed);
    assert_eq!(plan.requires_replace, vec!["name".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_alert_channel_rejects_changes() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let config = tree(json!({"notice_id": "notice-1", "project_id": "project-1"}));

    let created = plan_and_apply(&provider, ALERT_CHANNEL, &DynamicValue::Null, &config).await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    assert_eq!(get_string_attr(&created.state, "id"), "project-1#notice-1");

    let changed = tree(json!({
        "notice_id": "notice-1",
        "project_id": "project-1",
        "amp_consumer_id": "amp-9"
    }));
    let plan = provider.plan_resource_change(ALERT_CHANNEL, &created.state, &changed);
    assert!(has_errors(&plan.diagnostics));
    assert_eq!(plan.diagnostics[0].attribute.as_deref(), Some("amp_consumer_id"));
}

fn schedule_config(name: &str) -> serde_json::Value {
    json!({
        "schedule_name": name,
        "trigger": [{
            "type": "CosFileUpload",
            "cos_file_upload_trigger": [{"bucket": "media-1250000000", "region": "ap-guangzhou", "dir": "/in/"}]
        }],
        "activities": [
            {"activity_type": "input", "reardrive_index": [1]},
            {"activity_type": "action-trans", "activity_para": "{\"TranscodeTask\": {\"Definition\": 10}}"}
        ],
        "output_dir": "/out/"
    })
}

#[tokio::test(start_paused = true)]
async fn test_schedule_modify_sends_only_changed_fields() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);

    let created = plan_and_apply(&provider, SCHEDULE, &DynamicValue::Null, &tree(schedule_config("ingest"))).await;
    assert!(created.diagnostics.is_empty(), "{:?}", created.diagnostics);
    let DynamicValue::Int(schedule_id) = created.state.get("schedule_id").cloned().unwrap() else {
        panic!("schedule_id is not an integer");
    };
    assert_eq!(get_string_attr(&created.state, "id"), schedule_id.to_string());
    assert_eq!(get_string_attr(&created.state, "status"), "Enabled");
    assert_converged(SCHEDULE, &created.state, &tree(schedule_config("ingest")));

    let updated = plan_and_apply(&provider, SCHEDULE, &created.state, &tree(schedule_config("ingest-v2"))).await;
    assert!(updated.diagnostics.is_empty(), "{:?}", updated.diagnostics);
    assert_eq!(
        cloud.last_request("ModifySchedule").unwrap(),
        json!({"ScheduleId": schedule_id, "ScheduleName": "ingest-v2"})
    );
    assert_eq!(cloud.schedule(schedule_id).unwrap()["ScheduleName"], json!("ingest-v2"));
}

#[tokio::test(start_paused = true)]
async fn test_import_fills_identity_from_id() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let created = plan_and_apply(&provider, PROJECT, &DynamicValue::Null, &tree(json!({"name": "adopted"}))).await;
    let id = get_string_attr(&created.state, "id");

    let imported = provider.import_resource_state(PROJECT, &id).await;
    assert!(imported.diagnostics.is_empty(), "{:?}", imported.diagnostics);
    assert_eq!(get_string_attr(&imported.state, "name"), "adopted");
    assert_eq!(get_string_attr(&imported.state, "project_id"), id);

    let schedule_id = cloud.seed_schedule(json!({
        "ScheduleName": "external",
        "Trigger": {"Type": "CosFileUpload"}
    }));
    let imported = provider
        .import_resource_state(SCHEDULE, &schedule_id.to_string())
        .await;
    assert!(imported.diagnostics.is_empty(), "{:?}", imported.diagnostics);
    assert_eq!(get_string_attr(&imported.state, "schedule_name"), "external");
}

#[tokio::test]
async fn test_import_rejects_malformed_ids() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);

    let imported = provider.import_resource_state(SCENARIO, "project-1").await;
    assert!(imported.state.is_null());
    assert!(has_errors(&imported.diagnostics));

    let imported = provider.import_resource_state(SCHEDULE, "not-a-number").await;
    assert!(imported.state.is_null());
    assert!(imported.diagnostics[0].detail.contains("not a number"));
    assert!(cloud.calls().is_empty());
}

#[tokio::test]
async fn test_unconfigured_provider_reports_diagnostics() {
    let provider = TencentCloudProvider::new();
    let state = tree(json!({"id": "project-1", "name": "x"}));

    let read = provider.read_resource(PROJECT, &state).await;
    assert_eq!(read.state, state);
    assert_eq!(read.diagnostics[0].summary, "Provider not configured");

    let read = provider.read_resource("tencentcloud_pts_unknown", &state).await;
    assert_eq!(read.diagnostics[0].summary, "Unsupported resource type");
}

#[test]
fn test_validate_resource_config() {
    let provider = TencentCloudProvider::new();

    let missing = provider.validate_resource_config(PROJECT, &tree(json!({"description": "no name"})));
    assert!(has_errors(&missing));
    assert!(missing[0].detail.contains("`name`"));

    let unknown = provider.validate_resource_config(PROJECT, &tree(json!({"name": "x", "colour": "blue"})));
    assert!(!has_errors(&unknown));
    assert_eq!(unknown[0].severity, Severity::Warning);
    assert_eq!(unknown[0].attribute.as_deref(), Some("colour"));

    let too_many = provider.validate_resource_config(
        SCENARIO,
        &tree(json!({
            "name": "x",
            "type": "pts-http",
            "project_id": "project-1",
            "load": [{}, {}]
        })),
    );
    assert!(has_errors(&too_many));
}
