//! Data source reads against an in-memory cloud.

mod common;

use serde_json::{json, Value};

use common::{provider, tree, FakeCloud};
use tccloud_provider::data_sources::ids_hash;
use tccloud_provider::provider::has_errors;
use tccloud_provider::state::get_string_attr;
use tccloud_provider::{DynamicValue, Severity};

const SCHEDULES: &str = "tencentcloud_mps_schedules";
const SCENARIO_WITH_JOBS: &str = "tencentcloud_pts_scenario_with_jobs";

fn seed_schedules(cloud: &FakeCloud, count: usize, trigger: &str) -> Vec<i64> {
    (0..count)
        .map(|n| {
            cloud.seed_schedule(json!({
                "ScheduleName": format!("schedule-{}", n),
                "Trigger": {"Type": trigger},
                "Activities": [{"ActivityType": "input"}]
            }))
        })
        .collect()
}

fn records<'a>(state: &'a DynamicValue, attribute: &str) -> &'a [DynamicValue] {
    state.get(attribute).and_then(DynamicValue::as_list).unwrap_or_default()
}

#[tokio::test]
async fn test_schedules_walks_every_page() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    let ids = seed_schedules(&cloud, 25, "CosFileUpload");

    let read = provider.read_data_source(SCHEDULES, &tree(json!({}))).await;

    assert!(read.diagnostics.is_empty(), "{:?}", read.diagnostics);
    let found = records(&read.state, "schedule_info_set");
    assert_eq!(found.len(), 25);
    assert_eq!(found[0].get("schedule_name"), Some(&DynamicValue::String("schedule-0".into())));
    assert_eq!(cloud.count("DescribeSchedules"), 2);

    let ids: Vec<String> = ids.iter().map(i64::to_string).collect();
    assert_eq!(get_string_attr(&read.state, "id"), ids_hash(&ids));
}

#[tokio::test]
async fn test_schedules_filters_are_sent() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    seed_schedules(&cloud, 2, "CosFileUpload");
    let s3 = seed_schedules(&cloud, 1, "AwsS3FileUpload");

    let read = provider
        .read_data_source(SCHEDULES, &tree(json!({"trigger_type": "AwsS3FileUpload"})))
        .await;

    let found = records(&read.state, "schedule_info_set");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].get("schedule_id"), Some(&DynamicValue::Int(s3[0])));
    // filters stay in state next to the results
    assert_eq!(get_string_attr(&read.state, "trigger_type"), "AwsS3FileUpload");

    let request = cloud.last_request("DescribeSchedules").unwrap();
    assert_eq!(request["TriggerType"], json!("AwsS3FileUpload"));
    assert_eq!(request["Offset"], json!(0));
    assert_eq!(request["Limit"], json!(20));
}

#[tokio::test]
async fn test_malformed_records_are_skipped() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);
    seed_schedules(&cloud, 3, "CosFileUpload");
    cloud.seed_schedule(json!({"ScheduleName": "broken", "Activities": "not a list"}));

    let read = provider.read_data_source(SCHEDULES, &tree(json!({}))).await;

    assert_eq!(records(&read.state, "schedule_info_set").len(), 3);
    assert_eq!(read.diagnostics.len(), 1);
    assert_eq!(read.diagnostics[0].severity, Severity::Warning);
    assert!(read.diagnostics[0].detail.starts_with("1 records"));
}

#[tokio::test(start_paused = true)]
async fn test_scenario_with_jobs_groups_jobs_under_scenarios() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);

    let scenario = provider
        .apply_resource_change(
            "tencentcloud_pts_scenario",
            &DynamicValue::Null,
            &tree(json!({"name": "browse", "type": "pts-http", "project_id": "project-1"})),
        )
        .await;
    let scenario_id = get_string_attr(&scenario.state, "scenario_id");
    let job = provider
        .apply_resource_change(
            "tencentcloud_pts_job",
            &DynamicValue::Null,
            &tree(json!({"scenario_id": scenario_id, "project_id": "project-1", "job_owner": "alice"})),
        )
        .await;
    assert!(job.diagnostics.is_empty(), "{:?}", job.diagnostics);
    cloud.push_raw_scenario_record(json!({"Scenario": "not an object"}));
    cloud.push_raw_scenario_record(json!(42));

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("reports").join("scenarios.json");
    let read = provider
        .read_data_source(
            SCENARIO_WITH_JOBS,
            &tree(json!({
                "project_ids": ["project-1"],
                "result_output_file": output.to_string_lossy()
            })),
        )
        .await;

    assert!(!has_errors(&read.diagnostics), "{:?}", read.diagnostics);
    assert!(read.diagnostics[0].detail.starts_with("2 records"));

    let found = records(&read.state, "scenario_with_jobs_set");
    assert_eq!(found.len(), 1);
    let scenario = &records(&found[0], "scenario")[0];
    assert_eq!(get_string_attr(scenario, "scenario_id"), scenario_id);
    let jobs = records(&found[0], "jobs");
    assert_eq!(jobs.len(), 1);
    assert_eq!(get_string_attr(&jobs[0], "job_owner"), "alice");
    assert_eq!(get_string_attr(&read.state, "id"), ids_hash(&[scenario_id.as_str()]));

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let written = written.as_array().unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0]["jobs"][0]["job_owner"], json!("alice"));
}

#[tokio::test]
async fn test_required_filter_is_enforced() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);

    let diagnostics = provider.validate_data_source_config(SCENARIO_WITH_JOBS, &tree(json!({})));
    assert!(has_errors(&diagnostics));

    let read = provider.read_data_source(SCENARIO_WITH_JOBS, &tree(json!({}))).await;
    assert!(read.state.is_null());
    assert!(read.diagnostics[0].detail.contains("project_ids"));
    assert!(cloud.calls().is_empty());
}

#[tokio::test]
async fn test_empty_result_has_stable_id() {
    let cloud = FakeCloud::new();
    let provider = provider(&cloud);

    let first = provider.read_data_source(SCHEDULES, &tree(json!({}))).await;
    let second = provider.read_data_source(SCHEDULES, &tree(json!({}))).await;

    assert!(records(&first.state, "schedule_info_set").is_empty());
    assert_eq!(get_string_attr(&first.state, "id"), ids_hash::<&str>(&[]));
    assert_eq!(first.state, second.state);
}
