//! In-memory stand-in for the PTS and MPS APIs.
//!
//! Stores objects as raw JSON records, answers describe calls with the same
//! envelopes the real services use and can inject errors and read-after-write
//! lag per action.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};

use tccloud_common::{Error, Result, RetryPolicy};
use tccloud_provider::client::{ApiClient, Service, Transport};
use tccloud_provider::{Budgets, TencentCloudProvider};

#[derive(Default)]
struct Store {
    next_id: i64,
    projects: BTreeMap<String, Value>,
    scenarios: BTreeMap<String, Value>,
    jobs: BTreeMap<String, Value>,
    files: BTreeMap<String, Value>,
    cron_jobs: BTreeMap<String, Value>,
    alert_channels: BTreeMap<String, Value>,
    schedules: BTreeMap<i64, Value>,
    /// Records returned by DescribeScenarioWithJobs as-is, after the real ones.
    raw_scenario_records: Vec<Value>,
    calls: Vec<(String, Value)>,
    failures: HashMap<String, VecDeque<String>>,
    lag: HashMap<String, u32>,
}

#[derive(Default)]
pub struct FakeCloud {
    store: Mutex<Store>,
}

fn not_found(what: &str) -> Error {
    Error::api("ResourceNotFound", format!("{} does not exist", what))
}

fn str_field<'a>(payload: &'a Value, key: &str) -> &'a str {
    payload.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn first_id(payload: &Value, key: &str) -> String {
    payload
        .get(key)
        .and_then(|ids| ids.get(0))
        .map(|id| match id {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}

fn merge(target: &mut Value, payload: &Value, skip: &[&str]) {
    if let (Some(target), Some(fields)) = (target.as_object_mut(), payload.as_object()) {
        for (key, value) in fields {
            if !skip.contains(&key.as_str()) {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Script bodies are accepted on writes but never stored for reads.
fn strip_script_bodies(record: &mut Value) {
    if let Some(scripts) = record.get_mut("TestScripts").and_then(Value::as_array_mut) {
        for script in scripts {
            if let Some(fields) = script.as_object_mut() {
                fields.remove("EncodedContent");
            }
        }
    }
}

fn page(records: Vec<Value>, payload: &Value) -> Vec<Value> {
    let offset = payload.get("Offset").and_then(Value::as_u64).unwrap_or(0) as usize;
    let limit = payload.get("Limit").and_then(Value::as_u64).unwrap_or(20) as usize;
    records.into_iter().skip(offset).take(limit).collect()
}

impl FakeCloud {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fail the next `times` calls of `action` with vendor `code`.
    pub fn fail(&self, action: &str, code: &str, times: usize) {
        let mut store = self.store.lock();
        let queue = store.failures.entry(action.to_string()).or_default();
        queue.extend(std::iter::repeat(code.to_string()).take(times));
    }

    /// Make the next `times` describe calls of `action` find nothing.
    pub fn lag(&self, action: &str, times: u32) {
        self.store.lock().lag.insert(action.to_string(), times);
    }

    /// Actions called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.store.lock().calls.iter().map(|(action, _)| action.clone()).collect()
    }

    pub fn count(&self, action: &str) -> usize {
        self.store.lock().calls.iter().filter(|(a, _)| a == action).count()
    }

    /// Payload of the most recent call of `action`.
    pub fn last_request(&self, action: &str) -> Option<Value> {
        self.store
            .lock()
            .calls
            .iter()
            .rev()
            .find(|(a, _)| a == action)
            .map(|(_, payload)| payload.clone())
    }

    pub fn push_raw_scenario_record(&self, record: Value) {
        self.store.lock().raw_scenario_records.push(record);
    }

    pub fn project(&self, id: &str) -> Option<Value> {
        self.store.lock().projects.get(id).cloned()
    }

    pub fn scenario(&self, id: &str) -> Option<Value> {
        self.store.lock().scenarios.get(id).cloned()
    }

    /// Change a stored project behind the provider's back.
    pub fn edit_project(&self, id: &str, edit: impl FnOnce(&mut Value)) {
        if let Some(record) = self.store.lock().projects.get_mut(id) {
            edit(record);
        }
    }

    pub fn job(&self, id: &str) -> Option<Value> {
        self.store.lock().jobs.get(id).cloned()
    }

    pub fn schedule(&self, id: i64) -> Option<Value> {
        self.store.lock().schedules.get(&id).cloned()
    }

    /// Remove a project behind the provider's back.
    pub fn drop_project(&self, id: &str) {
        self.store.lock().projects.remove(id);
    }

    /// Add a schedule directly, as if created elsewhere.
    pub fn seed_schedule(&self, record: Value) -> i64 {
        let mut store = self.store.lock();
        store.next_id += 1;
        let id = store.next_id;
        let mut record = record;
        merge(&mut record, &json!({"ScheduleId": id, "Status": "Enabled"}), &[]);
        store.schedules.insert(id, record);
        id
    }

    fn handle(&self, action: &str, payload: &Value) -> Result<Value> {
        let mut store = self.store.lock();
        store.calls.push((action.to_string(), payload.clone()));

        if let Some(code) = store.failures.get_mut(action).and_then(VecDeque::pop_front) {
            return Err(Error::api(code, format!("injected failure for {}", action)));
        }
        let lagging = match store.lag.get_mut(action) {
            Some(n) if *n > 0 => {
                *n -= 1;
                true
            }
            _ => false,
        };

        match action {
            // projects
            "CreateProject" => {
                store.next_id += 1;
                let id = format!("project-{}", store.next_id);
                let mut record = payload.clone();
                merge(&mut record, &json!({"ProjectId": id, "Status": 1, "AppId": 1250000000}), &[]);
                store.projects.insert(id.clone(), record);
                Ok(json!({"ProjectId": id}))
            }
            "DescribeProjects" => {
                let id = first_id(payload, "ProjectIds");
                let found = store.projects.get(&id).filter(|_| !lagging).cloned();
                Ok(json!({"ProjectSet": found.into_iter().collect::<Vec<_>>(), "Total": 1}))
            }
            "UpdateProject" => {
                let id = str_field(payload, "ProjectId").to_string();
                let record = store.projects.get_mut(&id).ok_or_else(|| not_found(&id))?;
                merge(record, payload, &["ProjectId"]);
                Ok(json!({}))
            }
            "DeleteProjects" => {
                let id = first_id(payload, "ProjectIds");
                store.projects.remove(&id).ok_or_else(|| not_found(&id))?;
                Ok(json!({}))
            }

            // scenarios
            "CreateScenario" => {
                store.next_id += 1;
                let id = format!("scenario-{}", store.next_id);
                let mut record = payload.clone();
                merge(&mut record, &json!({"ScenarioId": id, "Status": 1}), &[]);
                strip_script_bodies(&mut record);
                store.scenarios.insert(id.clone(), record);
                Ok(json!({"ScenarioId": id}))
            }
            "DescribeScenarios" => {
                let id = first_id(payload, "ScenarioIds");
                let found = store.scenarios.get(&id).filter(|_| !lagging).cloned();
                Ok(json!({"ScenarioSet": found.into_iter().collect::<Vec<_>>()}))
            }
            "UpdateScenario" => {
                let id = str_field(payload, "ScenarioId").to_string();
                let record = store.scenarios.get_mut(&id).ok_or_else(|| not_found(&id))?;
                merge(record, payload, &["ScenarioId"]);
                strip_script_bodies(record);
                Ok(json!({}))
            }
            "DeleteScenarios" => {
                let id = first_id(payload, "ScenarioIds");
                store.scenarios.remove(&id).ok_or_else(|| not_found(&id))?;
                Ok(json!({}))
            }

            // jobs
            "StartJob" => {
                store.next_id += 1;
                let id = format!("job-{}", store.next_id);
                let record = json!({
                    "JobId": id,
                    "ScenarioId": str_field(payload, "ScenarioId"),
                    "ProjectId": str_field(payload, "ProjectId"),
                    "JobOwner": str_field(payload, "JobOwner"),
                    "Note": payload.get("Note").cloned().unwrap_or(Value::Null),
                    "Status": 2,
                    "ResponseTimeP99": 12.5,
                });
                store.jobs.insert(id.clone(), record);
                Ok(json!({"JobId": id}))
            }
            "DescribeJobs" => {
                let id = first_id(payload, "JobIds");
                let found = store.jobs.get(&id).filter(|_| !lagging).cloned();
                Ok(json!({"JobSet": found.into_iter().collect::<Vec<_>>()}))
            }
            "UpdateJob" => {
                let id = str_field(payload, "JobId").to_string();
                let record = store.jobs.get_mut(&id).ok_or_else(|| not_found(&id))?;
                merge(record, &json!({"Note": payload.get("Note").cloned().unwrap_or(Value::Null)}), &[]);
                Ok(json!({}))
            }
            "AbortJob" => {
                let id = str_field(payload, "JobId").to_string();
                let record = store.jobs.get_mut(&id).ok_or_else(|| not_found(&id))?;
                merge(record, &json!({"Status": 7}), &[]);
                Ok(json!({}))
            }
            "DeleteJobs" => {
                let id = first_id(payload, "JobIds");
                let status = store
                    .jobs
                    .get(&id)
                    .ok_or_else(|| not_found(&id))?
                    .get("Status")
                    .and_then(Value::as_i64);
                if status == Some(2) {
                    return Err(Error::api("InvalidParameter.JobRunning", "job is still running"));
                }
                store.jobs.remove(&id);
                Ok(json!({}))
            }

            // files
            "CreateFile" => {
                let id = str_field(payload, "FileId").to_string();
                let mut record = payload.clone();
                merge(&mut record, &json!({"Status": 0}), &[]);
                store.files.insert(id, record);
                Ok(json!({}))
            }
            "DescribeFiles" => {
                let id = first_id(payload, "FileIds");
                let found = store.files.get(&id).filter(|_| !lagging).cloned();
                Ok(json!({"FileSet": found.into_iter().collect::<Vec<_>>()}))
            }
            "DeleteFiles" => {
                let id = first_id(payload, "FileIds");
                store.files.remove(&id).ok_or_else(|| not_found(&id))?;
                Ok(json!({}))
            }

            // cron jobs
            "CreateCronJob" => {
                store.next_id += 1;
                let id = format!("cron-{}", store.next_id);
                let mut record = payload.clone();
                merge(&mut record, &json!({"CronJobId": id, "Status": 0}), &[]);
                store.cron_jobs.insert(id.clone(), record);
                Ok(json!({"CronJobId": id}))
            }
            "DescribeCronJobs" => {
                let id = first_id(payload, "CronJobIds");
                let found = store.cron_jobs.get(&id).filter(|_| !lagging).cloned();
                Ok(json!({"CronJobSet": found.into_iter().collect::<Vec<_>>()}))
            }
            "UpdateCronJob" => {
                let id = str_field(payload, "CronJobId").to_string();
                let record = store.cron_jobs.get_mut(&id).ok_or_else(|| not_found(&id))?;
                merge(record, payload, &["CronJobId"]);
                Ok(json!({}))
            }
            "DeleteCronJobs" => {
                let id = first_id(payload, "CronJobIds");
                store.cron_jobs.remove(&id).ok_or_else(|| not_found(&id))?;
                Ok(json!({}))
            }

            // alert channels
            "CreateAlertChannel" => {
                let key = format!("{}#{}", str_field(payload, "ProjectId"), str_field(payload, "NoticeId"));
                let mut record = payload.clone();
                merge(&mut record, &json!({"Status": 1}), &[]);
                store.alert_channels.insert(key, record);
                Ok(json!({}))
            }
            "DescribeAlertChannels" => {
                let key = format!("{}#{}", first_id(payload, "ProjectIds"), first_id(payload, "NoticeIds"));
                let found = store.alert_channels.get(&key).filter(|_| !lagging).cloned();
                Ok(json!({"AlertChannelSet": found.into_iter().collect::<Vec<_>>()}))
            }
            "DeleteAlertChannel" => {
                let key = format!("{}#{}", str_field(payload, "ProjectId"), str_field(payload, "NoticeId"));
                store.alert_channels.remove(&key).ok_or_else(|| not_found(&key))?;
                Ok(json!({}))
            }

            // scenario listing
            "DescribeScenarioWithJobs" => {
                let projects: Vec<&str> = payload
                    .get("ProjectIds")
                    .and_then(Value::as_array)
                    .map(|ids| ids.iter().filter_map(Value::as_str).collect())
                    .unwrap_or_default();
                let mut records: Vec<Value> = store
                    .scenarios
                    .values()
                    .filter(|s| projects.contains(&str_field(s, "ProjectId")))
                    .map(|scenario| {
                        let id = str_field(scenario, "ScenarioId");
                        let jobs: Vec<Value> = store
                            .jobs
                            .values()
                            .filter(|j| str_field(j, "ScenarioId") == id)
                            .cloned()
                            .collect();
                        json!({"Scenario": scenario, "Jobs": jobs})
                    })
                    .collect();
                records.extend(store.raw_scenario_records.iter().cloned());
                Ok(json!({"ScenarioWithJobsSet": page(records, payload)}))
            }

            // mps
            "CreateSchedule" => {
                store.next_id += 1;
                let id = store.next_id;
                let mut record = payload.clone();
                merge(&mut record, &json!({"ScheduleId": id, "Status": "Enabled"}), &[]);
                store.schedules.insert(id, record);
                Ok(json!({"ScheduleId": id}))
            }
            "DescribeSchedules" => {
                let wanted: Vec<i64> = payload
                    .get("ScheduleIds")
                    .and_then(Value::as_array)
                    .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
                    .unwrap_or_default();
                let trigger = payload.get("TriggerType").and_then(Value::as_str);
                let records: Vec<Value> = if lagging {
                    Vec::new()
                } else {
                    store
                        .schedules
                        .iter()
                        .filter(|(id, _)| wanted.is_empty() || wanted.contains(*id))
                        .filter(|(_, s)| trigger.map_or(true, |t| s.pointer("/Trigger/Type").and_then(Value::as_str) == Some(t)))
                        .map(|(_, s)| s.clone())
                        .collect()
                };
                Ok(json!({"ScheduleInfoSet": page(records, payload), "TotalCount": 0}))
            }
            "ModifySchedule" => {
                let id = payload.get("ScheduleId").and_then(Value::as_i64).unwrap_or_default();
                let record = store.schedules.get_mut(&id).ok_or_else(|| not_found(&id.to_string()))?;
                merge(record, payload, &["ScheduleId"]);
                Ok(json!({}))
            }
            "DeleteSchedule" => {
                let id = payload.get("ScheduleId").and_then(Value::as_i64).unwrap_or_default();
                store.schedules.remove(&id).ok_or_else(|| not_found(&id.to_string()))?;
                Ok(json!({}))
            }

            other => Err(Error::api("InvalidAction", format!("{} is not supported", other))),
        }
    }
}

#[async_trait]
impl Transport for FakeCloud {
    async fn invoke(&self, _service: Service, action: &str, payload: Value) -> Result<Value> {
        self.handle(action, &payload)
    }
}

/// Retry budgets short enough for tests, with paused time.
pub fn fast_budgets() -> Budgets {
    let backoff = |policy: RetryPolicy| {
        policy.with_backoff(Duration::from_millis(100), Duration::from_secs(1), 2.0)
    };
    Budgets {
        read: backoff(RetryPolicy::read()).with_timeout(Duration::from_secs(10)),
        write: backoff(RetryPolicy::write()).with_timeout(Duration::from_secs(20)),
    }
}

pub fn client(cloud: &Arc<FakeCloud>) -> ApiClient {
    ApiClient::new(cloud.clone()).with_rate_limit(0)
}

pub fn provider(cloud: &Arc<FakeCloud>) -> TencentCloudProvider {
    TencentCloudProvider::with_client(client(cloud), fast_budgets())
}

/// Build a configuration tree from JSON.
pub fn tree(value: Value) -> tccloud_provider::DynamicValue {
    tccloud_provider::DynamicValue::from(&value)
}

pub fn object(pairs: &[(&str, Value)]) -> Map<String, Value> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
}
