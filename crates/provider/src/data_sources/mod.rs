//! Data Source Implementations
//!
//! A data source runs one paginated describe call with the configured
//! filters and exposes every returned record as a nested block list.

pub mod mps_schedules;
pub mod pts_scenario_with_jobs;

use std::path::Path;

use async_trait::async_trait;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use tccloud_common::{retry, Error, Result};

use crate::client::ApiClient;
use crate::mapper::{flatten, unflatten_records};
use crate::resources::Budgets;
use crate::schema::{Attribute, SchemaDoc};
use crate::state::{get_optional_string_attr, string_value, DynamicValue};

/// Name of the optional side-output argument every data source accepts.
pub const RESULT_OUTPUT_FILE: &str = "result_output_file";

/// Trait for data source reads
#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Filters, `result_output_file` and the computed result list.
    fn attributes(&self) -> &'static [Attribute];

    /// Attribute holding the result list
    fn result_attribute(&self) -> &'static str;

    /// Attributes of one result record
    fn record_attributes(&self) -> &'static [Attribute];

    /// Every record matching `filter`, unparsed.
    async fn fetch(&self, client: &ApiClient, filter: Map<String, Value>) -> Result<Vec<Value>>;

    /// Check one record against its API model and return its canonical form.
    fn parse_record(&self, raw: Value) -> Result<Value>;

    /// Stable identifier of one parsed record.
    fn record_id(&self, record: &Value) -> Option<String>;

    fn schema(&self) -> SchemaDoc {
        SchemaDoc {
            type_name: self.type_name(),
            description: self.description(),
            identity: Vec::new(),
            attributes: self.attributes(),
        }
    }
}

/// Every data source the provider serves.
pub fn registry() -> Vec<Box<dyn DataSource>> {
    vec![
        Box::new(mps_schedules::MpsSchedulesDataSource),
        Box::new(pts_scenario_with_jobs::PtsScenarioWithJobsDataSource),
    ]
}

/// Outcome of a data source read.
#[derive(Debug, Clone)]
pub struct DataSourceRead {
    pub state: DynamicValue,
    /// Records dropped because they did not match the API model.
    pub skipped: usize,
}

/// Hash of the record ids, used as the data source id.
pub fn ids_hash<S: AsRef<str>>(ids: &[S]) -> String {
    let mut hasher = Sha256::new();
    for id in ids {
        hasher.update(id.as_ref().as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(&hasher.finalize()[..8])
}

/// Run the data source with the filters in `config`.
pub async fn read(
    source: &dyn DataSource,
    client: &ApiClient,
    budgets: &Budgets,
    config: &DynamicValue,
) -> Result<DataSourceRead> {
    let op = format!("{}.read", source.type_name());
    info!("Reading {}", source.type_name());

    let result = async {
        let filter = flatten(source.attributes(), config)?;
        let raw = retry(&budgets.read, &op, || source.fetch(client, filter.clone())).await?;
        let total = raw.len();

        let mut records = Vec::with_capacity(total);
        for (index, record) in raw.into_iter().enumerate() {
            match source.parse_record(record) {
                Ok(record) => records.push(record),
                Err(e) => warn!(index, "Skipping malformed {} record: {}", source.type_name(), e),
            }
        }
        let skipped = total - records.len();

        let ids: Vec<String> = records.iter().filter_map(|r| source.record_id(r)).collect();
        let items = unflatten_records(source.record_attributes(), &records);
        debug!("{} returned {} records, {} skipped", source.type_name(), items.len(), skipped);

        if let Some(path) = get_optional_string_attr(config, RESULT_OUTPUT_FILE) {
            write_result_file(Path::new(&path), &items).await?;
        }

        let mut state = match config {
            DynamicValue::Map(fields) => DynamicValue::Map(fields.clone()),
            _ => DynamicValue::Map(Default::default()),
        };
        if let Some(fields) = state.as_map_mut() {
            fields.insert(source.result_attribute().to_string(), DynamicValue::List(items));
            fields.insert("id".to_string(), string_value(ids_hash(&ids)));
        }

        Ok(DataSourceRead { state, skipped })
    }
    .await;

    result.map_err(|e: Error| e.context(op))
}

async fn write_result_file(path: &Path, items: &[DynamicValue]) -> Result<()> {
    let json: Vec<Value> = items.iter().map(DynamicValue::to_json).collect();
    let content = serde_json::to_string_pretty(&json)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;
    info!("Wrote {} records to {}", items.len(), path.display());
    Ok(())
}
