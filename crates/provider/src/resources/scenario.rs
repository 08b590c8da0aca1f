//! PTS scenario resource

use serde_json::{Map, Value};

use tccloud_common::{CompositeId, IdentityLayout, Result};

use super::blocks::{DOMAIN_NAME_CONFIG, FILE_INFO, LOAD, SCRIPT_INFO, SLA_POLICY, TEST_DATA};
use super::{id_part, request_str, Resource};
use crate::api::pts::{CreateScenarioRequest, UpdateScenarioRequest};
use crate::api::{request_from, snapshot_of};
use crate::client::ApiClient;
use crate::schema::{Attribute, Kind, Scalar};

const LAYOUT: IdentityLayout = IdentityLayout::new(&["project_id", "scenario_id"]);

const ATTRIBUTES: &[Attribute] = &[
    Attribute::required("name", "Name", Kind::String),
    Attribute::required("type", "Type", Kind::String).doc("Scenario type, e.g. `pts-http` or `pts-js`."),
    Attribute::required("project_id", "ProjectId", Kind::String).immutable(),
    Attribute::optional("description", "Description", Kind::String),
    Attribute::optional("load", "Load", Kind::Block(LOAD)).doc("Load shape and distribution."),
    Attribute::optional("datasets", "Datasets", Kind::BlockList(TEST_DATA)),
    Attribute::optional("extensions", "Extensions", Kind::List(Scalar::String)),
    Attribute::optional("cron_id", "CronId", Kind::String),
    Attribute::optional("test_scripts", "TestScripts", Kind::BlockList(SCRIPT_INFO)),
    Attribute::optional("protocols", "Protocols", Kind::BlockList(FILE_INFO)),
    Attribute::optional("request_files", "RequestFiles", Kind::BlockList(FILE_INFO)),
    Attribute::optional("sla_policy", "SLAPolicy", Kind::Block(SLA_POLICY)),
    Attribute::optional("plugins", "Plugins", Kind::BlockList(FILE_INFO)),
    Attribute::optional("domain_name_config", "DomainNameConfig", Kind::Block(DOMAIN_NAME_CONFIG)),
    Attribute::computed("scenario_id", "ScenarioId", Kind::String),
    Attribute::computed("status", "Status", Kind::Int),
    Attribute::computed("created_at", "CreatedAt", Kind::String),
    Attribute::computed("updated_at", "UpdatedAt", Kind::String),
    Attribute::computed("app_id", "AppId", Kind::Int),
    Attribute::computed("uin", "Uin", Kind::String),
    Attribute::computed("sub_account_uin", "SubAccountUin", Kind::String),
];

pub struct ScenarioResource;

#[async_trait::async_trait]
impl Resource for ScenarioResource {
    fn type_name(&self) -> &'static str {
        "tencentcloud_pts_scenario"
    }

    fn description(&self) -> &'static str {
        "A PTS load-test scenario: scripts, data sets, load shape and SLA policy."
    }

    fn attributes(&self) -> &'static [Attribute] {
        ATTRIBUTES
    }

    fn identity(&self) -> IdentityLayout {
        LAYOUT
    }

    async fn create(&self, client: &ApiClient, request: Map<String, Value>) -> Result<CompositeId> {
        let project_id = request_str(&request, "ProjectId")?;
        let request: CreateScenarioRequest = request_from(request)?;
        let scenario_id = client.pts().create_scenario(&request).await?;
        LAYOUT.encode(&[project_id, scenario_id])
    }

    async fn describe(&self, client: &ApiClient, id: &CompositeId) -> Result<Option<Value>> {
        let project_id = id_part(&LAYOUT, id, "project_id")?;
        let scenario_id = id_part(&LAYOUT, id, "scenario_id")?;
        match client.pts().describe_scenario(project_id, scenario_id).await? {
            Some(scenario) => Ok(Some(snapshot_of(&scenario)?)),
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
        // UpdateScenario replaces the whole scenario, so every configured field is sent.
        let mut request: UpdateScenarioRequest = request_from(request)?;
        request.project_id = Some(id_part(&LAYOUT, id, "project_id")?.to_string());
        request.scenario_id = Some(id_part(&LAYOUT, id, "scenario_id")?.to_string());
        client.pts().update_scenario(&request).await
    }

    async fn delete(&self, client: &ApiClient, id: &CompositeId) -> Result<()> {
        let project_id = id_part(&LAYOUT, id, "project_id")?;
        let scenario_id = id_part(&LAYOUT, id, "scenario_id")?;
        client.pts().delete_scenario(project_id, scenario_id).await
    }
}
