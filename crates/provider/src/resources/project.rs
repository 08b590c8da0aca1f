//! PTS project resource

use serde_json::{Map, Value};

use tccloud_common::{CompositeId, IdentityLayout, Result};

use super::blocks::TAG_SPEC;
use super::{id_part, Resource};
use crate::api::pts::{CreateProjectRequest, UpdateProjectRequest};
use crate::api::{request_from, snapshot_of};
use crate::client::ApiClient;
use crate::schema::{Attribute, Kind};

const LAYOUT: IdentityLayout = IdentityLayout::new(&["project_id"]);

const ATTRIBUTES: &[Attribute] = &[
    Attribute::required("name", "Name", Kind::String).doc("Project name."),
    Attribute::optional("description", "Description", Kind::String),
    Attribute::optional("tags", "Tags", Kind::BlockList(TAG_SPEC)),
    Attribute::computed("project_id", "ProjectId", Kind::String),
    Attribute::computed("status", "Status", Kind::Int).doc("Project status."),
    Attribute::computed("created_at", "CreatedAt", Kind::String),
    Attribute::computed("updated_at", "UpdatedAt", Kind::String),
    Attribute::computed("app_id", "AppId", Kind::Int),
    Attribute::computed("uin", "Uin", Kind::String),
    Attribute::computed("sub_account_uin", "SubAccountUin", Kind::String),
];

pub struct ProjectResource;

#[async_trait::async_trait]
impl Resource for ProjectResource {
    fn type_name(&self) -> &'static str {
        "tencentcloud_pts_project"
    }

    fn description(&self) -> &'static str {
        "A PTS project grouping scenarios, files and jobs."
    }

    fn attributes(&self) -> &'static [Attribute] {
        ATTRIBUTES
    }

    fn identity(&self) -> IdentityLayout {
        LAYOUT
    }

    async fn create(&self, client: &ApiClient, request: Map<String, Value>) -> Result<CompositeId> {
        let request: CreateProjectRequest = request_from(request)?;
        let project_id = client.pts().create_project(&request).await?;
        LAYOUT.encode(&[project_id])
    }

    async fn describe(&self, client: &ApiClient, id: &CompositeId) -> Result<Option<Value>> {
        let project_id = id_part(&LAYOUT, id, "project_id")?;
        match client.pts().describe_project(project_id).await? {
            Some(project) => Ok(Some(snapshot_of(&project)?)),
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
        let mut request: UpdateProjectRequest = request_from(request)?;
        request.project_id = Some(id_part(&LAYOUT, id, "project_id")?.to_string());
        client.pts().update_project(&request).await
    }

    async fn delete(&self, client: &ApiClient, id: &CompositeId) -> Result<()> {
        let project_id = id_part(&LAYOUT, id, "project_id")?;
        client.pts().delete_project(project_id).await
    }
}
