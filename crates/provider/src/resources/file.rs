//! PTS file resource
//!
//! Files are registered once; any change replaces them.

use serde_json::{Map, Value};

use tccloud_common::{CompositeId, Error, IdentityLayout, Result};

use super::blocks::FILE_INFO;
use super::{id_part, request_str, Resource};
use crate::api::pts::CreateFileRequest;
use crate::api::{request_from, snapshot_of};
use crate::client::ApiClient;
use crate::schema::{Attribute, Kind, Scalar};

const LAYOUT: IdentityLayout = IdentityLayout::new(&["project_id", "file_id"]);

const STRINGS: Kind = Kind::List(Scalar::String);

const ATTRIBUTES: &[Attribute] = &[
    Attribute::required("file_id", "FileId", Kind::String).force_new(),
    Attribute::required("project_id", "ProjectId", Kind::String).force_new(),
    Attribute::required("kind", "Kind", Kind::Int)
        .force_new()
        .doc("1 for protocol files, 2 for request files, 3 for parameter files."),
    Attribute::required("name", "Name", Kind::String).force_new(),
    Attribute::required("size", "Size", Kind::Int).force_new(),
    Attribute::required("type", "Type", Kind::String).force_new(),
    Attribute::optional("line_count", "LineCount", Kind::Int).force_new(),
    Attribute::optional("head_lines", "HeadLines", STRINGS).force_new(),
    Attribute::optional("tail_lines", "TailLines", STRINGS).force_new(),
    Attribute::optional("header_in_file", "HeaderInFile", Kind::Bool).force_new(),
    Attribute::optional("header_columns", "HeaderColumns", STRINGS).force_new(),
    Attribute::optional("file_infos", "FileInfos", Kind::BlockList(FILE_INFO)).force_new(),
    Attribute::computed("status", "Status", Kind::Int),
    Attribute::computed("created_at", "CreatedAt", Kind::String),
    Attribute::computed("updated_at", "UpdatedAt", Kind::String),
];

pub struct FileResource;

#[async_trait::async_trait]
impl Resource for FileResource {
    fn type_name(&self) -> &'static str {
        "tencentcloud_pts_file"
    }

    fn description(&self) -> &'static str {
        "A file uploaded to a PTS project: protocol, request or parameter data."
    }

    fn attributes(&self) -> &'static [Attribute] {
        ATTRIBUTES
    }

    fn identity(&self) -> IdentityLayout {
        LAYOUT
    }

    async fn create(&self, client: &ApiClient, request: Map<String, Value>) -> Result<CompositeId> {
        let project_id = request_str(&request, "ProjectId")?;
        let file_id = request_str(&request, "FileId")?;
        let request: CreateFileRequest = request_from(request)?;
        client.pts().create_file(&request).await?;
        LAYOUT.encode(&[project_id, file_id])
    }

    async fn describe(&self, client: &ApiClient, id: &CompositeId) -> Result<Option<Value>> {
        let project_id = id_part(&LAYOUT, id, "project_id")?;
        let file_id = id_part(&LAYOUT, id, "file_id")?;
        match client.pts().describe_file(project_id, file_id).await? {
            Some(file) => Ok(Some(snapshot_of(&file)?)),
            None => Ok(None),
        }
    }

    async fn update(
        &self,
        _client: &ApiClient,
        _id: &CompositeId,
        _request: Map<String, Value>,
        changed: &[&'static str],
    ) -> Result<()> {
        Err(Error::InvalidConfig(format!(
            "{} cannot be changed in place: {}",
            self.type_name(),
            changed.join(", ")
        )))
    }

    async fn delete(&self, client: &ApiClient, id: &CompositeId) -> Result<()> {
        let project_id = id_part(&LAYOUT, id, "project_id")?;
        let file_id = id_part(&LAYOUT, id, "file_id")?;
        client.pts().delete_file(project_id, file_id).await
    }
}
