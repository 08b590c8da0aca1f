//! PTS alert channel resource
//!
//! Binds a notice template to a project. Nothing about a binding can be
//! changed after creation.

use serde_json::{Map, Value};

use tccloud_common::{CompositeId, Error, IdentityLayout, Result};

use super::{id_part, request_str, Resource};
use crate::api::pts::CreateAlertChannelRequest;
use crate::api::{request_from, snapshot_of};
use crate::client::ApiClient;
use crate::schema::{Attribute, Kind};

const LAYOUT: IdentityLayout = IdentityLayout::new(&["project_id", "notice_id"]);

const ATTRIBUTES: &[Attribute] = &[
    Attribute::required("notice_id", "NoticeId", Kind::String)
        .immutable()
        .doc("Notice template id."),
    Attribute::required("project_id", "ProjectId", Kind::String).immutable(),
    Attribute::optional("amp_consumer_id", "AMPConsumerId", Kind::String).immutable(),
    Attribute::computed("status", "Status", Kind::Int),
    Attribute::computed("created_at", "CreatedAt", Kind::String),
    Attribute::computed("updated_at", "UpdatedAt", Kind::String),
    Attribute::computed("app_id", "AppId", Kind::Int),
    Attribute::computed("uin", "Uin", Kind::String),
    Attribute::computed("sub_account_uin", "SubAccountUin", Kind::String),
];

pub struct AlertChannelResource;

#[async_trait::async_trait]
impl Resource for AlertChannelResource {
    fn type_name(&self) -> &'static str {
        "tencentcloud_pts_alert_channel"
    }

    fn description(&self) -> &'static str {
        "An alert notice channel bound to a PTS project."
    }

    fn attributes(&self) -> &'static [Attribute] {
        ATTRIBUTES
    }

    fn identity(&self) -> IdentityLayout {
        LAYOUT
    }

    async fn create(&self, client: &ApiClient, request: Map<String, Value>) -> Result<CompositeId> {
        let project_id = request_str(&request, "ProjectId")?;
        let notice_id = request_str(&request, "NoticeId")?;
        let request: CreateAlertChannelRequest = request_from(request)?;
        client.pts().create_alert_channel(&request).await?;
        LAYOUT.encode(&[project_id, notice_id])
    }

    async fn describe(&self, client: &ApiClient, id: &CompositeId) -> Result<Option<Value>> {
        let project_id = id_part(&LAYOUT, id, "project_id")?;
        let notice_id = id_part(&LAYOUT, id, "notice_id")?;
        match client.pts().describe_alert_channel(project_id, notice_id).await? {
            Some(channel) => Ok(Some(snapshot_of(&channel)?)),
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
        Err(Error::ImmutableAttribute {
            attribute: changed.first().copied().unwrap_or("notice_id").to_string(),
        })
    }

    async fn delete(&self, client: &ApiClient, id: &CompositeId) -> Result<()> {
        let project_id = id_part(&LAYOUT, id, "project_id")?;
        let notice_id = id_part(&LAYOUT, id, "notice_id")?;
        client.pts().delete_alert_channel(project_id, notice_id).await
    }
}
