//! `hetznerrobot_boot` resource and data source.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::data::{parse_resource_id, resource_id, ResourceData};
use super::schema::{AttrType, Attribute, Schema};
use super::{DataSource, Resource};
use crate::api::RobotApi;
use crate::boot::{BootProfile, BootProfileKind};
use crate::error::RobotError;

const TYPE_NAME: &str = "hetznerrobot_boot";

fn string_list() -> AttrType {
    AttrType::List(Box::new(AttrType::String))
}

/// Copy computed network and credential fields.
fn set_computed(data: &mut ResourceData, boot: &BootProfile) -> Result<(), RobotError> {
    data.set("ipv4_address", &boot.server_ipv4)?;
    data.set("ipv6_network", &boot.server_ipv6)?;
    data.set("password", &boot.password)
}

/// Copy every field a read refreshes.
fn set_profile(data: &mut ResourceData, boot: &BootProfile) -> Result<(), RobotError> {
    data.set(
        "active_profile",
        boot.active_profile().map(BootProfileKind::as_str),
    )?;
    data.set("language", boot.language())?;
    data.set("operating_system", boot.operating_system())?;
    set_computed(data, boot)
}

/// Boot profile as a managed resource.
///
/// Delete only forgets the resource; Robot has no call to remove a boot profile.
#[derive(Clone)]
pub struct BootResource {
    api: Arc<dyn RobotApi>,
}

impl BootResource {
    /// Resource backed by `api`.
    #[must_use]
    pub fn new(api: Arc<dyn RobotApi>) -> Self {
        Self { api }
    }

    async fn apply(&self, data: &ResourceData) -> Result<(u32, BootProfile), RobotError> {
        data.check_required()?;
        let server_number = data.get_server_number("server_number")?;
        let profile: BootProfileKind = data.get_str("active_profile")?.unwrap_or("").parse()?;
        let os = data.get_str("operating_system")?.unwrap_or("");
        let lang = data.get_str("language")?.unwrap_or("");
        let authorized_keys = data.get_str_list("authorized_keys")?;

        let boot = self
            .api
            .set_boot_profile(server_number, profile, os, lang, &authorized_keys)
            .await?;
        Ok((server_number, boot))
    }

    fn tracked_server_number(data: &ResourceData) -> Result<u32, RobotError> {
        let id = data
            .id()
            .ok_or_else(|| RobotError::InvalidId(String::new()))?;
        parse_resource_id(id)
    }
}

#[async_trait]
impl Resource for BootResource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with_attribute(
                "server_number",
                Attribute::required(AttrType::Int).describe("Server ID"),
            )
            .with_attribute(
                "active_profile",
                Attribute::optional(AttrType::String).describe("Active boot profile"),
            )
            .with_attribute(
                "language",
                Attribute::optional(AttrType::String).describe("Language"),
            )
            .with_attribute(
                "operating_system",
                Attribute::optional(AttrType::String)
                    .describe("Active Operating System / Distribution"),
            )
            .with_attribute(
                "authorized_keys",
                Attribute::optional(string_list()).describe("One or more SSH key fingerprints"),
            )
            .with_attribute(
                "ipv4_address",
                Attribute::computed(AttrType::String).describe("Server main IPv4 address"),
            )
            .with_attribute(
                "ipv6_network",
                Attribute::computed(AttrType::String).describe("Server main IPv6 net address"),
            )
            .with_attribute(
                "password",
                Attribute::computed(AttrType::String)
                    .sensitive()
                    .describe("Current Rescue System root password / Linux installation password"),
            )
    }

    async fn create(&self, data: &mut ResourceData) -> Result<(), RobotError> {
        let (server_number, boot) = self.apply(data).await?;
        set_computed(data, &boot)?;
        data.set_id(resource_id(server_number));
        info!(server_number, "Boot resource created");
        Ok(())
    }

    async fn read(&self, data: &mut ResourceData) -> Result<(), RobotError> {
        let server_number = Self::tracked_server_number(data)?;
        let boot = self.api.get_boot_profile(server_number).await?;
        set_profile(data, &boot)
    }

    async fn update(&self, data: &mut ResourceData) -> Result<(), RobotError> {
        let (server_number, boot) = self.apply(data).await?;
        set_computed(data, &boot)?;
        info!(server_number, "Boot resource updated");
        Ok(())
    }

    async fn delete(&self, data: &mut ResourceData) -> Result<(), RobotError> {
        data.clear_id();
        Ok(())
    }

    async fn import(&self, mut data: ResourceData) -> Result<Vec<ResourceData>, RobotError> {
        let server_number = Self::tracked_server_number(&data)?;
        let boot = self.api.get_boot_profile(server_number).await?;
        set_profile(&mut data, &boot)?;
        data.set("server_number", server_number)?;
        Ok(vec![data])
    }
}

/// Boot profile as a read-only data source.
///
/// The server is taken from `server_number` when set, otherwise from the identifier.
#[derive(Clone)]
pub struct BootDataSource {
    api: Arc<dyn RobotApi>,
}

impl BootDataSource {
    /// Data source backed by `api`.
    #[must_use]
    pub fn new(api: Arc<dyn RobotApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for BootDataSource {
    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .with_attribute(
                "server_number",
                Attribute::optional(AttrType::Int).describe("Server ID"),
            )
            .with_attribute("active_profile", Attribute::computed(AttrType::String))
            .with_attribute("ipv4_address", Attribute::computed(AttrType::String))
            .with_attribute("ipv6_network", Attribute::computed(AttrType::String))
            .with_attribute("language", Attribute::computed(AttrType::String))
            .with_attribute("operating_system", Attribute::computed(AttrType::String))
            .with_attribute(
                "password",
                Attribute::computed(AttrType::String).sensitive(),
            )
    }

    async fn read(&self, data: &mut ResourceData) -> Result<(), RobotError> {
        let server_number = if data.get("server_number").is_some() {
            data.get_server_number("server_number")?
        } else {
            BootResource::tracked_server_number(data)?
        };

        let boot = self.api.get_boot_profile(server_number).await?;
        set_profile(data, &boot)?;
        data.set_id(resource_id(server_number));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::boot::ActiveBoot;
    use crate::resources::testing::{FakeRobot, SetCall};

    fn rescue_boot(server_number: u32) -> BootProfile {
        BootProfile {
            server_number,
            active: ActiveBoot::Rescue {
                os: "linux".to_string(),
            },
            password: Some("r00t".to_string()),
            server_ipv4: Some("1.2.3.4".to_string()),
            server_ipv6: Some("2a01::".to_string()),
            ..BootProfile::default()
        }
    }

    #[tokio::test]
    async fn test_create_sets_id_and_computed() {
        let fake = Arc::new(FakeRobot::default());
        let resource = BootResource::new(fake.clone());
        let mut data = ResourceData::from_config(
            resource.schema(),
            json!({
                "server_number": 42,
                "active_profile": "linux",
                "operating_system": "ubuntu_20.04",
                "language": "en",
                "authorized_keys": ["aa:bb"]
            }),
        )
        .unwrap();

        resource.create(&mut data).await.unwrap();

        assert_eq!(data.id(), Some("42"));
        assert_eq!(data.get_str("password").unwrap(), Some("generated"));
        assert_eq!(
            fake.set_calls.lock().unwrap().as_slice(),
            &[SetCall {
                server_number: 42,
                profile: BootProfileKind::Linux,
                os: "ubuntu_20.04".to_string(),
                lang: "en".to_string(),
                authorized_keys: vec!["aa:bb".to_string()],
            }]
        );
    }

    #[tokio::test]
    async fn test_create_requires_server_number() {
        let resource = BootResource::new(Arc::new(FakeRobot::default()));
        let mut data =
            ResourceData::from_config(resource.schema(), json!({"active_profile": "rescue"}))
                .unwrap();
        let err = resource.create(&mut data).await.unwrap_err();
        assert!(matches!(err, RobotError::Attribute(_)));
        assert_eq!(data.id(), None);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_profile_before_calling_api() {
        let fake = Arc::new(FakeRobot::default());
        let resource = BootResource::new(fake.clone());
        let mut data = ResourceData::from_config(
            resource.schema(),
            json!({"server_number": 1, "active_profile": "windows"}),
        )
        .unwrap();
        let err = resource.create(&mut data).await.unwrap_err();
        assert!(matches!(err, RobotError::UnknownProfile(_)));
        assert!(fake.set_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_read_refreshes_profile() {
        let resource = BootResource::new(Arc::new(FakeRobot::with_boot(rescue_boot(42))));
        let mut data = ResourceData::for_import(resource.schema(), "42");

        resource.read(&mut data).await.unwrap();

        assert_eq!(data.get_str("active_profile").unwrap(), Some("rescue"));
        assert_eq!(data.get_str("operating_system").unwrap(), Some("linux"));
        assert_eq!(data.get_str("language").unwrap(), None);
        assert_eq!(data.get_str("ipv6_network").unwrap(), Some("2a01::"));
    }

    #[tokio::test]
    async fn test_read_without_id_fails() {
        let resource = BootResource::new(Arc::new(FakeRobot::default()));
        let mut data = ResourceData::new(resource.schema());
        assert!(matches!(
            resource.read(&mut data).await,
            Err(RobotError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_id() {
        let fake = Arc::new(FakeRobot::with_boot(rescue_boot(42)));
        let resource = BootResource::new(fake.clone());
        let mut data = ResourceData::from_config(
            resource.schema(),
            json!({"server_number": 42, "active_profile": "rescue", "operating_system": "linux"}),
        )
        .unwrap();
        data.set_id("42");

        resource.update(&mut data).await.unwrap();

        assert_eq!(data.id(), Some("42"));
        assert_eq!(fake.set_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_only_clears_id() {
        let fake = Arc::new(FakeRobot::with_boot(rescue_boot(42)));
        let resource = BootResource::new(fake.clone());
        let mut data = ResourceData::for_import(resource.schema(), "42");

        resource.delete(&mut data).await.unwrap();

        assert_eq!(data.id(), None);
        assert!(fake.set_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_sets_server_number() {
        let resource = BootResource::new(Arc::new(FakeRobot::with_boot(rescue_boot(42))));
        let imported = resource
            .import(ResourceData::for_import(resource.schema(), "42"))
            .await
            .unwrap();

        assert_eq!(imported.len(), 1);
        assert_eq!(imported[0].get_server_number("server_number").unwrap(), 42);
        assert_eq!(imported[0].get_str("password").unwrap(), Some("r00t"));
    }

    #[tokio::test]
    async fn test_import_rejects_bad_id() {
        let resource = BootResource::new(Arc::new(FakeRobot::default()));
        let err = resource
            .import(ResourceData::for_import(resource.schema(), "web-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, RobotError::InvalidId(_)));
    }

    #[tokio::test]
    async fn test_data_source_prefers_server_number() {
        let source = BootDataSource::new(Arc::new(FakeRobot::with_boot(rescue_boot(7))));
        let mut data =
            ResourceData::from_config(source.schema(), json!({"server_number": 7})).unwrap();

        source.read(&mut data).await.unwrap();

        assert_eq!(data.id(), Some("7"));
        assert_eq!(data.get_str("active_profile").unwrap(), Some("rescue"));
    }

    #[tokio::test]
    async fn test_data_source_falls_back_to_id() {
        let source = BootDataSource::new(Arc::new(FakeRobot::with_boot(rescue_boot(7))));
        let mut data = ResourceData::for_import(source.schema(), "7");
        source.read(&mut data).await.unwrap();
        assert_eq!(data.get_str("ipv4_address").unwrap(), Some("1.2.3.4"));
    }
}
