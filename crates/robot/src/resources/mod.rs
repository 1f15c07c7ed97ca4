//! Declarative resources and data sources over the Robot accessors.
//!
//! The adapters translate configuration held in [`ResourceData`] into
//! [`RobotApi`](crate::api::RobotApi) calls and copy the results back. The
//! accessor is injected through the constructor; nothing is shared through
//! untyped context.

mod boot;
mod data;
mod provider;
mod schema;
mod server;

use async_trait::async_trait;

pub use boot::{BootDataSource, BootResource};
pub use data::{parse_resource_id, resource_id, ResourceData};
pub use provider::RobotProvider;
pub use schema::{AttrType, Attribute, Schema};
pub use server::{ServerDataSource, ServersDataSource};

use crate::error::RobotError;

/// Managed resource with a create/read/update/delete/import lifecycle.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Type name, e.g. `hetznerrobot_boot`.
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Apply configuration and record the identifier.
    async fn create(&self, data: &mut ResourceData) -> Result<(), RobotError>;

    /// Refresh state for the tracked identifier.
    async fn read(&self, data: &mut ResourceData) -> Result<(), RobotError>;

    /// Re-apply changed configuration.
    async fn update(&self, data: &mut ResourceData) -> Result<(), RobotError>;

    /// Stop managing the resource.
    async fn delete(&self, data: &mut ResourceData) -> Result<(), RobotError>;

    /// Build state from an externally supplied identifier.
    async fn import(&self, data: ResourceData) -> Result<Vec<ResourceData>, RobotError>;
}

/// Read-only data source.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Type name, e.g. `hetznerrobot_server`.
    fn type_name(&self) -> &'static str;

    /// Attribute schema.
    fn schema(&self) -> Schema;

    /// Populate computed attributes.
    async fn read(&self, data: &mut ResourceData) -> Result<(), RobotError>;
}
