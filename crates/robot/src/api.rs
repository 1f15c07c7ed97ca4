//! Accessor trait the resource adapters are written against.

use async_trait::async_trait;

use crate::boot::{BootProfile, BootProfileKind};
use crate::client::RobotClient;
use crate::error::RobotError;
use crate::server::Server;

/// Robot operations used by the resources and data sources.
#[async_trait]
pub trait RobotApi: Send + Sync {
    /// Current boot configuration of a server.
    async fn get_boot_profile(&self, server_number: u32) -> Result<BootProfile, RobotError>;

    /// Activate a boot profile; "already enabled" resolves to the current configuration.
    async fn set_boot_profile(
        &self,
        server_number: u32,
        profile: BootProfileKind,
        os: &str,
        lang: &str,
        authorized_keys: &[String],
    ) -> Result<BootProfile, RobotError>;

    /// One server by number.
    async fn get_server(&self, server_number: u32) -> Result<Server, RobotError>;

    /// All servers in Robot order.
    async fn get_servers(&self) -> Result<Vec<Server>, RobotError>;
}

#[async_trait]
impl RobotApi for RobotClient {
    async fn get_boot_profile(&self, server_number: u32) -> Result<BootProfile, RobotError> {
        Self::get_boot_profile(self, server_number).await
    }

    async fn set_boot_profile(
        &self,
        server_number: u32,
        profile: BootProfileKind,
        os: &str,
        lang: &str,
        authorized_keys: &[String],
    ) -> Result<BootProfile, RobotError> {
        Self::set_boot_profile(self, server_number, profile, os, lang, authorized_keys).await
    }

    async fn get_server(&self, server_number: u32) -> Result<Server, RobotError> {
        Self::get_server(self, server_number).await
    }

    async fn get_servers(&self) -> Result<Vec<Server>, RobotError> {
        Self::get_servers(self).await
    }
}
