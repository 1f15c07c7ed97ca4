//! Registry of the resources and data sources this crate offers.

use std::sync::Arc;

use super::boot::{BootDataSource, BootResource};
use super::server::{ServerDataSource, ServersDataSource};
use super::{DataSource, Resource};
use crate::api::RobotApi;
use crate::client::RobotClient;
use crate::config::RobotConfig;
use crate::error::RobotError;

/// Entry point handed to the orchestration host.
#[derive(Clone)]
pub struct RobotProvider {
    api: Arc<dyn RobotApi>,
}

impl RobotProvider {
    /// Provider over an existing accessor.
    #[must_use]
    pub fn new(api: Arc<dyn RobotApi>) -> Self {
        Self { api }
    }

    /// Provider talking to Robot with `config`.
    ///
    /// # Errors
    /// Returns error if the config is invalid or the HTTP client cannot be created.
    pub fn from_config(config: RobotConfig) -> Result<Self, RobotError> {
        Ok(Self::new(Arc::new(RobotClient::new(config)?)))
    }

    /// All managed resources.
    #[must_use]
    pub fn resources(&self) -> Vec<Box<dyn Resource>> {
        vec![Box::new(BootResource::new(Arc::clone(&self.api)))]
    }

    /// All data sources.
    #[must_use]
    pub fn data_sources(&self) -> Vec<Box<dyn DataSource>> {
        vec![
            Box::new(BootDataSource::new(Arc::clone(&self.api))),
            Box::new(ServerDataSource::new(Arc::clone(&self.api))),
            Box::new(ServersDataSource::new(Arc::clone(&self.api))),
        ]
    }

    /// Resource by type name.
    #[must_use]
    pub fn resource(&self, type_name: &str) -> Option<Box<dyn Resource>> {
        self.resources()
            .into_iter()
            .find(|r| r.type_name() == type_name)
    }

    /// Data source by type name.
    #[must_use]
    pub fn data_source(&self, type_name: &str) -> Option<Box<dyn DataSource>> {
        self.data_sources()
            .into_iter()
            .find(|d| d.type_name() == type_name)
    }
}
