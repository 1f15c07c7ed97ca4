//! Hetzner Robot server inventory and boot configuration.
//!
//! This crate wraps the Robot webservice for dedicated servers and exposes
//! it as declarative resources and data sources.
//!
//! # Example
//!
//! ```rust,ignore
//! use robot::{BootProfileKind, RobotClient, RobotConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = RobotClient::new(RobotConfig::from_env()?)?;
//!
//!     // Arm the rescue system for the next boot
//!     let boot = client
//!         .set_boot_profile(321, BootProfileKind::Rescue, "linux", "", &[])
//!         .await?;
//!     println!("rescue password: {:?}", boot.password);
//!
//!     for server in client.get_servers().await? {
//!         println!("{} {}", server.server_number, server.name);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod api;
pub mod boot;
pub mod client;
pub mod config;
pub mod error;
pub mod resources;
pub mod server;

pub use api::RobotApi;
pub use boot::{ActiveBoot, BootProfile, BootProfileKind};
pub use client::RobotClient;
pub use config::RobotConfig;
pub use error::RobotError;
pub use resources::{DataSource, Resource, ResourceData, RobotProvider};
pub use server::{Server, Subnet};
