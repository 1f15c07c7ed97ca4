//! Boot configuration of dedicated servers.
//!
//! Exposes the linux installation and rescue system profiles of the Robot
//! boot configuration API.

mod client;
mod models;

pub use models::{ActiveBoot, BootProfile, BootProfileKind};
