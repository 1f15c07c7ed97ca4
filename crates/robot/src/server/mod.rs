//! Dedicated server inventory.

mod client;
mod models;

pub use models::{Server, Subnet};
