//! `hetznerrobot_server` and `hetznerrobot_servers` data sources.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::data::{resource_id, ResourceData};
use super::schema::{AttrType, Attribute, Schema};
use super::DataSource;
use crate::api::RobotApi;
use crate::error::RobotError;
use crate::server::Server;

/// Identifier of the servers list data source.
const SERVERS_ID: &str = "servers";

fn subnet_type() -> AttrType {
    AttrType::Object(vec![("ip", AttrType::String), ("mask", AttrType::String)])
}

/// Attribute names and types shared by both data sources.
fn server_fields() -> Vec<(&'static str, AttrType, &'static str)> {
    vec![
        ("server_name", AttrType::String, "Server name"),
        ("server_ip", AttrType::String, "Server IP"),
        ("server_ipv6", AttrType::String, "Server IPv6 Net"),
        ("datacenter", AttrType::String, "Data center"),
        ("is_cancelled", AttrType::Bool, "Status of server cancellation"),
        ("paid_until", AttrType::String, "Paid until date"),
        ("product", AttrType::String, "Server product name"),
        (
            "ip_addresses",
            AttrType::List(Box::new(AttrType::String)),
            "Array of assigned single IP addresses",
        ),
        (
            "server_subnets",
            AttrType::List(Box::new(subnet_type())),
            "Array of assigned subnets",
        ),
        ("status", AttrType::String, "Server status (\"ready\" or \"in process\")"),
        (
            "traffic",
            AttrType::String,
            "Free traffic quota, 'unlimited' in case of unlimited traffic",
        ),
        ("linked_storagebox", AttrType::Int, "Linked Storage Box ID"),
        ("reset", AttrType::Bool, "Flag of reset system availability"),
        ("rescue", AttrType::Bool, "Flag of Rescue System availability"),
        ("vnc", AttrType::Bool, "Flag of VNC installation availability"),
        ("windows", AttrType::Bool, "Flag of Windows installation availability"),
        ("plesk", AttrType::Bool, "Flag of Plesk installation availability"),
        ("cpanel", AttrType::Bool, "Flag of cPanel installation availability"),
        ("wol", AttrType::Bool, "Flag of Wake On Lan availability"),
        ("hot_swap", AttrType::Bool, "Flag of Hot Swap availability"),
    ]
}

/// Server record flattened into attribute values.
fn server_attributes(server: &Server) -> Value {
    json!({
        "server_number": server.server_number,
        "server_name": server.name,
        "server_ip": server.server_ip,
        "server_ipv6": server.server_ipv6,
        "datacenter": server.datacenter,
        "is_cancelled": server.cancelled,
        "paid_until": server.paid_until,
        "product": server.product,
        "ip_addresses": server.ips,
        "server_subnets": server.subnets,
        "status": server.status,
        "traffic": server.traffic,
        "linked_storagebox": server.linked_storagebox,
        "reset": server.reset,
        "rescue": server.rescue,
        "vnc": server.vnc,
        "windows": server.windows,
        "plesk": server.plesk,
        "cpanel": server.cpanel,
        "wol": server.wol,
        "hot_swap": server.hot_swap,
    })
}

/// Single server looked up by `server_number`.
#[derive(Clone)]
pub struct ServerDataSource {
    api: Arc<dyn RobotApi>,
}

impl ServerDataSource {
    /// Data source backed by `api`.
    #[must_use]
    pub fn new(api: Arc<dyn RobotApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for ServerDataSource {
    fn type_name(&self) -> &'static str {
        "hetznerrobot_server"
    }

    fn schema(&self) -> Schema {
        server_fields().into_iter().fold(
            Schema::new().with_attribute(
                "server_number",
                Attribute::required(AttrType::Int).describe("Server number"),
            ),
            |schema, (name, ty, description)| {
                schema.with_attribute(name, Attribute::computed(ty).describe(description))
            },
        )
    }

    async fn read(&self, data: &mut ResourceData) -> Result<(), RobotError> {
        data.check_required()?;
        let server_number = data.get_server_number("server_number")?;
        let server = self.api.get_server(server_number).await?;

        if let Value::Object(attributes) = server_attributes(&server) {
            for (name, value) in attributes {
                data.set(&name, value)?;
            }
        }
        data.set_id(resource_id(server.server_number));
        Ok(())
    }
}

/// Every server of the account under `servers`.
#[derive(Clone)]
pub struct ServersDataSource {
    api: Arc<dyn RobotApi>,
}

impl ServersDataSource {
    /// Data source backed by `api`.
    #[must_use]
    pub fn new(api: Arc<dyn RobotApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl DataSource for ServersDataSource {
    fn type_name(&self) -> &'static str {
        "hetznerrobot_servers"
    }

    fn schema(&self) -> Schema {
        let mut fields = vec![("server_number", AttrType::Int)];
        fields.extend(server_fields().into_iter().map(|(name, ty, _)| (name, ty)));

        Schema::new().with_attribute(
            SERVERS_ID,
            Attribute::computed(AttrType::List(Box::new(AttrType::Object(fields))))
                .describe("All servers of the account"),
        )
    }

    async fn read(&self, data: &mut ResourceData) -> Result<(), RobotError> {
        let servers = self.api.get_servers().await?;
        let list: Vec<Value> = servers.iter().map(server_attributes).collect();
        data.set(SERVERS_ID, list)?;
        data.set_id(SERVERS_ID);
        Ok(())
    }
}
