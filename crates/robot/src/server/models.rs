//! Server inventory models.
//!
//! Based on the Robot `/server` endpoints. Robot sends `null` for several
//! fields on servers that lack them; those decode to empty values.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Dedicated server as listed in Robot.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Server {
    /// Server number (unique identifier).
    pub server_number: u32,
    /// Server name/label.
    #[serde(rename = "server_name", default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Main IPv4 address.
    #[serde(default)]
    pub server_ip: Option<String>,
    /// Main IPv6 network.
    #[serde(rename = "server_ipv6_net", default)]
    pub server_ipv6: Option<String>,
    /// Data center location.
    #[serde(rename = "dc", default, deserialize_with = "null_as_default")]
    pub datacenter: String,
    /// Product name (plan).
    #[serde(default, deserialize_with = "null_as_default")]
    pub product: String,
    /// Server status ("ready" or "in process").
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Whether the server has been cancelled.
    #[serde(default)]
    pub cancelled: bool,
    /// Paid until date (`YYYY-MM-DD`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub paid_until: String,
    /// Free traffic quota, "unlimited" when not capped.
    #[serde(default, deserialize_with = "null_as_default")]
    pub traffic: String,
    /// Assigned single IP addresses.
    #[serde(rename = "ip", default, deserialize_with = "null_as_default")]
    pub ips: Vec<String>,
    /// Assigned subnets.
    #[serde(rename = "subnet", default, deserialize_with = "null_as_default")]
    pub subnets: Vec<Subnet>,
    /// Linked Storage Box ID.
    #[serde(default)]
    pub linked_storagebox: Option<i64>,

    /// Reset system available.
    #[serde(default)]
    pub reset: bool,
    /// Rescue system available.
    #[serde(default)]
    pub rescue: bool,
    /// VNC installation available.
    #[serde(default)]
    pub vnc: bool,
    /// Windows installation available.
    #[serde(default)]
    pub windows: bool,
    /// Plesk installation available.
    #[serde(default)]
    pub plesk: bool,
    /// cPanel installation available.
    #[serde(default)]
    pub cpanel: bool,
    /// Wake on LAN available.
    #[serde(default)]
    pub wol: bool,
    /// Hot swap available.
    #[serde(default)]
    pub hot_swap: bool,
}

/// Subnet assigned to a server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Subnet {
    /// Network address.
    pub ip: String,
    /// Prefix length or netmask.
    pub mask: String,
}

impl Server {
    /// `paid_until` as a date, if it parses.
    #[must_use]
    pub fn paid_until_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.paid_until, "%Y-%m-%d").ok()
    }

    /// Whether the traffic quota is uncapped.
    #[must_use]
    pub fn has_unlimited_traffic(&self) -> bool {
        self.traffic.eq_ignore_ascii_case("unlimited")
    }
}

/// Single server response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ServerResponse {
    pub server: Server,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
