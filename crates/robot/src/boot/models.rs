//! Boot configuration models.
//!
//! Status wire shape: `{"boot": {"linux": {...}, "rescue": {...}, ...}}`.
//! Writes answer with the written branch alone, e.g. `{"rescue": {...}}`.
//! Only the active branch is decoded into typed fields; inactive branches list
//! the available choices as arrays and are ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::RobotError;

/// Boot profile that can be activated for the next boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootProfileKind {
    /// Linux installation image.
    Linux,
    /// Rescue system.
    Rescue,
}

impl BootProfileKind {
    /// Name used in URLs and schema values.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Rescue => "rescue",
        }
    }
}

impl fmt::Display for BootProfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BootProfileKind {
    type Err = RobotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linux" => Ok(Self::Linux),
            "rescue" => Ok(Self::Rescue),
            other => Err(RobotError::UnknownProfile(other.to_string())),
        }
    }
}

/// Which boot environment is active, with the fields that only make sense for it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "profile", rename_all = "snake_case")]
pub enum ActiveBoot {
    /// Linux installation is armed.
    Linux {
        /// Distribution identifier, e.g. `ubuntu_20.04`.
        dist: String,
        /// Installation language.
        lang: String,
    },
    /// Rescue system is armed.
    Rescue {
        /// Rescue operating system.
        os: String,
    },
    /// Nothing armed; the server boots from disk.
    #[default]
    None,
}

/// Boot configuration of one server as Robot currently reports it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BootProfile {
    /// Server number.
    pub server_number: u32,
    /// Active profile and its settings.
    pub active: ActiveBoot,
    /// Rescue root password or Linux installation password.
    pub password: Option<String>,
    /// Main IPv4 address.
    pub server_ipv4: Option<String>,
    /// Main IPv6 network.
    pub server_ipv6: Option<String>,
    /// Fingerprints of SSH keys authorized for the boot environment.
    pub authorized_keys: Vec<String>,
    /// Host key fingerprints. Decoded but not exposed through the resources.
    pub host_keys: Vec<String>,
}

impl BootProfile {
    /// Active profile name, `None` when nothing is armed.
    #[must_use]
    pub fn active_profile(&self) -> Option<BootProfileKind> {
        match self.active {
            ActiveBoot::Linux { .. } => Some(BootProfileKind::Linux),
            ActiveBoot::Rescue { .. } => Some(BootProfileKind::Rescue),
            ActiveBoot::None => None,
        }
    }

    /// Distribution (linux) or rescue OS.
    #[must_use]
    pub fn operating_system(&self) -> Option<&str> {
        match &self.active {
            ActiveBoot::Linux { dist, .. } => Some(dist),
            ActiveBoot::Rescue { os } => Some(os),
            ActiveBoot::None => None,
        }
    }

    /// Installation language; only set for linux.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        match &self.active {
            ActiveBoot::Linux { lang, .. } => Some(lang),
            _ => None,
        }
    }

    /// Decode a `/boot/{server_number}` response.
    ///
    /// `linux.active` is checked before `rescue.active`.
    ///
    /// # Errors
    /// Returns error if the body is not JSON, lacks the `boot` object, or the
    /// active branch has mistyped fields.
    pub fn from_status_json(body: &[u8], server_number: u32) -> Result<Self, RobotError> {
        let response: BootStatusResponse = serde_json::from_slice(body).map_err(|e| {
            warn!(error = %e, server_number, "Failed to parse boot status");
            RobotError::Serialization(e)
        })?;
        Self::from_status(response.boot, server_number)
    }

    /// Decode a `POST /boot/{server_number}/{profile}` response.
    ///
    /// Robot answers a write with the written branch only, e.g.
    /// `{"rescue": {...}}`. A full `{"boot": {...}}` status is accepted too.
    ///
    /// # Errors
    /// Returns error if the body is not JSON, carries neither envelope, or the
    /// branch has mistyped fields.
    pub fn from_set_json(
        body: &[u8],
        profile: BootProfileKind,
        server_number: u32,
    ) -> Result<Self, RobotError> {
        let response: Value = serde_json::from_slice(body).map_err(|e| {
            warn!(error = %e, server_number, "Failed to parse boot write response");
            RobotError::Serialization(e)
        })?;

        if let Some(status) = response.get("boot") {
            let status: BootStatus = serde_json::from_value(status.clone())?;
            return Self::from_status(status, server_number);
        }

        match response.get(profile.as_str()).filter(|b| b.is_object()) {
            Some(branch) => Self::from_branch(profile, branch.clone(), server_number),
            None => Err(RobotError::Payload(format!(
                "boot write response has neither \"boot\" nor \"{profile}\" object"
            ))),
        }
    }

    fn from_status(status: BootStatus, server_number: u32) -> Result<Self, RobotError> {
        if let Some(linux) = active_branch(status.linux) {
            Self::from_branch(BootProfileKind::Linux, linux, server_number)
        } else if let Some(rescue) = active_branch(status.rescue) {
            Self::from_branch(BootProfileKind::Rescue, rescue, server_number)
        } else {
            Ok(Self {
                server_number,
                ..Self::default()
            })
        }
    }

    fn from_branch(
        kind: BootProfileKind,
        branch: Value,
        server_number: u32,
    ) -> Result<Self, RobotError> {
        let details: BootBranch = serde_json::from_value(branch)?;
        let active = match kind {
            BootProfileKind::Linux => ActiveBoot::Linux {
                dist: details.dist.unwrap_or_default(),
                lang: details.lang.unwrap_or_default(),
            },
            BootProfileKind::Rescue => ActiveBoot::Rescue {
                os: details.os.unwrap_or_default(),
            },
        };

        Ok(Self {
            server_number: details.server_number.unwrap_or(server_number),
            active,
            password: details.password,
            server_ipv4: details.server_ip,
            server_ipv6: details.server_ipv6_net,
            authorized_keys: fingerprints(details.authorized_key.as_ref(), "authorized_key"),
            host_keys: fingerprints(details.host_key.as_ref(), "host_key"),
        })
    }
}

fn active_branch(branch: Option<Value>) -> Option<Value> {
    branch.filter(|b| b.get("active").and_then(Value::as_bool).unwrap_or(false))
}

/// Fingerprints from a key list. Entries are either a bare fingerprint or
/// `{"key": {"fingerprint": ...}}`; anything else is skipped.
fn fingerprints(keys: Option<&Value>, field: &str) -> Vec<String> {
    let Some(keys) = keys.filter(|k| !k.is_null()) else {
        return Vec::new();
    };
    let Some(entries) = keys.as_array() else {
        debug!(field, "Key list is not an array, ignoring");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let fingerprint = entry
                .as_str()
                .or_else(|| entry.pointer("/key/fingerprint").and_then(Value::as_str));
            if fingerprint.is_none() {
                debug!(field, entry = %entry, "Skipping key entry without fingerprint");
            }
            fingerprint.map(str::to_string)
        })
        .collect()
}

// ============================================================================
// Wire types
// ============================================================================

/// Boot status response envelope.
#[derive(Debug, Deserialize)]
struct BootStatusResponse {
    boot: BootStatus,
}

/// Per-profile boot branches. Other profiles (vnc, windows, ...) are ignored.
#[derive(Debug, Deserialize)]
struct BootStatus {
    #[serde(default)]
    linux: Option<Value>,
    #[serde(default)]
    rescue: Option<Value>,
}

/// Fields of an active linux or rescue branch.
#[derive(Debug, Deserialize)]
struct BootBranch {
    #[serde(default)]
    dist: Option<String>,
    #[serde(default)]
    lang: Option<String>,
    #[serde(default)]
    os: Option<String>,
    #[serde(default)]
    password: Option<String>,
    #[serde(default)]
    server_number: Option<u32>,
    #[serde(default)]
    server_ip: Option<String>,
    #[serde(default)]
    server_ipv6_net: Option<String>,
    #[serde(default)]
    authorized_key: Option<Value>,
    #[serde(default)]
    host_key: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linux_active_profile() {
        let body = br#"{"boot":{"linux":{"active":true,"dist":"ubuntu_20.04","lang":"en","password":"x","server_ip":"1.2.3.4"}}}"#;
        let profile = BootProfile::from_status_json(body, 42).unwrap();

        assert_eq!(profile.active_profile(), Some(BootProfileKind::Linux));
        assert_eq!(profile.operating_system(), Some("ubuntu_20.04"));
        assert_eq!(profile.language(), Some("en"));
        assert_eq!(profile.password.as_deref(), Some("x"));
        assert_eq!(profile.server_ipv4.as_deref(), Some("1.2.3.4"));
        assert_eq!(profile.server_number, 42);
    }

    #[test]
    fn test_rescue_active_profile_has_no_language() {
        let body = br#"{"boot":{
            "linux":{"active":false,"dist":["Debian 12","Ubuntu 22.04"],"lang":["en","de"]},
            "rescue":{"active":true,"os":"linux","password":"pw","server_number":321,
                      "server_ip":"123.123.123.123","server_ipv6_net":"2a01:4f8::",
                      "authorized_key":[{"key":{"name":"k","fingerprint":"aa:bb","type":"ED25519","size":256}}],
                      "host_key":[]}
        }}"#;
        let profile = BootProfile::from_status_json(body, 1).unwrap();

        assert_eq!(
            profile.active,
            ActiveBoot::Rescue {
                os: "linux".to_string()
            }
        );
        assert_eq!(profile.language(), None);
        assert_eq!(profile.server_number, 321);
        assert_eq!(profile.server_ipv6.as_deref(), Some("2a01:4f8::"));
        assert_eq!(profile.authorized_keys, vec!["aa:bb".to_string()]);
        assert!(profile.host_keys.is_empty());
    }

    #[test]
    fn test_linux_wins_when_both_active() {
        let body = br#"{"boot":{
            "linux":{"active":true,"dist":"debian","lang":"de"},
            "rescue":{"active":true,"os":"linux"}
        }}"#;
        let profile = BootProfile::from_status_json(body, 5).unwrap();
        assert_eq!(profile.active_profile(), Some(BootProfileKind::Linux));
        assert_eq!(profile.operating_system(), Some("debian"));
    }

    #[test]
    fn test_nothing_active() {
        let body = br#"{"boot":{"linux":{"active":false},"rescue":{"active":false,"os":["linux","vkvm"]}}}"#;
        let profile = BootProfile::from_status_json(body, 9).unwrap();
        assert_eq!(profile.active, ActiveBoot::None);
        assert_eq!(profile.operating_system(), None);
        assert_eq!(profile.password, None);
        assert_eq!(profile.server_number, 9);
    }

    #[test]
    fn test_null_branches_are_inactive() {
        let body = br#"{"boot":{"linux":null,"rescue":null,"vnc":null}}"#;
        let profile = BootProfile::from_status_json(body, 3).unwrap();
        assert_eq!(profile.active_profile(), None);
    }

    #[test]
    fn test_status_read_requires_boot_object() {
        let err = BootProfile::from_status_json(br#"{"rescue":{}}"#, 1).unwrap_err();
        assert!(matches!(err, RobotError::Serialization(_)));

        let err = BootProfile::from_status_json(b"not json", 1).unwrap_err();
        assert!(matches!(err, RobotError::Serialization(_)));
    }

    #[test]
    fn test_set_response_rescue_branch() {
        let body = br#"{"rescue":{"server_ip":"1.2.3.4","server_ipv6_net":"2a01:4f8::","server_number":42,"os":"linux","active":true,"password":"pw","authorized_key":[],"host_key":[]}}"#;
        let profile = BootProfile::from_set_json(body, BootProfileKind::Rescue, 42).unwrap();

        assert_eq!(
            profile.active,
            ActiveBoot::Rescue {
                os: "linux".to_string()
            }
        );
        assert_eq!(profile.password.as_deref(), Some("pw"));
        assert_eq!(profile.server_ipv4.as_deref(), Some("1.2.3.4"));
        assert_eq!(profile.server_number, 42);
    }

    #[test]
    fn test_set_response_linux_branch() {
        let body = br#"{"linux":{"server_ip":"1.2.3.4","server_number":42,"dist":"Debian 12 base","lang":"en","active":true,"password":"pw","authorized_key":[],"host_key":[]}}"#;
        let profile = BootProfile::from_set_json(body, BootProfileKind::Linux, 42).unwrap();

        assert_eq!(profile.operating_system(), Some("Debian 12 base"));
        assert_eq!(profile.language(), Some("en"));
        assert_eq!(profile.password.as_deref(), Some("pw"));
    }

    #[test]
    fn test_set_response_accepts_status_envelope() {
        let body = br#"{"boot":{"rescue":{"active":true,"os":"linux","password":"pw"}}}"#;
        let profile = BootProfile::from_set_json(body, BootProfileKind::Rescue, 42).unwrap();
        assert_eq!(profile.active_profile(), Some(BootProfileKind::Rescue));
        assert_eq!(profile.server_number, 42);
    }

    #[test]
    fn test_set_response_for_other_profile_is_error() {
        let body = br#"{"linux":{"active":true,"dist":"debian"}}"#;
        let err = BootProfile::from_set_json(body, BootProfileKind::Rescue, 42).unwrap_err();
        assert!(matches!(err, RobotError::Payload(_)));

        let err = BootProfile::from_set_json(b"[]", BootProfileKind::Rescue, 42).unwrap_err();
        assert!(matches!(err, RobotError::Payload(_)));
    }

    #[test]
    fn test_unexpected_key_entries_are_skipped() {
        let body = br#"{"boot":{"rescue":{"active":true,"os":"linux",
            "authorized_key":["aa:bb",{"key":{"name":"k","size":256}},{"key":{"fingerprint":"cc:dd"}},42],
            "host_key":[{"key":{"key":"ssh-ed25519 AAAA","type":"ED25519","size":256}}]}}}"#;
        let profile = BootProfile::from_status_json(body, 1).unwrap();

        assert_eq!(profile.authorized_keys, vec!["aa:bb".to_string(), "cc:dd".to_string()]);
        assert!(profile.host_keys.is_empty());
        assert_eq!(profile.operating_system(), Some("linux"));
    }

    #[test]
    fn test_non_array_key_list_is_ignored() {
        let body = br#"{"boot":{"rescue":{"active":true,"os":"linux","host_key":{"unexpected":true},"authorized_key":null}}}"#;
        let profile = BootProfile::from_status_json(body, 1).unwrap();
        assert!(profile.host_keys.is_empty());
        assert!(profile.authorized_keys.is_empty());
    }

    #[test]
    fn test_profile_kind_parsing() {
        assert_eq!("linux".parse::<BootProfileKind>().unwrap(), BootProfileKind::Linux);
        assert_eq!("rescue".parse::<BootProfileKind>().unwrap(), BootProfileKind::Rescue);
        assert!(matches!(
            "windows".parse::<BootProfileKind>(),
            Err(RobotError::UnknownProfile(_))
        ));
        assert_eq!(BootProfileKind::Rescue.to_string(), "rescue");
    }
}
