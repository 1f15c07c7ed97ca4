//! Boot configuration accessor.
//!
//! <https://robot.hetzner.com/doc/webservice/en.html#boot-configuration>

use tracing::{info, warn};

use super::models::{BootProfile, BootProfileKind};
use crate::client::RobotClient;
use crate::error::RobotError;

impl RobotClient {
    /// Fetch the current boot configuration of a server.
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded.
    pub async fn get_boot_profile(&self, server_number: u32) -> Result<BootProfile, RobotError> {
        let body = self.get(&format!("/boot/{server_number}")).await?;
        BootProfile::from_status_json(&body, server_number)
    }

    /// Activate a boot profile for the next boot.
    ///
    /// `os` is sent as `dist` for linux and as `os` for rescue. `lang` is only
    /// sent for linux, and an empty `lang` is left out of the form so Robot
    /// applies its default language instead of rejecting a blank value. Robot
    /// answers with the written branch (`{"linux": {...}}` or
    /// `{"rescue": {...}}`). If Robot reports the profile as already enabled,
    /// the current configuration is fetched and returned.
    ///
    /// # Errors
    /// Returns error if the request fails for any other reason or the
    /// response cannot be decoded.
    pub async fn set_boot_profile(
        &self,
        server_number: u32,
        profile: BootProfileKind,
        os: &str,
        lang: &str,
        authorized_keys: &[String],
    ) -> Result<BootProfile, RobotError> {
        let form = boot_form(profile, os, lang, authorized_keys);

        info!(
            server_number,
            profile = %profile,
            os = %os,
            keys = authorized_keys.len(),
            "Activating boot profile"
        );

        match self
            .post_form(&format!("/boot/{server_number}/{profile}"), &form)
            .await
        {
            Ok(body) => BootProfile::from_set_json(&body, profile, server_number),
            Err(e) if e.is_boot_already_enabled() => {
                warn!(
                    server_number,
                    profile = %profile,
                    "Boot profile already enabled, reading current configuration"
                );
                self.get_boot_profile(server_number).await
            }
            Err(e) => Err(e),
        }
    }
}

/// Form body for `POST /boot/{server_number}/{profile}`.
fn boot_form(
    profile: BootProfileKind,
    os: &str,
    lang: &str,
    authorized_keys: &[String],
) -> Vec<(&'static str, String)> {
    let mut form = Vec::with_capacity(authorized_keys.len() + 2);
    match profile {
        BootProfileKind::Linux => {
            form.push(("dist", os.to_string()));
            if !lang.is_empty() {
                form.push(("lang", lang.to_string()));
            }
        }
        BootProfileKind::Rescue => form.push(("os", os.to_string())),
    }
    form.extend(
        authorized_keys
            .iter()
            .map(|key| ("authorized_key", key.clone())),
    );
    form
}
