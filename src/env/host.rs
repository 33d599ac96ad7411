//! Host environment backed by an application package on disk

use super::is_test_mode_enabled;
use crate::keys::read_branch_key;
use crate::manifest::{ApkArchive, ApkError, IntegrationModel, ResourceTable};
use crate::settings::Settings;
use crate::validator::HostEnvironment;
use std::path::{Path, PathBuf};

/// Type descriptor of the SDK entry class as it appears in dex string tables
pub const SDK_CLASS_DESCRIPTOR: &str = "Lio/branch/referral/Branch;";

/// Everything the checklist needs from the package, read once
#[derive(Debug, Clone)]
pub struct ApkHost {
    path: PathBuf,
    model: IntegrationModel,
    resources: Option<ResourceTable>,
    sdk_present: bool,
    custom_debug: bool,
    key_override: Option<String>,
}

impl ApkHost {
    /// Read the package. The archive is closed again before this returns.
    pub fn load(path: &Path, settings: &Settings) -> Result<Self, ApkError> {
        let mut apk = ApkArchive::open(path)?;
        let manifest = apk.manifest()?;
        let model = IntegrationModel::from_document(&manifest);

        let resources = match apk.resources() {
            Ok(resources) => resources,
            Err(e) => {
                log::debug!("Ignoring unreadable resource table: {}", e);
                None
            }
        };
        let sdk_present = apk.contains_class(SDK_CLASS_DESCRIPTOR)?;

        log::debug!(
            "Loaded {}: package {}, {} scheme(s), {} app link host(s), sdk {}",
            path.display(),
            model.package_name,
            model.deeplink_schemes.len(),
            model.applink_hosts.len(),
            if sdk_present { "present" } else { "absent" }
        );

        Ok(Self {
            path: path.to_path_buf(),
            model,
            resources,
            sdk_present,
            custom_debug: settings.debug,
            key_override: settings.branch_key.clone(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn model(&self) -> &IntegrationModel {
        &self.model
    }

    pub fn resources(&self) -> Option<&ResourceTable> {
        self.resources.as_ref()
    }
}

impl HostEnvironment for ApkHost {
    fn sdk_initialized(&self) -> bool {
        self.sdk_present
    }

    fn is_test_mode(&self) -> bool {
        is_test_mode_enabled(
            self.custom_debug,
            &self.model.meta_data,
            self.resources.as_ref(),
        )
    }

    fn branch_key(&self, live: bool) -> Option<String> {
        read_branch_key(
            live,
            self.key_override.as_deref(),
            &self.model.meta_data,
            self.resources.as_ref(),
        )
    }
}
