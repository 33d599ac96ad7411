//! Integration doctor: checks the local deep-link setup against the
//! dashboard's link settings and logs what to fix
//!
//! The run stops at the first failing step. Nothing here returns an error;
//! the outcome is the log output plus the returned [`Report`].

mod checklist;
mod matching;

pub use checklist::*;
pub use matching::*;

use crate::dashboard::{AppConfig, AppConfigSource, spawn_fetch};
use crate::manifest::IntegrationModel;
use std::sync::Arc;

const DOC_LOAD_BRANCH: &str = "https://docs.branch.io/pages/apps/android/#load-branch";
const DOC_CONFIGURE_APP: &str = "https://docs.branch.io/pages/apps/android/#configure-app";
const DOC_DASHBOARD_ANDROID: &str = "https://docs.branch.io/pages/dashboard/integrate/#android";
const DOC_APP_LINK_FILTER: &str =
    "https://docs.branch.io/pages/deep-linking/android-app-links/#add-intent-filter-to-manifest";
const DOC_LINK_SETTINGS: &str = "https://branch.app.link/link-settings-page";

/// What the checklist needs to know about the running application
pub trait HostEnvironment {
    /// Whether the SDK is present and set up
    fn sdk_initialized(&self) -> bool;

    fn is_test_mode(&self) -> bool;

    /// Key for live (`true`) or test mode
    fn branch_key(&self, live: bool) -> Option<String>;
}

/// Holds the local manifest model, read once; `validate` can be called any
/// number of times against it.
#[derive(Debug, Clone)]
pub struct IntegrationValidator {
    model: IntegrationModel,
}

impl IntegrationValidator {
    pub fn new(model: IntegrationModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &IntegrationModel {
        &self.model
    }

    pub fn validate(
        &self,
        host: &dyn HostEnvironment,
        source: Arc<dyn AppConfigSource>,
    ) -> Report {
        let mut checklist = Checklist::begin();

        checklist.enter(Step::SdkInstance);
        if !host.sdk_initialized() {
            return checklist.fail(
                "Branch is not initialised from your Application class. Please add `Branch.getAutoInstance(this);` to your Application#onCreate() method.",
                DOC_LOAD_BRANCH,
            );
        }
        checklist.pass();

        checklist.enter(Step::BranchKeys);
        let live = !host.is_test_mode();
        let Some(key) = host.branch_key(live).filter(|k| !k.is_empty()) else {
            return checklist.fail(
                "Unable to read Branch keys from your application. Did you forget to add Branch keys in your application?.",
                DOC_CONFIGURE_APP,
            );
        };
        checklist.pass();

        checklist.enter(Step::DashboardConfig);
        match spawn_fetch(source, key).wait() {
            Some(config) => {
                checklist.pass();
                self.validate_with_app_config(checklist, &config)
            }
            None => checklist.fail(
                "Unable to read Dashboard config. Please confirm that your Branch key is properly added to the manifest. Please fix your Dashboard settings.",
                DOC_LINK_SETTINGS,
            ),
        }
    }

    fn validate_with_app_config(&self, mut checklist: Checklist, config: &AppConfig) -> Report {
        let uri_scheme = config.uri_scheme();

        checklist.enter(Step::PackageName);
        if self.model.package_name != config.package_name() {
            return checklist.fail(
                "Incorrect package name in Branch dashboard. Please correct your package name in dashboard -> link Settings page.",
                DOC_DASHBOARD_ANDROID,
            );
        }
        checklist.pass();

        checklist.enter(Step::UriSchemeDeclared);
        if !self.model.has_deeplink_schemes() {
            return checklist.fail(
                &format!(
                    "No intent found for opening the app through uri Scheme '{}'.Please add the intent with URI scheme to your Android manifest.",
                    uri_scheme
                ),
                DOC_CONFIGURE_APP,
            );
        }
        checklist.pass();

        checklist.enter(Step::DashboardUriScheme);
        if uri_scheme.is_empty() {
            return checklist.fail(
                "Uri Scheme to open your app is not specified in Branch dashboard. Please add URI scheme in Branch dashboard.",
                DOC_DASHBOARD_ANDROID,
            );
        }
        checklist.pass();

        checklist.enter(Step::UriSchemeIntent);
        if !uri_scheme_matches(&self.model.deeplink_schemes, &uri_scheme) {
            return checklist.fail(
                &format!(
                    "Uri scheme '{}' specified in Branch dashboard doesn't match with the deep link intent in manifest file",
                    uri_scheme
                ),
                DOC_DASHBOARD_ANDROID,
            );
        }
        checklist.pass();

        checklist.enter(Step::AppLinkHosts);
        if !self.model.has_applink_hosts() {
            return checklist.fail(
                "Could not find any App Link hosts to support Android AppLinks. Please add intent filter for handling AppLinks in your Android Manifest file",
                DOC_APP_LINK_FILTER,
            );
        }
        checklist.pass();

        let domains = [
            (Step::CustomDomain, config.custom_domain(), "custom link domain"),
            (Step::DefaultDomain, config.default_domain(), "Branch default link domain"),
            (Step::AlternateDomain, config.alternate_domain(), "alternate link domain"),
        ];
        for (step, domain, label) in domains {
            checklist.enter(step);
            if !domain.is_empty() && !domain_matches(&self.model.applink_hosts, &domain) {
                return checklist.fail(
                    &format!(
                        "Could not find intent filter to support {} '{}'. Please add intent filter for handling custom link domain in your Android Manifest file ",
                        label, domain
                    ),
                    DOC_CONFIGURE_APP,
                );
            }
            checklist.pass();
        }

        checklist.finish()
    }
}
