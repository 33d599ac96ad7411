//! The ordered checklist and the report it produces

use serde::Serialize;

/// Log target for checklist output
pub const LOG_TARGET: &str = "link_doctor";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    SdkInstance,
    BranchKeys,
    DashboardConfig,
    PackageName,
    UriSchemeDeclared,
    DashboardUriScheme,
    UriSchemeIntent,
    AppLinkHosts,
    CustomDomain,
    DefaultDomain,
    AlternateDomain,
}

impl Step {
    pub const ALL: [Step; 11] = [
        Step::SdkInstance,
        Step::BranchKeys,
        Step::DashboardConfig,
        Step::PackageName,
        Step::UriSchemeDeclared,
        Step::DashboardUriScheme,
        Step::UriSchemeIntent,
        Step::AppLinkHosts,
        Step::CustomDomain,
        Step::DefaultDomain,
        Step::AlternateDomain,
    ];

    /// 1-based position in the run
    pub fn number(self) -> usize {
        Step::ALL
            .iter()
            .position(|s| *s == self)
            .map(|i| i + 1)
            .unwrap_or_default()
    }

    pub fn description(self) -> &'static str {
        match self {
            Step::SdkInstance => "Verifying Branch instance creation",
            Step::BranchKeys => "Checking Branch keys",
            Step::DashboardConfig => "Reading Branch dashboard config",
            Step::PackageName => "Verifying application package name",
            Step::UriSchemeDeclared => "Checking Android Manifest for URI based deep link config",
            Step::DashboardUriScheme => "Verifying URI based deep link config with Branch dash board.",
            Step::UriSchemeIntent => "Verifying intent for receiving URI scheme.",
            Step::AppLinkHosts => "Checking AndroidManifest for AppLink config.",
            Step::CustomDomain => "Verifying any supported custom link domains.",
            Step::DefaultDomain => "Verifying default link domains integrations.",
            Step::AlternateDomain => "Verifying alternate link domains integrations.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: Step,
    pub passed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    PassedAll,
    FailedAt {
        step: Step,
        message: String,
        link: String,
    },
}

/// What one run checked and how it ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub records: Vec<StepRecord>,
    pub outcome: Outcome,
}

impl Report {
    pub fn passed(&self) -> bool {
        self.outcome == Outcome::PassedAll
    }

    pub fn failed_step(&self) -> Option<Step> {
        match &self.outcome {
            Outcome::FailedAt { step, .. } => Some(*step),
            Outcome::PassedAll => None,
        }
    }

    /// Whether the run got as far as `step`
    pub fn executed(&self, step: Step) -> bool {
        self.records.iter().any(|r| r.step == step)
    }
}

/// Linear run state: steps are entered in order, each either passes and the
/// run moves on, or fails and the run is over. Failing consumes the
/// checklist, so nothing can be checked after a failure.
#[derive(Debug)]
pub struct Checklist {
    records: Vec<StepRecord>,
    current: Option<Step>,
}

impl Checklist {
    pub fn begin() -> Self {
        log::info!(
            target: LOG_TARGET,
            "\n\n------------------- Initiating Branch integration verification ---------------------------"
        );
        Self {
            records: Vec::new(),
            current: None,
        }
    }

    pub fn enter(&mut self, step: Step) {
        log::info!(target: LOG_TARGET, "{}. {} ... ", step.number(), step.description());
        self.current = Some(step);
    }

    pub fn pass(&mut self) {
        if let Some(step) = self.current.take() {
            self.records.push(StepRecord { step, passed: true });
        }
        log::info!(target: LOG_TARGET, "Passed");
    }

    /// End the run at the current step
    pub fn fail(mut self, message: &str, link: &str) -> Report {
        log::info!(
            target: LOG_TARGET,
            "** ERROR ** : {}\nPlease follow the link for more info {}",
            message,
            link
        );
        let step = self.current.take().unwrap_or(Step::SdkInstance);
        self.records.push(StepRecord {
            step,
            passed: false,
        });
        Report {
            records: self.records,
            outcome: Outcome::FailedAt {
                step,
                message: message.to_string(),
                link: link.to_string(),
            },
        }
    }

    pub fn finish(self) -> Report {
        log::info!(
            target: LOG_TARGET,
            "--------------------------------------------\nSuccessfully completed Branch integration validation. Everything looks good!"
        );
        Report {
            records: self.records,
            outcome: Outcome::PassedAll,
        }
    }
}
