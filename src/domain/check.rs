use super::suite::SuiteReport;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Halts the workflow with a non-zero exit.
    Fatal,
    /// Reported, execution continues.
    Warning,
}

/// A single reportable problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub check: &'static str,
    pub message: String,
}

impl Finding {
    pub fn new(severity: Severity, check: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity,
            check,
            message: message.into(),
        }
    }

    pub fn warning(check: &'static str, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, check, message)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = match self.severity {
            Severity::Fatal => "❌",
            Severity::Warning => "⚠️ ",
        };
        write!(f, "{icon} [{}] {}", self.check, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    Found,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCheck {
    pub name: String,
    pub status: CheckStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ContainerRuntimeStatus {
    /// Container checks were not requested.
    #[default]
    Disabled,
    Unavailable,
    Available(String),
}

impl ContainerRuntimeStatus {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

/// Everything the verification workflow observed, accumulated in order.
#[derive(Debug, Clone, Default)]
pub struct VerificationReport {
    pub runtime_version: String,
    pub packages: Vec<PackageCheck>,
    pub missing_packages: usize,
    pub missing_env_keys: Vec<String>,
    pub container_runtime: ContainerRuntimeStatus,
    pub suites: Vec<SuiteReport>,
    pub summary_printed: bool,
}

impl VerificationReport {
    pub fn record_package(&mut self, name: &str, found: bool) {
        let status = if found {
            CheckStatus::Found
        } else {
            self.missing_packages += 1;
            CheckStatus::Missing
        };

        self.packages.push(PackageCheck {
            name: name.to_string(),
            status,
        });
    }

    pub fn suite(&self, name: &str) -> Option<&SuiteReport> {
        self.suites.iter().find(|s| s.suite == name)
    }

    /// Soft failures gathered across every check, in the order they occurred.
    pub fn findings(&self) -> Vec<Finding> {
        let mut findings = Vec::new();

        for pkg in &self.packages {
            if pkg.status == CheckStatus::Missing {
                findings.push(Finding::warning(
                    "package",
                    format!("{} could not be imported", pkg.name),
                ));
            }
        }

        for key in &self.missing_env_keys {
            findings.push(Finding::warning("env", format!("{key} is not set")));
        }

        if self.container_runtime == ContainerRuntimeStatus::Unavailable {
            findings.push(Finding::warning(
                "containers",
                "container runtime unavailable, container checks skipped",
            ));
        }

        for suite in &self.suites {
            for (case, message) in suite.failures() {
                findings.push(Finding::warning(
                    "suite",
                    format!("{} / {}: {}", suite.suite, case, message),
                ));
            }
        }

        findings
    }
}
