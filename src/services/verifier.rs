use super::suites::{Suite, SuiteContext, default_suites};
use super::summary::write_summary;
use crate::domain::{
    CaseOutcome, ContainerRuntime, ContainerRuntimeStatus, Interpreter, SuiteReport,
    VerificationReport,
};
use crate::error::VerifyError;
use crate::infra::{ServiceEnv, Settings};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Whether a toggle variable such as `TEST_DOCKER` is switched on.
pub fn is_truthy(value: Option<&str>) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        None => false,
        Some(v) => !matches!(v.as_str(), "" | "0" | "false" | "no" | "off"),
    }
}

/// Runs the verification workflow in a fixed order: runtime, config file,
/// packages, environment keys, container runtime, suites, summary.
///
/// Only the runtime and config file checks are hard failures; everything
/// else is recorded in the report and the workflow carries on.
pub struct Verifier {
    settings: Settings,
    interpreter: Arc<dyn Interpreter>,
    container_runtime: Arc<dyn ContainerRuntime>,
    suites: Vec<Box<dyn Suite>>,
    container_checks: bool,
    process_env: HashMap<String, String>,
}

impl Verifier {
    pub fn new(
        settings: Settings,
        interpreter: Arc<dyn Interpreter>,
        container_runtime: Arc<dyn ContainerRuntime>,
    ) -> Self {
        Self {
            settings,
            interpreter,
            container_runtime,
            suites: default_suites(),
            container_checks: false,
            process_env: std::env::vars().collect(),
        }
    }

    pub fn with_suites(mut self, suites: Vec<Box<dyn Suite>>) -> Self {
        self.suites = suites;
        self
    }

    pub fn with_container_checks(mut self, enabled: bool) -> Self {
        self.container_checks = enabled;
        self
    }

    pub fn with_process_env(mut self, process_env: HashMap<String, String>) -> Self {
        self.process_env = process_env;
        self
    }

    pub fn run<W: Write>(&self, out: &mut W) -> Result<VerificationReport, VerifyError> {
        let mut report = VerificationReport::default();
        writeln!(
            out,
            "🔍 Verifying environment in {:?}",
            self.settings.project_dir
        )?;

        report.runtime_version = self.check_runtime(out)?;
        self.check_config_file(out)?;
        self.check_packages(out, &mut report)?;

        let env = self.load_service_env();
        self.check_environment_keys(out, &env, &mut report)?;

        report.container_runtime = self.check_container_runtime(out)?;
        self.run_suites(out, &env, &mut report)?;

        writeln!(out)?;
        writeln!(
            out,
            "Result: {} missing package(s), {} missing variable(s), {} failed suite case(s)",
            report.missing_packages,
            report.missing_env_keys.len(),
            report.suites.iter().map(SuiteReport::failed).sum::<usize>()
        )?;

        write_summary(out, &self.settings)?;
        report.summary_printed = true;

        info!("verification finished with {} warning(s)", report.findings().len());
        Ok(report)
    }

    fn check_runtime<W: Write>(&self, out: &mut W) -> Result<String, VerifyError> {
        let program = self.interpreter.program();
        match self.interpreter.version() {
            Some(version) => {
                writeln!(out, "✅ {program}: {version}")?;
                Ok(version)
            }
            None => Err(VerifyError::MissingRuntime {
                interpreter: program.to_string(),
            }),
        }
    }

    fn check_config_file<W: Write>(&self, out: &mut W) -> Result<(), VerifyError> {
        let path = &self.settings.env_file;
        if !path.is_file() {
            return Err(VerifyError::MissingConfig { path: path.clone() });
        }
        writeln!(out, "✅ Config file: {:?}", path)?;
        Ok(())
    }

    fn check_packages<W: Write>(
        &self,
        out: &mut W,
        report: &mut VerificationReport,
    ) -> Result<(), VerifyError> {
        writeln!(out, "📦 Checking {} package(s)...", self.settings.packages.len())?;

        for package in &self.settings.packages {
            let found = self.interpreter.can_import(package);
            if found {
                writeln!(out, "  ✅ {package}")?;
            } else {
                writeln!(out, "  ❌ {package} (missing)")?;
            }
            report.record_package(package, found);
        }

        if report.missing_packages > 0 {
            writeln!(
                out,
                "⚠️  {} package(s) missing",
                report.missing_packages
            )?;
        }

        Ok(())
    }

    fn load_service_env(&self) -> ServiceEnv {
        match ServiceEnv::load(&self.settings.env_file, &self.process_env) {
            Ok(env) => env,
            Err(e) => {
                warn!("could not read {:?}: {:#}", self.settings.env_file, e);
                ServiceEnv::from_values(self.process_env.clone())
            }
        }
    }

    fn check_environment_keys<W: Write>(
        &self,
        out: &mut W,
        env: &ServiceEnv,
        report: &mut VerificationReport,
    ) -> Result<(), VerifyError> {
        let missing = env.missing(&self.settings.required_env);

        if missing.is_empty() {
            writeln!(out, "✅ Required environment variables set")?;
        } else {
            writeln!(
                out,
                "⚠️  Missing environment variables: {}",
                missing.join(", ")
            )?;
        }

        report.missing_env_keys = missing.into_iter().map(str::to_string).collect();
        Ok(())
    }

    fn check_container_runtime<W: Write>(
        &self,
        out: &mut W,
    ) -> Result<ContainerRuntimeStatus, VerifyError> {
        if !self.container_checks {
            debug!("container checks disabled");
            return Ok(ContainerRuntimeStatus::Disabled);
        }

        let binary = self.container_runtime.binary();
        match self.container_runtime.version() {
            Some(version) => {
                writeln!(out, "✅ {binary}: {version}")?;
                Ok(ContainerRuntimeStatus::Available(version))
            }
            None => {
                writeln!(
                    out,
                    "⚠️  Container runtime `{binary}` unavailable, skipping container checks"
                )?;
                Ok(ContainerRuntimeStatus::Unavailable)
            }
        }
    }

    fn run_suites<W: Write>(
        &self,
        out: &mut W,
        env: &ServiceEnv,
        report: &mut VerificationReport,
    ) -> Result<(), VerifyError> {
        let ctx = SuiteContext {
            env,
            container_runtime: self.container_runtime.as_ref(),
            expected_containers: &self.settings.expected_containers,
            timeout: self.settings.timeout,
        };

        for suite in &self.suites {
            if suite.requires_container_runtime() && !report.container_runtime.is_available() {
                debug!("skipping suite {}", suite.name());
                if self.container_checks {
                    writeln!(
                        out,
                        "⏭️  {}: skipped, container runtime unavailable",
                        suite.name()
                    )?;
                }
                continue;
            }

            writeln!(out, "🧪 {}", suite.name())?;
            let suite_report = suite.run(&ctx);
            write_suite(out, &suite_report)?;

            if !suite_report.is_success() {
                warn!("suite {} reported failures", suite.name());
            }
            report.suites.push(suite_report);
        }

        Ok(())
    }
}

fn write_suite<W: Write>(out: &mut W, report: &SuiteReport) -> std::io::Result<()> {
    for case in &report.cases {
        match &case.outcome {
            CaseOutcome::Passed => writeln!(out, "  ✅ {}", case.name)?,
            CaseOutcome::Failed(msg) => writeln!(out, "  ❌ {}: {msg}", case.name)?,
            CaseOutcome::Skipped(reason) => writeln!(out, "  ⏭️  {} ({reason})", case.name)?,
        }
    }
    writeln!(
        out,
        "  {} passed, {} failed, {} skipped",
        report.passed(),
        report.failed(),
        report.skipped()
    )
}
