use crate::domain::VerificationReport;
use crate::error::VerifyError;
use crate::infra::config::load_app_config;
use crate::infra::{DockerAdapter, PythonInterpreter, Settings};
use crate::services::{Verifier, is_truthy};
use anyhow::Result;
use clap::Args;
use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

pub const CONTAINER_TOGGLE_VAR: &str = "TEST_DOCKER";

#[derive(Args, Debug, Default)]
pub struct VerifyOptions {
    /// Check the container runtime and the expected containers (same as TEST_DOCKER=1)
    #[arg(long)]
    pub docker: bool,
}

impl VerifyOptions {
    pub fn container_checks(&self) -> bool {
        self.docker || is_truthy(std::env::var(CONTAINER_TOGGLE_VAR).ok().as_deref())
    }
}

pub fn run(options: &VerifyOptions, project_dir: &Path, config: Option<&Path>) -> Result<ExitCode> {
    let settings = load_app_config(project_dir, config)?;
    Ok(verify(settings, options.container_checks()))
}

pub fn verify(settings: Settings, container_checks: bool) -> ExitCode {
    let interpreter = Arc::new(PythonInterpreter::new(settings.interpreter.clone()));
    let runtime = Arc::new(DockerAdapter::new(settings.container_runtime.clone()));

    let verifier =
        Verifier::new(settings, interpreter, runtime).with_container_checks(container_checks);

    let mut stdout = io::stdout().lock();
    exit_code(verifier.run(&mut stdout))
}

/// Hard failures exit non-zero; soft failures never change the exit code.
pub fn exit_code(result: Result<VerificationReport, VerifyError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e.finding());
            ExitCode::from(e.exit_code())
        }
    }
}
