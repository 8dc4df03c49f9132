use super::verify::{self, VerifyOptions};
use crate::infra::UvAdapter;
use crate::infra::config::load_app_config;
use crate::services::{EnvFileAction, ProjectSetup};
use anyhow::{Context, Result};
use clap::Args;
use std::collections::HashMap;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub struct SetupOptions {
    /// Do not create the virtual environment or install dependencies
    #[arg(long)]
    pub skip_venv: bool,

    #[command(flatten)]
    pub verify: VerifyOptions,
}

pub fn run(options: &SetupOptions, project_dir: &Path, config: Option<&Path>) -> Result<ExitCode> {
    let settings = load_app_config(project_dir, config)?;
    println!("🚀 Preparing {:?}", settings.project_dir);

    let setup = ProjectSetup::new(settings.clone(), Arc::new(UvAdapter::new()));

    match setup.prepare_env_file()? {
        EnvFileAction::Created => {
            println!("✅ Created {:?} from template", settings.env_file);
            println!("⚠️  Don't forget to fill in your API keys");
        }
        EnvFileAction::AlreadyPresent => println!("ℹ️  {:?} already exists", settings.env_file),
        EnvFileAction::TemplateMissing => {
            println!("⚠️  {:?} not found", settings.env_example)
        }
    }

    let process_env: HashMap<String, String> = std::env::vars().collect();
    for dir in setup.ensure_directories(&process_env)? {
        println!("📁 Created {:?}", dir);
    }

    if !options.skip_venv {
        println!("📦 Installing dependencies...");
        let installed = setup
            .install_dependencies()
            .context("dependency installation failed, aborting setup")?;
        if installed {
            println!("✅ Dependencies installed into .venv");
        } else {
            println!("⚠️  uv not found. Install it manually: https://github.com/astral-sh/uv");
        }
    }

    println!();
    Ok(verify::verify(settings, options.verify.container_checks()))
}
