use clap::{Parser, Subcommand};
use stackcheck::cli::{SetupOptions, VerifyOptions, setup, verify};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(
    name = "stackcheck",
    version,
    about = "Readiness checks for the research assistant stack"
)]
struct Cli {
    /// Project checkout to verify (default: current directory)
    #[arg(long, env = "STACKCHECK_PROJECT_DIR", default_value = ".", global = true)]
    project_dir: PathBuf,

    /// Extra config file applied on top of the global and project ones
    #[arg(long, env = "STACKCHECK_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Verbose logging on stderr
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check runtime, config, packages and services (default)
    Verify(VerifyOptions),
    /// Create .env and data directories, install dependencies, then verify
    Setup(SetupOptions),
}

fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("stackcheck=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("stackcheck=warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = cli.config.as_deref();
    let command = cli
        .command
        .unwrap_or_else(|| Commands::Verify(VerifyOptions::default()));

    let result = match command {
        Commands::Verify(options) => verify::run(&options, &cli.project_dir, config),
        Commands::Setup(options) => setup::run(&options, &cli.project_dir, config),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn project_options_follow_subcommands() {
        let cli = Cli::try_parse_from([
            "stackcheck",
            "verify",
            "--project-dir",
            "../bot",
            "--config",
            "ci.toml",
        ])
        .unwrap();

        assert_eq!(cli.project_dir, PathBuf::from("../bot"));
        assert_eq!(cli.config, Some(PathBuf::from("ci.toml")));
        assert!(matches!(cli.command, Some(Commands::Verify(_))));
    }

    #[test]
    fn setup_accepts_project_dir_and_docker() {
        let cli =
            Cli::try_parse_from(["stackcheck", "setup", "--project-dir", "/srv/bot", "--docker"])
                .unwrap();

        assert_eq!(cli.project_dir, PathBuf::from("/srv/bot"));
        match cli.command {
            Some(Commands::Setup(options)) => assert!(options.verify.docker),
            _ => panic!("expected setup"),
        }
    }
}
