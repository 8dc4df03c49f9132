use stackcheck::domain::ContainerRuntimeStatus;
use stackcheck::infra::Settings;
use stackcheck::services::Suite;
use stackcheck::test_support::{CallLog, MockInterpreter, MockRuntime, MockSuite};
use stackcheck::{Verifier, VerifyError};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

struct Fixture {
    _dir: tempfile::TempDir,
    settings: Settings,
    interpreter: Arc<MockInterpreter>,
    runtime: Arc<MockRuntime>,
    log: CallLog,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(".env"),
            "TELEGRAM_BOT_TOKEN=123:abc\nOPENAI_API_KEY=sk-test\n",
        )
        .unwrap();
        Self::in_dir(dir)
    }

    fn in_dir(dir: tempfile::TempDir) -> Self {
        let mut settings = Settings::defaults(dir.path()).unwrap();
        settings.packages = vec!["requests".into(), "chromadb".into(), "telegram".into()];

        Self {
            _dir: dir,
            settings,
            interpreter: Arc::new(MockInterpreter::with_packages(&["requests", "telegram"])),
            runtime: Arc::new(MockRuntime::new()),
            log: CallLog::default(),
        }
    }

    fn project_dir(&self) -> &Path {
        &self.settings.project_dir
    }

    fn suites(&self) -> Vec<Box<dyn Suite>> {
        vec![
            Box::new(MockSuite::new("service connectivity", self.log.clone()).failing("refused")),
            Box::new(MockSuite::new("container health", self.log.clone()).needing_runtime()),
            Box::new(MockSuite::new("client library", self.log.clone())),
        ]
    }

    fn verifier(&self, container_checks: bool) -> Verifier {
        Verifier::new(
            self.settings.clone(),
            self.interpreter.clone(),
            self.runtime.clone(),
        )
        .with_suites(self.suites())
        .with_container_checks(container_checks)
        .with_process_env(HashMap::new())
    }

    fn suites_run(&self) -> Vec<String> {
        self.log.read().unwrap().clone()
    }
}

fn run(verifier: &Verifier) -> (Result<stackcheck::VerificationReport, VerifyError>, String) {
    let mut out = Vec::new();
    let result = verifier.run(&mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn missing_packages_are_counted_once_each() {
    let fx = Fixture::new();
    let (result, output) = run(&fx.verifier(false));
    let report = result.unwrap();

    assert_eq!(report.missing_packages, 1);
    assert_eq!(report.packages.len(), 3);
    assert!(output.contains("❌ chromadb (missing)"));
    assert!(output.contains("✅ requests"));

    let imports: Vec<String> = fx
        .interpreter
        .get_commands()
        .into_iter()
        .filter(|c| c.starts_with("import:"))
        .collect();
    assert_eq!(
        imports,
        vec!["import:requests", "import:chromadb", "import:telegram"]
    );
}

#[test]
fn missing_config_file_stops_before_package_checks() {
    let fx = Fixture::in_dir(tempfile::tempdir().unwrap());
    let (result, output) = run(&fx.verifier(true));

    let err = result.unwrap_err();
    assert!(matches!(err, VerifyError::MissingConfig { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(
        !fx.interpreter
            .get_commands()
            .iter()
            .any(|c| c.starts_with("import:"))
    );
    assert!(fx.suites_run().is_empty());
    assert!(!output.contains("Troubleshooting summary"));
}

#[test]
fn missing_runtime_is_fatal() {
    let fx = Fixture::new();
    fx.interpreter.set_missing();

    let (result, _) = run(&fx.verifier(false));

    assert!(matches!(
        result.unwrap_err(),
        VerifyError::MissingRuntime { interpreter } if interpreter == "python3"
    ));
    assert_eq!(fx.interpreter.get_commands(), vec!["version"]);
}

#[test]
fn container_checks_disabled_by_default() {
    let fx = Fixture::new();
    let (result, _) = run(&fx.verifier(false));
    let report = result.unwrap();

    assert_eq!(report.container_runtime, ContainerRuntimeStatus::Disabled);
    assert!(fx.runtime.get_commands().is_empty());
    assert_eq!(
        fx.suites_run(),
        vec!["service connectivity", "client library"]
    );
}

#[test]
fn unavailable_container_runtime_is_reported_and_skipped() {
    let fx = Fixture::new();
    fx.runtime.set_unavailable();

    let (result, output) = run(&fx.verifier(true));
    let report = result.unwrap();

    assert_eq!(report.container_runtime, ContainerRuntimeStatus::Unavailable);
    assert!(output.contains("Container runtime `docker` unavailable"));
    assert_eq!(
        fx.suites_run(),
        vec!["service connectivity", "client library"]
    );
    assert!(report.summary_printed);
}

#[test]
fn available_container_runtime_runs_all_suites_in_order() {
    let fx = Fixture::new();
    let (result, output) = run(&fx.verifier(true));
    let report = result.unwrap();

    assert!(report.container_runtime.is_available());
    assert!(output.contains("Docker version 27.3.1"));
    assert_eq!(
        fx.suites_run(),
        vec!["service connectivity", "container health", "client library"]
    );
}

#[test]
fn soft_failures_still_reach_summary() {
    let fx = Fixture::in_dir(tempfile::tempdir().unwrap());
    fs::write(fx.project_dir().join(".env"), "# nothing configured yet\n").unwrap();

    let (result, output) = run(&fx.verifier(false));
    let report = result.unwrap();

    assert!(report.summary_printed);
    assert_eq!(
        report.missing_env_keys,
        vec!["TELEGRAM_BOT_TOKEN", "OPENAI_API_KEY"]
    );
    assert_eq!(report.suite("service connectivity").unwrap().failed(), 1);
    // package, two env keys, one suite case
    assert_eq!(report.findings().len(), 4);
    assert!(output.contains("Troubleshooting summary"));
    assert!(output.contains("RAGFLOW_API_URL"));
}

#[test]
fn process_environment_satisfies_required_keys() {
    let fx = Fixture::in_dir(tempfile::tempdir().unwrap());
    fs::write(fx.project_dir().join(".env"), "").unwrap();

    let verifier = fx.verifier(false).with_process_env(HashMap::from([
        ("TELEGRAM_BOT_TOKEN".to_string(), "123:abc".to_string()),
        ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
    ]));
    let (result, _) = run(&verifier);

    assert!(result.unwrap().missing_env_keys.is_empty());
}
