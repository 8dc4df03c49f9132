pub mod cli;
pub mod domain;
pub mod error;
pub mod infra;
pub mod services;

// Mock runtimes shared by unit and integration tests
pub mod test_support;

pub use domain::{
    CaseOutcome, ContainerExpectation, ContainerInfo, ContainerRuntime, Finding, Interpreter,
    Severity, SuiteReport, VerificationReport,
};
pub use error::VerifyError;
pub use infra::{DockerAdapter, PythonInterpreter, ServiceEnv, Settings};
pub use services::{ProjectSetup, Suite, Verifier};
