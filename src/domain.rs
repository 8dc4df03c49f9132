mod check;
mod container;
mod suite;
pub mod traits;

pub use check::{
    CheckStatus, ContainerRuntimeStatus, Finding, PackageCheck, Severity, VerificationReport,
};
pub use container::{ContainerExpectation, ContainerInfo};
pub use suite::{CaseOutcome, CaseResult, SuiteReport};
pub use traits::{ContainerRuntime, Interpreter, PackageManager};
