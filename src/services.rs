mod project_setup;
pub mod suites;
mod summary;
mod verifier;

pub use project_setup::{EnvFileAction, ProjectSetup};
pub use suites::{Suite, SuiteContext, default_suites};
pub use summary::write_summary;
pub use verifier::{Verifier, is_truthy};
