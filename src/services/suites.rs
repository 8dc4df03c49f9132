mod connectivity;
mod container_health;
mod ragflow_client;

pub use connectivity::{ServiceConnectivitySuite, parse_redis_endpoint};
pub use container_health::ContainerHealthSuite;
pub use ragflow_client::RagflowClientSuite;

use crate::domain::{ContainerExpectation, ContainerRuntime, SuiteReport};
use crate::infra::ServiceEnv;
use std::time::Duration;

/// What a suite gets to look at while it runs.
pub struct SuiteContext<'a> {
    pub env: &'a ServiceEnv,
    pub container_runtime: &'a dyn ContainerRuntime,
    pub expected_containers: &'a [ContainerExpectation],
    pub timeout: Duration,
}

/// An independent group of readiness checks. Failures are recorded in the
/// returned report, never raised.
pub trait Suite {
    fn name(&self) -> &str;

    /// Suites that talk to the container runtime only run when container
    /// checks are enabled and the runtime was found.
    fn requires_container_runtime(&self) -> bool {
        false
    }

    fn run(&self, ctx: &SuiteContext<'_>) -> SuiteReport;
}

/// Service connectivity, container health, client library, in that order.
pub fn default_suites() -> Vec<Box<dyn Suite>> {
    vec![
        Box::new(ServiceConnectivitySuite),
        Box::new(ContainerHealthSuite),
        Box::new(RagflowClientSuite),
    ]
}
