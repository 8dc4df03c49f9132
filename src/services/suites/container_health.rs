use super::{Suite, SuiteContext};
use crate::domain::SuiteReport;
use tracing::debug;

/// Checks that every expected container is running.
pub struct ContainerHealthSuite;

impl Suite for ContainerHealthSuite {
    fn name(&self) -> &str {
        "container health"
    }

    fn requires_container_runtime(&self) -> bool {
        true
    }

    fn run(&self, ctx: &SuiteContext<'_>) -> SuiteReport {
        let mut report = SuiteReport::new(self.name());

        let containers = match ctx.container_runtime.list_running() {
            Ok(containers) => containers,
            Err(e) => {
                for expectation in ctx.expected_containers {
                    report.fail(
                        &expectation.label,
                        format!("could not list containers: {e:#}"),
                    );
                }
                return report;
            }
        };
        debug!("{} running container(s)", containers.len());

        let redis_local = ctx.env.redis_is_local();

        for expectation in ctx.expected_containers {
            if expectation.local_redis_only && !redis_local {
                report.skip(
                    &expectation.label,
                    "Redis not configured to use a local container",
                );
                continue;
            }

            if containers.iter().any(|c| expectation.matches(c)) {
                report.pass(&expectation.label);
            } else {
                report.fail(&expectation.label, expectation.failure_message());
            }
        }

        report
    }
}
