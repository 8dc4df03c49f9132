use super::{Suite, SuiteContext};
use crate::domain::SuiteReport;
use crate::infra::RagflowClient;
use tracing::{debug, warn};
use uuid::Uuid;

/// Exercises the RAGFlow API end to end with a throwaway dataset.
pub struct RagflowClientSuite;

impl Suite for RagflowClientSuite {
    fn name(&self) -> &str {
        "client library"
    }

    fn run(&self, ctx: &SuiteContext<'_>) -> SuiteReport {
        let mut report = SuiteReport::new(self.name());

        let Some(api_key) = ctx.env.ragflow_api_key() else {
            report.skip("ragflow_client", "RAGFLOW_API_KEY not configured");
            return report;
        };

        let client = match RagflowClient::new(ctx.env.ragflow_api_url(), api_key, ctx.timeout) {
            Ok(client) => client,
            Err(e) => {
                report.fail("ragflow_client", format!("{e:#}"));
                return report;
            }
        };

        let name = format!("test-{}", Uuid::new_v4());
        debug!("creating throwaway dataset {}", name);

        let dataset = match client.create_dataset(&name) {
            Ok(dataset) => {
                report.pass("create_dataset");
                dataset
            }
            Err(e) => {
                report.fail("create_dataset", format!("{e:#}"));
                report.skip("list_datasets", "dataset was not created");
                report.skip("delete_dataset", "dataset was not created");
                return report;
            }
        };

        match client.list_datasets(Some(&name)) {
            Ok(datasets) if datasets.iter().any(|d| d.id == dataset.id) => {
                report.pass("list_datasets")
            }
            Ok(_) => report.fail(
                "list_datasets",
                format!("dataset {name} not found in listing"),
            ),
            Err(e) => report.fail("list_datasets", format!("{e:#}")),
        }

        // Teardown runs even when the listing failed.
        match client.delete_datasets(std::slice::from_ref(&dataset.id)) {
            Ok(()) => report.pass("delete_dataset"),
            Err(e) => {
                warn!("throwaway dataset {} may be left behind", name);
                report.fail("delete_dataset", format!("{e:#}"))
            }
        }

        report
    }
}
