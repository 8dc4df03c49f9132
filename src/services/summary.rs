use crate::infra::Settings;
use crate::infra::environment::{DEFAULT_RAGFLOW_API_URL, DEFAULT_REDIS_URL};
use std::io::{self, Write};

const RULE: &str = "=====================================================================";

/// Prints the fixed troubleshooting summary. Content depends only on
/// settings, never on what the checks found.
pub fn write_summary<W: Write>(out: &mut W, settings: &Settings) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{RULE}")?;
    writeln!(out, "📋 Troubleshooting summary")?;
    writeln!(out)?;

    writeln!(out, "Environment variables (in {:?}):", settings.env_file)?;
    for key in &settings.documented_env {
        let marker = if settings.required_env.contains(key) {
            " (required)"
        } else {
            ""
        };
        writeln!(out, "  - {key}{marker}")?;
    }
    writeln!(out)?;

    writeln!(out, "Expected services:")?;
    writeln!(
        out,
        "  - RAGFlow API at RAGFLOW_API_URL (default {DEFAULT_RAGFLOW_API_URL})"
    )?;
    writeln!(
        out,
        "  - Redis at REDIS_URL (optional, default {DEFAULT_REDIS_URL})"
    )?;
    writeln!(out, "  - OpenAI API at https://api.openai.com")?;
    writeln!(out)?;

    writeln!(
        out,
        "Expected containers (checked with TEST_DOCKER=1, runtime `{}`):",
        settings.container_runtime
    )?;
    for expectation in &settings.expected_containers {
        let qualifier = if expectation.local_redis_only {
            " (only when REDIS_URL is local)"
        } else {
            ""
        };
        writeln!(
            out,
            "  - {}: {}{qualifier}",
            expectation.label,
            expectation.keywords.join(", ")
        )?;
    }
    writeln!(out)?;

    writeln!(out, "Next steps:")?;
    writeln!(
        out,
        "  - Missing packages: run `stackcheck setup` or `uv pip sync requirements.txt`"
    )?;
    writeln!(
        out,
        "  - Missing containers: start RAGFlow with `docker compose up -d` in its docker/ directory"
    )?;
    writeln!(out, "{RULE}")?;

    Ok(())
}
