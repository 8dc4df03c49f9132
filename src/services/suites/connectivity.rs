use super::{Suite, SuiteContext};
use crate::domain::SuiteReport;
use anyhow::{Context, Result, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::debug;
use url::Url;

const OPENAI_MODELS_URL: &str = "https://api.openai.com/v1/models";
const DEFAULT_REDIS_PORT: u16 = 6379;

/// Auth rejections still prove the service is up.
const RAGFLOW_REACHABLE: [StatusCode; 3] = [
    StatusCode::OK,
    StatusCode::UNAUTHORIZED,
    StatusCode::FORBIDDEN,
];

/// Reachability of RAGFlow, Redis and the OpenAI API.
pub struct ServiceConnectivitySuite;

impl Suite for ServiceConnectivitySuite {
    fn name(&self) -> &str {
        "service connectivity"
    }

    fn run(&self, ctx: &SuiteContext<'_>) -> SuiteReport {
        let mut report = SuiteReport::new(self.name());

        let http = match Client::builder().timeout(ctx.timeout).build() {
            Ok(http) => http,
            Err(e) => {
                report.fail("http_client", e.to_string());
                return report;
            }
        };

        check_ragflow(&http, ctx, &mut report);
        check_redis(ctx, &mut report);
        check_openai(&http, ctx, &mut report);

        report
    }
}

fn check_ragflow(http: &Client, ctx: &SuiteContext<'_>, report: &mut SuiteReport) {
    let url = format!(
        "{}/api/v1/datasets",
        ctx.env.ragflow_api_url().trim_end_matches('/')
    );
    debug!("probing {}", url);

    let response = http
        .get(&url)
        .bearer_auth(ctx.env.ragflow_api_key().unwrap_or_default())
        .send();

    match response {
        Ok(r) if RAGFLOW_REACHABLE.contains(&r.status()) => report.pass("ragflow_api"),
        Ok(r) => report.fail(
            "ragflow_api",
            format!("RAGFlow returned unexpected status {}", r.status()),
        ),
        Err(e) => report.fail("ragflow_api", format!("RAGFlow is not available: {e}")),
    }
}

fn check_redis(ctx: &SuiteContext<'_>, report: &mut SuiteReport) {
    let Some(redis_url) = ctx.env.redis_url() else {
        report.skip("redis", "REDIS_URL not configured");
        return;
    };

    match connect_tcp(redis_url, ctx.timeout) {
        Ok(()) => report.pass("redis"),
        Err(e) => report.fail("redis", format!("Redis connection failed: {e:#}")),
    }
}

fn connect_tcp(redis_url: &str, timeout: Duration) -> Result<()> {
    let (host, port) = parse_redis_endpoint(redis_url)?;
    let addrs = (host.as_str(), port)
        .to_socket_addrs()
        .with_context(|| format!("resolving {host}:{port}"))?;

    let mut last_error = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, timeout) {
            Ok(_) => return Ok(()),
            Err(e) => last_error = Some(e),
        }
    }

    match last_error {
        Some(e) => Err(e).with_context(|| format!("connecting to {host}:{port}")),
        None => bail!("{host} resolved to no addresses"),
    }
}

/// Host and port of a `redis://` style URL; the port defaults to 6379.
pub fn parse_redis_endpoint(redis_url: &str) -> Result<(String, u16)> {
    let url = Url::parse(redis_url).with_context(|| format!("invalid REDIS_URL {redis_url}"))?;
    let host = url
        .host_str()
        .with_context(|| format!("REDIS_URL {redis_url} has no host"))?
        .trim_start_matches('[')
        .trim_end_matches(']')
        .to_string();
    Ok((host, url.port().unwrap_or(DEFAULT_REDIS_PORT)))
}

fn check_openai(http: &Client, ctx: &SuiteContext<'_>, report: &mut SuiteReport) {
    let Some(api_key) = ctx.env.openai_api_key() else {
        report.skip("openai_api", "OPENAI_API_KEY not configured");
        return;
    };

    match http.get(OPENAI_MODELS_URL).bearer_auth(api_key).send() {
        Ok(r) if r.status() == StatusCode::OK => report.pass("openai_api"),
        Ok(r) => report.fail(
            "openai_api",
            format!("OpenAI API returned {} instead of 200", r.status()),
        ),
        Err(e) => report.fail("openai_api", format!("OpenAI API is not available: {e}")),
    }
}
