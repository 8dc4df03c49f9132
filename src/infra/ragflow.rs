use anyhow::{Context, Result, bail};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    pub id: String,
    pub name: String,
}

/// RAGFlow wraps every payload as `{"code": 0, "message": ..., "data": ...}`.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    message: Option<String>,
    data: Option<T>,
}

/// Minimal client for the RAGFlow HTTP API.
pub struct RagflowClient {
    base_url: String,
    api_key: String,
    http: Client,
}

impl RagflowClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            http,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/v1/{}", self.base_url, path)
    }

    pub fn create_dataset(&self, name: &str) -> Result<Dataset> {
        let response = self
            .http
            .post(self.endpoint("datasets"))
            .bearer_auth(&self.api_key)
            .json(&json!({ "name": name }))
            .send()
            .with_context(|| format!("creating dataset {name}"))?;

        decode::<Dataset>(read_body(response)?)?.context("RAGFlow returned no dataset")
    }

    pub fn list_datasets(&self, name: Option<&str>) -> Result<Vec<Dataset>> {
        let mut request = self
            .http
            .get(self.endpoint("datasets"))
            .bearer_auth(&self.api_key)
            .query(&[("page", "1"), ("page_size", "100")]);
        if let Some(name) = name {
            request = request.query(&[("name", name)]);
        }

        let response = request.send().context("listing datasets")?;
        Ok(decode::<Vec<Dataset>>(read_body(response)?)?.unwrap_or_default())
    }

    pub fn delete_datasets(&self, ids: &[String]) -> Result<()> {
        let response = self
            .http
            .delete(self.endpoint("datasets"))
            .bearer_auth(&self.api_key)
            .json(&json!({ "ids": ids }))
            .send()
            .context("deleting datasets")?;

        decode::<serde_json::Value>(read_body(response)?)?;
        Ok(())
    }
}

fn read_body(response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().context("reading RAGFlow response")?;
    if !status.is_success() {
        bail!("RAGFlow returned HTTP {}: {}", status, body.trim());
    }
    Ok(body)
}

fn decode<T: DeserializeOwned>(body: String) -> Result<Option<T>> {
    let envelope: Envelope<T> =
        serde_json::from_str(&body).context("decoding RAGFlow response")?;

    if envelope.code != 0 {
        bail!(
            "RAGFlow error {}: {}",
            envelope.code,
            envelope.message.as_deref().unwrap_or("no message")
        );
    }

    Ok(envelope.data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> RagflowClient {
        RagflowClient::new(&server.base_url(), "ragflow-key", Duration::from_secs(2)).unwrap()
    }

    #[test]
    fn decodes_successful_envelope() {
        let body = r#"{"code":0,"data":[{"id":"ds1","name":"notes","chunk_count":3}]}"#;
        let datasets = decode::<Vec<Dataset>>(body.to_string()).unwrap().unwrap();
        assert_eq!(datasets[0].id, "ds1");
    }

    #[test]
    fn non_zero_code_is_an_error() {
        let body = r#"{"code":102,"message":"Dataset name 'x' already exists"}"#;
        let err = decode::<Dataset>(body.to_string()).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn creates_dataset_with_bearer_token() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/v1/datasets")
                .header("Authorization", "Bearer ragflow-key");
            then.status(200)
                .json_body(serde_json::json!({"code": 0, "data": {"id": "abc", "name": "test-1"}}));
        });

        let dataset = client(&server).create_dataset("test-1").unwrap();

        assert_eq!(
            dataset,
            Dataset {
                id: "abc".into(),
                name: "test-1".into()
            }
        );
        mock.assert();
    }

    #[test]
    fn lists_datasets_by_name() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/v1/datasets")
                .query_param("name", "test-1");
            then.status(200)
                .json_body(serde_json::json!({"code": 0, "data": [{"id": "abc", "name": "test-1"}]}));
        });

        let datasets = client(&server).list_datasets(Some("test-1")).unwrap();

        assert_eq!(datasets.len(), 1);
        mock.assert();
    }

    #[test]
    fn http_errors_carry_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(DELETE).path("/api/v1/datasets");
            then.status(500).body("boom");
        });

        let err = client(&server)
            .delete_datasets(&["abc".to_string()])
            .unwrap_err();
        assert!(err.to_string().contains("500"));
    }
}
