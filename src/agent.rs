use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use anyhow::{Result, anyhow};

/// Shown in place of an answer whenever either backend stage fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I couldn't process your request. I can only answer questions related to the demo database.";

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Serialize)]
struct QueryRequest<'a> {
    #[serde(rename = "userQuery")]
    user_query: &'a str,
}

#[derive(Deserialize)]
struct QueryResponse {
    result: Value,
}

#[derive(Serialize)]
struct ParseRequest<'a> {
    #[serde(rename = "userQuery")]
    user_query: &'a str,
    #[serde(rename = "generatedData")]
    generated_data: &'a Value,
}

#[derive(Deserialize)]
struct ParseResponse {
    result: ParseResult,
}

#[derive(Deserialize)]
struct ParseResult {
    #[serde(rename = "finalResponse")]
    final_response: String,
}

#[derive(Clone)]
pub struct AgentClient {
    client: Client,
    base_url: String,
}

impl AgentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// First stage: interpret the question. The `result` payload is opaque
    /// to this client and is handed to `parse` untouched.
    pub async fn query(&self, user_query: &str) -> Result<Value> {
        let url = format!("{}/query", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&QueryRequest { user_query })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "query stage failed with status: {}. Is the agent backend running at {}?",
                response.status(),
                self.base_url
            ));
        }

        let query_response: QueryResponse = response.json().await?;
        Ok(query_response.result)
    }

    /// Second stage: format the interpreted result into a displayable answer.
    pub async fn parse(&self, user_query: &str, generated_data: &Value) -> Result<String> {
        let url = format!("{}/parser", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&ParseRequest {
                user_query,
                generated_data,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "parser stage failed with status: {}",
                response.status()
            ));
        }

        let parse_response: ParseResponse = response.json().await?;
        Ok(parse_response.result.final_response)
    }

    /// Run both stages in order, exposing only the combined outcome.
    pub async fn ask(&self, user_query: &str) -> Result<String> {
        let generated = self.query(user_query).await?;
        self.parse(user_query, &generated).await
    }
}
