//! PostgREST knowledge store.
//!
//! Queries `{base}/rest/v1/{table}` with `apikey` and bearer headers, the
//! way the Supabase client does:
//!
//! ```text
//! GET /rest/v1/responses?select=reply&trigger=ilike.*oi*&limit=1
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;

use super::{KnowledgeError, KnowledgeHit, KnowledgeStore, context_words};

#[derive(Deserialize)]
struct ReplyRow {
    reply: Option<String>,
}

pub struct RestKnowledgeStore {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl RestKnowledgeStore {
    pub fn new(client: Client, base_url: String, api_key: String, table: String) -> Self {
        let endpoint = format!("{}/rest/v1/{}", base_url.trim_end_matches('/'), table);
        Self {
            client,
            endpoint,
            api_key,
        }
    }

    async fn fetch(&self, filter: (&str, String), limit: usize) -> Result<Vec<String>, KnowledgeError> {
        let limit = limit.to_string();
        let resp = self
            .client
            .get(&self.endpoint)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[
                ("select", "reply"),
                (filter.0, filter.1.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        let rows: Vec<ReplyRow> = check_status(resp).await?.json().await?;
        Ok(rows
            .into_iter()
            .filter_map(|r| r.reply)
            .filter(|r| !r.is_empty())
            .collect())
    }
}

async fn check_status(resp: Response) -> Result<Response, KnowledgeError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let body = resp
        .text()
        .await
        .unwrap_or_else(|_| "<no body>".to_string());
    Err(KnowledgeError::Backend(format!(
        "PostgREST returned {status}: {body}"
    )))
}

#[async_trait]
impl KnowledgeStore for RestKnowledgeStore {
    async fn lookup(&self, message: &str) -> Result<Option<KnowledgeHit>, KnowledgeError> {
        let replies = self
            .fetch(("trigger", format!("ilike.*{message}*")), 1)
            .await?;
        Ok(replies.into_iter().next().map(|reply| KnowledgeHit { reply }))
    }

    async fn related(&self, message: &str, limit: usize) -> Result<Vec<String>, KnowledgeError> {
        let words = context_words(message);
        if words.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let clauses: Vec<String> = words
            .iter()
            .map(|w| format!("trigger.ilike.*{w}*"))
            .collect();
        self.fetch(("or", format!("({})", clauses.join(","))), limit)
            .await
    }

    fn name(&self) -> &str {
        "postgrest"
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn store(server: &MockServer) -> RestKnowledgeStore {
        RestKnowledgeStore::new(
            Client::new(),
            format!("{}/", server.uri()),
            "anon-key".into(),
            "responses".into(),
        )
    }

    #[tokio::test]
    async fn lookup_hit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/responses"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer anon-key"))
            .and(query_param("select", "reply"))
            .and(query_param("trigger", "ilike.*oi*"))
            .and(query_param("limit", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([{ "reply": "Olá! Eu sou a Azy." }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let hit = store(&server).lookup("oi").await.unwrap();
        assert_eq!(
            hit,
            Some(KnowledgeHit {
                reply: "Olá! Eu sou a Azy.".into()
            })
        );
    }

    #[tokio::test]
    async fn lookup_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/responses"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        assert_eq!(store(&server).lookup("nada").await.unwrap(), None);
    }

    #[tokio::test]
    async fn null_reply_counts_as_miss() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!([{ "reply": null }])),
            )
            .mount(&server)
            .await;

        assert_eq!(store(&server).lookup("oi").await.unwrap(), None);
    }

    #[tokio::test]
    async fn server_error_is_backend_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = store(&server).lookup("oi").await.unwrap_err();
        assert!(matches!(err, KnowledgeError::Backend(m) if m.contains("boom")));
    }

    #[tokio::test]
    async fn related_builds_or_filter() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/responses"))
            .and(query_param("or", "(trigger.ilike.*horario*,trigger.ilike.*loja*)"))
            .and(query_param("limit", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                { "reply": "Abrimos às 9h." },
                { "reply": "A loja fica no centro." }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let related = store(&server).related("horario da loja", 3).await.unwrap();
        assert_eq!(related, vec!["Abrimos às 9h.", "A loja fica no centro."]);
    }

    #[tokio::test]
    async fn related_without_words_skips_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert!(store(&server).related("oi", 3).await.unwrap().is_empty());
    }
}
