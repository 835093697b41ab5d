use std::time::Duration;

use log::debug;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SearchError;

/// Applied when no explicit timeout is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(10_000);

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Scalar(String),
    /// Serialized as one `name=value` pair per entry
    List(Vec<String>),
    /// Omitted from the request
    Absent,
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Scalar(value)
    }
}

impl From<&String> for QueryValue {
    fn from(value: &String) -> Self {
        QueryValue::Scalar(value.clone())
    }
}

impl From<u32> for QueryValue {
    fn from(value: u32) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Scalar(value.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::List(values)
    }
}

impl From<Vec<&str>> for QueryValue {
    fn from(values: Vec<&str>) -> Self {
        QueryValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(QueryValue::Absent, Into::into)
    }
}

/// Ordered query parameters. Setting a name twice replaces the earlier value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    params: Vec<(String, QueryValue)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<QueryValue>) {
        let name = name.into();
        let value = value.into();
        match self.params.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.params.push((name, value)),
        }
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.params
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Flatten into wire pairs, dropping absent and empty values.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (name, value) in &self.params {
            match value {
                QueryValue::Scalar(v) if !v.is_empty() => pairs.push((name.clone(), v.clone())),
                QueryValue::List(values) => pairs.extend(
                    values
                        .iter()
                        .filter(|v| !v.is_empty())
                        .map(|v| (name.clone(), v.clone())),
                ),
                _ => {}
            }
        }
        pairs
    }
}

/// JSON-over-HTTP client with a hard deadline on every request.
///
/// Each call issues exactly one request; there are no retries. A
/// non-success status fails without reading the body.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Option<Duration>) -> Result<Self, SearchError> {
        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("meal-search/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` with `query` and decode the JSON body into `T`
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &QueryParams,
    ) -> Result<T, SearchError> {
        debug!("GET {}", url);
        let request = self.client.get(url).query(&query.to_pairs());
        self.execute(request).await
    }

    /// POST `body` as JSON to `url` with `query` and decode the JSON reply
    pub async fn post_json<B, T>(
        &self,
        url: &str,
        query: &QueryParams,
        body: &B,
    ) -> Result<T, SearchError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("POST {}", url);
        let request = self.client.post(url).query(&query.to_pairs()).json(body);
        self.execute(request).await
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, SearchError> {
        let response = request.send().await.map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            debug!("Request to {} failed with status {}", response.url(), status);
            return Err(SearchError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn classify(&self, error: reqwest::Error) -> SearchError {
        if error.is_timeout() {
            SearchError::NetworkTimeout(self.timeout)
        } else {
            SearchError::RequestError(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::Value;

    #[test]
    fn test_query_pairs_skip_absent_and_empty() {
        let query = QueryParams::new()
            .with("q", "chicken")
            .with("diet", None::<String>)
            .with("health", "")
            .with("type", "public");

        assert_eq!(
            query.to_pairs(),
            vec![
                ("q".to_string(), "chicken".to_string()),
                ("type".to_string(), "public".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_lists_repeat_name() {
        let query = QueryParams::new().with("health", vec!["low-glycemic", "", "vegan"]);

        assert_eq!(
            query.to_pairs(),
            vec![
                ("health".to_string(), "low-glycemic".to_string()),
                ("health".to_string(), "vegan".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_insert_replaces() {
        let mut query = QueryParams::new();
        query.insert("q", "beef");
        query.insert("page", 1u32);
        query.insert("q", "pork");

        assert_eq!(query.get("q"), Some(&QueryValue::Scalar("pork".to_string())));
        assert_eq!(query.to_pairs().len(), 2);
        assert_eq!(query.to_pairs()[0].0, "q");
    }

    #[tokio::test]
    async fn test_get_json_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search.php")
            .match_query(Matcher::UrlEncoded("s".into(), "fish pie".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"meals": []}"#)
            .expect(1)
            .create_async()
            .await;

        let client = HttpClient::new(None).unwrap();
        let query = QueryParams::new().with("s", "fish pie");
        let body: Value = client
            .get_json(&format!("{}/search.php", server.url()), &query)
            .await
            .unwrap();

        assert_eq!(body["meals"], Value::Array(vec![]));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_not_parsed() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search.php")
            .with_status(503)
            .with_body("<html>down for maintenance</html>")
            .create_async()
            .await;

        let client = HttpClient::new(None).unwrap();
        let result: Result<Value, _> = client
            .get_json(&format!("{}/search.php", server.url()), &QueryParams::new())
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(err.to_string(), "HTTP 503");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search.php")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = HttpClient::new(None).unwrap();
        let result: Result<Value, _> = client
            .get_json(&format!("{}/search.php", server.url()), &QueryParams::new())
            .await;

        assert!(matches!(result, Err(SearchError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_request_times_out() {
        // Accept connections but never answer
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let timeout = Duration::from_millis(100);
        let client = HttpClient::new(Some(timeout)).unwrap();
        let result: Result<Value, _> = client
            .get_json(&format!("http://{}/slow", addr), &QueryParams::new())
            .await;

        let err = result.unwrap_err();
        assert!(err.is_timeout());
        assert!(matches!(err, SearchError::NetworkTimeout(d) if d == timeout));
    }

    #[tokio::test]
    async fn test_post_json() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/nutrition-details")
            .match_query(Matcher::UrlEncoded("app_id".into(), "id".into()))
            .match_body(Matcher::Json(serde_json::json!({"ingr": ["1 egg"]})))
            .with_status(200)
            .with_body(r#"{"calories": 72}"#)
            .create_async()
            .await;

        let client = HttpClient::new(None).unwrap();
        let query = QueryParams::new().with("app_id", "id");
        let body: Value = client
            .post_json(
                &format!("{}/api/nutrition-details", server.url()),
                &query,
                &serde_json::json!({"ingr": ["1 egg"]}),
            )
            .await
            .unwrap();

        assert_eq!(body["calories"], 72);
        mock.assert_async().await;
    }

    #[test]
    fn test_default_timeout() {
        let client = HttpClient::new(None).unwrap();
        assert_eq!(client.timeout(), Duration::from_secs(10));
    }
}
