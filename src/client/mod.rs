//! Remote data client for the SpbNet inference API.
//!
//! Two verbs against a fixed base URL: GET with query parameters and POST
//! with a JSON body. Both parse the response body as JSON and fail with
//! [`SpbError::RequestFailed`] on a non-2xx status or
//! [`SpbError::InvalidResponse`] on a non-JSON body. There is no retry,
//! timeout tuning, or cancellation here; ordering and deduplication are
//! the fetch orchestrator's problem.

pub mod types;

use crate::error::SpbError;

/// Transport seam between the fetch worker and the wire.
///
/// [`ApiClient`] is the production implementation; tests drive the
/// orchestrator through an in-memory fake.
pub trait Backend: Send {
    /// GET `path` with the given query parameters, returning parsed JSON.
    ///
    /// # Errors
    ///
    /// [`SpbError::RequestFailed`], [`SpbError::InvalidResponse`], or
    /// [`SpbError::Transport`].
    fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, SpbError>;

    /// POST `body` as JSON to `path`, returning parsed JSON.
    ///
    /// # Errors
    ///
    /// [`SpbError::RequestFailed`], [`SpbError::InvalidResponse`], or
    /// [`SpbError::Transport`].
    fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, SpbError>;
}

/// HTTP client over a `ureq` agent and a configured base URL.
pub struct ApiClient {
    agent: ureq::Agent,
    base_url: String,
}

impl ApiClient {
    /// Client against the given base URL (no trailing slash expected).
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn full_url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn map_err(e: &ureq::Error, path: &str) -> SpbError {
        match e {
            ureq::Error::StatusCode(code) => SpbError::RequestFailed {
                status: *code,
                path: path.to_owned(),
            },
            other => SpbError::Transport(other.to_string()),
        }
    }

    fn parse_body(text: &str) -> Result<serde_json::Value, SpbError> {
        serde_json::from_str(text).map_err(|_| {
            SpbError::InvalidResponse("body is not valid JSON".to_owned())
        })
    }
}

impl Backend for ApiClient {
    fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<serde_json::Value, SpbError> {
        let mut request = self.agent.get(self.full_url(path));
        for &(key, value) in query {
            request = request.query(key, value);
        }
        let mut response =
            request.call().map_err(|e| Self::map_err(&e, path))?;
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| SpbError::Transport(e.to_string()))?;
        Self::parse_body(&text)
    }

    fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, SpbError> {
        let payload = body.to_string();
        let mut response = self
            .agent
            .post(self.full_url(path))
            .header("Content-Type", "application/json")
            .send(&payload)
            .map_err(|e| Self::map_err(&e, path))?;
        let text = response
            .body_mut()
            .read_to_string()
            .map_err(|e| SpbError::Transport(e.to_string()))?;
        Self::parse_body(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slash() {
        let client = ApiClient::new("http://localhost:8000/");
        assert_eq!(client.full_url("/modal"), "http://localhost:8000/modal");
    }

    #[test]
    fn non_json_body_is_invalid_response() {
        assert!(matches!(
            ApiClient::parse_body("<html>oops</html>"),
            Err(SpbError::InvalidResponse(_))
        ));
        assert!(ApiClient::parse_body("{\"cifid\": \"x\"}").is_ok());
    }
}
