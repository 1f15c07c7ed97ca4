//! Server inventory accessor.

use serde_json::Value;
use tracing::warn;

use super::models::{Server, ServerResponse};
use crate::client::RobotClient;
use crate::error::RobotError;

impl RobotClient {
    /// Fetch one server by number.
    ///
    /// # Errors
    /// Returns error if the request fails or the response cannot be decoded.
    pub async fn get_server(&self, server_number: u32) -> Result<Server, RobotError> {
        let body = self.get(&format!("/server/{server_number}")).await?;
        let response: ServerResponse = serde_json::from_slice(&body).map_err(|e| {
            warn!(error = %e, server_number, "Failed to parse server response");
            RobotError::Serialization(e)
        })?;
        Ok(response.server)
    }

    /// Fetch all servers of the account, in the order Robot returns them.
    ///
    /// # Errors
    /// Returns error if the request fails or any element is malformed; no
    /// partial list is returned.
    pub async fn get_servers(&self) -> Result<Vec<Server>, RobotError> {
        let body = self.get("/server").await?;
        parse_server_list(&body)
    }
}

/// Decode `[{"server": {...}}, ...]`, failing on the first bad element.
fn parse_server_list(body: &[u8]) -> Result<Vec<Server>, RobotError> {
    let wrappers: Vec<Value> = serde_json::from_slice(body)?;

    wrappers
        .into_iter()
        .enumerate()
        .map(|(index, mut wrapper)| {
            let inner = wrapper
                .get_mut("server")
                .filter(|server| server.is_object())
                .map(Value::take)
                .ok_or_else(|| {
                    RobotError::Payload(format!(
                        "invalid server object structure at index {index}"
                    ))
                })?;
            serde_json::from_value(inner).map_err(|e| {
                warn!(error = %e, index, "Failed to decode server in list");
                RobotError::Serialization(e)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::config::RobotConfig;

    fn client_for(server: &MockServer) -> RobotClient {
        RobotClient::new(RobotConfig::new("u", "p").with_base_url(server.uri())).unwrap()
    }

    #[test]
    fn test_list_keeps_order() {
        let body = br#"[{"server":{"server_number":1,"server_name":"a"}},{"server":{"server_number":2,"server_name":"b"}}]"#;
        let servers = parse_server_list(body).unwrap();
        let numbers: Vec<u32> = servers.iter().map(|s| s.server_number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_missing_wrapper_aborts_whole_list() {
        let body = br#"[{"server":{"server_number":1}},{"server_number":2}]"#;
        let err = parse_server_list(body).unwrap_err();
        match err {
            RobotError::Payload(message) => assert!(message.contains("index 1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_object_wrapper_rejected() {
        let err = parse_server_list(br#"[{"server":[]}]"#).unwrap_err();
        assert!(matches!(err, RobotError::Payload(_)));
    }

    #[test]
    fn test_bad_inner_server_aborts() {
        let err = parse_server_list(br#"[{"server":{"server_number":"one"}}]"#).unwrap_err();
        assert!(matches!(err, RobotError::Serialization(_)));
    }

    #[test]
    fn test_empty_list() {
        assert!(parse_server_list(b"[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/server/321"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"server":{"server_number":321,"server_name":"web","dc":"FSN1-DC5","status":"ready"}}"#,
            ))
            .mount(&server)
            .await;

        let record = client_for(&server).get_server(321).await.unwrap();
        assert_eq!(record.server_number, 321);
        assert_eq!(record.datacenter, "FSN1-DC5");
    }

    #[tokio::test]
    async fn test_get_server_bad_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/server/321"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"server_number":321}"#))
            .mount(&server)
            .await;

        let err = client_for(&server).get_server(321).await.unwrap_err();
        assert!(matches!(err, RobotError::Serialization(_)));
    }
}
