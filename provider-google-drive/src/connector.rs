//! Google Drive API connector implementation
//!
//! Implements the `StorageProvider` trait for Google Drive API v3.

use async_trait::async_trait;
use bridge_traits::error::Result as BridgeResult;
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use bridge_traits::storage::{StorageProvider, UploadContent, UploadMetadata};
use bytes::{BufMut, Bytes, BytesMut};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::{GoogleDriveError, Result};
use crate::types::{ApiErrorResponse, CreateFileRequest, CreatedFile};

/// Google Drive upload endpoint
const DRIVE_UPLOAD_BASE: &str = "https://www.googleapis.com/upload/drive/v3";

/// Google Drive API connector
///
/// Implements `StorageProvider` for Google Drive API v3.
///
/// Each [`create_file`](StorageProvider::create_file) call is one
/// `multipart/related` request carrying the JSON metadata and the media
/// bytes. Requests are sent once; failures are reported to the caller.
///
/// # Example
///
/// ```ignore
/// use provider_google_drive::GoogleDriveConnector;
/// use bridge_traits::storage::{StorageProvider, UploadContent, UploadMetadata};
///
/// let connector = GoogleDriveConnector::new(http_client, access_token);
/// let id = connector.create_file(metadata, content).await?;
/// ```
pub struct GoogleDriveConnector {
    /// HTTP client for API requests
    http_client: Arc<dyn HttpClient>,

    /// OAuth 2.0 access token
    access_token: String,

    upload_base: String,
}

impl GoogleDriveConnector {
    /// Create a new Google Drive connector
    ///
    /// # Arguments
    ///
    /// * `http_client` - HTTP client implementation
    /// * `access_token` - OAuth 2.0 access token with `drive.file` scope
    pub fn new(http_client: Arc<dyn HttpClient>, access_token: String) -> Self {
        Self {
            http_client,
            access_token,
            upload_base: DRIVE_UPLOAD_BASE.to_string(),
        }
    }

    /// Point uploads at a different base URL.
    pub fn with_upload_base(mut self, base: impl Into<String>) -> Self {
        self.upload_base = base.into();
        self
    }

    fn create_url(&self) -> String {
        format!("{}/files?uploadType=multipart&fields=id", self.upload_base)
    }

    /// Build a `multipart/related` body: JSON metadata part, then media part.
    fn multipart_body(
        boundary: &str,
        metadata: &CreateFileRequest,
        content: &UploadContent,
    ) -> Result<Bytes> {
        let metadata_json = serde_json::to_vec(metadata).map_err(|e| {
            GoogleDriveError::ParseError(format!("Failed to encode file metadata: {}", e))
        })?;

        let mut body = BytesMut::with_capacity(metadata_json.len() + content.data.len() + 256);
        body.put_slice(format!("--{}\r\n", boundary).as_bytes());
        body.put_slice(b"Content-Type: application/json; charset=UTF-8\r\n\r\n");
        body.put_slice(&metadata_json);
        body.put_slice(format!("\r\n--{}\r\n", boundary).as_bytes());
        body.put_slice(format!("Content-Type: {}\r\n\r\n", content.mime_type).as_bytes());
        body.put_slice(&content.data);
        body.put_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

        Ok(body.freeze())
    }

    fn api_error(response: &HttpResponse) -> GoogleDriveError {
        let message = serde_json::from_slice::<ApiErrorResponse>(&response.body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(&response.body).to_string());

        if response.status == 401 {
            GoogleDriveError::AuthenticationFailed(message)
        } else {
            GoogleDriveError::ApiError {
                status_code: response.status,
                message,
            }
        }
    }
}

#[async_trait]
impl StorageProvider for GoogleDriveConnector {
    #[instrument(skip(self, content), fields(name = %metadata.name, bytes = content.data.len()))]
    async fn create_file(
        &self,
        metadata: UploadMetadata,
        content: UploadContent,
    ) -> BridgeResult<String> {
        let boundary = format!("drive-uploader-{}", uuid::Uuid::new_v4().simple());
        let request_metadata = CreateFileRequest {
            name: metadata.name,
            parents: metadata.parent_ids,
        };
        let body = Self::multipart_body(&boundary, &request_metadata, &content)?;

        let request = HttpRequest::new(HttpMethod::Post, self.create_url())
            .bearer_token(&self.access_token)
            .header(
                "Content-Type",
                format!("multipart/related; boundary={}", boundary),
            )
            .header("Accept", "application/json")
            .body(body);

        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            let error = Self::api_error(&response);
            warn!(status = response.status, error = %error, "File upload rejected");
            return Err(error.into());
        }

        let created: CreatedFile = serde_json::from_slice(&response.body).map_err(|e| {
            GoogleDriveError::ParseError(format!("Failed to parse created file: {}", e))
        })?;

        debug!(file_id = %created.id, "File created");

        Ok(created.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::error::BridgeError;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        HttpClient {}

        #[async_trait]
        impl HttpClient for HttpClient {
            async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse>;
        }
    }

    fn upload_args() -> (UploadMetadata, UploadContent) {
        (
            UploadMetadata {
                name: "shot.png".to_string(),
                parent_ids: vec!["folder1".to_string()],
            },
            UploadContent {
                mime_type: "image/png".to_string(),
                data: Bytes::from_static(&[0x89, b'P', b'N', b'G']),
            },
        )
    }

    fn boundary_of(request: &HttpRequest) -> String {
        request
            .headers
            .get("Content-Type")
            .and_then(|value| value.strip_prefix("multipart/related; boundary="))
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_create_file_success() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert_eq!(req.method, HttpMethod::Post);
            assert_eq!(
                req.url,
                "https://www.googleapis.com/upload/drive/v3/files?uploadType=multipart&fields=id"
            );
            assert_eq!(
                req.headers.get("Authorization").map(String::as_str),
                Some("Bearer test_token")
            );

            let boundary = boundary_of(&req);
            let body = req.body.unwrap();
            let text = String::from_utf8_lossy(&body);

            assert!(text.starts_with(&format!("--{}\r\n", boundary)));
            assert!(text.contains(r#"{"name":"shot.png","parents":["folder1"]}"#));
            assert!(text.contains("Content-Type: image/png\r\n\r\n"));
            assert!(text.ends_with(&format!("\r\n--{}--\r\n", boundary)));
            assert!(body
                .windows(4)
                .any(|window| window == [0x89, b'P', b'N', b'G']));

            Ok(HttpResponse {
                status: 200,
                headers: HashMap::new(),
                body: Bytes::from_static(br#"{"id": "1AbCdEf"}"#),
            })
        });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "test_token".to_string());
        let (metadata, content) = upload_args();
        let id = connector.create_file(metadata, content).await.unwrap();

        assert_eq!(id, "1AbCdEf");
    }

    #[tokio::test]
    async fn test_create_file_custom_base() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|req| {
            assert!(req.url.starts_with("http://127.0.0.1:9000/files?"));
            Ok(HttpResponse {
                status: 200,
                headers: HashMap::new(),
                body: Bytes::from_static(br#"{"id": "x"}"#),
            })
        });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "t".to_string())
            .with_upload_base("http://127.0.0.1:9000");
        let (metadata, content) = upload_args();
        assert!(connector.create_file(metadata, content).await.is_ok());
    }

    #[tokio::test]
    async fn test_api_error_is_not_retried() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 404,
                headers: HashMap::new(),
                body: Bytes::from_static(
                    br#"{"error": {"code": 404, "message": "File not found: folder1."}}"#,
                ),
            })
        });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "test_token".to_string());
        let (metadata, content) = upload_args();
        let result = connector.create_file(metadata, content).await;

        match result {
            Err(BridgeError::OperationFailed(message)) => {
                assert!(message.contains("404"));
                assert!(message.contains("File not found: folder1."));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_failure() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 401,
                headers: HashMap::new(),
                body: Bytes::from_static(b"Invalid Credentials"),
            })
        });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "expired".to_string());
        let (metadata, content) = upload_args();
        let error = connector.create_file(metadata, content).await.unwrap_err();

        assert!(error.to_string().contains("Authentication failed"));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let mut mock_http = MockHttpClient::new();

        mock_http
            .expect_execute()
            .times(1)
            .returning(|_| Err(BridgeError::OperationFailed("connection reset".to_string())));

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "test_token".to_string());
        let (metadata, content) = upload_args();
        let result = connector.create_file(metadata, content).await;

        assert!(matches!(result, Err(BridgeError::OperationFailed(m)) if m == "connection reset"));
    }

    #[tokio::test]
    async fn test_unparseable_response() {
        let mut mock_http = MockHttpClient::new();

        mock_http.expect_execute().times(1).returning(|_| {
            Ok(HttpResponse {
                status: 200,
                headers: HashMap::new(),
                body: Bytes::from_static(b"<html>"),
            })
        });

        let connector = GoogleDriveConnector::new(Arc::new(mock_http), "test_token".to_string());
        let (metadata, content) = upload_args();

        assert!(connector.create_file(metadata, content).await.is_err());
    }
}
