use async_trait::async_trait;
use bytes::Bytes;
use parcel_core::wire::UPLOAD_PATH;
use parcel_core::{ParcelError, ParcelResult};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use tracing::debug;

use crate::request::{EncodedPart, UploadRequest};

/// Status and raw body of whatever answered the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferResponse {
    pub status: u16,
    pub body: Bytes,
}

impl TransferResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The one place an upload leaves the process.
///
/// Implementations send exactly one request per call and never retry.
/// A non-2xx answer is still `Ok`; only failing to send or to read the
/// answer is an error.
#[async_trait]
pub trait Transfer: Send + Sync {
    async fn transfer(&self, request: UploadRequest) -> ParcelResult<TransferResponse>;
}

/// `multipart/form-data` POST to `<base>/api/upload` over reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    endpoint: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: &str) -> ParcelResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: &str) -> ParcelResult<Self> {
        let endpoint = Url::parse(base_url)
            .and_then(|base| base.join(UPLOAD_PATH))
            .map_err(|e| ParcelError::transport(format!("Invalid base URL '{base_url}': {e}")))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

fn into_form(request: &UploadRequest) -> ParcelResult<Form> {
    let mut form = Form::new();
    for part in request.parts() {
        form = match part {
            EncodedPart::Text { name, value } => form.text(name, value),
            EncodedPart::Binary {
                name,
                filename,
                content_type,
                bytes,
            } => {
                let length = bytes.len() as u64;
                let part = Part::stream_with_length(bytes, length)
                    .file_name(filename)
                    .mime_str(&content_type)
                    .map_err(|e| {
                        ParcelError::encode(format!("Invalid content type '{content_type}': {e}"))
                    })?;
                form.part(name, part)
            }
        };
    }
    Ok(form)
}

#[async_trait]
impl Transfer for ReqwestTransport {
    async fn transfer(&self, request: UploadRequest) -> ParcelResult<TransferResponse> {
        let form = into_form(&request)?;
        debug!(endpoint = %self.endpoint, files = request.files.len(), "sending upload");

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(ParcelError::transport)?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(ParcelError::transport)?;
        Ok(TransferResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_is_fixed_under_base() {
        let transport = ReqwestTransport::new("http://127.0.0.1:3030").unwrap();
        assert_eq!(transport.endpoint().as_str(), "http://127.0.0.1:3030/api/upload");

        let transport = ReqwestTransport::new("http://example.com/app/").unwrap();
        assert_eq!(transport.endpoint().as_str(), "http://example.com/api/upload");
    }

    #[test]
    fn bad_base_url_is_rejected() {
        let err = ReqwestTransport::new("not a url").unwrap_err();
        assert!(err.to_string().contains("Invalid base URL"));
    }

    #[test]
    fn success_range_is_2xx() {
        let ok = TransferResponse { status: 204, body: Bytes::new() };
        let bad = TransferResponse { status: 500, body: Bytes::new() };
        assert!(ok.is_success());
        assert!(!bad.is_success());
    }
}
