//! Screenshot upload sink.
//!
//! Captured images are pushed to the server as multipart uploads; the
//! returned URL is all the session keeps. Upload failures are non-fatal to
//! the session: the caller drops the capture and logs.

use crate::api::auth::CurrentUser;
use crate::api::ApiError;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

const UPLOAD_URL: &str = "uploads/screenshots";

#[derive(Deserialize)]
struct UploadResponse {
    url: String,
}

/// Contract for storing a captured image, returning its URL.
pub trait ImageSink {
    fn upload(&self, image: &[u8]) -> impl std::future::Future<Output = Result<String, ApiError>> + Send;
}

/// HTTP implementation of the image sink.
pub struct HttpImageSink {
    client: Client,
    api_url: String,
    token: String,
}

impl HttpImageSink {
    pub fn new(api_url: &str, user: &CurrentUser) -> Self {
        HttpImageSink {
            client: Client::new(),
            api_url: api_url.to_string(),
            token: user.token.clone(),
        }
    }
}

impl ImageSink for HttpImageSink {
    async fn upload(&self, image: &[u8]) -> Result<String, ApiError> {
        let part = Part::bytes(image.to_vec()).file_name("screenshot.jpg").mime_str("image/jpeg")?;
        let form = Form::new().part("image", part);

        let url = format!("{}/{}", self.api_url, UPLOAD_URL);
        let res = self.client.post(url).bearer_auth(&self.token).multipart(form).send().await?;

        if !res.status().is_success() {
            return Err(ApiError::Status(res.status()));
        }

        let payload: UploadResponse = res.json().await?;
        Ok(payload.url)
    }
}
