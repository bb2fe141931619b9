//! reqwestによるHTTPバックエンド

use super::{Backend, BackendResponse};
use crate::error::{LensError, WorkflowError};
use crate::workflow::SelectedImage;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::debug;

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LensError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LensError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

fn transport(e: reqwest::Error) -> WorkflowError {
    WorkflowError::Transport(e.to_string())
}

async fn read_response(resp: reqwest::Response) -> Result<BackendResponse, WorkflowError> {
    let status = resp.status().as_u16();
    let body = resp.text().await.map_err(transport)?;
    debug!(status, body_len = body.len(), "backend response");
    Ok(BackendResponse { status, body })
}

#[async_trait]
impl Backend for HttpBackend {
    async fn upload_image(&self, image: &SelectedImage) -> Result<BackendResponse, WorkflowError> {
        let part = Part::bytes(image.data.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| WorkflowError::InvalidImage(format!("{}: {}", image.mime_type, e)))?;
        let form = Form::new().part("image", part);

        let url = self.endpoint("upload");
        debug!(%url, file = %image.file_name, bytes = image.len(), "POST");
        let resp = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        read_response(resp).await
    }

    async fn analyze_image(&self, image_url: &str) -> Result<BackendResponse, WorkflowError> {
        let url = self.endpoint("analyze");
        debug!(%url, image_url, "GET");
        let resp = self
            .client
            .get(url)
            .query(&[("imageUrl", image_url)])
            .send()
            .await
            .map_err(transport)?;

        read_response(resp).await
    }
}
