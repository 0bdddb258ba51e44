//! `SubmissionApi` sobre HTTP.
//!
//! - `POST {base}/applications`: alta, responde `201` con el recibo.
//! - `PUT {base}/applications/{id}`: modificación.
//! - `GET {base}/applications/{id}/edit`: solicitud para editar.
//!
//! Alta y modificación viajan como multipart: una parte de texto `document`
//! con el JSON y una parte por adjunto cuyo nombre es el campo.
use async_trait::async_trait;
use log::{debug, warn};
use onboard_core::{EditBundle, Node, PackagedFile, SubmissionApi, SubmitError, SubmitReceipt};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::payload::classify_failure;
use crate::{AdapterError, ClientConfig};

pub const DOCUMENT_PART: &str = "document";

#[derive(Debug, Clone)]
pub struct HttpSubmissionClient {
    client: Client,
    config: ClientConfig,
}

impl HttpSubmissionClient {
    pub fn new(config: ClientConfig) -> Result<Self, AdapterError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn form(document: &Node, files: &[PackagedFile]) -> Result<Form, AdapterError> {
        let json = serde_json::to_string(document).map_err(|e| AdapterError::Decode(e.to_string()))?;
        let mut form = Form::new().text(DOCUMENT_PART, json);
        for file in files {
            let part = Part::bytes(file.bytes.to_vec()).file_name(file.filename.clone())
                                                       .mime_str(&file.content_type)?;
            form = form.part(file.field_name.clone(), part);
        }
        Ok(form)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, SubmitError> {
        let response = self.authorize(request).send().await.map_err(AdapterError::from)?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!("submission backend answered {status}");
        Err(classify_failure(status, &body))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, SubmitError> {
        let value = response.json::<T>().await.map_err(|e| AdapterError::Decode(e.to_string()))?;
        Ok(value)
    }
}

#[async_trait]
impl SubmissionApi for HttpSubmissionClient {
    async fn submit(&self, document: &Node, files: &[PackagedFile]) -> Result<SubmitReceipt, SubmitError> {
        let url = self.config.url("applications");
        debug!("POST {url} with {} file(s)", files.len());
        let form = Self::form(document, files)?;
        let response = self.send(self.client.post(&url).multipart(form)).await?;
        Self::decode(response).await
    }

    async fn update(&self, id: &str, document: &Node, files: &[PackagedFile]) -> Result<(), SubmitError> {
        let url = self.config.url(&format!("applications/{id}"));
        debug!("PUT {url} with {} file(s)", files.len());
        let form = Self::form(document, files)?;
        self.send(self.client.put(&url).multipart(form)).await?;
        Ok(())
    }

    async fn fetch_for_edit(&self, id: &str) -> Result<EditBundle, SubmitError> {
        let url = self.config.url(&format!("applications/{id}/edit"));
        debug!("GET {url}");
        let response = self.send(self.client.get(&url)).await?;
        Self::decode(response).await
    }
}
