//! Client for the hosted record store's REST API.

use std::time::Duration;

use hotelhub_core::error::HotelResult;
use hotelhub_core::record::{
    DeleteRequest, FetchOneResponse, FetchResponse, FieldSelection, ListQuery, RecordId,
    WriteRequest, WriteResponse,
};
use hotelhub_core::store::RecordStore;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::StoreConfig;
use crate::error::StoreError;

const PROJECT_HEADER: HeaderName = HeaderName::from_static("x-project-id");
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// HTTP-backed [`RecordStore`].
///
/// Cheap to clone; the underlying connection pool is shared.
#[derive(Clone)]
pub struct HttpRecordStore {
    client: Client,
    base: Url,
}

impl HttpRecordStore {
    /// Build a client for the configured project. No request is made
    /// until the first operation.
    pub fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        info!(
            url = %config.base_url,
            project = %config.project_id,
            "Configuring record store client"
        );

        let base = Url::parse(&config.base_url)
            .map_err(|e| StoreError::Config(format!("invalid store URL: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(StoreError::Config(format!(
                "store URL cannot be a base: {}",
                config.base_url
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            PROJECT_HEADER,
            HeaderValue::from_str(&config.project_id)
                .map_err(|e| StoreError::Config(format!("invalid project id: {e}")))?,
        );
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.public_key))
            .map_err(|e| StoreError::Config(format!("invalid public key: {e}")))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self { client, base })
    }

    /// `{base}/api/v1/tables/{table}/records[/{suffix}]`
    fn endpoint(&self, table: &str, suffix: Option<&str>) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| StoreError::Config("store URL cannot be a base".into()))?;
            segments
                .pop_if_empty()
                .extend(["api", "v1", "tables", table, "records"]);
            if let Some(suffix) = suffix {
                segments.push(suffix);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "Record store request");
        self.client.request(method, url)
    }
}

/// Read a JSON body. An empty body is `None`; a non-2xx status is an
/// error carrying the status and body, except where `absent` matches.
async fn read_body<T: DeserializeOwned>(
    response: reqwest::Response,
    absent: Option<StatusCode>,
) -> Result<Option<T>, StoreError> {
    let status = response.status();
    if Some(status) == absent {
        return Ok(None);
    }

    let body = response.text().await?;
    if !status.is_success() {
        return Err(StoreError::Status {
            status: status.as_u16(),
            body,
        });
    }
    if body.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&body)?))
}

impl RecordStore for HttpRecordStore {
    async fn fetch_records(
        &self,
        table: &str,
        query: &ListQuery,
    ) -> HotelResult<Option<FetchResponse>> {
        let url = self.endpoint(table, Some("query"))?;
        let response = self
            .request(Method::POST, url)
            .json(query)
            .send()
            .await
            .map_err(StoreError::from)?;
        Ok(read_body(response, None).await?)
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: &RecordId,
        selection: &FieldSelection,
    ) -> HotelResult<Option<FetchOneResponse>> {
        let url = self.endpoint(table, Some(&id.to_string()))?;
        let response = self
            .request(Method::POST, url)
            .json(selection)
            .send()
            .await
            .map_err(StoreError::from)?;
        Ok(read_body(response, Some(StatusCode::NOT_FOUND)).await?)
    }

    async fn create_records(
        &self,
        table: &str,
        request: &WriteRequest,
    ) -> HotelResult<Option<WriteResponse>> {
        let url = self.endpoint(table, None)?;
        let response = self
            .request(Method::POST, url)
            .json(request)
            .send()
            .await
            .map_err(StoreError::from)?;
        Ok(read_body(response, None).await?)
    }

    async fn update_records(
        &self,
        table: &str,
        request: &WriteRequest,
    ) -> HotelResult<Option<WriteResponse>> {
        let url = self.endpoint(table, None)?;
        let response = self
            .request(Method::PUT, url)
            .json(request)
            .send()
            .await
            .map_err(StoreError::from)?;
        Ok(read_body(response, None).await?)
    }

    async fn delete_records(
        &self,
        table: &str,
        request: &DeleteRequest,
    ) -> HotelResult<Option<WriteResponse>> {
        let url = self.endpoint(table, None)?;
        let response = self
            .request(Method::DELETE, url)
            .json(request)
            .send()
            .await
            .map_err(StoreError::from)?;
        Ok(read_body(response, None).await?)
    }
}
