//! HTTP implementation of the metadata client.
//!
//! # Examples
//!
//! ```no_run
//! use modelgen_client::OctaneClient;
//! use modelgen_core::traits::MetadataClient;
//! use modelgen_core::GeneratorConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeneratorConfig::builder()
//!     .server("https://octane.example.com")
//!     .shared_space(1001)
//!     .workspace(1002)
//!     .client_id("id")
//!     .client_secret("secret")
//!     .build()?;
//!
//! let mut client = OctaneClient::new(&config)?;
//! client.authenticate(&config.credentials, config.api_mode).await?;
//! let types = client.entity_types().await?;
//! println!("{} entity types", types.len());
//! client.sign_out().await?;
//! # Ok(())
//! # }
//! ```

use crate::page::Page;
use async_trait::async_trait;
use modelgen_core::traits::MetadataClient;
use modelgen_core::{
    ApiMode, Credentials, EntityRecord, EntityTypeDescriptor, Error, FieldDescriptor,
    GeneratorConfig, Query, QueryRequest, Result,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Records requested per collection page.
pub const DEFAULT_PAGE_SIZE: usize = 500;

const CLIENT_TYPE_HEADER: &str = "HPECLIENTTYPE";
const TECH_PREVIEW_CLIENT_TYPE: &str = "HPE_REST_API_TECH_PREVIEW";
const TECH_PREVIEW_HEADER: &str = "ALM-OCTANE-TECH-PREVIEW";

#[derive(Serialize)]
struct SignInRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

/// Octane REST client bound to one shared space and workspace.
#[derive(Debug)]
pub struct OctaneClient {
    http: reqwest::Client,
    server: String,
    shared_space: u64,
    workspace: u64,
    mode: ApiMode,
    page_size: usize,
}

impl OctaneClient {
    /// Creates a client for the server and workspace in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP client cannot be built.
    pub fn new(config: &GeneratorConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .danger_accept_invalid_certs(config.trust_all_certs)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::ConfigError {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            server: config.server.clone(),
            shared_space: config.shared_space,
            workspace: config.workspace,
            mode: ApiMode::Default,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Overrides the page size used for collection queries.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Returns the URL of a workspace-relative API path.
    #[must_use]
    pub fn workspace_url(&self, path: &str) -> String {
        format!(
            "{}/api/shared_spaces/{}/workspaces/{}/{}",
            self.server,
            self.shared_space,
            self.workspace,
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        with_mode_headers(self.http.request(method, url), self.mode)
    }

    async fn send(&self, endpoint: &str, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await.map_err(|e| Error::ConnectionFailed {
            server: self.server.clone(),
            source: Box::new(e),
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        Err(Error::ApiError {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Page<T>> {
        let url = self.workspace_url(path);
        debug!("GET {url} {params:?}");
        let response = self
            .send(path, self.request(Method::GET, &url).query(params))
            .await?;

        response.json().await.map_err(|e| Error::SerializationError {
            message: format!("failed to decode response of {path}: {e}"),
            source: None,
        })
    }

    async fn get_all<T: DeserializeOwned>(
        &self,
        path: &str,
        request: &QueryRequest,
    ) -> Result<Vec<T>> {
        let mut records = Vec::new();
        let mut offset = 0;
        loop {
            let params = collection_params(request, offset, self.page_size);
            let page: Page<T> = self.get_page(path, &params).await?;
            let more = page.has_more(offset);
            offset += page.data.len();
            records.extend(page.data);
            if !more {
                return Ok(records);
            }
        }
    }
}

/// Adds the technical preview headers when `mode` asks for them.
fn with_mode_headers(builder: RequestBuilder, mode: ApiMode) -> RequestBuilder {
    if mode.is_technical_preview() {
        builder
            .header(CLIENT_TYPE_HEADER, TECH_PREVIEW_CLIENT_TYPE)
            .header(TECH_PREVIEW_HEADER, "true")
    } else {
        builder
    }
}

/// Builds the query string of a collection request.
#[must_use]
pub(crate) fn collection_params(
    request: &QueryRequest,
    offset: usize,
    limit: usize,
) -> Vec<(String, String)> {
    let mut params = Vec::with_capacity(4);
    if !request.fields.is_empty() {
        params.push(("fields".to_string(), request.fields.join(",")));
    }
    if let Some(filter) = &request.filter {
        params.push(("query".to_string(), quoted(filter)));
    }
    params.push(("limit".to_string(), limit.to_string()));
    params.push(("offset".to_string(), offset.to_string()));
    params
}

fn quoted(filter: &Query) -> String {
    format!("\"{filter}\"")
}

#[async_trait]
impl MetadataClient for OctaneClient {
    async fn authenticate(&mut self, credentials: &Credentials, mode: ApiMode) -> Result<()> {
        let url = format!("{}/authentication/sign_in", self.server);
        debug!("Signing in to {} as {} ({mode})", self.server, credentials.client_id);

        let body = SignInRequest {
            client_id: &credentials.client_id,
            client_secret: credentials.secret(),
        };
        let response = with_mode_headers(self.http.post(&url), mode)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ConnectionFailed {
                server: self.server.clone(),
                source: Box::new(e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(Error::AuthenticationFailed {
                server: self.server.clone(),
                status: status.as_u16(),
                message,
            });
        }

        self.mode = mode;
        Ok(())
    }

    async fn sign_out(&mut self) -> Result<()> {
        let url = format!("{}/authentication/sign_out", self.server);
        self.send("authentication/sign_out", self.request(Method::POST, &url))
            .await?;
        self.mode = ApiMode::Default;
        debug!("Signed out of {}", self.server);
        Ok(())
    }

    async fn entity_types(&self) -> Result<Vec<EntityTypeDescriptor>> {
        let page: Page<EntityTypeDescriptor> = self.get_page("metadata/entities", &[]).await?;
        Ok(page.data)
    }

    async fn entity_type(&self, name: &str) -> Result<EntityTypeDescriptor> {
        let params = [("query".to_string(), quoted(&Query::eq("name", name)))];
        let page: Page<EntityTypeDescriptor> =
            self.get_page("metadata/entities", &params).await?;
        page.data
            .into_iter()
            .find(|entity| entity.name.as_str() == name)
            .ok_or_else(|| Error::ResourceNotFound {
                resource: format!("entity type '{name}'"),
            })
    }

    async fn fields(&self, entity: &str) -> Result<Vec<FieldDescriptor>> {
        let params = [("query".to_string(), quoted(&Query::eq("entity_name", entity)))];
        let page: Page<FieldDescriptor> = self.get_page("metadata/fields", &params).await?;
        Ok(page.data)
    }

    async fn query(&self, collection: &str, request: &QueryRequest) -> Result<Vec<EntityRecord>> {
        self.get_all(collection, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(trust_all_certs: bool) -> GeneratorConfig {
        GeneratorConfig::builder()
            .server("https://octane.example.com:8443/")
            .shared_space(1001)
            .workspace(2002)
            .client_id("id")
            .client_secret("secret")
            .trust_all_certs(trust_all_certs)
            .build()
            .unwrap()
    }

    #[test]
    fn test_workspace_url() {
        let client = OctaneClient::new(&config(false)).unwrap();
        assert_eq!(
            client.workspace_url("/metadata/fields"),
            "https://octane.example.com:8443/api/shared_spaces/1001/workspaces/2002/metadata/fields"
        );
    }

    #[test]
    fn test_client_builds_with_certificate_bypass() {
        let client = OctaneClient::new(&config(true)).unwrap().with_page_size(0);
        assert_eq!(client.page_size, 1);
    }

    #[test]
    fn test_tech_preview_headers() {
        let client = OctaneClient::new(&config(false)).unwrap();
        let url = "https://octane.example.com/authentication/sign_in";

        let request = with_mode_headers(client.http.post(url), ApiMode::TechnicalPreview)
            .build()
            .unwrap();
        assert_eq!(request.headers()[CLIENT_TYPE_HEADER], TECH_PREVIEW_CLIENT_TYPE);
        assert_eq!(request.headers()[TECH_PREVIEW_HEADER], "true");

        let request = with_mode_headers(client.http.post(url), ApiMode::Default)
            .build()
            .unwrap();
        assert!(request.headers().get(CLIENT_TYPE_HEADER).is_none());
        assert!(request.headers().get(TECH_PREVIEW_HEADER).is_none());
    }

    #[test]
    fn test_collection_params_quote_filter() {
        let request = QueryRequest::new()
            .fields(["id", "name"])
            .filter(Query::eq("activity_level", 0));
        let params = collection_params(&request, 500, 500);
        assert_eq!(
            params,
            vec![
                ("fields".to_string(), "id,name".to_string()),
                ("query".to_string(), "\"activity_level EQ 0\"".to_string()),
                ("limit".to_string(), "500".to_string()),
                ("offset".to_string(), "500".to_string()),
            ]
        );
    }

    #[test]
    fn test_collection_params_without_projection_or_filter() {
        let params = collection_params(&QueryRequest::new(), 0, 10);
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].0, "limit");
    }
}
