//! HTTP client for the provisioning API.

use std::time::Duration;

use cke_id::{ClusterId, NodePoolId, OrganizationId};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::debug;

use crate::error::ProvisionError;
use crate::types::{
    CkeCluster, CreateCkeClusterRequest, CreateTemplateRequest, NodePool, NodePoolScaleRequest,
    Template,
};

/// Upper bound for a single provisioning API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// API client for the provisioning service.
#[derive(Debug, Clone)]
pub struct ProvisionClient {
    client: reqwest::Client,
    base_url: String,
}

impl ProvisionClient {
    /// Create a client that authenticates every request with `token`.
    pub fn new(base_url: &str, token: &str) -> Result<Self, ProvisionError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ProvisionError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Templates of an organization.
    pub fn templates<'a>(&'a self, organization: &'a OrganizationId) -> Templates<'a> {
        Templates {
            client: self,
            organization,
        }
    }

    /// CKE clusters of an organization.
    pub fn cke_clusters<'a>(&'a self, organization: &'a OrganizationId) -> CkeClusters<'a> {
        CkeClusters {
            client: self,
            organization,
        }
    }

    /// Node pools of a cluster.
    pub fn node_pools<'a>(
        &'a self,
        organization: &'a OrganizationId,
        cluster: &'a ClusterId,
    ) -> NodePools<'a> {
        NodePools {
            client: self,
            organization,
            cluster,
        }
    }

    /// Build a URL for an endpoint.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProvisionError> {
        debug!(method = "GET", path, "Provisioning API request");
        let response = self.client.get(self.url(path)).send().await?;

        self.handle_response(path, response).await
    }

    async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ProvisionError> {
        debug!(method = "POST", path, "Provisioning API request");
        let response = self.client.post(self.url(path)).json(body).send().await?;

        self.handle_response(path, response).await
    }

    async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ProvisionError> {
        debug!(method = "PATCH", path, "Provisioning API request");
        let response = self.client.patch(self.url(path)).json(body).send().await?;

        self.handle_response(path, response).await
    }

    /// Handle a successful or error response.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ProvisionError> {
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            return Err(Self::api_error(status.as_u16(), &body));
        }

        serde_json::from_slice(&body).map_err(|source| ProvisionError::Decode {
            path: path.to_string(),
            source,
        })
    }

    /// Turn an error body into an API error, whatever shape it has.
    fn api_error(status: u16, body: &[u8]) -> ProvisionError {
        let message = serde_json::from_slice::<ApiErrorResponse>(body)
            .ok()
            .and_then(|e| e.message)
            .unwrap_or_else(|| {
                let text = String::from_utf8_lossy(body).trim().to_string();
                if text.is_empty() {
                    "Unknown error".to_string()
                } else {
                    text
                }
            });

        ProvisionError::api(status, message)
    }
}

/// API error response structure.
#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    #[serde(default)]
    message: Option<String>,
}

/// `/v3/organizations/{org}/templates`
#[derive(Debug, Clone, Copy)]
pub struct Templates<'a> {
    client: &'a ProvisionClient,
    organization: &'a OrganizationId,
}

impl Templates<'_> {
    pub async fn create(&self, request: &CreateTemplateRequest) -> Result<Template, ProvisionError> {
        let path = format!("/v3/organizations/{}/templates", self.organization);
        self.client.post(&path, request).await
    }
}

/// `/v3/organizations/{org}/cke` and `/v3/organizations/{org}/clusters`
#[derive(Debug, Clone, Copy)]
pub struct CkeClusters<'a> {
    client: &'a ProvisionClient,
    organization: &'a OrganizationId,
}

impl CkeClusters<'_> {
    pub async fn create(
        &self,
        request: &CreateCkeClusterRequest,
    ) -> Result<CkeCluster, ProvisionError> {
        let path = format!("/v3/organizations/{}/cke", self.organization);
        self.client.post(&path, request).await
    }

    pub async fn get(&self, id: &ClusterId) -> Result<CkeCluster, ProvisionError> {
        let path = format!("/v3/organizations/{}/clusters/{}", self.organization, id);
        self.client.get(&path).await
    }
}

/// `/v3/organizations/{org}/clusters/{cluster}/node-pools`
#[derive(Debug, Clone, Copy)]
pub struct NodePools<'a> {
    client: &'a ProvisionClient,
    organization: &'a OrganizationId,
    cluster: &'a ClusterId,
}

impl NodePools<'_> {
    fn base_path(&self) -> String {
        format!(
            "/v3/organizations/{}/clusters/{}/node-pools",
            self.organization, self.cluster
        )
    }

    pub async fn list(&self) -> Result<Vec<NodePool>, ProvisionError> {
        self.client.get(&self.base_path()).await
    }

    pub async fn get(&self, id: &NodePoolId) -> Result<NodePool, ProvisionError> {
        let path = format!("{}/{}", self.base_path(), id);
        self.client.get(&path).await
    }

    /// Request a new node count for a pool.
    pub async fn scale(
        &self,
        id: &NodePoolId,
        request: &NodePoolScaleRequest,
    ) -> Result<NodePool, ProvisionError> {
        let path = format!("{}/{}", self.base_path(), id);
        self.client.patch(&path, request).await
    }
}
