//! Request and response bodies of the provisioning API.

use std::collections::BTreeMap;

use cke_id::{ClusterId, NodePoolId, TemplateId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Status tag reported by a cluster or node pool.
///
/// Kept as the raw string so that states the suite doesn't know about can
/// still be reported verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceStatus(String);

impl ResourceStatus {
    pub const PROVISIONING: &'static str = "PROVISIONING";
    pub const RUNNING: &'static str = "RUNNING";
    pub const UPDATING: &'static str = "UPDATING";

    pub fn new(status: impl Into<String>) -> Self {
        Self(status.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<&str> for ResourceStatus {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// `status` object attached to clusters and node pools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    #[serde(rename = "type")]
    pub status_type: ResourceStatus,
}

impl Status {
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status_type: ResourceStatus::new(status),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Body of `POST /v3/organizations/{org}/templates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine: Option<String>,

    #[serde(default)]
    pub configuration: TemplateConfiguration,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreateTemplateRequest {
    /// Pin every node pool variable to the given Kubernetes version.
    pub fn set_kubernetes_version(&mut self, version: &str) {
        for variable in self.configuration.variable.values_mut() {
            variable.default.kubernetes_version = Some(version.to_string());
        }
    }
}

/// Terraform-style template configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfiguration {
    /// Node pool variables keyed by variable name.
    #[serde(default)]
    pub variable: BTreeMap<String, TemplateVariable>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateVariable {
    #[serde(default)]
    pub default: TemplateNodePool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Default values of a node pool declared by a template.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateNodePool {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_version: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A created template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: TemplateId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// CKE clusters
// =============================================================================

/// Body of `POST /v3/organizations/{org}/cke`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateCkeClusterRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_id: Option<TemplateId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A CKE cluster as reported by the provisioning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CkeCluster {
    pub id: ClusterId,

    pub status: Status,
}

// =============================================================================
// Node pools
// =============================================================================

/// Role of the machines in a node pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KubernetesMode {
    Master,
    Worker,
    #[serde(other)]
    Other,
}

/// A node pool of a cluster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodePool {
    pub id: NodePoolId,

    #[serde(default)]
    pub name: String,

    pub count: i32,

    pub kubernetes_mode: KubernetesMode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes_version: Option<String>,

    pub status: Status,
}

impl NodePool {
    pub fn is_worker(&self) -> bool {
        self.kubernetes_mode == KubernetesMode::Worker
    }
}

/// Body of the node pool scale request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePoolScaleRequest {
    pub count: i32,
}
