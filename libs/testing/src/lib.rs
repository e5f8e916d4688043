//! Test doubles for the two upstream APIs the suite drives.
//!
//! - [`FakeProvisionApi`] serves templates, CKE clusters and node pools.
//! - [`FakeKubeApi`] serves pod and node lists the way an API server
//!   behind the Containership proxy would.
//!
//! Status transitions are scripted with [`Sequence`]: each request gets the
//! next response, and the last one repeats forever.

mod kube;
mod provision;
mod sequence;

pub use kube::{node_json, FakeKubeApi};
pub use provision::{cluster_json, node_pool_json, FakeProvisionApi};
pub use sequence::Sequence;

/// Template create request as found on disk.
pub fn template_request_json() -> serde_json::Value {
    serde_json::json!({
        "provider_name": "digital_ocean",
        "description": "cke e2e template",
        "engine": "containership_kubernetes_engine",
        "configuration": {
            "resource": {
                "digitalocean_droplet": {}
            },
            "variable": {
                "np-master": {
                    "default": {
                        "name": "masters",
                        "count": 1,
                        "kubernetes_mode": "master",
                        "kubernetes_version": "1.11.1"
                    }
                },
                "np-worker": {
                    "default": {
                        "name": "workers",
                        "count": 2,
                        "kubernetes_mode": "worker",
                        "kubernetes_version": "1.11.1"
                    }
                }
            }
        }
    })
}

/// Cluster create request as found on disk.
pub fn cluster_request_json() -> serde_json::Value {
    serde_json::json!({
        "provider_id": "prv-digital-ocean",
        "name": "cke-e2e",
        "environment": "test",
        "labels": { "owner": "e2e" }
    })
}
