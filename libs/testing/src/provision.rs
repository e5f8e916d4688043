use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::Sequence;

/// Cluster body with the given status.
pub fn cluster_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "status": { "type": status }
    })
}

/// Node pool body.
pub fn node_pool_json(id: &str, mode: &str, count: i32, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("{mode}-pool"),
        "count": count,
        "kubernetes_mode": mode,
        "kubernetes_version": "1.12.1",
        "status": { "type": status }
    })
}

/// Fake provisioning service for one organization.
pub struct FakeProvisionApi {
    server: MockServer,
    org: String,
}

impl FakeProvisionApi {
    pub async fn start(org: &str) -> Self {
        Self {
            server: MockServer::start().await,
            org: org.to_string(),
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    fn org_path(&self, rest: &str) -> String {
        format!("/v3/organizations/{}{}", self.org, rest)
    }

    /// Accept exactly one template create and answer with `template_id`.
    pub async fn expect_template_create(&self, template_id: &str) {
        Mock::given(method("POST"))
            .and(path(self.org_path("/templates")))
            .respond_with(
                ResponseTemplate::new(201)
                    .set_body_json(serde_json::json!({ "id": template_id })),
            )
            .expect(1)
            .named("create template")
            .mount(&self.server)
            .await;
    }

    /// Accept exactly one cluster create and answer with `cluster_id`.
    pub async fn expect_cluster_create(&self, cluster_id: &str) {
        Mock::given(method("POST"))
            .and(path(self.org_path("/cke")))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(cluster_json(cluster_id, "PROVISIONING")),
            )
            .expect(1)
            .named("create cke cluster")
            .mount(&self.server)
            .await;
    }

    /// Serve the cluster with the given status progression.
    pub async fn serve_cluster_statuses(&self, cluster_id: &str, statuses: &[&str]) {
        let bodies = statuses.iter().map(|s| cluster_json(cluster_id, s));
        Mock::given(method("GET"))
            .and(path(self.org_path(&format!("/clusters/{cluster_id}"))))
            .respond_with(Sequence::json(bodies))
            .named("get cluster")
            .mount(&self.server)
            .await;
    }

    /// Serve successive node pool listings.
    pub async fn serve_node_pool_lists(&self, cluster_id: &str, lists: Vec<serde_json::Value>) {
        Mock::given(method("GET"))
            .and(path(self.org_path(&format!("/clusters/{cluster_id}/node-pools"))))
            .respond_with(Sequence::json(lists))
            .named("list node pools")
            .mount(&self.server)
            .await;
    }

    /// Serve a single node pool with the given bodies in order.
    pub async fn serve_node_pool(
        &self,
        cluster_id: &str,
        pool_id: &str,
        bodies: Vec<serde_json::Value>,
    ) {
        Mock::given(method("GET"))
            .and(path(
                self.org_path(&format!("/clusters/{cluster_id}/node-pools/{pool_id}")),
            ))
            .respond_with(Sequence::json(bodies))
            .named("get node pool")
            .mount(&self.server)
            .await;
    }

    /// Accept exactly one scale of `pool_id` to `count`.
    pub async fn expect_scale(&self, cluster_id: &str, pool_id: &str, count: i32) {
        Mock::given(method("PATCH"))
            .and(path(
                self.org_path(&format!("/clusters/{cluster_id}/node-pools/{pool_id}")),
            ))
            .and(body_json(serde_json::json!({ "count": count })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(node_pool_json(pool_id, "worker", count, "UPDATING")),
            )
            .expect(1)
            .named("scale node pool")
            .mount(&self.server)
            .await;
    }

    /// Bodies of every request received so far.
    pub async fn received_bodies(&self, http_method: &str, suffix: &str) -> Vec<serde_json::Value> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == http_method && r.url.path().ends_with(suffix))
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect()
    }
}
