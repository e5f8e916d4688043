use wiremock::matchers::{method, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::Sequence;

/// Node object with a single `Ready` condition.
pub fn node_json(name: &str, ready: bool) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": "Node",
        "metadata": { "name": name },
        "status": {
            "conditions": [
                { "type": "MemoryPressure", "status": "False" },
                { "type": "Ready", "status": if ready { "True" } else { "False" } }
            ]
        }
    })
}

fn list_json(kind: &str, items: Vec<serde_json::Value>) -> serde_json::Value {
    serde_json::json!({
        "apiVersion": "v1",
        "kind": kind,
        "metadata": { "resourceVersion": "1" },
        "items": items
    })
}

/// A `metav1.Status` failure body, as the API server sends it.
fn status_response(code: u16, reason: &str) -> ResponseTemplate {
    ResponseTemplate::new(code).set_body_json(serde_json::json!({
        "apiVersion": "v1",
        "kind": "Status",
        "metadata": {},
        "status": "Failure",
        "message": reason,
        "reason": reason,
        "code": code
    }))
}

/// Fake Kubernetes API server.
///
/// Routes match on the path suffix, so the fake works both at the root and
/// behind the `/v3/organizations/{org}/clusters/{cluster}/k8sapi/proxy`
/// prefix.
pub struct FakeKubeApi {
    server: MockServer,
}

impl FakeKubeApi {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    /// Answer pod listings in `default` with the given status codes first,
    /// then with an empty list.
    pub async fn serve_pods_after_failures(&self, failures: &[u16]) {
        let mut responses: Vec<ResponseTemplate> = failures
            .iter()
            .map(|code| status_response(*code, reason_for(*code)))
            .collect();
        responses.push(ResponseTemplate::new(200).set_body_json(list_json("PodList", vec![])));

        Mock::given(method("GET"))
            .and(path_regex(r"/api/v1/namespaces/default/pods$"))
            .respond_with(Sequence::new(responses))
            .named("list pods")
            .mount(&self.server)
            .await;
    }

    /// Answer pod listings with a permanent failure.
    pub async fn serve_pods_failing(&self, code: u16) {
        Mock::given(method("GET"))
            .and(path_regex(r"/api/v1/namespaces/default/pods$"))
            .respond_with(status_response(code, reason_for(code)))
            .named("list pods (failing)")
            .mount(&self.server)
            .await;
    }

    /// Serve successive node listings.
    pub async fn serve_node_lists(&self, lists: Vec<Vec<serde_json::Value>>) {
        let bodies = lists.into_iter().map(|items| list_json("NodeList", items));
        Mock::given(method("GET"))
            .and(path_regex(r"/api/v1/nodes$"))
            .respond_with(Sequence::json(bodies))
            .named("list nodes")
            .mount(&self.server)
            .await;
    }
}

fn reason_for(code: u16) -> &'static str {
    match code {
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "NotFound",
        429 => "TooManyRequests",
        500 => "InternalError",
        503 => "ServiceUnavailable",
        _ => "Unknown",
    }
}
