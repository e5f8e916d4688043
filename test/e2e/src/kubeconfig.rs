//! Kubeconfig generation for clusters reached through the Containership proxy.

use std::fs;
use std::path::Path;

use cke_id::{ClusterId, OrganizationId};
use kube::config::Kubeconfig;

use crate::error::E2eError;

/// Name of the cluster, user and context entries in the generated file.
pub const CLUSTER_NAME: &str = "cs-e2e-test-cluster";
pub const USER_NAME: &str = "cs-e2e-test-user";
pub const CONTEXT_NAME: &str = "cs-e2e-test-ctx";

/// Kubernetes API URL of a cluster behind the proxy.
pub fn proxy_server_url(
    proxy_base_url: &str,
    organization_id: &OrganizationId,
    cluster_id: &ClusterId,
) -> String {
    format!(
        "{}/v3/organizations/{}/clusters/{}/k8sapi/proxy",
        proxy_base_url.trim_end_matches('/'),
        organization_id,
        cluster_id
    )
}

/// Render the kubeconfig for a cluster.
pub fn render(
    proxy_base_url: &str,
    organization_id: &OrganizationId,
    cluster_id: &ClusterId,
    auth_token: &str,
) -> String {
    let server = proxy_server_url(proxy_base_url, organization_id, cluster_id);

    format!(
        r#"
apiVersion: v1
clusters:
- cluster:
    server: {server}
  name: {CLUSTER_NAME}
contexts:
- context:
    cluster: {CLUSTER_NAME}
    user: {USER_NAME}
  name: {CONTEXT_NAME}
current-context: {CONTEXT_NAME}
kind: Config
preferences: {{}}
users:
- name: {USER_NAME}
  user:
    token: {auth_token}
"#
    )
}

/// Write a rendered kubeconfig, readable only by the owner.
pub fn write(path: &Path, contents: &str) -> Result<(), E2eError> {
    let io_err = |source| E2eError::Io {
        operation: "writing kubeconfig",
        path: path.to_path_buf(),
        source,
    };

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(io_err)?;
    }

    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .map_err(io_err)?;
        // `mode` only applies on create; tighten a pre-existing file too.
        file.set_permissions(fs::Permissions::from_mode(0o600))
            .map_err(io_err)?;
        file.write_all(contents.as_bytes()).map_err(io_err)?;
    }

    #[cfg(not(unix))]
    {
        fs::write(path, contents).map_err(io_err)?;
    }

    Ok(())
}

/// Load a kubeconfig file.
pub fn load(path: &Path) -> Result<Kubeconfig, E2eError> {
    Kubeconfig::read_from(path).map_err(|e| E2eError::Kubeconfig {
        path: path.to_path_buf(),
        message: format!("failed to read kubeconfig: {e}"),
    })
}

/// Server URL of the current context.
///
/// `path` is only used to label errors.
pub fn current_server<'a>(path: &Path, config: &'a Kubeconfig) -> Result<&'a str, E2eError> {
    let invalid = |message: String| E2eError::Kubeconfig {
        path: path.to_path_buf(),
        message,
    };

    let context_name = config
        .current_context
        .as_deref()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| invalid("no current-context".to_string()))?;
    let context = config
        .contexts
        .iter()
        .find(|c| c.name == context_name)
        .and_then(|c| c.context.as_ref())
        .ok_or_else(|| invalid(format!("context {context_name:?} not found")))?;
    let cluster = config
        .clusters
        .iter()
        .find(|c| c.name == context.cluster)
        .and_then(|c| c.cluster.as_ref())
        .ok_or_else(|| invalid(format!("cluster {:?} not found", context.cluster)))?;

    cluster
        .server
        .as_deref()
        .ok_or_else(|| invalid(format!("cluster {:?} has no server", context.cluster)))
}

/// Cluster ID embedded in a proxy server URL.
///
/// Expects `.../organizations/{org}/clusters/{cluster}/k8sapi/proxy`.
pub fn cluster_id_from_server(server: &str) -> Option<ClusterId> {
    let mut segments = server.split('/').skip_while(|s| *s != "clusters");
    segments.next()?;
    segments.next().and_then(|id| ClusterId::parse(id).ok())
}

/// Cluster ID of the cluster the kubeconfig's current context points at.
pub fn cluster_id_from_kubeconfig(path: &Path, config: &Kubeconfig) -> Result<ClusterId, E2eError> {
    let server = current_server(path, config)?;
    cluster_id_from_server(server).ok_or_else(|| E2eError::Kubeconfig {
        path: path.to_path_buf(),
        message: format!("server {server:?} is not a Containership proxy URL"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (OrganizationId, ClusterId) {
        (
            OrganizationId::parse("org1").unwrap(),
            ClusterId::parse("clu2").unwrap(),
        )
    }

    #[test]
    fn test_render_contains_proxy_url_and_token() {
        let (org, cluster) = ids();
        let rendered = render("https://stage-proxy.containership.io", &org, &cluster, "tok3");

        assert!(rendered.contains(
            "https://stage-proxy.containership.io/v3/organizations/org1/clusters/clu2/k8sapi/proxy"
        ));

        let doc: serde_yaml::Value = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(
            doc["clusters"][0]["cluster"]["server"].as_str(),
            Some("https://stage-proxy.containership.io/v3/organizations/org1/clusters/clu2/k8sapi/proxy")
        );
        assert_eq!(doc["users"][0]["name"].as_str(), Some(USER_NAME));
        assert_eq!(doc["users"][0]["user"]["token"].as_str(), Some("tok3"));
        assert_eq!(doc["current-context"].as_str(), Some(CONTEXT_NAME));
        assert_eq!(doc["contexts"][0]["context"]["cluster"].as_str(), Some(CLUSTER_NAME));
    }

    #[test]
    fn test_render_is_valid_kubeconfig() {
        let (org, cluster) = ids();
        let rendered = render("https://stage-proxy.containership.io/", &org, &cluster, "tok3");

        let kubeconfig = kube::config::Kubeconfig::from_yaml(&rendered).unwrap();
        assert_eq!(kubeconfig.current_context.as_deref(), Some(CONTEXT_NAME));
        assert_eq!(kubeconfig.clusters.len(), 1);
        assert_eq!(kubeconfig.auth_infos.len(), 1);
    }

    #[test]
    fn test_write_then_read_back_cluster_id() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("kubeconfig");
        let (org, cluster) = ids();

        write(&path, &render("http://127.0.0.1:8443", &org, &cluster, "tok3")).unwrap();

        let config = load(&path).unwrap();
        assert_eq!(cluster_id_from_kubeconfig(&path, &config).unwrap(), cluster);

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[test]
    fn test_cluster_id_from_foreign_server_is_none() {
        assert!(cluster_id_from_server("https://10.0.0.1:6443").is_none());
        assert!(cluster_id_from_server("https://proxy/v3/organizations/o/clusters/").is_none());
        assert_eq!(
            cluster_id_from_server("https://proxy/v3/organizations/o/clusters/abc/k8sapi/proxy")
                .unwrap()
                .as_str(),
            "abc"
        );
    }

    #[test]
    fn test_missing_current_context_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kubeconfig");
        fs::write(&path, "apiVersion: v1\nkind: Config\nclusters: []\n").unwrap();

        let config = load(&path).unwrap();
        let err = cluster_id_from_kubeconfig(&path, &config).unwrap_err();
        assert!(err.to_string().contains("no current-context"));
    }

    #[test]
    fn test_dangling_context_is_error() {
        let config = Kubeconfig::from_yaml(
            "apiVersion: v1\n\
             kind: Config\n\
             clusters: []\n\
             contexts:\n\
             - name: ctx\n  context:\n    cluster: gone\n    user: u\n\
             current-context: ctx\n",
        )
        .unwrap();

        let err = current_server(Path::new("kubeconfig"), &config).unwrap_err();
        assert!(err.to_string().contains("cluster \"gone\" not found"));
    }

    #[test]
    fn test_missing_file_is_kubeconfig_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&dir.path().join("absent")).unwrap_err();

        assert!(matches!(err, E2eError::Kubeconfig { .. }));
    }
}
