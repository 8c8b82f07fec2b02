//! Error types for the library

/// Errors raised while encoding or decoding wire models
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to decode debug filter: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode debug filter: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("unknown debug filter field '{0}'")]
    UnknownField(String),
}

/// Errors raised by the service annotation migration
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    #[error("no kubeconfig file given")]
    NoKubeconfig,

    #[error("failed to load kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("failed to create Kubernetes client: {0}")]
    Client(#[source] kube::Error),

    #[error("failed to list services: {0}")]
    List(#[source] kube::Error),

    #[error("failed to annotate service {namespace}/{name}: {source}")]
    Annotate {
        namespace: String,
        name: String,
        #[source]
        source: kube::Error,
    },
}
