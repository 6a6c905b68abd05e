//! Common types for machine-sync: resource definitions, errors and utilities

#![deny(missing_docs)]

pub mod crd;
pub mod error;
pub mod field;
pub mod telemetry;

pub use error::{Aggregate, Error};
pub use field::{ErrorList, FieldError, FieldErrorType, Path};

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Label carrying the owning cluster name on Cluster API resources
pub const CAPI_CLUSTER_NAME_LABEL: &str = "cluster.x-k8s.io/cluster-name";

/// Label carrying the owning cluster name on Machine API resources
pub const MAPI_CLUSTER_NAME_LABEL: &str = "machine.openshift.io/cluster-api-cluster";

/// Annotation prefix for Cluster API pre-drain lifecycle hooks
pub const CAPI_PRE_DRAIN_HOOK_PREFIX: &str = "pre-drain.delete.hook.machine.cluster.x-k8s.io/";

/// Annotation prefix for Cluster API pre-terminate lifecycle hooks
pub const CAPI_PRE_TERMINATE_HOOK_PREFIX: &str =
    "pre-terminate.delete.hook.machine.cluster.x-k8s.io/";
