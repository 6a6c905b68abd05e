//! Cluster API Machine and MachineSet (`cluster.x-k8s.io/v1beta1`)
//!
//! Only the fields the Machine API conversion reads are modelled; unknown
//! fields are ignored on deserialization.
//!
//! Reference: <https://github.com/kubernetes-sigs/cluster-api>

use std::collections::BTreeMap;

use k8s_openapi::api::core::v1::ObjectReference;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::LabelSelector;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Cluster API group/version for Machine and MachineSet
pub const CAPI_API_VERSION: &str = "cluster.x-k8s.io/v1beta1";

/// Desired state of a Cluster API Machine
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "cluster.x-k8s.io",
    version = "v1beta1",
    kind = "Machine",
    plural = "machines",
    namespaced,
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct MachineSpec {
    /// Name of the Cluster this Machine belongs to
    #[serde(default)]
    pub cluster_name: String,

    /// Bootstrap configuration (user data source)
    #[serde(default)]
    pub bootstrap: Bootstrap,

    /// Reference to the provider-specific infrastructure machine
    #[serde(default)]
    pub infrastructure_ref: ObjectReference,

    /// Kubernetes version of the node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Cloud provider ID of the instance backing this Machine
    #[serde(rename = "providerID", default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,

    /// Failure domain the Machine should be placed in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_domain: Option<String>,

    /// Total time to drain the node before deletion (e.g. "10m")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_drain_timeout: Option<String>,

    /// Total time to wait for volumes to detach before deletion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_volume_detach_timeout: Option<String>,

    /// Time to wait for the Node to be deleted after Machine deletion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_deletion_timeout: Option<String>,
}

/// Bootstrap configuration for a Machine
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bootstrap {
    /// Reference to the bootstrap provider config (e.g. KubeadmConfig)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_ref: Option<ObjectReference>,

    /// Name of the Secret holding the rendered bootstrap data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_secret_name: Option<String>,
}

/// Desired state of a Cluster API MachineSet
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "cluster.x-k8s.io",
    version = "v1beta1",
    kind = "MachineSet",
    plural = "machinesets",
    namespaced,
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct MachineSetSpec {
    /// Name of the Cluster this MachineSet belongs to
    #[serde(default)]
    pub cluster_name: String,

    /// Desired number of Machines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Seconds a new Machine must be ready before it counts as available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_ready_seconds: Option<i32>,

    /// Which Machines to delete first when scaling down ("Random", "Newest", "Oldest")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_policy: Option<String>,

    /// Label query over Machines that belong to this set
    #[serde(default)]
    pub selector: LabelSelector,

    /// Template for Machines created by this set
    #[serde(default)]
    pub template: MachineTemplateSpec,
}

/// Machine template embedded in a MachineSet
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MachineTemplateSpec {
    /// Labels and annotations stamped on created Machines
    #[serde(default)]
    pub metadata: TemplateMetadata,

    /// Spec of created Machines
    #[serde(default)]
    pub spec: MachineSpec,
}

/// The subset of object metadata a Cluster API template may carry
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemplateMetadata {
    /// Labels for created objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    /// Annotations for created objects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<BTreeMap<String, String>>,
}
