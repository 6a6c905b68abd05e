//! Machine API Machine and MachineSet (`machine.openshift.io/v1beta1`)
//!
//! Machine API resources carry their platform configuration as an opaque
//! [`RawExtension`] in `spec.providerSpec.value`. The PowerVS payload type
//! lives in [`powervs`].

mod powervs;
mod raw_extension;

pub use powervs::{
    LoadBalancerReference, PowerVsMachineProviderConfig, PowerVsResource, PowerVsResourceType,
    PowerVsSecretReference, MAPI_PROVIDER_CONFIG_API_VERSION, POWERVS_PROVIDER_CONFIG_KIND,
};
pub use raw_extension::RawExtension;

use k8s_openapi::api::core::v1::Taint;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Machine API group/version for Machine and MachineSet
pub const MAPI_API_VERSION: &str = "machine.openshift.io/v1beta1";

/// Desired state of a Machine API Machine
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "machine.openshift.io",
    version = "v1beta1",
    kind = "Machine",
    plural = "machines",
    namespaced,
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct MachineSpec {
    /// Labels and annotations propagated to the Node
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// Hooks that block deletion until their owners remove them
    #[serde(default)]
    pub lifecycle_hooks: LifecycleHooks,

    /// Taints registered on the Node
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub taints: Vec<Taint>,

    /// Platform-specific configuration
    #[serde(default)]
    pub provider_spec: ProviderSpec,

    /// Cloud provider ID of the instance backing this Machine
    #[serde(rename = "providerID", default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

/// Lifecycle hooks of a Machine
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleHooks {
    /// Hooks blocking the node drain
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_drain: Vec<LifecycleHook>,

    /// Hooks blocking instance termination
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pre_terminate: Vec<LifecycleHook>,
}

/// A single named lifecycle hook and the controller owning it
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct LifecycleHook {
    /// Unique name of the hook
    pub name: String,

    /// Controller or actor responsible for the hook
    pub owner: String,
}

/// Opaque, platform-determined provider configuration slot
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct ProviderSpec {
    /// Serialized provider config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<RawExtension>,
}

/// Desired state of a Machine API MachineSet
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "machine.openshift.io",
    version = "v1beta1",
    kind = "MachineSet",
    plural = "machinesets",
    namespaced,
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct MachineSetSpec {
    /// Desired number of Machines
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<i32>,

    /// Seconds a new Machine must be ready before it counts as available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_ready_seconds: Option<i32>,

    /// Which Machines to delete first when scaling down
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
    /// Metadata stamped on created Machines
    #[serde(default)]
    pub metadata: ObjectMeta,

    /// Spec of created Machines
    #[serde(default)]
    pub spec: MachineSpec,
}
