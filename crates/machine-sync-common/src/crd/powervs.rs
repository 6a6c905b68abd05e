//! IBM Cloud PowerVS infrastructure resources (CAPIBM, `infrastructure.cluster.x-k8s.io/v1beta2`)
//!
//! Reference: <https://github.com/kubernetes-sigs/cluster-api-provider-ibmcloud>

use k8s_openapi::api::core::v1::LocalObjectReference;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use kube::CustomResource;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// CAPIBM infrastructure group/version
pub const POWERVS_INFRASTRUCTURE_API_VERSION: &str = "infrastructure.cluster.x-k8s.io/v1beta2";

/// Reference to a PowerVS resource by ID, name or regular expression
///
/// The API allows any combination of the three to be set; the conversion
/// resolves them in the order ID, Name, RegEx.
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct IbmPowerVsResourceReference {
    /// Unique identifier of the resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Name of the resource
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Regular expression matching the resource name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

impl IbmPowerVsResourceReference {
    /// Reference by ID
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Reference by name
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Reference by regular expression
    pub fn by_regex(regex: impl Into<String>) -> Self {
        Self {
            regex: Some(regex.into()),
            ..Default::default()
        }
    }
}

/// Desired state of an IBMPowerVSMachine
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta2",
    kind = "IBMPowerVSMachine",
    root = "IbmPowerVsMachine",
    plural = "ibmpowervsmachines",
    namespaced,
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct IbmPowerVsMachineSpec {
    /// Legacy service instance ID; takes precedence over `serviceInstance`
    #[serde(rename = "serviceInstanceID", default, skip_serializing_if = "String::is_empty")]
    pub service_instance_id: String,

    /// PowerVS service instance hosting the machine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_instance: Option<IbmPowerVsResourceReference>,

    /// Name of the SSH key pair injected into the instance
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ssh_key: String,

    /// Boot image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<IbmPowerVsResourceReference>,

    /// Reference to an IBMPowerVSImage object by name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<LocalObjectReference>,

    /// System type (e.g. "s922", "e980")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub system_type: String,

    /// Processor type ("Dedicated", "Shared", "Capped")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub processor_type: String,

    /// Number of processors, integer or fractional string (e.g. "0.5")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processors: Option<IntOrString>,

    /// Memory in GiB
    #[serde(rename = "memoryGiB", default, skip_serializing_if = "is_zero")]
    pub memory_gib: i32,

    /// Network the instance is attached to
    #[serde(default)]
    pub network: IbmPowerVsResourceReference,

    /// Cloud provider ID of the instance
    #[serde(rename = "providerID", default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

/// Desired state of an IBMPowerVSMachineTemplate
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta2",
    kind = "IBMPowerVSMachineTemplate",
    root = "IbmPowerVsMachineTemplate",
    plural = "ibmpowervsmachinetemplates",
    namespaced,
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct IbmPowerVsMachineTemplateSpec {
    /// Template for machines created from this resource
    #[serde(default)]
    pub template: IbmPowerVsMachineTemplateResource,
}

/// Machine template body
#[derive(Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
pub struct IbmPowerVsMachineTemplateResource {
    /// Spec of the machines created from this template
    #[serde(default)]
    pub spec: IbmPowerVsMachineSpec,
}

/// Desired state of an IBMPowerVSCluster
///
/// The Machine conversion only requires the cluster to be present; its
/// fields are not mapped into the provider config.
#[derive(CustomResource, Clone, Debug, Default, Deserialize, Serialize, JsonSchema, PartialEq)]
#[kube(
    group = "infrastructure.cluster.x-k8s.io",
    version = "v1beta2",
    kind = "IBMPowerVSCluster",
    root = "IbmPowerVsCluster",
    plural = "ibmpowervsclusters",
    namespaced,
    derive = "PartialEq",
    derive = "Default"
)]
#[serde(rename_all = "camelCase")]
pub struct IbmPowerVsClusterSpec {
    /// Legacy service instance ID
    #[serde(rename = "serviceInstanceID", default, skip_serializing_if = "String::is_empty")]
    pub service_instance_id: String,

    /// PowerVS service instance for the cluster
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_instance: Option<IbmPowerVsResourceReference>,

    /// PowerVS zone (e.g. "dal10")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    /// Cluster network
    #[serde(default)]
    pub network: IbmPowerVsResourceReference,

    /// IBM Cloud resource group
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_group: Option<IbmPowerVsResourceReference>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn machine_spec_uses_capibm_field_names() {
        let spec = IbmPowerVsMachineSpec {
            service_instance_id: "si-legacy".to_string(),
            ssh_key: "my-key".to_string(),
            memory_gib: 32,
            processors: Some(IntOrString::String("0.5".to_string())),
            network: IbmPowerVsResourceReference::by_name("private-net"),
            ..Default::default()
        };
        let value = serde_json::to_value(&spec).expect("spec serialization should succeed");
        assert_eq!(value["serviceInstanceID"], "si-legacy");
        assert_eq!(value["sshKey"], "my-key");
        assert_eq!(value["memoryGiB"], 32);
        assert_eq!(value["processors"], "0.5");
        assert_eq!(value["network"], serde_json::json!({"name": "private-net"}));
        assert!(value.get("image").is_none());
    }

    #[test]
    fn resources_serialize_with_capibm_type_meta() {
        let machine = IbmPowerVsMachine::new("worker-0", IbmPowerVsMachineSpec::default());
        let value = serde_json::to_value(&machine).expect("machine serialization should succeed");
        assert_eq!(value["apiVersion"], POWERVS_INFRASTRUCTURE_API_VERSION);
        assert_eq!(value["kind"], "IBMPowerVSMachine");

        let template =
            IbmPowerVsMachineTemplate::new("workers", IbmPowerVsMachineTemplateSpec::default());
        let value =
            serde_json::to_value(&template).expect("template serialization should succeed");
        assert_eq!(value["kind"], "IBMPowerVSMachineTemplate");

        let cluster = IbmPowerVsCluster::new("prod", IbmPowerVsClusterSpec::default());
        let value = serde_json::to_value(&cluster).expect("cluster serialization should succeed");
        assert_eq!(value["kind"], "IBMPowerVSCluster");
    }

    #[test]
    fn template_deserializes_nested_spec() {
        let yaml = r#"
apiVersion: infrastructure.cluster.x-k8s.io/v1beta2
kind: IBMPowerVSMachineTemplate
metadata:
  name: workers
spec:
  template:
    spec:
      serviceInstance:
        id: si-123
      imageRef:
        name: rhel-image
      network:
        regex: "^capi-net-.*$"
      processors: 2
      memoryGiB: 16
"#;
        let template: IbmPowerVsMachineTemplate =
            serde_yaml::from_str(yaml).expect("template deserialization should succeed");
        let spec = &template.spec.template.spec;
        assert_eq!(
            spec.service_instance,
            Some(IbmPowerVsResourceReference::by_id("si-123"))
        );
        assert_eq!(
            spec.image_ref.as_ref().map(|r| r.name.as_str()),
            Some("rhel-image")
        );
        assert_eq!(spec.network, IbmPowerVsResourceReference::by_regex("^capi-net-.*$"));
        assert_eq!(spec.processors, Some(IntOrString::Int(2)));
        assert_eq!(spec.memory_gib, 16);
    }
}
