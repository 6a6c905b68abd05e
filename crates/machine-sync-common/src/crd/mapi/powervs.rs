//! Machine API PowerVS provider config (`machine.openshift.io/v1`)
//!
//! This is the payload a Machine API PowerVS Machine carries in
//! `spec.providerSpec.value`.

use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;
use serde::{Deserialize, Serialize};

/// Kind stamped on every PowerVS provider config
pub const POWERVS_PROVIDER_CONFIG_KIND: &str = "PowerVSMachineProviderConfig";

/// API version stamped on every PowerVS provider config
pub const MAPI_PROVIDER_CONFIG_API_VERSION: &str = "machine.openshift.io/v1";

/// Discriminant of a [`PowerVsResource`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerVsResourceType {
    /// Identified by ID
    Id,
    /// Identified by name
    Name,
    /// Identified by a regular expression over names
    RegEx,
}

/// Reference to a PowerVS resource, identified in exactly one way
///
/// Serialized in the Machine API shape, e.g. `{"type":"ID","id":"si-123"}`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type")]
pub enum PowerVsResource {
    /// Resource ID
    #[serde(rename = "ID")]
    Id {
        /// The ID
        id: String,
    },
    /// Resource name
    #[serde(rename = "Name")]
    Name {
        /// The name
        name: String,
    },
    /// Regular expression matching the resource name
    #[serde(rename = "RegEx")]
    RegEx {
        /// The expression
        regex: String,
    },
}

impl PowerVsResource {
    /// Reference by ID
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id { id: id.into() }
    }

    /// Reference by name
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name { name: name.into() }
    }

    /// Reference by regular expression
    pub fn regex(regex: impl Into<String>) -> Self {
        Self::RegEx {
            regex: regex.into(),
        }
    }

    /// Which identification method this reference uses
    pub fn resource_type(&self) -> PowerVsResourceType {
        match self {
            Self::Id { .. } => PowerVsResourceType::Id,
            Self::Name { .. } => PowerVsResourceType::Name,
            Self::RegEx { .. } => PowerVsResourceType::RegEx,
        }
    }
}

/// Reference to a Secret in the Machine's namespace
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PowerVsSecretReference {
    /// Name of the Secret
    pub name: String,
}

/// Load balancer a PowerVS machine is registered with
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct LoadBalancerReference {
    /// Name of the load balancer
    pub name: String,

    /// Load balancer type (e.g. "Application")
    #[serde(rename = "type")]
    pub lb_type: String,
}

/// Machine API provider config for a PowerVS machine
///
/// Reference fields are `None` only in best-effort output produced alongside
/// conversion errors; a successfully converted config has all three set.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PowerVsMachineProviderConfig {
    /// Always [`POWERVS_PROVIDER_CONFIG_KIND`]
    pub kind: String,

    /// Always [`MAPI_PROVIDER_CONFIG_API_VERSION`]
    pub api_version: String,

    /// Secret holding the instance user data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data_secret: Option<PowerVsSecretReference>,

    /// Secret holding IBM Cloud credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials_secret: Option<PowerVsSecretReference>,

    /// PowerVS service instance hosting the machine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_instance: Option<PowerVsResource>,

    /// Boot image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PowerVsResource>,

    /// Network the instance is attached to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<PowerVsResource>,

    /// Name of the SSH key pair
    #[serde(default)]
    pub key_pair_name: String,

    /// System type (e.g. "s922")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub system_type: String,

    /// Processor type ("Dedicated", "Shared", "Capped")
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub processor_type: String,

    /// Number of processors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processors: Option<IntOrString>,

    /// Memory in GiB
    #[serde(rename = "memoryGiB", default, skip_serializing_if = "is_zero")]
    pub memory_gib: i32,

    /// Load balancers the machine is registered with
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub load_balancers: Vec<LoadBalancerReference>,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

impl Default for PowerVsMachineProviderConfig {
    /// An empty config, already stamped with its kind and API version
    fn default() -> Self {
        Self {
            kind: POWERVS_PROVIDER_CONFIG_KIND.to_string(),
            api_version: MAPI_PROVIDER_CONFIG_API_VERSION.to_string(),
            user_data_secret: None,
            credentials_secret: None,
            service_instance: None,
            image: None,
            network: None,
            key_pair_name: String::new(),
            system_type: String::new(),
            processor_type: String::new(),
            processors: None,
            memory_gib: 0,
            load_balancers: Vec::new(),
        }
    }
}
