//! Cluster API to Machine API conversion
//!
//! Each infrastructure platform implements [`ProviderSpecMapper`], which turns
//! the platform's infrastructure machine into a Machine API provider config.
//! The assemblers in this module are platform independent: they run the
//! mapper, the generic metadata conversion and the payload encoder, collect
//! every error along the way and return either a complete Machine API object
//! or one aggregate error.
//!
//! # Example
//!
//! ```ignore
//! use machine_sync_conversion::{MachineAndInfrastructureMachine, PowerVsMachineConversion};
//!
//! let conversion =
//!     PowerVsMachineConversion::new(Some(&machine), Some(&powervs_machine), Some(&cluster));
//! let (result, warnings) = conversion.to_machine();
//! for warning in &warnings {
//!     tracing::warn!(%warning, "lossy conversion");
//! }
//! let mapi_machine = result?;
//! ```

mod machine;
mod machine_set;
mod powervs;
pub mod provider_spec;
pub mod reference;

pub use machine::from_capi_machine_to_mapi_machine;
pub use machine_set::{from_capi_machine_set_to_mapi_machine_set, SUPPORTED_DELETE_POLICIES};
pub use powervs::{
    PowerVsMachineConversion, PowerVsMachineSetConversion, PowerVsProviderSpecMapper,
    ERR_MACHINE_POWERVS_MACHINE_POWERVS_CLUSTER_NIL,
    ERR_MACHINE_SET_POWERVS_TEMPLATE_POWERVS_CLUSTER_NIL,
};

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::ResourceExt;
use serde::Serialize;
use tracing::debug;

use machine_sync_common::crd::mapi::RawExtension;
use machine_sync_common::crd::{capi, mapi};
use machine_sync_common::{Error, ErrorList, Result};

use provider_spec::raw_extension_from_provider_spec;

/// A Cluster API Machine together with its infrastructure machine
pub trait MachineAndInfrastructureMachine {
    /// Convert into a Machine API Machine
    ///
    /// Warnings are returned whether or not the conversion succeeded.
    fn to_machine(&self) -> (Result<mapi::Machine>, Vec<String>);
}

/// A Cluster API MachineSet together with its infrastructure machine template
pub trait MachineSetAndMachineTemplate {
    /// Convert into a Machine API MachineSet
    ///
    /// Warnings are returned whether or not the conversion succeeded.
    fn to_machine_set(&self) -> (Result<mapi::MachineSet>, Vec<String>);
}

/// Platform-specific mapping from infrastructure resources to a provider config
///
/// Implementations resolve every reference field independently and report
/// all failures at once. The returned config is always stamped with the
/// platform kind and apiVersion, even when errors were found.
pub trait ProviderSpecMapper {
    /// The Machine API provider config carried in `spec.providerSpec.value`
    type ProviderConfig: Serialize;

    /// Build the provider config for `machine`
    fn to_provider_config(
        &self,
        machine: &capi::Machine,
    ) -> ProviderConfigConversion<Self::ProviderConfig>;
}

/// Best-effort provider config plus what went wrong producing it
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderConfigConversion<T> {
    /// The mapped config, populated as far as the inputs allowed
    pub config: T,
    /// Lossy but acceptable translations
    pub warnings: Vec<String>,
    /// Fields that could not be converted
    pub errors: ErrorList,
}

/// Convert a Cluster API Machine with a platform mapper
///
/// Never stops at the first failure: mapper errors, generic conversion
/// errors and encoding errors are all collected into one aggregate.
pub fn convert_machine<P: ProviderSpecMapper>(
    machine: &capi::Machine,
    mapper: &P,
) -> (Result<mapi::Machine>, Vec<String>) {
    let name = machine.name_any();
    debug!(machine = %name, "converting Machine to MAPI");

    let ProviderConfigConversion {
        config,
        warnings,
        errors: mapper_errors,
    } = mapper.to_provider_config(machine);
    let mut errors: Vec<Error> = mapper_errors.into_iter().map(Error::Field).collect();

    let (mut mapi_machine, machine_errors) = from_capi_machine_to_mapi_machine(machine);
    errors.extend(machine_errors.into_iter().map(Error::Field));

    let raw = raw_extension_from_provider_spec(Some(&config)).unwrap_or_else(|err| {
        errors.push(err);
        RawExtension::default()
    });
    mapi_machine.spec.provider_spec.value = Some(raw);

    match Error::aggregate(errors) {
        Some(err) => {
            debug!(machine = %name, error = %err, "Machine conversion failed");
            (Err(err), warnings)
        }
        None => (Ok(mapi_machine), warnings),
    }
}

/// Convert a Cluster API MachineSet, deriving its template from `machine`
///
/// `machine` is the single-machine view synthesized from the set's template.
/// Its errors do not stop the set-level conversion, so both are reported.
pub fn convert_machine_set<M: MachineAndInfrastructureMachine>(
    machine_set: &capi::MachineSet,
    machine: &M,
) -> (Result<mapi::MachineSet>, Vec<String>) {
    let name = machine_set.name_any();
    debug!(machine_set = %name, "converting MachineSet to MAPI");

    let mut errors = Vec::new();
    let (machine_result, warnings) = machine.to_machine();

    let (mut mapi_machine_set, set_errors) = from_capi_machine_set_to_mapi_machine_set(machine_set);

    match machine_result {
        Ok(mapi_machine) => {
            mapi_machine_set.spec.template.metadata = ObjectMeta {
                labels: mapi_machine.metadata.labels,
                annotations: mapi_machine.metadata.annotations,
                ..Default::default()
            };
            mapi_machine_set.spec.template.spec = mapi_machine.spec;
        }
        Err(err) => errors.push(err),
    }
    errors.extend(set_errors.into_iter().map(Error::Field));

    match Error::aggregate(errors) {
        Some(err) => {
            debug!(machine_set = %name, error = %err, "MachineSet conversion failed");
            (Err(err), warnings)
        }
        None => (Ok(mapi_machine_set), warnings),
    }
}
