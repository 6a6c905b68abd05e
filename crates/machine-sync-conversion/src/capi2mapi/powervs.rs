//! IBM Cloud PowerVS mapping
//!
//! Converts a Cluster API Machine backed by an IBMPowerVSMachine (or a
//! MachineSet backed by an IBMPowerVSMachineTemplate) into a Machine API
//! object carrying a `PowerVSMachineProviderConfig`.

use std::borrow::Cow;

use machine_sync_common::crd::mapi::{PowerVsMachineProviderConfig, PowerVsSecretReference};
use machine_sync_common::crd::powervs::{
    IbmPowerVsCluster, IbmPowerVsMachine, IbmPowerVsMachineTemplate,
};
use machine_sync_common::crd::{capi, mapi};
use machine_sync_common::{Error, ErrorList, Path, Result};

use super::reference::normalize_reference;
use super::{
    convert_machine, convert_machine_set, MachineAndInfrastructureMachine,
    MachineSetAndMachineTemplate, ProviderConfigConversion, ProviderSpecMapper,
};

/// Returned when a Machine conversion is missing one of its inputs
pub const ERR_MACHINE_POWERVS_MACHINE_POWERVS_CLUSTER_NIL: &str =
    "provided Machine, IBMPowerVSMachine and IBMPowerVSCluster can not be nil";

/// Returned when a MachineSet conversion is missing one of its inputs
pub const ERR_MACHINE_SET_POWERVS_TEMPLATE_POWERVS_CLUSTER_NIL: &str =
    "provided MachineSet, IBMPowerVSMachineTemplate and IBMPowerVSCluster can not be nil";

/// Maps an IBMPowerVSMachine onto a `PowerVSMachineProviderConfig`
#[derive(Clone, Copy, Debug)]
pub struct PowerVsProviderSpecMapper<'a> {
    /// Infrastructure machine supplying references and compute shape
    pub powervs_machine: &'a IbmPowerVsMachine,
    /// Infrastructure cluster the machine belongs to
    pub powervs_cluster: &'a IbmPowerVsCluster,
}

impl ProviderSpecMapper for PowerVsProviderSpecMapper<'_> {
    type ProviderConfig = PowerVsMachineProviderConfig;

    fn to_provider_config(
        &self,
        machine: &capi::Machine,
    ) -> ProviderConfigConversion<PowerVsMachineProviderConfig> {
        let spec = &self.powervs_machine.spec;
        let path = Path::new("spec");
        let mut errors = ErrorList::new();
        let mut warnings = Vec::new();

        // Each reference is resolved on its own so every bad one is reported.
        let service_instance = normalize_reference(
            &path.child("serviceInstance"),
            Some(spec.service_instance_id.as_str()),
            spec.service_instance.as_ref(),
            None,
        )
        .map_err(|err| errors.push(err))
        .ok();
        let image = normalize_reference(
            &path.child("image"),
            None,
            spec.image.as_ref(),
            spec.image_ref.as_ref(),
        )
        .map_err(|err| errors.push(err))
        .ok();
        let network = normalize_reference(&path.child("network"), None, Some(&spec.network), None)
            .map_err(|err| errors.push(err))
            .ok();

        let user_data_secret = machine
            .spec
            .bootstrap
            .data_secret_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .map(|name| PowerVsSecretReference {
                name: name.to_string(),
            });

        if let Some(failure_domain) = machine
            .spec
            .failure_domain
            .as_deref()
            .filter(|fd| !fd.is_empty())
        {
            warnings.push(format!(
                "spec.failureDomain {failure_domain:?} has no PowerVS provider config equivalent and was dropped"
            ));
        }

        let config = PowerVsMachineProviderConfig {
            user_data_secret,
            service_instance,
            image,
            network,
            key_pair_name: spec.ssh_key.clone(),
            system_type: spec.system_type.clone(),
            processor_type: spec.processor_type.clone(),
            processors: spec.processors.clone(),
            memory_gib: spec.memory_gib,
            ..Default::default()
        };

        ProviderConfigConversion {
            config,
            warnings,
            errors,
        }
    }
}

/// A Cluster API Machine with its PowerVS infrastructure machine and cluster
///
/// Any input may be absent; conversion then fails with a precondition error.
#[derive(Clone, Debug)]
pub struct PowerVsMachineConversion<'a> {
    machine: Option<Cow<'a, capi::Machine>>,
    powervs_machine: Option<Cow<'a, IbmPowerVsMachine>>,
    powervs_cluster: Option<&'a IbmPowerVsCluster>,
}

impl<'a> PowerVsMachineConversion<'a> {
    /// Wrap borrowed inputs for conversion
    pub fn new(
        machine: Option<&'a capi::Machine>,
        powervs_machine: Option<&'a IbmPowerVsMachine>,
        powervs_cluster: Option<&'a IbmPowerVsCluster>,
    ) -> Self {
        Self {
            machine: machine.map(Cow::Borrowed),
            powervs_machine: powervs_machine.map(Cow::Borrowed),
            powervs_cluster,
        }
    }

    /// Build the single-machine view described by a MachineSet's templates
    ///
    /// The synthesized Machine carries the template's labels, annotations
    /// and spec. The synthesized IBMPowerVSMachine carries the template's
    /// infrastructure spec.
    fn from_templates(
        machine_set: &capi::MachineSet,
        template: &IbmPowerVsMachineTemplate,
        powervs_cluster: Option<&'a IbmPowerVsCluster>,
    ) -> Self {
        let machine_template = &machine_set.spec.template;
        let mut machine = capi::Machine::new("", machine_template.spec.clone());
        machine.metadata.name = None;
        machine.metadata.labels = machine_template.metadata.labels.clone();
        machine.metadata.annotations = machine_template.metadata.annotations.clone();

        let mut powervs_machine =
            IbmPowerVsMachine::new("", template.spec.template.spec.clone());
        powervs_machine.metadata.name = None;

        Self {
            machine: Some(Cow::Owned(machine)),
            powervs_machine: Some(Cow::Owned(powervs_machine)),
            powervs_cluster,
        }
    }
}

impl MachineAndInfrastructureMachine for PowerVsMachineConversion<'_> {
    fn to_machine(&self) -> (Result<mapi::Machine>, Vec<String>) {
        let (Some(machine), Some(powervs_machine), Some(powervs_cluster)) = (
            self.machine.as_deref(),
            self.powervs_machine.as_deref(),
            self.powervs_cluster,
        ) else {
            return (
                Err(Error::precondition(ERR_MACHINE_POWERVS_MACHINE_POWERVS_CLUSTER_NIL)),
                Vec::new(),
            );
        };

        let mapper = PowerVsProviderSpecMapper {
            powervs_machine,
            powervs_cluster,
        };
        convert_machine(machine, &mapper)
    }
}

/// A Cluster API MachineSet with its PowerVS machine template and cluster
#[derive(Clone, Debug)]
pub struct PowerVsMachineSetConversion<'a> {
    machine_set: Option<&'a capi::MachineSet>,
    template: Option<&'a IbmPowerVsMachineTemplate>,
    powervs_cluster: Option<&'a IbmPowerVsCluster>,
    machine: Option<PowerVsMachineConversion<'a>>,
}

impl<'a> PowerVsMachineSetConversion<'a> {
    /// Wrap borrowed inputs, synthesizing the per-template machine view
    pub fn new(
        machine_set: Option<&'a capi::MachineSet>,
        template: Option<&'a IbmPowerVsMachineTemplate>,
        powervs_cluster: Option<&'a IbmPowerVsCluster>,
    ) -> Self {
        let machine = match (machine_set, template) {
            (Some(machine_set), Some(template)) => Some(PowerVsMachineConversion::from_templates(
                machine_set,
                template,
                powervs_cluster,
            )),
            _ => None,
        };
        Self {
            machine_set,
            template,
            powervs_cluster,
            machine,
        }
    }

    /// The single-machine view derived from the templates, if inputs allow
    pub fn machine(&self) -> Option<&PowerVsMachineConversion<'a>> {
        self.machine.as_ref()
    }
}

impl MachineSetAndMachineTemplate for PowerVsMachineSetConversion<'_> {
    fn to_machine_set(&self) -> (Result<mapi::MachineSet>, Vec<String>) {
        let (Some(machine_set), Some(_), Some(_), Some(machine)) = (
            self.machine_set,
            self.template,
            self.powervs_cluster,
            self.machine.as_ref(),
        ) else {
            return (
                Err(Error::precondition(
                    ERR_MACHINE_SET_POWERVS_TEMPLATE_POWERVS_CLUSTER_NIL,
                )),
                Vec::new(),
            );
        };

        convert_machine_set(machine_set, machine)
    }
}
