//! Convert command
//!
//! Reads a multi-document YAML file holding either
//! - a Machine, an IBMPowerVSMachine and an IBMPowerVSCluster, or
//! - a MachineSet, an IBMPowerVSMachineTemplate and an IBMPowerVSCluster
//!
//! and prints the resulting Machine API object.

use std::path::PathBuf;

use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use machine_sync_common::crd::capi::{self, CAPI_API_VERSION};
use machine_sync_common::crd::powervs::{
    IbmPowerVsCluster, IbmPowerVsMachine, IbmPowerVsMachineTemplate,
    POWERVS_INFRASTRUCTURE_API_VERSION,
};
use machine_sync_conversion::{
    MachineAndInfrastructureMachine, MachineSetAndMachineTemplate, PowerVsMachineConversion,
    PowerVsMachineSetConversion,
};

use crate::{Error, Result};

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Multi-document YAML file with the Cluster API and PowerVS resources
    #[arg(short, long)]
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "yaml")]
    pub output: OutputFormat,
}

/// Output format
#[derive(Clone, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// YAML (default)
    #[default]
    Yaml,
    /// JSON
    Json,
}

/// Run the convert command
pub fn run(args: ConvertArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.file)?;
    let manifests = Manifests::parse(&content)?;
    let rendered = convert(&manifests, &args.output)?;
    print!("{rendered}");
    Ok(())
}

/// Resources found in the input file, at most one of each kind
#[derive(Debug, Default)]
pub struct Manifests {
    pub machine: Option<capi::Machine>,
    pub machine_set: Option<capi::MachineSet>,
    pub powervs_machine: Option<IbmPowerVsMachine>,
    pub powervs_machine_template: Option<IbmPowerVsMachineTemplate>,
    pub powervs_cluster: Option<IbmPowerVsCluster>,
}

impl Manifests {
    /// Parse every document in `content`, skipping empty ones
    pub fn parse(content: &str) -> Result<Self> {
        let mut manifests = Self::default();
        for document in serde_yaml::Deserializer::from_str(content) {
            let value = serde_yaml::Value::deserialize(document)?;
            if value.is_null() {
                continue;
            }
            manifests.add(value)?;
        }
        Ok(manifests)
    }

    fn add(&mut self, value: serde_yaml::Value) -> Result<()> {
        let kind = string_field(&value, "kind")?;
        let api_version = string_field(&value, "apiVersion")?;

        match (api_version.as_str(), kind.as_str()) {
            (CAPI_API_VERSION, "Machine") => store(&mut self.machine, value, &kind),
            (CAPI_API_VERSION, "MachineSet") => store(&mut self.machine_set, value, &kind),
            (POWERVS_INFRASTRUCTURE_API_VERSION, "IBMPowerVSMachine") => {
                store(&mut self.powervs_machine, value, &kind)
            }
            (POWERVS_INFRASTRUCTURE_API_VERSION, "IBMPowerVSMachineTemplate") => {
                store(&mut self.powervs_machine_template, value, &kind)
            }
            (POWERVS_INFRASTRUCTURE_API_VERSION, "IBMPowerVSCluster") => {
                store(&mut self.powervs_cluster, value, &kind)
            }
            _ => Err(Error::unsupported_kind(api_version, kind)),
        }
    }

    /// Whether the input describes a MachineSet rather than a single Machine
    pub fn is_machine_set(&self) -> bool {
        self.machine_set.is_some() || self.powervs_machine_template.is_some()
    }
}

fn string_field(value: &serde_yaml::Value, field: &str) -> Result<String> {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| Error::validation(format!("manifest is missing {field}")))
}

fn store<T: serde::de::DeserializeOwned>(
    slot: &mut Option<T>,
    value: serde_yaml::Value,
    kind: &str,
) -> Result<()> {
    if slot.is_some() {
        return Err(Error::validation(format!("more than one {kind} in input")));
    }
    *slot = Some(serde_yaml::from_value(value)?);
    Ok(())
}

/// Convert the parsed manifests and render the result
pub fn convert(manifests: &Manifests, output: &OutputFormat) -> Result<String> {
    if manifests.is_machine_set() {
        let conversion = PowerVsMachineSetConversion::new(
            manifests.machine_set.as_ref(),
            manifests.powervs_machine_template.as_ref(),
            manifests.powervs_cluster.as_ref(),
        );
        let (result, warnings) = conversion.to_machine_set();
        log_warnings(&warnings);
        let machine_set = result.map_err(Error::Conversion)?;
        info!(machine_set = ?machine_set.metadata.name, "converted MachineSet");
        render(&machine_set, output)
    } else {
        let conversion = PowerVsMachineConversion::new(
            manifests.machine.as_ref(),
            manifests.powervs_machine.as_ref(),
            manifests.powervs_cluster.as_ref(),
        );
        let (result, warnings) = conversion.to_machine();
        log_warnings(&warnings);
        let machine = result.map_err(Error::Conversion)?;
        info!(machine = ?machine.metadata.name, "converted Machine");
        render(&machine, output)
    }
}

fn log_warnings(warnings: &[String]) {
    for warning in warnings {
        warn!(%warning, "lossy conversion");
    }
}

fn render<T: Serialize>(resource: &T, output: &OutputFormat) -> Result<String> {
    match output {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(resource)?),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(resource)? + "\n"),
    }
}
