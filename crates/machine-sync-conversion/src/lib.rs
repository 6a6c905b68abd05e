//! Conversion of Cluster API resources into Machine API resources
//!
//! This crate provides:
//! - The [`capi2mapi::ProviderSpecMapper`] contract each infrastructure platform implements
//! - Platform-independent Machine/MachineSet assembly with error aggregation
//! - The PowerVS mapping ([`capi2mapi::PowerVsMachineConversion`],
//!   [`capi2mapi::PowerVsMachineSetConversion`])

pub mod capi2mapi;

pub use capi2mapi::{
    MachineAndInfrastructureMachine, MachineSetAndMachineTemplate, PowerVsMachineConversion,
    PowerVsMachineSetConversion, ProviderConfigConversion, ProviderSpecMapper,
};
