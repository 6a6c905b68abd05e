//! Resource definitions for both sides of the conversion
//!
//! - [`capi`]: Cluster API `Machine` / `MachineSet` (`cluster.x-k8s.io`)
//! - [`powervs`]: IBM Cloud PowerVS infrastructure resources (CAPIBM)
//! - [`mapi`]: Machine API `Machine` / `MachineSet` (`machine.openshift.io`)
//!   and the legacy PowerVS provider config they embed
//!
//! `capi` and `mapi` both define `Machine` and `MachineSet`, so the modules
//! are public rather than flattened into this one.

pub mod capi;
pub mod mapi;
pub mod powervs;
