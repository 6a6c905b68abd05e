//! Platform-independent conversion of Cluster API Machine metadata and spec
//!
//! Produces the skeleton Machine API Machine that a platform mapping then
//! completes by filling `spec.providerSpec.value`.

use std::collections::BTreeMap;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use machine_sync_common::crd::{capi, mapi};
use machine_sync_common::{
    ErrorList, FieldError, Path, CAPI_CLUSTER_NAME_LABEL, CAPI_PRE_DRAIN_HOOK_PREFIX,
    CAPI_PRE_TERMINATE_HOOK_PREFIX, MAPI_CLUSTER_NAME_LABEL,
};

/// Convert the generic parts of a Cluster API Machine
///
/// Always returns a skeleton; fields that have no Machine API equivalent are
/// reported in the error list instead of aborting the conversion.
pub fn from_capi_machine_to_mapi_machine(
    capi_machine: &capi::Machine,
) -> (mapi::Machine, ErrorList) {
    let mut errors = ErrorList::new();
    let meta = &capi_machine.metadata;

    let labels = convert_labels(meta.labels.as_ref());
    let (annotations, lifecycle_hooks) = convert_annotations(
        meta.annotations.as_ref(),
        &Path::new("metadata").child("annotations"),
        &mut errors,
    );

    errors.extend(unsupported_spec_fields(&capi_machine.spec, &Path::new("spec")));

    let spec = mapi::MachineSpec {
        lifecycle_hooks,
        provider_id: capi_machine.spec.provider_id.clone(),
        ..Default::default()
    };

    let mut machine = mapi::Machine::new(meta.name.as_deref().unwrap_or_default(), spec);
    machine.metadata = ObjectMeta {
        name: meta.name.clone(),
        namespace: meta.namespace.clone(),
        labels,
        annotations,
        ..Default::default()
    };

    (machine, errors)
}

/// Translate Cluster API labels to their Machine API equivalents
///
/// Only existing keys are renamed; `spec.clusterName` never adds a label.
pub(crate) fn convert_labels(
    labels: Option<&BTreeMap<String, String>>,
) -> Option<BTreeMap<String, String>> {
    labels.map(|labels| {
        labels
            .iter()
            .map(|(key, value)| (convert_label_key(key), value.clone()))
            .collect()
    })
}

/// Rename a single label key from Cluster API to Machine API conventions
pub(crate) fn convert_label_key(key: &str) -> String {
    if key == CAPI_CLUSTER_NAME_LABEL {
        MAPI_CLUSTER_NAME_LABEL.to_string()
    } else {
        key.to_string()
    }
}

/// Split lifecycle hook annotations out of the annotation map
fn convert_annotations(
    annotations: Option<&BTreeMap<String, String>>,
    path: &Path,
    errors: &mut ErrorList,
) -> (Option<BTreeMap<String, String>>, mapi::LifecycleHooks) {
    let mut hooks = mapi::LifecycleHooks::default();
    let Some(annotations) = annotations else {
        return (None, hooks);
    };

    let mut remaining = BTreeMap::new();
    for (key, owner) in annotations {
        let (hook_name, target) = if let Some(name) = key.strip_prefix(CAPI_PRE_DRAIN_HOOK_PREFIX) {
            (name, &mut hooks.pre_drain)
        } else if let Some(name) = key.strip_prefix(CAPI_PRE_TERMINATE_HOOK_PREFIX) {
            (name, &mut hooks.pre_terminate)
        } else {
            remaining.insert(key.clone(), owner.clone());
            continue;
        };

        if hook_name.is_empty() {
            errors.push(FieldError::invalid(
                &path.key(key.as_str()),
                owner,
                "lifecycle hook annotation must include a hook name",
            ));
            continue;
        }
        target.push(mapi::LifecycleHook {
            name: hook_name.to_string(),
            owner: owner.clone(),
        });
    }

    let remaining = if remaining.is_empty() {
        None
    } else {
        Some(remaining)
    };
    (remaining, hooks)
}

/// Fields of a Cluster API Machine spec the Machine API cannot express
fn unsupported_spec_fields(spec: &capi::MachineSpec, path: &Path) -> ErrorList {
    [
        ("nodeDrainTimeout", &spec.node_drain_timeout),
        ("nodeVolumeDetachTimeout", &spec.node_volume_detach_timeout),
        ("nodeDeletionTimeout", &spec.node_deletion_timeout),
    ]
    .into_iter()
    .filter_map(|(field, value)| {
        value.as_ref().map(|value| {
            FieldError::invalid(
                &path.child(field),
                value,
                format!("{field} is not supported in MAPI"),
            )
        })
    })
    .collect()
}
