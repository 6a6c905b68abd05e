//! Platform-independent conversion of Cluster API MachineSet fields
//!
//! Only set-level fields are handled here. The template is filled in from the
//! per-machine conversion so that template problems are reported once.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};
use machine_sync_common::crd::{capi, mapi};
use machine_sync_common::{ErrorList, FieldError, Path};

use super::machine::{convert_label_key, convert_labels};

/// Delete policies understood by both APIs
pub const SUPPORTED_DELETE_POLICIES: &[&str] = &["Random", "Newest", "Oldest"];

/// Convert the set-level parts of a Cluster API MachineSet
pub fn from_capi_machine_set_to_mapi_machine_set(
    capi_machine_set: &capi::MachineSet,
) -> (mapi::MachineSet, ErrorList) {
    let mut errors = ErrorList::new();
    let meta = &capi_machine_set.metadata;
    let spec = &capi_machine_set.spec;

    if let Some(policy) = &spec.delete_policy {
        if !SUPPORTED_DELETE_POLICIES.contains(&policy.as_str()) {
            errors.push(FieldError::not_supported(
                &Path::new("spec").child("deletePolicy"),
                policy,
                SUPPORTED_DELETE_POLICIES,
            ));
        }
    }

    let mapi_spec = mapi::MachineSetSpec {
        replicas: spec.replicas,
        min_ready_seconds: spec.min_ready_seconds,
        delete_policy: spec.delete_policy.clone(),
        selector: convert_selector(&spec.selector),
        template: mapi::MachineTemplateSpec::default(),
    };

    let name = meta.name.as_deref().unwrap_or_default();
    let mut machine_set = mapi::MachineSet::new(name, mapi_spec);
    machine_set.metadata = ObjectMeta {
        name: meta.name.clone(),
        namespace: meta.namespace.clone(),
        labels: convert_labels(meta.labels.as_ref()),
        annotations: meta.annotations.clone(),
        ..Default::default()
    };

    (machine_set, errors)
}

fn convert_selector(selector: &LabelSelector) -> LabelSelector {
    LabelSelector {
        match_labels: selector.match_labels.as_ref().map(|labels| {
            labels
                .iter()
                .map(|(key, value)| (convert_label_key(key), value.clone()))
                .collect()
        }),
        match_expressions: selector.match_expressions.as_ref().map(|expressions| {
            expressions
                .iter()
                .cloned()
                .map(|mut expression| {
                    expression.key = convert_label_key(&expression.key);
                    expression
                })
                .collect()
        }),
    }
}
