//! Normalization of PowerVS resource references
//!
//! CAPIBM lets a resource be referenced several ways at once: a legacy ID
//! string, a structured `{id, name, regex}` reference, and for images a
//! reference to an IBMPowerVSImage object. The Machine API accepts exactly
//! one. Resolution order, first match wins:
//!
//! 1. non-empty legacy ID
//! 2. structured reference: `id`, then `name`, then `regex`
//! 3. fallback object reference, as a name
//!
//! Empty strings count as unset at every step.

use k8s_openapi::api::core::v1::LocalObjectReference;
use machine_sync_common::crd::mapi::PowerVsResource;
use machine_sync_common::crd::powervs::IbmPowerVsResourceReference;
use machine_sync_common::{FieldError, Path};

/// Resolve one PowerVS reference field to a single tagged [`PowerVsResource`]
///
/// `legacy_id` is the deprecated scalar ID field, when the resource has one.
/// `fallback` is consulted only when neither the legacy ID nor the
/// structured reference resolves.
pub fn normalize_reference(
    path: &Path,
    legacy_id: Option<&str>,
    reference: Option<&IbmPowerVsResourceReference>,
    fallback: Option<&LocalObjectReference>,
) -> Result<PowerVsResource, FieldError> {
    if let Some(id) = non_empty(legacy_id) {
        return Ok(PowerVsResource::id(id));
    }

    if let Some(resolved) = reference.and_then(resolve_structured) {
        return Ok(resolved);
    }

    if let Some(name) = non_empty(fallback.map(|r| r.name.as_str())) {
        return Ok(PowerVsResource::name(name));
    }

    Err(match reference {
        Some(reference) => FieldError::invalid(
            path,
            reference,
            "unable to convert reference to MAPI: one of id, name or regex must be set",
        ),
        None => FieldError::invalid(
            path,
            serde_json::Value::Null,
            "unable to convert reference to MAPI: no reference is set",
        ),
    })
}

fn resolve_structured(reference: &IbmPowerVsResourceReference) -> Option<PowerVsResource> {
    if let Some(id) = non_empty(reference.id.as_deref()) {
        return Some(PowerVsResource::id(id));
    }
    if let Some(name) = non_empty(reference.name.as_deref()) {
        return Some(PowerVsResource::name(name));
    }
    non_empty(reference.regex.as_deref()).map(PowerVsResource::regex)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
