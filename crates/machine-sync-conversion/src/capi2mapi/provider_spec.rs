//! Encoding provider configs into `spec.providerSpec.value` and back

use serde::de::DeserializeOwned;
use serde::Serialize;

use machine_sync_common::crd::mapi::{
    PowerVsMachineProviderConfig, RawExtension, POWERVS_PROVIDER_CONFIG_KIND,
};
use machine_sync_common::{Error, Result};

/// Serialize a provider config into a [`RawExtension`]
///
/// `None` yields an empty extension, which consumers read as "no provider
/// config". Serialization is deterministic for a given config.
pub fn raw_extension_from_provider_spec<T: Serialize>(spec: Option<&T>) -> Result<RawExtension> {
    let Some(spec) = spec else {
        return Ok(RawExtension::default());
    };
    serde_json::to_vec(spec)
        .map(RawExtension::from_raw)
        .map_err(Error::encoding)
}

/// Deserialize a provider config of `kind` from a [`RawExtension`]
///
/// An absent or empty extension is `Ok(None)`, not an error.
pub fn provider_spec_from_raw_extension<T: DeserializeOwned>(
    raw: Option<&RawExtension>,
    kind: &str,
) -> Result<Option<T>> {
    match raw {
        None => Ok(None),
        Some(ext) if ext.is_empty() => Ok(None),
        Some(ext) => serde_json::from_slice(&ext.raw)
            .map(Some)
            .map_err(|e| Error::serialization_for_kind(kind, e.to_string())),
    }
}

/// Decode a PowerVS provider config, rejecting payloads of another kind
pub fn powervs_provider_config_from_raw_extension(
    raw: Option<&RawExtension>,
) -> Result<Option<PowerVsMachineProviderConfig>> {
    let config: Option<PowerVsMachineProviderConfig> =
        provider_spec_from_raw_extension(raw, POWERVS_PROVIDER_CONFIG_KIND)?;
    match config {
        Some(config) if config.kind != POWERVS_PROVIDER_CONFIG_KIND => {
            Err(Error::serialization_for_kind(
                POWERVS_PROVIDER_CONFIG_KIND,
                format!("unexpected provider config kind {:?}", config.kind),
            ))
        }
        other => Ok(other),
    }
}
