//! Opaque serialized payload embedded in a resource
//!
//! On the wire the payload is inlined as the JSON object it contains, or
//! `null` when there are no bytes. An empty `RawExtension` is the valid
//! representation of "no provider config".

use schemars::JsonSchema;
use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialized bytes of an embedded, self-describing object
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawExtension {
    /// JSON-encoded object; empty means "no payload"
    pub raw: Vec<u8>,
}

impl RawExtension {
    /// Wrap already-serialized JSON bytes
    pub fn from_raw(raw: Vec<u8>) -> Self {
        Self { raw }
    }

    /// Returns true if the extension carries no payload
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl Serialize for RawExtension {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.raw.is_empty() {
            return serializer.serialize_none();
        }
        let value: serde_json::Value = serde_json::from_slice(&self.raw).map_err(S::Error::custom)?;
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RawExtension {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<serde_json::Value>::deserialize(deserializer)? {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(value) => serde_json::to_vec(&value)
                .map(Self::from_raw)
                .map_err(D::Error::custom),
        }
    }
}

impl JsonSchema for RawExtension {
    fn schema_name() -> String {
        "RawExtension".to_string()
    }

    fn json_schema(_gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        // Any object; the consumer decodes it by its embedded kind
        let mut schema = schemars::schema::SchemaObject {
            instance_type: Some(schemars::schema::InstanceType::Object.into()),
            metadata: Some(Box::new(schemars::schema::Metadata {
                description: Some("Serialized provider-specific configuration".to_string()),
                ..Default::default()
            })),
            ..Default::default()
        };
        schema.extensions.insert(
            "x-kubernetes-preserve-unknown-fields".to_string(),
            serde_json::Value::Bool(true),
        );
        schemars::schema::Schema::Object(schema)
    }
}
