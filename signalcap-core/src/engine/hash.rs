use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::resolve::ResolvedIntersection;
use crate::Error;

/// Lowercase hex SHA-256 of the resolved input tree
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputHash(String);

impl InputHash {
    /// Hashes the JSON encoding of `resolved`. Entities are already ordered
    /// by identifier and object keys are sorted, so the encoding does not
    /// depend on how the input was written. Negative zero is encoded as
    /// zero, matching how snapshots compare.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if the tree cannot be encoded.
    pub fn of(resolved: &ResolvedIntersection) -> Result<Self, Error> {
        let encode_error = |e: serde_json::Error| {
            Error::invalid_input("/", format!("cannot encode input: {e}"))
        };
        let mut tree = serde_json::to_value(resolved).map_err(encode_error)?;
        unsign_zeros(&mut tree);
        let encoded = serde_json::to_vec(&tree).map_err(encode_error)?;
        let digest = Sha256::digest(&encoded);
        let hex = digest.iter().fold(String::with_capacity(64), |mut out, byte| {
            out.push_str(&format!("{byte:02x}"));
            out
        });
        Ok(Self(hex))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex digits, for log lines
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

fn unsign_zeros(value: &mut Value) {
    if matches!(value, Value::Number(n) if n.is_f64() && n.as_f64() == Some(0.0)) {
        *value = Value::from(0.0);
        return;
    }
    match value {
        Value::Array(items) => items.iter_mut().for_each(unsign_zeros),
        Value::Object(fields) => fields.values_mut().for_each(unsign_zeros),
        _ => {}
    }
}

impl fmt::Display for InputHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
