//! The public policy document.
//!
//! A policy is the only durable artifact of a key: a schema-validated JSON
//! document carrying everything needed to re-derive it when a threshold of
//! factors is supplied. It contains no secret material — each factor's share
//! is blinded by HKDF-stretched factor material before it is stored as a
//! `pad`.
//!
//! The document is stable under serialize→parse→serialize: field order is
//! fixed by the struct declarations, `params` objects preserve insertion
//! order, and derive rewrites rotated params in place without reordering
//! keys.

use std::collections::HashSet;

use base64::{Engine, engine::general_purpose};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
  constants::POLICY_SCHEMA,
  error::{MFKDFError, MFKDFResult},
  kdf::KdfSpec,
};

/// Per-factor public record in a policy.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PolicyFactor {
  /// Unique identifier for the factor within the policy.
  pub id:     String,
  /// Factor type tag (`"password"`, `"uuid"`, `"hotp"`, ...).
  #[serde(rename = "type")]
  pub kind:   String,
  /// Base64-encoded blinding pad: `share XOR HKDF-SHA512(factor material)`.
  pub pad:    String,
  /// Public parameters the factor needs at derive time.
  pub params: Value,
}

/// Policy document describing how to re-derive a key (schema v1.0.0).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Policy {
  /// JSON schema URI; must equal [`POLICY_SCHEMA`].
  #[serde(rename = "$schema")]
  pub schema:    String,
  /// Stable identifier for this key.
  #[serde(rename = "$id")]
  pub id:        String,
  /// Key size in bytes.
  pub size:      u32,
  /// Number of factors required to re-derive the key.
  pub threshold: u8,
  /// Base64-encoded `size`-byte salt.
  pub salt:      String,
  /// KDF used to map the combined secret to the final key.
  pub kdf:       KdfSpec,
  /// Per-factor records; order is significant and fixed at setup, it
  /// determines each factor's share index.
  pub factors:   Vec<PolicyFactor>,
}

impl Policy {
  /// Returns a list of all factor IDs in the policy.
  pub fn ids(&self) -> Vec<String> { self.factors.iter().map(|f| f.id.clone()).collect() }

  /// Eager structural validation, run before any derivation work.
  pub fn validate(&self) -> MFKDFResult<()> {
    if self.schema != POLICY_SCHEMA {
      return Err(MFKDFError::InvalidPolicy(format!("unrecognized schema \"{}\"", self.schema)));
    }
    if self.id.is_empty() {
      return Err(MFKDFError::InvalidPolicy("$id must not be empty".to_string()));
    }
    if self.size == 0 {
      return Err(MFKDFError::InvalidPolicy("key size must be positive".to_string()));
    }
    if self.factors.is_empty() {
      return Err(MFKDFError::InvalidPolicy("policy must contain at least one factor".to_string()));
    }
    if self.threshold == 0 || usize::from(self.threshold) > self.factors.len() {
      return Err(MFKDFError::InvalidPolicy(
        "threshold must be between 1 and the number of factors".to_string(),
      ));
    }
    self.kdf.validate().map_err(|e| MFKDFError::InvalidPolicy(e.to_string()))?;

    let salt = general_purpose::STANDARD.decode(&self.salt)?;
    if salt.len() != self.size as usize {
      return Err(MFKDFError::InvalidPolicy("salt length must equal the key size".to_string()));
    }

    let mut ids = HashSet::new();
    for factor in &self.factors {
      if factor.id.is_empty() {
        return Err(MFKDFError::InvalidPolicy("factor id must not be empty".to_string()));
      }
      if !ids.insert(factor.id.as_str()) {
        return Err(MFKDFError::InvalidPolicy(format!(
          "factor id \"{}\" is not unique",
          factor.id
        )));
      }
      if factor.kind.is_empty() {
        return Err(MFKDFError::InvalidPolicy("factor type must not be empty".to_string()));
      }
      let pad = general_purpose::STANDARD.decode(&factor.pad)?;
      if pad.len() < self.size as usize {
        return Err(MFKDFError::InvalidPolicy(format!(
          "pad for factor \"{}\" is shorter than the key size",
          factor.id
        )));
      }
    }
    Ok(())
  }

  /// Parses and validates a policy from its JSON representation.
  pub fn parse(json: &str) -> MFKDFResult<Policy> {
    let policy: Policy = serde_json::from_str(json)?;
    policy.validate()?;
    Ok(policy)
  }

  /// Serializes the policy to its canonical JSON representation.
  pub fn to_json(&self) -> MFKDFResult<String> { Ok(serde_json::to_string(self)?) }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn sample() -> Policy {
    Policy {
      schema:    POLICY_SCHEMA.to_string(),
      id:        "test-key".to_string(),
      size:      16,
      threshold: 1,
      salt:      general_purpose::STANDARD.encode([0u8; 16]),
      kdf:       KdfSpec::Pbkdf2 { rounds: 1000, digest: crate::kdf::Pbkdf2Digest::Sha256 },
      factors:   vec![PolicyFactor {
        id:     "password".to_string(),
        kind:   "password".to_string(),
        pad:    general_purpose::STANDARD.encode([1u8; 16]),
        params: json!({}),
      }],
    }
  }

  #[test]
  fn valid_policy_passes() {
    sample().validate().unwrap();
  }

  #[test]
  fn json_round_trip_is_stable() {
    let policy = sample();
    let first = policy.to_json().unwrap();
    let reparsed = Policy::parse(&first).unwrap();
    assert_eq!(reparsed, policy);
    assert_eq!(reparsed.to_json().unwrap(), first);
  }

  #[test]
  fn unknown_top_level_field_rejected() {
    let mut value = serde_json::to_value(sample()).unwrap();
    value["surprise"] = json!(1);
    assert!(serde_json::from_value::<Policy>(value).is_err());
  }

  #[test]
  fn unknown_factor_field_rejected() {
    let mut value = serde_json::to_value(sample()).unwrap();
    value["factors"][0]["surprise"] = json!(1);
    assert!(serde_json::from_value::<Policy>(value).is_err());
  }

  #[test]
  fn wrong_schema_rejected() {
    let mut policy = sample();
    policy.schema = "https://mfkdf.com/schema/v0.0.0/policy.json".to_string();
    assert!(matches!(policy.validate(), Err(MFKDFError::InvalidPolicy(_))));
  }

  #[test]
  fn empty_id_rejected() {
    let mut policy = sample();
    policy.id = String::new();
    assert!(matches!(policy.validate(), Err(MFKDFError::InvalidPolicy(_))));
  }

  #[test]
  fn threshold_bounds() {
    let mut policy = sample();
    policy.threshold = 0;
    assert!(matches!(policy.validate(), Err(MFKDFError::InvalidPolicy(_))));
    policy.threshold = 2;
    assert!(matches!(policy.validate(), Err(MFKDFError::InvalidPolicy(_))));
  }

  #[test]
  fn salt_length_must_match_size() {
    let mut policy = sample();
    policy.salt = general_purpose::STANDARD.encode([0u8; 8]);
    assert!(matches!(policy.validate(), Err(MFKDFError::InvalidPolicy(_))));
  }

  #[test]
  fn short_pad_rejected() {
    let mut policy = sample();
    policy.factors[0].pad = general_purpose::STANDARD.encode([1u8; 8]);
    assert!(matches!(policy.validate(), Err(MFKDFError::InvalidPolicy(_))));
  }

  #[test]
  fn oversized_pad_accepted() {
    let mut policy = sample();
    policy.factors[0].pad = general_purpose::STANDARD.encode([1u8; 17]);
    policy.validate().unwrap();
  }

  #[test]
  fn duplicate_factor_ids_rejected() {
    let mut policy = sample();
    policy.factors.push(policy.factors[0].clone());
    policy.threshold = 1;
    assert!(matches!(policy.validate(), Err(MFKDFError::InvalidPolicy(_))));
  }

  #[test]
  fn malformed_base64_rejected() {
    let mut policy = sample();
    policy.salt = "not base64!".to_string();
    assert!(matches!(policy.validate(), Err(MFKDFError::InvalidPolicy(_))));
  }

  #[test]
  fn invalid_kdf_rejected() {
    let mut policy = sample();
    policy.kdf = KdfSpec::Bcrypt { rounds: 99 };
    assert!(matches!(policy.validate(), Err(MFKDFError::InvalidPolicy(_))));
  }
}
