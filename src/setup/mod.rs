//! # Key Setup
//!
//! Initial derivation of a multi-factor key: [`key`] takes factor instances
//! built by [`factors`] and produces an
//! [`MFKDFDerivedKey`](crate::definitions::MFKDFDerivedKey) whose policy can
//! be stored publicly and later fed to [`crate::derive::key`].

pub mod factors;
mod key;

pub use key::key;

use serde_json::Value;

use crate::{
  definitions::{FactorMetadata, FactorType},
  error::MFKDFResult,
};

/// Setup-side factor contract.
pub(crate) trait FactorSetup: FactorMetadata {
  /// Public per-factor parameters to embed in the policy, given the freshly
  /// derived key.
  fn params(&self, key: &[u8]) -> MFKDFResult<Value>;

  /// Public post-setup information returned to the caller, never persisted.
  fn output(&self) -> Value;
}

impl FactorSetup for FactorType {
  fn params(&self, key: &[u8]) -> MFKDFResult<Value> {
    match self {
      FactorType::Password(password) => password.params(key),
      FactorType::Uuid(uuid) => uuid.params(key),
      FactorType::Question(question) => question.params(key),
      FactorType::HmacSha1(hmacsha1) => hmacsha1.params(key),
      FactorType::Hotp(hotp) => hotp.params(key),
      FactorType::Persisted(persisted) => persisted.params(key),
    }
  }

  fn output(&self) -> Value {
    match self {
      FactorType::Password(password) => password.output(),
      FactorType::Uuid(uuid) => uuid.output(),
      FactorType::Question(question) => question.output(),
      FactorType::HmacSha1(hmacsha1) => hmacsha1.output(),
      FactorType::Hotp(hotp) => hotp.output(),
      FactorType::Persisted(persisted) => persisted.output(),
    }
  }
}
