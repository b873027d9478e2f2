//! # Key Derivation
//!
//! Re-derivation of a multi-factor key from its stored policy: [`key`] takes
//! a policy plus a map of factor witnesses built by [`factors`] and, when at
//! least `threshold` of them are valid, reproduces the exact key returned by
//! [`crate::setup::key`].

pub mod factors;
mod key;

pub use key::key;

use serde_json::Value;

use crate::{
  definitions::{FactorMetadata, FactorType},
  error::MFKDFResult,
};

/// What a factor wants done with its stored params after a successful
/// derivation.
pub enum ParamsAction {
  /// Leave the stored params untouched.
  Keep,
  /// Replace the stored params (challenge-response rotation).
  Rotate(Value),
}

/// Derive-side factor contract.
pub(crate) trait FactorDerive: FactorMetadata {
  /// Feeds the policy's stored params for this factor's slot to the witness.
  fn include_params(&mut self, params: &Value) -> MFKDFResult<()>;

  /// Post-derivation params disposition, given the freshly derived key.
  fn next_params(&self, key: &[u8]) -> MFKDFResult<ParamsAction>;
}

impl FactorDerive for FactorType {
  fn include_params(&mut self, params: &Value) -> MFKDFResult<()> {
    match self {
      FactorType::Password(password) => password.include_params(params),
      FactorType::Uuid(uuid) => uuid.include_params(params),
      FactorType::Question(question) => question.include_params(params),
      FactorType::HmacSha1(hmacsha1) => hmacsha1.include_params(params),
      FactorType::Hotp(hotp) => hotp.include_params(params),
      FactorType::Persisted(persisted) => persisted.include_params(params),
    }
  }

  fn next_params(&self, key: &[u8]) -> MFKDFResult<ParamsAction> {
    match self {
      FactorType::Password(password) => password.next_params(key),
      FactorType::Uuid(uuid) => uuid.next_params(key),
      FactorType::Question(question) => question.next_params(key),
      FactorType::HmacSha1(hmacsha1) => hmacsha1.next_params(key),
      FactorType::Hotp(hotp) => hotp.next_params(key),
      FactorType::Persisted(persisted) => persisted.next_params(key),
    }
  }
}
