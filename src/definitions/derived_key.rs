//! The result of a setup or derive operation.
//!
//! A properly-configured multi-factor derived key cannot feasibly be
//! reproduced without a threshold of its constituent factors, so the key can
//! serve directly as a high-entropy application root key while the embedded
//! policy keeps flexible `t`-of-`n` recovery flows possible.

use std::collections::HashMap;

use serde_json::Value;
use zeroize::Zeroize;

use crate::{definitions::MFKDFEntropy, policy::Policy};

/// Derived key material plus the (possibly rewritten) policy.
///
/// Owns its byte buffers exclusively and scrubs them on drop; the secret
/// buffers are reachable only through accessors.
pub struct MFKDFDerivedKey {
  /// Policy to persist for future derivations. After a derive, rotating
  /// factors (HOTP counters, HMAC challenges) have fresh `params` here, and
  /// this copy should replace the stored one.
  pub policy:  Policy,
  key:     Vec<u8>,
  secret:  Vec<u8>,
  shares:  Vec<Vec<u8>>,
  /// Public post-setup outputs by factor id (populated at setup only, never
  /// persisted in the policy).
  pub outputs: HashMap<String, Value>,
  /// Entropy estimates (populated at setup only).
  pub entropy: Option<MFKDFEntropy>,
}

impl MFKDFDerivedKey {
  pub(crate) fn new(
    policy: Policy,
    key: Vec<u8>,
    secret: Vec<u8>,
    shares: Vec<Vec<u8>>,
    outputs: HashMap<String, Value>,
    entropy: Option<MFKDFEntropy>,
  ) -> Self {
    Self { policy, key, secret, shares, outputs, entropy }
  }

  /// The final derived key, `size` bytes.
  pub fn key(&self) -> &[u8] { &self.key }

  /// The master secret the key was derived from (same length as the key).
  pub fn secret(&self) -> &[u8] { &self.secret }

  /// The full vector of factor shares, one per policy factor.
  pub fn shares(&self) -> &[Vec<u8>] { &self.shares }

  /// Exports the share backing `factor_id`, e.g. to persist client-side so
  /// the factor itself need not be presented on this device again.
  pub fn persist_factor(&self, factor_id: &str) -> Option<Vec<u8>> {
    self
      .policy
      .factors
      .iter()
      .position(|factor| factor.id == factor_id)
      .map(|index| self.shares[index].clone())
  }
}

impl Drop for MFKDFDerivedKey {
  fn drop(&mut self) {
    self.key.zeroize();
    self.secret.zeroize();
    for share in &mut self.shares {
      share.zeroize();
    }
  }
}

impl std::fmt::Debug for MFKDFDerivedKey {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MFKDFDerivedKey")
      .field("policy", &self.policy.id)
      .field("key", &"<redacted>")
      .field("secret", &"<redacted>")
      .field("shares", &self.shares.len())
      .field("entropy", &self.entropy)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn debug_redacts_key_material() {
    let key = MFKDFDerivedKey::new(
      crate::policy::Policy {
        schema:    crate::constants::POLICY_SCHEMA.to_string(),
        id:        "debug".to_string(),
        size:      4,
        threshold: 1,
        salt:      String::new(),
        kdf:       crate::kdf::KdfSpec::default(),
        factors:   Vec::new(),
      },
      vec![0xAB; 4],
      vec![0xCD; 4],
      vec![vec![0xEF; 4]],
      HashMap::new(),
      None,
    );
    let rendered = format!("{key:?}");
    assert!(rendered.contains("<redacted>"));
    assert!(!rendered.contains("171")); // 0xAB
    assert!(!rendered.contains("ab"));
  }
}
