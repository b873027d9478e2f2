//! Entropy reporting for derived keys.

use serde::{Deserialize, Serialize};

/// Entropy estimates for a derived key, in bits.
///
/// Both values are the sum over the `threshold` smallest per-factor
/// entropies: an attacker holding the policy needs only the weakest
/// `threshold` factors.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct MFKDFEntropy {
  /// Bit-length estimate: sum of the smallest `threshold` values of
  /// `8 * |data|`.
  pub theoretical: f64,
  /// Real-world estimate (zxcvbn for knowledge factors, nominal values
  /// otherwise).
  pub real:        f64,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_to_zero() {
    let entropy = MFKDFEntropy::default();
    assert_eq!(entropy.theoretical, 0.0);
    assert_eq!(entropy.real, 0.0);
  }
}
