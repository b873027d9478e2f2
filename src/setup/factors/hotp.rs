//! HOTP (RFC 4226) factor.
//!
//! An authenticator app cannot produce stable key material on its own: every
//! code is different. The factor therefore picks a random `target` code as
//! its stable material and stores `offset = target - code(counter)` in the
//! public params; adding the user's next code to the stored offset
//! reconstructs the target. The OATH secret itself rides along in the params
//! sealed under the derived key, so each successful derivation can advance
//! the counter and compute the next offset.

use base64::{Engine, engine::general_purpose};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zeroize::Zeroize;

use crate::{
  crypto, defaults,
  definitions::{FactorMetadata, FactorType, MFKDFFactor},
  error::{MFKDFError, MFKDFResult},
  otp::{OtpHash, otp_code},
  rng,
  setup::FactorSetup,
};

/// Options for the HOTP factor.
#[derive(Clone, Default)]
pub struct HotpOptions {
  /// Factor id; defaults to `"hotp"`.
  pub id:     Option<String>,
  /// OATH secret of up to 20 bytes; generated randomly when absent.
  pub secret: Option<Vec<u8>>,
  /// Number of code digits (6-8); defaults to 6.
  pub digits: Option<u8>,
  /// Hash algorithm; defaults to SHA-1.
  pub hash:   Option<OtpHash>,
  /// Issuer name for the enrollment output.
  pub issuer: Option<String>,
  /// Account label for the enrollment output.
  pub label:  Option<String>,
}

/// HOTP factor state.
///
/// `secret` is the OATH secret whitened to 32 bytes with random trailing
/// bytes, the exact width [`crypto::seal_secret`] works on; the first 20
/// bytes are the effective OATH secret.
#[derive(Clone)]
pub struct Hotp {
  pub(crate) secret: [u8; 32],
  pub(crate) digits: u8,
  pub(crate) hash:   OtpHash,
  pub(crate) issuer: String,
  pub(crate) label:  String,
  pub(crate) params: Option<HotpParams>,
  pub(crate) code:   u32,
  pub(crate) target: u32,
}

impl Drop for Hotp {
  fn drop(&mut self) { self.secret.zeroize(); }
}

/// Public parameters for the HOTP factor.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HotpParams {
  /// Hash algorithm used by the authenticator.
  pub hash:    OtpHash,
  /// Number of code digits.
  pub digits:  u8,
  /// Base64-encoded OATH secret, sealed under the derived key.
  pub pad:     String,
  /// Current HOTP counter.
  pub counter: u64,
  /// `target - code(counter)` modulo `10^digits`.
  pub offset:  u32,
}

#[inline]
pub(crate) fn mod_positive(n: i64, m: i64) -> i64 { ((n % m) + m) % m }

impl FactorMetadata for Hotp {
  fn data(&self) -> Vec<u8> { self.target.to_be_bytes().to_vec() }

  fn kind(&self) -> &'static str { "hotp" }
}

impl FactorSetup for Hotp {
  fn params(&self, key: &[u8]) -> MFKDFResult<Value> {
    let modulus = 10_i64.pow(u32::from(self.digits));
    let code = otp_code(&self.secret[..20], defaults::hotp::COUNTER, self.hash, self.digits);
    let offset = mod_positive(i64::from(self.target) - i64::from(code), modulus) as u32;

    let pad = crypto::seal_secret(&self.secret, &crypto::aes_key(key));

    Ok(serde_json::to_value(HotpParams {
      hash: self.hash,
      digits: self.digits,
      pad: general_purpose::STANDARD.encode(pad),
      counter: defaults::hotp::COUNTER,
      offset,
    })?)
  }

  fn output(&self) -> Value {
    serde_json::json!({
      "scheme": "otpauth",
      "type": "hotp",
      "secret": hex::encode(&self.secret[..20]),
      "issuer": self.issuer,
      "label": self.label,
      "algorithm": self.hash.to_string(),
      "digits": self.digits,
      "counter": defaults::hotp::COUNTER,
    })
  }
}

/// HOTP factor construction for setup.
///
/// The output exposes the OATH secret and its enrollment metadata so the
/// caller can provision an authenticator app; the policy itself only ever
/// stores the sealed copy.
pub fn hotp(options: HotpOptions) -> MFKDFResult<MFKDFFactor> {
  if let Some(ref id) = options.id
    && id.is_empty()
  {
    return Err(MFKDFError::InvalidArgument("factor id must not be empty".to_string()));
  }

  let digits = options.digits.unwrap_or(defaults::hotp::DIGITS);
  if !(6..=8).contains(&digits) {
    return Err(MFKDFError::InvalidArgument("hotp digits must be between 6 and 8".to_string()));
  }

  if let Some(ref secret) = options.secret
    && (secret.is_empty() || secret.len() > 20)
  {
    return Err(MFKDFError::InvalidArgument(
      "hotp secret must be between 1 and 20 bytes".to_string(),
    ));
  }

  // whiten to 32 bytes; the first 20 bytes are the effective OATH secret
  let mut whitened = [0u8; 32];
  match options.secret {
    Some(ref secret) => {
      whitened[..secret.len()].copy_from_slice(secret);
      rng::fill_bytes(&mut whitened[secret.len()..]);
    },
    None => rng::fill_bytes(&mut whitened),
  }

  let target = rng::gen_range_u32(10_u32.pow(u32::from(digits)));

  Ok(MFKDFFactor {
    id:          options.id.unwrap_or_else(|| defaults::hotp::ID.to_string()),
    factor_type: FactorType::Hotp(Hotp {
      secret: whitened,
      digits,
      hash: options.hash.unwrap_or(defaults::hotp::HASH),
      issuer: options.issuer.unwrap_or_else(|| defaults::hotp::ISSUER.to_string()),
      label: options.label.unwrap_or_else(|| defaults::hotp::LABEL.to_string()),
      params: None,
      code: 0,
      target,
    }),
    entropy:     Some(f64::from(digits) * 10.0_f64.log2()),
  })
}
