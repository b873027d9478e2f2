//! HMAC-SHA1 challenge-response factor.
//!
//! Backed by hardware tokens (YubiKey HMAC-SHA1 slots and similar): the
//! policy stores a random challenge plus the device secret encrypted under
//! the expected response, so presenting the token's response to the current
//! challenge both proves possession and recovers the stable factor material.
//! A fresh challenge is rotated in after every successful derivation.

use hmac::{Hmac, Mac};
use serde_json::{Value, json};
use sha1::Sha1;
use zeroize::Zeroize;

use crate::{
  crypto, defaults,
  definitions::{FactorMetadata, FactorType, MFKDFFactor},
  error::{MFKDFError, MFKDFResult},
  rng,
  setup::FactorSetup,
};

/// Options for the HMAC-SHA1 factor.
#[derive(Clone, Default)]
pub struct HmacSha1Options {
  /// Factor id; defaults to `"hmacsha1"`.
  pub id:     Option<String>,
  /// 20-byte device secret; generated randomly when absent.
  pub secret: Option<Vec<u8>>,
}

/// HMAC-SHA1 factor state.
///
/// `secret` is the 20-byte device secret whitened to 32 bytes with random
/// trailing bytes, the exact width [`crypto::seal_secret`] works on.
#[derive(Clone)]
pub struct HmacSha1 {
  pub(crate) secret:   [u8; 32],
  pub(crate) response: Option<[u8; 20]>,
}

impl Drop for HmacSha1 {
  fn drop(&mut self) {
    self.secret.zeroize();
    if let Some(ref mut response) = self.response {
      response.zeroize();
    }
  }
}

/// HMAC-SHA1 response a token computes for a challenge.
pub(crate) fn respond(secret: &[u8], challenge: &[u8]) -> [u8; 20] {
  <Hmac<Sha1> as Mac>::new_from_slice(secret)
    .expect("HMAC accepts keys of any length")
    .chain_update(challenge)
    .finalize()
    .into_bytes()
    .into()
}

/// Widens a 20-byte token response into the 32-byte key that seals the
/// device secret.
pub(crate) fn response_key(response: &[u8; 20]) -> [u8; 32] {
  let mut key = [0u8; 32];
  key[..20].copy_from_slice(response);
  key
}

impl HmacSha1 {
  /// Builds fresh public params: a new random challenge plus the whitened
  /// secret sealed under the expected response.
  pub(crate) fn challenge_params(&self) -> Value {
    let mut challenge = [0u8; 64];
    rng::fill_bytes(&mut challenge);

    let response = respond(&self.secret[..20], &challenge);
    let pad = crypto::seal_secret(&self.secret, &response_key(&response));

    json!({
      "challenge": hex::encode(challenge),
      "pad": hex::encode(pad),
    })
  }
}

impl FactorMetadata for HmacSha1 {
  fn data(&self) -> Vec<u8> { self.secret[..20].to_vec() }

  fn kind(&self) -> &'static str { "hmacsha1" }
}

impl FactorSetup for HmacSha1 {
  fn params(&self, _key: &[u8]) -> MFKDFResult<Value> { Ok(self.challenge_params()) }

  fn output(&self) -> Value {
    json!({ "secret": hex::encode(&self.secret[..20]) })
  }
}

/// HMAC-SHA1 factor construction for setup.
pub fn hmacsha1(options: HmacSha1Options) -> MFKDFResult<MFKDFFactor> {
  if let Some(ref id) = options.id
    && id.is_empty()
  {
    return Err(MFKDFError::InvalidArgument("factor id must not be empty".to_string()));
  }
  if let Some(ref secret) = options.secret
    && secret.len() != 20
  {
    return Err(MFKDFError::InvalidArgument("hmacsha1 secret must be 20 bytes".to_string()));
  }

  let mut whitened = [0u8; 32];
  match options.secret {
    Some(ref secret) => whitened[..20].copy_from_slice(secret),
    None => rng::fill_bytes(&mut whitened[..20]),
  }
  rng::fill_bytes(&mut whitened[20..]);

  Ok(MFKDFFactor {
    id:          options.id.unwrap_or_else(|| defaults::hmacsha1::ID.to_string()),
    factor_type: FactorType::HmacSha1(HmacSha1 { secret: whitened, response: None }),
    entropy:     Some(defaults::hmacsha1::ENTROPY),
  })
}
