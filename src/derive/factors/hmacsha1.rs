//! HMAC-SHA1 factor derive phase.
//!
//! The witness is the token's 20-byte response to the challenge stored in
//! the policy. Opening the stored pad under the response recovers the device
//! secret, which is the factor's stable material; a fresh challenge is
//! rotated in after the derivation succeeds.

use serde_json::Value;

use crate::{
  crypto, defaults,
  definitions::{FactorType, MFKDFFactor},
  derive::{FactorDerive, ParamsAction},
  error::{MFKDFError, MFKDFResult},
  setup::factors::hmacsha1::{HmacSha1, response_key},
};

impl FactorDerive for HmacSha1 {
  fn include_params(&mut self, params: &Value) -> MFKDFResult<()> {
    let response = self.response.ok_or_else(|| {
      MFKDFError::InvalidArgument("hmacsha1 derive factor is missing its response".to_string())
    })?;

    let pad = params
      .get("pad")
      .and_then(Value::as_str)
      .ok_or_else(|| MFKDFError::InvalidPolicy("hmacsha1 params are missing pad".to_string()))?;
    let sealed: [u8; 32] = hex::decode(pad)
      .map_err(|_| MFKDFError::InvalidPolicy("hmacsha1 pad is not valid hex".to_string()))?
      .try_into()
      .map_err(|_| MFKDFError::InvalidPolicy("hmacsha1 pad must be 32 bytes".to_string()))?;

    self.secret = crypto::open_secret(&sealed, &response_key(&response));
    Ok(())
  }

  fn next_params(&self, _key: &[u8]) -> MFKDFResult<ParamsAction> {
    Ok(ParamsAction::Rotate(self.challenge_params()))
  }
}

/// HMAC-SHA1 factor construction for derive.
///
/// `response` is the token's HMAC-SHA1 output for the challenge currently
/// stored in the policy params.
pub fn hmacsha1(response: [u8; 20]) -> MFKDFResult<MFKDFFactor> {
  Ok(MFKDFFactor {
    id:          defaults::hmacsha1::ID.to_string(),
    factor_type: FactorType::HmacSha1(HmacSha1 { secret: [0u8; 32], response: Some(response) }),
    entropy:     None,
  })
}
