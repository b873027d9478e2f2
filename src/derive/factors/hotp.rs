//! HOTP factor derive phase.
//!
//! The witness is the numeric code currently displayed by the authenticator.
//! Adding it to the stored offset reconstructs the stable target value; the
//! post-derivation hook opens the sealed OATH secret with the fresh key,
//! advances the counter, and rotates a new offset into the policy.

use base64::{Engine, engine::general_purpose};
use serde_json::Value;
use zeroize::Zeroize;

use crate::{
  crypto, defaults,
  definitions::{FactorType, MFKDFFactor},
  derive::{FactorDerive, ParamsAction},
  error::{MFKDFError, MFKDFResult},
  otp::otp_code,
  setup::factors::hotp::{Hotp, HotpParams, mod_positive},
};

impl FactorDerive for Hotp {
  /// Stores the policy params and reconstructs the target from the supplied
  /// code.
  fn include_params(&mut self, params: &Value) -> MFKDFResult<()> {
    let params: HotpParams = serde_json::from_value(params.clone())?;

    let modulus = 10_u32.pow(u32::from(params.digits));
    self.target = (params.offset + self.code % modulus) % modulus;
    self.digits = params.digits;
    self.hash = params.hash;
    self.params = Some(params);
    Ok(())
  }

  /// Opens the sealed OATH secret and re-encodes the offset for the
  /// incremented counter.
  fn next_params(&self, key: &[u8]) -> MFKDFResult<ParamsAction> {
    let params = self.params.as_ref().ok_or_else(|| {
      MFKDFError::InvalidArgument("hotp derive factor was not given policy params".to_string())
    })?;

    let sealed: [u8; 32] = general_purpose::STANDARD
      .decode(&params.pad)?
      .try_into()
      .map_err(|_| MFKDFError::InvalidPolicy("hotp pad must be 32 bytes".to_string()))?;
    let mut secret = crypto::open_secret(&sealed, &crypto::aes_key(key));

    let counter = params.counter + 1;
    let code = otp_code(&secret[..20], counter, params.hash, params.digits);
    secret.zeroize();

    let modulus = 10_i64.pow(u32::from(params.digits));
    let offset = mod_positive(i64::from(self.target) - i64::from(code), modulus) as u32;

    Ok(ParamsAction::Rotate(serde_json::to_value(HotpParams {
      hash: params.hash,
      digits: params.digits,
      pad: params.pad.clone(),
      counter,
      offset,
    })?))
  }
}

/// HOTP factor construction for derive.
///
/// `code` is the one-time password currently displayed by the authenticator
/// paired with the secret from setup.
pub fn hotp(code: u32) -> MFKDFResult<MFKDFFactor> {
  Ok(MFKDFFactor {
    id:          defaults::hotp::ID.to_string(),
    factor_type: FactorType::Hotp(Hotp {
      secret: [0u8; 32],
      digits: defaults::hotp::DIGITS,
      hash:   defaults::hotp::HASH,
      issuer: defaults::hotp::ISSUER.to_string(),
      label:  defaults::hotp::LABEL.to_string(),
      params: None,
      code,
      target: 0,
    }),
    entropy:     None,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    definitions::FactorMetadata,
    setup::{FactorSetup, factors::hotp::HotpOptions},
  };

  const SECRET: &[u8; 20] = b"hello world mfkdf!!!";

  #[test]
  fn code_reconstructs_target() {
    let setup =
      crate::setup::factors::hotp(HotpOptions { secret: Some(SECRET.to_vec()), ..Default::default() })
        .unwrap();
    let key = [42u8; 32];
    let params = setup.factor_type.params(&key).unwrap();
    let parsed: HotpParams = serde_json::from_value(params.clone()).unwrap();

    // the code a paired authenticator would show for this counter
    let code = otp_code(SECRET, parsed.counter, parsed.hash, parsed.digits);

    let mut derive = hotp(code).unwrap();
    derive.factor_type.include_params(&params).unwrap();
    assert_eq!(derive.data(), setup.data());
  }

  #[test]
  fn rotation_increments_counter_and_keeps_pad() {
    let setup =
      crate::setup::factors::hotp(HotpOptions { secret: Some(SECRET.to_vec()), ..Default::default() })
        .unwrap();
    let key = [42u8; 32];
    let params = setup.factor_type.params(&key).unwrap();
    let parsed: HotpParams = serde_json::from_value(params.clone()).unwrap();

    let code = otp_code(SECRET, parsed.counter, parsed.hash, parsed.digits);
    let mut derive = hotp(code).unwrap();
    derive.factor_type.include_params(&params).unwrap();

    let rotated = match derive.factor_type.next_params(&key).unwrap() {
      ParamsAction::Rotate(value) => value,
      _ => panic!("hotp must rotate its params"),
    };
    let rotated: HotpParams = serde_json::from_value(rotated).unwrap();
    assert_eq!(rotated.counter, parsed.counter + 1);
    assert_eq!(rotated.pad, parsed.pad);
    assert_eq!(rotated.digits, parsed.digits);

    // the rotated offset reconstructs the same target from the next code
    let next_code = otp_code(SECRET, rotated.counter, rotated.hash, rotated.digits);
    let target = u32::from_be_bytes(setup.data().try_into().unwrap());
    assert_eq!(target, (rotated.offset + next_code) % 1_000_000);
  }

  #[test]
  fn malformed_params_rejected() {
    let mut derive = hotp(123456).unwrap();
    let result = derive.factor_type.include_params(&serde_json::json!({ "digits": 6 }));
    assert!(matches!(result, Err(MFKDFError::InvalidPolicy(_))));
  }

  #[test]
  fn next_params_without_include_rejected() {
    let derive = hotp(123456).unwrap();
    assert!(matches!(
      derive.factor_type.next_params(&[0u8; 32]),
      Err(MFKDFError::InvalidArgument(_))
    ));
  }
}
