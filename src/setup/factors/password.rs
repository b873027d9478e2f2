//! Password factor.

use serde_json::{Value, json};
use zeroize::Zeroize;
use zxcvbn::zxcvbn;

use crate::{
  defaults,
  definitions::{FactorMetadata, FactorType, MFKDFFactor},
  error::{MFKDFError, MFKDFResult},
  setup::FactorSetup,
};

/// Options for the password factor.
#[derive(Clone, Debug, Default)]
pub struct PasswordOptions {
  /// Factor id; defaults to `"password"`.
  pub id: Option<String>,
}

/// Password factor state.
#[derive(Clone)]
pub struct Password {
  pub(crate) password: String,
}

impl Drop for Password {
  fn drop(&mut self) { self.password.zeroize(); }
}

impl FactorMetadata for Password {
  fn data(&self) -> Vec<u8> { self.password.as_bytes().to_vec() }

  fn kind(&self) -> &'static str { "password" }
}

impl FactorSetup for Password {
  fn params(&self, _key: &[u8]) -> MFKDFResult<Value> { Ok(json!({})) }

  fn output(&self) -> Value {
    let strength = zxcvbn(&self.password, &[]);
    json!({
      "strength": {
        "guesses": strength.guesses(),
        "guesses_log10": strength.guesses_log10(),
      }
    })
  }
}

/// Password factor construction for setup.
///
/// The password is used verbatim as factor material; its real entropy is
/// estimated with zxcvbn and reported through the derived key's entropy
/// summary.
pub fn password(password: &str, options: PasswordOptions) -> MFKDFResult<MFKDFFactor> {
  if password.is_empty() {
    return Err(MFKDFError::InvalidArgument("password cannot be empty".to_string()));
  }
  if let Some(ref id) = options.id
    && id.is_empty()
  {
    return Err(MFKDFError::InvalidArgument("factor id must not be empty".to_string()));
  }

  let strength = zxcvbn(password, &[]);

  Ok(MFKDFFactor {
    id:          options.id.unwrap_or_else(|| defaults::password::ID.to_string()),
    factor_type: FactorType::Password(Password { password: password.to_string() }),
    entropy:     Some((strength.guesses() as f64).log2()),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn construction() {
    let factor = password("hunter2", PasswordOptions::default()).unwrap();
    assert_eq!(factor.kind(), "password");
    assert_eq!(factor.id, "password");
    assert_eq!(factor.data(), b"hunter2");
    assert!(factor.entropy.is_some());
  }

  #[test]
  fn custom_id() {
    let factor =
      password("hunter2", PasswordOptions { id: Some("login".to_string()) }).unwrap();
    assert_eq!(factor.id, "login");
  }

  #[test]
  fn empty_password_rejected() {
    assert!(matches!(
      password("", PasswordOptions::default()),
      Err(MFKDFError::InvalidArgument(_))
    ));
  }

  #[test]
  fn empty_id_rejected() {
    assert!(matches!(
      password("hunter2", PasswordOptions { id: Some(String::new()) }),
      Err(MFKDFError::InvalidArgument(_))
    ));
  }

  #[test]
  fn stronger_password_reports_more_entropy() {
    let weak = password("password", PasswordOptions::default()).unwrap();
    let strong = password("98p23uijafjj--ah77yhfraklhjaza!?a3", PasswordOptions::default()).unwrap();
    assert!(strong.entropy.unwrap() > weak.entropy.unwrap());
  }

  #[test]
  fn params_are_empty() {
    let factor = password("hunter2", PasswordOptions::default()).unwrap();
    let params = factor.factor_type.params(&[0u8; 32]).unwrap();
    assert_eq!(params, serde_json::json!({}));
  }

  #[test]
  fn output_reports_strength() {
    let factor = password("hunter2", PasswordOptions::default()).unwrap();
    let output = factor.factor_type.output();
    assert!(output["strength"]["guesses"].is_number());
  }
}
