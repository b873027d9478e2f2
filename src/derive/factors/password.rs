//! Password factor derive phase.

use serde_json::Value;

use crate::{
  defaults,
  definitions::{FactorType, MFKDFFactor},
  derive::{FactorDerive, ParamsAction},
  error::{MFKDFError, MFKDFResult},
  setup::factors::password::Password,
};

impl FactorDerive for Password {
  fn include_params(&mut self, _params: &Value) -> MFKDFResult<()> { Ok(()) }

  fn next_params(&self, _key: &[u8]) -> MFKDFResult<ParamsAction> { Ok(ParamsAction::Keep) }
}

/// Password factor construction for derive.
pub fn password(password: &str) -> MFKDFResult<MFKDFFactor> {
  if password.is_empty() {
    return Err(MFKDFError::InvalidArgument("password cannot be empty".to_string()));
  }

  Ok(MFKDFFactor {
    id:          defaults::password::ID.to_string(),
    factor_type: FactorType::Password(Password { password: password.to_string() }),
    entropy:     None,
  })
}
