//! UUID factor derive phase.

use serde_json::Value;
use uuid::Uuid;

use crate::{
  defaults,
  definitions::{FactorType, MFKDFFactor},
  derive::{FactorDerive, ParamsAction},
  error::MFKDFResult,
  setup::factors::uuid::UuidFactor,
};

impl FactorDerive for UuidFactor {
  fn include_params(&mut self, _params: &Value) -> MFKDFResult<()> { Ok(()) }

  fn next_params(&self, _key: &[u8]) -> MFKDFResult<ParamsAction> { Ok(ParamsAction::Keep) }
}

/// UUID factor construction for derive.
pub fn uuid(uuid: Uuid) -> MFKDFResult<MFKDFFactor> {
  Ok(MFKDFFactor {
    id:          defaults::uuid::ID.to_string(),
    factor_type: FactorType::Uuid(UuidFactor { uuid }),
    entropy:     None,
  })
}
