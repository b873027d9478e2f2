//! Persisted-share factor derive phase.
//!
//! Persistence allows one or more of the factors behind a key to be saved
//! directly as a raw share (for example in a browser cookie or a recovery
//! file) so the factor itself does not need to be presented on this device
//! again. The orchestrator consumes the share as-is, bypassing stretching.

use serde_json::{Value, json};
use zeroize::Zeroize;

use crate::{
  defaults,
  definitions::{FactorMetadata, FactorType, MFKDFFactor},
  derive::{FactorDerive, ParamsAction},
  error::{MFKDFError, MFKDFResult},
  setup::FactorSetup,
};

/// Persisted share factor state.
#[derive(Clone)]
pub struct Persisted {
  pub(crate) share: Vec<u8>,
}

impl Drop for Persisted {
  fn drop(&mut self) { self.share.zeroize(); }
}

impl FactorMetadata for Persisted {
  fn data(&self) -> Vec<u8> { self.share.clone() }

  fn kind(&self) -> &'static str { "persisted" }
}

impl FactorSetup for Persisted {
  fn params(&self, _key: &[u8]) -> MFKDFResult<Value> { Ok(json!({})) }

  fn output(&self) -> Value { json!({}) }
}

impl FactorDerive for Persisted {
  fn include_params(&mut self, _params: &Value) -> MFKDFResult<()> { Ok(()) }

  fn next_params(&self, _key: &[u8]) -> MFKDFResult<ParamsAction> { Ok(ParamsAction::Keep) }
}

/// Persisted-share factor construction for derive.
///
/// `share` is a raw share previously exported with
/// [`MFKDFDerivedKey::persist_factor`](crate::definitions::MFKDFDerivedKey::persist_factor).
/// It can stand in for any policy slot, regardless of the slot's factor
/// type.
pub fn persisted(share: Vec<u8>) -> MFKDFResult<MFKDFFactor> {
  if share.is_empty() {
    return Err(MFKDFError::InvalidArgument("persisted share must not be empty".to_string()));
  }

  Ok(MFKDFFactor {
    id:          defaults::persisted::ID.to_string(),
    factor_type: FactorType::Persisted(Persisted { share }),
    entropy:     None,
  })
}
