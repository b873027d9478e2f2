//! Recovery UUID factor.

use serde_json::{Value, json};
pub use uuid::Uuid;

use crate::{
  defaults,
  definitions::{FactorMetadata, FactorType, MFKDFFactor},
  error::{MFKDFError, MFKDFResult},
  setup::FactorSetup,
};

/// Options for the UUID factor.
#[derive(Clone, Debug, Default)]
pub struct UuidOptions {
  /// Factor id; defaults to `"uuid"`.
  pub id:   Option<String>,
  /// The UUID to use; a fresh v4 is generated when absent.
  pub uuid: Option<Uuid>,
}

/// UUID factor state.
#[derive(Clone)]
pub struct UuidFactor {
  pub(crate) uuid: Uuid,
}

impl FactorMetadata for UuidFactor {
  fn data(&self) -> Vec<u8> { self.uuid.as_bytes().to_vec() }

  fn kind(&self) -> &'static str { "uuid" }
}

impl FactorSetup for UuidFactor {
  fn params(&self, _key: &[u8]) -> MFKDFResult<Value> { Ok(json!({})) }

  fn output(&self) -> Value { json!({ "uuid": self.uuid }) }
}

/// UUID factor construction for setup.
///
/// When no UUID is supplied a random v4 is generated and returned through the
/// factor output, so the caller can show it to the user once as a recovery
/// code.
pub fn uuid(options: UuidOptions) -> MFKDFResult<MFKDFFactor> {
  if let Some(ref id) = options.id
    && id.is_empty()
  {
    return Err(MFKDFError::InvalidArgument("factor id must not be empty".to_string()));
  }

  let uuid = options.uuid.unwrap_or_else(Uuid::new_v4);

  Ok(MFKDFFactor {
    id:          options.id.unwrap_or_else(|| defaults::uuid::ID.to_string()),
    factor_type: FactorType::Uuid(UuidFactor { uuid }),
    entropy:     Some(defaults::uuid::ENTROPY),
  })
}
