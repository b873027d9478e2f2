//! Security question factor derive phase.

use serde_json::Value;

use crate::{
  defaults,
  definitions::{FactorType, MFKDFFactor},
  derive::{FactorDerive, ParamsAction},
  error::{MFKDFError, MFKDFResult},
  setup::factors::question::{Question, normalize},
};

impl FactorDerive for Question {
  fn include_params(&mut self, params: &Value) -> MFKDFResult<()> {
    // the stored question text is a prompt only; the material is the answer
    if let Some(question) = params.get("question").and_then(Value::as_str) {
      self.question = question.to_string();
    }
    Ok(())
  }

  fn next_params(&self, _key: &[u8]) -> MFKDFResult<ParamsAction> { Ok(ParamsAction::Keep) }
}

/// Security question factor construction for derive.
///
/// The answer is normalized the same way as at setup, so capitalization and
/// punctuation differences do not prevent derivation.
pub fn question(answer: impl Into<String>) -> MFKDFResult<MFKDFFactor> {
  let answer = normalize(&answer.into());
  if answer.is_empty() {
    return Err(MFKDFError::InvalidArgument("answer cannot be empty".to_string()));
  }

  Ok(MFKDFFactor {
    id:          defaults::question::ID.to_string(),
    factor_type: FactorType::Question(Question { answer, question: String::new() }),
    entropy:     None,
  })
}
