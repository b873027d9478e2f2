//! Security question factor.

use serde_json::{Value, json};
use zeroize::Zeroize;
use zxcvbn::zxcvbn;

use crate::{
  defaults,
  definitions::{FactorMetadata, FactorType, MFKDFFactor},
  error::{MFKDFError, MFKDFResult},
  setup::FactorSetup,
};

/// Options for the security question factor.
#[derive(Clone, Debug, Default)]
pub struct QuestionOptions {
  /// Factor id; defaults to `"question"`.
  pub id:       Option<String>,
  /// The question text, stored in the public params as a prompt.
  pub question: Option<String>,
}

/// Security question factor state.
#[derive(Clone)]
pub struct Question {
  pub(crate) answer:   String,
  pub(crate) question: String,
}

impl Drop for Question {
  fn drop(&mut self) { self.answer.zeroize(); }
}

impl FactorMetadata for Question {
  fn data(&self) -> Vec<u8> { self.answer.as_bytes().to_vec() }

  fn kind(&self) -> &'static str { "question" }
}

impl FactorSetup for Question {
  fn params(&self, _key: &[u8]) -> MFKDFResult<Value> {
    Ok(json!({ "question": self.question }))
  }

  fn output(&self) -> Value {
    let strength = zxcvbn(&self.answer, &[]);
    json!({
      "strength": {
        "guesses": strength.guesses(),
        "guesses_log10": strength.guesses_log10(),
      }
    })
  }
}

/// Normalizes an answer so that capitalization, punctuation, and spacing do
/// not change the derived material.
pub(crate) fn normalize(answer: &str) -> String {
  answer.to_lowercase().chars().filter(|c| c.is_alphanumeric()).collect()
}

/// Security question factor construction for setup.
pub fn question(answer: impl Into<String>, options: QuestionOptions) -> MFKDFResult<MFKDFFactor> {
  let answer = answer.into();
  if let Some(ref id) = options.id
    && id.is_empty()
  {
    return Err(MFKDFError::InvalidArgument("factor id must not be empty".to_string()));
  }

  let answer = normalize(&answer);
  if answer.is_empty() {
    return Err(MFKDFError::InvalidArgument("answer cannot be empty".to_string()));
  }

  let strength = zxcvbn(&answer, &[]);

  Ok(MFKDFFactor {
    id:          options.id.unwrap_or_else(|| defaults::question::ID.to_string()),
    factor_type: FactorType::Question(Question {
      answer,
      question: options.question.unwrap_or_default(),
    }),
    entropy:     Some((strength.guesses() as f64).log2()),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn construction() {
    let factor = question("Fido", QuestionOptions {
      id:       None,
      question: Some("What was your first pet's name?".to_string()),
    })
    .unwrap();
    assert_eq!(factor.id, "question");
    assert_eq!(factor.kind(), "question");
    assert_eq!(factor.data(), b"fido");

    let params = factor.factor_type.params(&[0u8; 32]).unwrap();
    assert_eq!(params["question"], "What was your first pet's name?");
  }

  #[test]
  fn answer_normalization() {
    let factor =
      question("  My answer is... 'Test 123!' ", QuestionOptions::default()).unwrap();
    assert_eq!(factor.data(), b"myansweristest123");
  }

  #[test]
  fn normalization_makes_variants_equal() {
    let a = question("Blue! No, Yellow!", QuestionOptions::default()).unwrap();
    let b = question("bluenoyellow", QuestionOptions::default()).unwrap();
    assert_eq!(a.data(), b.data());
  }

  #[test]
  fn empty_answer_rejected() {
    assert!(matches!(
      question("", QuestionOptions::default()),
      Err(MFKDFError::InvalidArgument(_))
    ));
    // normalization can empty an answer out entirely
    assert!(matches!(
      question("?!...", QuestionOptions::default()),
      Err(MFKDFError::InvalidArgument(_))
    ));
  }

  #[test]
  fn empty_id_rejected() {
    assert!(matches!(
      question("fido", QuestionOptions { id: Some(String::new()), question: None }),
      Err(MFKDFError::InvalidArgument(_))
    ));
  }
}
