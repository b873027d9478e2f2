//! Error types for the MFKDF core.

/// Crate-wide result alias.
pub type MFKDFResult<T> = Result<T, MFKDFError>;

/// Errors surfaced by setup, derivation, and the layers underneath them.
///
/// Validation is eager at both entry points; missing factors are not an error
/// until the threshold check, so partial factor maps are fine.
#[derive(thiserror::Error, Debug)]
pub enum MFKDFError {
  /// Policy schema violation or structural inconsistency.
  #[error("invalid policy: {0}")]
  InvalidPolicy(String),

  /// Bad option type or range (non-positive size, empty id, duplicate factor ids, ...).
  #[error("invalid argument: {0}")]
  InvalidArgument(String),

  /// Fewer than `threshold` valid factor materials were supplied.
  #[error("insufficient shares: {supplied} of {threshold} required factors present")]
  InsufficientShares {
    /// Number of usable factor materials supplied.
    supplied:  usize,
    /// Threshold the policy requires.
    threshold: usize,
  },

  /// A supplied factor's type does not match the policy slot it was supplied for.
  #[error("factor type mismatch for \"{id}\": policy expects {expected}, got {supplied}")]
  FactorTypeMismatch {
    /// Factor id of the policy slot.
    id:       String,
    /// Type recorded in the policy.
    expected: String,
    /// Type of the material that was supplied.
    supplied: String,
  },

  /// An underlying KDF primitive failed.
  #[error("kdf failure: {0}")]
  KdfFailure(String),

  /// Cooperative cancellation was observed between factor iterations.
  #[error("operation cancelled")]
  Cancelled,
}

impl From<base64::DecodeError> for MFKDFError {
  fn from(err: base64::DecodeError) -> Self { MFKDFError::InvalidPolicy(err.to_string()) }
}

impl From<serde_json::Error> for MFKDFError {
  fn from(err: serde_json::Error) -> Self { MFKDFError::InvalidPolicy(err.to_string()) }
}

impl From<argon2::Error> for MFKDFError {
  fn from(err: argon2::Error) -> Self { MFKDFError::KdfFailure(err.to_string()) }
}

impl From<bcrypt::BcryptError> for MFKDFError {
  fn from(err: bcrypt::BcryptError) -> Self { MFKDFError::KdfFailure(err.to_string()) }
}
