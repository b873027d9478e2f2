//! Core data model: factors, options, entropy, and derived keys.

mod derived_key;
mod entropy;
pub mod factor;

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

pub use derived_key::MFKDFDerivedKey;
pub use entropy::MFKDFEntropy;
pub use factor::{FactorMetadata, FactorType, MFKDFFactor};

use crate::kdf::KdfSpec;

/// Options for setting up a key.
#[derive(Clone, Default)]
pub struct MFKDFOptions {
  /// ID of the policy. If not provided, a random UUIDv4 is generated.
  pub id:        Option<String>,
  /// Key size in bytes. Defaults to 32.
  pub size:      Option<usize>,
  /// Threshold number of factors needed to derive the key.
  /// Defaults to the number of factors (n-of-n).
  pub threshold: Option<u8>,
  /// `size`-byte salt for key derivation. If not provided, a random salt is
  /// generated.
  pub salt:      Option<Vec<u8>>,
  /// KDF used to map the combined secret to the final key.
  /// Defaults to argon2id.
  pub kdf:       Option<KdfSpec>,
  /// Cooperative cancellation flag, polled between factor iterations.
  pub cancel:    Option<CancelFlag>,
}

/// Cooperative cancellation signal for a long-running setup or derivation.
///
/// Clones share the same flag. The orchestrators poll it between factor
/// iterations and abort with
/// [`MFKDFError::Cancelled`](crate::error::MFKDFError::Cancelled); a KDF
/// evaluation already in flight runs to completion first. No state is
/// persisted by the core, so cancellation never leaves a half-written
/// policy.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
  /// Creates a fresh, unsignalled flag.
  pub fn new() -> Self { Self::default() }

  /// Requests cancellation.
  pub fn cancel(&self) { self.0.store(true, Ordering::Relaxed); }

  /// Whether cancellation has been requested.
  pub fn is_cancelled(&self) -> bool { self.0.load(Ordering::Relaxed) }
}
