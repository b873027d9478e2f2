//! Factor model shared by the setup and derive pipelines.

use crate::{
  derive::factors::persisted::Persisted,
  setup::factors::{
    hmacsha1::HmacSha1, hotp::Hotp, password::Password, question::Question, uuid::UuidFactor,
  },
};

/// Trait for factor metadata.
pub trait FactorMetadata {
  /// Returns the bytes of the factor material.
  fn data(&self) -> Vec<u8>;
  /// Returns the type tag of the factor.
  fn kind(&self) -> &'static str;
}

/// An MFKDF factor instance.
///
/// A factor combines a secret piece of material (a password, a hardware token
/// response, an OTP code, a recovery UUID) with public state stored in the
/// policy. Its job is to turn dynamic user input into stable key material
/// that reproduces the same share across derivations.
///
/// Each factor has two constructors:
/// - setup (`crate::setup::factors`): creates the factor from its
///   configuration and full secret material;
/// - derive (`crate::derive::factors`): wraps a fresh witness (the current
///   password or OTP code) that is combined with the policy's stored params
///   to reproduce the material.
#[derive(Clone)]
pub struct MFKDFFactor {
  /// Identifier for the factor, unique within a policy.
  pub id:          String,
  /// Concrete factor implementation.
  pub factor_type: FactorType,
  /// Estimated real entropy of this factor instance, in bits.
  pub entropy:     Option<f64>,
}

impl MFKDFFactor {
  /// Type tag of the underlying factor.
  pub fn kind(&self) -> &'static str { self.factor_type.kind() }

  /// Current factor material bytes.
  pub fn data(&self) -> Vec<u8> { self.factor_type.data() }
}

impl std::fmt::Debug for MFKDFFactor {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MFKDFFactor")
      .field("kind", &self.kind())
      .field("id", &self.id)
      .field("data", &"<secret>")
      .field("entropy", &self.entropy)
      .finish()
  }
}

/// Factor type enum representing all supported authentication factors.
///
/// Every variant implements [`FactorMetadata`] plus the crate-internal setup
/// and derive contracts, which the orchestrators dispatch through this enum.
#[derive(Clone)]
pub enum FactorType {
  /// Knowledge factor: a password.
  Password(Password),
  /// Possession factor: a recovery UUID.
  Uuid(UuidFactor),
  /// Knowledge factor: a security question answer.
  Question(Question),
  /// Possession factor: an HMAC-SHA1 challenge-response token.
  HmacSha1(HmacSha1),
  /// Possession factor: an OATH HOTP authenticator.
  Hotp(Hotp),
  /// A raw previously-exported share (recovery path, derive only).
  Persisted(Persisted),
}

impl FactorMetadata for FactorType {
  fn data(&self) -> Vec<u8> {
    match self {
      FactorType::Password(password) => password.data(),
      FactorType::Uuid(uuid) => uuid.data(),
      FactorType::Question(question) => question.data(),
      FactorType::HmacSha1(hmacsha1) => hmacsha1.data(),
      FactorType::Hotp(hotp) => hotp.data(),
      FactorType::Persisted(persisted) => persisted.data(),
    }
  }

  fn kind(&self) -> &'static str {
    match self {
      FactorType::Password(password) => password.kind(),
      FactorType::Uuid(uuid) => uuid.kind(),
      FactorType::Question(question) => question.kind(),
      FactorType::HmacSha1(hmacsha1) => hmacsha1.kind(),
      FactorType::Hotp(hotp) => hotp.kind(),
      FactorType::Persisted(persisted) => persisted.kind(),
    }
  }
}
