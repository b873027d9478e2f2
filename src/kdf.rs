//! Pluggable key derivation engine.
//!
//! A single [`kdf`] entrypoint maps the combined secret to the final key
//! using whichever algorithm the policy selects. The [`KdfSpec`] tagged
//! union is embedded verbatim in the policy document, so its serde
//! representation is part of the wire format.

use argon2::{Algorithm, Argon2, Params, Version};
use pbkdf2::pbkdf2_hmac;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest as _, Sha256, Sha384, Sha512};

use crate::{
  crypto,
  error::{MFKDFError, MFKDFResult},
};

/// Digest selector for the PBKDF2 algorithm.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Pbkdf2Digest {
  /// SHA-1
  Sha1,
  /// SHA-256
  Sha256,
  /// SHA-384
  Sha384,
  /// SHA-512
  Sha512,
}

/// KDF algorithm selection plus its parameters, as stored in the policy.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KdfSpec {
  /// PBKDF2 over the selected digest.
  Pbkdf2 {
    /// Iteration count.
    rounds: u32,
    /// Underlying digest.
    digest: Pbkdf2Digest,
  },
  /// Bcrypt. The input is SHA-256 pre-hashed and the resulting hash string
  /// is re-expanded with HKDF-SHA256 to the requested key size.
  Bcrypt {
    /// Bcrypt cost factor (log2 of the iteration count).
    rounds: u32,
  },
  /// Scrypt.
  Scrypt {
    /// CPU/memory cost N; must be a power of two greater than 1.
    cost:        u32,
    /// Block size r.
    blocksize:   u32,
    /// Parallelism p.
    parallelism: u32,
  },
  /// Argon2i (version 0x13).
  Argon2i {
    /// Iteration count t.
    time:        u32,
    /// Memory cost in KiB.
    memory:      u32,
    /// Lanes p.
    parallelism: u32,
  },
  /// Argon2d (version 0x13).
  Argon2d {
    /// Iteration count t.
    time:        u32,
    /// Memory cost in KiB.
    memory:      u32,
    /// Lanes p.
    parallelism: u32,
  },
  /// Argon2id (version 0x13).
  Argon2id {
    /// Iteration count t.
    time:        u32,
    /// Memory cost in KiB.
    memory:      u32,
    /// Lanes p.
    parallelism: u32,
  },
}

impl Default for KdfSpec {
  fn default() -> Self {
    KdfSpec::Argon2id {
      time:        crate::defaults::kdf::argon2::TIME,
      memory:      crate::defaults::kdf::argon2::MEMORY,
      parallelism: crate::defaults::kdf::argon2::PARALLELISM,
    }
  }
}

impl KdfSpec {
  /// PBKDF2 with its default parameters (310000 rounds, SHA-256).
  pub fn pbkdf2() -> Self {
    KdfSpec::Pbkdf2 {
      rounds: crate::defaults::kdf::pbkdf2::ROUNDS,
      digest: crate::defaults::kdf::pbkdf2::DIGEST,
    }
  }

  /// Bcrypt with its default cost factor (10).
  pub fn bcrypt() -> Self { KdfSpec::Bcrypt { rounds: crate::defaults::kdf::bcrypt::ROUNDS } }

  /// Scrypt with its default parameters (N = 16384, r = 8, p = 1).
  pub fn scrypt() -> Self {
    KdfSpec::Scrypt {
      cost:        crate::defaults::kdf::scrypt::COST,
      blocksize:   crate::defaults::kdf::scrypt::BLOCKSIZE,
      parallelism: crate::defaults::kdf::scrypt::PARALLELISM,
    }
  }

  /// Short algorithm tag, as serialized into the policy.
  pub fn kind(&self) -> &'static str {
    match self {
      KdfSpec::Pbkdf2 { .. } => "pbkdf2",
      KdfSpec::Bcrypt { .. } => "bcrypt",
      KdfSpec::Scrypt { .. } => "scrypt",
      KdfSpec::Argon2i { .. } => "argon2i",
      KdfSpec::Argon2d { .. } => "argon2d",
      KdfSpec::Argon2id { .. } => "argon2id",
    }
  }

  /// Checks that the parameters are well-formed for the declared algorithm.
  pub fn validate(&self) -> MFKDFResult<()> {
    match self {
      KdfSpec::Pbkdf2 { rounds, .. } =>
        if *rounds == 0 {
          return Err(MFKDFError::InvalidArgument("pbkdf2 rounds must be positive".to_string()));
        },
      KdfSpec::Bcrypt { rounds } =>
        if !(4..=31).contains(rounds) {
          return Err(MFKDFError::InvalidArgument(
            "bcrypt rounds must be between 4 and 31".to_string(),
          ));
        },
      KdfSpec::Scrypt { cost, blocksize, parallelism } => {
        if *cost < 2 || !cost.is_power_of_two() {
          return Err(MFKDFError::InvalidArgument(
            "scrypt cost must be a power of two greater than 1".to_string(),
          ));
        }
        if *blocksize == 0 || *parallelism == 0 {
          return Err(MFKDFError::InvalidArgument(
            "scrypt blocksize and parallelism must be positive".to_string(),
          ));
        }
      },
      KdfSpec::Argon2i { time, memory, parallelism }
      | KdfSpec::Argon2d { time, memory, parallelism }
      | KdfSpec::Argon2id { time, memory, parallelism } => {
        if *time == 0 || *parallelism == 0 {
          return Err(MFKDFError::InvalidArgument(
            "argon2 time and parallelism must be positive".to_string(),
          ));
        }
        if *memory < 8 * parallelism {
          return Err(MFKDFError::InvalidArgument(
            "argon2 memory must be at least 8 KiB per lane".to_string(),
          ));
        }
      },
    }
    Ok(())
  }
}

/// Derives `size` bytes from `input` and `salt` using the selected algorithm.
pub fn kdf(input: &[u8], salt: &[u8], size: usize, spec: &KdfSpec) -> MFKDFResult<Vec<u8>> {
  if size == 0 {
    return Err(MFKDFError::InvalidArgument("key size must be positive".to_string()));
  }
  spec.validate()?;

  let mut key = vec![0u8; size];
  match spec {
    KdfSpec::Pbkdf2 { rounds, digest } => match digest {
      Pbkdf2Digest::Sha1 => pbkdf2_hmac::<Sha1>(input, salt, *rounds, &mut key),
      Pbkdf2Digest::Sha256 => pbkdf2_hmac::<Sha256>(input, salt, *rounds, &mut key),
      Pbkdf2Digest::Sha384 => pbkdf2_hmac::<Sha384>(input, salt, *rounds, &mut key),
      Pbkdf2Digest::Sha512 => pbkdf2_hmac::<Sha512>(input, salt, *rounds, &mut key),
    },
    KdfSpec::Bcrypt { rounds } => key = bcrypt_kdf(input, salt, *rounds, size)?,
    KdfSpec::Scrypt { cost, blocksize, parallelism } => {
      let log_n = cost.trailing_zeros() as u8;
      let params = scrypt::Params::new(log_n, *blocksize, *parallelism, size)
        .map_err(|e| MFKDFError::KdfFailure(e.to_string()))?;
      scrypt::scrypt(input, salt, &params, &mut key)
        .map_err(|e| MFKDFError::KdfFailure(e.to_string()))?;
    },
    KdfSpec::Argon2i { time, memory, parallelism } =>
      argon2_kdf(Algorithm::Argon2i, input, salt, *time, *memory, *parallelism, &mut key)?,
    KdfSpec::Argon2d { time, memory, parallelism } =>
      argon2_kdf(Algorithm::Argon2d, input, salt, *time, *memory, *parallelism, &mut key)?,
    KdfSpec::Argon2id { time, memory, parallelism } =>
      argon2_kdf(Algorithm::Argon2id, input, salt, *time, *memory, *parallelism, &mut key)?,
  }
  Ok(key)
}

fn argon2_kdf(
  algorithm: Algorithm,
  input: &[u8],
  salt: &[u8],
  time: u32,
  memory: u32,
  parallelism: u32,
  key: &mut [u8],
) -> MFKDFResult<()> {
  let params = Params::new(memory, time, parallelism, Some(key.len()))?;
  Argon2::new(algorithm, Version::V0x13, params).hash_password_into(input, salt, key)?;
  Ok(())
}

/// Bcrypt takes at most 72 input bytes, a fixed 16-byte salt, and emits a
/// fixed-width hash. The input is pre-hashed to lowercase hex SHA-256 and the
/// bcrypt salt is the first 16 bytes of `sha256(salt)`. The `$2a$` hash
/// string is then hashed with SHA-256 and truncated when `size` fits in one
/// digest, or re-expanded from that digest with HKDF-SHA256 (salted by the
/// KDF salt) when it does not.
fn bcrypt_kdf(input: &[u8], salt: &[u8], rounds: u32, size: usize) -> MFKDFResult<Vec<u8>> {
  let input_hash = hex::encode(Sha256::digest(input));
  let mut bcrypt_salt = [0u8; 16];
  bcrypt_salt.copy_from_slice(&Sha256::digest(salt)[..16]);

  let hash = bcrypt::hash_with_salt(input_hash.as_bytes(), rounds, bcrypt_salt)?
    .format_for_version(bcrypt::Version::TwoA);
  let digest = Sha256::digest(hash.as_bytes());

  if size <= digest.len() {
    Ok(digest[..size].to_vec())
  } else {
    crypto::hkdf_sha256(&digest, salt, size)
  }
}
