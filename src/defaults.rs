//! Default values for the KDF engine and the factor constructors, collected
//! in one place so setup options, policy validation, and the factor modules
//! agree on them.

/// Default values for the KDF engine.
pub(crate) mod kdf {
  /// Default key size in bytes.
  pub(crate) const SIZE: usize = 32;

  /// Defaults for the PBKDF2 algorithm.
  pub(crate) mod pbkdf2 {
    use crate::kdf::Pbkdf2Digest;

    /// Default PBKDF2 iteration count.
    pub(crate) const ROUNDS: u32 = 310_000;

    /// Default PBKDF2 digest.
    pub(crate) const DIGEST: Pbkdf2Digest = Pbkdf2Digest::Sha256;
  }

  /// Defaults for the bcrypt algorithm.
  pub(crate) mod bcrypt {
    /// Default bcrypt cost factor.
    pub(crate) const ROUNDS: u32 = 10;
  }

  /// Defaults for the scrypt algorithm.
  pub(crate) mod scrypt {
    /// Default scrypt cost N.
    pub(crate) const COST: u32 = 16384;

    /// Default scrypt block size r.
    pub(crate) const BLOCKSIZE: u32 = 8;

    /// Default scrypt parallelism p.
    pub(crate) const PARALLELISM: u32 = 1;
  }

  /// Defaults for the argon2 family.
  pub(crate) mod argon2 {
    /// Default argon2 iteration count.
    pub(crate) const TIME: u32 = 2;

    /// Default argon2 memory cost in KiB.
    pub(crate) const MEMORY: u32 = 24576;

    /// Default argon2 parallelism.
    pub(crate) const PARALLELISM: u32 = 1;
  }
}

/// Default values for Password factor configuration.
pub(crate) mod password {
  /// Default factor identifier for Password.
  pub(crate) const ID: &str = "password";
}

/// Default values for UUID factor configuration.
pub(crate) mod uuid {
  /// Default factor identifier for UUID.
  pub(crate) const ID: &str = "uuid";

  /// Default entropy for UUID factor (122 bits for UUID v4).
  pub(crate) const ENTROPY: f64 = 122.0;
}

/// Default values for Question factor configuration.
pub(crate) mod question {
  /// Default factor identifier for Question.
  pub(crate) const ID: &str = "question";
}

/// Default values for HMACSHA1 factor configuration.
pub(crate) mod hmacsha1 {
  /// Default factor identifier for HMACSHA1.
  pub(crate) const ID: &str = "hmacsha1";

  /// Default entropy for HMACSHA1 factor (160 bits for 20-byte secret).
  pub(crate) const ENTROPY: f64 = 160.0;
}

/// Default values for HOTP factor configuration.
pub(crate) mod hotp {
  use crate::otp::OtpHash;

  /// Default factor identifier for HOTP.
  pub(crate) const ID: &str = "hotp";

  /// Default number of digits in HOTP codes (6-8 are valid).
  pub(crate) const DIGITS: u8 = 6;

  /// Default hash algorithm for HOTP generation.
  pub(crate) const HASH: OtpHash = OtpHash::Sha1;

  /// Default issuer name for HOTP credentials.
  pub(crate) const ISSUER: &str = "MFKDF";

  /// Default label for HOTP credentials.
  pub(crate) const LABEL: &str = "mfkdf.com";

  /// Default HOTP counter value.
  pub(crate) const COUNTER: u64 = 1;
}

/// Default values for Persisted factor configuration.
pub(crate) mod persisted {
  /// Default factor identifier for Persisted.
  pub(crate) const ID: &str = "persisted";
}
