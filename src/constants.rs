//! Constants for the MFKDF core.

/// JSON schema identifier carried by (and required of) every policy document.
pub const POLICY_SCHEMA: &str = "https://mfkdf.com/schema/v1.0.0/policy.json";

/// Reduction polynomial of the GF(2⁸) secret sharing field,
/// x⁸ + x⁴ + x³ + x + 1.
pub const SECRET_SHARING_POLY: u16 = 0x11B;
