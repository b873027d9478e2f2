//! OS-backed randomness for salts, secrets, and factor material.
//!
//! A handle to the operating system CSPRNG is taken on every call; the crate
//! holds no generator state between calls.

use rand::{RngCore, rngs::OsRng};

/// Fills `dst` with cryptographically secure random bytes.
pub(crate) fn fill_bytes(dst: &mut [u8]) { OsRng.fill_bytes(dst); }

/// Returns `len` cryptographically secure random bytes.
pub(crate) fn random_bytes(len: usize) -> Vec<u8> {
  let mut buf = vec![0u8; len];
  OsRng.fill_bytes(&mut buf);
  buf
}

/// Generates a random u32 below `max` (0 when `max` is 0), via multiply-shift
/// range reduction.
pub(crate) fn gen_range_u32(max: u32) -> u32 {
  ((u64::from(OsRng.next_u32()) * u64::from(max)) >> 32) as u32
}
