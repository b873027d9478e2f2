//! Crypto helpers shared by the orchestrators and factor constructions.

use aes::{
  Aes256,
  cipher::{BlockDecrypt, BlockEncrypt, KeyInit, generic_array::GenericArray},
};
use hkdf::Hkdf;
use sha2::{Sha256, Sha512};

use crate::error::{MFKDFError, MFKDFResult};

/// HKDF-SHA512 stretch of factor material to the policy key size: empty salt,
/// empty info, `size`-byte output.
pub(crate) fn stretch(data: &[u8], size: usize) -> MFKDFResult<Vec<u8>> {
  let hk = Hkdf::<Sha512>::new(None, data);
  let mut okm = vec![0u8; size];
  hk.expand(&[], &mut okm).map_err(|e| MFKDFError::KdfFailure(e.to_string()))?;
  Ok(okm)
}

/// HKDF-SHA256 expansion, used to adapt fixed-width KDF outputs to `size` bytes.
pub(crate) fn hkdf_sha256(input: &[u8], salt: &[u8], size: usize) -> MFKDFResult<Vec<u8>> {
  let hk = Hkdf::<Sha256>::new(Some(salt), input);
  let mut okm = vec![0u8; size];
  hk.expand(&[], &mut okm).map_err(|e| MFKDFError::KdfFailure(e.to_string()))?;
  Ok(okm)
}

/// XOR of two byte strings; the shorter operand is widened with leading zero
/// bytes so oversized shares or pads line up on the right.
pub(crate) fn xor_pad(a: &[u8], b: &[u8]) -> Vec<u8> {
  let width = a.len().max(b.len());
  let mut out = vec![0u8; width];
  for (i, byte) in a.iter().enumerate() {
    out[width - a.len() + i] ^= byte;
  }
  for (i, byte) in b.iter().enumerate() {
    out[width - b.len() + i] ^= byte;
  }
  out
}

/// Whitens variable-length key material into a fixed 32-byte AES key.
pub(crate) fn aes_key(material: &[u8]) -> [u8; 32] {
  let hk = Hkdf::<Sha256>::new(None, material);
  let mut okm = [0u8; 32];
  hk.expand(&[], &mut okm).expect("32 bytes is a valid HKDF-SHA256 output length");
  okm
}

/// Encrypts a whitened 32-byte factor secret for storage in public params.
///
/// Challenge-response factors keep an encrypted copy of their device secret
/// in the policy; the secret is always exactly two AES-256 blocks of
/// uniformly random-looking bytes, so the blocks are enciphered directly
/// under the 32-byte key with no padding or chaining.
pub(crate) fn seal_secret(secret: &[u8; 32], key: &[u8; 32]) -> [u8; 32] {
  let cipher = Aes256::new(GenericArray::from_slice(key));
  let mut sealed = *secret;
  let (lo, hi) = sealed.split_at_mut(16);
  cipher.encrypt_block(GenericArray::from_mut_slice(lo));
  cipher.encrypt_block(GenericArray::from_mut_slice(hi));
  sealed
}

/// Inverse of [`seal_secret`].
pub(crate) fn open_secret(sealed: &[u8; 32], key: &[u8; 32]) -> [u8; 32] {
  let cipher = Aes256::new(GenericArray::from_slice(key));
  let mut secret = *sealed;
  let (lo, hi) = secret.split_at_mut(16);
  cipher.decrypt_block(GenericArray::from_mut_slice(lo));
  cipher.decrypt_block(GenericArray::from_mut_slice(hi));
  secret
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stretch_known_vectors() {
    // HKDF-SHA512(ikm, salt = "", info = "")
    assert_eq!(hex::encode(stretch(b"hello world", 16).unwrap()), "a9e470563a01fdd2071517cf18ac97d7");
    assert_eq!(hex::encode(stretch(b"password", 16).unwrap()), "b78ebf8cbf4621845bb9b0531c3915d1");
    assert_eq!(
      hex::encode(stretch(b"password", 32).unwrap()),
      "b78ebf8cbf4621845bb9b0531c3915d155db5e248fae917ddb27d6964a6cadad"
    );
  }

  #[test]
  fn stretch_is_prefix_consistent() {
    let short = stretch(b"material", 16).unwrap();
    let long = stretch(b"material", 32).unwrap();
    assert_eq!(short[..], long[..16]);
  }

  #[test]
  fn xor_pad_round_trip() {
    let share = vec![1u8, 2, 3, 4];
    let mask = vec![9u8, 8, 7, 6];
    let pad = xor_pad(&share, &mask);
    assert_eq!(xor_pad(&pad, &mask), share);
  }

  #[test]
  fn xor_pad_widens_left() {
    let long = vec![0xAAu8, 0x01, 0x02];
    let short = vec![0x01u8, 0x02];
    // the short operand is zero-extended on the left
    assert_eq!(xor_pad(&long, &short), vec![0xAA, 0x00, 0x00]);
  }

  #[test]
  fn seal_open_round_trip() {
    let key = aes_key(b"some derived key");
    let secret = [7u8; 32];
    let sealed = seal_secret(&secret, &key);
    assert_ne!(sealed, secret);
    assert_eq!(open_secret(&sealed, &key), secret);
  }

  #[test]
  fn seal_blocks_are_independent() {
    // identical halves encrypt to identical blocks under the same key
    let key = [3u8; 32];
    let mut secret = [0u8; 32];
    secret[..16].copy_from_slice(&[5u8; 16]);
    secret[16..].copy_from_slice(&[5u8; 16]);
    let sealed = seal_secret(&secret, &key);
    assert_eq!(sealed[..16], sealed[16..]);
  }

  #[test]
  fn wrong_key_does_not_open() {
    let secret = [9u8; 32];
    let sealed = seal_secret(&secret, &[1u8; 32]);
    assert_ne!(open_secret(&sealed, &[2u8; 32]), secret);
  }

  #[test]
  fn aes_key_is_deterministic() {
    assert_eq!(aes_key(b"key material"), aes_key(b"key material"));
    assert_ne!(aes_key(b"key material"), aes_key(b"other material"));
  }
}
