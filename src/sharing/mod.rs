//! Shamir-style threshold sharing over GF(2⁸) byte vectors.
//!
//! A `size`-byte secret is split into `n` shares so that any `threshold` of
//! them reconstruct it. The polynomial scheme is applied independently per
//! byte position; share `i` is the evaluation at `x = i + 1`, so share
//! indices are positions in the factor list and never collide.
//!
//! [`combine`] and [`recover`] take positional `Option`-vectors: a `None`
//! marks a factor that was not supplied. Only non-`None` entries count
//! toward the threshold.

mod gf256;

use crate::{
  error::{MFKDFError, MFKDFResult},
  rng,
};

/// Splits `secret` into `count` shares with recovery threshold `threshold`.
///
/// A uniformly random polynomial of degree `threshold - 1` with constant term
/// `secret` is sampled per byte position; requires `1 <= threshold <= count`.
pub fn share(secret: &[u8], threshold: u8, count: u8) -> MFKDFResult<Vec<Vec<u8>>> {
  if secret.is_empty() {
    return Err(MFKDFError::InvalidArgument("secret must not be empty".to_string()));
  }
  if threshold == 0 || threshold > count {
    return Err(MFKDFError::InvalidArgument(
      "threshold must be between 1 and the number of shares".to_string(),
    ));
  }

  // coefficients for x^1 .. x^(threshold-1), one row per byte position
  let degree = usize::from(threshold) - 1;
  let mut coefficients = vec![vec![0u8; degree]; secret.len()];
  for row in &mut coefficients {
    rng::fill_bytes(row);
  }

  Ok(
    (1..=count)
      .map(|x| {
        secret
          .iter()
          .zip(&coefficients)
          .map(|(&constant, row)| evaluate(constant, row, x))
          .collect()
      })
      .collect(),
  )
}

/// Reconstructs the secret from at least `threshold` shares at their original
/// indices, interpolating the polynomial at `x = 0`.
///
/// The result is as wide as the widest supplied share; callers expecting a
/// `size`-byte secret strip the zero-extended prefix.
pub fn combine(shares: &[Option<Vec<u8>>], threshold: u8) -> MFKDFResult<Vec<u8>> {
  let points = collect_points(shares, threshold)?;
  Ok(interpolate(0, &points))
}

/// Reconstructs the full share vector: supplied shares pass through, missing
/// ones are re-evaluated from any `threshold` of the supplied points.
pub fn recover(shares: &[Option<Vec<u8>>], threshold: u8) -> MFKDFResult<Vec<Vec<u8>>> {
  let points = collect_points(shares, threshold)?;
  Ok(
    shares
      .iter()
      .enumerate()
      .map(|(i, existing)| match existing {
        Some(bytes) => bytes.clone(),
        None => interpolate((i + 1) as u8, &points),
      })
      .collect(),
  )
}

/// Horner evaluation of `constant + row[0]·x + row[1]·x² + ...` at `x`.
fn evaluate(constant: u8, row: &[u8], x: u8) -> u8 {
  let mut acc = 0u8;
  for &coefficient in row.iter().rev() {
    acc = gf256::add(gf256::mul(acc, x), coefficient);
  }
  gf256::add(gf256::mul(acc, x), constant)
}

/// Picks the lowest-indexed `threshold` present shares, widened to a common
/// length with leading zero bytes so oversized pads line up on the right.
fn collect_points(shares: &[Option<Vec<u8>>], threshold: u8) -> MFKDFResult<Vec<(u8, Vec<u8>)>> {
  let present: Vec<(u8, &Vec<u8>)> = shares
    .iter()
    .enumerate()
    .filter_map(|(i, share)| share.as_ref().map(|bytes| ((i + 1) as u8, bytes)))
    .collect();

  if present.len() < usize::from(threshold) {
    return Err(MFKDFError::InsufficientShares {
      supplied:  present.len(),
      threshold: usize::from(threshold),
    });
  }

  let width = present.iter().map(|(_, bytes)| bytes.len()).max().unwrap_or(0);
  Ok(
    present
      .into_iter()
      .take(usize::from(threshold))
      .map(|(x, bytes)| {
        let mut widened = vec![0u8; width - bytes.len()];
        widened.extend_from_slice(bytes);
        (x, widened)
      })
      .collect(),
  )
}

/// Lagrange interpolation at `x` of the byte-vector polynomial described by
/// `points`.
fn interpolate(x: u8, points: &[(u8, Vec<u8>)]) -> Vec<u8> {
  let width = points.first().map(|(_, bytes)| bytes.len()).unwrap_or(0);
  let mut value = vec![0u8; width];
  for (xi, yi) in points {
    let mut basis = 1u8;
    for (xj, _) in points {
      if xj == xi {
        continue;
      }
      basis = gf256::mul(basis, gf256::div(gf256::add(x, *xj), gf256::add(*xi, *xj)));
    }
    for (k, byte) in value.iter_mut().enumerate() {
      *byte = gf256::add(*byte, gf256::mul(yi[k], basis));
    }
  }
  value
}
