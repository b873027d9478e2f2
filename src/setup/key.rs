use std::collections::{HashMap, HashSet};

use base64::{Engine, engine::general_purpose};
use zeroize::Zeroize;

use crate::{
  constants::POLICY_SCHEMA,
  crypto, defaults,
  definitions::{MFKDFDerivedKey, MFKDFEntropy, MFKDFFactor, MFKDFOptions},
  error::{MFKDFError, MFKDFResult},
  kdf::kdf,
  policy::{Policy, PolicyFactor},
  rng, sharing,
  setup::FactorSetup,
};

/// Sets up a multi-factor derived key.
///
/// Generates a random `size`-byte master secret, maps it to the final key
/// with the configured KDF, splits it into one share per factor, and blinds
/// each share with that factor's HKDF-stretched material. The returned
/// policy is the only artifact that needs to be stored.
///
/// # Errors
///
/// - [`MFKDFError::InvalidArgument`] on an empty or duplicate-id factor
///   list, a non-positive size, an out-of-range threshold, or a salt whose
///   length does not match `size`
/// - [`MFKDFError::Cancelled`] if the options carry a signalled
///   [`CancelFlag`](crate::definitions::CancelFlag)
///
/// # Example
///
/// ```rust
/// use mfkdf::{definitions::MFKDFOptions, setup};
///
/// let key = setup::key(
///   &[
///     setup::factors::password("Tr0ub4dour", Default::default())?,
///     setup::factors::uuid(Default::default())?,
///   ],
///   MFKDFOptions { threshold: Some(2), size: Some(16), ..Default::default() },
/// )?;
/// assert_eq!(key.key().len(), 16);
/// assert_eq!(key.policy.factors.len(), 2);
/// # Ok::<(), mfkdf::error::MFKDFError>(())
/// ```
pub fn key(factors: &[MFKDFFactor], options: MFKDFOptions) -> MFKDFResult<MFKDFDerivedKey> {
  if factors.is_empty() {
    return Err(MFKDFError::InvalidArgument("at least one factor is required".to_string()));
  }
  if factors.len() > 255 {
    return Err(MFKDFError::InvalidArgument("no more than 255 factors are supported".to_string()));
  }

  let size = options.size.unwrap_or(defaults::kdf::SIZE);
  if size == 0 {
    return Err(MFKDFError::InvalidArgument("key size must be positive".to_string()));
  }

  let threshold = options.threshold.unwrap_or(factors.len() as u8);
  if threshold == 0 || usize::from(threshold) > factors.len() {
    return Err(MFKDFError::InvalidArgument(
      "threshold must be between 1 and the number of factors".to_string(),
    ));
  }

  let id = options.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
  if id.is_empty() {
    return Err(MFKDFError::InvalidArgument("policy id must not be empty".to_string()));
  }

  let salt = options.salt.unwrap_or_else(|| rng::random_bytes(size));
  if salt.len() != size {
    return Err(MFKDFError::InvalidArgument("salt length must equal the key size".to_string()));
  }

  let kdf_spec = options.kdf.unwrap_or_default();
  kdf_spec.validate()?;

  let mut ids = HashSet::new();
  for factor in factors {
    if factor.id.is_empty() {
      return Err(MFKDFError::InvalidArgument("factor id must not be empty".to_string()));
    }
    if !ids.insert(factor.id.as_str()) {
      return Err(MFKDFError::InvalidArgument(format!(
        "factor id \"{}\" is not unique",
        factor.id
      )));
    }
    if factor.data().is_empty() {
      return Err(MFKDFError::InvalidArgument(format!(
        "factor \"{}\" has no material",
        factor.id
      )));
    }
  }

  log::debug!(
    "setting up {}-of-{} key: {} bytes, kdf {}",
    threshold,
    factors.len(),
    size,
    kdf_spec.kind()
  );

  let secret = rng::random_bytes(size);
  let key = kdf(&secret, &salt, size, &kdf_spec)?;
  let shares = sharing::share(&secret, threshold, factors.len() as u8)?;

  let mut policy_factors = Vec::with_capacity(factors.len());
  let mut outputs = HashMap::new();
  let mut theoretical: Vec<f64> = Vec::with_capacity(factors.len());
  let mut real: Vec<f64> = Vec::with_capacity(factors.len());

  for (factor, share) in factors.iter().zip(&shares) {
    if let Some(ref cancel) = options.cancel
      && cancel.is_cancelled()
    {
      return Err(MFKDFError::Cancelled);
    }

    let mut data = factor.data();
    let mut stretched = crypto::stretch(&data, size)?;
    let pad = crypto::xor_pad(share, &stretched);
    stretched.zeroize();

    let params = factor.factor_type.params(&key)?;
    outputs.insert(factor.id.clone(), factor.factor_type.output());

    let bits = (data.len() * 8) as f64;
    theoretical.push(bits);
    real.push(factor.entropy.unwrap_or(bits).min(bits));
    data.zeroize();

    policy_factors.push(PolicyFactor {
      id: factor.id.clone(),
      kind: factor.kind().to_string(),
      pad: general_purpose::STANDARD.encode(&pad),
      params,
    });
  }

  // an attacker needs only the weakest `threshold` factors
  theoretical.sort_by(f64::total_cmp);
  real.sort_by(f64::total_cmp);
  let entropy = MFKDFEntropy {
    theoretical: theoretical.iter().take(usize::from(threshold)).sum(),
    real:        real.iter().take(usize::from(threshold)).sum(),
  };

  let policy = Policy {
    schema: POLICY_SCHEMA.to_string(),
    id,
    size: size as u32,
    threshold,
    salt: general_purpose::STANDARD.encode(&salt),
    kdf: kdf_spec,
    factors: policy_factors,
  };

  Ok(MFKDFDerivedKey::new(policy, key, secret, shares, outputs, Some(entropy)))
}
