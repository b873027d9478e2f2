use std::collections::{HashMap, HashSet};

use base64::{Engine, engine::general_purpose};
use zeroize::Zeroize;

use crate::{
  crypto,
  definitions::{CancelFlag, MFKDFDerivedKey, MFKDFFactor},
  derive::{FactorDerive, ParamsAction},
  error::{MFKDFError, MFKDFResult},
  kdf::kdf,
  policy::Policy,
  sharing,
};

/// Derives a key from a stored policy and a threshold subset of factors.
///
/// Factor witnesses are supplied as a map from factor id to material; ids
/// not present in the policy are ignored, and policy slots without a
/// supplied factor simply contribute no share. A witness whose type is
/// `"persisted"` is treated as a raw share and bypasses stretching.
///
/// On success the returned [`MFKDFDerivedKey`] carries a rewritten policy:
/// factors with challenge-response state (HOTP counter, HMAC challenge) have
/// rotated `params`, and the new policy should be persisted in place of the
/// old one. Factors without such state keep their params bit-identical.
///
/// # Errors
///
/// - [`MFKDFError::InvalidPolicy`] if the policy fails validation
/// - [`MFKDFError::FactorTypeMismatch`] if a supplied factor's type differs
///   from its policy slot's type
/// - [`MFKDFError::InsufficientShares`] if fewer than `threshold` usable
///   factors were supplied
/// - [`MFKDFError::Cancelled`] if `cancel` is signalled between factor
///   iterations
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
///
/// use mfkdf::{definitions::MFKDFOptions, derive, setup};
///
/// let setup = setup::key(
///   &[setup::factors::password("Tr0ub4dour", Default::default())?],
///   MFKDFOptions::default(),
/// )?;
///
/// let derived = derive::key(
///   &setup.policy,
///   HashMap::from([("password".to_string(), derive::factors::password("Tr0ub4dour")?)]),
///   None,
/// )?;
/// assert_eq!(derived.key(), setup.key());
/// # Ok::<(), mfkdf::error::MFKDFError>(())
/// ```
pub fn key(
  policy: &Policy,
  factors: HashMap<String, MFKDFFactor>,
  cancel: Option<CancelFlag>,
) -> MFKDFResult<MFKDFDerivedKey> {
  policy.validate()?;

  let threshold = usize::from(policy.threshold);
  let policy_ids: HashSet<&str> = policy.factors.iter().map(|f| f.id.as_str()).collect();
  let supplied = factors.keys().filter(|id| policy_ids.contains(id.as_str())).count();
  if supplied < threshold {
    return Err(MFKDFError::InsufficientShares { supplied, threshold });
  }

  let size = policy.size as usize;
  log::debug!(
    "deriving key \"{}\": {}-of-{} policy, kdf {}",
    policy.id,
    policy.threshold,
    policy.factors.len(),
    policy.kdf.kind()
  );

  let mut shares: Vec<Option<Vec<u8>>> = Vec::with_capacity(policy.factors.len());
  let mut materials: Vec<Option<MFKDFFactor>> = Vec::with_capacity(policy.factors.len());

  for policy_factor in &policy.factors {
    if let Some(ref cancel) = cancel
      && cancel.is_cancelled()
    {
      return Err(MFKDFError::Cancelled);
    }

    let Some(supplied) = factors.get(&policy_factor.id) else {
      shares.push(None);
      materials.push(None);
      continue;
    };
    let mut material = supplied.clone();

    let share = if material.kind() == "persisted" {
      // a previously-exported raw share; no stretching involved
      let share = material.data();
      if share.len() < size {
        return Err(MFKDFError::InvalidArgument(format!(
          "persisted share for \"{}\" is shorter than the key size",
          policy_factor.id
        )));
      }
      share
    } else {
      if material.kind() != policy_factor.kind {
        return Err(MFKDFError::FactorTypeMismatch {
          id:       policy_factor.id.clone(),
          expected: policy_factor.kind.clone(),
          supplied: material.kind().to_string(),
        });
      }
      material.factor_type.include_params(&policy_factor.params)?;

      let mut data = material.data();
      let mut stretched = crypto::stretch(&data, size)?;
      data.zeroize();
      let pad = general_purpose::STANDARD.decode(&policy_factor.pad)?;
      let share = crypto::xor_pad(&pad, &stretched);
      stretched.zeroize();
      share
    };

    shares.push(Some(share));
    materials.push(Some(material));
  }

  let usable = shares.iter().flatten().count();
  if usable < threshold {
    return Err(MFKDFError::InsufficientShares { supplied: usable, threshold });
  }

  let mut combined = sharing::combine(&shares, policy.threshold)?;
  // shares can carry a zero-extended prefix; the secret is the low `size` bytes
  let secret = combined[combined.len() - size..].to_vec();
  combined.zeroize();

  let salt = general_purpose::STANDARD.decode(&policy.salt)?;
  let key = kdf(&secret, &salt, size, &policy.kdf)?;

  let mut new_policy = policy.clone();
  for (index, material) in materials.iter().enumerate() {
    let Some(material) = material else { continue };
    match material.factor_type.next_params(&key)? {
      ParamsAction::Keep => {},
      ParamsAction::Rotate(params) => new_policy.factors[index].params = params,
    }
  }

  let full_shares = sharing::recover(&shares, policy.threshold)?;
  for share in shares.iter_mut().flatten() {
    share.zeroize();
  }

  Ok(MFKDFDerivedKey::new(new_policy, key, secret, full_shares, HashMap::new(), None))
}
