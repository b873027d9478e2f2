//! Derive-side factor constructors.
//!
//! Each submodule wraps a fresh user witness (the current password, OTP
//! code, token response, ...) into an
//! [`MFKDFFactor`](crate::definitions::MFKDFFactor) for use with
//! [`crate::derive::key`], which combines it with the policy's stored
//! params to reproduce the factor material.

pub mod hmacsha1;
pub mod hotp;
pub mod password;
pub mod persisted;
pub mod question;
pub mod uuid;

pub use hmacsha1::hmacsha1;
pub use hotp::hotp;
pub use password::password;
pub use persisted::persisted;
pub use question::question;
pub use self::uuid::uuid;
