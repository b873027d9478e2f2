//! Setup-side factor constructors.
//!
//! Each submodule builds an [`MFKDFFactor`](crate::definitions::MFKDFFactor)
//! from full secret material plus a factor-specific options struct, for use
//! with [`crate::setup::key`].

pub mod hmacsha1;
pub mod hotp;
pub mod password;
pub mod question;
pub mod uuid;

pub use hmacsha1::hmacsha1;
pub use hotp::hotp;
pub use password::password;
pub use question::question;
pub use self::uuid::uuid;
