#![doc = include_str!("../README.md")]
#![warn(missing_docs, unreachable_pub, nonstandard_style)]

pub mod constants;
mod crypto;
mod defaults;
pub mod definitions;
pub mod derive;
pub mod error;
pub mod kdf;
pub mod otp;
pub mod policy;
mod rng;
pub mod setup;
pub mod sharing;
