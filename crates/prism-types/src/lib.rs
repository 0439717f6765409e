//! PRISM identifier types
//!
//! Fixed-width, strongly-typed identifiers shared by every PRISM crate:
//!
//! - [`Address`]: 20-byte account/code identifier
//! - [`Selector`]: 4-byte operation identifier
//! - [`RoleId`]: 32-byte role identifier
//! - [`Salt`]: 32-byte deterministic deployment salt
//!
//! All identifiers derive deterministically from their inputs via Blake3,
//! display as `0x`-prefixed hex, and serialize as hex strings in
//! human-readable formats (raw bytes otherwise).

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod address;
mod error;
mod hexser;
mod role;
mod salt;
mod selector;

pub use address::Address;
pub use error::IdError;
pub use role::RoleId;
pub use salt::Salt;
pub use selector::Selector;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
