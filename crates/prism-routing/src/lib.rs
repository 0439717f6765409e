//! PRISM routing
//!
//! The mutable operation-routing table at the heart of every instance.
//!
//! # Core Concepts
//!
//! - [`RouteTable`]: maps each 4-byte [`Selector`](prism_types::Selector) to
//!   at most one implementing target address
//! - [`RouteUpdate`]: an ordered batch of [`UpdateEntry`] items
//!   (add/replace/remove) applied atomically: either every entry commits or
//!   the table is left untouched
//! - [`RouteGroup`]: read-side view of the table grouped by target
//!
//! # Example
//!
//! ```rust,ignore
//! let mut table = RouteTable::new();
//! let update = RouteUpdate::new()
//!     .add(target, vec![sel_a, sel_b])
//!     .remove(old_target, vec![sel_c]);
//! table.apply(&update)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod table;
mod update;

pub use error::RoutingError;
pub use table::{RouteGroup, RouteTable};
pub use update::{RouteUpdate, UpdateAction, UpdateEntry};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
