//! # Interval Tree Clocks
//!
//! This crate implements Interval Tree Clocks as described in
//! <http://gsd.di.uminho.pt/members/cbm/ps/itc2008.pdf>: a causality-tracking
//! mechanism for dynamic distributed systems in which the set of active
//! participants changes over time. Unlike vector clocks, an ITC does not
//! require a fixed set of identifiers — participants fork into new
//! participants and retire by joining back into peers, with no global
//! coordination.
//!
//! A [`Stamp`] is a pair of an [`Id`] (which share of the `[0,1)` identifier
//! space this participant is authorized to stamp) and an [`Event`] (the
//! causal history it has observed so far):
//!
//! ```
//! use itc::Stamp;
//!
//! let s = Stamp::seed();
//!
//! let (s1, s2) = s.fork().unwrap();
//! let s1prime = s1.event().unwrap();
//! let s2prime = s2.event().unwrap();
//! let s3 = s2prime.join(&s1);
//!
//! assert!(s.leq(&s1));
//! assert!(s1.leq(&s1prime));
//! assert!(!s1prime.leq(&s2prime));
//! assert!(s2prime.leq(&s3));
//! ```
//!
//! This crate implements the 4 verbs: fork, event, join, peek; the 3 derived
//! verbs: send, receive, sync; and the partial ordering (`leq`) used to
//! establish causality / the happens-before relation.
//!
//! All values are immutable — every operation returns a fresh value, and
//! there is no I/O, no wall-clock time, and no wire format: serialization,
//! transport, and replication are left to the host (enable the `serde`
//! feature for a compact JSON-friendly encoding of [`Stamp`]).

pub mod error;
pub mod event;
pub mod id;
pub mod stamp;

#[cfg(feature = "serde")]
mod serde;

pub use error::ItcError;
pub use event::{Cost, Event};
pub use id::Id;
pub use stamp::Stamp;
