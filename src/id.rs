//! The ID tree: ownership of a share of the `[0,1)` identifier interval.
//!
//! An [`Id`] is either a [`Id::Leaf`] claiming the whole (or none) of its
//! sub-interval, or a [`Id::Node`] splitting ownership between the left and
//! right halves. Forking an `Id` splits a share into two disjoint halves;
//! joining merges two shares back together.

use crate::error::ItcError;

/// A share of the `[0,1)` identifier interval owned by a participant.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Id {
    /// Owns the whole sub-interval (`true`) or none of it (`false`).
    Leaf(bool),
    /// Ownership split between the left and right halves.
    Node(Box<Id>, Box<Id>),
}

impl Id {
    /// The empty share — owns nothing.
    pub fn zero() -> Id {
        Id::Leaf(false)
    }

    /// The full share — owns the entire interval.
    pub fn one() -> Id {
        Id::Leaf(true)
    }

    /// Builds a `Node` from two child shares without normalizing.
    pub fn node(left: Id, right: Id) -> Id {
        Id::Node(Box::new(left), Box::new(right))
    }

    /// True iff this value contains at least one `Leaf(true)` anywhere (I3).
    pub fn is_truthy(&self) -> bool {
        match self {
            Id::Leaf(v) => *v,
            Id::Node(l, r) => l.is_truthy() || r.is_truthy(),
        }
    }

    /// Splits this share into two disjoint halves whose join equals `self`.
    ///
    /// Fails with [`ItcError::EmptyFork`] if this share is empty — there is
    /// nothing to split. Unlike the bare tree-walk a naive implementation
    /// might reach for, an empty `Node` (violating I1) is treated the same
    /// as `Leaf(false)`: both are non-truthy and both refuse to fork.
    pub fn fork(&self) -> Result<(Id, Id), ItcError> {
        if !self.is_truthy() {
            return Err(ItcError::EmptyFork);
        }
        Ok(self.fork_truthy())
    }

    fn fork_truthy(&self) -> (Id, Id) {
        match self {
            Id::Leaf(true) => (
                Id::node(Id::one(), Id::zero()),
                Id::node(Id::zero(), Id::one()),
            ),
            Id::Leaf(false) => unreachable!("fork_truthy called on an empty id"),
            Id::Node(l, r) => {
                if l.is_truthy() && r.is_truthy() {
                    (Id::node((**l).clone(), Id::zero()), Id::node(Id::zero(), (**r).clone()))
                } else if l.is_truthy() {
                    let (l1, l2) = l.fork_truthy();
                    (Id::node(l1, Id::zero()), Id::node(l2, Id::zero()))
                } else if r.is_truthy() {
                    let (r1, r2) = r.fork_truthy();
                    (Id::node(Id::zero(), r1), Id::node(Id::zero(), r2))
                } else {
                    unreachable!("fork_truthy called on an empty node")
                }
            }
        }
    }

    /// Merges two disjoint ownership shares. The core does not detect
    /// overlapping inputs — joining two non-disjoint truthy shares is a
    /// caller bug whose result may no longer be disjoint, matching the
    /// original algebra.
    pub fn join(&self, other: &Id) -> Id {
        match (self, other) {
            (Id::Leaf(true), _) | (_, Id::Leaf(true)) => Id::one(),
            (Id::Leaf(false), other) => other.clone(),
            (this, Id::Leaf(false)) => this.clone(),
            (Id::Node(l1, r1), Id::Node(l2, r2)) => {
                Id::node(l1.join(l2), r1.join(r2)).normalize()
            }
        }
    }

    /// Reduces this value to canonical form: `Node(0, 0) -> 0`,
    /// `Node(1, 1) -> 1`, otherwise a `Node` of normalized children (I2).
    pub fn normalize(self) -> Id {
        match self {
            Id::Leaf(_) => self,
            Id::Node(l, r) => {
                let l = l.normalize();
                let r = r.normalize();
                if let (Id::Leaf(a), Id::Leaf(b)) = (&l, &r) {
                    if a == b {
                        return Id::Leaf(*a);
                    }
                }
                Id::node(l, r)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_and_one_are_leaves() {
        assert_eq!(Id::zero(), Id::Leaf(false));
        assert_eq!(Id::one(), Id::Leaf(true));
    }

    #[test]
    fn zero_is_not_truthy() {
        assert!(!Id::zero().is_truthy());
        assert!(Id::one().is_truthy());
    }

    #[test]
    fn normalize_collapses_uniform_nodes() {
        assert_eq!(Id::node(Id::zero(), Id::zero()).normalize(), Id::zero());
        assert_eq!(Id::node(Id::one(), Id::one()).normalize(), Id::one());
        let mixed = Id::node(Id::one(), Id::zero());
        assert_eq!(mixed.clone().normalize(), mixed);
    }

    #[test]
    fn normalize_collapses_nested_uniform_nodes() {
        let nested = Id::node(Id::one(), Id::node(Id::one(), Id::one()));
        assert_eq!(nested.normalize(), Id::one());
    }

    #[test]
    fn fork_empty_fails() {
        assert_eq!(Id::zero().fork(), Err(ItcError::EmptyFork));
    }

    #[test]
    fn fork_one_splits_into_disjoint_halves() {
        let (l, r) = Id::one().fork().unwrap();
        assert_eq!(l, Id::node(Id::one(), Id::zero()));
        assert_eq!(r, Id::node(Id::zero(), Id::one()));
    }

    #[test]
    fn fork_join_round_trip_on_seed() {
        let (l, r) = Id::one().fork().unwrap();
        assert_eq!(l.join(&r), Id::one());
    }

    #[test]
    fn join_absorbs_one() {
        let x = Id::node(Id::one(), Id::zero());
        assert_eq!(Id::one().join(&x), Id::one());
        assert_eq!(x.join(&Id::one()), Id::one());
    }

    #[test]
    fn join_identity_is_zero() {
        let x = Id::node(Id::one(), Id::zero());
        assert_eq!(Id::zero().join(&x), x);
        assert_eq!(x.join(&Id::zero()), x);
    }

    proptest::proptest! {
        #[test]
        fn fork_join_round_trip_any_non_empty_leaf(v in proptest::bool::ANY) {
            // Leaf(false) cannot fork; only the truthy leaf is exercised here.
            if v {
                let id = Id::one();
                let (a, b) = id.fork().unwrap();
                proptest::prop_assert_eq!(a.join(&b), id);
            }
        }

        #[test]
        fn normalize_is_idempotent(depth in 0u32..4) {
            fn build(depth: u32, seed: u32) -> Id {
                if depth == 0 {
                    Id::Leaf(seed % 2 == 0)
                } else {
                    Id::node(build(depth - 1, seed), build(depth - 1, seed.wrapping_mul(7).wrapping_add(1)))
                }
            }
            let id = build(depth, 3);
            let once = id.clone().normalize();
            let twice = once.clone().normalize();
            proptest::prop_assert_eq!(once, twice);
        }
    }
}
