//! The Event tree: a compact, piecewise-constant encoding of causal history
//! over `[0,1)`.
//!
//! An [`Event`] is either a [`Event::Leaf`] (a constant count over its whole
//! sub-interval) or an [`Event::Node`] (a base count plus independent left
//! and right sub-histories). An "absent" subtree (a top with no
//! contribution) is represented here by a child equal to [`Event::zero`] —
//! after normalization that is the unique representation of an empty
//! subtree (E2), so no separate `Option` tag is needed.

use crate::id::Id;

/// A node in the causal-history tree. See the module docs for the
/// absent/present-top representation choice.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    /// A constant count over the whole sub-interval.
    Leaf(u32),
    /// `base` plus independent left/right sub-histories.
    Node(u32, Box<Event>, Box<Event>),
}

/// The `(complexity, height)` pair `grow` minimizes lexicographically.
/// Field order matters: `complexity` is compared before `height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Cost {
    pub complexity: u32,
    pub height: u32,
}

const NODE_OVERHEAD: u32 = 1;

impl Event {
    /// The empty history: zero everywhere.
    pub fn zero() -> Event {
        Event::Leaf(0)
    }

    /// A constant history of `n` everywhere.
    pub fn leaf(n: u32) -> Event {
        Event::Leaf(n)
    }

    /// Builds a `Node` from a base and two children without normalizing.
    pub fn node(n: u32, left: Event, right: Event) -> Event {
        Event::Node(n, Box::new(left), Box::new(right))
    }

    /// The top-level base count (`n` for a `Leaf`, `base` for a `Node`).
    pub fn base(&self) -> u32 {
        match self {
            Event::Leaf(n) => *n,
            Event::Node(n, _, _) => *n,
        }
    }

    /// The maximum value of the represented function.
    pub fn height(&self) -> u32 {
        match self {
            Event::Leaf(n) => *n,
            Event::Node(n, l, r) => n + l.height().max(r.height()),
        }
    }

    fn is_absent(&self) -> bool {
        matches!(self, Event::Leaf(0))
    }

    /// Tree-size cost used as `grow`'s tie-breaker. Monotone:
    /// strictly increases whenever a new subtree is introduced, constant on
    /// a leaf.
    pub fn complexity(&self) -> u32 {
        match self {
            Event::Leaf(_) => 1,
            Event::Node(_, l, r) => {
                let k = if l.is_absent() || r.is_absent() { 2 } else { 1 };
                NODE_OVERHEAD + k + l.complexity() + r.complexity()
            }
        }
    }

    /// The `(complexity, height)` pair used to rank `grow` candidates.
    pub fn cost(&self) -> Cost {
        Cost {
            complexity: self.complexity(),
            height: self.height(),
        }
    }

    /// Raises this subtree's base by `m`. Private: only safe where the
    /// caller already knows the result stays canonical (join, leq).
    fn lift(&self, m: u32) -> Event {
        match self {
            Event::Leaf(n) => Event::leaf(n + m),
            Event::Node(n, l, r) => Event::node(n + m, (**l).clone(), (**r).clone()),
        }
    }

    /// Lowers this subtree's base by `d`, clamped at zero. If `d` exceeds
    /// the local base the remaining deficit is pushed recursively into each
    /// child.
    pub fn truncate(&self, d: u32) -> Event {
        match self {
            Event::Leaf(n) => Event::leaf(n.saturating_sub(d)),
            Event::Node(n, l, r) => {
                if *n >= d {
                    Event::node(n - d, (**l).clone(), (**r).clone())
                } else {
                    let deficit = d - n;
                    Event::node(0, l.truncate(deficit), r.truncate(deficit))
                }
            }
        }
    }

    /// Reduces this value to canonical form (E3): recursively normalizes
    /// children, collapses two equal leaf children into a single leaf, and
    /// otherwise lifts the children's common minimum base into the parent.
    pub fn normalize(self) -> Event {
        match self {
            Event::Leaf(_) => self,
            Event::Node(n, l, r) => {
                let nl = l.normalize();
                let nr = r.normalize();
                if let (Event::Leaf(m1), Event::Leaf(m2)) = (&nl, &nr) {
                    if m1 == m2 {
                        return Event::leaf(n + m1);
                    }
                }
                let m = nl.base().min(nr.base());
                Event::node(n + m, nl.truncate(m), nr.truncate(m))
            }
        }
    }

    /// Pointwise maximum of the two functions over `[0,1)`.
    pub fn join(&self, other: &Event) -> Event {
        match (self, other) {
            (Event::Leaf(n1), Event::Leaf(n2)) => Event::leaf((*n1).max(*n2)),
            (Event::Leaf(n1), Event::Node(..)) => {
                let as_node = Event::node(*n1, Event::zero(), Event::zero());
                as_node.join(other)
            }
            (Event::Node(..), Event::Leaf(n2)) => {
                let as_node = Event::node(*n2, Event::zero(), Event::zero());
                self.join(&as_node)
            }
            (Event::Node(n1, l1, r1), Event::Node(n2, l2, r2)) => {
                if n1 > n2 {
                    other.join(self)
                } else {
                    let d = n2 - n1;
                    let new_left = l1.join(&l2.lift(d));
                    let new_right = r1.join(&r2.lift(d));
                    Event::node(*n1, new_left, new_right).normalize()
                }
            }
        }
    }

    /// True iff this function is pointwise ≤ `other` — the causal-precedes
    /// relation.
    pub fn leq(&self, other: &Event) -> bool {
        match (self, other) {
            (Event::Leaf(n1), Event::Leaf(n2)) => n1 <= n2,
            (Event::Leaf(n1), Event::Node(n2, ..)) => n1 <= n2,
            (Event::Node(n1, l1, r1), Event::Leaf(n2)) => {
                n1 <= n2 && l1.lift(*n1).leq(&Event::leaf(*n2)) && r1.lift(*n1).leq(&Event::leaf(*n2))
            }
            (Event::Node(n1, l1, r1), Event::Node(n2, l2, r2)) => {
                n1 <= n2 && l1.lift(*n1).leq(&l2.lift(*n2)) && r1.lift(*n1).leq(&r2.lift(*n2))
            }
        }
    }

    /// Monotonic simplification: wherever `id` denotes exclusive ownership,
    /// the local maximum can be safely lifted to a flat leaf because no
    /// other participant can observe there. Used to shrink the tree before
    /// a `grow` step.
    pub fn fill(&self, id: &Id) -> Event {
        match id {
            Id::Leaf(false) => self.clone(),
            Id::Leaf(true) => Event::leaf(self.height()),
            Id::Node(il, ir) => {
                let (n, l, r) = self.as_node_parts();
                let fl = l.fill(il);
                let fr = r.fill(ir);
                Event::node(n, fl, fr).normalize()
            }
        }
    }

    /// Grows this event at the positions owned by `id` by 1, returning the
    /// smallest-growth candidate.
    pub fn grow(&self, id: &Id) -> Event {
        self.grow_by(id, 1)
    }

    /// Like [`Event::grow`] with an explicit increment.
    pub fn grow_by(&self, id: &Id, amount: u32) -> Event {
        self.grow_with_cost(id, amount).0
    }

    fn as_node_parts(&self) -> (u32, Event, Event) {
        match self {
            Event::Leaf(n) => (*n, Event::zero(), Event::zero()),
            Event::Node(n, l, r) => (*n, (**l).clone(), (**r).clone()),
        }
    }

    fn grow_with_cost(&self, id: &Id, amount: u32) -> (Event, Cost) {
        if matches!(id, Id::Leaf(false)) {
            return (self.clone(), self.cost());
        }
        match self {
            Event::Leaf(n) => {
                if matches!(id, Id::Leaf(true)) {
                    let e = Event::leaf(n + amount);
                    let c = e.cost();
                    (e, c)
                } else {
                    // id splits further than this still-flat event does;
                    // give it the same shape so the recursion below applies.
                    let wrapped = Event::node(*n, Event::zero(), Event::zero());
                    wrapped.grow_with_cost(id, amount)
                }
            }
            Event::Node(n, l, r) => {
                let (il, ir) = match id {
                    Id::Node(il, ir) => (il.as_ref(), ir.as_ref()),
                    Id::Leaf(true) => {
                        // full ownership over a still-structured event: the
                        // increment applies everywhere, so it lifts the
                        // shared base rather than flattening the tree.
                        let lifted = Event::node(n + amount, (**l).clone(), (**r).clone());
                        let c = lifted.cost();
                        return (lifted, c);
                    }
                    Id::Leaf(false) => unreachable!("handled above"),
                };
                let (n, l, r) = (*n, (**l).clone(), (**r).clone());
                match (il.is_truthy(), ir.is_truthy()) {
                    (true, true) => {
                        let (gl, _) = l.grow_with_cost(il, amount);
                        let (gr, _) = r.grow_with_cost(ir, amount);
                        let cand_left = Event::node(n, gl.clone(), r.clone()).normalize();
                        let cand_right = Event::node(n, l.clone(), gr.clone()).normalize();
                        let cand_both = Event::node(n, gl, gr).normalize();

                        let mut best = (cand_both.cost(), cand_both);
                        for candidate in [cand_left, cand_right] {
                            let c = candidate.cost();
                            if c < best.0 {
                                best = (c, candidate);
                            }
                        }
                        (best.1, best.0)
                    }
                    (true, false) => {
                        let (gl, _) = l.grow_with_cost(il, amount);
                        let result = Event::node(n, gl, r).normalize();
                        let c = result.cost();
                        (result, c)
                    }
                    (false, true) => {
                        let (gr, _) = r.grow_with_cost(ir, amount);
                        let result = Event::node(n, l, gr).normalize();
                        let c = result.cost();
                        (result, c)
                    }
                    (false, false) => unreachable!("Id::Node with no truthy side violates I1"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_leaf_zero() {
        assert_eq!(Event::zero(), Event::Leaf(0));
    }

    #[test]
    fn normalize_collapses_equal_leaf_children() {
        let e = Event::node(2, Event::leaf(1), Event::leaf(1));
        assert_eq!(e.normalize(), Event::leaf(3));
    }

    #[test]
    fn normalize_lifts_common_minimum_into_base() {
        // (2, (2, 1, 0), 3) ~=~ (4, (0, 1, 0), 1)
        let a = Event::node(2, Event::leaf(1), Event::leaf(0));
        let e = Event::node(2, a, Event::leaf(3));

        let expected_a = Event::node(0, Event::leaf(1), Event::leaf(0));
        let expected = Event::node(4, expected_a, Event::leaf(1));

        assert_eq!(e.normalize(), expected);
    }

    #[test]
    fn normalize_is_idempotent_on_canonical_form() {
        let e = Event::node(4, Event::node(0, Event::leaf(1), Event::leaf(0)), Event::leaf(1));
        assert_eq!(e.clone().normalize(), e);
    }

    #[test]
    fn join_of_leaves_is_max() {
        assert_eq!(Event::leaf(1).join(&Event::leaf(3)), Event::leaf(3));
    }

    #[test]
    fn join_is_commutative_on_a_concurrent_pair() {
        let a = Event::node(1, Event::leaf(1), Event::leaf(0));
        let b = Event::node(1, Event::leaf(0), Event::leaf(1));
        assert_eq!(a.join(&b), b.join(&a));
        assert_eq!(a.join(&b), Event::leaf(2));
    }

    #[test]
    fn leq_is_reflexive() {
        let e = Event::node(1, Event::leaf(1), Event::leaf(0));
        assert!(e.leq(&e));
    }

    #[test]
    fn leq_detects_concurrency() {
        let a = Event::node(1, Event::leaf(1), Event::leaf(0));
        let b = Event::node(1, Event::leaf(0), Event::leaf(1));
        assert!(!a.leq(&b));
        assert!(!b.leq(&a));
    }

    #[test]
    fn grow_minimality_picks_the_owned_side() {
        // From (0, absent, absent) with id Node(1, 0), grow must produce
        // (0, (1, absent, absent), absent), not (1, absent, absent), which
        // would incorrectly claim progress on the unowned right half.
        let id = Id::node(Id::one(), Id::zero());
        let grown = Event::zero().grow(&id);
        assert_eq!(grown, Event::node(0, Event::leaf(1), Event::zero()));
    }

    #[test]
    fn fill_is_noop_when_id_no_longer_covers_whole_interval() {
        let id = Id::node(Id::one(), Id::zero());
        let e = Event::leaf(1);
        assert_eq!(e.fill(&id), e);
    }

    #[test]
    fn fill_on_full_ownership_flattens_to_height() {
        let e = Event::node(1, Event::leaf(2), Event::leaf(0));
        assert_eq!(e.fill(&Id::one()), Event::leaf(3));
    }

    #[test]
    fn truncate_pushes_deficit_into_children_when_it_exceeds_the_base() {
        // base 1 can't absorb d=3; the remaining deficit of 2 is pushed
        // into both children, each truncated recursively in turn.
        let e = Event::node(
            1,
            Event::leaf(2),
            Event::node(0, Event::leaf(3), Event::leaf(1)),
        );
        let expected = Event::node(0, Event::leaf(0), Event::node(0, Event::leaf(1), Event::leaf(0)));
        assert_eq!(e.truncate(3), expected);
    }

    #[test]
    fn truncate_clamps_at_zero_rather_than_underflowing() {
        let e = Event::node(1, Event::leaf(2), Event::leaf(0));
        assert_eq!(e.truncate(100), Event::node(0, Event::leaf(0), Event::leaf(0)));
    }

    #[test]
    fn grow_full_ownership_on_split_event_lifts_shared_base() {
        // Id::one() denotes full ownership even when paired with an
        // already-split Event::Node; grow must lift the shared base by
        // the increment rather than flattening the tree into a leaf.
        let e = Event::node(1, Event::leaf(1), Event::zero());
        assert_eq!(e.grow(&Id::one()), Event::node(2, Event::leaf(1), Event::zero()));
    }

    proptest::proptest! {
        #[test]
        fn normalize_is_idempotent(a in 0u32..6, b in 0u32..6, c in 0u32..6) {
            let e = Event::node(a, Event::leaf(b), Event::leaf(c)).normalize();
            proptest::prop_assert_eq!(e.clone().normalize(), e);
        }

        #[test]
        fn join_is_commutative(a in 0u32..6, b in 0u32..6, c in 0u32..6, d in 0u32..6) {
            let x = Event::node(a, Event::leaf(b), Event::leaf(0)).normalize();
            let y = Event::node(c, Event::leaf(0), Event::leaf(d)).normalize();
            proptest::prop_assert_eq!(x.join(&y), y.join(&x));
        }

        #[test]
        fn join_absorbs_leq(a in 0u32..6, extra in 0u32..6) {
            let x = Event::leaf(a);
            let y = Event::leaf(a + extra);
            proptest::prop_assert!(x.leq(&y));
            proptest::prop_assert_eq!(x.join(&y), y.clone());
        }

        #[test]
        fn leq_is_reflexive_prop(a in 0u32..6, b in 0u32..6) {
            let e = Event::node(a, Event::leaf(b), Event::leaf(0)).normalize();
            proptest::prop_assert!(e.leq(&e));
        }
    }
}
