//! The Stamp: an (ID, Event) pair and the four canonical ITC verbs.

use crate::error::ItcError;
use crate::event::Event;
use crate::id::Id;

/// An Interval Tree Clock value: an ownership share (`id`) paired with a
/// causal history (`event`).
///
/// Stamps are immutable; every operation returns a fresh `Stamp`. The seed
/// stamp owns the whole interval and has seen no events:
///
/// ```
/// use itc::Stamp;
///
/// let s = Stamp::seed();
///
/// let (s1, s2) = s.fork().unwrap();
/// let s1prime = s1.event().unwrap();
/// let s2prime = s2.event().unwrap();
/// let s3 = s2prime.join(&s1);
///
/// assert!(s.leq(&s1));
/// assert!(s1.leq(&s1prime));
/// assert!(!s1prime.leq(&s2prime));
/// assert!(s2prime.leq(&s3));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp {
    pub(crate) id: Id,
    pub(crate) event: Event,
}

impl Stamp {
    /// Builds a stamp from an explicit id and event.
    pub fn new(id: Id, event: Event) -> Stamp {
        Stamp { id, event }
    }

    /// The seed stamp: owns the whole interval, has recorded no events.
    pub fn seed() -> Stamp {
        Stamp::new(Id::one(), Event::zero())
    }

    /// This stamp's id.
    pub fn id(&self) -> &Id {
        &self.id
    }

    /// This stamp's event history.
    pub fn event_tree(&self) -> &Event {
        &self.event
    }

    /// Splits this stamp into two with disjoint ids and the same event
    /// history, so forked participants share all prior causality but can
    /// stamp independently going forward.
    ///
    /// Fails with [`ItcError::EmptyFork`] if `self` is anonymous
    /// (`id == Id::zero()`).
    pub fn fork(&self) -> Result<(Stamp, Stamp), ItcError> {
        let (id1, id2) = self.id.fork()?;
        tracing::trace!(?id1, ?id2, "stamp forked");
        Ok((
            Stamp::new(id1, self.event.clone()),
            Stamp::new(id2, self.event.clone()),
        ))
    }

    /// Records a local progress step: fills the event tree if that alone
    /// brings it up to date with this stamp's ownership, otherwise grows it
    /// by the smallest amount that represents new causality.
    ///
    /// Fails with [`ItcError::AnonymousEvent`] if `self` is anonymous — a
    /// participant with no owned share cannot emit new causality.
    pub fn event(&self) -> Result<Stamp, ItcError> {
        if !self.id.is_truthy() {
            return Err(ItcError::AnonymousEvent);
        }
        let filled = self.event.fill(&self.id);
        let next_event = if filled != self.event {
            filled
        } else {
            self.event.grow(&self.id)
        };
        tracing::trace!(id = ?self.id, "event recorded");
        Ok(Stamp::new(self.id.clone(), next_event))
    }

    /// Merges two stamps' causality, and — when the ids are disjoint —
    /// their ownership as well.
    pub fn join(&self, other: &Stamp) -> Stamp {
        let id = self.id.join(&other.id);
        let event = self.event.join(&other.event);
        tracing::trace!("stamps joined");
        Stamp::new(id, event)
    }

    /// Produces an anonymous observer copy of this stamp's history: the
    /// original stamp unchanged, and a copy with `id == Id::zero()` that can
    /// be forwarded to others without delegating this participant's
    /// authority to stamp new events.
    pub fn peek(&self) -> (Stamp, Stamp) {
        let anonymous = Stamp::new(Id::zero(), self.event.clone());
        (self.clone(), anonymous)
    }

    /// `true` iff `self`'s causal history happened-before or is equal to
    /// `other`'s — ids play no part, only recorded events do.
    pub fn leq(&self, other: &Stamp) -> bool {
        self.event.leq(&other.event)
    }

    /// Events recorded, then peeked for sending: a convenience composition
    /// of [`Stamp::event`] followed by [`Stamp::peek`].
    pub fn send(&self) -> Result<(Stamp, Stamp), ItcError> {
        Ok(self.event()?.peek())
    }

    /// Joins with a received stamp, then records a local event: a
    /// convenience composition of [`Stamp::join`] followed by
    /// [`Stamp::event`].
    pub fn receive(&self, other: &Stamp) -> Result<Stamp, ItcError> {
        self.join(other).event()
    }

    /// Joins with a peer, then re-forks: a convenience composition of
    /// [`Stamp::join`] followed by [`Stamp::fork`], useful when two
    /// participants want to reconcile and immediately split again.
    pub fn sync(&self, other: &Stamp) -> Result<(Stamp, Stamp), ItcError> {
        self.join(other).fork()
    }
}
