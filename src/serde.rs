// Mirror `Id`, `Event`, and `Stamp` for compact json serialization in the
// form [4, [0, 1, 0], 1] etc, rather than the self-describing tagged enum
// the plain derive would produce.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::{Event, Id, Stamp};

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TupleId {
    Leaf(u8),
    Node(Box<TupleId>, Box<TupleId>),
}

impl From<&Id> for TupleId {
    fn from(id: &Id) -> Self {
        match id {
            Id::Leaf(v) => TupleId::Leaf(*v as u8),
            Id::Node(l, r) => {
                TupleId::Node(Box::new(TupleId::from(l.as_ref())), Box::new(TupleId::from(r.as_ref())))
            }
        }
    }
}

impl From<&TupleId> for Id {
    fn from(tuple: &TupleId) -> Self {
        match tuple {
            TupleId::Leaf(v) => Id::Leaf(*v == 1), // convert the integer back to bool
            TupleId::Node(l, r) => Id::Node(Box::new(Id::from(l.as_ref())), Box::new(Id::from(r.as_ref()))),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TupleEvent {
    Leaf(u32),
    Node(Box<TupleEvent>, u32, Box<TupleEvent>),
}

impl From<&Event> for TupleEvent {
    fn from(event: &Event) -> Self {
        match event {
            Event::Leaf(n) => TupleEvent::Leaf(*n),
            Event::Node(n, l, r) => TupleEvent::Node(
                Box::new(TupleEvent::from(l.as_ref())),
                *n,
                Box::new(TupleEvent::from(r.as_ref())),
            ),
        }
    }
}

impl From<&TupleEvent> for Event {
    fn from(tuple: &TupleEvent) -> Self {
        match tuple {
            TupleEvent::Leaf(n) => Event::Leaf(*n),
            TupleEvent::Node(l, n, r) => {
                Event::Node(*n, Box::new(Event::from(l.as_ref())), Box::new(Event::from(r.as_ref())))
            }
        }
    }
}

#[derive(Serialize, Deserialize)]
struct TupleStamp {
    id: TupleId,
    event: TupleEvent,
}

impl Serialize for Stamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        TupleStamp {
            id: TupleId::from(self.id()),
            event: TupleEvent::from(self.event_tree()),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Stamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        TupleStamp::deserialize(deserializer)
            .map(|TupleStamp { id, event }| Stamp::new(Id::from(&id), Event::from(&event)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stamp_round_trips() {
        let stamp = Stamp::seed();
        let serialized = serde_json::to_string(&stamp).unwrap();
        assert_eq!(serialized, "{\"id\":1,\"event\":0}");
        let decoded: Stamp = serde_json::from_str(&serialized).unwrap();
        assert_eq!(stamp, decoded);
    }

    #[test]
    fn nested_stamp_round_trips() {
        let stamp = Stamp::new(
            Id::node(Id::node(Id::one(), Id::zero()), Id::zero()),
            Event::node(0, Event::node(1, Event::leaf(1), Event::zero()), Event::zero()),
        );
        let serialized = serde_json::to_string(&stamp).unwrap();
        assert_eq!(serialized, "{\"id\":[[1,0],0],\"event\":[[1,1,0],0,0]}");
        let decoded: Stamp = serde_json::from_str(&serialized).unwrap();
        assert_eq!(stamp, decoded);
    }
}
