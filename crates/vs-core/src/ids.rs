//! Strongly typed identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they work as `BTreeMap`/`HashMap` keys
//! without ceremony.  Node IDs are chosen by the scenario; event, handler,
//! and message IDs are minted by the engine in strictly increasing order,
//! which is what makes them usable as deterministic tie-breakers.

use std::fmt;

/// Generate a typed ID wrapper around an unsigned integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty) => $prefix:literal;) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// The raw integer value.
            #[inline(always)]
            pub fn get(self) -> $inner {
                self.0
            }

            /// The identifier that follows `self` in minting order.
            #[inline]
            pub fn next(self) -> $name {
                $name(self.0 + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Identity of a simulated node, unique within one simulator.
    pub struct NodeId(u32) => "node#";
}

typed_id! {
    /// Identity of a scheduled event.  Doubles as the equal-time tie-break
    /// sequence number.
    pub struct EventId(u64) => "event#";
}

typed_id! {
    /// Index of a registered user event handler.
    pub struct HandlerId(u32) => "handler#";
}

typed_id! {
    /// Identity of one sent message (shared by every copy of a broadcast).
    pub struct MessageId(u64) => "msg#";
}
