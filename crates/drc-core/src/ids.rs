//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can key maps and sort without
//! ceremony.  The inner integer is `pub` for direct indexing into parallel
//! `Vec`s via `id.0 as usize`; prefer the `.index()` helper for clarity.
//! Workers, skills, stations, and routes are dense indices fixed at
//! construction; `JobId`s come from a monotonic counter and are never reused
//! within a run.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! dense_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Construct from a `usize` index.  Truncates in release mode;
            /// callers are expected to stay within the dense range.
            #[inline(always)]
            pub fn new(index: usize) -> Self {
                debug_assert!(index < <$inner>::MAX as usize);
                $name(index as $inner)
            }

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", stringify!($name).trim_end_matches("Id"), self.0)
            }
        }
    };
}

dense_id! {
    /// Index of a worker in the workforce.
    pub struct WorkerId(u32);
}

dense_id! {
    /// Index of a qualification (skill) in the qualification matrix.
    pub struct SkillId(u16);
}

dense_id! {
    /// Index of a station (capacity-limited machine group).
    pub struct StationId(u16);
}

dense_id! {
    /// Index of a route (ordered station sequence followed by one product).
    pub struct RouteId(u16);
}

dense_id! {
    /// Identity of one order.  Monotonic within a run, never reused.
    pub struct JobId(u64);
}
