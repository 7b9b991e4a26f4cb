//! Event handle values.

use core::sync::atomic::{AtomicU32, Ordering};

/// Next handle value to hand out. Zero is reserved as the invalid handle.
static NEXT_HANDLE: AtomicU32 = AtomicU32::new(1);

/// Opaque handle identifying an event to a remote client.
///
/// This is the value written into a response as a copied handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EventHandle(u32);

impl EventHandle {
    /// The invalid handle.
    pub const INVALID: Self = Self(0);

    /// Allocates a process-unique handle value.
    pub(crate) fn next() -> Self {
        Self(NEXT_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns `true` if the handle is valid.
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    /// Converts the [`EventHandle`] to a raw handle value.
    pub fn to_raw(&self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for EventHandle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}
