//! Stale-result discard for boards requested while an earlier fetch is
//! still in flight.

use std::cell::Cell;

/// Stamp of one board or pathfinder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// Issues monotonically increasing [`RequestId`]s and tells whether a
/// finished request is still the newest one.
///
/// The tracker never interrupts work in flight. A caller stamps each
/// request with [`begin`](Self::begin), awaits it, then passes the result
/// through [`accept`](Self::accept), which drops it if a newer request has
/// started since.
#[derive(Debug, Default)]
pub struct RequestTracker {
    latest: Cell<u64>,
}

impl RequestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request, superseding all earlier ones.
    pub fn begin(&self) -> RequestId {
        let id = self.latest.get().wrapping_add(1);
        self.latest.set(id);
        RequestId(id)
    }

    /// The newest request, if any has been started.
    pub fn latest(&self) -> Option<RequestId> {
        match self.latest.get() {
            0 => None,
            id => Some(RequestId(id)),
        }
    }

    /// Whether `id` is still the newest request.
    pub fn is_current(&self, id: RequestId) -> bool {
        self.latest.get() == id.0
    }

    /// Pass `value` through if `id` is current, drop it otherwise.
    pub fn accept<T>(&self, id: RequestId, value: T) -> Option<T> {
        if self.is_current(id) {
            Some(value)
        } else {
            log::debug!(
                "discarding result of request {} superseded by {}",
                id.0,
                self.latest.get()
            );
            None
        }
    }
}
