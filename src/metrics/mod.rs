//! Run counters and the optional Prometheus endpoint.
//!
//! Each observable step of a run (a record accepted, a row rejected, values
//! dropped by truncation, a sink call timed) is a small event struct in
//! [`events`]. Without an installed recorder the calls are no-ops, so library
//! users only pay for metrics when the binary calls [`init`].

pub mod events;
pub mod server;

pub use server::init;

/// Record a transcoding event.
///
/// Expands to `InternalEvent::emit(event)`, which updates the
/// `sleet_*` series the event maps to.
///
/// ```ignore
/// use sleet::metrics::events::{RejectReason, RowRejected};
///
/// emit!(RowRejected { reason: RejectReason::Short });
/// ```
#[macro_export]
macro_rules! emit {
    ($event:expr) => {
        $crate::metrics::events::InternalEvent::emit($event)
    };
}
