//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod counter_store;
mod transport;

pub use clock::{Clock, SystemClock};
pub use counter_store::{CounterStore, StoreError};
pub use transport::{TransportError, WebhookTransport};
