//! Session events and the pub/sub bus that carries them.
//!
//! The gateway and the authentication service publish here; the router (or
//! the console binary) subscribes and performs the navigation.

pub mod bus;
pub mod in_memory_bus;
pub mod session_event;

pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use session_event::SessionEvent;
