pub mod content;
pub mod events;
pub mod queue;

pub use content::{MediaMessage, MessageContent};
pub use events::{BusEvent, ConnectionEvent, InboundEvent, MessageUpdate};
pub use queue::{EventPublisher, EventQueue};
