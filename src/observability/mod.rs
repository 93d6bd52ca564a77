//! Observability subsystem
//!
//! Structured JSON logging with typed events. Logging never affects the
//! outcome of the operation being logged.
//!
//! # Usage
//!
//! ```ignore
//! use scim_import::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::UserCreated, &[("id", "...")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a typed event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
