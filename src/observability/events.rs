//! Observable events
//!
//! Every user lifecycle outcome and server milestone has a typed event.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Process
    /// Configuration loaded and validated
    ConfigLoaded,
    /// HTTP listener about to bind
    ServerStarting,
    /// Listener bound, accepting requests
    Serving,
    /// Runtime or listener could not start
    BootFailed,

    // Requests
    RequestReceived,
    ResponseSent,
    /// Authentication gate refused a request
    AuthRejected,
    /// Client exceeded its request budget
    RateLimited,
    /// No route matched
    RouteNotFound,

    // User lifecycle
    UserCreated,
    UserConflict,
    UserValidationFailed,
    UsersListed,
    UserRetrieved,
    UserUpdated,
    UserDeleted,
    UserNotFound,

    /// Unexpected fault caught at the HTTP boundary
    InternalError,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ServerStarting => "SERVER_STARTING",
            Event::Serving => "SERVING",
            Event::BootFailed => "BOOT_FAILED",

            Event::RequestReceived => "REQUEST_RECEIVED",
            Event::ResponseSent => "RESPONSE_SENT",
            Event::AuthRejected => "AUTH_REJECTED",
            Event::RateLimited => "RATE_LIMITED",
            Event::RouteNotFound => "ROUTE_NOT_FOUND",

            Event::UserCreated => "USER_CREATED",
            Event::UserConflict => "USER_CONFLICT",
            Event::UserValidationFailed => "USER_VALIDATION_FAILED",
            Event::UsersListed => "USERS_LISTED",
            Event::UserRetrieved => "USER_RETRIEVED",
            Event::UserUpdated => "USER_UPDATED",
            Event::UserDeleted => "USER_DELETED",
            Event::UserNotFound => "USER_NOT_FOUND",

            Event::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::BootFailed => Severity::Fatal,
            Event::InternalError => Severity::Error,
            Event::AuthRejected | Event::RateLimited => Severity::Warn,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::UserCreated.as_str(), "USER_CREATED");
        assert_eq!(Event::UserNotFound.to_string(), "USER_NOT_FOUND");
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(Event::InternalError.severity(), Severity::Error);
        assert_eq!(Event::AuthRejected.severity(), Severity::Warn);
        assert_eq!(Event::RateLimited.severity(), Severity::Warn);
        assert_eq!(Event::BootFailed.severity(), Severity::Fatal);
        assert_eq!(Event::UserConflict.severity(), Severity::Info);
    }
}
