//! Named logging facility.
//!
//! Every injector binds [`Logger`] so injected code can ask for a logger
//! named after itself. Events go through `tracing` with the logger name
//! attached as the `logger` field.

use std::fmt;

use tracing::{debug, error, info, trace, warn};

/// A logger scoped to a name, usually the simple name of the type that
/// requested it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Logger {
    name: String,
}

impl Logger {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn trace(&self, message: impl fmt::Display) {
        trace!(logger = %self.name, "{message}");
    }

    pub fn debug(&self, message: impl fmt::Display) {
        debug!(logger = %self.name, "{message}");
    }

    pub fn info(&self, message: impl fmt::Display) {
        info!(logger = %self.name, "{message}");
    }

    pub fn warn(&self, message: impl fmt::Display) {
        warn!(logger = %self.name, "{message}");
    }

    pub fn error(&self, message: impl fmt::Display) {
        error!(logger = %self.name, "{message}");
    }
}

impl fmt::Display for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Logger({})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logger_keeps_its_name() {
        let logger = Logger::new("Garage");
        assert_eq!(logger.name(), "Garage");
        assert_eq!(logger.to_string(), "Logger(Garage)");
    }

    #[test]
    fn logging_without_subscriber_is_silent() {
        let logger = Logger::new("Quiet");
        logger.info("nobody listens");
        logger.error(format_args!("{} failures", 0));
    }
}
