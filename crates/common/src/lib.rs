pub mod config;
pub mod logging;

pub use config::Environment;
pub use logging::setup_logging;

/// Enter a trace-level span for the rest of the enclosing scope.
///
/// ```ignore
/// let _s = common::span!("normalize");
/// ```
#[macro_export]
macro_rules! span {
    ($name:expr) => {
        tracing::trace_span!($name).entered()
    };
}
