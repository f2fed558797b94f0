use super::DiagnosticLogger;

/// Routes plugin diagnostics into the process-wide `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl DiagnosticLogger for TracingLogger {
    fn warn(&self, message: &str) {
        tracing::warn!(target: "lakera_guard.plugin", "{}", message);
    }
}
