//! Non-fatal diagnostics.
//!
//! Some failures must never reach the caller: string conversion is total,
//! and a drop cannot return an error. Those failures are turned into a
//! [`Diagnostic`] instead of being propagated.
//!
//! A diagnostic is emitted as a `tracing` event (with the `tracing`
//! feature) and appended to the innermost [`capture`] running on the
//! current thread, if any.
//!
//! # Example
//!
//! ```rust
//! use brook_core::diagnostic::{self, Severity};
//!
//! let ((), diagnostics) = diagnostic::capture(|| {
//!     let err = brook_core::StreamError::custom("boom");
//!     diagnostic::report(Severity::Error, "demo::op", &err);
//! });
//! assert_eq!(diagnostics.len(), 1);
//! assert_eq!(diagnostics[0].message, "demo::op exception: boom");
//! ```

use std::{cell::RefCell, error::Error};

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A teardown failure that was swallowed.
    Warning,
    /// An operation failed and a fallback value was returned instead.
    Error,
}

/// A recorded, non-fatal failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity of the failure.
    pub severity: Severity,
    /// Qualified name of the failing operation.
    pub source: String,
    /// Full message, prefixed by `source`.
    pub message: String,
}

thread_local! {
    static CAPTURES: RefCell<Vec<Vec<Diagnostic>>> = const { RefCell::new(Vec::new()) };
}

/// Report a swallowed failure of the operation named by `source`.
pub fn report(severity: Severity, source: &str, error: &dyn Error) {
    let message = format!("{source} exception: {error}");

    #[cfg(feature = "tracing")]
    match severity {
        Severity::Error => tracing::error!(target: "brook::diagnostic", %source, "{message}"),
        Severity::Warning => tracing::warn!(target: "brook::diagnostic", %source, "{message}"),
    }

    // Unavailable while thread-locals are torn down; the event above still fires.
    let _ = CAPTURES.try_with(|captures| {
        if let Some(frame) = captures.borrow_mut().last_mut() {
            frame.push(Diagnostic {
                severity,
                source: source.to_owned(),
                message,
            });
        }
    });
}

/// Run `f`, collecting every diagnostic reported on this thread meanwhile.
///
/// Captures nest; a diagnostic is delivered to the innermost one only.
pub fn capture<R>(f: impl FnOnce() -> R) -> (R, Vec<Diagnostic>) {
    let frame = Frame::push();
    let result = f();
    (result, frame.finish())
}

/// Pops its capture frame even when `f` unwinds.
struct Frame {
    done: bool,
}

impl Frame {
    fn push() -> Self {
        CAPTURES.with(|captures| captures.borrow_mut().push(Vec::new()));
        Self { done: false }
    }

    fn finish(mut self) -> Vec<Diagnostic> {
        self.done = true;
        CAPTURES
            .try_with(|captures| captures.borrow_mut().pop())
            .ok()
            .flatten()
            .unwrap_or_default()
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        if !self.done {
            let _ = CAPTURES.try_with(|captures| captures.borrow_mut().pop());
        }
    }
}
