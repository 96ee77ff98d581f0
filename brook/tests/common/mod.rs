#![allow(dead_code)]

use brook::{FnTable, ResourceStream, SharedStream, stream_for};
use std::{cell::Cell, rc::Rc};

// ============================================================================
// Test Streams
// ============================================================================

/// A shared in-memory stream holding `content`, positioned at the start.
pub fn shared(content: &str) -> SharedStream<ResourceStream> {
    SharedStream::new(stream_for(content))
}

// ============================================================================
// Counters
// ============================================================================

/// Counts how many times a behavior fired.
#[derive(Clone, Default)]
pub struct Calls(Rc<Cell<usize>>);

impl Calls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hit(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn count(&self) -> usize {
        self.0.get()
    }

    /// A table whose `close` behavior increments this counter.
    pub fn closing_table(&self) -> FnTable {
        let calls = self.clone();
        FnTable::new().close(move || {
            calls.hit();
            Ok(())
        })
    }
}
