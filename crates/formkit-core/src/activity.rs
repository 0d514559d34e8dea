//! Per-field busy flags (uploading, loading options).
//!
//! The rendering layer disables a field's control while its flag is set, so
//! at most one operation runs per field name.

use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Default)]
pub struct ActivityFlags {
    flags: Mutex<HashMap<String, bool>>,
}

impl ActivityFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `field` busy. Returns false when it already was.
    pub fn begin(&self, field: &str) -> bool {
        let mut flags = self.flags.lock().unwrap_or_else(|e| e.into_inner());
        let slot = flags.entry(field.to_string()).or_insert(false);
        if *slot {
            return false;
        }
        *slot = true;
        true
    }

    pub fn finish(&self, field: &str) {
        let mut flags = self.flags.lock().unwrap_or_else(|e| e.into_inner());
        flags.insert(field.to_string(), false);
    }

    pub fn is_active(&self, field: &str) -> bool {
        let flags = self.flags.lock().unwrap_or_else(|e| e.into_inner());
        flags.get(field).copied().unwrap_or(false)
    }

    /// Snapshot of every flag ever set, keyed by field name.
    pub fn snapshot(&self) -> HashMap<String, bool> {
        self.flags.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

/// Clears a flag when dropped, so early returns and errors cannot leave a
/// field stuck busy.
pub(crate) struct ActivityGuard<'a> {
    flags: &'a ActivityFlags,
    field: String,
}

impl<'a> ActivityGuard<'a> {
    pub(crate) fn acquire(flags: &'a ActivityFlags, field: &str) -> Option<Self> {
        flags.begin(field).then(|| Self {
            flags,
            field: field.to_string(),
        })
    }
}

impl Drop for ActivityGuard<'_> {
    fn drop(&mut self) {
        self.flags.finish(&self.field);
    }
}
