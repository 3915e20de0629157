use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::warn;

/// Receives key/value observations. Having no sink attached must never
/// change simulation behavior.
pub trait DiagnosticsSink {
    fn report(&mut self, key: &'static str, value: String);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullDiagnostics;

impl DiagnosticsSink for NullDiagnostics {
    fn report(&mut self, _key: &'static str, _value: String) {}
}

/// Shared latest-value table. Clones observe the same entries.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticsHandle {
    entries: Arc<RwLock<BTreeMap<&'static str, String>>>,
    poison_warned: Arc<AtomicBool>,
}

impl DiagnosticsHandle {
    pub fn get(&self, key: &str) -> Option<String> {
        match self.entries.read() {
            Ok(guard) => guard.get(key).cloned(),
            Err(poisoned) => {
                self.warn_poison_once("read");
                poisoned.into_inner().get(key).cloned()
            }
        }
    }

    pub fn snapshot(&self) -> Vec<(&'static str, String)> {
        let collect = |entries: &BTreeMap<&'static str, String>| {
            entries
                .iter()
                .map(|(key, value)| (*key, value.clone()))
                .collect::<Vec<_>>()
        };
        match self.entries.read() {
            Ok(guard) => collect(&*guard),
            Err(poisoned) => {
                self.warn_poison_once("read");
                collect(&*poisoned.into_inner())
            }
        }
    }

    /// One-line `key: value` rendering, ordered by key.
    pub fn summary_line(&self) -> String {
        self.snapshot()
            .into_iter()
            .map(|(key, value)| format!("{key}: {value}"))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn warn_poison_once(&self, operation: &'static str) {
        if self
            .poison_warned
            .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
            .is_ok()
        {
            warn!(operation, "diagnostics lock poisoned; recovered inner value");
        }
    }
}

impl DiagnosticsSink for DiagnosticsHandle {
    fn report(&mut self, key: &'static str, value: String) {
        match self.entries.write() {
            Ok(mut guard) => {
                guard.insert(key, value);
            }
            Err(poisoned) => {
                self.warn_poison_once("write");
                poisoned.into_inner().insert(key, value);
            }
        }
    }
}
