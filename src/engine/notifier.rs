//! Surface Notifier
//!
//! Hook for asking the external rendering surface to reload after the
//! snapshot changed. The host platform supplies the real implementation.

use std::sync::atomic::{AtomicUsize, Ordering};

pub trait SurfaceNotifier: Send + Sync {
    fn reload_timelines(&self);
}

/// Default notifier for hosts without a widget runtime
#[derive(Debug, Default)]
pub struct LogNotifier;

impl SurfaceNotifier for LogNotifier {
    fn reload_timelines(&self) {
        log::info!("Widget timeline reload requested");
    }
}

/// Counts reload requests
#[derive(Debug, Default)]
pub struct CountingNotifier {
    reloads: AtomicUsize,
}

impl CountingNotifier {
    pub fn count(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

impl SurfaceNotifier for CountingNotifier {
    fn reload_timelines(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}
