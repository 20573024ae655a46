//! Page lifecycle hooks: initial load, engine readiness, fragment swaps.

use std::time::Duration;

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::errors::{Result, WidgetError};
use crate::report::ScanReport;
use crate::scanner::WidgetScanner;

/// How long page load waits for the chart engine script.
pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(5);
/// Delay between a fragment swap and the rescan, letting the new markup settle.
pub const DEFAULT_SWAP_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapConfig {
    pub engine_timeout: Duration,
    pub swap_delay: Duration,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            engine_timeout: DEFAULT_ENGINE_TIMEOUT,
            swap_delay: DEFAULT_SWAP_DELAY,
        }
    }
}

/// Create a linked engine-ready signal pair.
pub fn engine_signal() -> (EngineSignal, EngineReady) {
    let (tx, rx) = watch::channel(false);
    (EngineSignal { tx }, EngineReady { rx })
}

/// Raised once when the chart engine script has loaded.
pub struct EngineSignal {
    tx: watch::Sender<bool>,
}

impl EngineSignal {
    pub fn mark_loaded(&self) {
        if !self.tx.send_replace(true) {
            debug!("Chart engine loaded");
        }
    }

    pub fn is_loaded(&self) -> bool {
        *self.tx.borrow()
    }
}

/// Observer side of the engine-ready signal.
#[derive(Clone)]
pub struct EngineReady {
    rx: watch::Receiver<bool>,
}

impl EngineReady {
    pub fn is_loaded(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the engine is loaded or `timeout` elapses.
    ///
    /// A dropped signal counts as a timeout: the engine can no longer load.
    pub async fn wait(&self, timeout: Duration) -> Result<()> {
        let mut rx = self.rx.clone();
        let loaded = match tokio::time::timeout(timeout, rx.wait_for(|loaded| *loaded)).await {
            Ok(Ok(_)) => true,
            Ok(Err(_)) | Err(_) => false,
        };
        if loaded {
            Ok(())
        } else {
            Err(WidgetError::EngineUnavailable {
                timeout_ms: timeout.as_millis() as u64,
            })
        }
    }
}

/// Runs the scanner at the right moments of the page lifecycle.
pub struct Bootstrap {
    scanner: WidgetScanner,
    engine: EngineReady,
    config: BootstrapConfig,
}

impl Bootstrap {
    pub fn new(scanner: WidgetScanner, engine: EngineReady, config: BootstrapConfig) -> Self {
        Self {
            scanner,
            engine,
            config,
        }
    }

    pub fn scanner(&self) -> &WidgetScanner {
        &self.scanner
    }

    /// Initial page load: wait once for the engine, then scan.
    ///
    /// On timeout nothing is built and no retry is scheduled; mounts keep
    /// their fallback content.
    pub async fn on_page_loaded(&self) -> Result<ScanReport> {
        if let Err(e) = self.engine.wait(self.config.engine_timeout).await {
            warn!("{}; widgets will not be initialized", e);
            return Err(e);
        }
        info!("Chart engine ready, initializing widgets");
        Ok(self.scanner.scan_and_initialize_all().await)
    }

    /// A page fragment was swapped in: rescan after the settle delay.
    pub async fn on_fragment_swapped(&self) -> ScanReport {
        tokio::time::sleep(self.config.swap_delay).await;
        debug!("Fragment swapped, rescanning widget mounts");
        self.scanner.scan_and_initialize_all().await
    }

    /// Final load check. Returns whether the engine is loaded.
    pub fn on_window_loaded(&self) -> bool {
        let loaded = self.engine.is_loaded();
        if !loaded && !self.scanner.session().document().mounts().is_empty() {
            warn!("Chart engine still not loaded at window load; widgets may not render");
        }
        loaded
    }
}
