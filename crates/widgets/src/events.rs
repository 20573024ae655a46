//! Dashboard event dispatch.
//!
//! The embedder forwards page lifecycle and user events into one channel; a
//! single worker dispatches them. Handlers that wait (page load, lookups) run
//! as tasks so an `EngineLoaded` event is never stuck behind the wait it ends.
//! Theme changes and symbol picks claim their rebuilds before their task is
//! spawned, so the last event for a mount wins however the tasks are
//! scheduled.

use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::bootstrap::{engine_signal, Bootstrap, BootstrapConfig, EngineSignal};
use crate::coordinator::ThemeCoordinator;
use crate::report::RenderOutcome;
use crate::scanner::WidgetScanner;
use crate::session::WidgetSession;
use crate::theme::Theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Initial markup is in place.
    PageLoaded,
    /// The chart engine script finished loading.
    EngineLoaded,
    /// All page resources finished loading.
    WindowLoaded,
    /// A partial page update replaced some markup.
    FragmentSwapped,
    /// The root theme attribute changed.
    ThemeChanged(Theme),
    /// The user picked a ticker for a mount in the position calculator.
    SymbolSelected { mount_id: String, ticker: String },
}

impl DashboardEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::PageLoaded => "page_loaded",
            Self::EngineLoaded => "engine_loaded",
            Self::WindowLoaded => "window_loaded",
            Self::FragmentSwapped => "fragment_swapped",
            Self::ThemeChanged(_) => "theme_changed",
            Self::SymbolSelected { .. } => "symbol_selected",
        }
    }
}

/// Everything one dashboard page needs, wired together.
pub struct DashboardRuntime {
    session: Arc<WidgetSession>,
    bootstrap: Bootstrap,
    coordinator: ThemeCoordinator,
    engine: EngineSignal,
}

impl DashboardRuntime {
    pub fn new(session: Arc<WidgetSession>, config: BootstrapConfig) -> Self {
        let (engine, ready) = engine_signal();
        let scanner = WidgetScanner::new(session.clone());
        Self {
            bootstrap: Bootstrap::new(scanner, ready, config),
            coordinator: ThemeCoordinator::new(session.clone()),
            session,
            engine,
        }
    }

    pub fn session(&self) -> &Arc<WidgetSession> {
        &self.session
    }

    pub fn bootstrap(&self) -> &Bootstrap {
        &self.bootstrap
    }

    pub fn coordinator(&self) -> &ThemeCoordinator {
        &self.coordinator
    }

    pub fn engine(&self) -> &EngineSignal {
        &self.engine
    }

    fn dispatch(self: &Arc<Self>, event: DashboardEvent, tasks: &mut JoinSet<()>) {
        debug!("Dispatching {} event", event.name());
        match event {
            DashboardEvent::EngineLoaded => self.engine.mark_loaded(),
            DashboardEvent::WindowLoaded => {
                self.bootstrap.on_window_loaded();
            }
            DashboardEvent::PageLoaded => {
                let runtime = self.clone();
                tasks.spawn(async move {
                    if let Ok(report) = runtime.bootstrap.on_page_loaded().await {
                        debug!("Page load scan: {}", report.summary());
                    }
                });
            }
            DashboardEvent::FragmentSwapped => {
                let runtime = self.clone();
                tasks.spawn(async move {
                    let report = runtime.bootstrap.on_fragment_swapped().await;
                    debug!("Fragment swap scan: {}", report.summary());
                });
            }
            // Rebuilds are claimed here, in event order, before any task runs.
            DashboardEvent::ThemeChanged(theme) => {
                let rebuild = self.coordinator.begin_rebuild(theme);
                let runtime = self.clone();
                tasks.spawn(async move {
                    let report = runtime.coordinator.finish_rebuild(rebuild).await;
                    debug!("Theme rebuild: {}", report.summary());
                });
            }
            DashboardEvent::SymbolSelected { mount_id, ticker } => {
                let pending = match self.session.prepare_symbol_update(&mount_id, &ticker) {
                    Ok(pending) => pending,
                    Err(e) => {
                        warn!(
                            "Symbol update for {} failed ({} error): {}",
                            mount_id,
                            e.category(),
                            e
                        );
                        return;
                    }
                };
                let runtime = self.clone();
                tasks.spawn(async move {
                    match runtime.session.finish(pending).await {
                        Ok(RenderOutcome::Rendered(symbol)) => {
                            debug!("Chart {} now shows {}", mount_id, symbol)
                        }
                        Ok(outcome) => debug!("Symbol update for {}: {:?}", mount_id, outcome),
                        Err(e) => warn!(
                            "Symbol update for {} failed ({} error): {}",
                            mount_id,
                            e.category(),
                            e
                        ),
                    }
                });
            }
        }
    }
}

/// Runs the dashboard event worker until the channel closes.
///
/// Handlers still running when the channel closes are awaited before
/// returning.
pub async fn run_event_loop(
    mut rx: mpsc::UnboundedReceiver<DashboardEvent>,
    runtime: Arc<DashboardRuntime>,
) {
    info!("Dashboard event loop started");
    let mut tasks = JoinSet::new();

    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(event) => runtime.dispatch(event, &mut tasks),
                None => break,
            },
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(e) = joined {
                    error!("Dashboard event handler failed: {}", e);
                }
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            error!("Dashboard event handler failed: {}", e);
        }
    }
    info!("Dashboard event loop shutting down");
}
