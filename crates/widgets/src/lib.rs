//! Chartsync Widgets
//!
//! Builds embedded chart widgets into dashboard mount points and keeps them in
//! step with the page theme.
//!
//! # Architecture
//!
//! ```text
//! +-------------------+     +--------------------+
//! | DashboardRuntime  |---->| Bootstrap          |  page load, fragment swap
//! |  (event loop)     |     +---------+----------+
//! |                   |               |
//! |                   |     +---------v----------+
//! |                   |     | WidgetScanner      |  compact mounts
//! |                   |     +---------+----------+
//! |                   |               |
//! |                   |---->+---------v----------+     +------------------+
//! |                   |     | WidgetSession      |---->| ExchangeResolver |
//! |                   |     |  generations       |     +------------------+
//! |                   |     |  WidgetFactory     |
//! |                   |     +---------^----------+
//! |                   |               |
//! |                   |---->+---------+----------+
//! +-------------------+     | ThemeCoordinator   |  every rendered mount
//!                           +--------------------+
//! ```
//!
//! The page itself is reached only through [`Document`]; [`InMemoryDocument`]
//! backs the snapshot tool and the tests.

pub mod bootstrap;
pub mod config;
pub mod coordinator;
pub mod dom;
pub mod errors;
pub mod events;
pub mod factory;
pub mod generation;
pub mod memory;
pub mod report;
pub mod scanner;
pub mod session;
pub mod settings;
pub mod theme;

#[cfg(test)]
mod test_support;

pub use bootstrap::{
    engine_signal, Bootstrap, BootstrapConfig, EngineReady, EngineSignal, DEFAULT_ENGINE_TIMEOUT,
    DEFAULT_SWAP_DELAY,
};
pub use config::{AdvancedChartConfig, CompactWidgetConfig, WidgetConfig};
pub use coordinator::{ThemeCoordinator, ThemeRebuild};
pub use dom::{Document, Element, WidgetKind, WidgetMount};
pub use errors::{Result, WidgetError};
pub use events::{run_event_loop, DashboardEvent, DashboardRuntime};
pub use factory::WidgetFactory;
pub use generation::{GenerationTracker, RenderTicket};
pub use memory::{InMemoryDocument, MountNode, PageState};
pub use report::{MountOutcome, RenderOutcome, ScanReport, SkipReason};
pub use scanner::WidgetScanner;
pub use session::{PendingRender, WidgetSession};
pub use settings::WidgetSettings;
pub use theme::{current_theme, Theme};
