use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use chartsync_market_data::{ExchangeResolver, HttpInstrumentLookup, InstrumentLookup};
use chartsync_widgets::theme::ROOT_THEME_ATTR;
use chartsync_widgets::{
    DashboardRuntime, Document, InMemoryDocument, MountOutcome, RenderOutcome, Theme,
    WidgetSession,
};

use crate::args::Args;
use crate::config::Config;

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn load_page(args: &Args) -> anyhow::Result<Arc<InMemoryDocument>> {
    let raw = std::fs::read_to_string(&args.page)
        .with_context(|| format!("Failed to read page fixture {}", args.page.display()))?;
    let doc = InMemoryDocument::from_json(&raw)
        .with_context(|| format!("Invalid page fixture {}", args.page.display()))?;
    Ok(Arc::new(doc))
}

pub fn build_runtime(
    config: &Config,
    document: Arc<InMemoryDocument>,
    lookup: Arc<dyn InstrumentLookup>,
) -> Arc<DashboardRuntime> {
    let resolver = Arc::new(ExchangeResolver::new(lookup));
    let session = Arc::new(WidgetSession::new(
        resolver,
        document,
        config.widget_settings(),
    ));
    Arc::new(DashboardRuntime::new(session, config.bootstrap_config()))
}

pub fn http_lookup(config: &Config) -> Arc<dyn InstrumentLookup> {
    tracing::info!("Resolving instruments against {}", config.api_url);
    Arc::new(HttpInstrumentLookup::with_timeout(
        config.api_url.clone(),
        config.lookup_timeout,
    ))
}

/// Drive one dashboard session: page load, symbol picks, then a theme switch.
pub async fn run(
    args: &Args,
    document: &InMemoryDocument,
    runtime: &DashboardRuntime,
) -> anyhow::Result<()> {
    if !args.no_engine {
        runtime.engine().mark_loaded();
    }

    match runtime.bootstrap().on_page_loaded().await {
        Ok(report) => tracing::info!("Initial scan: {}", report.summary()),
        Err(e) => tracing::warn!("Initial scan skipped: {}", e),
    }
    runtime.bootstrap().on_window_loaded();

    for (mount_id, ticker) in &args.selections {
        match runtime.session().update_symbol(mount_id, ticker).await {
            Ok(RenderOutcome::Rendered(symbol)) => {
                tracing::info!("{} now charts {}", mount_id, symbol)
            }
            Ok(outcome) => tracing::info!("{}: {:?}", mount_id, outcome),
            Err(e) => tracing::warn!("Could not select {} for {}: {}", ticker, mount_id, e),
        }
    }

    if let Some(theme) = args.theme {
        apply_theme(document, runtime, theme).await?;
    }
    Ok(())
}

async fn apply_theme(
    document: &InMemoryDocument,
    runtime: &DashboardRuntime,
    theme: Theme,
) -> anyhow::Result<()> {
    document.set_root_attribute(ROOT_THEME_ATTR, theme.as_str());
    let report = runtime
        .coordinator()
        .on_theme_changed(theme)
        .await
        .context("Theme rebuild task failed")?;
    for attempt in &report.attempts {
        if let MountOutcome::Failed { category, message } = &attempt.outcome {
            tracing::warn!("{} ({} error): {}", attempt.mount_id, category, message);
        }
    }
    tracing::info!("Theme rebuild: {}", report.summary());
    Ok(())
}

/// Render the final page as one HTML block per mount.
pub fn render_mounts(document: &InMemoryDocument) -> String {
    document
        .mounts()
        .iter()
        .map(|mount| {
            let html = document.inner_html(&mount.id).unwrap_or_default();
            format!("<!-- {} -->\n{}\n", mount.id, html)
        })
        .collect()
}
