use std::time::Duration;

use chartsync_widgets::{BootstrapConfig, WidgetSettings};

pub struct Config {
    pub api_url: String,
    pub lookup_timeout: Duration,
    pub engine_timeout: Duration,
    pub swap_delay: Duration,
    pub locale: String,
    pub date_range: String,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let millis = |key: &str, default: u64| -> Duration {
            let ms = var(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(default);
            Duration::from_millis(ms)
        };
        Self {
            api_url: var("CHARTSYNC_API_URL").unwrap_or_else(|| "http://localhost:8080".into()),
            lookup_timeout: millis("CHARTSYNC_LOOKUP_TIMEOUT_MS", 10_000),
            engine_timeout: millis("CHARTSYNC_ENGINE_TIMEOUT_MS", 5_000),
            swap_delay: millis("CHARTSYNC_SWAP_DELAY_MS", 100),
            locale: var("CHARTSYNC_LOCALE").unwrap_or_else(|| "en".into()),
            date_range: var("CHARTSYNC_DATE_RANGE").unwrap_or_else(|| "12M".into()),
            log_format: var("CHARTSYNC_LOG_FORMAT").unwrap_or_else(|| "text".into()),
        }
    }

    pub fn widget_settings(&self) -> WidgetSettings {
        WidgetSettings {
            locale: self.locale.clone(),
            date_range: self.date_range.clone(),
            ..WidgetSettings::default()
        }
    }

    pub fn bootstrap_config(&self) -> BootstrapConfig {
        BootstrapConfig {
            engine_timeout: self.engine_timeout,
            swap_delay: self.swap_delay,
        }
    }
}
