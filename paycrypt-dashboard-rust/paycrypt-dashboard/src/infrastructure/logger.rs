use std::fs;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, time::UtcTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::infrastructure::config::Config;

// Keeps the file writer flushing for the lifetime of the process.
static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: String,
    pub directory: Option<String>,
    pub enable_colors: bool,
    pub enable_thread_ids: bool,
    pub enable_file_line: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            enable_colors: true,
            enable_thread_ids: false,
            enable_file_line: false,
        }
    }
}

impl From<&Config> for LogConfig {
    fn from(config: &Config) -> Self {
        Self {
            level: config.log_level.clone(),
            directory: config.log_dir.clone(),
            enable_colors: !config.is_production(),
            enable_thread_ids: config.is_production(),
            enable_file_line: !config.is_production(),
        }
    }
}

pub struct Logger;

impl Logger {
    /// `RUST_LOG` wins over the configured level.
    pub fn filter(level: &str) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "paycrypt_dashboard={level},paycrypt_admin_core={level},actix_web=info"
            ))
        })
    }

    pub fn init(config: &LogConfig) {
        let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

        let console_layer = fmt::layer()
            .with_timer(UtcTime::rfc_3339())
            .with_thread_ids(config.enable_thread_ids)
            .with_file(config.enable_file_line)
            .with_line_number(config.enable_file_line)
            .with_ansi(config.enable_colors)
            .with_writer(std::io::stdout);
        layers.push(Box::new(console_layer));

        if let Some(directory) = &config.directory {
            match fs::create_dir_all(directory) {
                Ok(()) => {
                    let file_appender = rolling::daily(directory, "paycrypt_dashboard.log");
                    let (writer, guard) = non_blocking(file_appender);
                    let _ = FILE_GUARD.set(guard);
                    let file_layer = fmt::layer()
                        .with_timer(UtcTime::rfc_3339())
                        .with_thread_ids(config.enable_thread_ids)
                        .with_ansi(false)
                        .with_writer(writer);
                    layers.push(Box::new(file_layer));
                }
                Err(e) => eprintln!("Failed to create log directory {directory}: {e}"),
            }
        }

        let subscriber = Registry::default()
            .with(layers)
            .with(Self::filter(&config.level));

        if subscriber.try_init().is_err() {
            log::debug!("Tracing subscriber already installed");
        }
    }
}
