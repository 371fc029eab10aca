use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use soundrush_core::config::{AppConfig, LoadOptions, DEFAULT_CONFIG_FILE};
use toml::Value;

use crate::commands::CommandResult;

struct Field {
    key_path: &'static str,
    env_keys: &'static [&'static str],
    value: String,
}

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("config validation failed: {error}"),
                2,
            );
        }
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in fields(&config) {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(format!("- {} = {} (source: {source})", field.key_path, field.value));
    }

    CommandResult { exit_code: 0, output: lines.join("\n") }
}

fn fields(config: &AppConfig) -> Vec<Field> {
    let pricing = &config.pricing;
    vec![
        Field {
            key_path: "database.url",
            env_keys: &["SOUNDRUSH_DATABASE_URL"],
            value: config.database.url.clone(),
        },
        Field {
            key_path: "database.max_connections",
            env_keys: &["SOUNDRUSH_DATABASE_MAX_CONNECTIONS"],
            value: config.database.max_connections.to_string(),
        },
        Field {
            key_path: "database.timeout_secs",
            env_keys: &["SOUNDRUSH_DATABASE_TIMEOUT_SECS"],
            value: config.database.timeout_secs.to_string(),
        },
        Field {
            key_path: "server.bind_address",
            env_keys: &["SOUNDRUSH_SERVER_BIND_ADDRESS"],
            value: config.server.bind_address.clone(),
        },
        Field {
            key_path: "server.port",
            env_keys: &["SOUNDRUSH_SERVER_PORT"],
            value: config.server.port.to_string(),
        },
        Field {
            key_path: "server.graceful_shutdown_secs",
            env_keys: &["SOUNDRUSH_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            value: config.server.graceful_shutdown_secs.to_string(),
        },
        Field {
            key_path: "logging.level",
            env_keys: &["SOUNDRUSH_LOGGING_LEVEL", "SOUNDRUSH_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key_path: "logging.format",
            env_keys: &["SOUNDRUSH_LOGGING_FORMAT", "SOUNDRUSH_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format).to_ascii_lowercase(),
        },
        Field {
            key_path: "pricing.currency",
            env_keys: &["SOUNDRUSH_PRICING_CURRENCY"],
            value: pricing.currency.clone(),
        },
        Field {
            key_path: "pricing.delivery_paris",
            env_keys: &["SOUNDRUSH_PRICING_DELIVERY_PARIS"],
            value: pricing.delivery_paris.to_string(),
        },
        Field {
            key_path: "pricing.delivery_inner_ring",
            env_keys: &["SOUNDRUSH_PRICING_DELIVERY_INNER_RING"],
            value: pricing.delivery_inner_ring.to_string(),
        },
        Field {
            key_path: "pricing.delivery_outer_ring",
            env_keys: &["SOUNDRUSH_PRICING_DELIVERY_OUTER_RING"],
            value: pricing.delivery_outer_ring.to_string(),
        },
        Field {
            key_path: "pricing.urgency_surcharge_pct",
            env_keys: &["SOUNDRUSH_PRICING_URGENCY_SURCHARGE_PCT"],
            value: pricing.urgency_surcharge_pct.to_string(),
        },
    ]
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from(DEFAULT_CONFIG_FILE), Path::new("config").join(DEFAULT_CONFIG_FILE)]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
