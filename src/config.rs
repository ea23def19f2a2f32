use dotenv::dotenv;
use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::models::printer::{PrinterClass, PrinterPool};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_PRINTER_CLASSES: &str = "A:10,B:6";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Runtime settings of the planning service, read from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub printer_classes: Vec<PrinterClass>,
    pub request_timeout: Duration,
}

impl Config {
    /// Loads `.env` if present, then reads:
    ///
    /// - `PLANNER_BIND_ADDR` (default `0.0.0.0:3000`)
    /// - `PLANNER_DATA_DIR` (default `data`)
    /// - `PRINTER_CLASSES` (default `A:10,B:6`)
    /// - `PLANNER_REQUEST_TIMEOUT_SECS` (default `10`)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let bind_addr = env::var("PLANNER_BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                name: "PLANNER_BIND_ADDR".to_string(),
                reason: e.to_string(),
            })?;

        let data_dir = env::var("PLANNER_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR));

        let printer_classes = parse_printer_classes(
            &env::var("PRINTER_CLASSES").unwrap_or_else(|_| DEFAULT_PRINTER_CLASSES.to_string()),
        )?;

        let request_timeout = match env::var("PLANNER_REQUEST_TIMEOUT_SECS") {
            Ok(value) => value
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|e| ConfigError::InvalidValue {
                    name: "PLANNER_REQUEST_TIMEOUT_SECS".to_string(),
                    reason: e.to_string(),
                })?,
            Err(_) => Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        };

        info!(
            "Configuration loaded: bind={}, data_dir={}, classes={}",
            bind_addr,
            data_dir.display(),
            printer_classes
                .iter()
                .map(|c| format!("{}:{}", c.name, c.capacity))
                .collect::<Vec<_>>()
                .join(",")
        );

        Ok(Self {
            bind_addr,
            data_dir,
            printer_classes,
            request_timeout,
        })
    }

    pub fn printer_pool(&self) -> PrinterPool {
        PrinterPool::new(self.printer_classes.clone())
    }
}

/// Parses a pool layout such as `A:10,B:6`.
pub fn parse_printer_classes(value: &str) -> Result<Vec<PrinterClass>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        name: "PRINTER_CLASSES".to_string(),
        reason,
    };

    let mut classes: Vec<PrinterClass> = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (name, capacity) = entry
            .split_once(':')
            .ok_or_else(|| invalid(format!("expected NAME:COUNT, got '{}'", entry)))?;
        let name = name.trim();

        if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid(format!("class name '{}' must be letters only", name)));
        }
        if classes.iter().any(|c| c.name == name) {
            return Err(invalid(format!("class '{}' declared twice", name)));
        }

        let capacity = capacity
            .trim()
            .parse::<u32>()
            .map_err(|e| invalid(format!("capacity of class '{}': {}", name, e)))?;
        if capacity == 0 {
            warn!("Printer class {} declared with no printers", name);
        }

        classes.push(PrinterClass::new(name, capacity));
    }

    if classes.is_empty() {
        return Err(invalid("at least one printer class is required".to_string()));
    }

    Ok(classes)
}
