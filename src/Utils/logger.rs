//! console and file logging for solver runs
use chrono::Local;
use log::info;
use simplelog::*;
use std::fs::File;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

#[derive(Debug, Clone, PartialEq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub console: bool,
    /// None: no file logger, Some(None): timestamped default name
    pub file: Option<Option<String>>,
}

impl Default for LogSettings {
    fn default() -> Self {
        LogSettings { level: LevelFilter::Info, console: true, file: None }
    }
}

impl LogSettings {
    /// "debug", "info", "warn", "error" or "off"; anything else falls back to info
    pub fn with_level(mut self, level: &str) -> Self {
        self.level = parse_level(level);
        self
    }

    pub fn with_file(mut self, name: Option<&str>) -> Self {
        self.file = Some(name.map(|s| s.to_string()));
        self
    }

    pub fn without_console(mut self) -> Self {
        self.console = false;
        self
    }
}

pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        other => LevelFilter::from_str(other).unwrap_or(LevelFilter::Info),
    }
}

/// log_<date>_<time>.txt
pub fn default_log_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("log_{}.txt", date_and_time)
}

/// Install the global logger once. Later calls are no-ops and return false.
pub fn init_logger(settings: &LogSettings) -> bool {
    if INITIALIZED.load(Ordering::SeqCst) {
        return false;
    }
    let level = settings.level;
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if settings.console {
        loggers.push(TermLogger::new(
            level,
            Config::default(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if let Some(name) = &settings.file {
        let name = name.clone().unwrap_or_else(default_log_name);
        match File::create(&name) {
            Ok(file) => loggers.push(WriteLogger::new(level, Config::default(), file)),
            Err(e) => eprintln!("cannot create log file {}: {}", name, e),
        }
    }
    if loggers.is_empty() {
        return false;
    }
    match CombinedLogger::init(loggers) {
        Ok(()) => {
            INITIALIZED.store(true, Ordering::SeqCst);
            info!("logger initialized at level {}", level);
            true
        }
        // some other logger already owns the facade
        Err(_) => {
            INITIALIZED.store(true, Ordering::SeqCst);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("debug"), LevelFilter::Debug);
        assert_eq!(parse_level(" WARN "), LevelFilter::Warn);
        assert_eq!(parse_level("off"), LevelFilter::Off);
        assert_eq!(parse_level("trace"), LevelFilter::Trace);
        assert_eq!(parse_level("loud"), LevelFilter::Info);
    }

    #[test]
    fn test_settings_builder() {
        let settings = LogSettings::default().with_level("error").with_file(Some("run.log")).without_console();
        assert_eq!(settings.level, LevelFilter::Error);
        assert_eq!(settings.file, Some(Some("run.log".to_string())));
        assert!(!settings.console);
    }

    #[test]
    fn test_default_log_name() {
        let name = default_log_name();
        assert!(name.starts_with("log_") && name.ends_with(".txt"));
    }

    #[test]
    fn test_second_init_is_noop() {
        let settings = LogSettings::default().with_level("off");
        init_logger(&settings);
        assert!(!init_logger(&settings));
    }
}
