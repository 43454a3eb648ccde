use log::LevelFilter;

#[derive(Debug, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// Periodic slate re-checks on/off (toggled with 'a').
    pub auto_check: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            full_screen: false,
            log_level: None,
            auto_check: true,
        }
    }
}

impl AppSettings {
    pub fn load() -> Self {
        // Simple defaults — log level can be overridden via RUST_LOG later.
        Self::default()
    }
}
