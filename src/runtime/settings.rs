use crate::config;
use crate::format::DEFAULT_DISPLAY_FORMAT;

/// Load settings. An unreadable config falls back to the defaults; a display
/// format that does not compile falls back to the built-in one.
pub fn load_settings() -> config::Settings {
    match config::Settings::load() {
        Ok(mut s) => {
            if let Err(msg) = s.validate() {
                tracing::warn!("invalid config, using the default display format: {msg}");
                s.ui.playlist_display_format = DEFAULT_DISPLAY_FORMAT.to_string();
            }
            s
        }
        Err(e) => {
            // Config is optional; failures should not prevent the app from starting.
            tracing::warn!("failed to load config, using defaults: {e}");
            config::Settings::default()
        }
    }
}
