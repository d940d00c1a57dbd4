use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "ChiroChart";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Clinic identity printed on report headers and footers.
pub const CLINIC_NAME: &str = "The Wellness Studio";
pub const CLINIC_ADDRESS: &str = "3711 Long Beach Blvd., Suite 200, Long Beach, CA, 90807";
pub const CLINIC_PHONE: &str = "(562) 980-0555";

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Base URL of the clinic REST API when none is configured.
pub fn default_api_base_url() -> String {
    std::env::var("CHIROCHART_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Get the application data directory
/// ~/ChiroChart/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("ChiroChart")
}

/// Path of the local drafts database (in-progress form slots).
pub fn drafts_db_path() -> PathBuf {
    app_data_dir().join("drafts").join("drafts.db")
}

/// Directory where generated PDF reports are written.
pub fn exports_dir() -> PathBuf {
    app_data_dir().join("exports")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("ChiroChart"));
    }

    #[test]
    fn drafts_db_under_app_data() {
        let drafts = drafts_db_path();
        assert!(drafts.starts_with(app_data_dir()));
        assert!(drafts.ends_with("drafts/drafts.db"));
    }

    #[test]
    fn exports_dir_under_app_data() {
        let exports = exports_dir();
        assert!(exports.starts_with(app_data_dir()));
        assert!(exports.ends_with("exports"));
    }

    #[test]
    fn default_filter_scopes_to_crate() {
        assert!(default_log_filter().starts_with("chirochart="));
    }
}
