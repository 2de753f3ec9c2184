//! Client constants.
//!
//! Centralizes endpoints, storage keys and status sets shared across modules.

/// Backend endpoint defaults.
pub mod endpoints {
    /// Built-in API base URLs, in preference order.
    pub const DEFAULT_API_BASE_URLS: &[&str] = &[
        "https://apilaravel.bytevortexz.com/api",
        "https://laravel-massagebooking.bytevortexz.com/api",
    ];

    /// Built-in storage URL for uploaded images.
    pub const DEFAULT_STORAGE_URL: &str = "https://laravel-massagebooking.bytevortexz.com/storage";
}

/// Request dispatch constants.
pub mod dispatch {
    /// Statuses that may be specific to one endpoint and justify trying the next.
    pub const RETRYABLE_STATUSES: &[u16] = &[404, 405, 500, 502, 503, 504];

    /// Fallback transport detail when no endpoint produced an error value.
    pub const UNREACHABLE: &str = "Failed to fetch";
}

/// Persisted client state.
pub mod storage {
    /// Key the bearer token is stored under.
    pub const TOKEN_KEY: &str = "auth_token";

    /// Directory name under the platform config/data dirs.
    pub const APP_DIR: &str = "zenbook";

    /// Persisted settings file name.
    pub const SETTINGS_FILE: &str = "settings.json";

    /// Credential file name.
    pub const CREDENTIALS_FILE: &str = "credentials.json";
}

/// Environment variable names.
pub mod env {
    /// Comma-separated list of API base URLs.
    pub const API_BASE_URLS: &str = "ZENBOOK_API_BASE_URLS";

    /// Single API base URL.
    pub const API_BASE_URL: &str = "ZENBOOK_API_BASE_URL";

    /// Storage URL override.
    pub const STORAGE_URL: &str = "ZENBOOK_STORAGE_URL";

    /// Credential file location override.
    pub const CREDENTIALS_PATH: &str = "ZENBOOK_CREDENTIALS_PATH";
}

/// Front-end page layout.
pub mod pages {
    /// Path segment all views live under.
    pub const VIEWS_SEGMENT: &str = "views";

    /// Login page, relative to the views root.
    pub const LOGIN: &str = "/views/auth/login.html";

    /// Marker used to detect that the login page is already showing.
    pub const LOGIN_MARKER: &str = "/views/auth/login";
}
