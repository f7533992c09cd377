//! Runtime settings taken from the environment (and an optional `.env`).

use crate::domain::Locale;
use crate::error::AppError;

/// Public endpoint of the Kitakyushu emergency transport statistics API.
pub const DEFAULT_API_URL: &str =
    "https://ktq-dwh-api-cxafe3gpd2dcdjf7.japaneast-01.azurewebsites.net/emergencytransports/";

pub const ENV_API_URL: &str = "EMS_API_URL";
pub const ENV_LOCALE: &str = "EMS_LOCALE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_url: String,
    pub locale: Locale,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            locale: Locale::En,
        }
    }
}

impl Settings {
    /// Load `.env` if present, then read `EMS_API_URL` / `EMS_LOCALE`.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (unset or blank means default).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let mut settings = Settings::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            settings.api_url = url.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_LOCALE).filter(|v| !v.trim().is_empty()) {
            settings.locale = raw
                .parse()
                .map_err(|e| AppError::new(2, format!("Invalid {ENV_LOCALE}: {e}")))?;
        }

        Ok(settings)
    }
}
