//! API key resolution and validation.
//!
//! The Google-backed geocoder and the hosted map engine share one key. It is
//! read from [`GOOGLE_API_KEY_ENV`] first and from the config file second.
//! Blank and placeholder values count as missing so that a template config
//! fails loudly instead of sending requests that are certain to be denied.

use thiserror::Error;

/// Environment variable that overrides `[google] api_key`.
pub const GOOGLE_API_KEY_ENV: &str = "GOOGLE_MAPS_API_KEY";

/// Values shipped in templates and docs that are never real keys.
const PLACEHOLDERS: &[&str] = &[
    "your_api_key",
    "your-api-key",
    "your_api_key_here",
    "your-api-key-here",
    "api_key",
    "apikey",
    "changeme",
    "replace_me",
    "xxx",
];

/// Credential problems detected before first use.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// No value configured
    #[error("{name} is not configured (set GOOGLE_MAPS_API_KEY or [google] api_key)")]
    Missing { name: &'static str },

    /// Value is a template placeholder
    #[error("{name} is still the placeholder value '{value}'")]
    Placeholder { name: &'static str, value: String },
}

/// Returns true if the value is a known placeholder such as `YOUR_API_KEY`.
pub fn is_placeholder(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    PLACEHOLDERS.contains(&lowered.as_str())
        || (lowered.starts_with('<') && lowered.ends_with('>'))
        || (lowered.starts_with("${") && lowered.ends_with('}'))
}

/// Validates a credential, returning the trimmed key.
pub fn require_api_key(name: &'static str, value: Option<&str>) -> Result<String, CredentialError> {
    let value = value.map(str::trim).filter(|v| !v.is_empty());
    match value {
        None => Err(CredentialError::Missing { name }),
        Some(v) if is_placeholder(v) => Err(CredentialError::Placeholder {
            name,
            value: v.to_string(),
        }),
        Some(v) => Ok(v.to_string()),
    }
}

/// Picks the Google key from the environment, falling back to the config value.
pub fn resolve_google_api_key(configured: Option<&str>) -> Option<String> {
    pick_key(std::env::var(GOOGLE_API_KEY_ENV).ok(), configured)
}

fn pick_key(from_env: Option<String>, configured: Option<&str>) -> Option<String> {
    from_env
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            configured
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert!(is_placeholder("YOUR_API_KEY"));
        assert!(is_placeholder(" your-api-key-here "));
        assert!(is_placeholder("<api key>"));
        assert!(is_placeholder("${GOOGLE_MAPS_API_KEY}"));
        assert!(!is_placeholder("AIzaSyA-real-looking-key"));
    }

    #[test]
    fn test_require_api_key() {
        assert_eq!(
            require_api_key("key", None),
            Err(CredentialError::Missing { name: "key" })
        );
        assert_eq!(
            require_api_key("key", Some("   ")),
            Err(CredentialError::Missing { name: "key" })
        );
        assert!(matches!(
            require_api_key("key", Some("changeme")),
            Err(CredentialError::Placeholder { .. })
        ));
        assert_eq!(require_api_key("key", Some(" abc ")), Ok("abc".to_string()));
    }

    #[test]
    fn test_environment_wins_over_config() {
        assert_eq!(
            pick_key(Some("from-env".to_string()), Some("from-file")),
            Some("from-env".to_string())
        );
        assert_eq!(
            pick_key(Some("  ".to_string()), Some("from-file")),
            Some("from-file".to_string())
        );
        assert_eq!(pick_key(None, None), None);
    }

    #[test]
    fn test_missing_message_names_sources() {
        let message = CredentialError::Missing { name: "Google Maps API key" }.to_string();
        assert!(message.contains(GOOGLE_API_KEY_ENV));
        assert!(message.contains("[google] api_key"));
    }
}
