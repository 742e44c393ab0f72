use serde::{Deserialize, Serialize};
use std::env;

/// Signing key used when none is configured. Never acceptable in production.
pub const INSECURE_JWT_SECRET: &str = "fallback-secret";
/// Longest session token lifetime accepted, one year in seconds.
pub const MAX_JWT_EXPIRES_IN: i64 = 365 * 24 * 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub hours: HoursConfig,
    #[serde(default)]
    pub stripe: StripeConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_environment")]
    pub environment: String,
    #[serde(default = "default_frontend_url")]
    pub cors_origin: String,
}

impl ServerConfig {
    pub fn is_development(&self) -> bool {
        self.environment.eq_ignore_ascii_case("development")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub expires_in: i64, // seconds
}

/// Hour-of-day windows, half-open `[start, end)` in local time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoursConfig {
    pub opening_hour: u32,
    pub closing_hour: u32,
    pub happy_hour_start: u32,
    pub happy_hour_end: u32,
    /// Percentage applied during happy hour to items without an explicit happy-hour price.
    #[serde(default)]
    pub happy_hour_discount_percent: Option<u32>,
}

impl Default for HoursConfig {
    fn default() -> Self {
        Self {
            opening_hour: 8,
            closing_hour: 15,
            happy_hour_start: 11,
            happy_hour_end: 13,
            happy_hour_discount_percent: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StripeConfig {
    pub secret_key: String,
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            secret_key: String::new(),
            currency: default_currency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub api_key: String,
    #[serde(default = "default_email_api_base")]
    pub api_base: String,
    pub from_email: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_email_api_base(),
            from_email: String::new(),
            from_name: default_from_name(),
            frontend_url: default_frontend_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GoogleConfig {
    pub client_id: String,
}

/// Initial administrator created at startup when both fields are present.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_environment() -> String {
    "production".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_email_api_base() -> String {
    "https://api.sendgrid.com".to_string()
}

fn default_from_name() -> String {
    "Diner Support".to_string()
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let file = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Some(config_str),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                return Err(format!("cannot read config file {config_path}: {e}").into());
            }
        };

        Self::from_sources(file.as_deref(), |name| env::var(name).ok())
    }

    /// Builds the configuration from an optional TOML document and an environment
    /// lookup. Environment values always win over the file.
    pub fn from_sources<F>(file: Option<&str>, get_env: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get_env_parse = |name: &str| get_env(name).and_then(|v| v.parse::<u32>().ok());

        let mut config: Config = match file {
            Some(config_str) => {
                toml::from_str(config_str).map_err(|e| format!("invalid config file: {e}"))?
            }
            None => {
                let database_url = get_env("DATABASE_URL")
                    .ok_or("DATABASE_URL is not set and no config.toml was found")?;

                Config {
                    server: ServerConfig {
                        host: "0.0.0.0".to_string(),
                        port: 5000,
                        environment: default_environment(),
                        cors_origin: default_frontend_url(),
                    },
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: 10,
                    },
                    jwt: JwtConfig {
                        secret: INSECURE_JWT_SECRET.to_string(),
                        expires_in: 7 * 24 * 3600,
                    },
                    hours: HoursConfig::default(),
                    stripe: StripeConfig::default(),
                    email: EmailConfig::default(),
                    google: GoogleConfig::default(),
                    admin: AdminConfig::default(),
                }
            }
        };

        if let Some(v) = get_env("SERVER_HOST") {
            config.server.host = v;
        }
        if let Some(v) = get_env("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            config.server.port = p;
        }
        if let Some(v) = get_env("APP_ENV") {
            config.server.environment = v;
        }
        if let Some(v) = get_env("FRONTEND_URL") {
            config.server.cors_origin = v.clone();
            config.email.frontend_url = v;
        }
        if let Some(v) = get_env("DATABASE_URL") {
            config.database.url = v;
        }
        if let Some(v) = get_env_parse("DB_MAX_CONNECTIONS") {
            config.database.max_connections = v;
        }
        if let Some(v) = get_env("JWT_SECRET") {
            config.jwt.secret = v;
        }
        if let Some(v) = get_env("JWT_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            config.jwt.expires_in = n;
        }
        if let Some(v) = get_env_parse("OPENING_HOUR") {
            config.hours.opening_hour = v;
        }
        if let Some(v) = get_env_parse("CLOSING_HOUR") {
            config.hours.closing_hour = v;
        }
        if let Some(v) = get_env_parse("HAPPY_HOUR_START") {
            config.hours.happy_hour_start = v;
        }
        if let Some(v) = get_env_parse("HAPPY_HOUR_END") {
            config.hours.happy_hour_end = v;
        }
        if let Some(v) = get_env_parse("HAPPY_HOUR_DISCOUNT_PERCENT") {
            config.hours.happy_hour_discount_percent = Some(v);
        }
        if let Some(v) = get_env("STRIPE_SECRET_KEY") {
            config.stripe.secret_key = v;
        }
        if let Some(v) = get_env("STRIPE_CURRENCY") {
            config.stripe.currency = v;
        }
        if let Some(v) = get_env("EMAIL_API_KEY") {
            config.email.api_key = v;
        }
        if let Some(v) = get_env("EMAIL_API_BASE") {
            config.email.api_base = v;
        }
        if let Some(v) = get_env("EMAIL_FROM") {
            config.email.from_email = v;
        }
        if let Some(v) = get_env("EMAIL_FROM_NAME") {
            config.email.from_name = v;
        }
        if let Some(v) = get_env("GOOGLE_CLIENT_ID") {
            config.google.client_id = v;
        }
        if let Some(v) = get_env("ADMIN_EMAIL") {
            config.admin.email = Some(v);
        }
        if let Some(v) = get_env("ADMIN_PASSWORD") {
            config.admin.password = Some(v);
        }

        config.validate()?;
        Ok(config)
    }

    /// Rejects values that cannot describe an hour of the day. Windows whose start
    /// is not before their end are accepted but never open, so they are reported.
    pub fn validate(&self) -> Result<(), Box<dyn std::error::Error>> {
        let hours = &self.hours;
        for (name, value) in [
            ("opening_hour", hours.opening_hour),
            ("closing_hour", hours.closing_hour),
            ("happy_hour_start", hours.happy_hour_start),
            ("happy_hour_end", hours.happy_hour_end),
        ] {
            if value > 24 {
                return Err(format!("{name} must be between 0 and 24, got {value}").into());
            }
        }
        if let Some(p) = hours.happy_hour_discount_percent
            && p > 100
        {
            return Err(format!("happy_hour_discount_percent must be at most 100, got {p}").into());
        }
        if !(1..=MAX_JWT_EXPIRES_IN).contains(&self.jwt.expires_in) {
            return Err(format!(
                "jwt.expires_in must be between 1 and {MAX_JWT_EXPIRES_IN} seconds, got {}",
                self.jwt.expires_in
            )
            .into());
        }

        for warning in self.warnings() {
            log::warn!("{warning}");
        }
        Ok(())
    }

    /// Settings that are legal but almost certainly wrong.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let hours = &self.hours;
        if hours.opening_hour >= hours.closing_hour {
            warnings.push(format!(
                "business hours [{}, {}) never open: windows wrapping midnight are not supported",
                hours.opening_hour, hours.closing_hour
            ));
        }
        if hours.happy_hour_start >= hours.happy_hour_end {
            warnings.push(format!(
                "happy hour [{}, {}) never active: windows wrapping midnight are not supported",
                hours.happy_hour_start, hours.happy_hour_end
            ));
        }
        if self.jwt.secret == INSECURE_JWT_SECRET || self.jwt.secret.is_empty() {
            warnings.push("JWT_SECRET is not set; using an insecure default signing key".to_string());
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_only_defaults() {
        let config =
            Config::from_sources(None, env_from(&[("DATABASE_URL", "sqlite::memory:")])).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.jwt.expires_in, 604800);
        assert_eq!(config.hours.opening_hour, 8);
        assert_eq!(config.hours.closing_hour, 15);
        assert_eq!(config.hours.happy_hour_start, 11);
        assert_eq!(config.hours.happy_hour_end, 13);
        assert_eq!(config.hours.happy_hour_discount_percent, None);
        assert_eq!(config.stripe.currency, "usd");
        assert!(!config.server.is_development());
    }

    #[test]
    fn test_missing_database_url_without_file() {
        assert!(Config::from_sources(None, env_from(&[])).is_err());
    }

    #[test]
    fn test_env_overrides_file() {
        let file = r#"
            [server]
            host = "127.0.0.1"
            port = 8080
            environment = "development"

            [database]
            url = "postgres://localhost/diner"
            max_connections = 5

            [jwt]
            secret = "file-secret"
            expires_in = 3600

            [hours]
            opening_hour = 7
            closing_hour = 22
            happy_hour_start = 16
            happy_hour_end = 18
        "#;
        let config = Config::from_sources(
            Some(file),
            env_from(&[("JWT_SECRET", "env-secret"), ("HAPPY_HOUR_END", "19")]),
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(config.server.is_development());
        assert_eq!(config.jwt.secret, "env-secret");
        assert_eq!(config.hours.opening_hour, 7);
        assert_eq!(config.hours.happy_hour_end, 19);
        assert_eq!(config.email.from_name, "Diner Support");
    }

    #[test]
    fn test_rejects_out_of_range_hour() {
        let result = Config::from_sources(
            None,
            env_from(&[("DATABASE_URL", "sqlite::memory:"), ("CLOSING_HOUR", "25")]),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_inverted_window_is_reported() {
        let config = Config::from_sources(
            None,
            env_from(&[
                ("DATABASE_URL", "sqlite::memory:"),
                ("JWT_SECRET", "s3cret"),
                ("HAPPY_HOUR_START", "22"),
                ("HAPPY_HOUR_END", "2"),
            ]),
        )
        .unwrap();
        let warnings = config.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("happy hour"));
    }

    #[test]
    fn test_default_secret_is_reported() {
        let config =
            Config::from_sources(None, env_from(&[("DATABASE_URL", "sqlite::memory:")])).unwrap();
        assert!(config.warnings().iter().any(|w| w.contains("JWT_SECRET")));
    }

    #[test]
    fn test_rejects_out_of_range_jwt_lifetime() {
        for value in ["0", "-5", "9223372036854775807"] {
            let result = Config::from_sources(
                None,
                env_from(&[("DATABASE_URL", "sqlite::memory:"), ("JWT_EXPIRES_IN", value)]),
            );
            assert!(result.is_err(), "accepted JWT_EXPIRES_IN={value}");
        }
        let config = Config::from_sources(
            None,
            env_from(&[("DATABASE_URL", "sqlite::memory:"), ("JWT_EXPIRES_IN", "3600")]),
        )
        .unwrap();
        assert_eq!(config.jwt.expires_in, 3600);
    }
}
