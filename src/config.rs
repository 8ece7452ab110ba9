use crate::domain::documents::{
    DEFAULT_AUTOMATIC_OFFSETS, DEFAULT_GRACE_DAYS, DEFAULT_WARNING_WINDOW_DAYS, DocumentPolicy,
};
use crate::infrastructure::pdf::FlattenStrategy;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use time::UtcOffset;

pub const DEFAULT_COMPANY_NAME: &str = "Transportes Medellín Travel";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("{key}={value} is not supported: {hint}")]
    Unsupported {
        key: &'static str,
        value: String,
        hint: &'static str,
    },
}

/// Top-level configuration, read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database_url: String,
    pub pool: PoolConfig,
    pub auth: AuthConfig,
    pub civil_offset: UtcOffset,
    pub documents: DocumentPolicy,
    pub alerts: AlertConfig,
    pub pdf: PdfConfig,
    pub company: CompanyConfig,
    pub smtp: Option<SmtpConfig>,
    pub cloudinary: Option<CloudinaryConfig>,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Comma-separated origins; empty or `*` allows any.
    pub cors_allowed_origins: String,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError::Invalid {
            key: "APP_HOST",
            value: self.host.clone(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Connection pool sizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            min_connections: 2,
            acquire_timeout: Duration::from_secs(3),
            idle_timeout: Duration::from_secs(600),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub session_secret: String,
    pub session_ttl_secs: i64,
    /// Shared secret for the external alert trigger; the endpoint is closed when unset.
    pub trigger_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub scheduler_enabled: bool,
    pub hour: u8,
    pub minute: u8,
    pub dispatch_timeout: Duration,
    pub dispatch_concurrency: usize,
}

#[derive(Debug, Clone)]
pub struct PdfConfig {
    pub template_path: PathBuf,
    pub output_dir: PathBuf,
    /// `PDF_FLATTEN_STRATEGY`: `readonly-flatten` (default) or `burn-in`.
    /// Page rasterization is not offered; `burn-in` is the non-editable
    /// alternative and `rasterize` is rejected with a pointer to it.
    pub flatten: FlattenStrategy,
}

#[derive(Debug, Clone)]
pub struct CompanyConfig {
    pub name: String,
    pub contact_email: Option<String>,
    pub admin_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match var(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

fn parse_bool_or(key: &'static str, default: bool) -> Result<bool, ConfigError> {
    match var(key) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { key, value }),
        },
        None => Ok(default),
    }
}

fn parse_flatten_strategy(key: &'static str) -> Result<FlattenStrategy, ConfigError> {
    match var(key) {
        Some(value) if value.trim().eq_ignore_ascii_case("rasterize") => {
            Err(ConfigError::Unsupported {
                key,
                value,
                hint: "use burn-in to draw the values into the page content",
            })
        }
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(FlattenStrategy::default()),
    }
}

fn parse_offsets(key: &'static str) -> Result<Vec<i64>, ConfigError> {
    match var(key) {
        Some(value) => value
            .split(',')
            .map(|part| part.trim().parse::<i64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(DEFAULT_AUTOMATIC_OFFSETS.to_vec()),
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let server = ServerConfig {
            host: var("APP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("APP_PORT", 3000)?,
            cors_allowed_origins: var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
        };

        let database_url = var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let pool_defaults = PoolConfig::default();
        let pool = PoolConfig {
            max_connections: parse_or("DB_MAX_CONNECTIONS", pool_defaults.max_connections)?,
            min_connections: parse_or("DB_MIN_CONNECTIONS", pool_defaults.min_connections)?,
            acquire_timeout: Duration::from_secs(parse_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                pool_defaults.acquire_timeout.as_secs(),
            )?),
            idle_timeout: Duration::from_secs(parse_or(
                "DB_IDLE_TIMEOUT_SECS",
                pool_defaults.idle_timeout.as_secs(),
            )?),
        };
        if pool.max_connections == 0 || pool.min_connections > pool.max_connections {
            return Err(ConfigError::Invalid {
                key: "DB_MIN_CONNECTIONS",
                value: pool.min_connections.to_string(),
            });
        }

        let auth = AuthConfig {
            session_secret: var("SESSION_SECRET").ok_or(ConfigError::Missing("SESSION_SECRET"))?,
            session_ttl_secs: parse_or("SESSION_TTL_SECS", 24 * 60 * 60)?,
            trigger_token: var("ALERT_TRIGGER_TOKEN"),
        };

        let offset_hours: i8 = parse_or("CIVIL_UTC_OFFSET_HOURS", -5)?;
        let civil_offset =
            UtcOffset::from_hms(offset_hours, 0, 0).map_err(|_| ConfigError::Invalid {
                key: "CIVIL_UTC_OFFSET_HOURS",
                value: offset_hours.to_string(),
            })?;

        let documents = DocumentPolicy {
            warning_window_days: parse_or("WARNING_WINDOW_DAYS", DEFAULT_WARNING_WINDOW_DAYS)?,
            grace_days: parse_or("GRACE_DAYS", DEFAULT_GRACE_DAYS)?,
            automatic_offsets: parse_offsets("ALERT_OFFSETS")?,
        };

        let hour: u8 = parse_or("ALERT_HOUR", 8)?;
        let minute: u8 = parse_or("ALERT_MINUTE", 0)?;
        if hour > 23 {
            return Err(ConfigError::Invalid {
                key: "ALERT_HOUR",
                value: hour.to_string(),
            });
        }
        if minute > 59 {
            return Err(ConfigError::Invalid {
                key: "ALERT_MINUTE",
                value: minute.to_string(),
            });
        }
        let alerts = AlertConfig {
            scheduler_enabled: parse_bool_or("ALERT_SCHEDULER_ENABLED", true)?,
            hour,
            minute,
            dispatch_timeout: Duration::from_secs(parse_or("DISPATCH_TIMEOUT_SECS", 30)?),
            dispatch_concurrency: parse_or::<usize>("DISPATCH_CONCURRENCY", 4)?.max(1),
        };

        let pdf = PdfConfig {
            template_path: var("PDF_TEMPLATE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("assets/contract_template.pdf")),
            output_dir: var("PDF_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("generated_pdfs")),
            flatten: parse_flatten_strategy("PDF_FLATTEN_STRATEGY")?,
        };

        let company = CompanyConfig {
            name: var("COMPANY_NAME").unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string()),
            contact_email: var("COMPANY_EMAIL"),
            admin_email: var("ADMIN_EMAIL"),
        };

        let smtp = match (var("SMTP_USER"), var("SMTP_PASSWORD")) {
            (Some(username), Some(password)) => Some(SmtpConfig {
                host: var("SMTP_HOST").unwrap_or_else(|| "smtp.gmail.com".to_string()),
                port: parse_or("SMTP_PORT", 587)?,
                from: var("SMTP_FROM").unwrap_or_else(|| username.clone()),
                username,
                password,
            }),
            _ => None,
        };

        let cloudinary = match (
            var("CLOUDINARY_CLOUD_NAME"),
            var("CLOUDINARY_API_KEY"),
            var("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
                folder: var("CLOUDINARY_FOLDER").unwrap_or_else(|| "contratos_fuec".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            server,
            database_url,
            pool,
            auth,
            civil_offset,
            documents,
            alerts,
            pdf,
            company,
            smtp,
            cloudinary,
        })
    }
}
