//! Configuration of the daemon.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Service layer configuration.
    pub service: Service,

    /// Postgres database configuration.
    pub postgres: Postgres,

    /// Logging configuration.
    pub log: Log,
}

impl Config {
    /// Assembles a new [`Config`] by:
    /// - reading the file at the provided `path` (if it exists);
    /// - overlaying `CONF.*` environment variables on top;
    /// - falling back to defaults for anything left unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the sources don't form a valid [`Config`].
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Configuration of the service layer.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Service {
    /// Background tasks configuration.
    pub tasks: Tasks,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        let Service {
            tasks: Tasks {
                advance_due_rentals,
            },
        } = value;
        Self {
            advance_due_rentals:
                service::task::advance_due_rentals::Config {
                    interval: advance_due_rentals.interval,
                },
        }
    }
}

/// Background tasks configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Tasks {
    /// `AdvanceDueRentals` task configuration.
    pub advance_due_rentals: Task,
}

/// Configuration of a single background task.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Task {
    /// Interval between consecutive runs of the task.
    #[default(time::Duration::from_secs(60 * 60))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,
}

/// Postgres database configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host of the database server.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port of the database server.
    #[default(5432)]
    pub port: u16,

    /// User to authenticate as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password of the `user`.
    #[default("postgres".to_owned())]
    pub password: String,

    /// Name of the database to use.
    #[default("postgres".to_owned())]
    pub dbname: String,
}

impl From<Postgres> for service::infra::postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
        } = value;

        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            ..Self::default()
        }
    }
}

/// Logging configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Minimum level of the emitted log records.
    pub level: LogLevel,
}

/// Level of a log record.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Extremely verbose diagnostic information.
    Trace,

    /// Verbose information useful while debugging.
    Debug,

    /// Notable events of normal operation.
    #[default]
    Info,

    /// Suspicious situations worth attention.
    Warn,

    /// Failures disrupting the operation.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
