//! Command line and environment configuration for the server.

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
};

use clap::Parser;

use crate::{Error, timezone::LocalTimezone, transaction::CategoryPolicy};

/// The REST API server for the daily ledger.
///
/// Every option can also be set with the environment variable shown in its help.
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(version, about, long_about = None)]
pub struct ServerConfig {
    /// File path to the application SQLite database.
    #[arg(long, env = "LEDGER_DB_PATH", default_value = "ledger.db")]
    pub db_path: PathBuf,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// The address to listen on.
    #[arg(long, env = "LEDGER_HOST", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// The canonical timezone used to decide which calendar day a transaction
    /// falls on, e.g. "Pacific/Auckland". Set this to the server's own timezone
    /// for days to follow local server time.
    #[arg(long, env = "LEDGER_TIMEZONE", default_value = "UTC")]
    pub timezone: String,

    /// The only origin allowed to make cross-origin requests. Any origin is
    /// allowed if this is not set.
    #[arg(long, env = "CORS_ORIGIN")]
    pub allowed_origin: Option<String>,

    /// Only accept the built-in category names for transactions.
    #[arg(long, env = "LEDGER_FIXED_CATEGORIES")]
    pub fixed_categories: bool,

    /// File path for the debug log.
    #[arg(long, env = "LEDGER_LOG_PATH", default_value = "debug.log")]
    pub log_path: PathBuf,
}

impl ServerConfig {
    /// The address the server should bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Which category names the server accepts.
    pub fn category_policy(&self) -> CategoryPolicy {
        if self.fixed_categories {
            CategoryPolicy::Fixed
        } else {
            CategoryPolicy::FreeForm
        }
    }

    /// Look up the configured timezone.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the timezone name is not in the
    /// timezone database.
    pub fn local_timezone(&self) -> Result<LocalTimezone, Error> {
        LocalTimezone::from_name(&self.timezone)
    }
}
