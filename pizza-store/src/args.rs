use crate::connection::ConnectionSettings;

use clap::Parser;

/// Pizza store terminal client
#[derive(Parser, Debug)]
#[command(name = "pizza-store")]
#[command(about = "Menu-driven pizza store client for PostgreSQL", long_about = None)]
pub struct Args {
    /// Database name
    pub dbname: String,

    /// Database server port
    pub port: u16,

    /// Database user
    pub user: String,

    /// Database server host
    #[arg(long, env = "DATABASE_HOST", default_value = "localhost")]
    pub host: String,

    /// Database password
    #[arg(long, env = "PGPASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,
}

impl Args {
    pub fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            host: self.host.clone(),
            port: self.port,
            dbname: self.dbname.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}
