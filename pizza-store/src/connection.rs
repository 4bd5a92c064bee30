use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::ConnectionError;

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub dbname: String,
    pub user: String,
    pub password: String,
}

impl ConnectionSettings {
    /// libpq keyword/value string; the password is sent even when empty.
    pub fn conninfo(&self) -> String {
        format!(
            "host={} port={} dbname={} user={} password={}",
            quote_conninfo_value(&self.host),
            self.port,
            quote_conninfo_value(&self.dbname),
            quote_conninfo_value(&self.user),
            quote_conninfo_value(&self.password),
        )
    }

    /// Connection target without credentials, safe to print.
    pub fn display_url(&self) -> String {
        format!("postgresql://{}:{}/{}", self.host, self.port, self.dbname)
    }
}

fn quote_conninfo_value(value: &str) -> String {
    let plain = !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if plain {
        return value.to_string();
    }

    let mut quoted = String::from("'");
    for c in value.chars() {
        if c == '\'' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// The single connection used for the whole session. Dropping it closes the
/// connection.
pub struct Database {
    conn: PgConnection,
    url: String,
}

impl Database {
    pub fn connect(settings: &ConnectionSettings) -> Result<Database, ConnectionError> {
        let conn = PgConnection::establish(&settings.conninfo())?;
        let url = settings.display_url();
        info!("connected to {}", url);

        Ok(Database { conn, url })
    }

    pub fn conn(&self) -> &PgConnection {
        &self.conn
    }
}

impl Drop for Database {
    fn drop(&mut self) {
        info!("closing connection to {}", self.url);
    }
}
