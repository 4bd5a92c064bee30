#[macro_use]
extern crate diesel;
#[macro_use]
extern crate diesel_migrations;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod model;
pub mod schema;

mod args;
mod connection;
mod console;
mod db;
mod executor;
mod formatter;
mod handlers;
mod menu;

use diesel::pg::PgConnection;
use diesel::result::DatabaseErrorKind::__Unknown;
use diesel::result::Error::DatabaseError;
use diesel_migrations::RunMigrationsError;
use diesel_migrations::RunMigrationsError::QueryError;

use clap::Parser;
use dotenv::dotenv;

use std::env;
use std::io::{self, Write};
use std::process;

use args::Args;
use connection::Database;
use console::Console;
use db::MainDbOps;
use handlers::Session;

lazy_static! {
    static ref RUN_MIGRATIONS: bool = {
        match env::var("RUN_MIGRATIONS") {
            Ok(v) => v == "1" || v.eq_ignore_ascii_case("true"),
            Err(_) => false,
        }
    };
}

embed_migrations!();

fn run_db_migrations(conn: &PgConnection) -> Result<(), RunMigrationsError> {
    match embedded_migrations::run(conn) {
        Ok(()) => Ok(()),
        Err(e) => match e {
            QueryError(DatabaseError(__Unknown, ref info)) => {
                warn!("Migration failure due to possible relation existence (ignoring): {}", info.message());
                Ok(())
            }
            _ => Err(e),
        },
    }
}

fn greeting() {
    println!(
        "\n\n*******************************************************\n\
         \x20             User Interface\n\
         *******************************************************\n"
    );
}

fn main() {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(v) => v,
        Err(e) => {
            let _ = e.print();
            return;
        }
    };

    greeting();

    let settings = args.connection_settings();
    print!("Connecting to database...");
    let _ = io::stdout().flush();
    println!("Connection URL: {}\n", settings.display_url());

    let database = match Database::connect(&settings) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error - Unable to Connect to Database: {}", e);
            println!("Make sure you started postgres on this machine");
            process::exit(1);
        }
    };
    println!("Done");

    if *RUN_MIGRATIONS {
        if let Err(e) = run_db_migrations(database.conn()) {
            eprintln!("Failed to run database migrations: {}", e);
        }
    }

    let mut session = Session::new(MainDbOps::new(database.conn()));
    let mut console = Console::stdio();

    if let Err(e) = handlers::main_menu().run(&mut session, &mut console) {
        eprintln!("{}", e);
    }

    print!("Disconnecting from database...");
    drop(session);
    drop(database);
    println!("Done\n\nBye !");
}
