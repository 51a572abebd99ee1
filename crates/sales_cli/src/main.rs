//! Command-line access to an order database.
//!
//! # Responsibility
//! - Install the order schema into a SQLite file.
//! - Print single orders or order pages as JSON.
//!
//! Exit codes: `0` success, `1` usage error, `2` repository failure.

use sales_core::{
    default_log_level, init_logging, install_schema, ConnectionProvider, OrderRepository,
    SqliteConfig, SqliteConnectionProvider, SqliteOrderRepository,
};
use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;

const USAGE: &str = "usage:
  sales_cli <db-path> init
  sales_cli <db-path> get <order-id>
  sales_cli <db-path> list <skip> <count>

environment:
  SALES_LOG_DIR    enable rolling file logs in this directory
  SALES_LOG_LEVEL  trace|debug|info|warn|error";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Init,
    Get { id: i64 },
    List { skip: i64, count: i64 },
}

#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    db_path: PathBuf,
    command: Command,
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let invocation = match parse_args(&args) {
        Ok(invocation) => invocation,
        Err(message) => {
            eprintln!("{message}\n\n{USAGE}");
            return ExitCode::from(1);
        }
    };

    start_logging_from_env();

    match run(invocation) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::from(2)
        }
    }
}

fn parse_args(args: &[String]) -> Result<Invocation, String> {
    let (db_path, rest) = args
        .split_first()
        .ok_or_else(|| "missing database path".to_string())?;
    let (name, operands) = rest
        .split_first()
        .ok_or_else(|| "missing command".to_string())?;

    let command = match (name.as_str(), operands) {
        ("init", []) => Command::Init,
        ("get", [id]) => Command::Get {
            id: parse_number("order-id", id)?,
        },
        ("list", [skip, count]) => Command::List {
            skip: parse_number("skip", skip)?,
            count: parse_number("count", count)?,
        },
        ("init" | "get" | "list", _) => {
            return Err(format!("wrong number of arguments for `{name}`"));
        }
        _ => return Err(format!("unknown command `{name}`")),
    };

    Ok(Invocation {
        db_path: PathBuf::from(db_path),
        command,
    })
}

fn parse_number(label: &str, raw: &str) -> Result<i64, String> {
    raw.parse::<i64>()
        .map_err(|_| format!("{label} must be an integer, got `{raw}`"))
}

fn start_logging_from_env() {
    let Ok(log_dir) = std::env::var("SALES_LOG_DIR") else {
        return;
    };
    let level =
        std::env::var("SALES_LOG_LEVEL").unwrap_or_else(|_| default_log_level().to_string());
    // The core only accepts absolute log directories.
    let log_dir = match std::env::current_dir() {
        Ok(cwd) => cwd.join(&log_dir),
        Err(_) => PathBuf::from(&log_dir),
    };
    if let Err(err) = init_logging(&level, &log_dir.to_string_lossy()) {
        eprintln!("warning: logging disabled: {err}");
    }
}

fn run(invocation: Invocation) -> Result<String, String> {
    // Only `init` may create the database file.
    let config = SqliteConfig::new(&invocation.db_path)
        .with_create_if_missing(invocation.command == Command::Init);
    let provider = SqliteConnectionProvider::new(config);

    match invocation.command {
        Command::Init => {
            let conn = provider.open().map_err(to_message)?;
            install_schema(&conn).map_err(to_message)?;
            log::info!(
                "event=cli_init module=cli status=ok path={}",
                invocation.db_path.display()
            );
            Ok(format!("schema ready at {}", invocation.db_path.display()))
        }
        Command::Get { id } => {
            let repo = SqliteOrderRepository::try_new(provider).map_err(to_message)?;
            let order = repo.get_order(id).map_err(to_message)?;
            serde_json::to_string_pretty(&order).map_err(to_message)
        }
        Command::List { skip, count } => {
            let repo = SqliteOrderRepository::try_new(provider).map_err(to_message)?;
            let orders = repo.get_orders(skip, count).map_err(to_message)?;
            serde_json::to_string_pretty(&orders).map_err(to_message)
        }
    }
}

fn to_message(err: impl Display) -> String {
    err.to_string()
}
