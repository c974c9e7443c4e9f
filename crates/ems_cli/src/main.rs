//! Command-line driver for the employee records service.
//!
//! # Responsibility
//! - Resolve configuration from flags and `EMS_*` environment variables.
//! - Dispatch one subcommand to the matching `/api/v1/employees` route.
//! - Print the JSON response on stdout, or the JSON error on stderr.

use clap::{Args, Parser, Subcommand};
use ems_api::{ApiError, ApiResponse, EmployeeApi, EmployeeFilter};
use ems_core::{default_log_level, init_logging, EmployeePatch, EmployeeRequest};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_DB_FILE_NAME: &str = "ems.sqlite3";

/// `ems` command arguments.
#[derive(Debug, Parser)]
#[command(name = "ems", about = "Manage employee records", version)]
struct Cli {
    /// SQLite database file. Defaults to `ems.sqlite3` in the temp directory.
    #[arg(long = "db-path", env = "EMS_DB_PATH", value_name = "path")]
    db_path: Option<PathBuf>,
    /// One of trace|debug|info|warn|error.
    #[arg(long = "log-level", env = "EMS_LOG_LEVEL", value_name = "level")]
    log_level: Option<String>,
    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long = "log-dir", env = "EMS_LOG_DIR", value_name = "dir")]
    log_dir: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an employee.
    Create(EmployeeFields),
    /// List employees, optionally filtered by one field (case-insensitive).
    List {
        #[arg(long, conflicts_with_all = ["last_name", "department_code"])]
        first_name: Option<String>,
        #[arg(long, conflicts_with = "department_code")]
        last_name: Option<String>,
        #[arg(long)]
        department_code: Option<String>,
    },
    /// Show one employee by email.
    Get { email: String },
    /// Replace all fields of the employee stored under EMAIL.
    Update {
        #[arg(value_name = "EMAIL")]
        path_email: String,
        #[command(flatten)]
        fields: EmployeeFields,
    },
    /// Overwrite only the given fields of the employee stored under EMAIL.
    Patch {
        email: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        department_code: Option<String>,
    },
    /// Delete the employee stored under EMAIL.
    Delete { email: String },
}

#[derive(Debug, Args)]
struct EmployeeFields {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    department_code: String,
}

impl From<EmployeeFields> for EmployeeRequest {
    fn from(fields: EmployeeFields) -> Self {
        EmployeeRequest::new(
            fields.first_name,
            fields.last_name,
            fields.email,
            fields.department_code,
        )
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let db_path = cli
        .db_path
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
    let api = EmployeeApi::new(db_path);

    match run(&api, cli.command) {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(rendered) => {
            eprintln!("{rendered}");
            ExitCode::FAILURE
        }
    }
}

fn run(api: &EmployeeApi, command: Command) -> Result<String, String> {
    match command {
        Command::Create(fields) => render(api.create(&fields.into())),
        Command::List {
            first_name,
            last_name,
            department_code,
        } => {
            let filter = match (first_name, last_name, department_code) {
                (Some(value), _, _) => EmployeeFilter::FirstName(value),
                (None, Some(value), _) => EmployeeFilter::LastName(value),
                (None, None, Some(value)) => EmployeeFilter::DepartmentCode(value),
                (None, None, None) => EmployeeFilter::All,
            };
            render(api.list(&filter))
        }
        Command::Get { email } => render(api.get(&email)),
        Command::Update { path_email, fields } => {
            render(api.update(&path_email, &fields.into()))
        }
        Command::Patch {
            email,
            first_name,
            last_name,
            department_code,
        } => {
            let patch = EmployeePatch {
                first_name,
                last_name,
                department_code,
            };
            render(api.patch(&email, &patch))
        }
        Command::Delete { email } => render(api.delete(&email)),
    }
}

fn render<T: Serialize>(result: Result<ApiResponse<T>, ApiError>) -> Result<String, String> {
    match result {
        Ok(response) => to_json(&response),
        Err(err) => Err(to_json(&err).unwrap_or_else(|message| message)),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|err| format!("failed to render response: {err}"))
}
