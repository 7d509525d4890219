//! memdb shell
//!
//! Runs statements from the command line, from a script or interactively.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use memdb::Database;
use tracing_subscriber::EnvFilter;

/// In-memory relational database shell
#[derive(Parser)]
#[command(name = "memdb")]
#[command(version, long_about = None)]
struct Cli {
    /// Run a single statement and exit
    #[arg(short, long, conflicts_with = "script")]
    execute: Option<String>,

    /// Run a file of statements, one per line (`--` starts a comment line)
    #[arg(long)]
    script: Option<PathBuf>,

    /// Log filter, used when RUST_LOG is not set
    #[arg(long, env = "MEMDB_LOG", default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut db = Database::new();
    let outcome = match (&cli.execute, &cli.script) {
        (Some(sql), _) => Ok(run(&mut db, sql)),
        (None, Some(path)) => run_script(&mut db, path),
        (None, None) => repl(&mut db).map(|()| true),
    };

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Executes one statement and prints its result. Returns false on failure.
fn run(db: &mut Database, sql: &str) -> bool {
    match db.execute(sql) {
        Ok(table) => {
            println!("{table}");
            true
        }
        Err(e) => {
            eprintln!("error: {e}");
            false
        }
    }
}

fn is_statement(line: &str) -> bool {
    !line.is_empty() && !line.starts_with("--")
}

fn run_script(db: &mut Database, path: &Path) -> io::Result<bool> {
    let script = fs::read_to_string(path)?;
    let mut ok = true;
    for line in script.lines().map(str::trim).filter(|l| is_statement(l)) {
        ok &= run(db, line);
    }
    Ok(ok)
}

fn repl(db: &mut Database) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        write!(stdout, "memdb> ")?;
        stdout.flush()?;

        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        if is_statement(line) {
            run(db, line);
        }
    }

    Ok(())
}
