/*!
# Reverie - A Dream Journal

Reverie records dreams as keywords, three emotional decoding answers and a
free association, and asks a language model for gentle reflections on them.

## Usage

```text
reverie [--log-format text|json] [-v] <COMMAND>

Commands:
  record        Record a new dream
  import        Store a dream from a JSON file (use - for stdin)
  list          List stored dreams, newest first
  show          Print a stored dream as JSON
  reflect       Reflect on a stored dream and keep the reflection
  reflect-file  Reflect on a dream JSON file without storing it
  analyze       Look for recurring patterns across all stored dreams
  emotions      Show the most frequent strongest emotions
  delete        Delete a stored dream
  relay         Run the credential-holding relay server
```

## Configuration

- `REVERIE_AI_MODE`: `relay` (default) or `direct`
- `REVERIE_RELAY_URL`, `REVERIE_RELAY_TOKEN`: where and how to reach the relay
- `REVERIE_RELAY_ADDR`: bind address for `reverie relay`
- `GEMINI_API_KEY`: provider credential for direct mode and the relay server
- `REVERIE_DB`: dream database path (defaults to `~/.local/share/reverie/dreams.db`)
- `REVERIE_TIMEOUT_SECS`: optional per-request timeout
- `RUST_LOG`: log filter, overriding `-v`
*/

use chrono::{Local, TimeZone, Utc};
use clap::Parser;
use reverie::ai::DreamOracle;
use reverie::cli::{CliArgs, Command};
use reverie::constants::{
    DEFAULT_LOG_LEVEL, LOG_FORMAT_JSON, TRACING_ROOT_SPAN_NAME, TRACING_SERVICE_NAME,
};
use reverie::db::dreams::{delete_dream, get_dream, list_dreams};
use reverie::db::Database;
use reverie::dream::DreamRecord;
use reverie::errors::{AppError, AppResult};
use reverie::{ops, relay, Config};
use serde_json::Value;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, error, info, info_span};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Sets up the global subscriber. Logs go to stderr so stdout stays clean
/// for command output.
fn init_tracing(log_format: &str, verbose: bool) {
    let default_level = if verbose { "debug" } else { DEFAULT_LOG_LEVEL };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(filter);
    if log_format == LOG_FORMAT_JSON {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_writer(io::stderr),
            )
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(io::stderr))
            .init();
    }
}

fn main() {
    let args = CliArgs::parse();
    init_tracing(&args.log_format, args.verbose);

    let correlation_id = Uuid::new_v4();
    let root_span = info_span!(
        TRACING_ROOT_SPAN_NAME,
        service_name = TRACING_SERVICE_NAME,
        correlation_id = %correlation_id
    );
    let _guard = root_span.enter();

    debug!("CLI arguments: {:?}", args);

    if let Err(e) = run(args.command) {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Reads a whole file, or stdin for `-`.
fn read_input(path: &Path) -> AppResult<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}

fn open_store(config: &Config) -> AppResult<Database> {
    let db = Database::open(&config.db_path)?;
    db.initialize_schema()?;
    Ok(db)
}

fn format_timestamp(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
        None => "????-??-?? ??:??".to_string(),
    }
}

fn list_line(dream: &DreamRecord) -> String {
    let title = [
        dream.decoding.movie_theme.as_str(),
        dream.decoding.strongest_emotion.as_str(),
        dream.association.as_str(),
    ]
    .into_iter()
    .map(str::trim)
    .find(|s| !s.is_empty())
    .unwrap_or("-");

    let marker = if dream.ai_reflection.is_some() { "*" } else { " " };
    format!(
        "{}  {} {} {}",
        dream.id,
        format_timestamp(dream.timestamp),
        marker,
        title
    )
}

fn run(command: Command) -> AppResult<()> {
    info!("Loading configuration");
    let config = Config::load()?;
    config.validate()?;
    debug!("Configuration: {:?}", config);

    match command {
        Command::Relay => relay::serve(&config),

        Command::ReflectFile { path } => {
            let raw = read_input(&path)?;
            let dream: Value = serde_json::from_str(&raw)?;
            let oracle = DreamOracle::from_config(&config)?;
            println!("{}", oracle.reflect(&dream));
            Ok(())
        }

        Command::Record(record) => {
            let db = open_store(&config)?;
            let stored = ops::record_dream(&db, record.to_new_dream(), Utc::now())?;
            println!("{}", stored.id);

            if record.reflect {
                let oracle = DreamOracle::from_config(&config)?;
                println!();
                println!("{}", ops::reflect_on_dream(&db, &oracle, &stored.id)?);
            }
            Ok(())
        }

        Command::Import { path } => {
            let raw = read_input(&path)?;
            let record: DreamRecord = serde_json::from_str(&raw)?;
            let db = open_store(&config)?;
            let stored = ops::import_dream(&db, record, Utc::now())?;
            println!("{}", stored.id);
            Ok(())
        }

        Command::List => {
            let db = open_store(&config)?;
            let dreams = list_dreams(&*db.get_conn()?)?;
            if dreams.is_empty() {
                println!("No dreams recorded yet.");
            }
            for dream in &dreams {
                println!("{}", list_line(dream));
            }
            Ok(())
        }

        Command::Show { id } => {
            let db = open_store(&config)?;
            let dream = get_dream(&*db.get_conn()?, &id)?
                .ok_or_else(|| AppError::Dream(format!("No dream found with id: {}", id)))?;
            println!("{}", serde_json::to_string_pretty(&dream)?);
            Ok(())
        }

        Command::Reflect { id } => {
            let db = open_store(&config)?;
            let oracle = DreamOracle::from_config(&config)?;
            println!("{}", ops::reflect_on_dream(&db, &oracle, &id)?);
            Ok(())
        }

        Command::Analyze => {
            let db = open_store(&config)?;
            let oracle = DreamOracle::from_config(&config)?;
            println!("{}", ops::analyze_dreams(&db, &oracle)?);
            Ok(())
        }

        Command::Emotions { limit } => {
            let db = open_store(&config)?;
            let dreams = list_dreams(&*db.get_conn()?)?;
            let spectrum = ops::emotion_spectrum(&dreams, limit);
            if spectrum.is_empty() {
                println!("No emotions recorded yet.");
            }
            for entry in spectrum {
                println!("{}\t{}", entry.emotion, entry.count);
            }
            Ok(())
        }

        Command::Delete { id } => {
            let db = open_store(&config)?;
            delete_dream(&*db.get_conn()?, &id)?;
            println!("Deleted {}", id);
            Ok(())
        }
    }
}
