/*!
# Reverie

Reverie is a dream journal. Each dream is captured as four keyword groups
(scenes, characters, emotions, objects), three emotional decoding answers and
a free association, then handed to a language model for a reflection in the
spirit of Jungian and Gestalt dream work.

## Core Features

- Record, import, list and delete dreams in a local SQLite store
- Reflect on a single dream, or look for recurring patterns across all of them
- Reach the model directly, or through a relay that keeps the provider key
  off the client
- Every AI operation answers with displayable text: failures become fixed
  fallback sentences, never errors

## Architecture

- `ai`: Prompt building, the total `DreamOracle` gateway and its HTTP backends
- `cli`: Command-line interface handling using clap
- `config`: Configuration loading and validation
- `constants`: Shared names, defaults and fixed sentences
- `db`: Pooled SQLite dream store
- `dream`: Dream record types
- `errors`: Error handling infrastructure
- `ops`: High-level journal operations
- `relay`: The credential-holding relay server

## Usage Example

```rust,no_run
use reverie::{Config, DreamOracle};
use reverie::db::Database;
use reverie::ops;

fn main() -> reverie::AppResult<()> {
    let config = Config::load()?;
    config.validate()?;

    let db = Database::open(&config.db_path)?;
    db.initialize_schema()?;

    let oracle = DreamOracle::from_config(&config)?;
    println!("{}", ops::analyze_dreams(&db, &oracle)?);
    Ok(())
}
```
*/

/// Prompt building and the reflection gateway
pub mod ai;
/// Command-line interface for parsing and handling user arguments
pub mod cli;
/// Configuration loading and management
pub mod config;
/// Application-wide constants
pub mod constants;
/// Dream storage
pub mod db;
/// Dream record types
pub mod dream;
/// Error types and utilities for error handling
pub mod errors;
/// High-level dream journal operations
pub mod ops;
/// Relay server holding the provider credential
pub mod relay;

// Re-export important types for convenience
pub use ai::DreamOracle;
pub use cli::CliArgs;
pub use config::Config;
pub use dream::DreamRecord;
pub use errors::{AppError, AppResult};
