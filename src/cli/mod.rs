use crate::constants::{
    APP_DESCRIPTION, APP_NAME, DEFAULT_SPECTRUM_LIMIT, LOG_FORMAT_JSON, LOG_FORMAT_TEXT,
};
use crate::dream::{Decoding, Keywords, NewDream};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// A dream journal with gentle AI reflections
#[derive(Parser, Debug)]
#[clap(name = APP_NAME, about = APP_DESCRIPTION)]
#[clap(author, version, long_about = None)]
pub struct CliArgs {
    /// Log output format
    #[clap(long, value_parser = [LOG_FORMAT_TEXT, LOG_FORMAT_JSON], default_value = LOG_FORMAT_TEXT, global = true)]
    pub log_format: String,

    /// Print verbose output
    #[clap(short = 'v', long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record a new dream
    Record(RecordArgs),

    /// Store a dream from a JSON file (use - for stdin)
    Import {
        path: PathBuf,
    },

    /// List stored dreams, newest first
    List,

    /// Print a stored dream as JSON
    Show {
        id: String,
    },

    /// Reflect on a stored dream and keep the reflection
    Reflect {
        id: String,
    },

    /// Reflect on a dream JSON file without storing it (use - for stdin)
    ReflectFile {
        path: PathBuf,
    },

    /// Look for recurring patterns across all stored dreams
    Analyze,

    /// Show the most frequent strongest emotions
    Emotions {
        /// Maximum number of emotions to show
        #[clap(short = 'n', long, default_value_t = DEFAULT_SPECTRUM_LIMIT)]
        limit: usize,
    },

    /// Delete a stored dream
    Delete {
        id: String,
    },

    /// Run the credential-holding relay server
    Relay,
}

#[derive(Args, Debug, Default)]
pub struct RecordArgs {
    /// A scene from the dream (repeatable)
    #[clap(long = "scene")]
    pub scenes: Vec<String>,

    /// A character from the dream (repeatable)
    #[clap(long = "character")]
    pub characters: Vec<String>,

    /// An emotion felt in the dream (repeatable)
    #[clap(long = "emotion")]
    pub emotions: Vec<String>,

    /// An object from the dream (repeatable)
    #[clap(long = "object")]
    pub objects: Vec<String>,

    /// The strongest emotion in the dream
    #[clap(long, default_value = "")]
    pub strongest_emotion: String,

    /// What in waking life the dream seems linked to
    #[clap(long, default_value = "")]
    pub life_link: String,

    /// If the dream were a film, its theme
    #[clap(long, default_value = "")]
    pub movie_theme: String,

    /// Free association about the dream
    #[clap(short = 'a', long, default_value = "")]
    pub association: String,

    /// Ask for a reflection right away
    #[clap(long)]
    pub reflect: bool,
}

impl RecordArgs {
    /// Collects the flags into a dream ready to be stored.
    pub fn to_new_dream(&self) -> NewDream {
        NewDream {
            keywords: Keywords {
                scenes: self.scenes.clone(),
                characters: self.characters.clone(),
                emotions: self.emotions.clone(),
                objects: self.objects.clone(),
            },
            decoding: Decoding {
                strongest_emotion: self.strongest_emotion.clone(),
                recent_life_link: self.life_link.clone(),
                movie_theme: self.movie_theme.clone(),
            },
            association: self.association.clone(),
        }
    }
}
