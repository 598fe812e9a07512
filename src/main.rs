//! Pipen Board config CLI
//!
//! Entry point for the `pipen-board-config` command-line tool.

use clap::{Parser, Subcommand, ValueEnum};
use pipen_board_config::help::{default_description, render_markdown};
use pipen_board_config::state::default_state_path;
use pipen_board_config::{
    coerce, finalize, keys_hidden, keys_unhidden, status_percentages, validate, FileStore,
    FormState, RunStatusTree, SchemaDocument, TargetType,
};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pipen-board-config")]
#[command(about = "Finalize pipeline board schemas into run configurations", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Toml,
}

#[derive(Subcommand)]
enum Commands {
    /// Finalize an edited schema into a configuration document
    Finalize {
        /// Schema file (JSON, or TOML with a .toml extension)
        #[arg(long, short = 's')]
        schema: PathBuf,

        /// Output format when printing to stdout
        #[arg(long, short = 'f', value_enum, default_value = "toml")]
        format: OutputFormat,

        /// Write to this file instead of stdout (format from its extension)
        #[arg(long, short = 'o')]
        out: Option<PathBuf>,
    },

    /// Coerce a raw form value and print it as JSON
    Coerce {
        raw: String,

        /// Target type: int, float, auto or str
        #[arg(long = "type", short = 't', default_value = "auto")]
        target: String,

        /// Return the raw string instead of failing
        #[arg(long)]
        lenient: bool,
    },

    /// Validate a raw form value against validator tags
    Validate {
        raw: String,

        /// Validator tags in order (e.g. "required,int")
        #[arg(long, short = 'v', value_delimiter = ',', required = true)]
        validators: Vec<String>,
    },

    /// List the keys of a schema section in display order
    Keys {
        #[arg(long, short = 's')]
        schema: PathBuf,

        /// Section name (e.g. PIPELINE_OPTIONS)
        #[arg(long, default_value = "PIPELINE_OPTIONS")]
        section: String,

        /// List hidden keys instead of visible ones
        #[arg(long)]
        hidden: bool,
    },

    /// Print the status percentages of a run status tree
    Status {
        /// JSON file with PROCESSES / PROCGROUPS statuses
        #[arg(long, short = 'd')]
        data: PathBuf,
    },

    /// Render help markdown to HTML
    HelpText {
        /// Markdown file to render
        file: Option<PathBuf>,

        /// Render the default description of a section instead
        #[arg(long, conflicts_with = "file")]
        section: Option<String>,
    },

    /// Show or update the current config file path
    Configfile {
        /// New config file path
        #[arg(long)]
        set: Option<String>,

        /// State file (default: $PIPEN_BOARD_STATE or .pipen-board/state.json)
        #[arg(long)]
        state: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Finalize {
            schema,
            format,
            out,
        } => run_finalize(schema, format, out),
        Commands::Coerce {
            raw,
            target,
            lenient,
        } => run_coerce(&raw, &target, lenient),
        Commands::Validate { raw, validators } => run_validate(raw, &validators),
        Commands::Keys {
            schema,
            section,
            hidden,
        } => run_keys(schema, &section, hidden),
        Commands::Status { data } => run_status(data),
        Commands::HelpText { file, section } => run_help_text(file, section),
        Commands::Configfile { set, state } => run_configfile(set, state),
    }
}

fn run_finalize(schema_path: PathBuf, format: OutputFormat, out: Option<PathBuf>) {
    let schema = match SchemaDocument::from_file(&schema_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading schema {}: {}", schema_path.display(), e);
            process::exit(1);
        }
    };

    let config = match finalize(&schema) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error finalizing config: {}", e);
            process::exit(1);
        }
    };

    if let Some(path) = out {
        if let Err(e) = config.write_to_file(&path) {
            eprintln!("Error writing {}: {}", path.display(), e);
            process::exit(1);
        }
        println!("Wrote {}", path.display());
        return;
    }

    let rendered = match format {
        OutputFormat::Json => config.to_json(),
        OutputFormat::Toml => config.to_toml(),
    };
    match rendered {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}

fn run_coerce(raw: &str, target: &str, lenient: bool) {
    let target: TargetType = match target.parse() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    match coerce(raw, target, !lenient) {
        Ok(value) => println!("{}", value),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn run_validate(raw: String, validators: &[String]) {
    let value = serde_json::Value::String(raw);
    match validate(Some(&value), validators) {
        None => println!("valid"),
        Some(message) => {
            println!("{}", message);
            process::exit(1);
        }
    }
}

fn run_keys(schema_path: PathBuf, section: &str, hidden: bool) {
    let mut raw = match SchemaDocument::read_raw(&schema_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error loading schema {}: {}", schema_path.display(), e);
            process::exit(1);
        }
    };

    let Some(data) = raw.get_mut(section).and_then(|v| v.as_object_mut()) else {
        eprintln!("Section {} not found in {}", section, schema_path.display());
        process::exit(1);
    };

    let keys = if hidden {
        keys_hidden(data, section)
    } else {
        keys_unhidden(data, section)
    };
    match keys {
        Some(keys) => {
            for key in keys {
                println!("{}", key);
            }
        }
        None => {
            eprintln!("Section {} has malformed options", section);
            process::exit(1);
        }
    }
}

fn run_status(data_path: PathBuf) {
    let tree: RunStatusTree = match fs::read_to_string(&data_path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error loading status data {}: {}", data_path.display(), e);
            process::exit(1);
        }
    };

    let breakdown = status_percentages(&tree);
    println!("succeeded: {:.1}%", breakdown.succeeded);
    println!("failed:    {:.1}%", breakdown.failed);
    println!("running:   {:.1}%", breakdown.running);
    println!("init:      {:.1}%", breakdown.init);
}

fn run_help_text(file: Option<PathBuf>, section: Option<String>) {
    let text = match (file, section) {
        (Some(path), _) => match fs::read_to_string(&path) {
            Ok(t) => Some(t),
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                process::exit(1);
            }
        },
        (None, Some(section)) => match default_description(&section) {
            Some(d) => Some(d.to_string()),
            None => {
                eprintln!("No default description for section {}", section);
                process::exit(1);
            }
        },
        (None, None) => None,
    };

    print!("{}", render_markdown(text.as_deref()));
}

fn run_configfile(set: Option<String>, state_path: Option<PathBuf>) {
    let store = FileStore::open(state_path.unwrap_or_else(default_state_path));
    let mut state = FormState::load(store);

    if let Some(path) = set {
        if let Err(e) = state.set_configfile(path) {
            eprintln!("Error saving state to {}: {}", state.store().path().display(), e);
            process::exit(1);
        }
    }

    println!("{}", state.configfile());
}
