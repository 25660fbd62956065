use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use glob::glob;
use sensorframe_core::schema::{Schema, presets};
use sensorframe_core::{DecodeError, DecodedRecord, decode, decoder::message_lines};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SENSORFRAME_BUILD_COMMIT"),
    " ",
    env!("SENSORFRAME_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "sensorframe")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode fixed-layout hex sensor reports into named, scaled fields.",
    long_about = None,
    after_help = "Examples:\n  sensorframe decode 08108b8182342d580104de00af01020164\n  sensorframe decode --preset mac --input reports.txt\n  sensorframe schema show mac --pretty > mac.json"
)]
struct Cli {
    /// Increase log verbosity (RUST_LOG overrides)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode hex messages and print one JSON value per message.
    #[command(
        after_help = "Messages come from the arguments, else from --input, else from stdin.\nA message rejected by a schema's length gate prints `null`."
    )]
    Decode(DecodeArgs),
    /// Inspect built-in schemas and schema files.
    Schema {
        #[command(subcommand)]
        command: SchemaCommands,
    },
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Hex-encoded messages
    messages: Vec<String>,

    /// Built-in schema preset
    #[arg(short, long, default_value = presets::DEVICE_ID, conflicts_with = "schema")]
    preset: String,

    /// JSON schema file (a glob must match exactly one file)
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// File with one hex message per line (`#` comments allowed)
    #[arg(short, long, conflicts_with = "messages")]
    input: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, conflicts_with = "compact")]
    pretty: bool,

    /// Compact JSON output (default)
    #[arg(long)]
    compact: bool,

    /// Suppress non-error output on stderr
    #[arg(long)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum SchemaCommands {
    /// List built-in presets.
    List,
    /// Print a built-in preset as a JSON schema document.
    Show {
        /// Preset name
        name: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Load and validate a JSON schema file.
    Check {
        /// Path to a schema file
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let quiet = matches!(&cli.command, Commands::Decode(args) if args.quiet);
    init_tracing(cli.verbose, quiet);

    let result = match cli.command {
        Commands::Decode(args) => cmd_decode(args),
        Commands::Schema { command } => match command {
            SchemaCommands::List => cmd_schema_list(),
            SchemaCommands::Show { name, pretty } => cmd_schema_show(&name, pretty),
            SchemaCommands::Check { path } => cmd_schema_check(&path),
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    let filter = if quiet {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    if args.pretty && args.compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }

    let schema = match args.schema.as_ref() {
        Some(path) => load_schema_file(path)?,
        None => preset_schema(&args.preset)?,
    };

    let messages = collect_messages(&args)?;
    if messages.is_empty() {
        return Err(CliError::new(
            "no messages to decode",
            Some("pass hex messages as arguments, use --input, or pipe them on stdin".to_string()),
        ));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut rejected = 0usize;
    for (index, message) in messages.iter().enumerate() {
        let record = decode(message, &schema).map_err(|err| {
            CliError::new(
                format!("message #{} could not be decoded: {}", index + 1, err),
                decode_hint(&err),
            )
        })?;
        match &record {
            Some(record) => debug!(index = index + 1, fields = record.len(), "decoded message"),
            None => {
                rejected += 1;
                warn!(
                    index = index + 1,
                    hex_len = message.len(),
                    expected = ?schema.length_gate(),
                    "message rejected by length gate"
                );
            }
        }
        let json = serialize_record(record.as_ref(), args.pretty)?;
        writeln!(out, "{}", json).context("failed to write to stdout")?;
    }

    if rejected > 0 && !args.quiet {
        eprintln!(
            "{} of {} message(s) rejected by the length gate",
            rejected,
            messages.len()
        );
    }
    Ok(())
}

fn decode_hint(err: &DecodeError) -> Option<String> {
    let hint = match err {
        DecodeError::OddLength { .. } | DecodeError::InvalidHexCharacter { .. } => {
            "messages must be an even number of hex digits (0-9, a-f)"
        }
        DecodeError::OutOfBounds { .. } => "the message is shorter than the schema expects",
    };
    Some(hint.to_string())
}

fn serialize_record(record: Option<&DecodedRecord>, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(&record)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(&record)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn collect_messages(args: &DecodeArgs) -> Result<Vec<String>, CliError> {
    if !args.messages.is_empty() {
        return Ok(args
            .messages
            .iter()
            .map(|message| message.trim().to_string())
            .collect());
    }

    if let Some(input) = args.input.as_ref() {
        let text = fs::read_to_string(input)
            .with_context(|| format!("Failed to read input file: {}", input.display()))?;
        return Ok(message_lines(&text).map(str::to_string).collect());
    }

    let mut messages = Vec::new();
    for line in io::stdin().lock().lines() {
        let line = line.context("Failed to read stdin")?;
        messages.extend(message_lines(&line).map(str::to_string));
    }
    Ok(messages)
}

fn preset_schema(name: &str) -> Result<Schema, CliError> {
    presets::require(name).map_err(|err| {
        CliError::new(
            err.to_string(),
            Some(format!("available presets: {}", presets::NAMES.join(", "))),
        )
    })
}

fn load_schema_file(path: &Path) -> Result<Schema, CliError> {
    let resolved = resolve_schema_path(path)?;
    if !resolved.is_file() {
        return Err(CliError::new(
            format!("schema file not found: {}", resolved.display()),
            Some("use `sensorframe schema show <preset>` to start from a template".to_string()),
        ));
    }
    let json = fs::read_to_string(&resolved)
        .with_context(|| format!("Failed to read schema file: {}", resolved.display()))?;
    let schema = Schema::from_json_str(&json).map_err(|err| {
        CliError::new(
            format!("invalid schema {}: {}", resolved.display(), err),
            Some("supported field types: uint8, int16, uint16, hex, mac".to_string()),
        )
    })?;
    info!(
        path = %resolved.display(),
        fields = schema.len(),
        gated = schema.length_gate().is_some(),
        "schema loaded"
    );
    Ok(schema)
}

fn cmd_schema_list() -> Result<(), CliError> {
    for name in presets::NAMES {
        println!("{}", name);
    }
    Ok(())
}

fn cmd_schema_show(name: &str, pretty: bool) -> Result<(), CliError> {
    let schema = preset_schema(name)?;
    let json = if pretty {
        schema.to_json_string_pretty()
    } else {
        schema.to_json_string()
    }
    .map_err(|err| CliError::new(err.to_string(), None))?;
    println!("{}", json);
    Ok(())
}

fn cmd_schema_check(path: &Path) -> Result<(), CliError> {
    let schema = load_schema_file(path)?;
    println!("OK: {} fields", schema.len());
    Ok(())
}

/// `--schema` may be a glob, as long as it names exactly one file.
fn resolve_schema_path(input: &Path) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.to_path_buf());
    }

    let mut matches: Vec<PathBuf> = glob(&pattern)
        .map_err(|err| {
            CliError::new(
                format!("invalid schema pattern '{}': {}", pattern, err.msg),
                None,
            )
        })?
        .filter_map(Result::ok)
        .filter(|path| path.is_file())
        .collect();

    match matches.len() {
        0 => Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        )),
        1 => Ok(matches.remove(0)),
        n => {
            matches.sort();
            Err(CliError::new(
                format!("multiple files match pattern '{}' ({} schemas)", pattern, n),
                Some(format!("pass one of them, e.g. {}", matches[0].display())),
            ))
        }
    }
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
