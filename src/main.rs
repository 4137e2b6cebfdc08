use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::debug;

use jsonlib::format::Format;
use jsonlib::keywords::write_atomic;
use jsonlib::output::{self, Style};
use jsonlib::{navigate, JsonLibrary, JsonPath, Settings};

#[derive(Parser)]
#[command(
    name = "jsonlib",
    version,
    about = "Query and edit JSON documents with JSONPath"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Output format [json, yaml]
    #[arg(short, long = "output-format", global = true, default_value = "json")]
    output_format: String,

    /// Compact output (no pretty printing)
    #[arg(short, long, global = true)]
    compact: bool,

    /// Spaces per indentation level for pretty JSON
    #[arg(long, global = true, default_value_t = 2)]
    indent: usize,

    /// Raw string output (no quotes for string values)
    #[arg(short, long, global = true)]
    raw: bool,

    /// More logging on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Print every value the path selects
    Get {
        #[command(flatten)]
        target: Target,

        /// Fail when nothing matches
        #[arg(long)]
        fail_on_empty: bool,

        /// Print the normalized location before each value
        #[arg(short, long)]
        locations: bool,
    },

    /// Replace every match with a value
    Set {
        /// JSONPath expression
        path: String,

        /// New value as JSON; text that is not valid JSON is used as a string
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Input file (reads from stdin if omitted)
        file: Option<PathBuf>,

        #[command(flatten)]
        write: WriteOpts,
    },

    /// Append to matched arrays, merge into matched objects
    Add {
        /// JSONPath expression
        path: String,

        /// Value to add as JSON; text that is not valid JSON is used as a string
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Input file (reads from stdin if omitted)
        file: Option<PathBuf>,

        #[command(flatten)]
        write: WriteOpts,
    },

    /// Remove every match
    Delete {
        #[command(flatten)]
        target: Target,

        /// Edit file in place
        #[arg(short, long = "in-place")]
        in_place: bool,
    },

    /// Exit non-zero unless the path matches (or, with --absent, unless it does not)
    Check {
        #[command(flatten)]
        target: Target,

        /// Require that nothing matches
        #[arg(long)]
        absent: bool,
    },

    /// Validate a document against a JSON Schema file
    Validate {
        /// JSON Schema file
        schema: PathBuf,

        /// Input file (reads from stdin if omitted)
        file: Option<PathBuf>,
    },
}

#[derive(Args)]
struct Target {
    /// JSONPath expression, e.g. '$.store.book[?(@.price < 10)].title'
    path: String,

    /// Input file (reads from stdin if omitted)
    file: Option<PathBuf>,
}

#[derive(Args)]
struct WriteOpts {
    /// Edit file in place
    #[arg(short, long = "in-place")]
    in_place: bool,

    /// Leave missing key/index paths alone instead of creating them
    #[arg(long)]
    no_create: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let style = Style {
        format: Format::from_str_name(&cli.output_format)?,
        indent: if cli.compact { None } else { Some(cli.indent) },
        raw: cli.raw,
    };

    match &cli.command {
        Command::Get {
            target,
            fail_on_empty,
            locations,
        } => {
            let doc = read_document(target.file.as_deref())?;
            let path = JsonPath::compile(&target.path)?;
            let matches = navigate::find(&path, &doc);
            if matches.is_empty() && *fail_on_empty {
                anyhow::bail!("path not found: {path}");
            }
            let mut buf = String::new();
            for (i, m) in matches.iter().enumerate() {
                if style.format == Format::Yaml && i > 0 {
                    buf.push_str("---\n");
                }
                if *locations {
                    buf.push_str(&m.location.to_string());
                    buf.push('\t');
                }
                push_line(&mut buf, output::format_value(m.value, &style)?);
            }
            print!("{buf}");
        }
        Command::Set {
            path,
            value,
            file,
            write,
        } => {
            let lib = library(write.no_create);
            let doc = read_document(file.as_deref())?;
            let updated = lib.update_value_to_json(&doc, path, parse_value(value))?;
            emit_document(&updated, &style, file.as_deref(), write.in_place)?;
        }
        Command::Add {
            path,
            value,
            file,
            write,
        } => {
            let lib = library(write.no_create);
            let doc = read_document(file.as_deref())?;
            let updated = lib.add_object_to_json(&doc, path, parse_value(value))?;
            emit_document(&updated, &style, file.as_deref(), write.in_place)?;
        }
        Command::Delete { target, in_place } => {
            let lib = library(false);
            let doc = read_document(target.file.as_deref())?;
            let updated = lib.delete_object_from_json(&doc, &target.path)?;
            emit_document(&updated, &style, target.file.as_deref(), *in_place)?;
        }
        Command::Check { target, absent } => {
            let lib = JsonLibrary::new();
            let doc = read_document(target.file.as_deref())?;
            if *absent {
                lib.should_not_have_value_in_json(&doc, &target.path)?;
            } else {
                lib.should_have_value_in_json(&doc, &target.path)?;
            }
        }
        Command::Validate { schema, file } => {
            let lib = JsonLibrary::new();
            let doc = read_document(file.as_deref())?;
            lib.validate_json_by_schema_file(&doc, schema)
                .with_context(|| format!("validating against {}", schema.display()))?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn library(no_create: bool) -> JsonLibrary {
    JsonLibrary::with_settings(Settings {
        create_missing: !no_create,
        ..Settings::default()
    })
}

fn read_document(file: Option<&Path>) -> Result<Value> {
    let input = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };
    let source = file.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    JsonLibrary::new()
        .convert_string_to_json(&input)
        .with_context(|| format!("parsing {source}"))
}

/// JSON text when it parses, otherwise the text itself as a string.
fn parse_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| {
        debug!(value = text, "value is not JSON, using it as a string");
        Value::String(text.to_string())
    })
}

fn emit_document(doc: &Value, style: &Style, file: Option<&Path>, in_place: bool) -> Result<()> {
    let mut formatted = String::new();
    push_line(&mut formatted, output::format_value(doc, style)?);

    if !in_place {
        print!("{formatted}");
        return Ok(());
    }
    let Some(path) = file else {
        anyhow::bail!("--in-place requires a file argument");
    };
    write_atomic(path, formatted.as_bytes())
        .with_context(|| format!("replacing {} with updated content", path.display()))?;
    Ok(())
}

fn push_line(buf: &mut String, formatted: String) {
    buf.push_str(&formatted);
    if !formatted.ends_with('\n') {
        buf.push('\n');
    }
}
