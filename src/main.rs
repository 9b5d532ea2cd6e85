use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::{Value, json};
use shapeguard::ValidationOptions;
use shapeguard::cmd::{formats, validate};
use shapeguard::engine::Validator;
use shapeguard::io::Format;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "shapeguard",
    version,
    about = "Declarative schema validation CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate input documents against a schema.
    Validate(ValidateArgs),
    /// List the names accepted by the `format` and `filter` keywords.
    Formats,
}

#[derive(Debug, clap::Args)]
struct ValidateArgs {
    #[arg(long)]
    schema: PathBuf,

    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long, value_enum)]
    from: Option<CliInputFormat>,

    /// Options table (JSON, YAML or TOML); flags take precedence.
    #[arg(long)]
    options: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    cast: bool,

    /// Write cast values back into the documents; implies --cast.
    #[arg(long, default_value_t = false)]
    cast_source: bool,

    #[arg(long, default_value_t = false)]
    apply_defaults: bool,

    #[arg(long, default_value_t = false)]
    validate_defaults: bool,

    #[arg(long, default_value_t = false)]
    exit_on_first_error: bool,

    #[arg(long, default_value_t = false)]
    fail_on_first_error: bool,

    #[arg(long, default_value_t = false)]
    no_additional_properties: bool,

    /// Include each document, after filters and defaults, in the report.
    #[arg(long, default_value_t = false)]
    emit_document: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliInputFormat {
    Json,
    Yaml,
    Jsonl,
    Toml,
}

impl From<CliInputFormat> for Format {
    fn from(value: CliInputFormat) -> Self {
        match value {
            CliInputFormat::Json => Self::Json,
            CliInputFormat::Yaml => Self::Yaml,
            CliInputFormat::Jsonl => Self::Jsonl,
            CliInputFormat::Toml => Self::Toml,
        }
    }
}

impl ValidateArgs {
    /// Only flags that were passed override the options file.
    fn overrides(&self) -> ValidationOptions {
        let set = |flag: bool| flag.then_some(true);
        ValidationOptions {
            cast: set(self.cast || self.cast_source),
            cast_source: set(self.cast_source),
            additional_properties: self.no_additional_properties.then_some(false),
            apply_default_value: set(self.apply_defaults),
            validate_default_value: set(self.validate_defaults),
            exit_on_first_error: set(self.exit_on_first_error),
            fail_on_first_error: set(self.fail_on_first_error),
        }
    }
}

#[derive(Serialize)]
struct CliError<'a> {
    error: &'a str,
    message: String,
    code: i32,
    details: Value,
}

fn main() {
    init_logging();
    process::exit(run());
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("SHAPEGUARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init();
}

fn run() -> i32 {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => return handle_parse_error(error),
    };

    match cli.command {
        Commands::Validate(args) => run_validate(args),
        Commands::Formats => run_formats(),
    }
}

fn handle_parse_error(error: clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            print!("{error}");
            0
        }
        _ => {
            emit_error(
                "input_usage_error",
                error.to_string(),
                json!({"kind": "cli_parse_error"}),
                3,
            );
            3
        }
    }
}

fn run_validate(args: ValidateArgs) -> i32 {
    let command_args = validate::ValidateCommandArgs {
        overrides: args.overrides(),
        schema: args.schema,
        input: args.input,
        from: args.from.map(Into::into),
        options: args.options,
        emit_document: args.emit_document,
    };

    let stdin = std::io::stdin();
    let response = validate::run_with_stdin(&command_args, stdin.lock());

    match response.exit_code {
        0 | 2 => {
            if emit_json_stdout(&response.payload) {
                response.exit_code
            } else {
                emit_error(
                    "internal_error",
                    "failed to serialize validate response".to_string(),
                    json!({"command": "validate"}),
                    1,
                );
                1
            }
        }
        3 | 1 => {
            if emit_json_stderr(&response.payload) {
                response.exit_code
            } else {
                emit_error(
                    "internal_error",
                    "failed to serialize validate error".to_string(),
                    json!({"command": "validate"}),
                    1,
                );
                1
            }
        }
        other => {
            emit_error(
                "internal_error",
                format!("unexpected validate exit code: {other}"),
                json!({"command": "validate"}),
                1,
            );
            1
        }
    }
}

fn run_formats() -> i32 {
    let payload = formats::run(&Validator::new());
    if emit_json_stdout(&payload) {
        0
    } else {
        emit_error(
            "internal_error",
            "failed to serialize formats".to_string(),
            json!({"command": "formats"}),
            1,
        );
        1
    }
}

fn emit_json_stdout(value: &Value) -> bool {
    match serde_json::to_string(value) {
        Ok(serialized) => {
            println!("{serialized}");
            true
        }
        Err(_) => false,
    }
}

fn emit_json_stderr(value: &Value) -> bool {
    match serde_json::to_string(value) {
        Ok(serialized) => {
            eprintln!("{serialized}");
            true
        }
        Err(_) => false,
    }
}

fn emit_error(error: &'static str, message: String, details: Value, code: i32) {
    let payload = CliError {
        error,
        message,
        code,
        details,
    };
    match serde_json::to_string(&payload) {
        Ok(serialized) => eprintln!("{serialized}"),
        Err(_) => eprintln!(
            "{{\"error\":\"internal_error\",\"message\":\"failed to serialize error\",\"code\":1}}"
        ),
    }
}
