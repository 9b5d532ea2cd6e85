use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::error::ValidateError;
use crate::domain::options::ValidationOptions;
use crate::domain::report::Violation;
use crate::domain::schema::Schema;
use crate::engine::Validator;
use crate::io::{self, Format, IoError};

/// Input arguments for validate command execution API.
#[derive(Debug, Clone, Default)]
pub struct ValidateCommandArgs {
    pub schema: PathBuf,
    pub input: Option<PathBuf>,
    pub from: Option<Format>,
    /// Options table file (JSON, YAML or TOML).
    pub options: Option<PathBuf>,
    /// Flag values; these win over the options file.
    pub overrides: ValidationOptions,
    pub emit_document: bool,
}

/// Structured command response that carries exit-code mapping and JSON payload.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidateCommandResponse {
    pub exit_code: i32,
    pub payload: Value,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ValidateReport {
    pub valid: bool,
    pub documents: Vec<DocumentReport>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DocumentReport {
    pub index: usize,
    pub valid: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub aborted: bool,
    pub errors: Vec<Violation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document: Option<Value>,
}

pub fn run_with_stdin<R: Read>(args: &ValidateCommandArgs, stdin: R) -> ValidateCommandResponse {
    run_with_validator(&Validator::new(), args, stdin)
}

/// Same as [`run_with_stdin`] with caller-registered filters and rules.
pub fn run_with_validator<R: Read>(
    validator: &Validator,
    args: &ValidateCommandArgs,
    stdin: R,
) -> ValidateCommandResponse {
    match execute(validator, args, stdin) {
        Ok(report) => report_response(report),
        Err(CommandError::InputUsage(message)) => ValidateCommandResponse {
            exit_code: 3,
            payload: json!({
                "error": "input_usage_error",
                "message": message,
            }),
        },
    }
}

fn report_response(report: ValidateReport) -> ValidateCommandResponse {
    let exit_code = if report.valid { 0 } else { 2 };
    match serde_json::to_value(&report) {
        Ok(payload) => ValidateCommandResponse { exit_code, payload },
        Err(_) => ValidateCommandResponse {
            exit_code: 1,
            payload: json!({
                "error": "internal_error",
                "message": "failed to serialize validate report"
            }),
        },
    }
}

fn execute<R: Read>(
    validator: &Validator,
    args: &ValidateCommandArgs,
    stdin: R,
) -> Result<ValidateReport, CommandError> {
    let schema = load_schema(&args.schema)?;
    let options = load_options(args)?;
    let documents = load_input_values(args, stdin)?;
    debug!(documents = documents.len(), "loaded input documents");

    let mut reports = Vec::with_capacity(documents.len());
    for (index, mut document) in documents.into_iter().enumerate() {
        let outcome = validator.validate_with(&mut document, &schema, &options);
        let emitted = args.emit_document.then_some(document);
        match outcome {
            Ok(verdict) => reports.push(DocumentReport {
                index,
                valid: verdict.valid,
                aborted: false,
                errors: verdict.errors,
                document: emitted,
            }),
            Err(ValidateError::Aborted(violation)) => {
                reports.push(DocumentReport {
                    index,
                    valid: false,
                    aborted: true,
                    errors: vec![*violation],
                    document: emitted,
                });
                break;
            }
            Err(error @ ValidateError::UnknownFilter { .. }) => {
                return Err(CommandError::InputUsage(error.to_string()));
            }
        }
    }

    Ok(ValidateReport {
        valid: reports.iter().all(|report| report.valid),
        documents: reports,
    })
}

fn load_schema(path: &Path) -> Result<Schema, CommandError> {
    let document = io::read_document_file(path).map_err(|err| {
        CommandError::InputUsage(format!(
            "failed to read schema file `{}`: {err}",
            path.display()
        ))
    })?;
    Schema::from_value(&document)
        .map_err(|err| CommandError::InputUsage(format!("invalid schema: {err}")))
}

fn load_options(args: &ValidateCommandArgs) -> Result<ValidationOptions, CommandError> {
    let Some(path) = &args.options else {
        return Ok(args.overrides);
    };
    let document = io::read_document_file(path).map_err(|err| {
        CommandError::InputUsage(format!(
            "failed to read options file `{}`: {err}",
            path.display()
        ))
    })?;
    let from_file: ValidationOptions = serde_json::from_value(document)
        .map_err(|err| CommandError::InputUsage(format!("invalid options: {err}")))?;
    Ok(args.overrides.or(&from_file))
}

fn load_input_values<R: Read>(
    args: &ValidateCommandArgs,
    mut stdin: R,
) -> Result<Vec<Value>, CommandError> {
    if let Some(path) = &args.input {
        let format = io::resolve_input_format(args.from, Some(path.as_path()))
            .map_err(map_io_as_input_usage)?;
        let file = File::open(path).map_err(|err| {
            CommandError::InputUsage(format!(
                "failed to open input file `{}`: {err}",
                path.display()
            ))
        })?;
        return io::reader::read_values(file, format).map_err(map_io_as_input_usage);
    }

    let mut buffer = Vec::new();
    stdin
        .read_to_end(&mut buffer)
        .map_err(|err| CommandError::InputUsage(format!("failed to read stdin: {err}")))?;
    let format = args
        .from
        .unwrap_or_else(|| io::autodetect_stdin_input_format(&buffer));
    io::reader::read_values(buffer.as_slice(), format).map_err(map_io_as_input_usage)
}

fn map_io_as_input_usage(error: IoError) -> CommandError {
    CommandError::InputUsage(error.to_string())
}

enum CommandError {
    InputUsage(String),
}
