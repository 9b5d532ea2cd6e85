use std::io::Read;

use serde_json::Value;

use crate::io::format::{json, jsonl, toml, yaml};
use crate::io::{Format, IoError};

/// Reads every document of a stream; JSON and YAML arrays are split.
pub fn read_values<R: Read>(reader: R, format: Format) -> Result<Vec<Value>, IoError> {
    match format {
        Format::Json => json::read_json(reader),
        Format::Yaml => yaml::read_yaml(reader),
        Format::Jsonl => jsonl::read_jsonl(reader),
        Format::Toml => toml::read_toml(reader),
    }
}

/// Reads one whole document, such as a schema or an options table.
pub fn read_document<R: Read>(reader: R, format: Format) -> Result<Value, IoError> {
    match format {
        Format::Json => json::read_json_document(reader),
        Format::Yaml => yaml::read_yaml_document(reader),
        Format::Jsonl => jsonl::read_jsonl_document(reader),
        Format::Toml => toml::read_toml_document(reader),
    }
}

/// Guesses the format of unlabelled stdin: JSON, then JSON lines, then YAML.
pub fn autodetect_stdin_format(input: &[u8]) -> Format {
    let text = String::from_utf8_lossy(input);
    let trimmed = text.trim_start();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return Format::Yaml;
    }
    if serde_json::from_str::<Value>(trimmed).is_ok() {
        return Format::Json;
    }
    let every_line_is_json = trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .all(|line| serde_json::from_str::<Value>(line).is_ok());
    if every_line_is_json {
        Format::Jsonl
    } else {
        Format::Json
    }
}
