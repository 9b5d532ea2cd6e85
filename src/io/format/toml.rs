use std::io::{Read, Write};

use serde_json::Value;

use crate::io::IoError;

/// A TOML file is always a single table document.
pub fn read_toml<R: Read>(reader: R) -> Result<Vec<Value>, IoError> {
    Ok(vec![read_toml_document(reader)?])
}

pub fn read_toml_document<R: Read>(mut reader: R) -> Result<Value, IoError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    let table: toml::Table = toml::from_str(&text)?;
    Ok(serde_json::to_value(table)?)
}

pub fn write_toml<W: Write>(mut writer: W, values: &[Value]) -> Result<(), IoError> {
    let [single @ Value::Object(_)] = values else {
        return Err(IoError::TomlShape {
            count: values.len(),
        });
    };
    let text = toml::to_string(single)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}
