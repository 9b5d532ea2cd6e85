use std::io::{Read, Write};

use serde_json::Value;

use crate::io::IoError;

/// Top-level arrays become one document per element.
pub fn read_json<R: Read>(reader: R) -> Result<Vec<Value>, IoError> {
    Ok(match read_json_document(reader)? {
        Value::Array(items) => items,
        single => vec![single],
    })
}

pub fn read_json_document<R: Read>(reader: R) -> Result<Value, IoError> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn write_json<W: Write>(writer: W, values: &[Value]) -> Result<(), IoError> {
    if let [single] = values {
        serde_json::to_writer(writer, single)?;
    } else {
        serde_json::to_writer(writer, values)?;
    }
    Ok(())
}
