pub mod json;
pub mod jsonl;
pub mod toml;
pub mod yaml;
