pub mod formats;
pub mod validate;
