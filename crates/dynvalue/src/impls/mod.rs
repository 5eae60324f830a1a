mod serde;
mod serde_json;
