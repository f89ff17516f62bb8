// Warden Infrastructure - JSON Adapter
// Implements: RecordSource

mod json_source;

pub use json_source::JsonFileSource;
