pub mod content_gate;
pub mod draft;
pub mod prompt;
