pub mod app;
pub mod notify;
pub mod package;
pub mod progress;
