//! Locating, launching and talking to external viewer processes.

pub mod discovery;
pub mod http;
pub mod launcher;
