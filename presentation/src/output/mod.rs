//! Report rendering

pub mod console;
pub mod formatter;
