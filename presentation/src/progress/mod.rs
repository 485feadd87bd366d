//! Review cycle progress display

pub mod reporter;
