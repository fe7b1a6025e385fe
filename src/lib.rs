//! bcr library exports for the binary and integration tests

pub mod api;
pub mod app;
pub mod core;
pub mod registry;
pub mod tui;
pub mod ui;

#[cfg(test)]
pub mod test_support;
