//! Live config reload manager.
//!
//! Combines the file watcher with config loading so edits to the config
//! file (by hand or via `/set`) reach the running session.

mod manager;


pub use manager::ReloadManager;
