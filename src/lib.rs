//! Read-it-later archiver: fetch a URL, extract and summarize its content,
//! file it under a category in SQLite and keep a static HTML copy on disk.

pub mod ai;
pub mod app;
pub mod archiver;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod render;
pub mod server;
pub mod services;

pub use archiver::Archiver;
pub use error::{AppError, ErrorKind, Result};
