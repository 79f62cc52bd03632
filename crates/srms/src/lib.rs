//! `srms` - A student record manager
//!
//! This library keeps an ordered list of student records, writes it through
//! to a durable key-value slot on every change, and renders it for display,
//! optionally filtered by a name search.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod ids;
pub mod logging;
pub mod record;
pub mod session;
pub mod storage;
pub mod store;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{RecordId, StudentFields, StudentRecord};
pub use session::{Command, Confirm, Outcome, Session};
pub use storage::{KeyValueStore, MemoryStore, SqliteStore};
pub use store::{RecordStore, StoreStats};
pub use view::View;
