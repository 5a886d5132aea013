//! Storage layer for weekly-budget
//!
//! The view state is one JSON document behind a `StateBackend`; the
//! transaction list is read from an external JSON or CSV file. Writes are
//! atomic.

pub mod backend;
pub mod file_io;
pub mod state;
pub mod transactions;

pub use backend::{FileBackend, MemoryBackend, StateBackend};
pub use file_io::{read_json_required, write_json_atomic};
pub use state::{StateStore, DEFAULT_STATE_KEY};
pub use transactions::{load_transactions, SourceFormat};
