//! `xgen-writer`: the code writer (C6) — atomic, backed-up, rollback-able
//! output of generated extractor/model/test source.

pub mod atomic_write;
pub mod clock;
pub mod writer;

pub use atomic_write::{atomic_write, AtomicWriteError};
pub use clock::{Clock, FixedClock, SystemClock};
pub use writer::{BackupRecord, CodeWriter, PartialWrite, WriteFailure, WriteOutcome, WriterError, WrittenPaths};
