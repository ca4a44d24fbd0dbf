//! The seven independent tree-walkers (spec §4.4), each isolated so a
//! panic in one never aborts the others (see `engine::run_walker`).

pub mod complexity_walker;
pub mod di_walker;
pub mod import_walker;
pub mod interface_walker;
pub mod logging_walker;
pub mod security_walker;
pub mod type_hint_walker;
