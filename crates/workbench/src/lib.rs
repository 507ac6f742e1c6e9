//! Workbench pipeline for CodeBench: couples the document tree with the tab
//! session and keeps the derived state (active-document mirror, search
//! results, pending confirmations) consistent with both.
//!
//! All state changes funnel through [`Workbench::apply`], which applies each
//! [`Command`] as one atomic step: tree mutation, session reconciliation,
//! mirror recompute, search refresh. Rejected commands leave every field
//! untouched.

mod command;
mod language;
mod menu;
mod search;
mod workbench;

pub use command::Command;
pub use language::{display_name, file_extension, language_hint};
pub use menu::{node_menu, tab_strip_menu, ContextMenu, MenuAction, MenuEntry};
pub use search::SearchState;
pub use workbench::{
    ActiveDocument, EditorPayload, Outcome, PendingDelete, Workbench, WorkbenchError,
    WorkbenchOptions,
};
