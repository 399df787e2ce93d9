//! cgraph printer - renders program graphs as indented text.
//!
//! The output is a debugging aid: one node per line, tagged with the node
//! kind, with control-flow sub-sections labelled. Printing is read-only and
//! deterministic, so the same graph always prints the same text.

mod emitter;
mod printer;

pub use emitter::{Emitter, StringEmitter};
pub use printer::{print_block, PrintError, Printer, PrinterConfig};
