// CLI module
// Host adapter: the command line plays the editor's part

mod commands;
mod selection;

pub use commands::{
    check_server, send_to_local_tts, stop_local_tts, CommandContext, CommandOutcome, Timeouts,
};
pub use selection::{resolve_selection, CliTextSource, SelectionError, TextSource};
