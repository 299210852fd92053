//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; the route table dispatches to `ChecklistService`.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, ReportFormat};
pub use presentation::{format_create_outcome, format_verify_outcome, ReportOptions};
pub use route::{load_config, RunContext, RunOutput};
