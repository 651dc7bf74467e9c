//! Terminal front end: one-shot subcommands and the interactive shell.

mod commands;
mod page;
mod render;
mod repl;

pub use commands::{
  build_backend, load_dashboard, parse_payload, render_context, run_create, run_dashboard,
  run_delete, run_init, run_list, run_update, Commands, ConsoleArgs,
};
pub use page::{page_for, EntityPage, PageView};
pub use render::{empty_message, footer, render_dashboard, render_table, Column, RenderContext, TableRow};
pub use repl::Repl;
