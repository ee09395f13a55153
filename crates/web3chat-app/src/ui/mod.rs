//! Terminal presentation: formatting, input commands, and the chat loop.

mod command;
pub mod render;
mod repl;

pub use repl::{run_interactive, run_once};
