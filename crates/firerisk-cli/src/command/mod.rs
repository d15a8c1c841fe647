use clap::{Parser, Subcommand};

use self::{grid::GridArg, months::MonthsArg, render::RenderArg};

mod grid;
mod months;
mod render;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct CommandArgs {
    /// What to do; renders a month when omitted
    #[command(subcommand)]
    mode: Option<Mode>,
    #[clap(flatten)]
    render: RenderArg,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
enum Mode {
    /// Render the true and predicted risk maps for one month
    Render(#[clap(flatten)] RenderArg),
    /// Render the bare grid without risk data
    Grid(#[clap(flatten)] GridArg),
    /// List the months covered by the history table
    Months(#[clap(flatten)] MonthsArg),
}

impl CommandArgs {
    /// Without a subcommand, the top-level arguments are those of `render`.
    fn into_mode(self) -> Mode {
        self.mode.unwrap_or(Mode::Render(self.render))
    }
}

pub fn run() -> anyhow::Result<()> {
    match CommandArgs::parse().into_mode() {
        Mode::Render(arg) => render::run(&arg)?,
        Mode::Grid(arg) => grid::run(&arg)?,
        Mode::Months(arg) => months::run(&arg)?,
    }
    Ok(())
}
