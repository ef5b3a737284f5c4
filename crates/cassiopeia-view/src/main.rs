use clap::Parser;

use cassiopeia_view::{init_logging, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let styled = console::Term::stdout().features().colors_supported();
    let stdout = std::io::stdout();
    run(&cli, styled, &mut stdout.lock())
}
