mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use torus_life::{
    draw::{App, Plain, Terminal},
    init,
};

use cli::Cli;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let world = init::initialize(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let mut app = App::new(world).with_timeout(cli.delay);
    if let Some(n) = cli.generations {
        app = app.with_maxgen(n);
    }

    if cli.plain {
        let mut sink = Plain::new(std::io::stdout().lock());
        app.run(&mut sink)?;
    } else {
        let mut sink = Terminal::new()?;
        app.run(&mut sink)?;
    }
    Ok(())
}
