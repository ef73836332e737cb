use std::path::PathBuf;

use clap::Parser;
use torus_life::draw::DEFAULT_DELAY_MS;

#[derive(Parser, Debug)]
#[command(name = "torus_life")]
#[command(version, about = "Conway's Game of Life on a wraparound grid")]
pub struct Cli {
    /// Configuration file: `rows cols count` followed by `count` column/row pairs
    pub config: PathBuf,

    /// Stop after this many generations (runs until quit when omitted)
    #[arg(short, long)]
    pub generations: Option<u64>,

    /// Milliseconds between generations
    #[arg(short, long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay: u64,

    /// Write generations to stdout as text instead of driving the terminal
    #[arg(long)]
    pub plain: bool,
}
