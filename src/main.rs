mod action;
mod app;
mod catalog;
mod cli;
mod components;
mod config;
mod errors;
mod logging;
mod terminal;
mod ui;
mod view;

use clap::Parser;
use color_eyre::Result;
use tracing::info;

use crate::{app::App, cli::Cli};

#[tokio::main]
async fn main() -> Result<()> {
    errors::init()?;
    logging::init()?;

    let args = Cli::parse();
    info!("starting with {args:?}");
    let mut app = App::new(args.tick_rate, args.frame_rate, args.catalog)?;
    app.run().await?;
    Ok(())
}
