//! Orbweaver CLI main entry point

use anyhow::Result;
use clap::Parser;
use orbweaver_cli::{start_interactive, Cli, CommandExecutor, OutputFormat};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // No arguments: interactive mode
    if std::env::args().len() == 1 {
        return start_interactive(CommandExecutor::new(Default::default()), OutputFormat::Text);
    }

    let cli = Cli::parse();
    let mut executor = CommandExecutor::new(cli.reasoner_config()?);
    let result = executor.execute(cli.command)?;
    println!("{}", result.render(cli.format)?);

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
