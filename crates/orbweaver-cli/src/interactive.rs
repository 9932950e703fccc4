//! Interactive CLI mode

use crate::commands::{Cli, CommandExecutor, OutputFormat};
use anyhow::Result;
use clap::Parser;
use std::io::{self, BufRead, Write};

/// Interactive session holding one reasoner across commands
pub struct InteractiveSession {
    executor: CommandExecutor,
    format: OutputFormat,
}

impl InteractiveSession {
    pub fn new(executor: CommandExecutor, format: OutputFormat) -> Self {
        Self { executor, format }
    }

    /// Read commands from stdin until `quit` or end of input
    pub fn run(&mut self) -> Result<()> {
        println!("Orbweaver interactive mode");
        println!("Type 'help' for available commands, 'quit' to exit");
        println!("{}", "=".repeat(50));

        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        loop {
            print!("orbweaver> ");
            io::stdout().flush()?;

            let Some(line) = lines.next() else {
                break;
            };
            let line = line?;
            match line.trim() {
                "" => continue,
                "quit" | "exit" | "q" => break,
                "help" | "h" => show_help(),
                input => match self.execute_line(input) {
                    Ok(output) => println!("{}", output),
                    Err(e) => eprintln!("Error: {:#}", e),
                },
            }
        }

        Ok(())
    }

    /// Parse one shell-style line and run it
    pub fn execute_line(&mut self, input: &str) -> Result<String> {
        let mut args = vec!["orbweaver".to_string()];
        args.extend(shell_words::split(input)?);
        let cli = Cli::try_parse_from(args)?;

        let result = self.executor.execute(cli.command)?;
        let format = if cli.format == OutputFormat::Text { self.format } else { cli.format };
        result.render(format)
    }

    pub fn executor(&self) -> &CommandExecutor {
        &self.executor
    }
}

fn show_help() {
    println!("Available commands:");
    println!("  load <path>                     Load an ontology document");
    println!("  materialize [--derived]         Print the fact store");
    println!("  types <ind> [--direct]          Types of an individual");
    println!("  instances <class> [--direct]    Instances of a class");
    println!("  values <ind> <prop> [--inverse] Property values");
    println!("  same <ind> / different <ind>    Equality queries");
    println!("  consistent                      Consistency check");
    println!("  entailed <axiom-json>           Entailment check");
    println!("  add / remove <axiom-json>       Edit the loaded ontology");
    println!("  pending                         Show unflushed edits");
    println!("  flush                           Apply unflushed edits");
    println!("  info                            Reasoner information");
    println!("  quit                            Exit interactive mode");
    println!();
    println!("Use '<command> --help' for detailed help on each command");
}

/// Start interactive mode
pub fn start_interactive(executor: CommandExecutor, format: OutputFormat) -> Result<()> {
    InteractiveSession::new(executor, format).run()
}
