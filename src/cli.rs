//! The chatmark command-line interface.
//!
//! This module uses the `clap` crate with its "derive" feature to create a
//! declarative and type-safe argument parsing structure, and dispatches to
//! the library entry points.

use std::io::Read;
use std::net::SocketAddr;

use clap::{Parser, Subcommand};
use miette::IntoDiagnostic;

use crate::server;
use crate::tokenizer::tokenize;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "chatmark",
    version,
    about = "Normalizes bridged chat markup (Discord, KHL, QQ) into a typed AST and back."
)]
pub struct ChatmarkArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// An enumeration of all available CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP listener that parses message bodies into AST JSON.
    Serve {
        /// Address to bind.
        #[arg(long, default_value = "127.0.0.1:3000")]
        addr: SocketAddr,
    },
    /// Parse a message and print its AST as JSON.
    Parse {
        /// The message text; reads stdin when omitted.
        message: Option<String>,
    },
}

/// The main entry point for the CLI.
pub async fn run() -> miette::Result<()> {
    let args = ChatmarkArgs::parse();

    match args.command {
        Command::Serve { addr } => server::serve(addr).await.into_diagnostic()?,
        Command::Parse { message } => handle_parse(message)?,
    }

    Ok(())
}

fn handle_parse(message: Option<String>) -> miette::Result<()> {
    let text = match message {
        Some(text) => text,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .into_diagnostic()?;
            buffer
        }
    };

    let ast = tokenize(&text)?;
    let json = serde_json::to_string_pretty(&ast).into_diagnostic()?;
    println!("{json}");
    Ok(())
}
