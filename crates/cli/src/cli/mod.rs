//! CLI schema for the beacon binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "beacon")]
#[command(about = "Local toast notifications over a loopback bus")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Config file (defaults to $BEACON_CONFIG, then the platform config directory)
	#[arg(long, short = 'c', value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	/// Verbose logging
	#[arg(long, short, global = true)]
	pub verbose: bool,

	/// Subcommand to execute.
	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
	/// Run the bus and publish `ok <message>` / `fail <message>` lines read from stdin
	Serve {
		/// Port to listen on (127.0.0.1 only)
		#[arg(long, short)]
		port: Option<u16>,
	},
	/// Subscribe to the bus and show toasts in this terminal
	Listen {
		/// Port of the bus to connect to
		#[arg(long, short)]
		port: Option<u16>,
	},
}

impl Command {
	/// Port given on the command line, if any.
	pub fn port(&self) -> Option<u16> {
		match self {
			Self::Serve { port } | Self::Listen { port } => *port,
		}
	}
}

#[cfg(test)]
mod tests;
