use clap::Parser;

use super::*;

#[test]
fn serve_with_port() {
	let cli = Cli::try_parse_from(["beacon", "serve", "--port", "5000"]).unwrap();
	assert_eq!(cli.command, Command::Serve { port: Some(5000) });
	assert_eq!(cli.command.port(), Some(5000));
	assert!(!cli.verbose);
	assert!(cli.config.is_none());
}

#[test]
fn listen_without_port_defers_to_config() {
	let cli = Cli::try_parse_from(["beacon", "listen"]).unwrap();
	assert_eq!(cli.command.port(), None);
}

#[test]
fn global_flags_are_accepted_after_subcommand() {
	let cli = Cli::try_parse_from(["beacon", "listen", "-v", "--config", "/tmp/beacon.toml"]).unwrap();
	assert!(cli.verbose);
	assert_eq!(cli.config, Some(PathBuf::from("/tmp/beacon.toml")));
}

#[test]
fn subcommand_is_required() {
	assert!(Cli::try_parse_from(["beacon"]).is_err());
}

#[test]
fn port_must_fit_u16() {
	assert!(Cli::try_parse_from(["beacon", "serve", "--port", "70000"]).is_err());
}
