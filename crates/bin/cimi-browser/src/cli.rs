//! Command-line interface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "cimi-browser",
    about = "Browse and edit the resources of a CIMI server",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (defaults to `cimi-browser.toml` when present).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base endpoint of the CIMI server, e.g. `http://localhost/cimi/`.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the browser as a web application
    Serve(ServeArgs),
    /// Render one resource and exit
    Show(ShowArgs),
    /// Browse interactively in the terminal
    Browse(BrowseArgs),
    /// Check a `$filter` expression and print its canonical form
    Filter(FilterArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to bind to.
    #[arg(long)]
    pub host: Option<String>,
    /// TCP port.
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// A page URL (`http://host/cimi/webui#MachineCollection`) or a bare
    /// reference (`MachineCollection`).
    pub location: String,
    /// Print the document as JSON instead of rendering it.
    #[arg(long)]
    pub json: bool,
    /// `$filter` expression applied to a collection.
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// Where to start; the entry point when omitted.
    pub location: Option<String>,
}

#[derive(Debug, Args)]
pub struct FilterArgs {
    /// The expression, e.g. `name='web' and cpu>2`.
    pub expression: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_accept_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "cimi-browser",
            "show",
            "MachineCollection",
            "--base-url",
            "http://x/cimi/",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert_eq!(cli.base_url.as_deref(), Some("http://x/cimi/"));
        let Command::Show(args) = cli.command else {
            panic!("expected show");
        };
        assert_eq!(args.location, "MachineCollection");
        assert!(!args.json);
    }

    #[test]
    fn should_make_browse_location_optional() {
        let cli = Cli::try_parse_from(["cimi-browser", "browse"]).unwrap();
        assert!(matches!(cli.command, Command::Browse(BrowseArgs { location: None })));
    }

    #[test]
    fn should_require_filter_expression() {
        assert!(Cli::try_parse_from(["cimi-browser", "filter"]).is_err());
    }
}
