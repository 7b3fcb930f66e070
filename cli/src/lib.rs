use anyhow::{Error, Result};
use clap::Parser;
use inv_ident::api::{init_logging, run_config, CancelToken};
use inv_ident::config::{Config, Sink, Source};
use inv_ident::consts::DEFAULT_FIELD;
use inv_ident::options::UnknownFields;
use log::{info, warn};
use std::ffi::OsString;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "inv-ident")]
#[command(
    about = "Invert identities: moves the identity to the object side of identifier relations and the user to the subject side"
)]
#[command(arg_required_else_help = true)]
struct Cli {
    /// Input file path
    #[clap(long, short, conflicts_with = "stdin", required_unless_present_any = ["stdin", "version"])]
    input: Option<PathBuf>,
    /// Read input from STDIN
    #[clap(long, action)]
    stdin: bool,
    /// Output file, created or truncated; defaults to STDOUT
    #[clap(long, short)]
    output: Option<PathBuf>,
    /// Name of the array field in the output document
    #[clap(long, default_value = DEFAULT_FIELD)]
    field: String,
    /// Keep relations with unknown fields instead of dropping them (unknown fields are discarded)
    #[clap(long, action, default_value = "false")]
    keep_unknown: bool,
    /// Print run statistics as JSON to STDERR
    #[clap(long, action, default_value = "false")]
    stats: bool,
    /// Verbose mode - sets the RUST_LOG level to info, defaults to warning level
    #[clap(long, short, action, default_value = "false")]
    verbose: bool,
    /// Debug mode - sets the RUST_LOG level to debug, defaults to warning level
    #[clap(long, action, default_value = "false")]
    debug: bool,
    /// Prints the version of the inv-ident binary
    #[clap(long, action, default_value = "false")]
    version: bool,
}

/// Parses the process arguments and runs. Ctrl-C and SIGTERM stop the run
/// between relations; a second signal exits immediately.
pub fn run() -> Result<()> {
    init_logging();
    let cmd = Cli::parse();
    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || {
        if handler_token.is_cancelled() {
            std::process::exit(130);
        }
        warn!("Received interrupt, closing output...");
        handler_token.cancel();
    })?;
    execute(cmd, cancel)
}

pub fn run_from_args<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    init_logging();
    let cmd = Cli::try_parse_from(args).map_err(Error::from)?;
    execute(cmd, CancelToken::new())
}

fn execute(cmd: Cli, cancel: CancelToken) -> Result<()> {
    // The RUST_LOG env var is set by `init_logging` if INV_IDENT_LOG is present.
    // CLI flags for verbosity take precedence. If nothing is set, we default to "warn".
    if cmd.debug {
        std::env::set_var("RUST_LOG", "debug");
    } else if cmd.verbose {
        std::env::set_var("RUST_LOG", "info");
    } else if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "warn");
    }
    let _ = env_logger::try_init();

    if cmd.version {
        println!(
            "inv-ident {} @ {}",
            env!("CARGO_PKG_VERSION"),
            env!("GIT_HASH")
        );
        return Ok(());
    }

    let config = config_from_cli(&cmd)?;
    let stats = run_config(&config, cancel)?;
    info!("Wrote {} relations to {}", stats.written, config.sink);
    if cmd.stats {
        eprintln!("{}", serde_json::to_string(&stats)?);
    }
    Ok(())
}

fn config_from_cli(cmd: &Cli) -> Result<Config> {
    let source = match (&cmd.input, cmd.stdin) {
        (_, true) => Source::Stdin,
        (Some(path), false) => Source::Path(path.clone()),
        (None, false) => return Err(anyhow::anyhow!("one of --input or --stdin is required")),
    };
    let sink = cmd
        .output
        .as_ref()
        .map(|p| Sink::Path(p.clone()))
        .unwrap_or(Sink::Stdout);
    let config = Config::builder()
        .source(source)
        .sink(sink)
        .field(cmd.field.clone())
        .unknown_fields(UnknownFields::from(cmd.keep_unknown))
        .build()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("inv-ident").chain(args.iter().copied()))
    }

    #[test]
    fn run_from_args_executes() {
        assert!(run_from_args(["inv-ident", "--version"]).is_ok());

        let dir = tempfile::tempdir().unwrap();
        let err = run_from_args([
            "inv-ident".into(),
            OsString::from("-i"),
            dir.path().as_os_str().to_owned(),
        ])
        .unwrap_err();
        assert!(err.to_string().ends_with("not found"));
    }

    #[test]
    fn input_and_stdin_conflict() {
        assert!(parse(&["-i", "in.json", "--stdin"]).is_err());
    }

    #[test]
    fn input_or_stdin_required() {
        assert!(parse(&["-o", "out.json"]).is_err());
        assert!(parse(&["--version"]).is_ok());
    }

    #[test]
    fn cli_maps_to_config() {
        let cmd = parse(&["-i", "in.json", "-o", "out.json", "--keep-unknown"]).unwrap();
        let config = config_from_cli(&cmd).unwrap();
        assert_eq!(config.source, Source::Path(PathBuf::from("in.json")));
        assert_eq!(config.sink, Sink::Path(PathBuf::from("out.json")));
        assert_eq!(config.field, "relations");
        assert_eq!(config.unknown_fields, UnknownFields::Ignore);

        let cmd = parse(&["--stdin", "--field", "objects"]).unwrap();
        let config = config_from_cli(&cmd).unwrap();
        assert_eq!(config.source, Source::Stdin);
        assert_eq!(config.sink, Sink::Stdout);
        assert_eq!(config.field, "objects");
        assert_eq!(config.unknown_fields, UnknownFields::Drop);
    }
}
