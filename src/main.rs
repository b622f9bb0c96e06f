use clap::Parser;
use crossterm::tty::IsTty;
use snapedit::config::{RcConfig, RcLoader};
use snapedit::editor::Editor;
use snapedit::session::{Session, SessionOptions};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Run an editing script against a document with snapshot undo/redo
#[derive(Parser, Debug)]
#[command(name = "snapedit", version)]
struct Args {
    /// Script to run; reads stdin when omitted or `-`
    script: Option<PathBuf>,

    /// Use this rc file instead of looking for .snapeditrc
    #[arg(long, value_name = "PATH")]
    rc: Option<PathBuf>,

    /// Number of commands kept for undo (0 keeps everything)
    #[arg(long, value_name = "N")]
    undo_levels: Option<usize>,

    /// Write each script line before running it
    #[arg(long)]
    echo: bool,

    /// Never style output
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print a sample rc file and exit
    #[arg(long)]
    sample_rc: bool,
}

fn init_logging(verbose: u8) {
    let default_filter = match verbose {
        0 => "snapedit=warn",
        1 => "snapedit=info",
        2 => "snapedit=debug",
        _ => "snapedit=trace",
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("SNAPEDIT_LOG")
                .unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn apply_overrides(config: &mut RcConfig, args: &Args) {
    if let Some(levels) = args.undo_levels {
        config.undo_levels = (levels > 0).then_some(levels);
    }
    if args.echo {
        config.echo = true;
    }
    if args.no_color {
        config.color = false;
    }
}

fn read_script(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path),
        _ => {
            let mut source = String::new();
            io::stdin().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.sample_rc {
        print!("{}", RcLoader::generate_sample_rc());
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = match &args.rc {
        Some(path) => RcLoader::load_from_path(path)?,
        None => RcLoader::load_config(),
    };
    apply_overrides(&mut config, &args);
    tracing::debug!(?config, "effective configuration");

    let source = read_script(args.script.as_deref())?;

    let stdout = io::stdout();
    let mut options = SessionOptions::from(&config);
    options.color &= stdout.is_tty();

    let editor = Editor::with_undo_levels(config.undo_levels);
    let mut session = Session::new(editor, stdout.lock(), options);

    if let Err(err) = session.run_source(&source) {
        eprintln!("snapedit: {err}");
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_cli_overrides_rc_values() {
        let args = Args::parse_from(["snapedit", "--undo-levels", "0", "--echo", "--no-color"]);
        let mut config = RcConfig::default();
        apply_overrides(&mut config, &args);

        assert_eq!(config.undo_levels, None);
        assert!(config.echo);
        assert!(!config.color);
    }

    #[test]
    fn test_no_flags_keep_rc_values() {
        let args = Args::parse_from(["snapedit", "script.txt"]);
        let mut config = RcConfig {
            undo_levels: Some(5),
            echo: true,
            ..RcConfig::default()
        };
        apply_overrides(&mut config, &args);

        assert_eq!(config.undo_levels, Some(5));
        assert!(config.echo);
        assert_eq!(args.script, Some(PathBuf::from("script.txt")));
    }

    #[test]
    fn test_read_script_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "append hi\nprint\n").unwrap();

        let source = read_script(Some(file.path())).unwrap();
        assert_eq!(source, "append hi\nprint\n");
    }
}
