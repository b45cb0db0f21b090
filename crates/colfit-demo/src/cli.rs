#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually to keep the binary lean. Supports environment
//! variable overrides via the `COLFIT_DEMO_*` prefix; explicit flags win.

use std::env;
use std::process;

use colfit::Rounding;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
colfit demo: a scripted table resize session

USAGE:
    colfit-demo [OPTIONS]

OPTIONS:
    --widths=W,W,...     Container widths to drag through (default: 364,420,454,300,120,800)
    --rounding=MODE      'fractional' (default) or 'exact'
    --indicator=N        Width of a visible scroll indicator, 0 for none (default: 0)
    --format=FORMAT      Output format: 'text' (default) or 'json'
    --log=FILTER         Log filter when RUST_LOG is unset (default: warn)
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    COLFIT_DEMO_WIDTHS        Override --widths
    COLFIT_DEMO_INDICATOR     Override --indicator
    COLFIT_DEMO_FORMAT        Override --format
    COLFIT_DEMO_LOG           Override --log
    COLFIT_ROUNDING           Default for --rounding
    COLFIT_DEBOUNCE_MS        Resizer debounce delay
    COLFIT_PADDING_BUFFER     Resizer padding buffer
    COLFIT_COMMIT_THRESHOLD   Resizer commit threshold";

/// How session rows are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl Format {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct Opts {
    /// Container widths visited in order after the initial layout.
    pub widths: Vec<f64>,
    /// Rounding override; `None` keeps the resizer's configured mode.
    pub rounding: Option<Rounding>,
    /// Visible indicator width (0 = no indicator).
    pub indicator: f64,
    pub format: Format,
    /// Fallback log filter.
    pub log: String,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            widths: vec![364.0, 420.0, 454.0, 300.0, 120.0, 800.0],
            rounding: None,
            indicator: 0.0,
            format: Format::Text,
            log: "warn".into(),
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse process arguments and environment, exiting on `--help`,
    /// `--version`, or invalid input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match parse_from(&args, |name| env::var(name).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("colfit-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }
}

/// Parse `args` (without the program name) with `lookup` for env overrides.
pub fn parse_from<F>(args: &[String], lookup: F) -> Result<Command, String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut opts = Opts::default();

    // Environment first; flags below override it.
    if let Some(val) = lookup("COLFIT_DEMO_WIDTHS")
        && let Ok(widths) = parse_widths(&val)
    {
        opts.widths = widths;
    }
    if let Some(val) = lookup("COLFIT_DEMO_INDICATOR")
        && let Ok(n) = val.trim().parse()
    {
        opts.indicator = n;
    }
    if let Some(val) = lookup("COLFIT_DEMO_FORMAT")
        && let Some(format) = Format::parse(&val)
    {
        opts.format = format;
    }
    if let Some(val) = lookup("COLFIT_DEMO_LOG") {
        opts.log = val;
    }

    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Command::Help),
            "--version" | "-V" => return Ok(Command::Version),
            other => {
                if let Some(val) = other.strip_prefix("--widths=") {
                    opts.widths = parse_widths(val)?;
                } else if let Some(val) = other.strip_prefix("--rounding=") {
                    let rounding = val
                        .parse::<Rounding>()
                        .map_err(|e| format!("Invalid --rounding value: {e}"))?;
                    opts.rounding = Some(rounding);
                } else if let Some(val) = other.strip_prefix("--indicator=") {
                    opts.indicator = match val.parse::<f64>() {
                        Ok(n) if n.is_finite() && n >= 0.0 => n,
                        _ => return Err(format!("Invalid --indicator value: {val}")),
                    };
                } else if let Some(val) = other.strip_prefix("--format=") {
                    opts.format = Format::parse(val)
                        .ok_or_else(|| format!("Invalid --format value: {val}"))?;
                } else if let Some(val) = other.strip_prefix("--log=") {
                    opts.log = val.to_string();
                } else {
                    return Err(format!("Unknown argument: {other}"));
                }
            }
        }
    }

    Ok(Command::Run(opts))
}

fn parse_widths(raw: &str) -> Result<Vec<f64>, String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<f64>()
                .ok()
                .filter(|width| width.is_finite())
                .ok_or_else(|| format!("Invalid width: {part}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    fn run(list: &[&str]) -> Opts {
        match parse_from(&args(list), |_| None) {
            Ok(Command::Run(opts)) => opts,
            other => panic!("{other:?}"),
        }
    }

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.widths.len(), 6);
        assert_eq!(opts.rounding, None);
        assert_eq!(opts.indicator, 0.0);
        assert_eq!(opts.format, Format::Text);
        assert_eq!(opts.log, "warn");
    }

    #[test]
    fn flags_are_parsed() {
        let opts = run(&[
            "--widths=100, 200.5,300",
            "--rounding=exact",
            "--indicator=15",
            "--format=json",
            "--log=colfit=debug",
        ]);
        assert_eq!(opts.widths, vec![100.0, 200.5, 300.0]);
        assert_eq!(opts.rounding, Some(Rounding::Exact));
        assert_eq!(opts.indicator, 15.0);
        assert_eq!(opts.format, Format::Json);
        assert_eq!(opts.log, "colfit=debug");
    }

    #[test]
    fn help_and_version_short_circuit() {
        assert_eq!(parse_from(&args(&["-h", "--bogus"]), |_| None), Ok(Command::Help));
        assert_eq!(parse_from(&args(&["--version"]), |_| None), Ok(Command::Version));
    }

    #[test]
    fn invalid_values_are_errors() {
        for bad in [
            "--widths=1,x",
            "--rounding=pixel",
            "--indicator=-3",
            "--format=yaml",
            "--frobnicate",
        ] {
            assert!(parse_from(&args(&[bad]), |_| None).is_err(), "{bad}");
        }
    }

    #[test]
    fn env_overrides_defaults_but_not_flags() {
        let lookup = |name: &str| match name {
            "COLFIT_DEMO_WIDTHS" => Some("500,600".to_string()),
            "COLFIT_DEMO_FORMAT" => Some("json".to_string()),
            _ => None,
        };
        let Ok(Command::Run(opts)) = parse_from(&args(&["--format=text"]), lookup) else {
            panic!("expected run");
        };
        assert_eq!(opts.widths, vec![500.0, 600.0]);
        assert_eq!(opts.format, Format::Text);
    }

    #[test]
    fn help_text_lists_every_flag() {
        for flag in ["--widths", "--rounding", "--indicator", "--format", "--log"] {
            assert!(HELP_TEXT.contains(flag), "{flag}");
        }
        assert!(!VERSION.is_empty());
    }
}
