#![forbid(unsafe_code)]

//! colfit demo binary entry point.

use colfit::ResizerConfig;
use colfit_demo::cli::{self, Format};
use colfit_demo::session;
use tracing_subscriber::filter::EnvFilter;

fn main() {
    let opts = cli::Opts::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| match EnvFilter::try_new(&opts.log) {
            Ok(filter) => Ok(filter),
            Err(e) => {
                eprintln!("invalid log filter: {}, using warn, err is: {e}", opts.log);
                EnvFilter::try_new("warn")
            }
        })
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("failed to init logger: {e}");
    }

    let mut config = ResizerConfig::from_env();
    if let Some(rounding) = opts.rounding {
        config = config.with_rounding(rounding);
    }
    tracing::info!(?config, widths = ?opts.widths, "starting session");

    for row in session::run_script(&opts.widths, opts.indicator, config) {
        match opts.format {
            Format::Text => println!("{}", session::render_text(&row)),
            Format::Json => match serde_json::to_string(&row) {
                Ok(line) => println!("{line}"),
                Err(e) => {
                    eprintln!("failed to encode row: {e}");
                    std::process::exit(1);
                }
            },
        }
    }
}
