use anyhow::Result;
use sentinel_packs::utils::error::{PackError, format_error};
use sentinel_packs::{cli, run};

fn main() {
    // Determine verbose mode early for error formatting before config is parsed
    let verbose = std::env::args().any(|arg| arg == "-v" || arg == "-vv" || arg == "-vvv");

    if let Err(e) = run_main() {
        display_error(&e, verbose);
        std::process::exit(1);
    }
}

/// Display an error with contextual formatting.
///
/// Tries to downcast to `PackError` for rich formatting, falls back to
/// anyhow's error chain display for other errors.
fn display_error(error: &anyhow::Error, verbose: bool) {
    if let Some(pack_error) = error.downcast_ref::<PackError>() {
        eprintln!("{}", format_error(pack_error, verbose));
        if verbose {
            eprintln!("Context: {:#}", error);
        }
    } else {
        eprintln!("\n\u{26a0} Error: {}", error);

        let causes: Vec<_> = error.chain().skip(1).collect();
        if !causes.is_empty() {
            eprintln!("\nCaused by:");
            for (i, cause) in causes.iter().enumerate() {
                let prefix = if i == causes.len() - 1 {
                    "\u{2514}\u{2500}"
                } else {
                    "\u{251c}\u{2500}"
                };
                eprintln!("{} {}", prefix, cause);
            }
        }

        if verbose {
            let backtrace = error.backtrace();
            if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
                eprintln!("\nBacktrace:\n{}", backtrace);
            }
        }
    }
    eprintln!();
}

fn run_main() -> Result<()> {
    let args = cli::args::parse();

    // Logging first so config discovery can report what it loads
    sentinel_packs::init_logging(args.verbose, args.quiet);

    let config = cli::config::load(&args)?;
    let merged_config = cli::config::merge_config(&args, config)?;

    run(merged_config)?;
    Ok(())
}
