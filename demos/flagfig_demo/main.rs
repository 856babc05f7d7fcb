//! Bind a few flags from config files and the command line, then show where
//! each value came from.
//!
//! ```text
//! FLAGFIG_DEMO_CONFIG=base.toml:local.toml \
//!     RUST_LOG=flagfig=debug \
//!     cargo run --example flagfig_demo -- --verbose --server:hosts[] a.example
//! ```

use std::process::ExitCode;
use std::time::Duration;

use flagfig::{FlagSet, Flagfig, FlagfigError};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(FlagfigError::Args(e)) => e.exit(),
        Err(e) => {
            eprintln!("flagfig_demo: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), FlagfigError> {
    let mut flags = FlagSet::new("flagfig_demo");
    let verbose = flags.scalar("verbose", false, "chatty output")?;
    let name = flags.scalar("name", "demo".to_string(), "instance name")?;
    let port = flags.scalar("server:port", 8080_u16, "listen port")?;
    let hosts = flags.list::<String>("server:hosts[]", vec!["localhost".into()], "upstream hosts")?;
    let timeout = flags.scalar("server:timeout", Duration::from_secs(30), "request timeout")?;

    let files: Vec<_> = std::env::var_os("FLAGFIG_DEMO_CONFIG")
        .map(|paths| std::env::split_paths(&paths).collect())
        .unwrap_or_default();

    let mut flagfig = Flagfig::new(std::env::args_os().skip(1));
    flagfig.load_files(&files)?;
    let report = flagfig.bind(&mut flags)?;
    for err in &report.errors {
        eprintln!("warning: {err}");
    }

    println!("{:<18} {:<28} SOURCE", "FLAG", "VALUE");
    for flag in flags.flags() {
        println!("{:<18} {:<28} {}", flag.name(), flag.render(), flag.binding());
    }
    if !flags.args().is_empty() {
        println!("\nargs: {:?}", flags.args());
    }

    if verbose.get() {
        println!(
            "\n{} listens on :{} for {} host(s), timeout {:?}",
            name.get(),
            port.get(),
            hosts.len(),
            timeout.get()
        );
        match serde_json::to_string_pretty(flagfig.store()) {
            Ok(dump) => println!("\nmerged config:\n{dump}"),
            Err(e) => eprintln!("cannot render config: {e}"),
        }
    }
    Ok(())
}
