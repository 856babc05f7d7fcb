//! Layered flag resolution for Rust applications. Register your flags, point
//! at your config files, and bind.
//!
//! Flagfig fills program flags from three layers: compiled-in defaults,
//! config files, and command-line arguments. Each flag is registered once
//! with a name, a default and a usage string; its name doubles as the config
//! address and the `--long` argument.
//!
//! ```ignore
//! let mut flags = FlagSet::new("myapp");
//! let port = flags.scalar("server:port", 8080_u16, "listen port")?;
//! let hosts = flags.list::<String>("server:hosts[]", vec![], "upstream hosts")?;
//!
//! let mut flagfig = Flagfig::new(std::env::args_os().skip(1));
//! flagfig.load_files(["/etc/myapp.toml", "./myapp.toml"])?;
//! flagfig.bind(&mut flags)?;
//!
//! serve(port.get(), hosts.get());
//! ```
//!
//! # Layer precedence
//!
//! ```text
//! Compiled defaults     FlagSet::scalar / FlagSet::list
//!        ↑ overridden by
//! Config files          load_files order, later files win per key
//!        ↑ overridden by
//! Command line          --name value, --name=value
//! ```
//!
//! Every layer is sparse. A flag no file mentions keeps its default; a flag
//! the command line does not mention keeps what the files gave it.
//!
//! # Addressing
//!
//! A flag name is split at the first separator (default `:`) into a section
//! and a key:
//!
//! | Flag name | Section | Key |
//! |-----------|---------|-----|
//! | `verbose` | (default) | `verbose` |
//! | `server:port` | `server` | `port` |
//! | `server:tls:cert` | `server` | `tls:cert` |
//! | `server:hosts[]` | `server` | `hosts` (list) |
//!
//! In TOML, top-level keys live in the default section and each table is a
//! section. Nested tables are flattened to dotted keys, so `[server.tls]`
//! `cert = ".."` is addressed by a flag named `server:tls.cert`. JSON files
//! (by `.json` extension) follow the same mapping.
//!
//! # Lists
//!
//! A list flag appends on every value: `--host a --host b` yields `[a; b]`.
//! The first value a source supplies replaces the default, and a list coming
//! from a config file is replaced, not extended, by the command line. See
//! [`Accumulator`].
//!
//! # Environment references
//!
//! Scalar config values may reference environment variables as `${NAME}`.
//! They are expanded when bound, unset variables expanding to nothing. List
//! elements are bound verbatim. Tests can swap the environment out with
//! [`Flagfig::env_lookup`].
//!
//! # Errors
//!
//! All fallible operations return [`FlagfigError`]. Loading stops at the
//! first unreadable or malformed file. During a bind, a config value a flag
//! rejects is logged and collected in the [`BindReport`] while the other
//! flags carry on; any argument error aborts the bind.
//!
//! # Logging
//!
//! The crate emits [`tracing`](https://docs.rs/tracing) events (`debug` per
//! merged file and bound flag, `warn` per rejected config value) and never
//! installs a subscriber.

pub mod error;
pub mod types;

mod accumulate;
mod bind;
mod cli;
mod env;
mod flag;
mod name;
mod registry;
mod resolve;
mod source;
mod store;

#[cfg(test)]
mod fixtures;

use std::path::Path;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

pub use accumulate::{Accumulator, Scalar};
pub use bind::{BindReport, Flagfig};
pub use cli::command;
pub use error::{FlagfigError, ParseError};
pub use flag::{Flag, ListVar, Single, Value, Var};
pub use name::{FlagPath, split_name};
pub use registry::FlagSet;
pub use source::{FileSource, Format, Source};
pub use store::ConfigStore;
pub use types::{Binding, Entry, Input, Resolved, Sections};

static COMMAND_LINE: LazyLock<Mutex<FlagSet>> =
    LazyLock::new(|| Mutex::new(FlagSet::new(&program_name())));

fn program_name() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_default()
}

/// The process-wide default registry used by [`parse`].
///
/// Hold the guard only while registering; [`parse`] locks it again.
pub fn command_line() -> MutexGuard<'static, FlagSet> {
    COMMAND_LINE.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Load `files`, then bind [`command_line`] against the process arguments.
pub fn parse<I, P>(files: I) -> Result<BindReport, FlagfigError>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut flagfig = Flagfig::new(std::env::args_os().skip(1));
    flagfig.load_files(files)?;
    flagfig.bind(&mut command_line())
}
