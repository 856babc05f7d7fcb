use std::ffi::OsString;
use std::path::Path;

use tracing::{debug, trace, warn};

use crate::cli;
use crate::env;
use crate::error::FlagfigError;
use crate::flag::Flag;
use crate::name::FlagPath;
use crate::registry::FlagSet;
use crate::resolve::{EnvLookup, Resolver};
use crate::source::{FileSource, Source};
use crate::store::ConfigStore;
use crate::types::{Binding, Input, Resolved, Sections};

/// Binds a [`FlagSet`] from config files and then from command-line arguments.
///
/// Configure with the consuming setters, merge files with
/// [`load_files`](Self::load_files), then call [`bind`](Self::bind):
///
/// ```ignore
/// let mut flags = FlagSet::new("myapp");
/// let port = flags.scalar("server:port", 8080_u16, "listen port")?;
///
/// let mut flagfig = Flagfig::new(std::env::args_os().skip(1)).separator(".");
/// flagfig.load_files(["/etc/myapp.toml", "./myapp.toml"])?;
/// let report = flagfig.bind(&mut flags)?;
/// ```
pub struct Flagfig {
    args: Vec<OsString>,
    separator: String,
    list_marker: String,
    source: Box<dyn Source>,
    env: Box<EnvLookup>,
    store: ConfigStore,
}

/// Non-fatal problems met while binding config values.
///
/// A config value a flag rejects does not stop the bind: a rejected scalar
/// leaves the flag's previous value, a list keeps the elements accepted before
/// the bad one, and the error is collected here.
#[derive(Debug, Default)]
pub struct BindReport {
    pub errors: Vec<FlagfigError>,
}

impl BindReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Flagfig {
    /// `args` are the command-line tokens without the program name. Tokens
    /// that are not valid UTF-8 are rejected by [`bind`](Self::bind).
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            separator: ":".to_string(),
            list_marker: "[]".to_string(),
            source: Box::new(FileSource::new()),
            env: Box::new(env::process_env),
            store: ConfigStore::new(),
        }
    }

    /// Separator between section and key in flag names (default: `":"`).
    /// An empty separator puts every flag in the default section.
    pub fn separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    /// Suffix marking a flag name as a list (default: `"[]"`).
    pub fn list_marker(mut self, marker: &str) -> Self {
        self.list_marker = marker.to_string();
        self
    }

    /// Replace the config file reader (default: [`FileSource`]).
    pub fn source(mut self, source: impl Source + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Replace the environment used for `${NAME}` substitution
    /// (default: the process environment).
    pub fn env_lookup<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Box::new(lookup);
        self
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Merge already-parsed sections on top of everything loaded so far.
    pub fn merge(&mut self, sections: Sections) {
        self.store.merge(sections);
    }

    /// Load and merge each file in order; later files win per key.
    ///
    /// Stops at the first file that cannot be read or parsed. Files merged
    /// before it stay merged.
    pub fn load_files<I, P>(&mut self, paths: I) -> Result<(), FlagfigError>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        for path in paths {
            let path = path.as_ref();
            let sections = self.source.load(path)?;
            debug!(path = %path.display(), sections = sections.len(), "merged config file");
            self.store.merge(sections);
        }
        Ok(())
    }

    /// Push config values and then command-line arguments into `fset`.
    ///
    /// Config values a flag rejects are collected in the returned report;
    /// any argument error is returned as `Err`.
    pub fn bind(&self, fset: &mut FlagSet) -> Result<BindReport, FlagfigError> {
        let resolver = Resolver::new(&self.store, &*self.env);
        let mut report = BindReport::default();

        for flag in fset.flags_mut() {
            if let Err(err) = self.bind_from_config(&resolver, flag) {
                warn!(flag = flag.name(), error = %err, "config value rejected");
                report.errors.push(err);
            }
        }

        cli::parse_args(fset, &self.args)?;
        Ok(report)
    }

    fn bind_from_config(&self, resolver: &Resolver<'_>, flag: &mut Flag) -> Result<(), FlagfigError> {
        let name = flag.name().to_string();
        let path = FlagPath::parse(&name, &self.separator, &self.list_marker);

        let items = match resolver.resolve(path.section, path.key) {
            Resolved::Missing => {
                trace!(flag = %name, "no config value");
                return Ok(());
            }
            Resolved::Scalar(raw) if !path.list => {
                flag.set(Input::Value(&raw))
                    .map_err(|source| invalid(&name, &raw, source))?;
                flag.advance(Binding::FileBound);
                debug!(flag = %name, "bound from config");
                return Ok(());
            }
            Resolved::Scalar(raw) => vec![raw],
            Resolved::Sequence(items) => items,
        };

        // A bad element stops the sequence, but the reset still goes through
        // so the command line replaces whatever was accepted.
        let mut accepted = 0;
        let mut outcome = Ok(());
        for raw in &items {
            if let Err(source) = flag.set(Input::Value(raw)) {
                outcome = Err(invalid(&name, raw, source));
                break;
            }
            accepted += 1;
        }
        let reset = flag
            .set(Input::Reset)
            .map_err(|source| invalid(&name, "", source));

        // An empty sequence leaves the default in place.
        if accepted > 0 {
            flag.advance(Binding::FileBound);
            debug!(flag = %name, count = accepted, "bound from config");
        }
        outcome.and(reset)
    }
}

fn invalid(flag: &str, value: &str, source: crate::error::ParseError) -> FlagfigError {
    FlagfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
        source,
    }
}
