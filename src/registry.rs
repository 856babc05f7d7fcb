use std::sync::{Arc, RwLock};

use crate::accumulate::Scalar;
use crate::error::FlagfigError;
use crate::flag::{Flag, ListVar, Value, Var};

/// An explicitly constructed set of named flags.
///
/// Flags are visited in registration order. Names address config values (see
/// [`FlagPath`](crate::name::FlagPath)) and double as the `--long` argument
/// names.
#[derive(Debug, Default)]
pub struct FlagSet {
    name: String,
    flags: Vec<Flag>,
    args: Vec<String>,
}

impl FlagSet {
    /// `name` is used as the program name in argument errors and help.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register a single-valued flag.
    pub fn scalar<T>(&mut self, name: &str, default: T, usage: &str) -> Result<Var<T>, FlagfigError>
    where
        T: Scalar + Send + Sync + 'static,
    {
        let var = Var::new(default);
        self.register(name, usage, var.shared())?;
        Ok(var)
    }

    /// Register a list flag. Conventionally the name ends with the list
    /// marker (`"hosts[]"`).
    pub fn list<T>(
        &mut self,
        name: &str,
        defaults: Vec<T>,
        usage: &str,
    ) -> Result<ListVar<T>, FlagfigError>
    where
        T: Scalar + Send + Sync + 'static,
    {
        let var = ListVar::new(defaults);
        self.register(name, usage, var.shared())?;
        Ok(var)
    }

    /// Register a flag backed by a custom [`Value`]; the caller keeps its own
    /// handle to `value`.
    pub fn var<V: Value + 'static>(
        &mut self,
        name: &str,
        usage: &str,
        value: Arc<RwLock<V>>,
    ) -> Result<(), FlagfigError> {
        self.register(name, usage, value)
    }

    fn register(
        &mut self,
        name: &str,
        usage: &str,
        value: Arc<RwLock<dyn Value>>,
    ) -> Result<(), FlagfigError> {
        validate_name(name)?;
        if self.lookup(name).is_some() {
            return Err(FlagfigError::DuplicateFlag(name.to_string()));
        }
        self.flags.push(Flag::new(name, usage, value));
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.flags.iter().find(|f| f.name() == name)
    }

    pub fn flags(&self) -> &[Flag] {
        &self.flags
    }

    pub(crate) fn flags_mut(&mut self) -> &mut [Flag] {
        &mut self.flags
    }

    /// Positional arguments left over after the argument phase.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub(crate) fn set_args(&mut self, args: Vec<String>) {
        self.args = args;
    }

    /// Every flag as `(name, rendered value)`, in registration order.
    pub fn listing(&self) -> Vec<(String, String)> {
        self.flags
            .iter()
            .map(|f| (f.name().to_string(), f.render()))
            .collect()
    }
}

fn validate_name(name: &str) -> Result<(), FlagfigError> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name.starts_with('-') {
        "name must not start with '-'"
    } else if name.contains('=') {
        "name must not contain '='"
    } else if name.chars().any(char::is_whitespace) {
        "name must not contain whitespace"
    } else {
        return Ok(());
    };
    Err(FlagfigError::InvalidFlagName {
        name: name.to_string(),
        reason,
    })
}
