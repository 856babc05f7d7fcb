//! Value resolution: store lookup followed by `${NAME}` substitution.
//!
//! Substitution applies to scalar results only. Sequences are handed back as
//! stored, one element per setter call, and are never expanded.

use crate::env;
use crate::store::ConfigStore;
use crate::types::Resolved;

/// Environment lookup used for `${NAME}` substitution.
pub type EnvLookup = dyn Fn(&str) -> Option<String> + Send + Sync;

pub struct Resolver<'a> {
    store: &'a ConfigStore,
    env: &'a EnvLookup,
}

impl<'a> Resolver<'a> {
    pub fn new(store: &'a ConfigStore, env: &'a EnvLookup) -> Self {
        Self { store, env }
    }

    pub fn resolve(&self, section: &str, key: &str) -> Resolved {
        match self.store.lookup(section, key) {
            Resolved::Scalar(raw) => Resolved::Scalar(env::expand(&raw, self.env)),
            other => other,
        }
    }
}
