//! Flag storage and the typed handles the program reads after binding.
//!
//! A registered flag owns its storage behind `Arc<RwLock<_>>`. The registry
//! keeps a type-erased [`Value`] view for binding; the program keeps a typed
//! [`Var`] or [`ListVar`] pointing at the same cell.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::accumulate::{self, Accumulator, Scalar};
use crate::error::ParseError;
use crate::types::{Binding, Input};

/// Anything a flag can store. Implement this for custom flag types and
/// register them with [`FlagSet::var`](crate::FlagSet::var).
pub trait Value: Send + Sync {
    /// Parse and store one input. List types append; scalar types replace.
    fn set(&mut self, input: Input<'_>) -> Result<(), ParseError>;

    /// Current value as text: plain for scalars, `[a; b]` for lists.
    fn render(&self) -> String;

    /// Boolean flags may be given on the command line without a value.
    fn is_bool(&self) -> bool {
        false
    }
}

pub(crate) fn read<V: ?Sized>(lock: &RwLock<V>) -> RwLockReadGuard<'_, V> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<V: ?Sized>(lock: &RwLock<V>) -> RwLockWriteGuard<'_, V> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Storage for a single-valued flag.
#[derive(Debug, Clone, PartialEq)]
pub struct Single<T> {
    value: T,
}

impl<T> Single<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    pub fn get(&self) -> &T {
        &self.value
    }
}

impl<T: Scalar + Send + Sync> Value for Single<T> {
    fn set(&mut self, input: Input<'_>) -> Result<(), ParseError> {
        if let Input::Value(raw) = input {
            self.value = accumulate::parse(raw)?;
        }
        Ok(())
    }

    fn render(&self) -> String {
        self.value.format_scalar()
    }

    fn is_bool(&self) -> bool {
        T::IS_BOOL
    }
}

impl<T: Scalar + Send + Sync> Value for Accumulator<T> {
    fn set(&mut self, input: Input<'_>) -> Result<(), ParseError> {
        self.accept(input)
    }

    fn render(&self) -> String {
        Accumulator::render(self)
    }
}

/// Handle to a single-valued flag.
pub struct Var<T> {
    cell: Arc<RwLock<Single<T>>>,
}

impl<T> Clone for Var<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Scalar + Send + Sync + 'static> Var<T> {
    pub(crate) fn new(default: T) -> Self {
        Self {
            cell: Arc::new(RwLock::new(Single::new(default))),
        }
    }

    pub(crate) fn shared(&self) -> Arc<RwLock<dyn Value>> {
        self.cell.clone()
    }
}

impl<T: Clone> Var<T> {
    pub fn get(&self) -> T {
        read(&self.cell).get().clone()
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Var<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Var").field(read(&self.cell).get()).finish()
    }
}

/// Handle to a list flag.
pub struct ListVar<T> {
    cell: Arc<RwLock<Accumulator<T>>>,
}

impl<T> Clone for ListVar<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T: Scalar + Send + Sync + 'static> ListVar<T> {
    pub(crate) fn new(defaults: Vec<T>) -> Self {
        Self {
            cell: Arc::new(RwLock::new(Accumulator::new(defaults))),
        }
    }

    pub(crate) fn shared(&self) -> Arc<RwLock<dyn Value>> {
        self.cell.clone()
    }

    pub fn render(&self) -> String {
        read(&self.cell).render()
    }

    pub fn len(&self) -> usize {
        read(&self.cell).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.cell).is_empty()
    }
}

impl<T: Scalar + Clone> ListVar<T> {
    pub fn get(&self) -> Vec<T> {
        read(&self.cell).values().to_vec()
    }
}

impl<T: Scalar + std::fmt::Debug> std::fmt::Debug for ListVar<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ListVar")
            .field(&read(&self.cell).values())
            .finish()
    }
}

/// One registered flag as the registry sees it.
pub struct Flag {
    name: String,
    usage: String,
    default: String,
    value: Arc<RwLock<dyn Value>>,
    binding: Binding,
}

impl Flag {
    pub(crate) fn new(name: &str, usage: &str, value: Arc<RwLock<dyn Value>>) -> Self {
        let default = read(&value).render();
        Self {
            name: name.to_string(),
            usage: usage.to_string(),
            default,
            value,
            binding: Binding::Unbound,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// The value as rendered at registration time.
    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn render(&self) -> String {
        read(&self.value).render()
    }

    pub fn is_bool(&self) -> bool {
        read(&self.value).is_bool()
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    pub(crate) fn set(&mut self, input: Input<'_>) -> Result<(), ParseError> {
        write(&self.value).set(input)
    }

    pub(crate) fn advance(&mut self, to: Binding) {
        self.binding = self.binding.max(to);
    }
}

impl std::fmt::Debug for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flag")
            .field("name", &self.name)
            .field("value", &self.render())
            .field("binding", &self.binding)
            .finish()
    }
}
