//! Repeated-value flags.
//!
//! [`Accumulator`] holds the values of a list flag. Every ordinary input
//! appends, so `--tag a --tag b` yields `[a; b]`. A fresh accumulator, or one
//! that just received [`Input::Reset`], is *pending reset*: the next value
//! throws away whatever was there (the compiled-in default, or the list a
//! previous source supplied) and starts a new list.
//!
//! The file-bind phase ends every config-supplied list with a reset, so a
//! list from a config file is replaced, not extended, by the command line.
//!
//! Element types plug in through the [`Scalar`] codec trait.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ParseError;
use crate::types::Input;

/// Text codec for one flag element.
pub trait Scalar: Sized {
    /// Human-readable type name used in parse errors.
    const KIND: &'static str;

    /// Boolean flags may appear on the command line without a value.
    const IS_BOOL: bool = false;

    fn parse_scalar(raw: &str) -> Result<Self, String>;

    fn format_scalar(&self) -> String;
}

impl Scalar for String {
    const KIND: &'static str = "string";

    fn parse_scalar(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn format_scalar(&self) -> String {
        self.clone()
    }
}

impl Scalar for PathBuf {
    const KIND: &'static str = "path";

    fn parse_scalar(raw: &str) -> Result<Self, String> {
        Ok(PathBuf::from(raw))
    }

    fn format_scalar(&self) -> String {
        self.display().to_string()
    }
}

impl Scalar for bool {
    const KIND: &'static str = "boolean";
    const IS_BOOL: bool = true;

    fn parse_scalar(raw: &str) -> Result<Self, String> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err("expected true or false".into()),
        }
    }

    fn format_scalar(&self) -> String {
        self.to_string()
    }
}

impl Scalar for Duration {
    const KIND: &'static str = "duration";

    fn parse_scalar(raw: &str) -> Result<Self, String> {
        humantime::parse_duration(raw).map_err(|e| e.to_string())
    }

    fn format_scalar(&self) -> String {
        humantime::format_duration(*self).to_string()
    }
}

macro_rules! from_str_scalar {
    ($kind:literal => $($ty:ty),+ $(,)?) => {
        $(
            impl Scalar for $ty {
                const KIND: &'static str = $kind;

                fn parse_scalar(raw: &str) -> Result<Self, String> {
                    raw.parse::<$ty>().map_err(|e| e.to_string())
                }

                fn format_scalar(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

from_str_scalar!("integer" => i8, i16, i32, i64, i128, isize);
from_str_scalar!("unsigned integer" => u8, u16, u32, u64, u128, usize);
from_str_scalar!("float" => f32, f64);

/// Parse `raw` as `T`, wrapping failures with the type and offending text.
pub fn parse<T: Scalar>(raw: &str) -> Result<T, ParseError> {
    T::parse_scalar(raw).map_err(|reason| ParseError::new(T::KIND, raw, reason))
}

/// A list of `T` with accumulate/reset semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator<T> {
    values: Vec<T>,
    pending_reset: bool,
}

impl<T> Default for Accumulator<T> {
    fn default() -> Self {
        Self {
            values: Vec::new(),
            pending_reset: true,
        }
    }
}

impl<T: Scalar> Accumulator<T> {
    /// The initial values stay visible until the first input replaces them.
    pub fn new(initial: Vec<T>) -> Self {
        Self {
            values: initial,
            pending_reset: true,
        }
    }

    /// On a parse failure both the list and the pending-reset state are kept.
    pub fn accept(&mut self, input: Input<'_>) -> Result<(), ParseError> {
        let raw = match input {
            Input::Reset => {
                self.pending_reset = true;
                return Ok(());
            }
            Input::Value(raw) => raw,
        };

        let value = parse::<T>(raw)?;
        if self.pending_reset {
            self.values.clear();
            self.pending_reset = false;
        }
        self.values.push(value);
        Ok(())
    }

    /// `[]`, `[a]`, `[a; b; c]`.
    pub fn render(&self) -> String {
        let items: Vec<String> = self.values.iter().map(T::format_scalar).collect();
        format!("[{}]", items.join("; "))
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_pending_reset(&self) -> bool {
        self.pending_reset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn feed<T: Scalar>(acc: &mut Accumulator<T>, items: &[&str]) {
        for item in items {
            acc.accept(Input::Value(item)).unwrap();
        }
    }

    #[test]
    fn first_value_discards_seed() {
        let mut acc = Accumulator::new(strings(&["a", "b", "c"]));
        feed(&mut acc, &["x", "y", "z"]);
        assert_eq!(acc.values(), strings(&["x", "y", "z"]).as_slice());
    }

    #[test]
    fn reset_starts_new_list() {
        let mut acc = Accumulator::<String>::default();
        feed(&mut acc, &["a", "b", "c"]);
        acc.accept(Input::Reset).unwrap();
        feed(&mut acc, &["x", "y", "z"]);
        assert_eq!(acc.values(), strings(&["x", "y", "z"]).as_slice());
    }

    #[test]
    fn values_accumulate_without_reset() {
        let mut acc = Accumulator::<String>::default();
        feed(&mut acc, &["a", "b"]);
        feed(&mut acc, &["c"]);
        assert_eq!(acc.values(), strings(&["a", "b", "c"]).as_slice());
    }

    #[test]
    fn reset_alone_keeps_values() {
        let mut acc = Accumulator::<String>::default();
        feed(&mut acc, &["a"]);
        acc.accept(Input::Reset).unwrap();
        assert_eq!(acc.values(), strings(&["a"]).as_slice());
        assert!(acc.is_pending_reset());
    }

    #[test]
    fn seed_visible_until_first_value() {
        let acc = Accumulator::new(vec![1_i64, 2, 3]);
        assert_eq!(acc.values(), &[1, 2, 3]);
        assert!(acc.is_pending_reset());
    }

    #[test]
    fn render_forms() {
        let mut acc = Accumulator::<String>::default();
        assert_eq!(acc.render(), "[]");
        feed(&mut acc, &["a"]);
        assert_eq!(acc.render(), "[a]");
        feed(&mut acc, &["b", "c"]);
        assert_eq!(acc.render(), "[a; b; c]");
    }

    #[test]
    fn parse_failure_leaves_state_untouched() {
        let mut acc = Accumulator::new(vec![1_i32, 2]);
        let err = acc.accept(Input::Value("two")).unwrap_err();
        assert_eq!(err.kind, "integer");
        assert_eq!(err.raw, "two");
        assert_eq!(acc.values(), &[1, 2]);
        assert!(acc.is_pending_reset());

        acc.accept(Input::Value("7")).unwrap();
        assert_eq!(acc.values(), &[7]);
        assert!(acc.accept(Input::Value("x")).is_err());
        assert_eq!(acc.values(), &[7]);
    }

    #[test]
    fn typed_lists() {
        let mut floats = Accumulator::<f64>::default();
        feed(&mut floats, &["1.5", "-2"]);
        assert_eq!(floats.values(), &[1.5, -2.0]);

        let mut bools = Accumulator::<bool>::default();
        feed(&mut bools, &["true", "F", "1"]);
        assert_eq!(bools.values(), &[true, false, true]);
        assert_eq!(bools.render(), "[true; false; true]");

        let mut unsigned = Accumulator::<u16>::default();
        assert!(unsigned.accept(Input::Value("-1")).is_err());
    }

    #[test]
    fn duration_list() {
        let mut acc = Accumulator::<Duration>::default();
        feed(&mut acc, &["1h 5m", "30s"]);
        assert_eq!(
            acc.values(),
            &[Duration::from_secs(3900), Duration::from_secs(30)]
        );
        assert_eq!(acc.render(), "[1h 5m; 30s]");
    }

    #[test]
    fn bool_spellings() {
        for raw in ["1", "t", "T", "TRUE", "true", "True"] {
            assert!(parse::<bool>(raw).unwrap(), "{raw}");
        }
        for raw in ["0", "f", "F", "FALSE", "false", "False"] {
            assert!(!parse::<bool>(raw).unwrap(), "{raw}");
        }
        assert!(parse::<bool>("yes").is_err());
    }

    #[test]
    fn parse_error_names_kind() {
        let err = parse::<Duration>("soon").unwrap_err();
        assert_eq!(err.kind, "duration");
        assert!(err.to_string().contains("soon"));
    }
}
