//! Argument phase, built on [clap](https://docs.rs/clap).
//!
//! A `clap::Command` is generated from the registry on every bind: each flag
//! becomes a repeatable `--name` argument, booleans accept a bare `--name` or
//! `--name=<bool>`. Values reach the flags through the same setters the
//! file-bind phase uses, so list flags accumulate across repeated arguments.
//!
//! Parsing stops at the first positional token (or `--`); the rest is kept on
//! the registry as [`FlagSet::args`].

use std::ffi::OsString;

use clap::parser::ValueSource;
use clap::{Arg, ArgAction, Command};
use tracing::debug;

use crate::error::FlagfigError;
use crate::flag::Flag;
use crate::registry::FlagSet;
use crate::types::{Binding, Input};

/// Id of the trailing positional argument. Flag names never start with `-`.
const POSITIONAL: &str = "-args";

/// Build the `clap::Command` that parses arguments for `fset`.
pub fn command(fset: &FlagSet) -> Command {
    let mut cmd = Command::new(fset.name().to_string())
        .no_binary_name(true)
        .disable_help_flag(fset.lookup("help").is_some())
        .arg(
            Arg::new(POSITIONAL)
                .value_name("ARGS")
                .num_args(0..)
                .action(ArgAction::Append)
                .trailing_var_arg(true),
        );
    for flag in fset.flags() {
        cmd = cmd.arg(flag_arg(flag));
    }
    cmd
}

fn flag_arg(flag: &Flag) -> Arg {
    let help = if flag.usage().is_empty() {
        format!("[default: {}]", flag.default_value())
    } else {
        format!("{} [default: {}]", flag.usage(), flag.default_value())
    };
    let arg = Arg::new(flag.name().to_string())
        .long(flag.name().to_string())
        .help(help)
        .action(ArgAction::Append);

    if flag.is_bool() {
        arg.value_name("BOOL")
            .num_args(0..=1)
            .require_equals(true)
            .default_missing_value("true")
    } else {
        arg.value_name("VALUE")
            .num_args(1)
            .allow_hyphen_values(true)
    }
}

/// Parse `args` and push every explicitly given value into its flag.
///
/// Unknown flags, missing values, tokens that are not UTF-8 and setter
/// rejections abort the whole call.
pub fn parse_args<I, T>(fset: &mut FlagSet, args: I) -> Result<(), FlagfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command(fset).try_get_matches_from(args)?;

    for flag in fset.flags_mut() {
        if matches.value_source(flag.name()) != Some(ValueSource::CommandLine) {
            continue;
        }
        let values: Vec<String> = matches
            .get_many::<String>(flag.name())
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default();
        for raw in &values {
            flag.set(Input::Value(raw))
                .map_err(|source| FlagfigError::InvalidArgument {
                    flag: flag.name().to_string(),
                    value: raw.clone(),
                    source,
                })?;
        }
        flag.advance(Binding::ArgBound);
        debug!(flag = flag.name(), count = values.len(), "bound from arguments");
    }

    let rest = matches
        .get_many::<String>(POSITIONAL)
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default();
    fset.set_args(rest);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{argv, sample};
    use clap::error::ErrorKind;

    #[test]
    fn space_and_equals_forms() {
        let mut fset = FlagSet::new("test");
        let a = fset.scalar("arg", "default".to_string(), "").unwrap();
        let b = fset.scalar("section:key1", 0_i64, "").unwrap();
        parse_args(&mut fset, &argv(&["--arg", "value", "--section:key1=-7"])).unwrap();
        assert_eq!(a.get(), "value");
        assert_eq!(b.get(), -7);
        assert_eq!(fset.lookup("arg").unwrap().binding(), Binding::ArgBound);
    }

    #[test]
    fn bool_flag_forms() {
        let mut fset = FlagSet::new("test");
        let verbose = fset.scalar("verbose", false, "").unwrap();
        let color = fset.scalar("color", true, "").unwrap();
        parse_args(&mut fset, &argv(&["--verbose", "--color=false"])).unwrap();
        assert!(verbose.get());
        assert!(!color.get());
    }

    #[test]
    fn bool_flag_does_not_swallow_next_token() {
        let mut fset = FlagSet::new("test");
        let verbose = fset.scalar("verbose", false, "").unwrap();
        parse_args(&mut fset, &argv(&["--verbose", "file.txt"])).unwrap();
        assert!(verbose.get());
        assert_eq!(fset.args(), ["file.txt"]);
    }

    #[test]
    fn repeated_list_flag_accumulates_over_default() {
        let mut fset = FlagSet::new("test");
        let tags = fset
            .list("tag[]", vec!["default".to_string()], "")
            .unwrap();
        parse_args(&mut fset, &argv(&["--tag[]", "a", "--tag[]", "b", "--tag[]=c"])).unwrap();
        assert_eq!(tags.render(), "[a; b; c]");
    }

    #[test]
    fn repeated_scalar_flag_last_wins() {
        let mut fset = FlagSet::new("test");
        let port = fset.scalar("port", 1_u16, "").unwrap();
        parse_args(&mut fset, &argv(&["--port", "2", "--port", "3"])).unwrap();
        assert_eq!(port.get(), 3);
    }

    #[test]
    fn untouched_flags_stay_unbound() {
        let mut fset = FlagSet::new("test");
        let keep = fset.scalar("keep", "default".to_string(), "").unwrap();
        fset.scalar("other", 0_u8, "").unwrap();
        parse_args(&mut fset, &argv(&["--other", "1"])).unwrap();
        assert_eq!(keep.get(), "default");
        assert_eq!(fset.lookup("keep").unwrap().binding(), Binding::Unbound);
    }

    #[test]
    fn unknown_flag_is_an_error() {
        let mut fset = FlagSet::new("test");
        fset.scalar("known", 0_u8, "").unwrap();
        let err = parse_args(&mut fset, &argv(&["--unknown", "1"])).unwrap_err();
        assert!(matches!(err, FlagfigError::Args(e) if e.kind() == ErrorKind::UnknownArgument));
    }

    #[test]
    fn missing_value_is_an_error() {
        let mut fset = FlagSet::new("test");
        fset.scalar("name", String::new(), "").unwrap();
        let err = parse_args(&mut fset, &argv(&["--name"])).unwrap_err();
        assert!(matches!(err, FlagfigError::Args(_)));
    }

    #[test]
    fn malformed_value_is_an_error() {
        let mut fset = FlagSet::new("test");
        let port = fset.scalar("port", 8080_u16, "").unwrap();
        let err = parse_args(&mut fset, &argv(&["--port", "eighty"])).unwrap_err();
        assert!(matches!(
            err,
            FlagfigError::InvalidArgument { ref flag, ref value, .. } if flag == "port" && value == "eighty"
        ));
        assert_eq!(port.get(), 8080);
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_token_is_an_error() {
        use std::os::unix::ffi::OsStringExt;

        let mut fset = FlagSet::new("test");
        let name = fset.scalar("name", "keep".to_string(), "").unwrap();
        let bad = OsString::from_vec(vec![b'a', 0xff]);

        let err = parse_args(&mut fset, [OsString::from("--name"), bad.clone()]).unwrap_err();
        assert!(matches!(err, FlagfigError::Args(ref e) if e.kind() == ErrorKind::InvalidUtf8));
        assert_eq!(name.get(), "keep");

        let err = parse_args(&mut fset, [bad]).unwrap_err();
        assert!(matches!(err, FlagfigError::Args(ref e) if e.kind() == ErrorKind::InvalidUtf8));
    }

    #[test]
    fn double_dash_ends_flags() {
        let mut fset = FlagSet::new("test");
        let name = fset.scalar("name", String::new(), "").unwrap();
        parse_args(&mut fset, &argv(&["--name", "x", "--", "--name", "y"])).unwrap();
        assert_eq!(name.get(), "x");
        assert_eq!(fset.args(), ["--name", "y"]);
    }

    #[test]
    fn first_positional_ends_flags() {
        let mut fset = FlagSet::new("test");
        let name = fset.scalar("name", String::new(), "").unwrap();
        parse_args(&mut fset, &argv(&["input", "--name", "y"])).unwrap();
        assert_eq!(name.get(), "");
        assert_eq!(fset.args(), ["input", "--name", "y"]);
    }

    #[test]
    fn help_lists_flags_with_defaults() {
        let mut fset = FlagSet::new("demo");
        fset.scalar("section:port", 8080_u16, "listen port").unwrap();
        let help = command(&fset).render_help().to_string();
        assert!(help.contains("--section:port"));
        assert!(help.contains("listen port [default: 8080]"));
    }

    #[test]
    fn sample_registry_parses() {
        let mut s = sample();
        parse_args(
            &mut s.fset,
            &argv(&["--verbose", "--server:port=9000", "--key2[]", "-x"]),
        )
        .unwrap();
        assert!(s.verbose.get());
        assert_eq!(s.port.get(), 9000);
        assert_eq!(s.key2.get(), vec!["-x".to_string()]);
        assert!(s.fset.args().is_empty());
    }

    #[test]
    fn user_flag_named_help_replaces_builtin() {
        let mut fset = FlagSet::new("test");
        let help = fset.scalar("help", "none".to_string(), "").unwrap();
        parse_args(&mut fset, &argv(&["--help", "topics"])).unwrap();
        assert_eq!(help.get(), "topics");
    }
}
