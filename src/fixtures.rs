#[cfg(test)]
pub mod test {
    use std::path::PathBuf;

    use tempfile::TempDir;

    use crate::flag::{ListVar, Var};
    use crate::registry::FlagSet;

    /// A registry covering every addressing form, with handles to each flag.
    pub struct Sample {
        pub fset: FlagSet,
        pub key1: Var<String>,
        pub section_key1: Var<String>,
        pub arg: Var<String>,
        pub does_not_exist: Var<String>,
        pub key2: ListVar<String>,
        pub port: Var<u16>,
        pub verbose: Var<bool>,
    }

    pub fn sample() -> Sample {
        let mut fset = FlagSet::new("sample");
        let key1 = fset.scalar("key1", String::new(), "default-section key").unwrap();
        let section_key1 = fset
            .scalar("section:key1", String::new(), "sectioned key")
            .unwrap();
        let arg = fset.scalar("arg", String::new(), "argument only").unwrap();
        let does_not_exist = fset
            .scalar("doesNotExist", "default".to_string(), "never configured")
            .unwrap();
        let key2 = fset
            .list("key2[]", vec!["seed".to_string()], "list key")
            .unwrap();
        let port = fset.scalar("server:port", 8080_u16, "listen port").unwrap();
        let verbose = fset.scalar("verbose", false, "chatty output").unwrap();
        Sample {
            fset,
            key1,
            section_key1,
            arg,
            does_not_exist,
            key2,
            port,
            verbose,
        }
    }

    #[test]
    fn sample_has_defaults() {
        let s = sample();
        assert_eq!(s.fset.flags().len(), 7);
        assert_eq!(s.does_not_exist.get(), "default");
        assert_eq!(s.key2.render(), "[seed]");
        assert_eq!(s.port.get(), 8080);
        assert!(!s.verbose.get());
    }

    pub fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    pub fn argv(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// An empty environment.
    pub fn no_env(_name: &str) -> Option<String> {
        None
    }
}
