//! # Config Module Unit Tests / Config 模块单元测试
//!
//! Tests for option resolution: precedence between call-site options,
//! command-line flags, `MOCHA_*` variables and defaults, plus the config file.
//!
//! 选项解析的测试：调用选项、命令行标志、`MOCHA_*` 变量和默认值之间的优先级，以及配置文件。

use std::collections::HashMap;
use suite2md::config::{
    Configuration, OptionValue, ProjectConfig, ReporterOptions, TocStyle, resolve,
    split_report_path,
};

fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod precedence_tests {
    use super::*;

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = resolve(&ReporterOptions::default(), &[], &env(&[]));
        assert_eq!(config, Configuration::default());
        assert!(!config.quiet);
        assert_eq!(config.toc, TocStyle::Default);
        assert_eq!(config.path, "./docs/");
        assert_eq!(config.level, 1);
        assert_eq!(config.output_path(), None);
    }

    #[test]
    fn test_explicit_beats_environment() {
        let explicit = ReporterOptions {
            quiet: Some(OptionValue::Bool(true)),
            ..ReporterOptions::default()
        };
        let config = resolve(&explicit, &[], &env(&[("MOCHA_QUIET", "false")]));
        assert!(config.quiet);
    }

    #[test]
    fn test_environment_alone() {
        let config = resolve(
            &ReporterOptions::default(),
            &[],
            &env(&[
                ("MOCHA_TOC", "kramdown"),
                ("MOCHA_TITLE", "From Env"),
                ("MOCHA_LEVEL", "2"),
                ("MOCHA_QUIET", "true"),
            ]),
        );
        assert_eq!(config.toc, TocStyle::Kramdown);
        assert_eq!(config.title.as_deref(), Some("From Env"));
        assert_eq!(config.level, 2);
        assert!(config.quiet);
    }

    #[test]
    fn test_environment_boolean_needs_exact_true() {
        let config = resolve(&ReporterOptions::default(), &[], &env(&[("MOCHA_QUIET", "yes")]));
        assert!(!config.quiet);
    }

    #[test]
    fn test_flags_fill_only_unset_options() {
        let explicit = ReporterOptions {
            title: Some("Explicit".to_string()),
            ..ReporterOptions::default()
        };
        let argv = args(&["suite2md", "run", "--title", "Flag", "--toc", "none"]);
        let config = resolve(&explicit, &argv, &env(&[("MOCHA_TOC", "kramdown")]));
        assert_eq!(config.title.as_deref(), Some("Explicit"));
        assert_eq!(config.toc, TocStyle::None);
    }

    #[test]
    fn test_flags_accept_inline_values() {
        let argv = args(&["run", "--level=3", "-p", "out/report.md", "--quiet"]);
        let config = resolve(&ReporterOptions::default(), &argv, &env(&[]));
        assert_eq!(config.level, 3);
        assert_eq!(config.path, "out/");
        assert_eq!(config.filename.as_deref(), Some("report.md"));
        assert!(config.quiet);
    }

    #[test]
    fn test_title_flag_does_not_set_append() {
        let argv = args(&["run", "-t", "Only Title"]);
        let config = resolve(&ReporterOptions::default(), &argv, &env(&[]));
        assert_eq!(config.title.as_deref(), Some("Only Title"));
        assert_eq!(config.append, None);
    }

    #[test]
    fn test_short_flags_with_attached_values() {
        let argv = args(&["suite2md", "run", "-tHello", "-pout/r.md", "-a=bye", "-bhi"]);
        let config = resolve(&ReporterOptions::default(), &argv, &env(&[]));
        assert_eq!(config.title.as_deref(), Some("Hello"));
        assert_eq!(config.path, "out/");
        assert_eq!(config.filename.as_deref(), Some("r.md"));
        assert_eq!(config.append.as_deref(), Some("bye"));
        assert_eq!(config.prepend.as_deref(), Some("hi"));
    }

    #[test]
    fn test_prepend_and_append_short_flags() {
        let argv = args(&["run", "-b", "before", "-a", "after"]);
        let config = resolve(&ReporterOptions::default(), &argv, &env(&[]));
        assert_eq!(config.prepend.as_deref(), Some("before"));
        assert_eq!(config.append.as_deref(), Some("after"));
    }
}

#[cfg(test)]
mod normalization_tests {
    use super::*;

    #[test]
    fn test_unknown_toc_falls_back_to_default() {
        let explicit = ReporterOptions {
            toc: Some("sidebar".to_string()),
            ..ReporterOptions::default()
        };
        assert_eq!(resolve(&explicit, &[], &env(&[])).toc, TocStyle::Default);
    }

    #[test]
    fn test_level_parsing() {
        let level = |value: &str| {
            let explicit = ReporterOptions {
                level: Some(OptionValue::from(value)),
                ..ReporterOptions::default()
            };
            resolve(&explicit, &[], &env(&[])).level
        };
        assert_eq!(level("3rd"), 3);
        assert_eq!(level(" 2"), 2);
        assert_eq!(level("abc"), 1);
        assert_eq!(level("0"), 1);
        assert_eq!(level("-4"), 1);
    }

    #[test]
    fn test_native_level() {
        let explicit = ReporterOptions {
            level: Some(OptionValue::Int(4)),
            ..ReporterOptions::default()
        };
        assert_eq!(resolve(&explicit, &[], &env(&[])).level, 4);
    }

    #[test]
    fn test_string_booleans() {
        let quiet = |value: OptionValue| {
            let explicit = ReporterOptions {
                quiet: Some(value),
                ..ReporterOptions::default()
            };
            resolve(&explicit, &[], &env(&[])).quiet
        };
        assert!(quiet(OptionValue::from("true")));
        assert!(!quiet(OptionValue::from("false")));
        assert!(!quiet(OptionValue::from("1")));
        assert!(quiet(OptionValue::Bool(true)));
    }

    #[test]
    fn test_empty_strings_count_as_unset() {
        let explicit = ReporterOptions {
            title: Some(String::new()),
            filename: Some(String::new()),
            ..ReporterOptions::default()
        };
        let config = resolve(&explicit, &[], &env(&[("MOCHA_APPEND", "")]));
        assert_eq!(config.title, None);
        assert_eq!(config.filename, None);
        assert_eq!(config.append, None);
    }

    #[test]
    fn test_output_path_joins_path_and_filename() {
        let explicit = ReporterOptions {
            path: Some("site/".to_string()),
            filename: Some("tests.md".to_string()),
            ..ReporterOptions::default()
        };
        let config = resolve(&explicit, &[], &env(&[]));
        assert_eq!(
            config.output_path(),
            Some(std::path::PathBuf::from("site/tests.md"))
        );
    }

    #[test]
    fn test_split_report_path() {
        assert_eq!(
            split_report_path("docs/api/tests.md"),
            ("docs/api/".to_string(), "tests.md".to_string())
        );
        assert_eq!(
            split_report_path("tests.md"),
            (String::new(), "tests.md".to_string())
        );
    }
}

#[cfg(test)]
mod reporter_options_tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let options =
            ReporterOptions::parse_pairs("quiet=true,toc=kramdown,title=My Tests,level=2")
                .unwrap();
        assert_eq!(options.quiet, Some(OptionValue::from("true")));
        assert_eq!(options.toc.as_deref(), Some("kramdown"));
        assert_eq!(options.title.as_deref(), Some("My Tests"));
        assert_eq!(options.level, Some(OptionValue::from("2")));
    }

    #[test]
    fn test_parse_pairs_skips_unknown_keys() {
        let options = ReporterOptions::parse_pairs("colour=blue,filename=out.md").unwrap();
        assert_eq!(options.filename.as_deref(), Some("out.md"));
    }

    #[test]
    fn test_parse_pairs_rejects_missing_equals() {
        assert!(ReporterOptions::parse_pairs("quiet").is_err());
    }

    #[test]
    fn test_overlay_replaces_only_set_fields() {
        let base = ReporterOptions {
            title: Some("Base".to_string()),
            toc: Some("none".to_string()),
            ..ReporterOptions::default()
        };
        let top = ReporterOptions {
            title: Some("Top".to_string()),
            ..ReporterOptions::default()
        };
        let merged = base.overlay(top);
        assert_eq!(merged.title.as_deref(), Some("Top"));
        assert_eq!(merged.toc.as_deref(), Some("none"));
    }
}

#[cfg(test)]
mod project_config_tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_load_project_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("Suite2md.toml");
        fs::write(
            &path,
            r#"
language = "zh-CN"
dir = "specs"
timeout_ms = 2000
bail = true

[reporter_options]
quiet = true
level = 2
toc = "none"
"#,
        )
        .unwrap();

        let config = ProjectConfig::load(&path).unwrap();
        assert_eq!(config.language.as_deref(), Some("zh-CN"));
        assert_eq!(config.dir, Some(std::path::PathBuf::from("specs")));
        assert_eq!(config.timeout_ms, Some(2000));
        assert!(config.bail);
        assert_eq!(config.reporter_options.quiet, Some(OptionValue::Bool(true)));
        assert_eq!(config.reporter_options.level, Some(OptionValue::Int(2)));

        let resolved = resolve(&config.reporter_options, &[], &env(&[]));
        assert!(resolved.quiet);
        assert_eq!(resolved.level, 2);
        assert_eq!(resolved.toc, TocStyle::None);
    }

    #[test]
    fn test_unknown_reporter_option_in_file_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[reporter_options]\ncolour = \"blue\"\n").unwrap();
        assert!(ProjectConfig::load(&path).is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(ProjectConfig::load_or_default(Some(&missing)).is_err());
    }
}
