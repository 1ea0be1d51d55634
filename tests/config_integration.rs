use std::path::PathBuf;

use markwright::config::{ConfigFlags, EditorOptions, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".markwrightrc");
    let content = r#"
# comment
--no-auto-save

--debounce-ms 1200

--output=saved.md
"#;
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.no_auto_save);
    assert_eq!(flags.debounce_ms, Some(1200));
    assert_eq!(flags.output, Some(PathBuf::from("saved.md")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".markwrightrc");
    let content = "--no-auto-save\n--long-press-ms 800\n--output file.md\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "markwright".to_string(),
        "--long-press-ms".to_string(),
        "300".to_string(),
        "--perf".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.no_auto_save, "file flags should remain enabled");
    assert!(effective.perf, "cli flags should be applied");
    assert_eq!(effective.long_press_ms, Some(300), "cli should override long press");
    assert_eq!(
        effective.output,
        Some(PathBuf::from("file.md")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_missing_config_file_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let flags = load_config_flags(&dir.path().join("absent")).unwrap();
    assert_eq!(flags, ConfigFlags::default());
}

#[test]
fn test_effective_options_from_merged_flags() {
    let file = ConfigFlags {
        max_bytes: Some(4096),
        ..ConfigFlags::default()
    };
    let cli = parse_flag_tokens(&["--debounce-ms=250".to_string()]);
    let options = EditorOptions::from_flags(&file.union(&cli));
    assert!(options.auto_save);
    assert_eq!(options.debounce_ms, 250);
    assert_eq!(options.long_press_ms, 500);
    assert_eq!(options.max_bytes, 4096);
}
