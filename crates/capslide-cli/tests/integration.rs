//! Integration tests for the capslide CLI
//!
//! These tests drive the command layer end to end:
//! subtitle file + template -> generated PPTX

use std::fs;

use capslide_cli::{generate_command, resolve_options, Cli};
use capslide_pptx::test_utils::sample_template;
use capslide_pptx::{Presentation, PptxError};
use clap::Parser;
use tempfile::TempDir;

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("sample.pptx"), sample_template()).unwrap();
    dir
}

fn cli(dir: &TempDir, args: &[&str]) -> Cli {
    let template = dir.path().join("sample.pptx");
    let mut argv = vec![
        "capslide".to_string(),
        "--template".to_string(),
        template.display().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_text_file_end_to_end() {
    let dir = setup();
    let input = dir.path().join("subtitles.txt");
    fs::write(&input, "Hello there.\n\nGeneral Kenobi!\n").unwrap();
    let output = dir.path().join("out.pptx");

    let cli = cli(
        &dir,
        &[
            input.to_str().unwrap(),
            "-n",
            "6",
            "-o",
            output.to_str().unwrap(),
            "--ignore-marks",
        ],
    );
    let options = resolve_options(&cli, dir.path()).unwrap();
    let generated = generate_command(&cli.input, options).unwrap();

    assert_eq!(generated.output, output);
    assert_eq!(generated.summary.slides, 2);
    assert_eq!(generated.summary.matched, 4);

    let saved = Presentation::open(&output).unwrap();
    assert_eq!(saved.slide_count(), 8);
    assert_eq!(
        saved.slides()[7].run_texts(),
        vec!["General Kenobi", "Caption: General Kenobi"]
    );
}

#[test]
fn test_json_file_with_last_slide_default() {
    let dir = setup();
    let input = dir.path().join("rows.json");
    fs::write(
        &input,
        r#"[{"A": "a1", "B": "b1", "C": "c1"}, {"A": "a2", "B": "b2", "C": "c2"}]"#,
    )
    .unwrap();
    let output = dir.path().join("rows.pptx");

    let cli = cli(&dir, &[input.to_str().unwrap(), "-o", output.to_str().unwrap()]);
    let options = resolve_options(&cli, dir.path()).unwrap();
    assert_eq!(options.template_slide, 0);

    let generated = generate_command(&cli.input, options).unwrap();
    assert_eq!(generated.summary.matched, 10);
    assert_eq!(generated.summary.slides, 2);
    assert_eq!(generated.summary.rows, 2);
}

#[test]
fn test_config_file_supplies_defaults() {
    let dir = setup();
    let input = dir.path().join("lines.txt");
    fs::write(&input, "only line\n").unwrap();
    let output = dir.path().join("from-config.pptx");
    fs::write(
        dir.path().join("capslide.toml"),
        format!(
            "[processor]\ntemplate = {:?}\noutput = {:?}\ntemplate_slide = 6\n",
            dir.path().join("sample.pptx").display().to_string(),
            output.display().to_string(),
        ),
    )
    .unwrap();

    let cli = Cli::try_parse_from(["capslide", input.to_str().unwrap()]).unwrap();
    let options = resolve_options(&cli, dir.path()).unwrap();
    assert_eq!(options.output, output);
    assert_eq!(options.template_slide, 6);

    let generated = generate_command(&cli.input, options).unwrap();
    assert_eq!(generated.summary.matched, 2);
    assert!(output.exists());
}

#[test]
fn test_missing_template_flag() {
    let dir = TempDir::new().unwrap();
    let cli = Cli::try_parse_from(["capslide", "subs.txt"]).unwrap();
    assert!(resolve_options(&cli, dir.path()).is_err());
}

#[test]
fn test_errors_keep_their_cause() {
    let dir = setup();
    let cli = cli(&dir, &["subs.srt", "-n", "1"]);
    let options = resolve_options(&cli, dir.path()).unwrap();

    let err = generate_command(&cli.input, options).unwrap_err();
    let cause = err.downcast_ref::<PptxError>().unwrap();
    assert!(matches!(cause, PptxError::SlideLayoutMismatch { .. }));
}

#[test]
fn test_unsupported_subtitle_file() {
    let dir = setup();
    let input = dir.path().join("subs.srt");
    fs::write(&input, "1\n00:00:01,000 --> 00:00:02,000\nhi\n").unwrap();
    let cli = cli(&dir, &[input.to_str().unwrap()]);
    let options = resolve_options(&cli, dir.path()).unwrap();

    let err = generate_command(&cli.input, options).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PptxError>(),
        Some(PptxError::UnsupportedFileType { .. })
    ));
}

#[test]
fn test_empty_placeholder_reports_itself() {
    let dir = setup();
    let cli = cli(&dir, &["subs.txt", "-p", ""]);

    let err = resolve_options(&cli, dir.path()).unwrap_err();
    let message = format!("{:#}", err);
    assert!(message.contains("placeholder name must not be empty"));
    assert!(!message.contains("--template"));
    assert!(matches!(
        err.downcast_ref::<PptxError>(),
        Some(PptxError::Config { .. })
    ));
}

#[test]
fn test_missing_template_hints_at_flag() {
    let dir = TempDir::new().unwrap();
    let cli = Cli::try_parse_from(["capslide", "subs.txt"]).unwrap();

    let err = resolve_options(&cli, dir.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("--template"));
}

#[test]
fn test_template_validation_context() {
    let dir = setup();
    let cli = cli(&dir, &["subs.txt", "-n", "99"]);
    let options = resolve_options(&cli, dir.path()).unwrap();

    let err = generate_command(&cli.input, options).unwrap_err();
    assert!(err.to_string().starts_with("Invalid template"));
    assert!(err.downcast_ref::<PptxError>().unwrap().is_template_error());
}
