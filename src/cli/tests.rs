use clap::Parser;

use super::output::{progress_line, short_id};
use super::{Cli, OutputFormat};
use crate::core::analysis::Platform;
use crate::orchestrator::ProgressStatus;

#[test]
fn parses_one_shot_flags() {
    let cli = Cli::try_parse_from([
        "synsight",
        "--prompt",
        "Tesla",
        "-f",
        "json",
        "--platform",
        "x",
        "--quiet",
    ])
    .unwrap();
    assert_eq!(cli.prompt.as_deref(), Some("Tesla"));
    assert_eq!(cli.output_format, OutputFormat::Json);
    assert_eq!(cli.platform, Some(Platform::Twitter));
    assert!(cli.quiet);
}

#[test]
fn rejects_unknown_platform() {
    assert!(Cli::try_parse_from(["synsight", "--platform", "myspace"]).is_err());
}

#[test]
fn defaults_to_text_repl() {
    let cli = Cli::try_parse_from(["synsight"]).unwrap();
    assert!(cli.prompt.is_none());
    assert_eq!(cli.output_format, OutputFormat::Text);
}

#[test]
fn progress_line_labels_current_step() {
    let labels: Vec<String> = ["Fetching", "Scoring"].iter().map(|s| s.to_string()).collect();
    let status = ProgressStatus {
        analyzing: true,
        step: 2,
        total: 2,
    };
    assert_eq!(progress_line(&status, &labels).as_deref(), Some("[2/2] Scoring"));

    let idle = ProgressStatus {
        analyzing: false,
        step: 0,
        total: 2,
    };
    assert!(progress_line(&idle, &labels).is_none());
}

#[test]
fn short_id_handles_short_input() {
    assert_eq!(short_id("65f0c1a2b3c4d5e6f7a8b9c0"), "65f0c1a2");
    assert_eq!(short_id("s1"), "s1");
}
