//! Command dispatch through `RunContext`: exit status and rendered reports.

use super::test_utils::Fixture;
use chkdigest::cli::{Cli, Commands, ReportFormat, RunContext};
use chkdigest::pipeline::PipelineConfig;
use clap::Parser;

fn context(fx: &Fixture, format: ReportFormat) -> RunContext {
    RunContext::new(fx.config(PipelineConfig::default()), format, false)
}

#[test]
fn test_create_and_verify_succeed() {
    let fx = Fixture::new();
    fx.write("a", "hello");
    fx.write("b", "world");
    let ctx = context(&fx, ReportFormat::Text);
    let patterns = fx.pattern("*");

    let created = ctx
        .execute(&Commands::Create {
            patterns: patterns.clone(),
        })
        .unwrap();
    assert!(created.success);
    assert!(created.text.contains("wrote 2 entries"));

    let verified = ctx.execute(&Commands::Verify { patterns }).unwrap();
    assert!(verified.success);
    assert!(verified
        .text
        .contains(&format!("File {} is in good state", fx.key("a"))));
    assert!(verified.text.ends_with("Checklist OK"));
}

#[test]
fn test_mismatch_fails_run() {
    let fx = Fixture::new();
    fx.write("a", "hello");
    let ctx = context(&fx, ReportFormat::Text);
    let patterns = fx.pattern("*");
    ctx.execute(&Commands::Create {
        patterns: patterns.clone(),
    })
    .unwrap();

    fx.write("a", "hello!");
    let out = ctx.execute(&Commands::Verify { patterns }).unwrap();
    assert!(!out.success);
    assert!(out.text.contains(&format!(
        "File {} does not match the checklist",
        fx.key("a")
    )));
    assert!(out.text.contains("old: 5d41402abc4b2a76b9719d911017c592"));
    assert!(out.text.ends_with("Checklist FAILED"));
}

#[test]
fn test_zero_matches_succeeds() {
    let fx = Fixture::new();
    let ctx = context(&fx, ReportFormat::Text);
    let out = ctx
        .execute(&Commands::Verify {
            patterns: fx.pattern("*.missing"),
        })
        .unwrap();
    assert!(out.success);
    assert!(out.text.starts_with("0 matches"));
}

#[test]
fn test_verify_without_checklist_is_error() {
    let fx = Fixture::new();
    fx.write("a", "1");
    let ctx = context(&fx, ReportFormat::Text);
    let err = ctx
        .execute(&Commands::Verify {
            patterns: fx.pattern("*"),
        })
        .unwrap_err();
    let message = chkdigest::cli::map_error(&err);
    assert!(message.contains("chkdigest create"));
}

#[test]
fn test_json_report() {
    let fx = Fixture::new();
    fx.write("a", "1");
    fx.write("b", "2");
    let ctx = context(&fx, ReportFormat::Json);
    let patterns = fx.pattern("*");
    ctx.execute(&Commands::Create {
        patterns: patterns.clone(),
    })
    .unwrap();
    fx.remove("b");

    let out = ctx.execute(&Commands::Verify { patterns }).unwrap();
    assert!(!out.success);
    let report: serde_json::Value = serde_json::from_str(&out.text).unwrap();
    assert_eq!(report["mode"], "verify");
    assert_eq!(report["ok"], false);
    let entries = report["entries"].as_array().unwrap();
    let missing: Vec<_> = entries
        .iter()
        .filter(|e| e["status"] == "missing")
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0]["path"], fx.key("b"));
}

#[test]
fn test_problems_only_hides_good_entries() {
    let fx = Fixture::new();
    fx.write("a", "1");
    fx.write("b", "2");
    let mut config = fx.config(PipelineConfig::default());
    config.checklist.show_good = false;
    let ctx = RunContext::new(config, ReportFormat::Text, false);
    let patterns = fx.pattern("*");
    ctx.execute(&Commands::Create {
        patterns: patterns.clone(),
    })
    .unwrap();
    fx.write("b", "changed");

    let out = ctx.execute(&Commands::Verify { patterns }).unwrap();
    assert!(!out.text.contains("good state"));
    assert!(out.text.contains(&fx.key("b")));
}

#[test]
fn test_config_command_prints_toml() {
    let fx = Fixture::new();
    let ctx = context(&fx, ReportFormat::Text);
    let out = ctx.execute(&Commands::Config).unwrap();
    assert!(out.success);
    assert!(out.text.contains("[pipeline]"));
    assert!(out.text.contains("parallelism = 4"));
}

#[test]
fn test_cli_parses_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "chkdigest",
        "verify",
        "src/**/*.rs",
        "-j",
        "8",
        "--strategy",
        "queue",
        "--format",
        "json",
    ])
    .unwrap();
    assert_eq!(cli.jobs, Some(8));
    assert_eq!(cli.format, ReportFormat::Json);
    assert!(matches!(cli.command, Commands::Verify { ref patterns } if patterns == &["src/**/*.rs"]));
}

#[test]
fn test_create_requires_pattern() {
    assert!(Cli::try_parse_from(["chkdigest", "create"]).is_err());
}
