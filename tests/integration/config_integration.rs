//! Layered configuration: workspace file, environment, and explicit files.

use super::test_utils::{with_env, Fixture};
use chkdigest::config::{ConfigLoader, WORKSPACE_CONFIG_FILE};
use chkdigest::pipeline::hasher::HashAlgorithm;
use chkdigest::pipeline::pool::Strategy;
use chkdigest::pipeline::FailurePolicy;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_defaults_without_any_source() {
    let fx = Fixture::new();
    let config = with_env(&fx.dir, &[], || ConfigLoader::load(fx.root())).unwrap();
    assert_eq!(config.checklist.path, PathBuf::from("checklist.chk"));
    assert_eq!(config.pipeline.parallelism, 4);
    assert_eq!(config.pipeline.algorithm, HashAlgorithm::Md5);
    assert_eq!(config.pipeline.on_error, FailurePolicy::Abort);
    assert_eq!(config.logging.level, "warn");
}

#[test]
fn test_global_then_workspace_then_env() {
    let fx = Fixture::new();
    let global_dir = fx.root().join("xdg").join("chkdigest");
    fs::create_dir_all(&global_dir).unwrap();
    fs::write(
        global_dir.join("config.toml"),
        "[pipeline]\nparallelism = 2\nstrategy = \"queue\"\n",
    )
    .unwrap();
    fs::write(
        fx.root().join(WORKSPACE_CONFIG_FILE),
        "[pipeline]\nparallelism = 6\n\n[checklist]\npath = \"sums.chk\"\n",
    )
    .unwrap();

    let config = with_env(&fx.dir, &[("CHKDIGEST_PIPELINE__ON_ERROR", "report")], || {
        ConfigLoader::load(fx.root())
    })
    .unwrap();

    assert_eq!(config.pipeline.strategy, Strategy::Queue);
    assert_eq!(config.pipeline.parallelism, 6);
    assert_eq!(config.pipeline.on_error, FailurePolicy::Report);
    assert_eq!(config.checklist.path, PathBuf::from("sums.chk"));
}

#[test]
fn test_env_overrides_workspace_file() {
    let fx = Fixture::new();
    fs::write(
        fx.root().join(WORKSPACE_CONFIG_FILE),
        "[pipeline]\nalgorithm = \"blake3\"\nparallelism = 3\n",
    )
    .unwrap();

    let config = with_env(&fx.dir, &[("CHKDIGEST_PIPELINE__PARALLELISM", "9")], || {
        ConfigLoader::load(fx.root())
    })
    .unwrap();
    assert_eq!(config.pipeline.parallelism, 9);
    assert_eq!(config.pipeline.algorithm, HashAlgorithm::Blake3);
}

#[test]
fn test_explicit_file_must_exist() {
    let fx = Fixture::new();
    let missing = fx.root().join("nope.toml");
    let result = with_env(&fx.dir, &[], || ConfigLoader::load_from_file(&missing));
    assert!(result.is_err());
}

#[test]
fn test_explicit_file_skips_workspace_file() {
    let fx = Fixture::new();
    fs::write(
        fx.root().join(WORKSPACE_CONFIG_FILE),
        "[pipeline]\nparallelism = 6\n",
    )
    .unwrap();
    let explicit = fx.root().join("explicit.toml");
    fs::write(&explicit, "[logging]\nlevel = \"info\"\n").unwrap();

    let config = with_env(&fx.dir, &[], || ConfigLoader::load_from_file(&explicit)).unwrap();
    assert_eq!(config.pipeline.parallelism, 4);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_invalid_values_fail_validation() {
    let fx = Fixture::new();
    fs::write(
        fx.root().join(WORKSPACE_CONFIG_FILE),
        "[pipeline]\nparallelism = 0\n\n[logging]\nlevel = \"loud\"\n",
    )
    .unwrap();

    let config = with_env(&fx.dir, &[], || ConfigLoader::load(fx.root())).unwrap();
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
}
