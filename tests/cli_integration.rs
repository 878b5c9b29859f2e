//! CLI tests over a temporary copy of the fixtures.

use std::fs;
use std::path::{Path, PathBuf};

use jakartacheck::cli::{
    run_actions, run_fix, run_init, run_lint, ActionsArgs, FixArgs, InitArgs, LintArgs,
    EXIT_ERROR, EXIT_FAILED, EXIT_SUCCESS,
};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join("jakarta")
}

/// Copy the fixtures into `dir/src/main/java`, plus an empty config.
fn setup_project(dir: &Path) -> PathBuf {
    let sources = dir.join("src").join("main").join("java");
    fs::create_dir_all(&sources).unwrap();
    for entry in fs::read_dir(testdata_path()).unwrap() {
        let path = entry.unwrap().path();
        fs::copy(&path, sources.join(path.file_name().unwrap())).unwrap();
    }
    let config = dir.join("jakartacheck.yaml");
    fs::write(&config, "version: \"1\"\n").unwrap();
    config
}

fn lint_args(path: &Path, config: &Path, format: &str) -> LintArgs {
    LintArgs {
        path: path.to_path_buf(),
        config: Some(config.to_path_buf()),
        format: format.to_string(),
    }
}

#[test]
fn test_lint_fails_on_fixtures() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_project(dir.path());
    for format in ["pretty", "json", "sarif"] {
        let code = run_lint(&lint_args(dir.path(), &config, format)).unwrap();
        assert_eq!(code, EXIT_FAILED, "format {}", format);
    }
}

#[test]
fn test_lint_rejects_bad_format_and_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_project(dir.path());
    assert_eq!(
        run_lint(&lint_args(dir.path(), &config, "xml")).unwrap(),
        EXIT_ERROR
    );

    let bad = dir.path().join("bad.yaml");
    fs::write(&bad, "disabled_domains: [nope]\n").unwrap();
    assert_eq!(
        run_lint(&lint_args(dir.path(), &bad, "pretty")).unwrap(),
        EXIT_ERROR
    );
}

#[test]
fn test_lint_passes_with_clean_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_project(dir.path());
    let invoice = dir.path().join("src/main/java/Invoice.java");
    assert_eq!(
        run_lint(&lint_args(&invoice, &config, "json")).unwrap(),
        EXIT_SUCCESS
    );
}

#[test]
fn test_actions_lists_line_fixes() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_project(dir.path());
    let args = ActionsArgs {
        file: dir.path().join("src/main/java/Warmup.java"),
        line: 9,
        resolve: true,
        config: Some(config),
    };
    assert_eq!(run_actions(&args).unwrap(), EXIT_SUCCESS);

    let args = ActionsArgs { line: 400, ..args };
    assert_eq!(run_actions(&args).unwrap(), EXIT_ERROR);
}

#[test]
fn test_fix_dry_run_leaves_files_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_project(dir.path());
    let warmup = dir.path().join("src/main/java/Warmup.java");
    let before = fs::read_to_string(&warmup).unwrap();

    let args = FixArgs {
        path: dir.path().to_path_buf(),
        dry_run: true,
        code: None,
        config: Some(config),
    };
    assert_eq!(run_fix(&args).unwrap(), EXIT_SUCCESS);
    assert_eq!(fs::read_to_string(&warmup).unwrap(), before);
}

#[test]
fn test_fix_rewrites_files_until_lint_passes() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_project(dir.path());

    let args = FixArgs {
        path: dir.path().to_path_buf(),
        dry_run: false,
        code: None,
        config: Some(config.clone()),
    };
    assert_eq!(run_fix(&args).unwrap(), EXIT_SUCCESS);

    let warmup = fs::read_to_string(dir.path().join("src/main/java/Warmup.java")).unwrap();
    assert!(warmup.contains("public void init() {"));
    let chat = fs::read_to_string(dir.path().join("src/main/java/ChatEndpoint.java")).unwrap();
    assert!(chat.contains("@ServerEndpoint(\"/chat\")"));

    assert_eq!(
        run_lint(&lint_args(dir.path(), &config, "pretty")).unwrap(),
        EXIT_SUCCESS
    );
}

#[test]
fn test_fix_single_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = setup_project(dir.path());

    let args = FixArgs {
        path: dir.path().to_path_buf(),
        dry_run: false,
        code: Some("InvalidEndpointPathWithNoStartingSlash".to_string()),
        config: Some(config.clone()),
    };
    // other errors remain
    assert_eq!(run_fix(&args).unwrap(), EXIT_FAILED);
    let chat = fs::read_to_string(dir.path().join("src/main/java/ChatEndpoint.java")).unwrap();
    assert!(chat.contains("\"/chat\""));
    let customer = fs::read_to_string(dir.path().join("src/main/java/Customer.java")).unwrap();
    assert!(!customer.contains("protected Customer()"));

    let args = FixArgs {
        code: Some("NotACode".to_string()),
        ..args
    };
    assert_eq!(run_fix(&args).unwrap(), EXIT_ERROR);
}

#[test]
fn test_init_writes_config_once() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("conf").join("jakartacheck.yaml");
    let args = InitArgs {
        output: output.clone(),
    };
    assert_eq!(run_init(&args).unwrap(), EXIT_SUCCESS);
    let config = jakartacheck::config::Config::parse_file(&output).unwrap();
    assert!(jakartacheck::config::validate(&config).is_ok());
    assert_eq!(run_init(&args).unwrap(), EXIT_ERROR);
}
