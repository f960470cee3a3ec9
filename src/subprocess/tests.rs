use super::*;
use std::time::Duration;

#[tokio::test]
async fn test_production_runner_success() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("echo")
        .arg("hello world")
        .build();

    let output = runner.run(command).await.unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout.trim(), "hello world");
    assert!(output.stderr.is_empty());
}

#[tokio::test]
async fn test_production_runner_failure() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("false").build();

    let output = runner.run(command).await.unwrap();
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
}

#[tokio::test]
async fn test_production_runner_pipes_stdin() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("cat")
        .stdin("package main\n".to_string())
        .build();

    let output = runner.run(command).await.unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, "package main\n");
}

#[tokio::test]
async fn test_production_runner_layers_env_over_parent() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("sh")
        .args(["-c", "printf '%s:%s' \"$CGO_ENABLED\" \"${PATH:+has-path}\""])
        .env("CGO_ENABLED", "0")
        .build();

    let output = runner.run(command).await.unwrap();
    assert_eq!(output.stdout, "0:has-path");
}

#[tokio::test]
async fn test_production_runner_combined_output() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("sh")
        .args(["-c", "printf out; printf err >&2; exit 3"])
        .build();

    let output = runner.run(command).await.unwrap();
    assert_eq!(output.status, ExitStatus::Error(3));
    assert_eq!(output.combined_output(), "outerr");
}

#[tokio::test]
async fn test_production_runner_command_not_found() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("nonexistent-command-12345").build();

    let result = runner.run(command).await;
    assert!(matches!(result, Err(ProcessError::CommandNotFound(_))));
}

#[tokio::test]
async fn test_production_runner_timeout() {
    let runner = TokioProcessRunner;
    let command = ProcessCommandBuilder::new("sleep")
        .arg("5")
        .timeout(Duration::from_millis(100))
        .build();

    let result = runner.run(command).await;
    assert!(matches!(result, Err(ProcessError::Timeout(_))));
}

#[tokio::test]
async fn test_mock_runner_basic() {
    let mut mock = MockProcessRunner::new();

    mock.expect_command("gofmt")
        .returns_stdout("package main\n")
        .returns_success()
        .finish();

    let output = mock
        .run(
            ProcessCommandBuilder::new("gofmt")
                .stdin("package  main".to_string())
                .build(),
        )
        .await
        .unwrap();

    assert!(output.status.success());
    assert_eq!(output.stdout, "package main\n");
    assert!(mock.verify_called("gofmt", 1));
    assert_eq!(
        mock.get_call_history()[0].stdin.as_deref(),
        Some("package  main")
    );
}

#[tokio::test]
async fn test_mock_runner_times_limit() {
    let mut mock = MockProcessRunner::new();

    mock.expect_command("go")
        .with_args(|args| args.first().map(String::as_str) == Some("build"))
        .returns_success()
        .times(1)
        .finish();

    let build = || ProcessCommandBuilder::new("go").args(["build", "main.go"]).build();
    assert!(mock.run(build()).await.is_ok());
    assert!(matches!(
        mock.run(build()).await,
        Err(ProcessError::MockExpectationNotMet(_))
    ));
}

#[tokio::test]
async fn test_mock_runner_sequenced_responses() {
    let mut mock = MockProcessRunner::new();

    mock.expect_command("go").returns_exit_code(1).times(1).finish();
    mock.expect_command("go").returns_success().finish();

    let build = || ProcessCommandBuilder::new("go").arg("build").build();
    assert!(!mock.run(build()).await.unwrap().status.success());
    assert!(mock.run(build()).await.unwrap().status.success());
    assert!(mock.run(build()).await.unwrap().status.success());
    assert!(mock.verify_called("go", 3));
}

#[tokio::test]
async fn test_mock_runner_not_found() {
    let (manager, mut mock) = SubprocessManager::mock();

    mock.expect_command("gofmt").returns_not_found().finish();

    let result = manager
        .runner()
        .run(ProcessCommandBuilder::new("gofmt").build())
        .await;
    assert!(matches!(result, Err(ProcessError::CommandNotFound(_))));
}

#[tokio::test]
async fn test_mock_runner_unexpected_command() {
    let mock = MockProcessRunner::new();
    let result = mock.run(ProcessCommandBuilder::new("ls").build()).await;
    assert!(matches!(result, Err(ProcessError::MockExpectationNotMet(_))));
}

#[test]
fn test_process_command_builder() {
    let command = ProcessCommandBuilder::new("go")
        .arg("build")
        .args(["-ldflags", "-s -w"])
        .path_arg(std::path::Path::new("/tmp/out/hello"))
        .env("CGO_ENABLED", "0")
        .timeout(Duration::from_secs(30))
        .stdin("input data".to_string())
        .build();

    assert_eq!(command.program, "go");
    assert_eq!(command.args, vec!["build", "-ldflags", "-s -w", "/tmp/out/hello"]);
    assert_eq!(command.env.get("CGO_ENABLED"), Some(&"0".to_string()));
    assert_eq!(command.timeout, Some(Duration::from_secs(30)));
    assert_eq!(command.stdin, Some("input data".to_string()));
    assert_eq!(command.display(), "go build -ldflags -s -w /tmp/out/hello");
}
