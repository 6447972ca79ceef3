//! End-to-end tests against an in-process mock backend
//!
//! Each test starts a WebSocket server on an ephemeral port whose behavior is
//! scripted per incoming message, then runs scenarios through the real
//! session, detector and artifact verifier. The last tests drive the
//! `harness` binary itself.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::Message;

use harness::testing::{
    RunSettings, Scenario, ScenarioOutcome, ScenarioRunner, SuiteRunner, TimeoutReason,
};

/// One thing the mock backend does after receiving a message
#[derive(Clone)]
enum Step {
    /// Send a text frame
    Reply(String),
    /// Write `bytes` bytes to a file
    Write(PathBuf, usize),
    /// Wait before the next step
    Pause(Duration),
    /// Start the close handshake
    Close,
}

type Script = Arc<dyn Fn(&str) -> Vec<Step> + Send + Sync>;

/// Mock backend handle
struct MockBackend {
    url: String,
    /// Raw text of the first frame of each connection
    received: Arc<Mutex<Vec<String>>>,
    /// Request path and query of each connection
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    async fn start(script: impl Fn(&str) -> Vec<Step> + Send + Sync + 'static) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock backend");
        let addr = listener.local_addr().expect("No local addr");
        let script: Script = Arc::new(script);
        let received = Arc::new(Mutex::new(Vec::new()));
        let requests = Arc::new(Mutex::new(Vec::new()));

        let (rx, rq) = (received.clone(), requests.clone());
        tokio::spawn(async move {
            while let Ok((tcp, _)) = listener.accept().await {
                let (script, rx, rq) = (script.clone(), rx.clone(), rq.clone());
                tokio::spawn(async move {
                    let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                        rq.lock().unwrap().push(req.uri().to_string());
                        Ok(resp)
                    };
                    let Ok(mut ws) = tokio_tungstenite::accept_hdr_async(tcp, callback).await else {
                        return;
                    };

                    let first = loop {
                        match ws.next().await {
                            Some(Ok(Message::Text(text))) => break text,
                            Some(Ok(Message::Close(_))) | Some(Err(_)) | None => return,
                            Some(Ok(_)) => continue,
                        }
                    };
                    rx.lock().unwrap().push(first.clone());

                    for step in script(&first) {
                        match step {
                            Step::Reply(text) => {
                                if ws.send(Message::Text(text)).await.is_err() {
                                    return;
                                }
                            }
                            Step::Write(path, bytes) => {
                                if let Some(parent) = path.parent() {
                                    std::fs::create_dir_all(parent).unwrap();
                                }
                                std::fs::write(&path, vec![0u8; bytes]).unwrap();
                            }
                            Step::Pause(d) => tokio::time::sleep(d).await,
                            Step::Close => {
                                let _ = ws.close(None).await;
                                break;
                            }
                        }
                    }

                    // Hold the socket until the harness hangs up
                    while let Some(Ok(msg)) = ws.next().await {
                        if msg.is_close() {
                            break;
                        }
                    }
                });
            }
        });

        Self {
            url: format!("ws://{}/ws", addr),
            received,
            requests,
        }
    }

    fn received(&self) -> Vec<String> {
        self.received.lock().unwrap().clone()
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn settings(endpoint: &str, artifact_root: &Path) -> RunSettings {
    RunSettings {
        endpoint: endpoint.to_string(),
        connect_timeout: Duration::from_secs(5),
        receive_timeout: Duration::from_secs(5),
        scenario_timeout: Duration::from_secs(10),
        settle_delay: Duration::from_millis(50),
        max_frames: 20,
        artifact_root: artifact_root.to_path_buf(),
        verbose: false,
    }
}

fn progress(text: &str) -> Step {
    Step::Reply(serde_json::json!({"type": "progress", "content": text}).to_string())
}

fn message(text: &str) -> Step {
    Step::Reply(serde_json::json!({"type": "message", "content": text}).to_string())
}

fn error(text: &str) -> Step {
    Step::Reply(serde_json::json!({"type": "error", "content": text}).to_string())
}

#[tokio::test]
async fn test_artifact_written_then_confirmed() {
    let root = tempfile::tempdir().unwrap();
    let artifact = root.path().join("outputs/test_tts_rachel.mp3");

    let target = artifact.clone();
    let backend = MockBackend::start(move |_| {
        vec![
            progress("Generating speech..."),
            Step::Pause(Duration::from_millis(50)),
            Step::Write(target.clone(), 4096),
            message("✅ Saved to outputs/test_tts_rachel.mp3"),
        ]
    })
    .await;

    let runner = ScenarioRunner::new(settings(&backend.url, root.path()));
    let scenario = Scenario::text("Rachel TTS", "Say hello with voice Rachel")
        .expecting("outputs/test_tts_rachel.mp3");
    let result = runner.run(&scenario).await;

    assert_eq!(result.outcome, ScenarioOutcome::Success);
    assert!(result.passed());
    assert!(result.artifact_found);
    assert_eq!(result.artifact_size, Some(4096));
    assert!(result.frames_received >= 1);
    assert_eq!(backend.received(), vec!["Say hello with voice Rachel".to_string()]);
}

#[tokio::test]
async fn test_silent_backend_times_out_at_ceiling() {
    let root = tempfile::tempdir().unwrap();
    let backend = MockBackend::start(|_| Vec::new()).await;

    let runner = ScenarioRunner::new(settings(&backend.url, root.path()));
    let ceiling = Duration::from_millis(300);
    let scenario = Scenario::text("Silence", "hello?")
        .expecting("outputs/never.mp3")
        .with_timeout(ceiling);
    let result = runner.run(&scenario).await;

    match &result.outcome {
        ScenarioOutcome::TimedOut { elapsed, reason } => {
            assert_eq!(*reason, TimeoutReason::ScenarioCeiling);
            assert!(*elapsed >= ceiling);
        }
        other => panic!("Expected timeout, got {:?}", other),
    }
    assert!(!result.artifact_found);
    assert_eq!(result.frames_received, 0);
    // Bounded by the ceiling, not the 5s receive timeout
    assert!(result.elapsed < Duration::from_secs(4));
}

#[tokio::test]
async fn test_error_frame_fails_scenario() {
    let root = tempfile::tempdir().unwrap();
    let backend =
        MockBackend::start(|_| vec![progress("Looking up voice..."), error("invalid voice id")]).await;

    let runner = ScenarioRunner::new(settings(&backend.url, root.path()));
    let scenario =
        Scenario::text("Bad voice", "Use voice Nobody").expecting("outputs/nobody.mp3");
    let result = runner.run(&scenario).await;

    assert_eq!(
        result.outcome,
        ScenarioOutcome::Failure("invalid voice id".to_string())
    );
    assert!(!result.artifact_found);
    assert_eq!(result.frames_received, 2);
}

#[tokio::test]
async fn test_envelope_carries_session_token() {
    let root = tempfile::tempdir().unwrap();
    let backend = MockBackend::start(|_| vec![message("All steps completed")]).await;

    let runner = ScenarioRunner::new(settings(&backend.url, root.path()));
    let scenario = Scenario::envelope("Envelope", "make a jingle").with_session("abc-123");
    let result = runner.run(&scenario).await;

    assert_eq!(result.outcome, ScenarioOutcome::Success);
    assert!(!result.artifact_found);

    let sent: serde_json::Value = serde_json::from_str(&backend.received()[0]).unwrap();
    assert_eq!(sent["type"], "message");
    assert_eq!(sent["content"], "make a jingle");
    assert_eq!(sent["session_id"], "abc-123");

    let requests = backend.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("/ws?"));
    assert!(requests[0].contains("session=abc-123"));
}

#[tokio::test]
async fn test_envelope_without_token_generates_one() {
    let root = tempfile::tempdir().unwrap();
    let backend = MockBackend::start(|_| vec![message("done")]).await;

    let runner = ScenarioRunner::new(settings(&backend.url, root.path()));
    let result = runner.run(&Scenario::envelope("Generated", "hi")).await;
    assert!(result.passed());

    let sent: serde_json::Value = serde_json::from_str(&backend.received()[0]).unwrap();
    let token = sent["session_id"].as_str().unwrap().to_string();
    assert!(!token.is_empty());
    assert!(backend.requests()[0].contains(&format!("session={}", token)));
}

#[tokio::test]
async fn test_backend_close_before_completion() {
    let root = tempfile::tempdir().unwrap();
    let backend = MockBackend::start(|_| vec![progress("working"), Step::Close]).await;

    let runner = ScenarioRunner::new(settings(&backend.url, root.path()));
    let scenario = Scenario::text("Dropped", "go").expecting("outputs/dropped.mp3");
    let result = runner.run(&scenario).await;

    match &result.outcome {
        ScenarioOutcome::Failure(reason) => assert!(reason.contains("connection closed")),
        other => panic!("Expected failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_frame_cap_stops_chatty_backend() {
    let root = tempfile::tempdir().unwrap();
    let backend = MockBackend::start(|_| (0..10).map(|i| progress(&format!("step {}", i))).collect()).await;

    let runner = ScenarioRunner::new(settings(&backend.url, root.path()));
    let scenario = Scenario::text("Chatty", "talk").with_max_frames(3);
    let result = runner.run(&scenario).await;

    assert!(matches!(
        result.outcome,
        ScenarioOutcome::TimedOut {
            reason: TimeoutReason::FrameLimit,
            ..
        }
    ));
    assert_eq!(result.frames_received, 4);
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let root = tempfile::tempdir().unwrap();
    let runner = ScenarioRunner::new(settings(&format!("ws://{}/ws", addr), root.path()));
    let result = runner.run(&Scenario::text("Offline", "hello")).await;

    assert!(matches!(result.outcome, ScenarioOutcome::ConnectionError(_)));
    assert!(!result.passed());
    assert_eq!(result.frames_received, 0);
}

#[tokio::test]
async fn test_suite_continues_past_failures() {
    let root = tempfile::tempdir().unwrap();
    let out = root.path().join("outputs");

    let backend = MockBackend::start(move |msg| match msg {
        "pass" => vec![
            Step::Write(out.join("pass.mp3"), 2048),
            message("✅ Saved to outputs/pass.mp3"),
        ],
        "fail" => vec![error("quota exceeded")],
        _ => Vec::new(),
    })
    .await;

    let runner = ScenarioRunner::new(settings(&backend.url, root.path()));
    let suite = SuiteRunner::new(runner, Duration::ZERO);
    let scenarios = vec![
        Scenario::text("Passing", "pass").expecting("outputs/pass.mp3"),
        Scenario::text("Failing", "fail").expecting("outputs/fail.mp3"),
        Scenario::text("Silent", "quiet").with_timeout(Duration::from_millis(200)),
    ];
    let report = suite.run("Mixed", &scenarios).await;

    assert_eq!(report.results.len(), 3);
    let names: Vec<_> = report.results.iter().map(|r| r.scenario_name.as_str()).collect();
    assert_eq!(names, vec!["Passing", "Failing", "Silent"]);
    assert_eq!(report.results[0].artifact_size, Some(2048));
    assert!(matches!(report.results[1].outcome, ScenarioOutcome::Failure(_)));
    assert!(matches!(report.results[2].outcome, ScenarioOutcome::TimedOut { .. }));

    assert_eq!(report.summary.total, 3);
    assert_eq!(report.summary.passed, 1);
    assert_eq!(report.summary.failed, 2);
    assert_eq!(report.summary.pass_rate, 33);
    assert!(!report.summary.all_passed());
    assert_eq!(backend.received(), vec!["pass", "fail", "quiet"]);
}

fn harness_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_harness"))
}

fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("harness.toml");
    std::fs::write(
        &path,
        r#"
[timeouts]
connect_secs = 5
receive_secs = 5
scenario_secs = 10
settle_millis = 10
inter_scenario_secs = 0
"#,
    )
    .unwrap();
    path
}

#[tokio::test]
async fn test_cli_run_suite_file() {
    let root = tempfile::tempdir().unwrap();
    let out = root.path().join("outputs");
    let backend = MockBackend::start(move |msg| {
        if msg.contains("piano") {
            vec![
                Step::Write(out.join("piano.mp3"), 1024),
                message("✅ Saved to outputs/piano.mp3"),
            ]
        } else {
            vec![error("unsupported request")]
        }
    })
    .await;

    let config = write_config(root.path());
    let suite = root.path().join("suite.yaml");
    std::fs::write(
        &suite,
        format!(
            r#"
name: CLI suite
endpoint: {}
artifact_root: .
scenarios:
  - name: Piano
    message: Compose a short piano piece
    expected_file: outputs/piano.mp3
"#,
            backend.url
        ),
    )
    .unwrap();

    let output = tokio::process::Command::new(harness_bin())
        .arg("--config")
        .arg(&config)
        .arg("run")
        .arg(&suite)
        .output()
        .await
        .expect("Failed to run harness");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {}", stdout);
    assert!(stdout.contains("Final score: 1/1 passed, 0 failed (100%)"));

    // Same suite with a failing scenario added exits non-zero
    std::fs::write(
        &suite,
        format!(
            r#"
name: CLI suite
endpoint: {}
artifact_root: .
scenarios:
  - name: Piano
    message: Compose a short piano piece
    expected_file: outputs/piano.mp3
  - name: Unsupported
    message: Paint a picture
"#,
            backend.url
        ),
    )
    .unwrap();

    let output = tokio::process::Command::new(harness_bin())
        .arg("--config")
        .arg(&config)
        .arg("run")
        .arg(&suite)
        .output()
        .await
        .expect("Failed to run harness");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(output.status.code(), Some(1), "stdout: {}", stdout);
    assert!(stdout.contains("Final score: 1/2 passed, 1 failed (50%)"));
}

#[tokio::test]
async fn test_cli_send_with_url_override() {
    let root = tempfile::tempdir().unwrap();
    let backend = MockBackend::start(|_| vec![message("Task completed")]).await;
    let config = write_config(root.path());

    let output = tokio::process::Command::new(harness_bin())
        .arg("--config")
        .arg(&config)
        .arg("--url")
        .arg(&backend.url)
        .args(["send", "ping", "--envelope", "--session", "cli-1"])
        .output()
        .await
        .expect("Failed to run harness");

    assert!(output.status.success());
    assert!(backend.requests()[0].contains("session=cli-1"));
}

#[cfg(target_os = "linux")]
#[tokio::test]
async fn test_cli_failing_run_flushes_log_file() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let root = tempfile::tempdir().unwrap();
    let data_home = root.path().join("data");
    let config = write_config(root.path());

    let output = tokio::process::Command::new(harness_bin())
        .env("XDG_DATA_HOME", &data_home)
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(&config)
        .args(["--log-file", "-v", "send", "hello", "--url"])
        .arg(format!("ws://{}/ws", addr))
        .output()
        .await
        .expect("Failed to run harness");
    assert_eq!(output.status.code(), Some(1));

    let log = data_home.join("stream-harness/logs/harness.log");
    let contents = std::fs::read_to_string(&log).expect("log file missing");
    assert!(contents.contains("Opening session"), "log: {}", contents);
    assert!(contents.contains("Could not open session"), "log: {}", contents);
}

#[test]
fn test_cli_list_and_unknown_quick() {
    let output = std::process::Command::new(harness_bin())
        .arg("list")
        .output()
        .expect("Failed to run harness");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("test_tts_rachel.mp3"));
    assert!(stdout.contains("multi-step"));

    let output = std::process::Command::new(harness_bin())
        .args(["quick", "bogus"])
        .output()
        .expect("Failed to run harness");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Unknown quick scenario"));
}
