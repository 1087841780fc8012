use gelf_sender::app::{App, Config, Protocol, TimestampPrecision};
use gelf_sender::domain::GelfError;
use std::io::{self, Cursor};
use std::time::{Duration, Instant};
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

fn create_test_config(port: u16, count: u64, sleep_ms: u64, message: &[&str]) -> Config {
    let mut config = Config {
        graylog_host: "127.0.0.1".to_string(),
        graylog_port: port,
        count,
        sleep_ms,
        source_host: Some("test-host".to_string()),
        message: message.iter().map(|m| (*m).to_string()).collect(),
        ..Config::default()
    };
    config.post_process();
    config
}

/// Accept one connection and collect every null-terminated frame until EOF.
async fn spawn_gelf_input() -> (u16, JoinHandle<Vec<serde_json::Value>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        socket.read_to_end(&mut received).await.unwrap();

        assert!(received.is_empty() || received.last() == Some(&0u8));
        received
            .split(|b| *b == 0)
            .filter(|frame| !frame.is_empty())
            .map(|frame| serde_json::from_slice(frame).unwrap())
            .collect()
    });

    (port, handle)
}

#[tokio::test]
async fn test_sequence_numbers_cover_the_run() {
    let (port, server) = spawn_gelf_input().await;
    let config = create_test_config(port, 5, 0, &["sequence", "check"]);

    let app = App::from_config(config, io::empty()).unwrap();
    let summary = app.run().await.unwrap();
    assert_eq!(summary.frames_sent, 5);

    let frames = server.await.unwrap();
    let ids: Vec<u64> = frames
        .iter()
        .map(|f| f["_messageId"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[tokio::test]
async fn test_three_sends_with_non_decreasing_timestamps() {
    let (port, server) = spawn_gelf_input().await;
    let config = create_test_config(port, 3, 0, &["tick"]);

    App::from_config(config, io::empty())
        .unwrap()
        .run()
        .await
        .unwrap();

    let frames = server.await.unwrap();
    assert_eq!(frames.len(), 3);

    let timestamps: Vec<f64> = frames
        .iter()
        .map(|f| f["timestamp"].as_f64().unwrap())
        .collect();
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_count_two_with_sleep() {
    let (port, server) = spawn_gelf_input().await;
    let config = create_test_config(port, 2, 100, &["hello", "world"]);

    let started = Instant::now();
    App::from_config(config, io::empty())
        .unwrap()
        .run()
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(100));

    let frames = server.await.unwrap();
    assert_eq!(frames.len(), 2);

    for (index, frame) in frames.iter().enumerate() {
        assert_eq!(frame["short_message"], "hello world");
        assert_eq!(frame["full_message"], "hello world");
        assert_eq!(frame["_messageId"], index as u64 + 1);
        assert_eq!(frame["host"], "test-host");
        assert_eq!(frame["version"], "1.1");
        assert_eq!(frame["level"], 6);
        assert_eq!(frame["_type"], "applog-gelftest");
        assert_eq!(frame["_logType"], "APP");
        assert_eq!(frame["_source_env"], "dev");
        assert!(frame["_dateTime"].is_string());
    }

    let first = frames[0]["timestamp"].as_f64().unwrap();
    let second = frames[1]["timestamp"].as_f64().unwrap();
    // Millisecond rounding may shave up to one millisecond off the gap
    assert!(second - first >= 0.098, "gap was {}", second - first);
}

#[tokio::test]
async fn test_message_read_from_stdin() {
    let (port, server) = spawn_gelf_input().await;
    let config = create_test_config(port, 1, 0, &[]);

    App::from_config(config, Cursor::new("from stdin\r\nsecond line\n"))
        .unwrap()
        .run()
        .await
        .unwrap();

    let frames = server.await.unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0]["short_message"], "from stdin");
}

#[tokio::test]
async fn test_empty_stdin_sends_empty_message() {
    let (port, server) = spawn_gelf_input().await;
    let config = create_test_config(port, 1, 0, &[]);

    App::from_config(config, io::empty())
        .unwrap()
        .run()
        .await
        .unwrap();

    let frames = server.await.unwrap();
    assert_eq!(frames[0]["short_message"], "");
}

#[tokio::test]
async fn test_event_log_type_and_seconds_precision() {
    let (port, server) = spawn_gelf_input().await;
    let mut config = create_test_config(port, 1, 0, &["event"]);
    config.log_type = "EVENT".to_string();
    config.source_env = "prod".to_string();
    config.timestamp_precision = TimestampPrecision::Seconds;

    App::from_config(config, io::empty())
        .unwrap()
        .run()
        .await
        .unwrap();

    let frames = server.await.unwrap();
    assert_eq!(frames[0]["_type"], "eventlog-gelftest");
    assert_eq!(frames[0]["_logType"], "EVENT");
    assert_eq!(frames[0]["_source_env"], "prod");
    assert!(frames[0]["timestamp"].is_i64());
    assert!(frames[0].get("_dateTime").is_none());
}

#[tokio::test]
async fn test_zero_count_sends_nothing() {
    let (port, server) = spawn_gelf_input().await;
    let config = create_test_config(port, 0, 0, &["unused"]);

    let summary = App::from_config(config, io::empty())
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.frames_sent, 0);
    assert!(server.await.unwrap().is_empty());
}

#[tokio::test]
async fn test_connection_failure_attempts_no_writes() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = create_test_config(port, 3, 0, &["never sent"]);
    let app = App::from_config(config, io::empty()).unwrap();
    assert_eq!(app.record().message_id, 0);

    let err = app.run().await.unwrap_err();
    assert!(matches!(err, GelfError::Connection { .. }));
    assert_eq!(err.kind(), "connection");
}

#[tokio::test]
async fn test_template_record_uses_config() {
    let config = Config {
        protocol: Protocol::Udp,
        source_host: Some("override-host".to_string()),
        log_type: "AUDIT".to_string(),
        message: vec!["a".to_string(), "b".to_string()],
        ..Config::default()
    };

    let app = App::from_config(config, io::empty()).unwrap();
    let record = app.record();

    assert_eq!(record.host, "override-host");
    assert_eq!(record.short_message, "a b");
    assert_eq!(record.type_tag, "eventlog-gelftest");
    assert_eq!(app.config().protocol, Protocol::Udp);
}

#[tokio::test]
async fn test_empty_log_type_sends_event_tag() {
    let (port, server) = spawn_gelf_input().await;
    let mut config = create_test_config(port, 1, 0, &["msg"]);
    config.log_type = String::new();
    config.source_env = String::new();

    App::from_config(config, io::empty())
        .unwrap()
        .run()
        .await
        .unwrap();

    let frames = server.await.unwrap();
    assert_eq!(frames[0]["_type"], "eventlog-gelftest");
    assert_eq!(frames[0]["_logType"], "");
    assert_eq!(frames[0]["_source_env"], "");
}
