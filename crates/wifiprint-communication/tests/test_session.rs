mod common;

use common::{commands, packets, sequence_of, MockTransport, OK};
use parking_lot::Mutex;
use std::io::Write;
use wifiprint_communication::protocol::checksum;
use wifiprint_communication::{
    NoOpListener, PrintOutcome, Session, SessionOptions, TransferListener, UploadReport,
    UploadStatus, CHUNK_CAPACITY, PACKET_LEN,
};
use wifiprint_core::{ControllerError, Error, ProtocolError, SessionState};

async fn connected(transport: MockTransport) -> Session<MockTransport> {
    Session::handshake(transport, SessionOptions::default())
        .await
        .unwrap()
}

#[tokio::test]
async fn test_handshake_sends_init() {
    let transport = MockTransport::always_ok(1);
    let sent = transport.sent.clone();
    let session = connected(transport).await;

    assert_eq!(session.state(), SessionState::Connected);
    assert_eq!(commands(&sent.lock()), vec!["~M601 S1\r\n"]);
}

#[tokio::test]
async fn test_handshake_rejected() {
    let transport = MockTransport::new(vec![b"busy\r\n"]);
    let result = Session::handshake(transport, SessionOptions::default()).await;

    match result {
        Err(Error::Protocol(ProtocolError::InitRejected { response })) => {
            assert_eq!(response, "busy\r\n")
        }
        Err(e) => panic!("unexpected error: {}", e),
        Ok(_) => panic!("handshake should fail"),
    }
}

#[tokio::test]
async fn test_upload_10000_bytes_in_three_chunks() {
    let transport = MockTransport::always_ok(6);
    let sent = transport.sent.clone();
    let mut session = connected(transport).await;

    let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
    let report = session
        .upload("part.gcode", data.len() as u64, &data[..], &NoOpListener)
        .await
        .unwrap();

    assert_eq!(report.status, UploadStatus::Completed);
    assert_eq!(report.chunks_sent, 3);
    assert_eq!(report.bytes_sent, 10_000);
    assert_eq!(report.remote_path, "0:/user/part.gcode");
    assert_eq!(session.state(), SessionState::Idle);

    let sent = sent.lock();
    let packets = packets(&sent);
    assert_eq!(packets.len(), 3);
    for (i, packet) in packets.iter().enumerate() {
        assert_eq!(packet.len(), PACKET_LEN);
        assert_eq!(sequence_of(packet), i as u32);
        let crc = u32::from_be_bytes([packet[12], packet[13], packet[14], packet[15]]);
        assert_eq!(crc, checksum(&packet[16..]));
    }

    // Last chunk carries 1808 file bytes followed by zero padding
    let last = &packets[2][16..];
    assert_eq!(&last[..1808], &data[8192..]);
    assert!(last[1808..].iter().all(|b| *b == 0));
    assert_eq!(last.len(), CHUNK_CAPACITY);

    let cmds = commands(&sent);
    assert_eq!(
        cmds,
        vec![
            "~M601 S1\r\n".to_string(),
            "M28 10000 0:/user/part.gcode\r\n".to_string(),
            "~M29\r\n".to_string(),
        ]
    );
    // End-write follows the final chunk
    assert_eq!(sent.last().unwrap(), b"~M29\r\n");
}

#[tokio::test]
async fn test_upload_empty_file_sends_no_chunks() {
    let transport = MockTransport::always_ok(3);
    let sent = transport.sent.clone();
    let mut session = connected(transport).await;

    let report = session
        .upload("empty.gcode", 0, &[][..], &NoOpListener)
        .await
        .unwrap();

    assert!(report.is_complete());
    assert_eq!(report.chunks_sent, 0);

    let sent = sent.lock();
    assert!(packets(&sent).is_empty());
    assert_eq!(
        commands(&sent),
        vec!["~M601 S1\r\n", "M28 0 0:/user/empty.gcode\r\n", "~M29\r\n"]
    );
}

#[tokio::test]
async fn test_start_write_rejected_sends_no_chunk() {
    let transport = MockTransport::new(vec![OK, b"ERROR\r\n"]);
    let sent = transport.sent.clone();
    let mut session = connected(transport).await;

    let data = vec![1u8; 5000];
    let err = session
        .upload("part.gcode", 5000, &data[..], &NoOpListener)
        .await
        .unwrap_err();

    assert!(err.is_fatal_protocol_error());
    assert!(matches!(
        err,
        Error::Protocol(ProtocolError::StartWriteRejected { .. })
    ));
    assert_eq!(session.state(), SessionState::Connected);

    let sent = sent.lock();
    assert!(packets(&sent).is_empty());
    assert_eq!(sent.len(), 2);
}

#[tokio::test]
async fn test_chunk_rejection_stops_loop() {
    // INIT, M28, chunk 0 ok, chunk 1 refused, M29
    let transport = MockTransport::new(vec![OK, OK, OK, b"resend\r\n", b"ok\r\n"]);
    let sent = transport.sent.clone();
    let mut session = connected(transport).await;

    let data = vec![7u8; CHUNK_CAPACITY * 3];
    let report = session
        .upload("part.gcode", data.len() as u64, &data[..], &NoOpListener)
        .await
        .unwrap();

    assert_eq!(report.status, UploadStatus::ChunkRejected { sequence: 1 });
    assert_eq!(report.chunks_sent, 1);
    assert_eq!(report.bytes_sent, CHUNK_CAPACITY as u64);
    assert_eq!(session.state(), SessionState::Idle);

    let sent = sent.lock();
    assert_eq!(packets(&sent).len(), 2);
    assert_eq!(sent.last().unwrap(), b"~M29\r\n");
}

#[tokio::test]
async fn test_upload_file_uses_base_name() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("calibration cube.gx");
    std::fs::File::create(&path)
        .unwrap()
        .write_all(&[b'G'; 100])
        .unwrap();

    let transport = MockTransport::always_ok(4);
    let sent = transport.sent.clone();
    let mut session = connected(transport).await;

    let report = session.upload_file(&path, &NoOpListener).await.unwrap();
    assert_eq!(report.total_bytes, 100);
    assert!(report.is_complete());
    assert_eq!(
        commands(&sent.lock())[1],
        "M28 100 0:/user/calibration cube.gx\r\n"
    );
}

#[derive(Default)]
struct RecordingListener {
    events: Mutex<Vec<String>>,
}

impl TransferListener for RecordingListener {
    fn on_upload_started(&self, remote_path: &str, total_bytes: u64) {
        self.events
            .lock()
            .push(format!("start {} {}", remote_path, total_bytes));
    }

    fn on_chunk_sent(&self, sequence: u32, bytes_sent: u64, total_bytes: u64) {
        self.events
            .lock()
            .push(format!("chunk {} {}/{}", sequence, bytes_sent, total_bytes));
    }

    fn on_upload_finished(&self, report: &UploadReport) {
        self.events.lock().push(format!("done {}", report.chunks_sent));
    }

    fn on_upload_failed(&self, error: &Error) {
        let kind = if error.is_connection_error() { "connection" } else { "other" };
        self.events.lock().push(format!("failed {}", kind));
    }
}

#[tokio::test]
async fn test_listener_progress_events() {
    let mut session = connected(MockTransport::always_ok(5)).await;
    let listener = RecordingListener::default();

    let data = vec![0u8; 5000];
    session
        .upload("a.gcode", 5000, &data[..], &listener)
        .await
        .unwrap();

    assert_eq!(
        *listener.events.lock(),
        vec![
            "start 0:/user/a.gcode 5000",
            "chunk 0 4096/5000",
            "chunk 1 5000/5000",
            "done 2",
        ]
    );
}

#[tokio::test]
async fn test_custom_sd_path() {
    let transport = MockTransport::always_ok(4);
    let sent = transport.sent.clone();
    let options = SessionOptions {
        sd_path: "0:/jobs/".to_string(),
        ..Default::default()
    };
    let mut session = Session::handshake(transport, options).await.unwrap();

    let outcome = session.start_print("a.gcode").await.unwrap();
    assert_eq!(
        outcome,
        PrintOutcome::Started {
            path: "0:/jobs/a.gcode".to_string()
        }
    );
    assert_eq!(commands(&sent.lock())[1], "~M23 0:/jobs/a.gcode\r\n");
}

#[tokio::test]
async fn test_start_print_sequence() {
    let transport = MockTransport::always_ok(3);
    let sent = transport.sent.clone();
    let mut session = connected(transport).await;

    let outcome = session.start_print("a.gcode").await.unwrap();
    assert!(outcome.is_started());
    assert_eq!(session.state(), SessionState::Printing);
    assert_eq!(
        commands(&sent.lock()),
        vec!["~M601 S1\r\n", "~M23 0:/user/a.gcode\r\n", "~M27\r\n"]
    );
}

#[tokio::test]
async fn test_start_print_file_select_rejected() {
    let transport = MockTransport::new(vec![OK, b"Error: file not found\r\n"]);
    let sent = transport.sent.clone();
    let mut session = connected(transport).await;

    let outcome = session.start_print("missing.gcode").await.unwrap();
    assert!(matches!(outcome, PrintOutcome::FileSelectRejected { .. }));
    assert_eq!(session.state(), SessionState::Connected);
    // Start-print is never sent after a refused selection
    assert_eq!(sent.lock().len(), 2);
}

#[tokio::test]
async fn test_start_print_start_rejected() {
    let transport = MockTransport::new(vec![OK, OK, b"busy\r\n"]);
    let mut session = connected(transport).await;

    let outcome = session.start_print("a.gcode").await.unwrap();
    assert!(matches!(outcome, PrintOutcome::StartRejected { .. }));
}

#[tokio::test]
async fn test_queries_return_raw_response() {
    let transport = MockTransport::new(vec![
        OK,
        b"CMD M115 Received.\r\nMachine Type: Adventurer\r\n",
        b"CMD M20 Received.\r\nlist",
    ]);
    let mut session = connected(transport).await;

    let status = session.status().await.unwrap();
    assert_eq!(status, "CMD M115 Received.\r\nMachine Type: Adventurer\r\n");
    let files = session.list_files().await.unwrap();
    assert_eq!(files, "CMD M20 Received.\r\nlist");
}

#[tokio::test]
async fn test_print_then_upload_is_refused() {
    let mut session = connected(MockTransport::always_ok(3)).await;
    session.start_print("a.gcode").await.unwrap();

    let err = session
        .upload("b.gcode", 0, &[][..], &NoOpListener)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Controller(ControllerError::InvalidStateTransition { .. })
    ));

    let err = session.status().await.unwrap_err();
    assert!(matches!(
        err,
        Error::Controller(ControllerError::InvalidStateTransition { .. })
    ));
}

#[tokio::test]
async fn test_release_from_printing() {
    let transport = MockTransport::always_ok(4);
    let sent = transport.sent.clone();
    let mut session = connected(transport).await;
    session.start_print("a.gcode").await.unwrap();

    let response = session.release().await.unwrap();
    assert!(response.ends_with("ok\r\n"));
    assert_eq!(sent.lock().last().unwrap(), b"~M602\r\n");
}

#[tokio::test]
async fn test_connection_lost_mid_upload() {
    // INIT, M28, then the peer goes away
    let transport = MockTransport::new(vec![OK, OK]);
    let mut session = connected(transport).await;

    let data = vec![1u8; 100];
    let err = session
        .upload("a.gcode", 100, &data[..], &NoOpListener)
        .await
        .unwrap_err();
    assert!(err.is_connection_error());
}

#[tokio::test]
async fn test_listener_told_about_failed_upload() {
    // INIT, M28, chunk 0, then the peer goes away
    let transport = MockTransport::new(vec![OK, OK, OK]);
    let mut session = connected(transport).await;
    let listener = RecordingListener::default();

    let data = vec![1u8; 5000];
    assert!(session
        .upload("a.gcode", 5000, &data[..], &listener)
        .await
        .is_err());

    assert_eq!(
        *listener.events.lock(),
        vec![
            "start 0:/user/a.gcode 5000",
            "chunk 0 4096/5000",
            "failed connection",
        ]
    );
}
