use synthriders_rpc::config::Config;
use synthriders_rpc::core::payload::build;
use synthriders_rpc::presence::PresenceClient;

mod common;
use common::{Call, RecordingTransport};

#[test]
fn test_set_connects_on_demand() {
    let transport = RecordingTransport::new();
    let mut client = PresenceClient::new(Box::new(transport.clone()));
    let payload = build(None, &Config::default(), 0);

    assert!(!client.is_connected());
    assert!(client.set(&payload));
    assert!(client.is_connected());
    assert!(client.set(&payload));

    assert_eq!(
        transport.calls(),
        vec![
            Call::Connect,
            Call::Update(payload.clone()),
            Call::Update(payload)
        ]
    );
}

#[test]
fn test_failed_connect_is_retried_next_call() {
    let transport = RecordingTransport::new();
    transport.set_fail_connect(true);
    let mut client = PresenceClient::new(Box::new(transport.clone()));
    let payload = build(None, &Config::default(), 0);

    assert!(!client.set(&payload));
    assert!(!client.is_connected());
    assert!(transport.updates().is_empty());

    transport.set_fail_connect(false);
    assert!(client.set(&payload));
    assert!(client.is_connected());
    assert_eq!(transport.updates().len(), 1);
}

#[test]
fn test_update_failure_marks_disconnected() {
    let transport = RecordingTransport::new();
    let mut client = PresenceClient::new(Box::new(transport.clone()));
    let payload = build(None, &Config::default(), 0);

    assert!(client.connect());
    transport.set_fail_update(true);
    assert!(!client.set(&payload));
    assert!(!client.is_connected());

    transport.set_fail_update(false);
    assert!(client.set(&payload));
    let connects = transport
        .calls()
        .iter()
        .filter(|c| **c == Call::Connect)
        .count();
    assert_eq!(connects, 2);
}

#[test]
fn test_clear_and_disconnect_only_when_connected() {
    let transport = RecordingTransport::new();
    let mut client = PresenceClient::new(Box::new(transport.clone()));

    assert!(!client.clear());
    client.disconnect();
    assert!(transport.calls().is_empty());

    client.connect();
    assert!(client.clear());
    client.disconnect();
    assert!(!client.is_connected());
    assert_eq!(
        transport.calls(),
        vec![Call::Connect, Call::Clear, Call::Close]
    );
}
