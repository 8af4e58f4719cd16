//! Session lifecycle: registration, polling, keepalive and reconnect.

mod common;

use std::io::ErrorKind;
use std::time::Duration;

use common::{drain, lifecycle, listener, MockConnector, Read};
use slirc_client::error::ConnectError;
use slirc_client::{ClientConfig, ConnectionConfig, Event, Message, Session, SessionState};

fn params() -> ConnectionConfig {
    ConnectionConfig::new("irc.example.com", 6667, "jeb")
}

fn quiet_config() -> ClientConfig {
    ClientConfig {
        ping_interval: Duration::from_secs(3600),
        ..ClientConfig::default()
    }
}

fn connected() -> (
    MockConnector,
    Session<MockConnector>,
    std::sync::mpsc::Receiver<Event>,
) {
    common::init_tracing();
    let connector = MockConnector::new();
    let mut session = Session::new(connector.clone(), quiet_config());
    let (tx, rx) = listener();
    session.subscribe(tx);
    session.connect(params()).expect("connect");
    connector.clear_written();
    drain(&rx);
    (connector, session, rx)
}

#[test]
fn test_registration_sequence() {
    let connector = MockConnector::new();
    let mut session = Session::new(connector.clone(), quiet_config());
    let (tx, rx) = listener();
    session.subscribe(tx);

    let mut params = params();
    params.password = Some("hunter2".into());
    params.username = Some("jebediah".into());
    session.connect(params).expect("connect");

    assert_eq!(
        connector.written(),
        vec!["PASS :hunter2", "NICK :jeb", "USER jebediah 8 * :jeb"]
    );
    assert_eq!(session.state(), SessionState::Connected);

    let events = drain(&rx);
    assert_eq!(
        events.first(),
        Some(&Event::ConnectAttempted {
            host: "irc.example.com".into(),
            port: 6667
        })
    );
    assert_eq!(events.last(), Some(&Event::Connected));
    let sent = events
        .iter()
        .filter(|e| matches!(e, Event::CommandSent(_)))
        .count();
    assert_eq!(sent, 3);
}

#[test]
fn test_registration_without_password() {
    let connector = MockConnector::new();
    let mut session = Session::new(connector.clone(), quiet_config());
    session.connect(params()).expect("connect");
    assert_eq!(connector.written(), vec!["NICK :jeb", "USER jeb 8 * :jeb"]);
}

#[test]
fn test_failed_connect_is_not_retried() {
    let connector = MockConnector::new();
    connector.wire.borrow_mut().refuse_connects = 1;
    let mut session = Session::new(connector.clone(), quiet_config());
    let (tx, rx) = listener();
    session.subscribe(tx);

    let err = session.connect(params()).unwrap_err();
    assert!(matches!(err, ConnectError::Connect { .. }));
    assert_eq!(session.state(), SessionState::Disconnected);

    assert!(session.poll().is_empty());
    assert_eq!(connector.wire.borrow().connects, 1);
    assert_eq!(
        lifecycle(&drain(&rx)),
        vec![Event::ConnectAttempted {
            host: "irc.example.com".into(),
            port: 6667
        }]
    );
}

#[test]
fn test_handshake_failure_leaves_session_disconnected() {
    let connector = MockConnector::new();
    connector.wire.borrow_mut().fail_writes = 1;
    let mut session = Session::new(connector.clone(), quiet_config());
    let (tx, rx) = listener();
    session.subscribe(tx);

    let err = session.connect(params()).unwrap_err();
    assert!(matches!(err, ConnectError::Handshake(_)));
    assert!(!session.is_connected());
    assert_eq!(connector.wire.borrow().closes, 1);
    assert!(!drain(&rx).contains(&Event::Connected));
}

#[test]
fn test_poll_decodes_lines_across_reads() {
    let (connector, mut session, rx) = connected();
    connector.feed(":irc.example.com 001 jeb :Wel");
    assert!(session.poll().is_empty());

    connector.feed("come\r\nthis is not irc !!!\r\nPING :abc\r\n");
    let commands = session.poll();
    let verbs: Vec<_> = commands.iter().map(|c| c.verb().to_owned()).collect();
    assert_eq!(verbs, vec!["001", "PING"]);
    assert_eq!(commands[0].message().last_param(), Some("Welcome"));

    let received = drain(&rx)
        .into_iter()
        .filter(|e| matches!(e, Event::CommandReceived(_)))
        .count();
    assert_eq!(received, 2);
}

#[test]
fn test_poll_with_stops_at_reconnect() {
    let (connector, mut session, _rx) = connected();
    connector.wire.borrow_mut().fail_writes = 1;
    connector.feed("PING :one\r\nPING :two\r\nPING :three\r\n");

    let mut handled = Vec::new();
    session.poll_with(|session, command| {
        handled.push(command.message().last_param().map(str::to_owned));
        session.send(Message::new("PONG", ["reply"]));
    });

    assert_eq!(handled, vec![Some("one".to_owned())]);
    assert_eq!(session.epoch(), 2);
    assert!(connector.wire.borrow().written_with_verb("PONG").is_empty());
    assert!(session.poll().is_empty());
}

#[test]
fn test_read_failure_reconnects_exactly_once() {
    let (connector, mut session, rx) = connected();
    connector.push(Read::Error(ErrorKind::ConnectionReset));

    assert!(session.poll().is_empty());

    assert_eq!(
        lifecycle(&drain(&rx)),
        vec![
            Event::Disconnected,
            Event::ConnectAttempted {
                host: "irc.example.com".into(),
                port: 6667
            },
            Event::Connected,
        ]
    );
    let wire = connector.wire.borrow();
    assert_eq!(wire.connects, 2);
    assert_eq!(wire.written_with_verb("QUIT").len(), 1);
    assert_eq!(wire.written_with_verb("NICK").len(), 1);
    drop(wire);

    assert!(session.is_connected());
    assert!(session.auto_reconnect());
    assert_eq!(session.epoch(), 2);
}

#[test]
fn test_peer_close_reconnects() {
    let (connector, mut session, rx) = connected();
    connector.push(Read::Eof);
    session.poll();
    assert_eq!(
        lifecycle(&drain(&rx))
            .into_iter()
            .filter(|e| *e == Event::Connected)
            .count(),
        1
    );
    assert!(session.is_connected());
}

#[test]
fn test_write_failure_reconnects() {
    let (connector, mut session, rx) = connected();
    connector.wire.borrow_mut().fail_writes = 1;

    session.send(Message::new("PRIVMSG", ["#kerbal", "hello"]));

    let events = lifecycle(&drain(&rx));
    assert_eq!(events.first(), Some(&Event::Disconnected));
    assert_eq!(events.last(), Some(&Event::Connected));
    assert!(session.is_connected());
}

#[test]
fn test_unreachable_host_does_not_loop() {
    let (connector, mut session, rx) = connected();
    {
        let mut wire = connector.wire.borrow_mut();
        wire.refuse_connects = usize::MAX;
        wire.reads.push_back(Read::Error(ErrorKind::ConnectionReset));
    }

    session.poll();
    session.poll();

    assert_eq!(connector.wire.borrow().connects, 2);
    assert_eq!(session.state(), SessionState::Disconnected);
    let events = lifecycle(&drain(&rx));
    assert_eq!(
        events.iter().filter(|e| **e == Event::Disconnected).count(),
        1
    );
    assert!(!events.contains(&Event::Connected));
}

#[test]
fn test_disconnect_is_idempotent() {
    let (connector, mut session, rx) = connected();
    session.disconnect();
    session.disconnect();

    assert_eq!(lifecycle(&drain(&rx)), vec![Event::Disconnected]);
    assert_eq!(connector.written(), vec!["QUIT :Leaving"]);
    assert!(!session.auto_reconnect());
}

#[test]
fn test_no_reconnect_after_disconnect() {
    let (connector, mut session, _rx) = connected();
    session.disconnect();
    connector.push(Read::Error(ErrorKind::ConnectionReset));
    session.poll();
    assert_eq!(connector.wire.borrow().connects, 1);
}

#[test]
fn test_send_while_disconnected_is_dropped() {
    let connector = MockConnector::new();
    let mut session = Session::new(connector.clone(), quiet_config());
    let (tx, rx) = listener();
    session.subscribe(tx);

    session.send(Message::new("PRIVMSG", ["#kerbal", "anyone?"]));
    assert!(connector.written().is_empty());
    assert!(drain(&rx).is_empty());
}

#[test]
fn test_keepalive_ping() {
    common::init_tracing();
    let connector = MockConnector::new();
    let mut session = Session::new(
        connector.clone(),
        ClientConfig {
            ping_interval: Duration::ZERO,
            ..ClientConfig::default()
        },
    );
    session.connect(params()).expect("connect");
    connector.clear_written();

    session.poll();
    session.poll();

    let pings = connector.wire.borrow().written_with_verb("PING");
    assert_eq!(pings.len(), 2);
    let stamp = pings[0].trim_start_matches("PING :");
    assert!(stamp.parse::<i64>().is_ok(), "{}", stamp);
}

#[test]
fn test_no_ping_before_interval() {
    let (connector, mut session, _rx) = connected();
    session.poll();
    assert!(connector.written().is_empty());
}

#[test]
fn test_send_raw() {
    let (connector, mut session, rx) = connected();
    session.send_raw("WHOIS  bill");
    session.send_raw("not a command !!!");

    assert_eq!(connector.written(), vec!["WHOIS  bill"]);
    let events = drain(&rx);
    assert_eq!(
        events,
        vec![Event::CommandSent(Message::new("WHOIS", ["bill"]))]
    );
}

#[test]
fn test_oversized_line_is_discarded() {
    let (connector, mut session, _rx) = connected();
    connector.feed(&"x".repeat(9000));
    assert!(session.poll().is_empty());

    connector.feed("PING :still alive\r\n");
    let commands = session.poll();
    assert_eq!(commands.len(), 1);
    assert!(session.is_connected());
}

#[test]
fn test_reconnect_after_disconnect_requires_connect() {
    let (connector, mut session, rx) = connected();
    session.disconnect();
    session.connect(params()).expect("connect");
    assert!(session.auto_reconnect());
    assert_eq!(connector.wire.borrow().connects, 2);
    assert_eq!(
        lifecycle(&drain(&rx)),
        vec![
            Event::Disconnected,
            Event::ConnectAttempted {
                host: "irc.example.com".into(),
                port: 6667
            },
            Event::Connected,
        ]
    );
}
