//! Scripted in-memory connector shared by the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::sync::mpsc::Receiver;

use bytes::BytesMut;
use slirc_client::error::{ConnectError, TransportError};
use slirc_client::{ChannelListener, Connector, Event, Socket};

/// One scripted outcome of `read_available`.
#[derive(Debug)]
pub enum Read {
    Data(Vec<u8>),
    Eof,
    Error(io::ErrorKind),
}

/// State shared between the test and every socket the connector opened.
#[derive(Debug, Default)]
pub struct Wire {
    pub reads: VecDeque<Read>,
    pub written: Vec<String>,
    pub connects: usize,
    pub closes: usize,
    pub refuse_connects: usize,
    pub fail_writes: usize,
}

impl Wire {
    /// Written lines whose verb is `verb`.
    pub fn written_with_verb(&self, verb: &str) -> Vec<String> {
        self.written
            .iter()
            .filter(|l| l.split(' ').next() == Some(verb))
            .cloned()
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MockConnector {
    pub wire: Rc<RefCell<Wire>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for the next read.
    pub fn feed(&self, data: &str) {
        self.push(Read::Data(data.as_bytes().to_vec()));
    }

    pub fn push(&self, read: Read) {
        self.wire.borrow_mut().reads.push_back(read);
    }

    pub fn written(&self) -> Vec<String> {
        self.wire.borrow().written.clone()
    }

    pub fn clear_written(&self) {
        self.wire.borrow_mut().written.clear();
    }
}

impl Connector for MockConnector {
    type Socket = MockSocket;

    fn connect(&mut self, host: &str, port: u16) -> Result<MockSocket, ConnectError> {
        let mut wire = self.wire.borrow_mut();
        wire.connects += 1;
        if wire.refuse_connects > 0 {
            wire.refuse_connects -= 1;
            return Err(ConnectError::Connect {
                host: host.to_owned(),
                port,
                source: io::Error::from(io::ErrorKind::ConnectionRefused),
            });
        }
        Ok(MockSocket {
            wire: Rc::clone(&self.wire),
            open: true,
        })
    }
}

#[derive(Debug)]
pub struct MockSocket {
    wire: Rc<RefCell<Wire>>,
    open: bool,
}

impl Socket for MockSocket {
    fn read_available(&mut self, buf: &mut BytesMut) -> Result<usize, TransportError> {
        if !self.open {
            return Err(TransportError::NotConnected);
        }
        // Like a real socket, hand over everything queued up to the first
        // failure; the failure itself is reported by the next call.
        let mut wire = self.wire.borrow_mut();
        let mut total = 0;
        loop {
            let is_data = match wire.reads.front() {
                None => return Ok(total),
                Some(read) => matches!(read, Read::Data(_)),
            };
            if !is_data && total > 0 {
                return Ok(total);
            }
            match wire.reads.pop_front() {
                Some(Read::Data(data)) => {
                    buf.extend_from_slice(&data);
                    total += data.len();
                }
                Some(Read::Eof) => return Err(TransportError::Closed),
                Some(Read::Error(kind)) => return Err(TransportError::Io(io::Error::from(kind))),
                None => return Ok(total),
            }
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let mut wire = self.wire.borrow_mut();
        if !self.open {
            return Err(TransportError::NotConnected);
        }
        if wire.fail_writes > 0 {
            wire.fail_writes -= 1;
            return Err(TransportError::Io(io::Error::from(io::ErrorKind::BrokenPipe)));
        }
        let text = String::from_utf8_lossy(bytes);
        assert!(text.ends_with("\r\n"), "unterminated write: {:?}", text);
        wire.written.extend(
            text.split("\r\n")
                .filter(|l| !l.is_empty())
                .map(str::to_owned),
        );
        Ok(())
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.wire.borrow_mut().closes += 1;
        }
    }
}

/// Drain everything a [`ChannelListener`] has collected so far.
pub fn drain(rx: &Receiver<Event>) -> Vec<Event> {
    rx.try_iter().collect()
}

/// Only the lifecycle events, in order.
pub fn lifecycle(events: &[Event]) -> Vec<Event> {
    events
        .iter()
        .filter(|e| {
            matches!(
                e,
                Event::ConnectAttempted { .. } | Event::Connected | Event::Disconnected
            )
        })
        .cloned()
        .collect()
}

pub fn listener() -> (ChannelListener, Receiver<Event>) {
    ChannelListener::pair()
}

/// Install a test subscriber once so `RUST_LOG=slirc_client=trace` shows
/// the session's diagnostics.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
