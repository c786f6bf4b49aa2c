//! Telnet-style transport.
//!
//! The server asks the client for character-at-a-time input with server-side
//! echo and window size reports. Inbound bytes are decoded into session
//! events: keys from plain bytes and ANSI escape sequences, resizes from
//! NAWS subnegotiation. Every other telnet command is stripped.

use std::{mem, str};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use quire_tui::SessionEvent;

pub const IAC: u8 = 255;
pub const DONT: u8 = 254;
pub const DO: u8 = 253;
pub const WONT: u8 = 252;
pub const WILL: u8 = 251;
pub const SB: u8 = 250;
pub const SE: u8 = 240;

pub const OPT_ECHO: u8 = 1;
pub const OPT_SGA: u8 = 3;
pub const OPT_NAWS: u8 = 31;

/// Sent once when a connection opens.
pub const NEGOTIATION: [u8; 9] = [
    IAC, WILL, OPT_ECHO, IAC, WILL, OPT_SGA, IAC, DO, OPT_NAWS,
];

/// Screen size assumed until the client reports its own.
pub const DEFAULT_SIZE: (u16, u16) = (80, 24);

/// Largest screen a client may report; larger reports are clamped.
pub const MAX_SIZE: (u16, u16) = (1000, 500);

const ESC: u8 = 0x1b;
const MAX_CSI_LEN: usize = 16;
const MAX_SUBNEGOTIATION_LEN: usize = 64;

#[derive(Debug, Default)]
enum State {
    #[default]
    Data,
    /// After a CR; swallows the LF or NUL that may follow it.
    Cr,
    Iac,
    /// After WILL/WONT/DO/DONT; the next byte is the option.
    Option,
    Sub(Vec<u8>),
    SubIac(Vec<u8>),
    Esc,
    Csi(Vec<u8>),
    Ss3,
}

/// Incremental decoder. Telnet and CSI sequences may be split across reads;
/// a read ending in a bare escape is taken as the Esc key.
#[derive(Debug, Default)]
pub struct TelnetDecoder {
    state: State,
    utf8: Vec<u8>,
}

impl TelnetDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes a chunk of bytes read from the connection.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        for &byte in bytes {
            self.push(byte, &mut events);
        }
        // Escape sequences arrive in one write, so an escape ending the
        // chunk is a lone Esc keypress.
        if matches!(self.state, State::Esc) {
            self.state = State::Data;
            events.push(key(KeyCode::Esc));
        }
        events
    }

    fn push(&mut self, byte: u8, events: &mut Vec<SessionEvent>) {
        match mem::take(&mut self.state) {
            State::Data => self.data(byte, events),
            State::Cr => {
                if byte != b'\n' && byte != 0 {
                    self.data(byte, events);
                }
            }
            State::Iac => {
                self.state = match byte {
                    WILL | WONT | DO | DONT => State::Option,
                    SB => State::Sub(Vec::new()),
                    _ => State::Data,
                };
            }
            State::Option => {}
            State::Sub(mut buf) => {
                if byte == IAC {
                    self.state = State::SubIac(buf);
                } else {
                    if buf.len() < MAX_SUBNEGOTIATION_LEN {
                        buf.push(byte);
                    }
                    self.state = State::Sub(buf);
                }
            }
            State::SubIac(mut buf) => match byte {
                SE => {
                    if let Some(event) = naws(&buf) {
                        events.push(event);
                    }
                }
                IAC => {
                    buf.push(IAC);
                    self.state = State::Sub(buf);
                }
                _ => {}
            },
            State::Esc => match byte {
                b'[' => self.state = State::Csi(Vec::new()),
                b'O' => self.state = State::Ss3,
                _ => {
                    events.push(key(KeyCode::Esc));
                    self.data(byte, events);
                }
            },
            State::Csi(mut params) => {
                if byte.is_ascii_digit() || byte == b';' {
                    if params.len() < MAX_CSI_LEN {
                        params.push(byte);
                        self.state = State::Csi(params);
                    }
                } else if let Some(code) = csi_key(&params, byte) {
                    events.push(key(code));
                }
            }
            State::Ss3 => {
                if let Some(code) = csi_key(&[], byte) {
                    events.push(key(code));
                }
            }
        }
    }

    fn data(&mut self, byte: u8, events: &mut Vec<SessionEvent>) {
        match byte {
            IAC => self.state = State::Iac,
            ESC => self.state = State::Esc,
            b'\r' => {
                events.push(key(KeyCode::Enter));
                self.state = State::Cr;
            }
            b'\n' => events.push(key(KeyCode::Enter)),
            b'\t' => events.push(key(KeyCode::Tab)),
            0x08 | 0x7f => events.push(key(KeyCode::Backspace)),
            0x01..=0x1a => events.push(ctrl(char::from(b'a' + byte - 1))),
            0x20..=0x7e => events.push(key(KeyCode::Char(char::from(byte)))),
            0x80..=0xfe => self.utf8(byte, events),
            _ => {}
        }
    }

    fn utf8(&mut self, byte: u8, events: &mut Vec<SessionEvent>) {
        self.utf8.push(byte);
        match str::from_utf8(&self.utf8) {
            Ok(text) => {
                events.extend(text.chars().map(|ch| key(KeyCode::Char(ch))));
                self.utf8.clear();
            }
            Err(err) if err.error_len().is_some() || self.utf8.len() >= 4 => self.utf8.clear(),
            Err(_) => {}
        }
    }
}

fn key(code: KeyCode) -> SessionEvent {
    SessionEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn ctrl(ch: char) -> SessionEvent {
    SessionEvent::Key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL))
}

fn csi_key(params: &[u8], last: u8) -> Option<KeyCode> {
    match (params, last) {
        (_, b'A') => Some(KeyCode::Up),
        (_, b'B') => Some(KeyCode::Down),
        (_, b'C') => Some(KeyCode::Right),
        (_, b'D') => Some(KeyCode::Left),
        (_, b'H') | (b"1" | b"7", b'~') => Some(KeyCode::Home),
        (_, b'F') | (b"4" | b"8", b'~') => Some(KeyCode::End),
        (b"3", b'~') => Some(KeyCode::Delete),
        (b"5", b'~') => Some(KeyCode::PageUp),
        (b"6", b'~') => Some(KeyCode::PageDown),
        _ => None,
    }
}

/// NAWS payload: option byte, then width and height as big-endian u16,
/// clamped to `MAX_SIZE`.
fn naws(buf: &[u8]) -> Option<SessionEvent> {
    let [OPT_NAWS, w0, w1, h0, h1, ..] = buf else {
        return None;
    };
    let width = u16::from_be_bytes([*w0, *w1]).min(MAX_SIZE.0);
    let height = u16::from_be_bytes([*h0, *h1]).min(MAX_SIZE.1);
    (width > 0 && height > 0).then_some(SessionEvent::Resize { width, height })
}
