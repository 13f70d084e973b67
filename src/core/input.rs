//! Input sources feeding the desktop loop.
//!
//! `poll` is the only blocking call in the loop and is bounded by its timeout,
//! so the loop gets a tick to flush pending repaints even while idle.

use std::collections::VecDeque;
use std::io::{self, Read};
use std::time::Duration;

use super::event::{decode_utf8, utf8_len, InputEvent, Key, KeyCode, KeyModifiers};

pub trait InputSource {
    /// Wait at most `timeout` for the next event. `Ok(None)` means idle.
    fn poll(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>>;
}

/// Replays a fixed script. Once drained it reports `Interrupt`, which ends
/// the loop.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    script: VecDeque<Option<InputEvent>>,
}

impl ScriptedSource {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            script: events.into_iter().map(Some).collect(),
        }
    }

    pub fn push(&mut self, event: InputEvent) -> &mut Self {
        self.script.push_back(Some(event));
        self
    }

    pub fn push_key(&mut self, key: impl Into<Key>) -> &mut Self {
        self.push(InputEvent::Key(key.into()))
    }

    /// An idle tick: `poll` returns `Ok(None)` once.
    pub fn push_idle(&mut self) -> &mut Self {
        self.script.push_back(None);
        self
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl InputSource for ScriptedSource {
    fn poll(&mut self, _timeout: Duration) -> io::Result<Option<InputEvent>> {
        match self.script.pop_front() {
            Some(step) => Ok(step),
            None => Ok(Some(InputEvent::Interrupt)),
        }
    }
}

/// Decodes a raw terminal byte stream: control bytes, a useful subset of
/// CSI/SS3 sequences, and UTF-8 text.
///
/// Each `poll` performs at most one `read`. A UTF-8 sequence cut off at the
/// end of a read is kept and completed by the next one; an escape sequence
/// is not. End of stream is reported as `Interrupt`.
pub struct ByteSource<R> {
    reader: R,
    pending: VecDeque<InputEvent>,
    /// Leading bytes of an incomplete UTF-8 sequence.
    carry: Vec<u8>,
    eof: bool,
}

impl<R: Read> ByteSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            carry: Vec::new(),
            eof: false,
        }
    }

    fn fill(&mut self) -> io::Result<()> {
        let mut buf = [0u8; 256];
        let n = match self.reader.read(&mut buf) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
            Err(e) => return Err(e),
        };
        if n == 0 {
            if !self.carry.is_empty() {
                tracing::debug!(bytes = self.carry.len(), "truncated UTF-8 at end of input");
                self.carry.clear();
            }
            self.eof = true;
            return Ok(());
        }
        let mut chunk = std::mem::take(&mut self.carry);
        chunk.extend_from_slice(&buf[..n]);
        let (events, used) = parse_chunk(&chunk);
        self.pending.extend(events);
        self.carry = chunk.split_off(used);
        Ok(())
    }
}

impl<R: Read> InputSource for ByteSource<R> {
    fn poll(&mut self, _timeout: Duration) -> io::Result<Option<InputEvent>> {
        if self.pending.is_empty() && !self.eof {
            self.fill()?;
        }
        if let Some(ev) = self.pending.pop_front() {
            return Ok(Some(ev));
        }
        if self.eof {
            return Ok(Some(InputEvent::Interrupt));
        }
        Ok(None)
    }
}

/// Decode one chunk of raw input.
pub fn parse_bytes(bytes: &[u8]) -> Vec<InputEvent> {
    parse_chunk(bytes).0
}

/// Decode `bytes` up to a trailing incomplete UTF-8 sequence. Returns the
/// events and how many bytes were consumed.
fn parse_chunk(bytes: &[u8]) -> (Vec<InputEvent>, usize) {
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        i += 1;
        let key = match b {
            0x1b => {
                let (key, used) = parse_escape(&bytes[i..]);
                i += used;
                key
            }
            b'\t' => Key::simple(KeyCode::Tab),
            b'\r' | b'\n' => Key::simple(KeyCode::Enter),
            0x7f | 0x08 => Key::simple(KeyCode::Backspace),
            0x00 => Key::ctrl(' '),
            0x01..=0x1a => Key::ctrl(char::from(b'a' + b - 1)),
            0x1c..=0x1f => continue,
            0x20..=0x7e => Key::char(char::from(b)),
            _ => {
                let Some(len) = utf8_len(b) else {
                    continue;
                };
                if i + len - 1 > bytes.len() {
                    return (out, i - 1);
                }
                let mut rest = bytes[i..i + len - 1].iter().copied();
                let decoded = decode_utf8(b, || rest.next());
                i += len - 1;
                match decoded {
                    Some(ch) => Key::char(ch),
                    None => continue,
                }
            }
        };
        out.push(InputEvent::Key(key));
    }
    (out, bytes.len())
}

/// Parse what follows an ESC byte. Returns the key and how many bytes after
/// the ESC were consumed.
fn parse_escape(rest: &[u8]) -> (Key, usize) {
    match rest.first() {
        None => (Key::simple(KeyCode::Esc), 0),
        Some(b'[') => parse_csi(&rest[1..]).map_or((Key::simple(KeyCode::Esc), 0), |(k, n)| (k, n + 1)),
        Some(b'O') => match rest.get(1) {
            Some(b'P') => (Key::simple(KeyCode::F(1)), 2),
            Some(b'Q') => (Key::simple(KeyCode::F(2)), 2),
            Some(b'R') => (Key::simple(KeyCode::F(3)), 2),
            Some(b'S') => (Key::simple(KeyCode::F(4)), 2),
            Some(b'H') => (Key::simple(KeyCode::Home), 2),
            Some(b'F') => (Key::simple(KeyCode::End), 2),
            _ => (Key::simple(KeyCode::Esc), 0),
        },
        Some(&b) if (0x20..=0x7e).contains(&b) => (Key::alt(KeyCode::Char(char::from(b))), 1),
        Some(_) => (Key::simple(KeyCode::Esc), 0),
    }
}

fn parse_csi(body: &[u8]) -> Option<(Key, usize)> {
    let end = body.iter().position(|b| (0x40..=0x7e).contains(b))?;
    let params = std::str::from_utf8(&body[..end]).ok()?;
    let mut fields = params.split(';');
    let first: u16 = fields.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let modifiers = fields
        .next()
        .and_then(|s| s.parse::<u8>().ok())
        .map(csi_modifiers)
        .unwrap_or(KeyModifiers::NONE);

    let code = match body[end] {
        b'A' => KeyCode::Up,
        b'B' => KeyCode::Down,
        b'C' => KeyCode::Right,
        b'D' => KeyCode::Left,
        b'H' => KeyCode::Home,
        b'F' => KeyCode::End,
        b'Z' => KeyCode::BackTab,
        b'~' => match first {
            1 | 7 => KeyCode::Home,
            2 => KeyCode::Insert,
            3 => KeyCode::Delete,
            4 | 8 => KeyCode::End,
            5 => KeyCode::PageUp,
            6 => KeyCode::PageDown,
            15 => KeyCode::F(5),
            17..=21 => KeyCode::F((first - 11) as u8),
            23 | 24 => KeyCode::F((first - 12) as u8),
            _ => KeyCode::Unknown,
        },
        _ => KeyCode::Unknown,
    };
    Some((Key::new(code, modifiers), end + 1))
}

/// xterm modifier parameter: 1 + (shift | alt << 1 | ctrl << 2).
fn csi_modifiers(param: u8) -> KeyModifiers {
    let bits = param.saturating_sub(1);
    let mut out = KeyModifiers::NONE;
    if bits & 1 != 0 {
        out |= KeyModifiers::SHIFT;
    }
    if bits & 2 != 0 {
        out |= KeyModifiers::ALT;
    }
    if bits & 4 != 0 {
        out |= KeyModifiers::CONTROL;
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/core/input.rs"]
mod tests;
