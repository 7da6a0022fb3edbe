//! Wire framing for the subscriber stream.
//!
//! Text, line-based, CRLF-terminated. This is a stable contract for any
//! client consuming the stream: comment frames for connection-open and
//! keepalive, `event:`/`data:` lines plus a blank-line terminator for
//! broadcast events.

use bytes::Bytes;

/// Priming frame sent exactly once when a listener's stream opens,
/// before any other frame can reach it.
pub const CONNECTED: &[u8] = b":connected\r\n\r\n";

/// Keepalive comment frame, sent by the periodic sweep.
pub const PING: &[u8] = b":ping\r\n\r\n";

pub fn connected_frame() -> Bytes {
    Bytes::from_static(CONNECTED)
}

pub fn ping_frame() -> Bytes {
    Bytes::from_static(PING)
}

/// Encode one event frame: an optional `event: <name>` line, one
/// `data: <line>` line per `\n`-split payload line (trailing whitespace
/// trimmed per line), then a blank line. An empty payload still yields a
/// single empty `data:` line.
pub fn event_frame(event: Option<&str>, data: &str) -> Bytes {
    let mut buf = String::with_capacity(data.len() + 32);
    if let Some(name) = event {
        buf.push_str("event: ");
        buf.push_str(name);
        buf.push_str("\r\n");
    }
    for line in data.split('\n') {
        buf.push_str("data: ");
        buf.push_str(line.trim_end());
        buf.push_str("\r\n");
    }
    buf.push_str("\r\n");
    Bytes::from(buf.into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_event_with_multiline_payload() {
        let frame = event_frame(Some("chat"), "a\nb");
        assert_eq!(&frame[..], b"event: chat\r\ndata: a\r\ndata: b\r\n\r\n");
    }

    #[test]
    fn unnamed_event_has_no_event_line() {
        let frame = event_frame(None, "hello");
        assert_eq!(&frame[..], b"data: hello\r\n\r\n");
    }

    #[test]
    fn trailing_whitespace_is_trimmed_per_line() {
        let frame = event_frame(Some("e"), "x  \ny\t");
        assert_eq!(&frame[..], b"event: e\r\ndata: x\r\ndata: y\r\n\r\n");
    }

    #[test]
    fn empty_payload_yields_one_empty_data_line() {
        let frame = event_frame(None, "");
        assert_eq!(&frame[..], b"data: \r\n\r\n");
    }

    #[test]
    fn crlf_in_payload_is_stripped_by_trim() {
        // A payload that already carries CRLF line endings must not leak
        // the carriage return into the data line.
        let frame = event_frame(None, "a\r\nb");
        assert_eq!(&frame[..], b"data: a\r\ndata: b\r\n\r\n");
    }
}
