//! Coverage report events and their JSONL/text encodings.
//!
//! The CLI emits one [`SessionEvent`] per ingested input and one
//! [`SummaryEvent`] at end of run. The JSONL form is one JSON object per
//! line, hand-encoded into a caller-provided `Vec<u8>` buffer; counts are
//! small and the format is fixed, so serde would only add overhead here.
//! The text form is for humans watching a campaign.

/// Per-session coverage event.
pub struct SessionEvent<'a> {
    /// Opaque session path ID.
    pub path_id: &'a str,
    /// `false` when the session was skipped as already ingested.
    pub new_session: bool,
    /// Fingerprints newly allocated by this session.
    pub added: u64,
    /// Running distinct-fingerprint count after this session.
    pub distinct: u64,
    /// Running component count after this session.
    pub components: u64,
}

/// End-of-run summary event.
pub struct SummaryEvent {
    /// Inputs processed.
    pub sessions: u64,
    /// Inputs that were not path-ID duplicates.
    pub new_sessions: u64,
    /// Final distinct-fingerprint count.
    pub distinct: u64,
    /// Final component count, the coverage metric.
    pub components: u64,
    /// Clustering radius used for the run.
    pub radius: u8,
    /// Wall-clock run time in milliseconds.
    pub elapsed_ms: u64,
}

/// Appends `event` as one JSON line.
pub fn encode_session(event: &SessionEvent<'_>, buf: &mut Vec<u8>) {
    buf.extend_from_slice(b"{\"type\":\"session\",\"path_id\":\"");
    write_json_str(event.path_id, buf);
    buf.extend_from_slice(b"\",\"new\":");
    write_bool(event.new_session, buf);
    buf.extend_from_slice(b",\"added\":");
    write_u64(event.added, buf);
    buf.extend_from_slice(b",\"distinct\":");
    write_u64(event.distinct, buf);
    buf.extend_from_slice(b",\"components\":");
    write_u64(event.components, buf);
    buf.extend_from_slice(b"}\n");
}

/// Appends `event` as one JSON line.
pub fn encode_summary(event: &SummaryEvent, buf: &mut Vec<u8>) {
    buf.extend_from_slice(b"{\"type\":\"summary\",\"sessions\":");
    write_u64(event.sessions, buf);
    buf.extend_from_slice(b",\"new_sessions\":");
    write_u64(event.new_sessions, buf);
    buf.extend_from_slice(b",\"distinct\":");
    write_u64(event.distinct, buf);
    buf.extend_from_slice(b",\"components\":");
    write_u64(event.components, buf);
    buf.extend_from_slice(b",\"radius\":");
    write_u64(u64::from(event.radius), buf);
    buf.extend_from_slice(b",\"elapsed_ms\":");
    write_u64(event.elapsed_ms, buf);
    buf.extend_from_slice(b"}\n");
}

/// Human-readable one-liner for a session event.
pub fn render_session_text(event: &SessionEvent<'_>) -> String {
    if event.new_session {
        format!(
            "session {}: +{} fingerprints, {} distinct, {} components",
            event.path_id, event.added, event.distinct, event.components
        )
    } else {
        format!("session {}: already seen, skipped", event.path_id)
    }
}

/// Human-readable summary block.
pub fn render_summary_text(event: &SummaryEvent) -> String {
    format!(
        "coverage: {} components over {} distinct fingerprints \
         ({}/{} sessions new, radius {}, {} ms)",
        event.components,
        event.distinct,
        event.new_sessions,
        event.sessions,
        event.radius,
        event.elapsed_ms
    )
}

// ============================================================================
// JSON primitives (no serde)
// ============================================================================

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

fn write_bool(value: bool, buf: &mut Vec<u8>) {
    buf.extend_from_slice(if value { b"true" } else { b"false" });
}

/// Write a u64 as decimal ASCII.
fn write_u64(n: u64, buf: &mut Vec<u8>) {
    if n == 0 {
        buf.push(b'0');
        return;
    }
    let start = buf.len();
    let mut v = n;
    while v > 0 {
        buf.push(b'0' + (v % 10) as u8);
        v /= 10;
    }
    buf[start..].reverse();
}

/// Write a JSON-escaped UTF-8 string.
fn write_json_str(s: &str, buf: &mut Vec<u8>) {
    for byte in s.bytes() {
        match byte {
            b'"' => buf.extend_from_slice(b"\\\""),
            b'\\' => buf.extend_from_slice(b"\\\\"),
            b'\n' => buf.extend_from_slice(b"\\n"),
            b'\r' => buf.extend_from_slice(b"\\r"),
            b'\t' => buf.extend_from_slice(b"\\t"),
            0x00..=0x1f => {
                buf.extend_from_slice(b"\\u00");
                buf.push(HEX_DIGITS[(byte >> 4) as usize]);
                buf.push(HEX_DIGITS[(byte & 0xf) as usize]);
            }
            _ => buf.push(byte),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_event_is_valid_json() {
        let event = SessionEvent {
            path_id: "abc123",
            new_session: true,
            added: 7,
            distinct: 42,
            components: 5,
        };
        let mut buf = Vec::new();
        encode_session(&event, &mut buf);
        let line = String::from_utf8(buf).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["type"], "session");
        assert_eq!(value["path_id"], "abc123");
        assert_eq!(value["new"], true);
        assert_eq!(value["added"], 7);
        assert_eq!(value["distinct"], 42);
        assert_eq!(value["components"], 5);
    }

    #[test]
    fn summary_event_is_valid_json() {
        let event = SummaryEvent {
            sessions: 3,
            new_sessions: 2,
            distinct: 100,
            components: 9,
            radius: 5,
            elapsed_ms: 1234,
        };
        let mut buf = Vec::new();
        encode_summary(&event, &mut buf);
        let line = String::from_utf8(buf).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["sessions"], 3);
        assert_eq!(value["new_sessions"], 2);
        assert_eq!(value["components"], 9);
        assert_eq!(value["radius"], 5);
    }

    #[test]
    fn path_ids_are_escaped() {
        let event = SessionEvent {
            path_id: "we\"ird\\id\n",
            new_session: false,
            added: 0,
            distinct: 0,
            components: 0,
        };
        let mut buf = Vec::new();
        encode_session(&event, &mut buf);
        let line = String::from_utf8(buf).unwrap();
        let value: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["path_id"], "we\"ird\\id\n");
    }

    #[test]
    fn write_u64_handles_boundaries() {
        for n in [0u64, 1, 9, 10, 12345, u64::MAX] {
            let mut buf = Vec::new();
            write_u64(n, &mut buf);
            assert_eq!(String::from_utf8(buf).unwrap(), n.to_string());
        }
    }

    #[test]
    fn text_renderings_mention_counts() {
        let event = SessionEvent {
            path_id: "p",
            new_session: true,
            added: 3,
            distinct: 10,
            components: 4,
        };
        let line = render_session_text(&event);
        assert!(line.contains("+3"));
        assert!(line.contains("4 components"));

        let skipped = SessionEvent {
            new_session: false,
            ..event
        };
        assert!(render_session_text(&skipped).contains("skipped"));
    }
}
