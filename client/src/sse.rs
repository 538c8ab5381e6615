//! Incremental decoder for `text/event-stream` bytes.
//!
//! The inverse of the backend's frame writer: frames are groups of lines
//! terminated by a blank line; only `data:` fields matter to us. Comment
//! lines (leading `:`) are the backend's keep-alive heartbeats and are
//! dropped, as are `event:`/`id:`/`retry:` fields — the notification stream
//! puts everything in `data:` payloads.

/// Stateful SSE frame decoder. Feed it raw body chunks in arrival order;
/// it yields one `String` per complete `data:` payload, surviving frames
/// split across arbitrary chunk boundaries. Lines may end in LF, CRLF or a
/// bare CR (all three terminators the SSE grammar allows).
#[derive(Debug, Default)]
pub struct SseDecoder {
    /// Bytes of the current, not-yet-terminated line.
    buf: Vec<u8>,
    /// `data:` values of the current, not-yet-terminated frame.
    data_lines: Vec<String>,
    /// Last byte seen was a CR; an immediately following LF belongs to the
    /// line that CR already terminated (may straddle a chunk boundary).
    pending_cr: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one chunk, returning every payload completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let mut payloads = Vec::new();

        for &byte in chunk {
            match byte {
                b'\n' if self.pending_cr => self.pending_cr = false,
                b'\n' => self.end_line(&mut payloads),
                b'\r' => {
                    self.pending_cr = true;
                    self.end_line(&mut payloads);
                }
                _ => {
                    self.pending_cr = false;
                    self.buf.push(byte);
                }
            }
        }

        payloads
    }

    fn end_line(&mut self, payloads: &mut Vec<String>) {
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        self.buf.clear();

        if line.is_empty() {
            // blank line = end of frame
            if !self.data_lines.is_empty() {
                payloads.push(self.data_lines.join("\n"));
                self.data_lines.clear();
            }
            return;
        }

        if line.starts_with(':') {
            // comment / keep-alive
            return;
        }

        if let Some(value) = line.strip_prefix("data:") {
            // one optional space after the colon per the SSE grammar
            let value = value.strip_prefix(' ').unwrap_or(value);
            self.data_lines.push(value.to_string());
        }
    }
}
