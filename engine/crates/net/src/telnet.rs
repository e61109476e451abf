const IAC: u8 = 255;
const WILL: u8 = 251;
const WONT: u8 = 252;
const DO: u8 = 253;
const DONT: u8 = 254;
const SB: u8 = 250;
const SE: u8 = 240;

/// Strip Telnet IAC sequences from raw bytes.
pub fn strip_iac(bytes: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == IAC {
            if i + 1 >= bytes.len() {
                break; // incomplete IAC sequence
            }
            match bytes[i + 1] {
                WILL | WONT | DO | DONT => {
                    i += 3;
                }
                SB => {
                    // Subnegotiation: skip until IAC SE
                    i += 2;
                    while i + 1 < bytes.len() {
                        if bytes[i] == IAC && bytes[i + 1] == SE {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                }
                IAC => {
                    // Escaped IAC (literal 255)
                    result.push(IAC);
                    i += 2;
                }
                _ => {
                    i += 2;
                }
            }
        } else {
            result.push(bytes[i]);
            i += 1;
        }
    }

    result
}

const MAX_LINE_LEN: usize = 4096;

/// Buffered line reader for Telnet input.
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Feed raw data into the buffer. Returns any complete lines.
    pub fn feed(&mut self, data: &[u8]) -> Vec<String> {
        let cleaned = strip_iac(data);
        let mut lines = Vec::new();

        for &byte in &cleaned {
            if byte == b'\n' {
                lines.push(self.take_line());
            } else if byte == b'\r' {
                // Ignore CR, we split on LF
            } else if self.buf.len() < MAX_LINE_LEN {
                self.buf.push(byte);
            }
            // Bytes beyond MAX_LINE_LEN are silently dropped.
        }

        lines
    }

    fn take_line(&mut self) -> String {
        let bytes = std::mem::take(&mut self.buf);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_iac_passthrough() {
        assert_eq!(strip_iac(b"hello"), b"hello");
    }

    #[test]
    fn strip_iac_negotiation_commands() {
        let data = [b'h', b'i', IAC, WILL, 1, b'!'];
        assert_eq!(strip_iac(&data), b"hi!");
        let data = [IAC, DO, 3, b'a', b'b'];
        assert_eq!(strip_iac(&data), b"ab");
    }

    #[test]
    fn strip_iac_subnegotiation() {
        let data = [b'x', IAC, SB, 24, 0, IAC, SE, b'y'];
        assert_eq!(strip_iac(&data), b"xy");
    }

    #[test]
    fn strip_iac_escaped_iac() {
        let data = [IAC, IAC, b'z'];
        assert_eq!(strip_iac(&data), vec![IAC, b'z']);
    }

    #[test]
    fn line_buffer_splits_lines() {
        let mut lb = LineBuffer::new();
        assert_eq!(lb.feed(b"line1\nline2\n"), vec!["line1", "line2"]);
    }

    #[test]
    fn line_buffer_joins_partial_reads() {
        let mut lb = LineBuffer::new();
        assert!(lb.feed(b"hel").is_empty());
        assert_eq!(lb.feed(b"lo\n"), vec!["hello"]);
    }

    #[test]
    fn line_buffer_handles_crlf() {
        let mut lb = LineBuffer::new();
        assert_eq!(lb.feed(b"hello\r\n"), vec!["hello"]);
    }

    #[test]
    fn line_buffer_caps_length() {
        let mut lb = LineBuffer::new();
        lb.feed(&vec![b'x'; 5000]);
        let lines = lb.feed(b"\n");
        assert_eq!(lines[0].len(), MAX_LINE_LEN);
    }
}
