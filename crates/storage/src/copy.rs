//! PostgreSQL `COPY ... FROM STDIN` text format encoding.

use std::fmt::Write;

/// A single field of a COPY row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyValue<'a> {
    Int(i32),
    Text(&'a str),
}

impl From<i32> for CopyValue<'_> {
    fn from(value: i32) -> Self {
        CopyValue::Int(value)
    }
}

impl<'a> From<&'a str> for CopyValue<'a> {
    fn from(value: &'a str) -> Self {
        CopyValue::Text(value)
    }
}

impl<'a> From<&'a String> for CopyValue<'a> {
    fn from(value: &'a String) -> Self {
        CopyValue::Text(value.as_str())
    }
}

/// Rows encoded in COPY text format, ready to be streamed to the server.
#[derive(Debug, Default, Clone)]
pub struct CopyBuffer {
    data: String,
    rows: usize,
}

impl CopyBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_row(&mut self, values: &[CopyValue<'_>]) {
        for (idx, value) in values.iter().enumerate() {
            if idx > 0 {
                self.data.push('\t');
            }
            match value {
                CopyValue::Int(n) => {
                    // Writing into a String cannot fail.
                    let _ = write!(self.data, "{}", n);
                }
                CopyValue::Text(s) => push_escaped(&mut self.data, s),
            }
        }
        self.data.push('\n');
        self.rows += 1;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.data.as_bytes()
    }
}

fn push_escaped(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
}
