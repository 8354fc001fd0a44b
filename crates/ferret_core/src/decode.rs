//! Protocol decoder: raw response bytes into menu nodes or document lines.
//!
//! Both decoders take the bytes of one chunk plus the carry left over from the
//! previous chunk of the same response, and return the newly completed output
//! together with the new carry. Feeding a response in arbitrary chunks and then
//! calling the matching `finish_*` gives the same result as feeding it whole.

use chardetng::EncodingDetector;

use crate::node::{Node, NodeKind};

/// Parses every complete menu line in `carry + bytes`.
pub fn parse_menu(bytes: &[u8], carry: &[u8]) -> (Vec<Node>, Vec<u8>) {
    let buffer = join(carry, bytes);
    let (lines, tail) = split_complete_lines(&buffer);
    let nodes = lines.into_iter().filter_map(parse_menu_line).collect();
    (nodes, tail.to_vec())
}

/// Flushes a menu carry once the connection has closed.
pub fn finish_menu(carry: &[u8]) -> Vec<Node> {
    parse_menu_line(carry).into_iter().collect()
}

/// Parses one menu line (with or without its trailing CR).
///
/// Only the display text and the host/port fields are decoded; the selector
/// keeps its raw bytes so the request sent back matches what was advertised.
pub fn parse_menu_line(raw: &[u8]) -> Option<Node> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    if raw.len() <= 1 {
        return None;
    }

    let fields: Vec<&[u8]> = raw.split(|byte| *byte == b'\t').collect();
    let head = decode_line(fields[0]);
    let mut chars = head.chars();
    let item_type = chars.next()?;
    let display_text = chars.as_str();

    if NodeKind::from_item_type(item_type) == NodeKind::PlainText {
        return Some(Node::text(item_type, display_text));
    }
    match fields.as_slice() {
        [_, selector, host, port, ..] if !port.trim_ascii().is_empty() => Some(Node::link(
            item_type,
            display_text,
            selector,
            &decode_line(host),
            &decode_line(port),
        )),
        _ => Some(Node::text(item_type, display_text)),
    }
}

/// Parses every complete document line in `carry + bytes`, stripping CRs.
///
/// A `"."` line that ends the available input is kept in the carry: it is the
/// body terminator unless more content follows it.
pub fn parse_text(bytes: &[u8], carry: &[u8]) -> (Vec<String>, Vec<u8>) {
    let buffer = join(carry, bytes);
    let (mut lines, tail) = split_complete_lines(&buffer);

    let mut held = Vec::new();
    if tail.is_empty() && lines.last().is_some_and(|line| is_terminator(line)) {
        if let Some(last) = lines.pop() {
            held.extend_from_slice(last);
            held.push(b'\n');
        }
    }

    let text = lines.into_iter().map(clean_text_line).collect();
    if held.is_empty() {
        (text, tail.to_vec())
    } else {
        (text, held)
    }
}

/// Flushes a document carry once the connection has closed, dropping the
/// terminator line.
pub fn finish_text(carry: &[u8]) -> Vec<String> {
    let carry = carry.strip_suffix(b"\n").unwrap_or(carry);
    if carry.is_empty() || is_terminator(carry) {
        return Vec::new();
    }
    vec![clean_text_line(carry)]
}

fn is_terminator(line: &[u8]) -> bool {
    line.iter().filter(|b| **b != b'\r').eq(b".".iter())
}

fn clean_text_line(line: &[u8]) -> String {
    let stripped: Vec<u8> = line.iter().copied().filter(|b| *b != b'\r').collect();
    decode_line(&stripped)
}

fn join(carry: &[u8], bytes: &[u8]) -> Vec<u8> {
    let mut buffer = Vec::with_capacity(carry.len() + bytes.len());
    buffer.extend_from_slice(carry);
    buffer.extend_from_slice(bytes);
    buffer
}

/// Splits on `\n`; the bytes after the last newline are the incomplete tail.
fn split_complete_lines(buffer: &[u8]) -> (Vec<&[u8]>, &[u8]) {
    let mut lines = Vec::new();
    let mut start = 0;
    for (idx, byte) in buffer.iter().enumerate() {
        if *byte == b'\n' {
            lines.push(&buffer[start..idx]);
            start = idx + 1;
        }
    }
    (lines, &buffer[start..])
}

/// Decodes one line: UTF-8 when valid, otherwise the most likely legacy encoding.
pub fn decode_line(bytes: &[u8]) -> String {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return text.to_string();
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}
