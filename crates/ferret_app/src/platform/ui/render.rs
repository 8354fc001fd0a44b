use std::io::Write;

use ferret_core::{Node, NodeKind, RequestId};
use ferret_logging::ferret_warn;

/// Receives the output of the navigation model for display.
pub trait PageRenderer {
    /// Nodes of `request_id`, in order. A new id starts a new page.
    fn on_nodes_ready(&mut self, request_id: RequestId, nodes: Vec<Node>);
    /// The request failed; `message` is shown as the document.
    fn on_error(&mut self, request_id: RequestId, message: &str);
    fn on_notice(&mut self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub kind: NodeKind,
    pub url: String,
}

/// Prints pages as plain lines, numbering every followable node.
pub struct TerminalRenderer<W: Write> {
    out: W,
    page: Option<RequestId>,
    links: Vec<LinkTarget>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            page: None,
            links: Vec::new(),
        }
    }

    /// Link by its 1-based number on the current page.
    pub fn link(&self, number: usize) -> Option<&LinkTarget> {
        number.checked_sub(1).and_then(|idx| self.links.get(idx))
    }

    pub fn prompt(&mut self, location: Option<&str>) {
        let location = location.unwrap_or("(nowhere)");
        self.emit(&format!("\n{location}> "), false);
    }

    fn begin_page(&mut self, request_id: RequestId) {
        if self.page != Some(request_id) {
            self.page = Some(request_id);
            self.links.clear();
            self.emit("", true);
        }
    }

    fn emit(&mut self, text: &str, newline: bool) {
        let result = if newline {
            writeln!(self.out, "{text}")
        } else {
            write!(self.out, "{text}").and_then(|()| self.out.flush())
        };
        if let Err(err) = result {
            ferret_warn!("Writing to terminal failed: {}", err);
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PageRenderer for TerminalRenderer<W> {
    fn on_nodes_ready(&mut self, request_id: RequestId, nodes: Vec<Node>) {
        self.begin_page(request_id);
        for node in nodes {
            let line = match node.url() {
                Some(url) => {
                    self.links.push(LinkTarget {
                        kind: node.kind(),
                        url: url.to_string(),
                    });
                    format!(
                        "[{:>3}] {} {}",
                        self.links.len(),
                        kind_label(node.kind()),
                        node.display_text()
                    )
                }
                None => format!("          {}", node.display_text()),
            };
            self.emit(&line, true);
        }
    }

    fn on_error(&mut self, request_id: RequestId, message: &str) {
        self.begin_page(request_id);
        self.emit(message, true);
    }

    fn on_notice(&mut self, message: &str) {
        self.emit(&format!("-- {message}"), true);
    }
}

fn kind_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Directory => "DIR",
        NodeKind::PlainFile => "TXT",
        NodeKind::Binary => "BIN",
        NodeKind::Image => "IMG",
        NodeKind::Audio => "SND",
        NodeKind::Search => "ASK",
        NodeKind::PlainText | NodeKind::Unknown => "???",
    }
}
