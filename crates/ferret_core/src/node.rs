use crate::address::{build_url, normalize_selector, DEFAULT_PORT};

/// Kind of resource a menu line points at, derived from its item-type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Directory,
    PlainText,
    PlainFile,
    Binary,
    Image,
    Audio,
    Search,
    Unknown,
}

impl NodeKind {
    pub fn from_item_type(code: char) -> Self {
        match code {
            'i' => NodeKind::PlainText,
            '1' => NodeKind::Directory,
            '0' => NodeKind::PlainFile,
            '4' | '5' | '6' | '9' => NodeKind::Binary,
            'g' | 'I' => NodeKind::Image,
            's' => NodeKind::Audio,
            '7' => NodeKind::Search,
            _ => NodeKind::Unknown,
        }
    }

    /// Kinds that are saved to disk instead of being shown.
    pub fn is_download(self) -> bool {
        matches!(self, NodeKind::Binary | NodeKind::Image | NodeKind::Audio)
    }

    /// How a response for this kind is decoded when it is shown in the view.
    pub fn display_type(self) -> DisplayType {
        match self {
            NodeKind::Directory | NodeKind::Search => DisplayType::Menu,
            _ => DisplayType::Text,
        }
    }
}

/// Decoder selected for the bytes of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayType {
    #[default]
    Menu,
    Text,
}

/// Addressing data carried by every node that can be followed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Raw bytes, exactly as the server advertised them.
    pub selector: Vec<u8>,
    pub host: String,
    pub port: String,
    pub url: String,
}

/// One renderable unit of a parsed response.
///
/// `link` is present exactly when `kind` is not [`NodeKind::PlainText`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    kind: NodeKind,
    item_type: char,
    display_text: String,
    link: Option<Link>,
}

impl Node {
    /// A line of plain text, either an `i` menu line or a document line.
    pub fn text(item_type: char, display_text: impl Into<String>) -> Self {
        Self {
            kind: NodeKind::PlainText,
            item_type,
            display_text: display_text.into(),
            link: None,
        }
    }

    /// A followable node. Selectors are made absolute and the URL is built from
    /// the normalized fields. Falls back to a text node for `i` lines.
    pub fn link(
        item_type: char,
        display_text: impl Into<String>,
        selector: &[u8],
        host: &str,
        port: &str,
    ) -> Self {
        let kind = NodeKind::from_item_type(item_type);
        if kind == NodeKind::PlainText {
            return Self::text(item_type, display_text);
        }
        let selector = normalize_selector(selector);
        let port = port.trim().to_string();
        let url = build_url(host, &port, item_type, &selector);
        Self {
            kind,
            item_type,
            display_text: display_text.into(),
            link: Some(Link {
                selector,
                host: host.to_string(),
                port,
                url,
            }),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn item_type(&self) -> char {
        self.item_type
    }

    pub fn display_text(&self) -> &str {
        &self.display_text
    }

    pub fn link_data(&self) -> Option<&Link> {
        self.link.as_ref()
    }

    pub fn url(&self) -> Option<&str> {
        self.link.as_ref().map(|link| link.url.as_str())
    }

    /// Serializes the node back into a menu line (without the line terminator).
    ///
    /// Text nodes that came from a truncated link line are written without any
    /// tab fields so they parse back into the same text node.
    pub fn to_menu_line(&self) -> Vec<u8> {
        let mut line = format!("{}{}", self.item_type, self.display_text).into_bytes();
        match &self.link {
            Some(link) => {
                line.push(b'\t');
                line.extend_from_slice(&link.selector);
                line.extend_from_slice(format!("\t{}\t{}", link.host, link.port).as_bytes());
            }
            None if self.item_type == 'i' => {
                line.extend_from_slice(format!("\t\terror.host\t{DEFAULT_PORT}").as_bytes());
            }
            None => {}
        }
        line
    }
}
