use std::path::PathBuf;

use crate::{Node, RequestId};

/// Work the runtime performs on behalf of the navigation model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Stream `url` into the view; its messages are tagged with `request_id`.
    Fetch { request_id: RequestId, url: String },
    /// Save `url` to `local_path` without touching the view.
    Download {
        request_id: RequestId,
        url: String,
        local_path: PathBuf,
    },
    /// Newly decoded nodes of the current response, in order.
    NodesReady {
        request_id: RequestId,
        nodes: Vec<Node>,
    },
    /// The current request failed; `message` replaces the document.
    ShowError {
        request_id: RequestId,
        message: String,
    },
    /// A one-line status for the user.
    Notice(String),
}
