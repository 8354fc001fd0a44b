use std::path::{Path, PathBuf};

use crate::node::DisplayType;
use crate::view_model::PageView;

pub type RequestId = u64;

/// Navigation state owned by the consumer loop.
///
/// `history_position` is 1-based: 0 means nothing has been visited yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    history: Vec<String>,
    history_position: usize,
    last_request_id: RequestId,
    current_request_id: Option<RequestId>,
    incomplete_tail: Vec<u8>,
    display_type: DisplayType,
    location: Option<String>,
    loading: bool,
    downloads_dir: PathBuf,
    dirty: bool,
}

impl AppState {
    pub fn new(downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            downloads_dir: downloads_dir.into(),
            ..Self::default()
        }
    }

    pub fn view(&self) -> PageView {
        PageView {
            location: self.location.clone(),
            request_id: self.current_request_id,
            loading: self.loading,
            can_go_back: self.history_position > 1,
            can_go_forward: self.history_position < self.history.len(),
            dirty: self.dirty,
        }
    }

    pub fn current_location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn current_request_id(&self) -> Option<RequestId> {
        self.current_request_id
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn downloads_dir(&self) -> &Path {
        &self.downloads_dir
    }

    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn is_current(&self, request_id: RequestId) -> bool {
        self.current_request_id == Some(request_id)
    }

    pub(crate) fn display_type(&self) -> DisplayType {
        self.display_type
    }

    /// Ids are never reused, whether the request feeds the view or a download.
    pub(crate) fn next_request_id(&mut self) -> RequestId {
        self.last_request_id += 1;
        self.last_request_id
    }

    /// Makes `url` the location shown in the view and returns the id its
    /// response must carry.
    pub(crate) fn begin_request(&mut self, url: String, display_type: DisplayType) -> RequestId {
        let request_id = self.next_request_id();
        self.current_request_id = Some(request_id);
        self.incomplete_tail.clear();
        self.display_type = display_type;
        self.location = Some(url);
        self.loading = true;
        self.dirty = true;
        request_id
    }

    pub(crate) fn complete_request(&mut self) {
        self.incomplete_tail.clear();
        self.loading = false;
        self.dirty = true;
    }

    /// Drops any forward entries before appending.
    pub(crate) fn push_history(&mut self, url: &str) {
        self.history.truncate(self.history_position);
        self.history.push(url.to_string());
        self.history_position = self.history.len();
    }

    pub(crate) fn history_back(&mut self) -> Option<String> {
        if self.history_position <= 1 {
            return None;
        }
        self.history_position -= 1;
        self.history.get(self.history_position - 1).cloned()
    }

    pub(crate) fn history_forward(&mut self) -> Option<String> {
        if self.history_position >= self.history.len() {
            return None;
        }
        self.history_position += 1;
        self.history.get(self.history_position - 1).cloned()
    }

    pub(crate) fn take_tail(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.incomplete_tail)
    }

    pub(crate) fn set_tail(&mut self, tail: Vec<u8>) {
        self.incomplete_tail = tail;
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}
