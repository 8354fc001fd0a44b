use crate::RequestId;

/// Snapshot of the navigation state for the address bar and buttons.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageView {
    pub location: Option<String>,
    pub request_id: Option<RequestId>,
    pub loading: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
    pub dirty: bool,
}
