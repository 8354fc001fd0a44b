use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User entered an address or followed a link.
    Navigate(String),
    /// User asked to go one entry back in history.
    Back,
    /// User asked to go one entry forward in history.
    Forward,
    /// User asked for the parent directory of the current location.
    Up,
    /// User asked to fetch the current location again.
    Reload,
    /// User submitted a query for a search item.
    SubmitSearch { base_url: String, query: String },
    /// Engine delivered a chunk of response bytes.
    Data { request_id: RequestId, bytes: Vec<u8> },
    /// Engine reported a failed transfer.
    TransferFailed { request_id: RequestId, message: String },
    /// Engine reported that the connection closed normally.
    TransferFinished { request_id: RequestId },
}
