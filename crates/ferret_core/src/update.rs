use crate::address::{item_type_of, normalize_input, parent_url, search_url, Address};
use crate::decode::{decode_line, finish_menu, finish_text, parse_menu, parse_text};
use crate::{download_file_name, AppState, DisplayType, Effect, Msg, Node, NodeKind, RequestId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Record,
    Replay,
}

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Navigate(input) => match normalize_input(&input) {
            Ok(url) => navigate(&mut state, url, HistoryMode::Record),
            Err(err) => vec![Effect::Notice(format!("{}: {err}", input.trim()))],
        },
        Msg::Back => match state.history_back() {
            Some(url) => navigate(&mut state, url, HistoryMode::Replay),
            None => Vec::new(),
        },
        Msg::Forward => match state.history_forward() {
            Some(url) => navigate(&mut state, url, HistoryMode::Replay),
            None => Vec::new(),
        },
        Msg::Up => match state.current_location().and_then(parent_url) {
            Some(url) => navigate(&mut state, url, HistoryMode::Record),
            None => Vec::new(),
        },
        Msg::Reload => match state.current_location().map(str::to_owned) {
            Some(url) => navigate(&mut state, url, HistoryMode::Replay),
            None => Vec::new(),
        },
        Msg::SubmitSearch { base_url, query } => {
            navigate(&mut state, search_url(&base_url, &query), HistoryMode::Record)
        }
        Msg::Data { request_id, bytes } => {
            if !state.is_current(request_id) {
                return (state, Vec::new());
            }
            let nodes = decode_chunk(&mut state, &bytes);
            nodes_ready(request_id, nodes)
        }
        Msg::TransferFinished { request_id } => {
            if !state.is_current(request_id) {
                return (state, Vec::new());
            }
            let carry = state.take_tail();
            let nodes = match state.display_type() {
                DisplayType::Menu => finish_menu(&carry),
                DisplayType::Text => text_nodes(finish_text(&carry)),
            };
            state.complete_request();
            // Sent even when empty; the renderer opens the page on it.
            vec![Effect::NodesReady { request_id, nodes }]
        }
        Msg::TransferFailed {
            request_id,
            message,
        } => {
            if !state.is_current(request_id) {
                return (state, Vec::new());
            }
            state.complete_request();
            vec![Effect::ShowError {
                request_id,
                message,
            }]
        }
    };

    (state, effects)
}

fn navigate(state: &mut AppState, url: String, history: HistoryMode) -> Vec<Effect> {
    let kind = NodeKind::from_item_type(item_type_of(&url));
    if kind.is_download() {
        return start_download(state, url);
    }

    if history == HistoryMode::Record {
        state.push_history(&url);
    }
    let request_id = state.begin_request(url.clone(), kind.display_type());
    vec![Effect::Fetch { request_id, url }]
}

fn start_download(state: &mut AppState, url: String) -> Vec<Effect> {
    let address = match Address::parse(&url) {
        Ok(address) => address,
        Err(err) => return vec![Effect::Notice(format!("{url}: {err}"))],
    };
    let request_id = state.next_request_id();
    let local_path = state
        .downloads_dir()
        .join(download_file_name(&decode_line(&address.selector), &url));
    state.mark_dirty();

    let notice = format!("Downloading {url} to {}", local_path.display());
    vec![
        Effect::Download {
            request_id,
            url,
            local_path,
        },
        Effect::Notice(notice),
    ]
}

fn decode_chunk(state: &mut AppState, bytes: &[u8]) -> Vec<Node> {
    let carry = state.take_tail();
    match state.display_type() {
        DisplayType::Menu => {
            let (nodes, tail) = parse_menu(bytes, &carry);
            state.set_tail(tail);
            nodes
        }
        DisplayType::Text => {
            let (lines, tail) = parse_text(bytes, &carry);
            state.set_tail(tail);
            text_nodes(lines)
        }
    }
}

fn text_nodes(lines: Vec<String>) -> Vec<Node> {
    lines.into_iter().map(|line| Node::text('i', line)).collect()
}

fn nodes_ready(request_id: RequestId, nodes: Vec<Node>) -> Vec<Effect> {
    if nodes.is_empty() {
        Vec::new()
    } else {
        vec![Effect::NodesReady { request_id, nodes }]
    }
}
