use std::path::PathBuf;
use std::sync::Once;

use ferret_core::{update, AppState, Effect, Msg, Node, NodeKind, RequestId};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ferret_logging::initialize_for_tests);
}

fn new_state() -> AppState {
    AppState::new("/home/user/Downloads")
}

fn go(state: AppState, url: &str) -> (AppState, Vec<Effect>) {
    update(state, Msg::Navigate(url.to_string()))
}

fn fetched(effects: &[Effect]) -> (RequestId, String) {
    match effects {
        [Effect::Fetch { request_id, url }] => (*request_id, url.clone()),
        other => panic!("expected a single fetch, got {other:?}"),
    }
}

fn ready_nodes(effects: Vec<Effect>) -> Vec<Node> {
    effects
        .into_iter()
        .flat_map(|effect| match effect {
            Effect::NodesReady { nodes, .. } => nodes,
            other => panic!("unexpected effect {other:?}"),
        })
        .collect()
}

fn data(request_id: RequestId, bytes: &[u8]) -> Msg {
    Msg::Data {
        request_id,
        bytes: bytes.to_vec(),
    }
}

#[test]
fn navigate_assigns_increasing_request_ids() {
    init_logging();
    let (state, effects) = go(new_state(), "gopher.example.org");
    assert_eq!(fetched(&effects), (1, "gopher://gopher.example.org".to_string()));

    let (mut state, effects) = go(state, "gopher://gopher.example.org/1/dir");
    assert_eq!(fetched(&effects).0, 2);

    let view = state.view();
    assert_eq!(view.request_id, Some(2));
    assert_eq!(view.location.as_deref(), Some("gopher://gopher.example.org/1/dir"));
    assert!(view.loading);
    assert!(view.can_go_back);
    assert!(!view.can_go_forward);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn stale_data_is_discarded() {
    init_logging();
    let (state, _) = go(new_state(), "gopher://a.example/1/one");
    let (state, _) = go(state, "gopher://a.example/1/two");
    assert_eq!(state.current_request_id(), Some(2));

    let (state, effects) = update(state, data(1, b"1Old\t/old\ta.example\t70\r\n"));
    assert!(effects.is_empty());

    let (state, effects) = update(
        state,
        Msg::TransferFailed {
            request_id: 1,
            message: "Timeout".into(),
        },
    );
    assert!(effects.is_empty());
    assert!(state.view().loading);

    let (_state, effects) = update(state, data(2, b"1New\t/new\ta.example\t70\r\n"));
    let nodes = ready_nodes(effects);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].url(), Some("gopher://a.example/1/new"));
}

#[test]
fn menu_chunks_carry_partial_lines_until_finished() {
    init_logging();
    let (state, effects) = go(new_state(), "gopher://a.example/1/");
    let (id, _) = fetched(&effects);

    let (state, effects) = update(state, data(id, b"1First\t/a\ta.example\t70\r\n0Sec"));
    assert_eq!(effects.len(), 1);
    let first = ready_nodes(effects);
    assert_eq!(first[0].display_text(), "First");

    let (state, effects) = update(state, data(id, b"ond\t/b\ta.example\t70"));
    assert!(effects.is_empty());

    let (mut state, effects) = update(state, Msg::TransferFinished { request_id: id });
    let rest = ready_nodes(effects);
    assert_eq!(rest.len(), 1);
    assert_eq!(rest[0].kind(), NodeKind::PlainFile);
    assert_eq!(rest[0].display_text(), "Second");
    assert!(!state.view().loading);
    assert!(state.consume_dirty());
}

#[test]
fn text_documents_are_decoded_as_lines() {
    init_logging();
    let (state, effects) = go(new_state(), "gopher://a.example/0/readme");
    let (id, _) = fetched(&effects);

    let (state, effects) = update(state, data(id, b"hello\r\nworld\r\n.\r\n"));
    let lines: Vec<String> = ready_nodes(effects)
        .iter()
        .map(|node| node.display_text().to_string())
        .collect();
    assert_eq!(lines, vec!["hello", "world"]);

    let (_state, effects) = update(state, Msg::TransferFinished { request_id: id });
    assert_eq!(
        effects,
        vec![Effect::NodesReady {
            request_id: id,
            nodes: Vec::new()
        }]
    );
}

#[test]
fn empty_response_still_opens_a_page() {
    init_logging();
    let (state, _) = go(new_state(), "gopher://h/1/full");
    let (state, _) = update(state, data(1, b"1Old\t/old\th\t70\r\n"));
    let (state, effects) = go(state, "gopher://h/1/empty");
    let (id, _) = fetched(&effects);

    let (mut state, effects) = update(state, Msg::TransferFinished { request_id: id });
    assert_eq!(
        effects,
        vec![Effect::NodesReady {
            request_id: id,
            nodes: Vec::new()
        }]
    );
    assert!(!state.view().loading);
    assert!(state.consume_dirty());
}

#[test]
fn stale_finish_is_ignored() {
    let (state, _) = go(new_state(), "gopher://h/1/a");
    let (state, _) = go(state, "gopher://h/1/b");

    let (next, effects) = update(state.clone(), Msg::TransferFinished { request_id: 1 });
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn new_navigation_resets_the_carry() {
    init_logging();
    let (state, _) = go(new_state(), "gopher://a.example/1/");
    let (state, _) = update(state, data(1, b"1Half a li"));
    let (state, _) = go(state, "gopher://a.example/1/other");

    let (_state, effects) = update(state, data(2, b"iFresh\t\ta.example\t70\r\n"));
    let nodes = ready_nodes(effects);
    assert_eq!(nodes.len(), 1);
    assert_eq!(nodes[0].display_text(), "Fresh");
}

#[test]
fn failure_of_current_request_becomes_the_document() {
    init_logging();
    let (state, effects) = go(new_state(), "gopher://nowhere.invalid");
    let (id, _) = fetched(&effects);

    let (state, effects) = update(
        state,
        Msg::TransferFailed {
            request_id: id,
            message: "Could not open address".into(),
        },
    );
    assert_eq!(
        effects,
        vec![Effect::ShowError {
            request_id: id,
            message: "Could not open address".into(),
        }]
    );
    assert!(!state.view().loading);
}

#[test]
fn back_and_forward_replay_without_truncating() {
    init_logging();
    let (state, _) = go(new_state(), "gopher://h/1/a");
    let (state, _) = go(state, "gopher://h/1/b");
    let (state, _) = go(state, "gopher://h/1/c");
    assert_eq!(state.history_position(), 3);

    let (state, effects) = update(state, Msg::Back);
    assert_eq!(fetched(&effects), (4, "gopher://h/1/b".to_string()));
    let (state, effects) = update(state, Msg::Back);
    assert_eq!(fetched(&effects).1, "gopher://h/1/a");
    let (state, effects) = update(state, Msg::Back);
    assert!(effects.is_empty());
    assert_eq!(state.history_position(), 1);
    assert_eq!(state.history().len(), 3);

    let (state, effects) = update(state, Msg::Forward);
    assert_eq!(fetched(&effects).1, "gopher://h/1/b");
    assert_eq!(state.current_location(), Some("gopher://h/1/b"));
    assert!(state.view().can_go_forward);
}

#[test]
fn navigating_after_back_drops_forward_history() {
    init_logging();
    let (state, _) = go(new_state(), "gopher://h/1/a");
    let (state, _) = go(state, "gopher://h/1/b");
    let (state, _) = go(state, "gopher://h/1/c");
    let (state, _) = update(state, Msg::Back);
    let (state, _) = update(state, Msg::Back);

    let (state, _) = go(state, "gopher://h/1/d");
    assert_eq!(state.history(), ["gopher://h/1/a", "gopher://h/1/d"]);
    assert_eq!(state.history_position(), 2);

    let (_state, effects) = update(state, Msg::Forward);
    assert!(effects.is_empty());
}

#[test]
fn up_moves_to_the_parent_directory() {
    init_logging();
    let (state, _) = go(new_state(), "gopher://h/1/a/b");
    let (state, effects) = update(state, Msg::Up);
    assert_eq!(fetched(&effects).1, "gopher://h/1/a");

    let (state, effects) = update(state, Msg::Up);
    assert_eq!(fetched(&effects).1, "gopher://h");
    assert_eq!(state.history().len(), 3);

    let (state, effects) = update(state, Msg::Up);
    assert!(effects.is_empty());
    assert_eq!(state.current_location(), Some("gopher://h"));
}

#[test]
fn up_without_location_is_noop() {
    let state = new_state();
    let (next, effects) = update(state.clone(), Msg::Up);
    assert!(effects.is_empty());
    assert_eq!(next, state);
}

#[test]
fn binary_items_are_downloaded_without_touching_the_view() {
    init_logging();
    let (state, _) = go(new_state(), "gopher://h/1/pub");
    let (state, effects) = go(state, "gopher://h/9/pub/archive.tar.gz");

    let expected_path = PathBuf::from("/home/user/Downloads").join("archive.tar.gz");
    assert_eq!(
        effects,
        vec![
            Effect::Download {
                request_id: 2,
                url: "gopher://h/9/pub/archive.tar.gz".to_string(),
                local_path: expected_path.clone(),
            },
            Effect::Notice(format!(
                "Downloading gopher://h/9/pub/archive.tar.gz to {}",
                expected_path.display()
            )),
        ]
    );
    assert_eq!(state.current_request_id(), Some(1));
    assert_eq!(state.current_location(), Some("gopher://h/1/pub"));
    assert_eq!(state.history().len(), 1);

    let (_state, effects) = update(state, data(1, b"iStill here\t\th\t70\r\n"));
    assert_eq!(ready_nodes(effects).len(), 1);
}

#[test]
fn images_and_audio_are_downloaded() {
    for url in ["gopher://h/I/cat.png", "gopher://h/g/dog.gif", "gopher://h/s/song.wav"] {
        let (_state, effects) = go(new_state(), url);
        assert!(
            matches!(effects.first(), Some(Effect::Download { .. })),
            "{url}: {effects:?}"
        );
    }
}

#[test]
fn search_submits_query_as_a_menu_request() {
    init_logging();
    let (state, effects) = update(
        new_state(),
        Msg::SubmitSearch {
            base_url: "gopher://h/7/find".into(),
            query: "ferret".into(),
        },
    );
    let (id, url) = fetched(&effects);
    assert_eq!(url, "gopher://h/7/find\tferret");

    let (_state, effects) = update(state, data(id, b"0Result\t/r\th\t70\r\n"));
    assert_eq!(ready_nodes(effects)[0].kind(), NodeKind::PlainFile);
}

#[test]
fn reload_replays_current_location() {
    init_logging();
    let (state, _) = go(new_state(), "gopher://h/0/file");
    let (state, effects) = update(state, Msg::Reload);

    assert_eq!(fetched(&effects), (2, "gopher://h/0/file".to_string()));
    assert_eq!(state.history().len(), 1);
}

#[test]
fn invalid_input_produces_a_notice() {
    let (state, effects) = go(new_state(), "gopher://host:99999/");
    assert!(matches!(effects.as_slice(), [Effect::Notice(_)]));
    assert_eq!(state.current_request_id(), None);
}
