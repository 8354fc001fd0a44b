use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::Once;
use std::thread;
use std::time::{Duration, Instant};

use ferret_engine::{
    EngineSettings, Message, MessageKind, MessageQueue, Poller, TransferRequest,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(ferret_logging::initialize_for_tests);
}

fn run_until_idle(poller: &mut Poller) -> usize {
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut cycles = 0;
    while poller.live_transfers() > 0 {
        assert!(Instant::now() < deadline, "transfers still live after {cycles} cycles");
        poller.run_once().unwrap();
        cycles += 1;
    }
    cycles
}

#[test]
fn run_once_drives_a_transfer_to_completion() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let server = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = String::new();
        BufReader::new(stream.try_clone().unwrap())
            .read_line(&mut request)
            .unwrap();
        stream.write_all(b"0hi\t/hi\th\t70\r\n").unwrap();
        request
    });

    let queue = MessageQueue::new();
    let mut poller = Poller::new(queue.clone(), EngineSettings::default()).unwrap();
    poller.submit(TransferRequest::stream(7, format!("gopher://127.0.0.1:{port}/1/menu")));
    assert_eq!(poller.live_transfers(), 1);

    // START, CONNECTING, SENDING_REQUEST and RECEIVING each take a cycle.
    assert!(run_until_idle(&mut poller) >= 4);
    assert_eq!(server.join().unwrap(), "/menu\r\n");

    let messages = queue.pop_all();
    let data: Vec<u8> = messages
        .iter()
        .filter_map(|m| match &m.kind {
            MessageKind::Data(bytes) => Some(bytes.to_vec()),
            _ => None,
        })
        .flatten()
        .collect();
    assert_eq!(data, b"0hi\t/hi\th\t70\r\n".to_vec());
    assert_eq!(messages.last(), Some(&Message::finished(7)));
}

#[test]
fn idle_poller_cycles_without_transfers() {
    let queue = MessageQueue::new();
    let mut poller = Poller::new(queue.clone(), EngineSettings::default()).unwrap();

    poller.run_once().unwrap();
    assert_eq!(poller.live_transfers(), 0);
    assert!(queue.is_empty());
}

#[test]
fn failed_transfers_are_retired_in_one_cycle() {
    init_logging();
    let queue = MessageQueue::new();
    let mut poller = Poller::new(queue.clone(), EngineSettings::default()).unwrap();
    poller.submit(TransferRequest::stream(8, "gopher:///1/"));

    poller.run_once().unwrap();
    assert_eq!(poller.live_transfers(), 0);
    let messages = queue.pop_all();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].request_id, 8);
    assert!(
        matches!(&messages[0].kind, MessageKind::Error(text) if text.starts_with("Invalid address")),
        "{messages:?}"
    );
}
