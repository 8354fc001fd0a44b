use std::thread;

use bytes::Bytes;
use ferret_engine::{Message, MessageKind, MessageQueue};
use pretty_assertions::assert_eq;

#[test]
fn pops_in_push_order() {
    let queue = MessageQueue::new();
    queue.push(Message::data(1, Bytes::from_static(b"a")));
    queue.push(Message::data(2, Bytes::from_static(b"x")));
    queue.push(Message::finished(1));

    assert_eq!(queue.len(), 3);
    assert_eq!(queue.pop(), Some(Message::data(1, Bytes::from_static(b"a"))));
    assert_eq!(
        queue.pop_all(),
        vec![Message::data(2, Bytes::from_static(b"x")), Message::finished(1)]
    );
    assert!(queue.is_empty());
    assert_eq!(queue.pop(), None);
}

#[test]
fn clones_share_one_queue() {
    let producer = MessageQueue::new();
    let consumer = producer.clone();
    producer.push(Message::error(9, "Timeout"));

    assert_eq!(
        consumer.pop().map(|m| m.kind),
        Some(MessageKind::Error("Timeout".into()))
    );
}

#[test]
fn per_request_order_survives_concurrent_producers() {
    let queue = MessageQueue::new();
    let producers: Vec<_> = (1..=4u64)
        .map(|request_id| {
            let queue = queue.clone();
            thread::spawn(move || {
                for seq in 0..200u32 {
                    queue.push(Message::data(request_id, Bytes::from(seq.to_be_bytes().to_vec())));
                }
                queue.push(Message::finished(request_id));
            })
        })
        .collect();
    for producer in producers {
        producer.join().unwrap();
    }

    let messages = queue.pop_all();
    assert_eq!(messages.len(), 4 * 201);
    for request_id in 1..=4u64 {
        let kinds: Vec<_> = messages
            .iter()
            .filter(|m| m.request_id == request_id)
            .map(|m| m.kind.clone())
            .collect();
        let expected: Vec<_> = (0..200u32)
            .map(|seq| MessageKind::Data(Bytes::from(seq.to_be_bytes().to_vec())))
            .chain(std::iter::once(MessageKind::Finished))
            .collect();
        assert!(kinds == expected, "request {request_id} out of order");
    }
}
