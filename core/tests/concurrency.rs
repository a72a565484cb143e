//! Two writers appending to the same resource at the same time.
//!
//! Each writer gets its own client whose first GET waits at a shared
//! barrier, so both read the resource before either writes.

mod common;

use std::sync::{Arc, Barrier};

use common::GatedTransport;
use pod_core::{PodClient, Record, UreqTransport};

fn race(pod: &str, append: fn(&PodClient<GatedTransport>, Record)) {
    let barrier = Arc::new(Barrier::new(2));
    let writers = [("x", barrier.clone()), ("y", barrier)];
    std::thread::scope(|scope| {
        for (value, barrier) in writers {
            scope.spawn(move || {
                let client = PodClient::new(pod, GatedTransport::new(barrier));
                append(&client, Record::from(value));
            });
        }
    });
}

#[test]
fn concurrent_update_data_can_lose_an_update() {
    let pod = common::spawn_pod();
    race(&pod, |client, record| {
        client.update_data("shared", "log.txt", &[record]).unwrap();
    });

    let reader = PodClient::new(&pod, UreqTransport::default());
    let mut stored = reader.read_data("shared", "log.txt").unwrap();
    stored.sort();
    assert_eq!(stored.len(), 1, "one append overwrote the other: {stored:?}");
    assert!(stored == ["x"] || stored == ["y"]);
}

#[test]
fn concurrent_append_data_keeps_both_records() {
    let pod = common::spawn_pod();
    race(&pod, |client, record| {
        client.append_data("shared", "log.txt", &[record]).unwrap();
    });

    let reader = PodClient::new(&pod, UreqTransport::default());
    let mut stored = reader.read_data("shared", "log.txt").unwrap();
    stored.sort();
    assert_eq!(stored, vec!["x", "y"]);
}
