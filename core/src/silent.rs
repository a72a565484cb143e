//! Fire-and-forget view of a `PodClient`.
//!
//! Nothing here returns an error. Failures have already been handed to the
//! client's observer by the time they are dropped, so the log is the only
//! place they show up. Reads degrade to an empty sequence, so "no records"
//! and "could not read" look the same to the caller.

use crate::client::PodClient;
use crate::codec::Record;
use crate::observer::PodObserver;
use crate::transport::Transport;

pub struct FailSilent<'a, T, O> {
    client: &'a PodClient<T, O>,
}

impl<'a, T: Transport, O: PodObserver> FailSilent<'a, T, O> {
    pub fn new(client: &'a PodClient<T, O>) -> Self {
        Self { client }
    }

    pub fn create_container(&self, container: &str) {
        let _ = self.client.create_container(container);
    }

    pub fn publish_data(&self, container: &str, file: &str, records: &[Record]) {
        let _ = self.client.publish_data(container, file, records);
    }

    pub fn read_data(&self, container: &str, file: &str) -> Vec<String> {
        self.client.read_data(container, file).unwrap_or_default()
    }

    pub fn update_data(&self, container: &str, file: &str, new_records: &[Record]) {
        let _ = self.client.update_data(container, file, new_records);
    }
}
