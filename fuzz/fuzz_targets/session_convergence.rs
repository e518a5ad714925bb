#![no_main]

//! Fuzz target for two synchronizers exchanging edits in arbitrary order.
//!
//! Every four input bytes drive one step: an edit at either site or the
//! delivery of the oldest in-flight message in either direction. After the
//! input is exhausted all messages are delivered and both documents must
//! be identical.

use docshare_ot::{
    ColaSynchronizer, Operation, SiteRole, SynchronizationStrategy, UpdateMessage,
};
use libfuzzer_sys::fuzz_target;
use std::collections::VecDeque;

struct Site {
    text: String,
    sync: ColaSynchronizer,
    outbox: VecDeque<UpdateMessage>,
}

impl Site {
    fn new(role: SiteRole, text: &str) -> Self {
        Self {
            text: text.to_string(),
            sync: ColaSynchronizer::new(role, text.chars().count()),
            outbox: VecDeque::new(),
        }
    }

    fn edit(&mut self, bytes: &[u8], text: &str) {
        let len = self.text.chars().count();
        let offset = bytes[0] as usize % (len + 1);
        let length = bytes[1] as usize % (len - offset + 1);
        let op = Operation::new(offset, length, text.repeat(bytes[2] as usize % 3));
        let msg = self.sync.register_outgoing_message(op).expect("edit fits");
        self.text = msg.operation().apply_to(&self.text).expect("edit fits");
        self.outbox.push_back(msg);
    }

    fn receive(&mut self, msg: UpdateMessage) {
        let op = self
            .sync
            .transform_incoming_message(msg)
            .expect("in-order delivery never faults");
        self.text = op.operation().apply_to(&self.text).expect("transformed edit fits");
    }
}

fn deliver(from: &mut Site, to: &mut Site) {
    if let Some(msg) = from.outbox.pop_front() {
        to.receive(msg);
    }
}

fuzz_target!(|data: &[u8]| {
    let mut owner = Site::new(SiteRole::Owner, "abcdefgh");
    let mut participant = Site::new(SiteRole::Participant, "abcdefgh");

    for chunk in data.chunks_exact(4) {
        match chunk[0] % 4 {
            0 => owner.edit(&chunk[1..], "o"),
            1 => participant.edit(&chunk[1..], "p"),
            2 => deliver(&mut participant, &mut owner),
            _ => deliver(&mut owner, &mut participant),
        }
    }

    while !owner.outbox.is_empty() || !participant.outbox.is_empty() {
        deliver(&mut owner, &mut participant);
        deliver(&mut participant, &mut owner);
    }

    assert_eq!(owner.text, participant.text);
});
