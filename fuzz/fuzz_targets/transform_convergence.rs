#![no_main]

//! Fuzz target for pairwise convergence of the transform rules.
//!
//! Two concurrent edits are derived from the input and applied at both sites
//! in opposite orders; the results must match each other and the naive merge.

use docshare_ot::{Direction, Operation, transform};
use libfuzzer_sys::fuzz_target;

const ALPHABET: &[char] = &['a', 'b', 'c', 'é', '😀'];

fn document(data: &[u8]) -> String {
    data.iter()
        .map(|b| ALPHABET[*b as usize % ALPHABET.len()])
        .collect()
}

/// Build an edit that fits a document of `len` chars from three bytes.
fn edit(len: usize, bytes: &[u8], text: &str) -> Operation {
    let offset = bytes[0] as usize % (len + 1);
    let length = bytes[1] as usize % (len - offset + 1);
    let text_len = bytes[2] as usize % 4;
    Operation::new(offset, length, text.repeat(text_len))
}

fuzz_target!(|data: &[u8]| {
    if data.len() < 7 {
        return;
    }

    let doc = document(&data[6..]);
    let len = doc.chars().count();
    let owner = edit(len, &data[0..3], "O");
    let participant = edit(len, &data[3..6], "P");

    let at_owner = owner
        .apply_to(&doc)
        .and_then(|d| transform(&participant, &owner, Direction::ForOwner).apply_to(&d))
        .expect("transformed participant edit fits at the owner");
    let at_participant = participant
        .apply_to(&doc)
        .and_then(|d| transform(&owner, &participant, Direction::ForParticipant).apply_to(&d))
        .expect("transformed owner edit fits at the participant");

    assert_eq!(
        at_owner, at_participant,
        "convergence violation!\nDocument: {doc:?}\nOwner: {owner}\nParticipant: {participant}"
    );
    assert_eq!(
        at_owner,
        docshare_ot_naive_oracle::merge(&doc, &owner, &participant)
    );
});
