//! A naive, simple oracle for differential testing.
//!
//! Computes the merged text of two concurrent edits directly, character by
//! character, without transforming either edit.
use docshare_ot::Operation;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Cell {
    ch: char,
    removed: bool,
}

/// Merge an owner edit and a participant edit authored against `document`.
///
/// A character survives unless either edit removes it. Inserted text goes to
/// its edit's offset, or to the start of the other edit's removed span when
/// the offset lies strictly inside it. On the same position the owner's text
/// comes first.
pub fn merge(document: &str, owner: &Operation, participant: &Operation) -> String {
    let mut cells: Vec<Cell> = document
        .chars()
        .map(|ch| Cell { ch, removed: false })
        .collect();
    for op in [owner, participant] {
        for cell in cells.iter_mut().skip(op.offset()).take(op.length()) {
            cell.removed = true;
        }
    }

    let owner_at = anchor(owner, participant);
    let participant_at = anchor(participant, owner);

    let mut out = String::new();
    for position in 0..=cells.len() {
        if owner_at == position {
            out.push_str(owner.text());
        }
        if participant_at == position {
            out.push_str(participant.text());
        }
        if let Some(cell) = cells.get(position)
            && !cell.removed
        {
            out.push(cell.ch);
        }
    }
    out
}

fn anchor(op: &Operation, other: &Operation) -> usize {
    let inside = other.offset() < op.offset() && op.offset() < other.offset() + other.length();
    if inside { other.offset() } else { op.offset() }
}
