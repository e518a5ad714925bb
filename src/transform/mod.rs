//! Transform rule set.
//!
//! Every rule takes `to_be_transformed` (`b`) and `already_applied` (`a`),
//! both authored against the same document, and returns an operation that
//! has the effect of `b` on the document `a` produced. Rules are looked up
//! by `(kind of b, kind of a, direction)`.
//!
//! Both sites end up with the same text because every pair of rules
//! reproduces one merged result:
//!
//! - a character survives unless either operation removed it
//! - inserted text is anchored at its operation's offset, or at the start of
//!   the other operation's removed span when the offset lies strictly inside it
//! - two texts on the same anchor are ordered owner first
//!
//! The direction only decides that tie. [`Direction::ForParticipant`] means
//! `b` is the owner's operation and goes first.

use crate::core::{Operation, OperationKind};
use std::cmp::{max, min};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `b` yields position ties to `a`.
    ForOwner,
    /// `b` wins position ties against `a`.
    ForParticipant,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::ForOwner => Direction::ForParticipant,
            Direction::ForParticipant => Direction::ForOwner,
        }
    }

    fn index(self) -> usize {
        match self {
            Direction::ForOwner => 0,
            Direction::ForParticipant => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransformError {
    #[error(
        "transformed operation at {offset} removing {length} chars exceeds document length {document_len}"
    )]
    RangeViolation {
        offset: usize,
        length: usize,
        document_len: usize,
    },
}

pub type TransformFn = fn(&Operation, &Operation) -> Operation;

/// Indexed by kind of `b`, kind of `a`, then direction.
const RULES: [[[TransformFn; 2]; 3]; 3] = [
    // b: Insertion
    [
        [insertion_vs_insertion::<false>, insertion_vs_insertion::<true>],
        [insertion_vs_removal::<false>, insertion_vs_removal::<true>],
        [insertion_vs_removal::<false>, insertion_vs_removal::<true>],
    ],
    // b: Deletion
    [
        [removal_vs_insertion::<false>, removal_vs_insertion::<true>],
        [deletion_vs_deletion, deletion_vs_deletion],
        [removal_vs_removal::<false>, removal_vs_removal::<true>],
    ],
    // b: Replacement
    [
        [removal_vs_insertion::<false>, removal_vs_insertion::<true>],
        [removal_vs_removal::<false>, removal_vs_removal::<true>],
        [removal_vs_removal::<false>, removal_vs_removal::<true>],
    ],
];

pub fn rule(
    to_be_transformed: OperationKind,
    already_applied: OperationKind,
    direction: Direction,
) -> TransformFn {
    RULES[to_be_transformed.index()][already_applied.index()][direction.index()]
}

/// Transform `to_be_transformed` so it can be applied after `already_applied`.
pub fn transform(
    to_be_transformed: &Operation,
    already_applied: &Operation,
    direction: Direction,
) -> Operation {
    let rule = rule(to_be_transformed.kind(), already_applied.kind(), direction);
    rule(to_be_transformed, already_applied)
}

/// Like [`transform`], then checks the result against the length of the
/// document it will be applied to.
pub fn transform_within(
    to_be_transformed: &Operation,
    already_applied: &Operation,
    direction: Direction,
    document_len: usize,
) -> Result<Operation, TransformError> {
    let transformed = transform(to_be_transformed, already_applied, direction);
    check_bounds(&transformed, document_len)?;
    Ok(transformed)
}

pub fn check_bounds(op: &Operation, document_len: usize) -> Result<(), TransformError> {
    if op.fits(document_len) {
        Ok(())
    } else {
        Err(TransformError::RangeViolation {
            offset: op.offset(),
            length: op.length(),
            document_len,
        })
    }
}

fn insertion_vs_insertion<const PRIORITY: bool>(b: &Operation, a: &Operation) -> Operation {
    let offset = if a.offset() < b.offset() || (a.offset() == b.offset() && !PRIORITY) {
        b.offset() + a.text_len()
    } else {
        b.offset()
    };
    Operation::insert(offset, b.text())
}

/// `b` inserts, `a` removes a non-empty span and may insert.
fn insertion_vs_removal<const PRIORITY: bool>(b: &Operation, a: &Operation) -> Operation {
    let offset = if b.offset() < a.offset() {
        b.offset()
    } else if b.offset() >= a.end() {
        b.offset() - a.length() + a.text_len()
    } else if PRIORITY {
        // Clamped to the start of the removed span, ahead of a's text
        a.offset()
    } else {
        a.offset() + a.text_len()
    };
    Operation::insert(offset, b.text())
}

/// `b` removes a non-empty span and may insert, `a` only inserts.
fn removal_vs_insertion<const PRIORITY: bool>(b: &Operation, a: &Operation) -> Operation {
    let na = a.text_len();
    if a.offset() < b.offset() {
        return Operation::new(b.offset() + na, b.length(), b.text());
    }
    if a.offset() >= b.end() {
        return b.clone();
    }
    if a.offset() > b.offset() {
        // a's text lands inside the span b removes. Widen over it and put it
        // back so it survives, ordered against b's own text.
        let text = if PRIORITY {
            format!("{}{}", b.text(), a.text())
        } else {
            format!("{}{}", a.text(), b.text())
        };
        return Operation::new(b.offset(), b.length() + na, text);
    }
    if PRIORITY && !b.text().is_empty() {
        Operation::new(
            b.offset(),
            b.length() + na,
            format!("{}{}", b.text(), a.text()),
        )
    } else {
        Operation::new(b.offset() + na, b.length(), b.text())
    }
}

fn deletion_vs_deletion(b: &Operation, a: &Operation) -> Operation {
    if b.end() < a.offset() {
        return b.clone();
    }
    if b.offset() > a.end() {
        return Operation::delete(b.offset() - a.length(), b.length());
    }
    let before = a.offset().saturating_sub(b.offset());
    let after = b.end().saturating_sub(a.end());
    Operation::delete(min(a.offset(), b.offset()), before + after)
}

/// Both remove a non-empty span and at least one of them inserts.
fn removal_vs_removal<const PRIORITY: bool>(b: &Operation, a: &Operation) -> Operation {
    let na = a.text_len();
    if b.end() < a.offset() {
        return b.clone();
    }
    if b.offset() > a.end() {
        return Operation::new(b.offset() - a.length() + na, b.length(), b.text());
    }

    // The spans touch or overlap: every character of their union is removed
    // by one side or the other, so b rewrites that region to hold just the
    // two texts.
    let start = min(a.offset(), b.offset());
    let before = a.offset().saturating_sub(b.offset());
    let after = b.end().saturating_sub(a.end());
    debug_assert_eq!(start + before + a.length() + after, max(a.end(), b.end()));

    let anchor_a = clamp_anchor(a, b);
    let anchor_b = clamp_anchor(b, a);
    let a_first = anchor_a < anchor_b || (anchor_a == anchor_b && !PRIORITY);
    let a_leads = a_first || b.text().is_empty();
    let a_trails = !a_first || b.text().is_empty();

    if a_leads && before == 0 {
        Operation::new(start + na, after, b.text())
    } else if a_trails && after == 0 {
        Operation::new(start, before, b.text())
    } else if a_first {
        Operation::new(start, before + na + after, format!("{}{}", a.text(), b.text()))
    } else {
        Operation::new(start, before + na + after, format!("{}{}", b.text(), a.text()))
    }
}

/// Where `op`'s text lands in the merged document, in original coordinates.
fn clamp_anchor(op: &Operation, other: &Operation) -> usize {
    if other.offset() < op.offset() && op.offset() < other.end() {
        other.offset()
    } else {
        op.offset()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_every_kind_pair() {
        let ops = [
            Operation::insert(2, "xy"),
            Operation::delete(1, 3),
            Operation::new(2, 2, "z"),
        ];
        for b in &ops {
            for a in &ops {
                for direction in [Direction::ForOwner, Direction::ForParticipant] {
                    let transformed = transform(b, a, direction);
                    let doc_after_a = a.resulting_len(6);
                    assert!(transformed.fits(doc_after_a), "{b} vs {a}: {transformed}");
                }
            }
        }
    }

    #[test]
    fn test_insertion_tie_by_direction() {
        let b = Operation::insert(5, "B");
        let a = Operation::insert(5, "A");
        assert_eq!(
            transform(&b, &a, Direction::ForOwner),
            Operation::insert(6, "B")
        );
        assert_eq!(
            transform(&b, &a, Direction::ForParticipant),
            Operation::insert(5, "B")
        );
    }

    #[test]
    fn test_insertion_clamped_into_removed_span() {
        let b = Operation::insert(4, "!");
        let a = Operation::new(2, 5, "xyz");
        assert_eq!(
            transform(&b, &a, Direction::ForOwner),
            Operation::insert(5, "!")
        );
        assert_eq!(
            transform(&b, &a, Direction::ForParticipant),
            Operation::insert(2, "!")
        );
    }

    #[test]
    fn test_deletion_keeps_foreign_insertion() {
        let b = Operation::delete(2, 4);
        let a = Operation::insert(4, "new");
        assert_eq!(
            transform(&b, &a, Direction::ForOwner),
            Operation::new(2, 7, "new")
        );
    }

    #[test]
    fn test_deletion_shifted_left_by_prior_overlap() {
        let b = Operation::delete(3, 4);
        let a = Operation::delete(1, 4);
        assert_eq!(
            transform(&b, &a, Direction::ForOwner),
            Operation::delete(1, 2)
        );
    }

    #[test]
    fn test_range_violation() {
        let b = Operation::delete(8, 2);
        let a = Operation::insert(0, "x");
        assert_eq!(
            transform_within(&b, &a, Direction::ForOwner, 10),
            Err(TransformError::RangeViolation {
                offset: 9,
                length: 2,
                document_len: 10
            })
        );
    }
}
