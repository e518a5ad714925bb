use docshare_ot::Operation;
use proptest::collection::vec;
use proptest::prelude::*;
use proptest::sample::Index;
use site::Pair;

#[derive(Clone, Debug)]
enum Step {
    OwnerEdit(Index, Index, String),
    ParticipantEdit(Index, Index, String),
    DeliverToOwner,
    DeliverToParticipant,
}

fn steps() -> impl Strategy<Value = Vec<Step>> {
    let text = "[p-t]{0,3}";
    vec(
        prop_oneof![
            (any::<Index>(), any::<Index>(), text)
                .prop_map(|(offset, length, text)| Step::OwnerEdit(offset, length, text)),
            (any::<Index>(), any::<Index>(), text)
                .prop_map(|(offset, length, text)| Step::ParticipantEdit(offset, length, text)),
            Just(Step::DeliverToOwner),
            Just(Step::DeliverToParticipant),
        ],
        0..40,
    )
}

fn realize(len: usize, offset: &Index, length: &Index, text: &str) -> Operation {
    let offset = offset.index(len + 1);
    let length = length.index(len - offset + 1);
    Operation::new(offset, length, text)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_config::cases()))]
    #[test]
    fn prop_sites_converge_under_any_interleaving(doc in "[a-h]{0,16}", steps in steps()) {
        let mut pair = Pair::new(&doc);

        for step in &steps {
            match step {
                Step::OwnerEdit(offset, length, text) => {
                    let op = realize(pair.owner.len(), offset, length, text);
                    prop_assert!(pair.owner.edit(op).is_ok());
                }
                Step::ParticipantEdit(offset, length, text) => {
                    let op = realize(pair.participant.len(), offset, length, text);
                    prop_assert!(pair.participant.edit(op).is_ok());
                }
                Step::DeliverToOwner => {
                    prop_assert!(pair.deliver_to_owner().is_ok());
                }
                Step::DeliverToParticipant => {
                    prop_assert!(pair.deliver_to_participant().is_ok());
                }
            }
        }
        prop_assert!(pair.flush().is_ok());

        prop_assert_eq!(&pair.owner.text, &pair.participant.text);
        prop_assert_eq!(pair.owner.sync.document_len(), pair.owner.len());
        prop_assert_eq!(pair.participant.sync.document_len(), pair.participant.len());
    }

    #[test]
    fn prop_single_round_matches_oracle(
        doc in "[a-h]{0,16}",
        owner in (any::<Index>(), any::<Index>(), "[p-t]{0,3}"),
        participant in (any::<Index>(), any::<Index>(), "[p-t]{0,3}"),
        owner_first in any::<bool>(),
    ) {
        let len = doc.chars().count();
        let owner = realize(len, &owner.0, &owner.1, &owner.2);
        let participant = realize(len, &participant.0, &participant.1, &participant.2);
        let expected = docshare_ot_naive_oracle::merge(&doc, &owner, &participant);

        let mut pair = Pair::new(&doc);
        pair.owner.edit(owner).unwrap();
        pair.participant.edit(participant).unwrap();
        if owner_first {
            pair.deliver_to_participant().unwrap();
        }
        pair.flush().unwrap();

        prop_assert_eq!(&pair.owner.text, &expected);
        prop_assert_eq!(&pair.participant.text, &expected);
    }
}
