//! Property tests for the session book and form helpers.

use proptest::prelude::*;
use sb_common::{CustomField, Session};
use sb_core::form::{custom_field_key, custom_field_label, entries_for, session_from_entries};
use sb_core::{SessionBook, SubmitOutcome};

fn tea(name: &str) -> Session {
    Session::new("2024-01-01T10:00", name)
}

fn arb_slug() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-z]{1,8}", 1..4).prop_map(|words| words.join("-"))
}

fn arb_session() -> impl Strategy<Value = Session> {
    (
        "[a-zA-Z ]{1,12}",
        "[a-z]{0,10}",
        prop::collection::vec("[a-z]{1,10}", 0..4),
        prop::collection::btree_map(arb_slug(), "[a-z0-9]{1,6}", 0..3),
    )
        .prop_map(|(tea_name, origin, steeps, custom)| {
            let mut session = tea(&tea_name);
            session.origin = origin;
            session.steeps = steeps;
            session.custom_fields = custom
                .into_iter()
                .map(|(slug, value)| CustomField::new(format!("custom-{slug}"), value))
                .collect();
            session
        })
}

proptest! {
    #[test]
    fn prop_key_label_key_is_stable(slug in arb_slug()) {
        let key = format!("custom-{slug}");
        let label = custom_field_label(&key);
        prop_assert_eq!(custom_field_key(&label).unwrap(), key);
    }

    #[test]
    fn prop_keys_have_no_whitespace(label in "[A-Za-z]{1,6}([ \t]{1,3}[A-Za-z]{1,6}){0,3}") {
        let key = custom_field_key(&label).unwrap();
        prop_assert!(key.starts_with("custom-"));
        prop_assert!(!key.chars().any(char::is_whitespace));
        prop_assert_eq!(key.to_lowercase(), key.clone());
    }

    #[test]
    fn prop_form_entries_reproduce_session(session in arb_session()) {
        prop_assert_eq!(session_from_entries(entries_for(&session)), session);
    }

    #[test]
    fn prop_submit_appends_or_updates(len in 1usize..8, pick in 0usize..8, edit in any::<bool>()) {
        let mut book = SessionBook::from_sessions((0..len).map(|i| tea(&i.to_string())).collect());
        let index = pick % len;
        if edit {
            book.begin_edit(index).unwrap();
        }
        let outcome = book.submit(tea("new")).unwrap();
        if edit {
            prop_assert_eq!(outcome, SubmitOutcome::Updated { index });
            prop_assert_eq!(book.len(), len);
        } else {
            prop_assert_eq!(outcome, SubmitOutcome::Appended { index: len });
            prop_assert_eq!(book.len(), len + 1);
        }
        prop_assert_eq!(&book.get(outcome.index()).unwrap().tea_name, "new");
        prop_assert_eq!(book.editing(), None);
    }

    #[test]
    fn prop_remove_keeps_edit_on_same_session(len in 2usize..8, a in 0usize..8, b in 0usize..8) {
        let mut book = SessionBook::from_sessions((0..len).map(|i| tea(&i.to_string())).collect());
        let editing = a % len;
        let removed = b % len;
        book.begin_edit(editing).unwrap();
        book.remove(removed).unwrap();

        if editing == removed {
            prop_assert_eq!(book.editing(), None);
        } else {
            let index = book.editing().unwrap();
            prop_assert_eq!(&book.get(index).unwrap().tea_name, &editing.to_string());
        }
    }
}
