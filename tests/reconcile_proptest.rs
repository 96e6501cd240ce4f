//! Property-based tests for edit-script computation and replay.

use list_reconciler::*;
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

fn same(a: &u8, b: &u8) -> bool {
    a == b
}

/// Small alphabet so that lists share plenty of elements.
fn list() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(0u8..6, 0..12)
}

/// A list and a subsequence of it.
fn list_and_subsequence() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    list().prop_flat_map(|full| {
        let len = full.len();
        (Just(full), prop::collection::vec(any::<bool>(), len))
    })
    .prop_map(|(full, keep)| {
        let sub: Vec<u8> = full.iter().zip(&keep).filter(|(_, k)| **k).map(|(v, _)| *v).collect();
        (full, sub)
    })
}

/// Element with a stable identity and a payload that may change between versions.
#[derive(Debug, Clone, PartialEq)]
struct Entry {
    id: u8,
    payload: u8,
}

fn same_entry(a: &Entry, b: &Entry) -> bool {
    a.id == b.id
}

/// Few ids and few payloads, so identical ids with different payloads are common.
fn entries() -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec((0u8..5, 0u8..3).prop_map(|(id, payload)| Entry { id, payload }), 0..12)
}

fn identity_engine(refresh: RefreshPolicy) -> DiffEngine {
    DiffEngine::with_options(ReconcileOptions::default().refresh(refresh))
}

proptest! {
    #[test]
    fn applying_the_script_converges(source in list(), target in list()) {
        let script = compute_edit_script(&source, &target, same).unwrap();
        let mut model = source.clone();
        apply_edit_script(&mut model, &script).unwrap();
        prop_assert_eq!(model, target);
    }

    #[test]
    fn always_refresh_also_converges(source in list(), target in list()) {
        let engine = DiffEngine::with_options(ReconcileOptions::default().refresh(RefreshPolicy::Always));
        let script = engine.compute(&source, &target, &same).unwrap();
        let mut model = source.clone();
        apply_edit_script(&mut model, &script).unwrap();
        prop_assert_eq!(model, target);
    }

    #[test]
    fn identical_lists_give_empty_script(source in list()) {
        let script = compute_edit_script(&source, &source, same).unwrap();
        prop_assert!(script.is_empty());
    }

    #[test]
    fn growing_into_a_supersequence_only_inserts((full, sub) in list_and_subsequence()) {
        let script = compute_edit_script(&sub, &full, same).unwrap();
        prop_assert_eq!(script.inserts(), full.len() - sub.len());
        prop_assert_eq!(script.len(), script.inserts());
    }

    #[test]
    fn shrinking_into_a_subsequence_only_removes((full, sub) in list_and_subsequence()) {
        let script = compute_edit_script(&full, &sub, same).unwrap();
        prop_assert_eq!(script.removes(), full.len() - sub.len());
        prop_assert_eq!(script.len(), script.removes());
    }

    #[test]
    fn distance_is_symmetric_and_bounded(source in list(), target in list()) {
        let forward = edit_distance(&source, &target, same).unwrap();
        let backward = edit_distance(&target, &source, same).unwrap();
        prop_assert_eq!(forward, backward);
        prop_assert!(forward <= source.len().max(target.len()));
        prop_assert!(forward >= source.len().abs_diff(target.len()));
    }

    #[test]
    fn script_cost_matches_distance(source in list(), target in list()) {
        let script = compute_edit_script(&source, &target, same).unwrap();
        // Under the default policy every update in a by-value diff is a substitution.
        prop_assert_eq!(script.len(), script.distance());
    }

    #[test]
    fn observers_see_one_change_per_operation(source in list(), target in list()) {
        let seen = Rc::new(RefCell::new(0usize));
        let mut model = ObservableList::from(source);
        let counter = Rc::clone(&seen);
        model.add_observer(move |_| *counter.borrow_mut() += 1);

        let script = transform(&mut model, &target, same).unwrap();
        prop_assert_eq!(*seen.borrow(), script.len());
        prop_assert_eq!(model.as_slice(), target.as_slice());
    }

    #[test]
    fn identity_diff_converges_under_changed(source in entries(), target in entries()) {
        let script = identity_engine(RefreshPolicy::Changed).compute(&source, &target, &same_entry).unwrap();
        prop_assert!(script.inserts() + script.removes() <= script.distance());

        let mut model = ObservableList::from(source);
        apply_edit_script(&mut model, &script).unwrap();
        prop_assert_eq!(model.as_slice(), target.as_slice());
    }

    #[test]
    fn identity_diff_converges_under_always(source in entries(), target in entries()) {
        let script = identity_engine(RefreshPolicy::Always).compute(&source, &target, &same_entry).unwrap();
        prop_assert!(script.inserts() + script.removes() <= script.distance());

        let mut model = source.clone();
        apply_edit_script(&mut model, &script).unwrap();
        prop_assert_eq!(model, target);
    }
}
