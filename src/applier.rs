//! Replays edit scripts against list models
use crate::diff_engine::DiffEngine;
use crate::errors::ReconcilerError;
use crate::list_model::ListModel;
use crate::types::*;

/// Applies `script` to `model`, one model call per operation, in order.
///
/// The first failing operation aborts the replay. Operations before it stay
/// applied; there is no rollback.
pub fn apply_edit_script<T, M>(model: &mut M, script: &EditScript<T>) -> Result<(), ReconcilerError>
where
    T: Clone,
    M: ListModel<T> + ?Sized,
{
    log::debug!("Applier: replaying {} operations", script.len());
    for (step, operation) in script.iter().enumerate() {
        log::trace!("Applier: step {} {} at {}", step, operation.kind(), operation.index());
        let applied = match operation {
            EditOperation::Insert { index, value } => model.insert_at(*index, value.clone()),
            EditOperation::Remove { index } => model.remove_at(*index).map(drop),
            EditOperation::Update { index, value } => model.update_at(*index, value.clone()).map(drop),
        };
        if let Err(err) = applied {
            log::debug!("Applier: aborted at step {} of {}: {}", step, script.len(), err);
            return Err(ReconcilerError::ApplyFailed { step, source: Box::new(err) });
        }
    }
    Ok(())
}

/// Brings `model` in line with `target` and returns the script that was applied.
pub fn transform<T, M, F>(model: &mut M, target: &[T], equals: F) -> Result<EditScript<T>, ReconcilerError>
where
    T: Clone + PartialEq,
    M: ListModel<T> + ?Sized,
    F: Fn(&T, &T) -> bool,
{
    transform_with(model, target, &equals, ReconcileOptions::default())
}

pub fn transform_with<T, M, E>(
    model: &mut M,
    target: &[T],
    equals: &E,
    options: ReconcileOptions,
) -> Result<EditScript<T>, ReconcilerError>
where
    T: Clone + PartialEq,
    M: ListModel<T> + ?Sized,
    E: Equivalence<T> + ?Sized,
{
    let current = model.snapshot()?;
    let script = DiffEngine::with_options(options).compute(&current, target, equals)?;
    apply_edit_script(model, &script)?;
    Ok(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::list_model::ObservableList;

    /// Accepts a fixed number of mutations, then fails.
    struct Budgeted {
        items: Vec<i32>,
        budget: usize,
    }

    impl ListModel<i32> for Budgeted {
        fn snapshot(&self) -> Result<Vec<i32>, ReconcilerError> {
            Ok(self.items.clone())
        }

        fn insert_at(&mut self, index: usize, value: i32) -> Result<(), ReconcilerError> {
            self.spend()?;
            self.items.insert_at(index, value)
        }

        fn remove_at(&mut self, index: usize) -> Result<i32, ReconcilerError> {
            self.spend()?;
            self.items.remove_at(index)
        }

        fn update_at(&mut self, index: usize, value: i32) -> Result<i32, ReconcilerError> {
            self.spend()?;
            self.items.update_at(index, value)
        }
    }

    impl Budgeted {
        fn spend(&mut self) -> Result<(), ReconcilerError> {
            if self.budget == 0 {
                return Err(ReconcilerError::invalid("budget exhausted"));
            }
            self.budget -= 1;
            Ok(())
        }
    }

    #[test]
    fn transform_converges_and_returns_script() {
        let mut list = ObservableList::from(vec![1, 2, 3, 4, 5, 6]);
        let target = [2, 8, 4, 5, 7, 6];
        let script = transform(&mut list, &target, |a: &i32, b: &i32| a == b).unwrap();
        assert_eq!(list.as_slice(), &target);
        assert_eq!(script.distance(), 3);
    }

    #[test]
    fn failure_aborts_and_leaves_partial_state() {
        let mut model = Budgeted { items: vec![1, 2, 3], budget: 1 };
        let empty: [i32; 0] = [];
        let err = transform(&mut model, &empty, |a: &i32, b: &i32| a == b).unwrap_err();

        match err {
            ReconcilerError::ApplyFailed { step, source } => {
                assert_eq!(step, 1);
                assert!(matches!(*source, ReconcilerError::InvalidArgument { .. }));
            }
            other => panic!("unexpected error: {}", other),
        }
        assert_eq!(model.items, vec![1, 2]);
    }

    #[test]
    fn stale_script_reports_bad_index() {
        let script = DiffEngine::new().compute(&[1, 2, 3], &[1], &ByValue).unwrap();
        let mut shorter = vec![1];
        let err = apply_edit_script(&mut shorter, &script).unwrap_err();
        assert!(matches!(err, ReconcilerError::ApplyFailed { step: 0, .. }));
    }
}
