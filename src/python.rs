//! Python module entry point
use crate::applier::apply_edit_script;
use crate::converters::{iterable_to_elements, script_to_pylist, take_eq_failure, PyElement};
use crate::diff_engine::DiffEngine;
use crate::errors::ReconcilerError;
use crate::list_model::ListModel;
use crate::types::{EditScript, OperationKind, ReconcileOptions, RefreshPolicy};
use pyo3::prelude::*;
use pyo3::types::PyList;
use std::cell::RefCell;

#[pyclass]
pub struct Reconciler {
    options: ReconcileOptions,
}

#[pymethods]
impl Reconciler {
    #[new]
    #[pyo3(signature = (refresh="changed", max_cells=None))]
    fn new(refresh: &str, max_cells: Option<usize>) -> PyResult<Self> {
        let refresh: RefreshPolicy = refresh.parse()?;
        log::debug!("Reconciler: created with refresh={} max_cells={:?}", refresh.as_str(), max_cells);
        Ok(Reconciler { options: ReconcileOptions { refresh, max_cells } })
    }

    #[getter]
    fn refresh(&self) -> &'static str {
        self.options.refresh.as_str()
    }

    /// Edit script from `source` to `target` as `(kind, index, value)` tuples.
    #[pyo3(signature = (source, target, equals=None))]
    fn compute<'py>(
        &self,
        py: Python<'py>,
        source: &Bound<'py, PyAny>,
        target: &Bound<'py, PyAny>,
        equals: Option<Bound<'py, PyAny>>,
    ) -> PyResult<Bound<'py, PyList>> {
        let source = iterable_to_elements(source)?;
        let target = iterable_to_elements(target)?;
        let script = self.compute_script(py, &source, &target, equals.as_ref())?;
        script_to_pylist(py, script)
    }

    #[pyo3(signature = (source, target, equals=None))]
    fn distance<'py>(
        &self,
        py: Python<'py>,
        source: &Bound<'py, PyAny>,
        target: &Bound<'py, PyAny>,
        equals: Option<Bound<'py, PyAny>>,
    ) -> PyResult<usize> {
        let source = iterable_to_elements(source)?;
        let target = iterable_to_elements(target)?;
        let predicate = PyPredicate::new(py, equals.as_ref());
        let distance = DiffEngine::with_options(self.options).distance(&source, &target, &|a: &PyElement, b: &PyElement| {
            predicate.call(a, b)
        });
        predicate.finish()?;
        Ok(distance?)
    }

    /// Edits `model` in place until it matches `target`, returning the applied script.
    ///
    /// `model` needs `insert(i, v)`, `pop(i)`, `__getitem__` and `__setitem__`;
    /// a plain list works.
    #[pyo3(signature = (model, target, equals=None))]
    fn transform<'py>(
        &self,
        py: Python<'py>,
        model: &Bound<'py, PyAny>,
        target: &Bound<'py, PyAny>,
        equals: Option<Bound<'py, PyAny>>,
    ) -> PyResult<Bound<'py, PyList>> {
        let current = iterable_to_elements(model)?;
        let mut model = PyListModel { target: model.clone(), failure: None };
        let target = iterable_to_elements(target)?;
        let script = self.compute_script(py, &current, &target, equals.as_ref())?;

        if let Err(err) = apply_edit_script(&mut model, &script) {
            return Err(match model.failure.take() {
                Some(raised) => raised,
                None => err.into(),
            });
        }
        script_to_pylist(py, script)
    }
}

impl Reconciler {
    fn compute_script<'py>(
        &self,
        py: Python<'py>,
        source: &[PyElement],
        target: &[PyElement],
        equals: Option<&Bound<'py, PyAny>>,
    ) -> PyResult<EditScript<PyElement>> {
        // Drop anything left over from an earlier comparison on this thread.
        take_eq_failure();
        let predicate = PyPredicate::new(py, equals);
        let script = DiffEngine::with_options(self.options).compute(source, target, &|a: &PyElement, b: &PyElement| {
            predicate.call(a, b)
        });
        predicate.finish()?;
        // Refresh checks under `changed` go through `__eq__`.
        if let Some(err) = take_eq_failure() {
            return Err(err);
        }
        Ok(script?)
    }
}

/// Equality predicate backed by a Python callable, or `==` when none is given.
///
/// The first exception raised is kept and every later comparison reports
/// false, so the diff finishes quickly and the exception reaches the caller
/// unchanged.
struct PyPredicate<'a, 'py> {
    py: Python<'py>,
    equals: Option<&'a Bound<'py, PyAny>>,
    failure: RefCell<Option<PyErr>>,
}

impl<'a, 'py> PyPredicate<'a, 'py> {
    fn new(py: Python<'py>, equals: Option<&'a Bound<'py, PyAny>>) -> Self {
        PyPredicate { py, equals, failure: RefCell::new(None) }
    }

    fn call(&self, a: &PyElement, b: &PyElement) -> bool {
        if self.failure.borrow().is_some() {
            return false;
        }
        let (a, b) = (a.0.bind(self.py), b.0.bind(self.py));
        let result = match self.equals {
            Some(callable) => callable.call1((a, b)).and_then(|r| r.is_truthy()),
            None => a.eq(b),
        };
        match result {
            Ok(same) => same,
            Err(err) => {
                *self.failure.borrow_mut() = Some(err);
                false
            }
        }
    }

    fn finish(self) -> PyResult<()> {
        match self.failure.into_inner() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// List model over a mutable Python sequence.
struct PyListModel<'py> {
    target: Bound<'py, PyAny>,
    failure: Option<PyErr>,
}

impl PyListModel<'_> {
    fn stash(&mut self, err: PyErr) -> ReconcilerError {
        let converted = ReconcilerError::PythonError(err.to_string());
        self.failure = Some(err);
        converted
    }
}

impl ListModel<PyElement> for PyListModel<'_> {
    fn snapshot(&self) -> Result<Vec<PyElement>, ReconcilerError> {
        Ok(iterable_to_elements(&self.target)?)
    }

    fn insert_at(&mut self, index: usize, value: PyElement) -> Result<(), ReconcilerError> {
        match self.target.call_method1("insert", (index, value.0)) {
            Ok(_) => Ok(()),
            Err(err) => Err(self.stash(err)),
        }
    }

    fn remove_at(&mut self, index: usize) -> Result<PyElement, ReconcilerError> {
        match self.target.call_method1("pop", (index,)) {
            Ok(removed) => Ok(PyElement(removed.unbind())),
            Err(err) => Err(self.stash(err)),
        }
    }

    fn update_at(&mut self, index: usize, value: PyElement) -> Result<PyElement, ReconcilerError> {
        let replaced = self
            .target
            .get_item(index)
            .and_then(|old| self.target.set_item(index, value.0).map(|_| old));
        match replaced {
            Ok(old) => Ok(PyElement(old.unbind())),
            Err(err) => Err(self.stash(err)),
        }
    }
}

#[pymodule]
fn list_reconciler(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<Reconciler>()?;

    // Operation kinds as they appear in computed scripts
    m.add("INSERT", OperationKind::Insert.as_str())?;
    m.add("REMOVE", OperationKind::Remove.as_str())?;
    m.add("UPDATE", OperationKind::Update.as_str())?;

    Ok(())
}
