//! Conversions between Python objects and the reconciler's element and script types
use crate::types::{EditOperation, EditScript};
use pyo3::prelude::*;
use pyo3::types::PyList;
use std::cell::RefCell;

thread_local! {
    // First exception raised by `__eq__` inside `PyElement::eq`.
    static EQ_FAILURE: RefCell<Option<PyErr>> = const { RefCell::new(None) };
}

/// A Python object as a list element.
///
/// Clones share the same object; equality is Python `==`. `PartialEq` cannot
/// fail, so an exception from `__eq__` compares unequal and is parked until
/// [`take_eq_failure`] collects it.
pub struct PyElement(pub Py<PyAny>);

impl Clone for PyElement {
    fn clone(&self) -> Self {
        // Py<PyAny> clones need the interpreter attached
        Python::attach(|py| PyElement(self.0.clone_ref(py)))
    }
}

impl PartialEq for PyElement {
    fn eq(&self, other: &Self) -> bool {
        if self.0.as_ptr() == other.0.as_ptr() {
            return true;
        }
        Python::attach(|py| match self.0.bind(py).eq(other.0.bind(py)) {
            Ok(same) => same,
            Err(err) => {
                EQ_FAILURE.with(|slot| {
                    let mut slot = slot.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(err);
                    }
                });
                false
            }
        })
    }
}

/// Takes the first `__eq__` exception raised since the previous call, if any.
pub fn take_eq_failure() -> Option<PyErr> {
    EQ_FAILURE.with(|slot| slot.borrow_mut().take())
}

impl std::fmt::Debug for PyElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PyElement(<py-object>)")
    }
}

/// Collects any Python iterable into elements.
pub fn iterable_to_elements(iterable: &Bound<'_, PyAny>) -> PyResult<Vec<PyElement>> {
    let mut elements = Vec::new();
    for item in iterable.try_iter()? {
        elements.push(PyElement(item?.unbind()));
    }
    Ok(elements)
}

/// Renders a script as a list of `(kind, index, value)` tuples; removes carry `None`.
pub fn script_to_pylist<'py>(py: Python<'py>, script: EditScript<PyElement>) -> PyResult<Bound<'py, PyList>> {
    let list = PyList::empty(py);
    for operation in script {
        let kind = operation.kind().as_str();
        let entry = match operation {
            EditOperation::Insert { index, value } | EditOperation::Update { index, value } => {
                (kind, index, value.0)
            }
            EditOperation::Remove { index } => (kind, index, py.None()),
        };
        list.append(entry)?;
    }
    Ok(list)
}
