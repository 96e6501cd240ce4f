//! Edit operations, scripts, change notifications and reconcile options
use crate::errors::ReconcilerError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Decides whether two elements are "the same" for diffing purposes.
///
/// This is identity, not full value equality: two elements may be equivalent
/// while carrying different payloads, which is what `Update` is for.
/// Implementations must be reflexive and symmetric.
pub trait Equivalence<T: ?Sized> {
    fn is_equivalent(&self, a: &T, b: &T) -> bool;
}

impl<T: ?Sized, F> Equivalence<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn is_equivalent(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// Equivalence through `PartialEq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ByValue;

impl<T: PartialEq + ?Sized> Equivalence<T> for ByValue {
    fn is_equivalent(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Operation kind, with the names the Python module exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Insert,
    Remove,
    Update,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Insert => "INSERT",
            OperationKind::Remove => "REMOVE",
            OperationKind::Update => "UPDATE",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single step of an edit script. Indices refer to the container as it
/// stands when the step is applied, not to the original source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOperation<T> {
    Insert { index: usize, value: T },
    Remove { index: usize },
    Update { index: usize, value: T },
}

impl<T> EditOperation<T> {
    pub fn kind(&self) -> OperationKind {
        match self {
            EditOperation::Insert { .. } => OperationKind::Insert,
            EditOperation::Remove { .. } => OperationKind::Remove,
            EditOperation::Update { .. } => OperationKind::Update,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            EditOperation::Insert { index, .. }
            | EditOperation::Remove { index }
            | EditOperation::Update { index, .. } => *index,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            EditOperation::Insert { value, .. } | EditOperation::Update { value, .. } => Some(value),
            EditOperation::Remove { .. } => None,
        }
    }
}

impl<T: fmt::Debug> fmt::Display for EditOperation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOperation::Insert { index, value } => write!(f, "INSERT({}, {:?})", index, value),
            EditOperation::Remove { index } => write!(f, "REMOVE({})", index),
            EditOperation::Update { index, value } => write!(f, "UPDATE({}, {:?})", index, value),
        }
    }
}

/// Ordered edit operations plus the edit distance they were computed from.
///
/// `distance` counts inserts, removes and substitutions. Refresh updates
/// emitted for matched elements are free, so `len()` can exceed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditScript<T> {
    pub(crate) operations: Vec<EditOperation<T>>,
    pub(crate) distance: usize,
}

impl<T> Default for EditScript<T> {
    fn default() -> Self {
        EditScript { operations: Vec::new(), distance: 0 }
    }
}

impl<T> EditScript<T> {
    pub fn operations(&self) -> &[EditOperation<T>] {
        &self.operations
    }

    pub fn into_operations(self) -> Vec<EditOperation<T>> {
        self.operations
    }

    pub fn distance(&self) -> usize {
        self.distance
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EditOperation<T>> {
        self.operations.iter()
    }

    pub fn count(&self, kind: OperationKind) -> usize {
        self.operations.iter().filter(|op| op.kind() == kind).count()
    }

    pub fn inserts(&self) -> usize {
        self.count(OperationKind::Insert)
    }

    pub fn removes(&self) -> usize {
        self.count(OperationKind::Remove)
    }

    pub fn updates(&self) -> usize {
        self.count(OperationKind::Update)
    }
}

impl<T> IntoIterator for EditScript<T> {
    type Item = EditOperation<T>;
    type IntoIter = std::vec::IntoIter<EditOperation<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a EditScript<T> {
    type Item = &'a EditOperation<T>;
    type IntoIter = std::slice::Iter<'a, EditOperation<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

/// Notification emitted by an observable list after each mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum ListChange<T> {
    Inserted { index: usize, value: T },
    Removed { index: usize, value: T },
    Updated { index: usize, old: T, new: T },
}

impl<T> ListChange<T> {
    pub fn index(&self) -> usize {
        match self {
            ListChange::Inserted { index, .. }
            | ListChange::Removed { index, .. }
            | ListChange::Updated { index, .. } => *index,
        }
    }
}

/// When a zero-cost match should still produce an `Update`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPolicy {
    /// Only when the target value differs from the source value.
    #[default]
    Changed,
    /// For every matched pair.
    Always,
    /// Never; matched elements are left untouched.
    Never,
}

impl RefreshPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefreshPolicy::Changed => "changed",
            RefreshPolicy::Always => "always",
            RefreshPolicy::Never => "never",
        }
    }
}

impl std::str::FromStr for RefreshPolicy {
    type Err = ReconcilerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "changed" => Ok(RefreshPolicy::Changed),
            "always" => Ok(RefreshPolicy::Always),
            "never" => Ok(RefreshPolicy::Never),
            other => Err(ReconcilerError::invalid(format!(
                "unknown refresh policy '{}', expected one of: changed, always, never",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    pub refresh: RefreshPolicy,
    /// Upper bound on `(source.len() + 1) * (target.len() + 1)` table cells.
    pub max_cells: Option<usize>,
}

impl ReconcileOptions {
    pub fn from_json(json: &str) -> Result<Self, ReconcilerError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn refresh(mut self, refresh: RefreshPolicy) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = Some(max_cells);
        self
    }
}
