//! Mutable list models that edit scripts are replayed against
use crate::errors::ReconcilerError;
use crate::types::ListChange;
use std::fmt;

/// A mutable, index-addressed list.
///
/// Implementations reject out-of-range indices with an error instead of
/// panicking; an insert accepts `index == len`.
pub trait ListModel<T> {
    /// Current contents, in order.
    fn snapshot(&self) -> Result<Vec<T>, ReconcilerError>;

    fn insert_at(&mut self, index: usize, value: T) -> Result<(), ReconcilerError>;

    /// Removes and returns the element at `index`.
    fn remove_at(&mut self, index: usize) -> Result<T, ReconcilerError>;

    /// Replaces the element at `index`, returning the previous one.
    fn update_at(&mut self, index: usize, value: T) -> Result<T, ReconcilerError>;
}

impl<T: Clone> ListModel<T> for Vec<T> {
    fn snapshot(&self) -> Result<Vec<T>, ReconcilerError> {
        Ok(self.clone())
    }

    fn insert_at(&mut self, index: usize, value: T) -> Result<(), ReconcilerError> {
        if index > self.len() {
            return Err(ReconcilerError::IndexOutOfBounds { index, len: self.len() });
        }
        self.insert(index, value);
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<T, ReconcilerError> {
        if index >= self.len() {
            return Err(ReconcilerError::IndexOutOfBounds { index, len: self.len() });
        }
        Ok(self.remove(index))
    }

    fn update_at(&mut self, index: usize, value: T) -> Result<T, ReconcilerError> {
        let len = self.len();
        let slot = self.get_mut(index).ok_or(ReconcilerError::IndexOutOfBounds { index, len })?;
        Ok(std::mem::replace(slot, value))
    }
}

/// Handle returned by [`ObservableList::add_observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

type Observer<T> = Box<dyn FnMut(&ListChange<T>)>;

/// A `Vec`-backed list that notifies its observers once per mutation.
///
/// Observers run synchronously after the mutation, in registration order.
pub struct ObservableList<T> {
    items: Vec<T>,
    observers: Vec<(ObserverId, Observer<T>)>,
    next_observer: u64,
}

impl<T> ObservableList<T> {
    pub fn new() -> Self {
        ObservableList { items: Vec::new(), observers: Vec::new(), next_observer: 0 }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn into_inner(self) -> Vec<T> {
        self.items
    }

    pub fn add_observer<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&ListChange<T>) + 'static,
    {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns false when no observer with this id is registered.
    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&mut self, change: ListChange<T>) {
        log::trace!("ObservableList: {} observers <- change at {}", self.observers.len(), change.index());
        for (_, observer) in self.observers.iter_mut() {
            observer(&change);
        }
    }
}

impl<T> Default for ObservableList<T> {
    fn default() -> Self {
        ObservableList::new()
    }
}

impl<T> From<Vec<T>> for ObservableList<T> {
    fn from(items: Vec<T>) -> Self {
        ObservableList { items, observers: Vec::new(), next_observer: 0 }
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableList")
            .field("items", &self.items)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl<T: Clone> ListModel<T> for ObservableList<T> {
    fn snapshot(&self) -> Result<Vec<T>, ReconcilerError> {
        Ok(self.items.clone())
    }

    fn insert_at(&mut self, index: usize, value: T) -> Result<(), ReconcilerError> {
        self.items.insert_at(index, value.clone())?;
        self.notify(ListChange::Inserted { index, value });
        Ok(())
    }

    fn remove_at(&mut self, index: usize) -> Result<T, ReconcilerError> {
        let value = self.items.remove_at(index)?;
        self.notify(ListChange::Removed { index, value: value.clone() });
        Ok(value)
    }

    fn update_at(&mut self, index: usize, value: T) -> Result<T, ReconcilerError> {
        let old = self.items.update_at(index, value.clone())?;
        self.notify(ListChange::Updated { index, old: old.clone(), new: value });
        Ok(old)
    }
}
