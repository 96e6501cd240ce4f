//! Minimum edit-distance list reconciliation.
//!
//! [`compute_edit_script`] diffs a source list against a target list under a
//! caller-supplied equivalence and returns the cheapest sequence of inserts,
//! removes and updates; [`apply_edit_script`] replays it against a
//! [`ListModel`] such as [`ObservableList`], whose observers see one change
//! per operation. [`transform`] does both in one call.
//!
//! ```
//! use list_reconciler::{transform, ObservableList};
//!
//! let mut chips = ObservableList::from(vec!["back", "search", "close"]);
//! let script = transform(&mut chips, &["back", "close", "done"], |a: &&str, b: &&str| a == b).unwrap();
//! assert_eq!(chips.as_slice(), &["back", "close", "done"]);
//! assert_eq!(script.distance(), 2);
//! ```
mod applier;
mod diff_engine;
mod errors;
mod list_model;
mod types;

#[cfg(feature = "python")]
mod converters;
#[cfg(feature = "python")]
mod python;

pub use applier::{apply_edit_script, transform, transform_with};
pub use diff_engine::{compute_edit_script, edit_distance, DiffEngine};
pub use errors::ReconcilerError;
pub use list_model::{ListModel, ObservableList, ObserverId};
pub use types::{
    ByValue, EditOperation, EditScript, Equivalence, ListChange, OperationKind, ReconcileOptions, RefreshPolicy,
};
