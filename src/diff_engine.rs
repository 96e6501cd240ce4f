//! Minimum edit-distance diffing between two lists under a caller-supplied equivalence
use crate::errors::ReconcilerError;
use crate::types::*;

/// Dynamic-programming table of edit distances between every prefix pair,
/// plus the equivalence result for every aligned element pair so the
/// predicate runs once per pair.
struct DistanceTable {
    width: usize,
    cells: Vec<usize>,
    matches: Vec<bool>,
}

impl DistanceTable {
    fn build<T, E>(source: &[T], target: &[T], equals: &E, max_cells: Option<usize>) -> Result<Self, ReconcilerError>
    where
        E: Equivalence<T> + ?Sized,
    {
        let (m, n) = (source.len(), target.len());
        let width = n + 1;
        let size = (m + 1).checked_mul(width).ok_or_else(|| {
            ReconcilerError::invalid(format!("distance table for {}x{} lists overflows", m, n))
        })?;
        if let Some(limit) = max_cells {
            if size > limit {
                return Err(ReconcilerError::invalid(format!(
                    "distance table needs {} cells for {}x{} lists, limit is {}",
                    size, m, n, limit
                )));
            }
        }

        let mut cells = vec![0usize; size];
        let mut matches = vec![false; size];
        for (j, cell) in cells.iter_mut().take(width).enumerate() {
            *cell = j;
        }
        for i in 1..=m {
            cells[i * width] = i;
            for j in 1..=n {
                let at = i * width + j;
                if equals.is_equivalent(&source[i - 1], &target[j - 1]) {
                    matches[at] = true;
                    cells[at] = cells[at - width - 1];
                } else {
                    let substitute = cells[at - width - 1];
                    let insert = cells[at - 1];
                    let remove = cells[at - width];
                    cells[at] = 1 + substitute.min(insert).min(remove);
                }
            }
        }

        Ok(DistanceTable { width, cells, matches })
    }

    fn at(&self, i: usize, j: usize) -> usize {
        self.cells[i * self.width + j]
    }

    fn matched(&self, i: usize, j: usize) -> bool {
        self.matches[i * self.width + j]
    }
}

/// Computes edit scripts with a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct DiffEngine {
    options: ReconcileOptions,
}

impl DiffEngine {
    pub fn new() -> Self {
        DiffEngine::default()
    }

    pub fn with_options(options: ReconcileOptions) -> Self {
        DiffEngine { options }
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Minimum number of inserts, removes and substitutions turning `source` into `target`.
    pub fn distance<T, E>(&self, source: &[T], target: &[T], equals: &E) -> Result<usize, ReconcilerError>
    where
        E: Equivalence<T> + ?Sized,
    {
        let table = DistanceTable::build(source, target, equals, self.options.max_cells)?;
        Ok(table.at(source.len(), target.len()))
    }

    /// Computes the edit script turning `source` into `target`.
    ///
    /// Operations come out in three groups, each valid against the container
    /// as left by the previous ones:
    /// 1. refresh updates for matched elements, ascending index;
    /// 2. substitutions, ascending index;
    /// 3. inserts and removes, back to front.
    ///
    /// Updates never shift positions, so groups 1 and 2 use source indices
    /// directly. Group 3 walks from the end of the list, so every step only
    /// touches positions before those already edited; consecutive inserts at
    /// one boundary therefore come out in reverse order at the same index,
    /// and removes come out in descending index order.
    pub fn compute<T, E>(&self, source: &[T], target: &[T], equals: &E) -> Result<EditScript<T>, ReconcilerError>
    where
        T: Clone + PartialEq,
        E: Equivalence<T> + ?Sized,
    {
        let table = DistanceTable::build(source, target, equals, self.options.max_cells)?;

        let mut refreshes = Vec::new();
        let mut substitutions = Vec::new();
        let mut structural = Vec::new();

        let (mut i, mut j) = (source.len(), target.len());
        while i > 0 || j > 0 {
            let here = table.at(i, j);
            if i > 0 && j > 0 && table.matched(i, j) {
                if self.needs_refresh(&source[i - 1], &target[j - 1]) {
                    refreshes.push(EditOperation::Update { index: i - 1, value: target[j - 1].clone() });
                }
                i -= 1;
                j -= 1;
            } else if i > 0 && j > 0 && here == table.at(i - 1, j - 1) + 1 {
                substitutions.push(EditOperation::Update { index: i - 1, value: target[j - 1].clone() });
                i -= 1;
                j -= 1;
            } else if j > 0 && here == table.at(i, j - 1) + 1 {
                structural.push(EditOperation::Insert { index: i, value: target[j - 1].clone() });
                j -= 1;
            } else {
                structural.push(EditOperation::Remove { index: i - 1 });
                i -= 1;
            }
        }

        refreshes.reverse();
        substitutions.reverse();

        let mut operations = refreshes;
        operations.append(&mut substitutions);
        operations.append(&mut structural);

        let script = EditScript { operations, distance: table.at(source.len(), target.len()) };
        log::debug!(
            "DiffEngine: {} -> {} elements, distance {}, {} inserts, {} removes, {} updates",
            source.len(),
            target.len(),
            script.distance(),
            script.inserts(),
            script.removes(),
            script.updates(),
        );
        Ok(script)
    }

    fn needs_refresh<T: PartialEq>(&self, current: &T, incoming: &T) -> bool {
        match self.options.refresh {
            RefreshPolicy::Changed => current != incoming,
            RefreshPolicy::Always => true,
            RefreshPolicy::Never => false,
        }
    }
}

/// Edit script from `source` to `target` with the default options.
pub fn compute_edit_script<T, F>(source: &[T], target: &[T], equals: F) -> Result<EditScript<T>, ReconcilerError>
where
    T: Clone + PartialEq,
    F: Fn(&T, &T) -> bool,
{
    DiffEngine::new().compute(source, target, &equals)
}

/// Edit distance between `source` and `target` with the default options.
pub fn edit_distance<T, F>(source: &[T], target: &[T], equals: F) -> Result<usize, ReconcilerError>
where
    F: Fn(&T, &T) -> bool,
{
    DiffEngine::new().distance(source, target, &equals)
}
