//! Query executor
//!
//! Executes a bound query against one immutable snapshot of records.
//!
//! Execution flow (strict order):
//! 1. Filter records by WHERE (data-parallel, order preserved)
//! 2. Group and aggregate, or project plain records
//! 3. Project to COLUMNS
//! 4. Apply ORDER (if specified)
//! 5. Enforce the result bound on the final row count

use rayon::prelude::*;

use crate::catalog::Record;
use crate::planner::{BoundQuery, Filter};

use super::errors::{ExecutorError, ExecutorResult};
use super::filters::PredicateFilter;
use super::projector::ColumnProjector;
use super::result::{ExecutionResult, ResultRow};
use super::sorter::ResultSorter;
use super::transformer::GroupTransformer;

/// Maximum number of rows a query may return
pub const MAX_RESULT_ROWS: usize = 5000;

/// Record count below which filtering stays on the calling thread
const PARALLEL_THRESHOLD: usize = 1024;

/// Records handed to each parallel filter task
const FILTER_BATCH_SIZE: usize = 512;

/// Query executor over an in-memory record snapshot
#[derive(Debug, Clone, Copy)]
pub struct QueryExecutor {
    max_rows: usize,
}

impl Default for QueryExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryExecutor {
    /// Creates an executor with the standard result bound
    pub fn new() -> Self {
        Self {
            max_rows: MAX_RESULT_ROWS,
        }
    }

    /// Creates an executor with a custom result bound
    pub fn with_max_rows(max_rows: usize) -> Self {
        Self { max_rows }
    }

    /// Returns the result bound
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    /// Executes a bound query and returns results.
    ///
    /// This method is deterministic: same query + same snapshot = same rows.
    /// Nothing is truncated; a result over the bound is an error.
    pub fn execute(&self, query: &BoundQuery, records: &[Record]) -> ExecutorResult<ExecutionResult> {
        // Step 1: Filter
        let matched = Self::filter(records, query.filter());
        let columns = &query.options().columns;

        // Steps 2-3: Group or project, then project to COLUMNS
        let (mut rows, group_count) = match query.transformations() {
            Some(transformations) => {
                let grouped = GroupTransformer::transform(&matched, transformations);
                let group_count = grouped.len();
                let rows: Vec<ResultRow> = grouped
                    .iter()
                    .map(|row| ColumnProjector::project_row(row, columns))
                    .collect();
                (rows, group_count)
            }
            None => {
                let rows = matched
                    .iter()
                    .map(|record| {
                        ColumnProjector::project_record(record, columns, query.dataset_id())
                    })
                    .collect();
                (rows, 0)
            }
        };

        // Step 4: Apply ORDER
        if let Some(order) = &query.options().order {
            ResultSorter::sort(&mut rows, order);
        }

        // Step 5: Bound the final row count
        if rows.len() > self.max_rows {
            return Err(ExecutorError::result_too_large(rows.len(), self.max_rows));
        }

        Ok(ExecutionResult {
            rows,
            scanned_count: records.len(),
            matched_count: matched.len(),
            group_count,
        })
    }

    /// Returns matching records in snapshot order
    fn filter<'r>(records: &'r [Record], filter: Option<&Filter>) -> Vec<&'r Record> {
        if filter.is_none() {
            return records.iter().collect();
        }

        if records.len() < PARALLEL_THRESHOLD {
            return records
                .iter()
                .filter(|record| PredicateFilter::matches(record, filter))
                .collect();
        }

        records
            .par_chunks(FILTER_BATCH_SIZE)
            .flat_map_iter(|chunk| {
                chunk
                    .iter()
                    .filter(move |record| PredicateFilter::matches(record, filter))
            })
            .collect()
    }
}
