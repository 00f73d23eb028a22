//! Sorting for the market table

use super::column::Field;
use crate::types::MarketRecord;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// One key of the sort specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortSpec {
    pub field: Field,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: Field) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }
}

/// Next state of the header toggle: unsorted → ascending → descending → unsorted
pub fn next_direction(current: Option<SortDirection>) -> Option<SortDirection> {
    match current {
        None => Some(SortDirection::Ascending),
        Some(SortDirection::Ascending) => Some(SortDirection::Descending),
        Some(SortDirection::Descending) => None,
    }
}

/// Sorts `indices` (positions into `records`) by `specs`
///
/// Ties fall back to the original position. The tie-break follows the
/// direction of the first key, so a single-key descending sort is the
/// exact reverse of the ascending one.
pub fn sort_indices(records: &[MarketRecord], indices: &mut [usize], specs: &[SortSpec]) {
    let Some(primary) = specs.first() else {
        return;
    };

    indices.sort_by(|&a, &b| {
        for spec in specs {
            let ordering = spec
                .field
                .value(&records[a])
                .compare(&spec.field.value(&records[b]));
            let ordering = match spec.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        match primary.direction {
            SortDirection::Ascending => a.cmp(&b),
            SortDirection::Descending => b.cmp(&a),
        }
    });
}
