//! Column sorting.

use super::row::TableRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Header indicator.
    pub fn indicator(self) -> &'static str {
        match self {
            Self::Ascending => "▲",
            Self::Descending => "▼",
        }
    }
}

/// Current sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub key: String,
    pub direction: SortDirection,
}

/// Advance the sort cycle for a header click on `key`.
///
/// Unsorted → ascending → descending → unsorted. Clicking a different
/// column starts that column at ascending.
pub fn cycle_sort(current: Option<&SortState>, key: &str) -> Option<SortState> {
    match current {
        Some(state) if state.key == key => match state.direction {
            SortDirection::Ascending => Some(SortState {
                key: key.to_string(),
                direction: SortDirection::Descending,
            }),
            SortDirection::Descending => None,
        },
        _ => Some(SortState {
            key: key.to_string(),
            direction: SortDirection::Ascending,
        }),
    }
}

/// Stable sort of row indices by one field.
pub fn sort_indices<R: TableRow>(rows: &[R], indices: &mut [usize], sort: &SortState) {
    indices.sort_by(|&a, &b| {
        let ord = rows[a].field(&sort.key).compare(&rows[b].field(&sort.key));
        match sort.direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });
}
