//! Sort state and cell comparison.
//!
//! Provides [`Dir`] for sort direction, [`SortState`] for the engine's
//! tri-state header toggle, and the comparators used to order a view.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::row::Row;
use crate::value::{CellValue, Timestamp};

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dir {
    /// Ascending order (smallest first).
    #[default]
    Asc,
    /// Descending order (largest first).
    Desc,
}

impl Dir {
    /// Returns `true` if this is ascending order.
    pub fn is_asc(self) -> bool {
        matches!(self, Dir::Asc)
    }

    /// Returns `true` if this is descending order.
    pub fn is_desc(self) -> bool {
        matches!(self, Dir::Desc)
    }

    /// Returns the opposite direction.
    pub fn flip(self) -> Dir {
        match self {
            Dir::Asc => Dir::Desc,
            Dir::Desc => Dir::Asc,
        }
    }

    /// Applies this direction to an ordering.
    ///
    /// For `Asc`, returns the ordering unchanged.
    /// For `Desc`, reverses the ordering.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Dir::Asc => ordering,
            Dir::Desc => ordering.reverse(),
        }
    }

    /// Returns the display name of this direction.
    pub fn as_str(self) -> &'static str {
        match self {
            Dir::Asc => "asc",
            Dir::Desc => "desc",
        }
    }
}

impl fmt::Display for Dir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dir {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Dir::Asc),
            "desc" | "descending" => Ok(Dir::Desc),
            other => Err(format!("unknown sort direction '{other}'")),
        }
    }
}

/// Active sort column and direction.
///
/// With no column the view keeps its filtered order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortState {
    column: Option<String>,
    dir: Dir,
}

impl SortState {
    /// Creates an inactive sort state.
    pub fn new() -> Self {
        SortState::default()
    }

    /// Header-click toggle.
    ///
    /// The active column flips direction; any other column becomes active
    /// in ascending order.
    pub fn toggle(&mut self, column: &str) {
        if self.column.as_deref() == Some(column) {
            self.dir = self.dir.flip();
        } else {
            self.column = Some(column.to_string());
            self.dir = Dir::Asc;
        }
    }

    /// Sets the direction without touching the column.
    pub fn set_dir(&mut self, dir: Dir) {
        self.dir = dir;
    }

    /// Deactivates sorting and resets the direction to ascending.
    pub fn clear(&mut self) {
        self.column = None;
        self.dir = Dir::Asc;
    }

    /// The active column, if any.
    pub fn column(&self) -> Option<&str> {
        self.column.as_deref()
    }

    /// The current direction.
    pub fn dir(&self) -> Dir {
        self.dir
    }

    /// Returns `true` if a sort column is set.
    pub fn is_active(&self) -> bool {
        self.column.is_some()
    }
}

/// How the comparator is chosen when sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparatorMode {
    /// Pick numeric, date or string comparison for each pair of values.
    ///
    /// Columns mixing numeric-looking and other values can order
    /// inconsistently in this mode.
    #[default]
    PerPair,
    /// Pick one comparison for the whole column from its dominant kind.
    ///
    /// Values that do not fit the chosen kind sort after those that do in
    /// either direction, ordered among themselves as strings.
    PerColumn,
}

/// Compares two cells, choosing the comparator from the pair itself.
///
/// - both read as finite numbers: numeric
/// - otherwise both read as dates: chronological
/// - otherwise: string comparison of the stringified values
pub fn compare_cells(a: &CellValue<'_>, b: &CellValue<'_>) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_number(), b.as_number()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    if let (Some(x), Some(y)) = (a.as_timestamp(), b.as_timestamp()) {
        return x.cmp(&y);
    }
    a.to_text().cmp(&b.to_text())
}

/// Kind of a column, as sampled for [`ComparatorMode::PerColumn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Mostly finite numbers.
    Number,
    /// Mostly dates.
    Date,
    /// Anything else.
    Text,
}

impl ColumnKind {
    /// Samples non-empty cells and returns the most frequent kind.
    ///
    /// Ties prefer number, then date, then text. A column with no
    /// non-empty cells is text.
    pub fn detect<'a, I>(cells: I) -> ColumnKind
    where
        I: IntoIterator<Item = CellValue<'a>>,
    {
        let (mut numbers, mut dates, mut texts) = (0usize, 0usize, 0usize);
        for cell in cells.into_iter().filter(|c| !c.is_empty()) {
            if cell.as_number().is_some() {
                numbers += 1;
            } else if cell.as_timestamp().is_some() {
                dates += 1;
            } else {
                texts += 1;
            }
        }
        if numbers > 0 && numbers >= dates && numbers >= texts {
            ColumnKind::Number
        } else if dates > 0 && dates >= texts {
            ColumnKind::Date
        } else {
            ColumnKind::Text
        }
    }
}

/// Precomputed sort key for per-column comparison.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Date(Timestamp),
    Text(String),
}

impl SortKey {
    fn of(kind: ColumnKind, cell: &CellValue<'_>) -> SortKey {
        let fitted = match kind {
            ColumnKind::Number => cell.as_number().map(SortKey::Number),
            ColumnKind::Date => cell.as_timestamp().map(SortKey::Date),
            ColumnKind::Text => None,
        };
        fitted.unwrap_or_else(|| SortKey::Text(cell.to_text().into_owned()))
    }

    fn rank(&self) -> u8 {
        match self {
            SortKey::Number(_) | SortKey::Date(_) => 0,
            SortKey::Text(_) => 1,
        }
    }

    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(a), SortKey::Number(b)) => {
                a.partial_cmp(b).unwrap_or(Ordering::Equal)
            }
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Sorts `indices` (positions into `rows`) by `column`.
///
/// The sort is stable in both directions: rows that compare equal keep their
/// relative order.
pub fn sort_indices(
    rows: &[Row],
    indices: &mut [usize],
    column: &str,
    dir: Dir,
    mode: ComparatorMode,
) {
    match mode {
        ComparatorMode::PerPair => {
            stable_sort_by(indices, |&a, &b| {
                let va = CellValue::from_json(rows[a].resolve(column));
                let vb = CellValue::from_json(rows[b].resolve(column));
                dir.apply(compare_cells(&va, &vb))
            });
        }
        ComparatorMode::PerColumn => {
            let kind = ColumnKind::detect(
                indices
                    .iter()
                    .map(|&i| CellValue::from_json(rows[i].resolve(column))),
            );
            let mut keyed: Vec<(usize, SortKey)> = indices
                .iter()
                .map(|&i| {
                    let cell = CellValue::from_json(rows[i].resolve(column));
                    (i, SortKey::of(kind, &cell))
                })
                .collect();
            keyed.sort_by(|(_, a), (_, b)| match a.rank().cmp(&b.rank()) {
                Ordering::Equal => dir.apply(a.compare(b)),
                by_rank => by_rank,
            });
            for (slot, (i, _)) in indices.iter_mut().zip(keyed) {
                *slot = i;
            }
        }
    }
}

/// Stable merge sort that accepts comparators which are not a total order.
///
/// An inconsistent comparator yields some permutation of the input; it never
/// panics or loses elements.
pub fn stable_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() < 2 {
        return;
    }
    let mut scratch = items.to_vec();
    merge_sort(items, &mut scratch, &mut compare);
}

fn merge_sort<T, F>(items: &mut [T], scratch: &mut [T], compare: &mut F)
where
    T: Copy,
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();
    if len < 2 {
        return;
    }
    let mid = len / 2;
    merge_sort(&mut items[..mid], &mut scratch[..mid], compare);
    merge_sort(&mut items[mid..], &mut scratch[mid..], compare);

    scratch[..len].copy_from_slice(items);
    let (left, right) = scratch[..len].split_at(mid);
    let (mut i, mut j, mut k) = (0, 0, 0);
    while i < left.len() && j < right.len() {
        // Take from the right only when strictly smaller.
        if compare(&right[j], &left[i]) == Ordering::Less {
            items[k] = right[j];
            j += 1;
        } else {
            items[k] = left[i];
            i += 1;
        }
        k += 1;
    }
    let rest_left = left.len() - i;
    items[k..k + rest_left].copy_from_slice(&left[i..]);
    k += rest_left;
    items[k..].copy_from_slice(&right[j..]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(values: Vec<serde_json::Value>) -> Vec<Row> {
        values
            .into_iter()
            .map(|v| Row::from_value(v).unwrap())
            .collect()
    }

    fn sorted(rows: &[Row], column: &str, dir: Dir, mode: ComparatorMode) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..rows.len()).collect();
        sort_indices(rows, &mut indices, column, dir, mode);
        indices
    }

    #[test]
    fn dir_apply() {
        assert_eq!(Dir::Asc.apply(Ordering::Less), Ordering::Less);
        assert_eq!(Dir::Asc.apply(Ordering::Equal), Ordering::Equal);
        assert_eq!(Dir::Desc.apply(Ordering::Less), Ordering::Greater);
        assert_eq!(Dir::Desc.apply(Ordering::Equal), Ordering::Equal);
    }

    #[test]
    fn dir_display_and_parse() {
        assert_eq!(Dir::Asc.to_string(), "asc");
        assert_eq!(Dir::Desc.to_string(), "desc");
        assert_eq!("DESC".parse::<Dir>(), Ok(Dir::Desc));
        assert_eq!("ascending".parse::<Dir>(), Ok(Dir::Asc));
        assert!("sideways".parse::<Dir>().is_err());
    }

    #[test]
    fn toggle_cycles_direction() {
        let mut state = SortState::new();
        assert!(!state.is_active());

        state.toggle("x");
        assert_eq!((state.column(), state.dir()), (Some("x"), Dir::Asc));
        state.toggle("x");
        assert_eq!(state.dir(), Dir::Desc);
        state.toggle("x");
        assert_eq!(state.dir(), Dir::Asc);
    }

    #[test]
    fn toggle_other_column_resets_to_asc() {
        let mut state = SortState::new();
        state.toggle("x");
        state.toggle("x");
        state.toggle("y");
        assert_eq!((state.column(), state.dir()), (Some("y"), Dir::Asc));
    }

    #[test]
    fn clear_resets_direction() {
        let mut state = SortState::new();
        state.toggle("x");
        state.set_dir(Dir::Desc);
        state.clear();
        assert_eq!(state, SortState::new());
    }

    #[test]
    fn compare_numeric_strings_numerically() {
        let ten = CellValue::String("10");
        let two = CellValue::String("2");
        assert_eq!(compare_cells(&two, &ten), Ordering::Less);
    }

    #[test]
    fn compare_dates_chronologically() {
        let a = CellValue::String("Mon, 15 Jan 2024 10:00:00 +0000");
        let b = CellValue::String("Tue, 02 Jan 2024 10:00:00 +0000");
        assert_eq!(compare_cells(&a, &b), Ordering::Greater);
    }

    #[test]
    fn compare_falls_back_to_strings() {
        let a = CellValue::String("apple");
        let b = CellValue::String("Banana");
        // Case-sensitive: uppercase sorts first.
        assert_eq!(compare_cells(&a, &b), Ordering::Greater);
        assert_eq!(
            compare_cells(&CellValue::Missing, &CellValue::String("a")),
            Ordering::Less
        );
    }

    #[test]
    fn detect_column_kind() {
        let cells = [
            CellValue::String("1"),
            CellValue::String("2"),
            CellValue::String("x"),
            CellValue::Missing,
        ];
        assert_eq!(ColumnKind::detect(cells), ColumnKind::Number);

        let cells = [
            CellValue::String("2024-01-01T00:00:00Z"),
            CellValue::String("Mon, 15 Jan 2024 10:00:00 +0000"),
        ];
        assert_eq!(ColumnKind::detect(cells), ColumnKind::Date);

        assert_eq!(ColumnKind::detect([CellValue::Null]), ColumnKind::Text);
    }

    #[test]
    fn sort_is_stable() {
        let data = rows(vec![
            json!({"k": 1, "tag": "a"}),
            json!({"k": 1, "tag": "b"}),
            json!({"k": 2, "tag": "c"}),
        ]);
        assert_eq!(sorted(&data, "k", Dir::Asc, ComparatorMode::PerPair), vec![0, 1, 2]);
        assert_eq!(sorted(&data, "k", Dir::Desc, ComparatorMode::PerPair), vec![2, 0, 1]);
    }

    #[test]
    fn per_column_puts_misfits_last() {
        let data = rows(vec![
            json!({"n": "b"}),
            json!({"n": "10"}),
            json!({"n": "2"}),
            json!({"n": "a"}),
            json!({"n": "3"}),
        ]);
        assert_eq!(
            sorted(&data, "n", Dir::Asc, ComparatorMode::PerColumn),
            vec![2, 4, 1, 3, 0]
        );
        assert_eq!(
            sorted(&data, "n", Dir::Desc, ComparatorMode::PerColumn),
            vec![1, 4, 2, 0, 3]
        );
    }

    #[test]
    fn stable_sort_survives_inconsistent_comparator() {
        let mut items: Vec<u32> = (0..50).rev().collect();
        let mut flip = false;
        stable_sort_by(&mut items, |_, _| {
            flip = !flip;
            if flip {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        });
        let mut seen = items.clone();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn stable_sort_orders_plain_values() {
        let mut items = vec![5, 3, 9, 1, 3, 7];
        stable_sort_by(&mut items, |a, b| a.cmp(b));
        assert_eq!(items, vec![1, 3, 3, 5, 7, 9]);
    }
}
