use super::model::{fields, Dataset, Row};

// ---------------------------------------------------------------------------
// Filter predicate: free-text search plus four field constraints
// ---------------------------------------------------------------------------

/// The four named field constraints. An empty string means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub make: String,
    pub vehicle_type: String,
    pub year: String,
    pub city: String,
}

/// Identifies one constraint of a [`FilterState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Make,
    Type,
    Year,
    City,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Make,
        FilterField::Type,
        FilterField::Year,
        FilterField::City,
    ];

    /// Label shown next to the input box.
    pub fn label(self) -> &'static str {
        match self {
            FilterField::Make => "Make",
            FilterField::Type => "Type",
            FilterField::Year => "Year",
            FilterField::City => "City",
        }
    }

    /// Row field the constraint is checked against.
    pub fn column(self) -> &'static str {
        match self {
            FilterField::Make => fields::MAKE,
            FilterField::Type => fields::VEHICLE_TYPE,
            FilterField::Year => fields::MODEL_YEAR,
            FilterField::City => fields::CITY,
        }
    }
}

impl FilterState {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Make => &self.make,
            FilterField::Type => &self.vehicle_type,
            FilterField::Year => &self.year,
            FilterField::City => &self.city,
        }
    }

    pub fn get_mut(&mut self, field: FilterField) -> &mut String {
        match field {
            FilterField::Make => &mut self.make,
            FilterField::Type => &mut self.vehicle_type,
            FilterField::Year => &mut self.year,
            FilterField::City => &mut self.city,
        }
    }

    /// Replace a single constraint, leaving the others untouched.
    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    /// Whether no constraint is active.
    pub fn is_empty(&self) -> bool {
        FilterField::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Search term and constraints lower-cased once, evaluated per row.
struct Matcher<'a> {
    search: String,
    make: String,
    vehicle_type: String,
    year: &'a str,
    city: String,
}

impl<'a> Matcher<'a> {
    fn new(search: &str, filters: &'a FilterState) -> Self {
        Matcher {
            search: search.to_lowercase(),
            make: filters.make.to_lowercase(),
            vehicle_type: filters.vehicle_type.to_lowercase(),
            year: &filters.year,
            city: filters.city.to_lowercase(),
        }
    }

    fn matches(&self, row: &Row) -> bool {
        self.matches_search(row)
            && contains_ci(row, FilterField::Make.column(), &self.make)
            && contains_ci(row, FilterField::Type.column(), &self.vehicle_type)
            && equals(row, FilterField::Year.column(), self.year)
            && contains_ci(row, FilterField::City.column(), &self.city)
    }

    fn matches_search(&self, row: &Row) -> bool {
        self.search.is_empty()
            || row
                .values()
                .any(|v| v.to_lowercase().contains(&self.search))
    }
}

/// Case-insensitive substring test; `needle` is already lower-cased.
/// A row without the field never matches a non-empty needle.
fn contains_ci(row: &Row, field: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    row.get(field)
        .is_some_and(|v| v.to_lowercase().contains(needle))
}

/// Exact string equality; used for the model year.
fn equals(row: &Row, field: &str, wanted: &str) -> bool {
    wanted.is_empty() || row.get(field) == Some(wanted)
}

/// Return the rows that pass the search term and every constraint, in input
/// order. The result borrows from the input, so it can be fed back in.
pub fn apply<'r, I>(rows: I, search: &str, filters: &FilterState) -> Vec<&'r Row>
where
    I: IntoIterator<Item = &'r Row>,
{
    let matcher = Matcher::new(search, filters);
    rows.into_iter().filter(|row| matcher.matches(row)).collect()
}

/// Return indices of rows that pass the search term and every constraint.
pub fn filtered_indices(dataset: &Dataset, search: &str, filters: &FilterState) -> Vec<usize> {
    let matcher = Matcher::new(search, filters);
    dataset
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| matcher.matches(row))
        .map(|(i, _)| i)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(make: &str, kind: &str, year: &str, city: &str) -> Row {
        [
            (fields::MAKE, make),
            (fields::VEHICLE_TYPE, kind),
            (fields::MODEL_YEAR, year),
            (fields::CITY, city),
        ]
        .into_iter()
        .collect()
    }

    fn scenario() -> Vec<Row> {
        vec![
            row("Tesla", "BEV", "2020", "Seattle"),
            row("Nissan", "PHEV", "2019", "Tacoma"),
            row("Tesla", "BEV", "2021", "Seattle"),
        ]
    }

    fn filters(make: &str, kind: &str, year: &str, city: &str) -> FilterState {
        FilterState {
            make: make.into(),
            vehicle_type: kind.into(),
            year: year.into(),
            city: city.into(),
        }
    }

    #[test]
    fn make_filter_is_case_insensitive_substring() {
        let rows = scenario();
        let out = apply(&rows, "", &filters("tesla", "", "", ""));
        assert_eq!(out, vec![&rows[0], &rows[2]]);

        let out = apply(&rows, "", &filters("SAN", "", "", ""));
        assert_eq!(out, vec![&rows[1]]);
    }

    #[test]
    fn empty_state_returns_everything_in_order() {
        let rows = scenario();
        let out = apply(&rows, "", &FilterState::default());
        assert_eq!(out.len(), rows.len());
        for (got, want) in out.iter().zip(&rows) {
            assert!(std::ptr::eq(*got, want));
        }
    }

    #[test]
    fn year_requires_exact_equality() {
        let rows = scenario();
        assert_eq!(apply(&rows, "", &filters("", "", "2020", "")).len(), 1);
        assert!(apply(&rows, "", &filters("", "", "202", "")).is_empty());
        assert!(apply(&rows, "", &filters("", "", " 2020", "")).is_empty());
    }

    #[test]
    fn search_matches_any_field() {
        let rows = scenario();
        let out = apply(&rows, "TACO", &FilterState::default());
        assert_eq!(out, vec![&rows[1]]);
        let out = apply(&rows, "20", &FilterState::default());
        assert_eq!(out.len(), 3);
        assert!(apply(&rows, "rivian", &FilterState::default()).is_empty());
    }

    #[test]
    fn search_and_constraints_combine_with_and() {
        let rows = scenario();
        let out = apply(&rows, "2021", &filters("tesla", "bev", "", "seat"));
        assert_eq!(out, vec![&rows[2]]);
        assert!(apply(&rows, "tacoma", &filters("tesla", "", "", "")).is_empty());
    }

    #[test]
    fn absent_field_fails_only_an_active_constraint() {
        let sparse: Row = [(fields::MAKE, "Kia")].into_iter().collect();
        let rows = vec![sparse];
        assert_eq!(apply(&rows, "", &filters("kia", "", "", "")).len(), 1);
        assert!(apply(&rows, "", &filters("", "bev", "", "")).is_empty());
        assert!(apply(&rows, "", &filters("", "", "2020", "")).is_empty());
        assert!(apply(&rows, "", &filters("", "", "", "seattle")).is_empty());
    }

    #[test]
    fn apply_is_idempotent() {
        let rows = scenario();
        let state = filters("t", "", "", "");
        for search in ["", "bev", "seattle", "nothing"] {
            let once = apply(&rows, search, &state);
            let twice = apply(once.iter().copied(), search, &state);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn output_is_a_subset_by_identity() {
        let rows = scenario();
        let out = apply(&rows, "", &filters("", "bev", "", ""));
        for r in out {
            assert!(rows.iter().any(|orig| std::ptr::eq(orig, r)));
        }
    }

    #[test]
    fn indices_agree_with_apply() {
        let ds = Dataset::new(Vec::new(), scenario(), 0);
        let state = filters("", "", "", "seattle");
        assert_eq!(filtered_indices(&ds, "", &state), vec![0, 2]);
        assert_eq!(filtered_indices(&ds, "nissan", &FilterState::default()), vec![1]);
    }

    #[test]
    fn set_updates_one_constraint() {
        let mut state = FilterState::default();
        assert!(state.is_empty());
        state.set(FilterField::City, "Kent");
        assert_eq!(state.get(FilterField::City), "Kent");
        assert_eq!(state.get(FilterField::Make), "");
        assert!(!state.is_empty());
    }
}
