use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Well-known columns of the EV population export
// ---------------------------------------------------------------------------

/// Column names of the Washington State "Electric Vehicle Population Data"
/// export. Rows are keyed by whatever the header says; these are the names
/// the filter engine and the aggregator look up.
pub mod fields {
    pub const VIN: &str = "VIN (1-10)";
    pub const COUNTY: &str = "County";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const POSTAL_CODE: &str = "Postal Code";
    pub const MODEL_YEAR: &str = "Model Year";
    pub const MAKE: &str = "Make";
    pub const MODEL: &str = "Model";
    pub const VEHICLE_TYPE: &str = "Electric Vehicle Type";
    pub const CAFV_ELIGIBILITY: &str = "Clean Alternative Fuel Vehicle (CAFV) Eligibility";
    pub const ELECTRIC_RANGE: &str = "Electric Range";
    pub const BASE_MSRP: &str = "Base MSRP";
    pub const LEGISLATIVE_DISTRICT: &str = "Legislative District";
    pub const DOL_VEHICLE_ID: &str = "DOL Vehicle ID";
    pub const VEHICLE_LOCATION: &str = "Vehicle Location";
    pub const ELECTRIC_UTILITY: &str = "Electric Utility";
    pub const CENSUS_TRACT: &str = "2020 Census Tract";

    /// Full header of the export, in file order.
    pub const ALL: [&str; 17] = [
        VIN,
        COUNTY,
        CITY,
        STATE,
        POSTAL_CODE,
        MODEL_YEAR,
        MAKE,
        MODEL,
        VEHICLE_TYPE,
        CAFV_ELIGIBILITY,
        ELECTRIC_RANGE,
        BASE_MSRP,
        LEGISLATIVE_DISTRICT,
        DOL_VEHICLE_ID,
        VEHICLE_LOCATION,
        ELECTRIC_UTILITY,
        CENSUS_TRACT,
    ];
}

// ---------------------------------------------------------------------------
// Row – one registration record
// ---------------------------------------------------------------------------

/// A single registration record (one data line of the source file).
///
/// Every row of a [`Dataset`] carries the full header's field set; a missing
/// value is stored as an empty string, never as an absent key. Rows are
/// immutable once the loader has built them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    fields: BTreeMap<String, String>,
}

impl Row {
    pub(crate) fn new(fields: BTreeMap<String, String>) -> Self {
        Row { fields }
    }

    /// Value of `field`, or `None` if the dataset schema has no such column.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Value of `field` if present and non-empty.
    pub fn non_empty(&self, field: &str) -> Option<&str> {
        self.get(field).filter(|v| !v.is_empty())
    }

    /// All field values, in column-name order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Row::new(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded file
// ---------------------------------------------------------------------------

/// The full parsed dataset. Written once by the loader, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    /// All rows, in file order.
    pub rows: Vec<Row>,
    /// Header column names, in file order.
    pub column_names: Vec<String>,
    /// Data lines whose field count disagreed with the header.
    pub skewed_lines: usize,
}

impl Dataset {
    pub fn new(column_names: Vec<String>, rows: Vec<Row>, skewed_lines: usize) -> Self {
        Dataset {
            rows,
            column_names,
            skewed_lines,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_distinguishes_absent_from_empty() {
        let row: Row = [(fields::MAKE, "Tesla"), (fields::CITY, "")]
            .into_iter()
            .collect();
        assert_eq!(row.get(fields::MAKE), Some("Tesla"));
        assert_eq!(row.get(fields::CITY), Some(""));
        assert_eq!(row.get(fields::MODEL), None);
        assert_eq!(row.non_empty(fields::CITY), None);
        assert_eq!(row.len(), 2);
    }
}
