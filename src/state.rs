use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use crate::data::analytics::Snapshot;
use crate::data::filter::{FilterField, FilterState};
use crate::data::loader::{self, LoadError};
use crate::data::model::{fields, Dataset, Row};

/// Rows-per-page choices offered by the table.
pub const PAGE_SIZES: [usize; 4] = [10, 25, 50, 100];

// ---------------------------------------------------------------------------
// Load lifecycle
// ---------------------------------------------------------------------------

/// Where the single dataset load stands. `Failed` is terminal for that attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed(String),
}

/// Which main view is shown below the summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Charts,
    Table,
}

/// Table paging, owned by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Index of the first row on the current page.
    pub first: usize,
    pub rows_per_page: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            first: 0,
            rows_per_page: PAGE_SIZES[0],
        }
    }
}

impl Pagination {
    /// Zero-based page index and page count for `total` rows.
    pub fn page_of(&self, total: usize) -> (usize, usize) {
        let per = self.rows_per_page.max(1);
        let pages = total.div_ceil(per).max(1);
        ((self.first / per).min(pages - 1), pages)
    }

    /// Row range `[start, end)` shown for `total` rows.
    pub fn window(&self, total: usize) -> (usize, usize) {
        let (page, _) = self.page_of(total);
        let start = page.saturating_mul(self.rows_per_page.max(1)).min(total);
        (start, start.saturating_add(self.rows_per_page).min(total))
    }

    pub fn go_to_page(&mut self, page: usize, total: usize) {
        let (_, pages) = self.page_of(total);
        self.first = page.min(pages - 1).saturating_mul(self.rows_per_page.max(1));
    }

    pub fn set_rows_per_page(&mut self, rows: usize) {
        self.rows_per_page = rows.max(1);
        self.first = 0;
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset; empty until a load succeeds (and after one fails).
    pub dataset: Dataset,

    /// Free-text search across every field.
    pub search: String,

    /// Per-field constraints.
    pub filters: FilterState,

    /// Filtered indices, charts and summary for the current inputs.
    pub snapshot: Snapshot,

    pub status: LoadStatus,

    /// Path of the file being (or last) loaded.
    pub source: Option<PathBuf>,

    pub view: ActiveView,

    pub pagination: Pagination,

    pending: Option<Receiver<Result<Dataset, LoadError>>>,
}

impl AppState {
    pub fn with_page_size(rows_per_page: usize) -> Self {
        let mut state = AppState::default();
        state.pagination.set_rows_per_page(rows_per_page);
        state
    }

    /// Start loading `path` on a background thread. Poll with [`Self::poll_load`].
    pub fn start_load(&mut self, path: PathBuf) {
        let (tx, rx) = mpsc::channel();
        let worker_path = path.clone();
        thread::spawn(move || {
            let result = loader::load_file(&worker_path);
            // The receiver is gone if a newer load replaced this one.
            let _ = tx.send(result);
        });
        self.source = Some(path);
        self.status = LoadStatus::Loading;
        self.pending = Some(rx);
    }

    /// Adopt the background load result if it has arrived. Returns `true` when
    /// the state changed.
    pub fn poll_load(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        match rx.try_recv() {
            Ok(result) => {
                self.pending = None;
                self.finish_load(result);
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.finish_load_failed("loader thread exited without a result".to_string());
                true
            }
        }
    }

    /// Load `path` on the calling thread.
    pub fn load_blocking(&mut self, path: PathBuf) {
        self.status = LoadStatus::Loading;
        let result = loader::load_file(&path);
        self.source = Some(path);
        self.finish_load(result);
    }

    /// Ingest a load result. A failure leaves an empty dataset behind.
    pub fn finish_load(&mut self, result: Result<Dataset, LoadError>) {
        match result {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} vehicles with {} columns",
                    dataset.len(),
                    dataset.column_names.len()
                );
                let missing: Vec<&str> = fields::ALL
                    .iter()
                    .copied()
                    .filter(|f| !dataset.column_names.iter().any(|c| c.as_str() == *f))
                    .collect();
                if !missing.is_empty() {
                    log::warn!("Columns missing from the header, treated as empty: {missing:?}");
                }
                if dataset.skewed_lines > 0 {
                    log::warn!(
                        "{} lines had a different field count than the header and were aligned by position",
                        dataset.skewed_lines
                    );
                }
                self.dataset = dataset;
                self.status = LoadStatus::Succeeded;
                self.recompute();
            }
            Err(e) => self.finish_load_failed(e.to_string()),
        }
    }

    fn finish_load_failed(&mut self, message: String) {
        log::error!("Failed to load dataset: {message}");
        self.dataset = Dataset::default();
        self.status = LoadStatus::Failed(message);
        self.recompute();
    }

    /// Re-run filter and aggregation against the full dataset.
    pub fn recompute(&mut self) {
        self.snapshot = Snapshot::compute(&self.dataset, &self.search, &self.filters);
        self.pagination.first = 0;
        log::debug!(
            "{} of {} vehicles match",
            self.snapshot.indices.len(),
            self.dataset.len()
        );
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.recompute();
    }

    pub fn set_filter(&mut self, field: FilterField, value: impl Into<String>) {
        self.filters.set(field, value);
        self.recompute();
    }

    pub fn clear_filters(&mut self) {
        self.search.clear();
        self.filters = FilterState::default();
        self.recompute();
    }

    /// Filtered rows, in dataset order.
    pub fn visible_rows(&self) -> impl Iterator<Item = &Row> {
        self.snapshot.rows(&self.dataset)
    }

    pub fn visible_count(&self) -> usize {
        self.snapshot.indices.len()
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::{Duration, Instant};

    use super::*;
    use crate::data::loader::parse_reader;

    const CSV: &str = "\
Make,Model,Model Year,Electric Vehicle Type,City,Electric Range
TESLA,MODEL 3,2020,Battery Electric Vehicle (BEV),Seattle,266
NISSAN,LEAF,2019,Battery Electric Vehicle (BEV),Tacoma,150
TESLA,MODEL Y,2021,Battery Electric Vehicle (BEV),Seattle,0
TOYOTA,PRIUS PRIME,2021,Plug-in Hybrid Electric Vehicle (PHEV),Kent,25
";

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.finish_load(parse_reader(CSV.as_bytes()));
        state
    }

    #[test]
    fn successful_load_shows_everything() {
        let state = loaded();
        assert_eq!(state.status, LoadStatus::Succeeded);
        assert_eq!(state.visible_count(), 4);
        assert_eq!(state.snapshot.summary.unique_makes, 3);
    }

    #[test]
    fn failed_load_settles_on_empty_data() {
        let mut state = loaded();
        state.finish_load(parse_reader("".as_bytes()));
        assert!(matches!(state.status, LoadStatus::Failed(_)));
        assert!(state.dataset.is_empty());
        assert_eq!(state.visible_count(), 0);
        assert_eq!(state.snapshot.summary.average_range, 0);
    }

    #[test]
    fn each_update_recomputes_from_the_full_dataset() {
        let mut state = loaded();
        state.set_filter(FilterField::Make, "tesla");
        assert_eq!(state.visible_count(), 2);

        state.set_filter(FilterField::Make, "toyota");
        assert_eq!(state.visible_count(), 1);

        state.set_filter(FilterField::Make, "");
        state.set_search("seattle");
        assert_eq!(state.visible_count(), 2);
        assert_eq!(
            state.visible_rows().map(|r| r.get("Model").unwrap_or("")).collect::<Vec<_>>(),
            vec!["MODEL 3", "MODEL Y"]
        );

        state.clear_filters();
        assert_eq!(state.visible_count(), 4);
    }

    #[test]
    fn filter_change_resets_the_page() {
        let mut state = loaded();
        state.pagination.set_rows_per_page(1);
        state.pagination.go_to_page(3, state.visible_count());
        assert_eq!(state.pagination.first, 3);
        state.set_filter(FilterField::Year, "2021");
        assert_eq!(state.pagination.first, 0);
    }

    #[test]
    fn pagination_windows() {
        let mut page = Pagination::default();
        assert_eq!(page.page_of(0), (0, 1));
        assert_eq!(page.window(0), (0, 0));
        assert_eq!(page.page_of(25), (0, 3));

        page.go_to_page(2, 25);
        assert_eq!(page.window(25), (20, 25));
        page.go_to_page(9, 25);
        assert_eq!(page.first, 20);

        page.set_rows_per_page(50);
        assert_eq!(page.window(25), (0, 25));
    }

    #[test]
    fn oversized_page_size_shows_every_row() {
        let mut page = Pagination::default();
        page.set_rows_per_page(usize::MAX);
        assert_eq!(page.page_of(25), (0, 1));
        assert_eq!(page.window(25), (0, 25));
        page.go_to_page(4, 25);
        assert_eq!(page.window(25), (0, 25));

        let state = AppState::with_page_size(usize::MAX);
        assert_eq!(state.pagination.window(3), (0, 3));
    }

    #[test]
    fn background_load_is_adopted_by_polling() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(CSV.as_bytes()).unwrap();

        let mut state = AppState::default();
        state.start_load(file.path().to_path_buf());
        assert!(state.is_loading());

        let deadline = Instant::now() + Duration::from_secs(10);
        while !state.poll_load() {
            assert!(Instant::now() < deadline, "load never finished");
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(state.status, LoadStatus::Succeeded);
        assert_eq!(state.visible_count(), 4);
        assert!(!state.poll_load());
    }

    #[test]
    fn blocking_load_of_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::default();
        state.load_blocking(dir.path().join("missing.csv"));
        assert!(matches!(state.status, LoadStatus::Failed(_)));
        assert!(state.dataset.is_empty());
    }
}
