pub mod app;
pub mod edit;
pub mod popover;
pub mod table;

pub use app::{App, COUNTRIES_QUERY, SaveOutcome, TAXES_QUERY, View};
pub use edit::{EditController, EditForm, EditSession, SaveRequest, ValidationError};
pub use popover::Popover;
pub use table::{Column, ColumnKind, TableEvent, TableView, columns};
