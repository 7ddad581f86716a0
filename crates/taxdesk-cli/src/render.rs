//! Plain-text rendering of the root views, the records table, and the edit
//! form.

use taxdesk_app::{App, ColumnKind, EditForm, View, columns};
use taxdesk_client::RecordStore;
use taxdesk_core::EnrichedTaxRecord;

/// Print whatever the root composition currently derives: the loading or
/// error view, or the table plus the edit form when a session is open.
pub fn print_view<S: RecordStore>(app: &App<S>) {
    match app.view() {
        View::Loading => println!("Loading..."),
        View::LoadFailed => println!("Error loading data"),
        View::Table { rows } => {
            print_table(&rows);
            if !app.table.filter().is_empty() {
                let active: Vec<&str> = app.table.filter().iter().map(String::as_str).collect();
                println!("Country filter: {}", active.join(", "));
            }
        }
    }
    if let Some(form) = app.edit.form() {
        print_form(form, app.countries());
    }
}

/// Aligned column layout, one row per visible record, with a leading row
/// index for the `edit <row>` command.
fn print_table(rows: &[&EnrichedTaxRecord]) {
    let cols = columns();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| cols.iter().map(|col| cell(row, col.kind)).collect())
        .collect();

    let mut widths: Vec<usize> = cols.iter().map(|col| col.header.len()).collect();
    for row in &cells {
        for (i, value) in row.iter().enumerate() {
            widths[i] = widths[i].max(value.len());
        }
    }
    let index_width = rows.len().saturating_sub(1).to_string().len().max(1);

    print!("{:>index_width$}  ", "#");
    for (i, col) in cols.iter().enumerate() {
        print!("{:<width$}  ", col.header, width = widths[i]);
    }
    println!();
    for (n, row) in cells.iter().enumerate() {
        print!("{n:>index_width$}  ");
        for (i, value) in row.iter().enumerate() {
            print!("{:<width$}  ", value, width = widths[i]);
        }
        println!();
    }
    println!("{} row(s)", rows.len());
}

fn cell(row: &EnrichedTaxRecord, kind: ColumnKind) -> String {
    match kind {
        ColumnKind::Entity => row.name().to_string(),
        ColumnKind::Gender => row.gender.to_string(),
        ColumnKind::RequestDate => row.request_date.to_string(),
        ColumnKind::Country => row.country().to_string(),
        ColumnKind::Actions => String::new(),
    }
}

fn print_form(form: &EditForm, countries: &[String]) {
    println!();
    println!("=== Edit Customer ===");
    println!("  {:<10} {}", "Name *", form.name);
    println!("  {:<10} {}", "Country", form.country);
    if form.country_picker.is_open() {
        for country in countries {
            let marker = if *country == form.country { ">" } else { " " };
            println!("    {marker} {country}");
        }
    }
    println!("  (name <value> | country <value> | save | cancel)");
}
