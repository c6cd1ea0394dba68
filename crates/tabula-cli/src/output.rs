//! Terminal rendering of tables, drafts and weather reports

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use tabula_client::WeatherReport;
use tabula_core::{PrimaryKeyDraft, Row, TableMetadata};

/// Cells longer than this are cut in row listings
const MAX_CELL_CHARS: usize = 60;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn truncate(text: String) -> String {
    if text.chars().count() <= MAX_CELL_CHARS {
        return text;
    }
    let mut cut: String = text.chars().take(MAX_CELL_CHARS - 1).collect();
    cut.push('…');
    cut
}

/// Rows in column order, structured cells as compact JSON
pub fn rows_table(columns: &[String], rows: &[Row]) -> Table {
    let mut table = new_table();
    let mut header = vec![Cell::new("#")];
    header.extend(columns.iter().map(Cell::new));
    table.set_header(header);

    for (index, row) in rows.iter().enumerate() {
        let mut cells = vec![index.to_string()];
        cells.extend(columns.iter().map(|col| truncate(row.display_value(col))));
        table.add_row(cells);
    }
    table
}

pub fn metadata_table(metadata: &TableMetadata) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Column", "Primary key", "Editable"]);

    for column in metadata.columns() {
        let pk_position = metadata
            .primary_key_columns()
            .iter()
            .position(|c| c == column)
            .map(|i| (i + 1).to_string())
            .unwrap_or_default();
        let editable = if metadata.is_editable(column) { "yes" } else { "" };
        table.add_row(vec![column.clone(), pk_position, editable.to_string()]);
    }
    table
}

pub fn draft_table(draft: &PrimaryKeyDraft) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Primary key", "Value"]);
    for (column, value) in draft.iter() {
        table.add_row(vec![column.clone(), value.clone()]);
    }
    table
}

pub fn table_list(tables: &[String]) -> String {
    tables.join("\n")
}

fn date_label(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%A, %B %-d").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

/// Current conditions followed by the five-day forecast
pub fn weather_report(report: &WeatherReport) -> String {
    let mut lines = Vec::new();
    let current = &report.current;

    lines.push(format!(
        "Coordinates for \"{}\": Lat={}, Lon={}",
        report.name, report.coord.lat, report.coord.lon
    ));
    if let Some(description) = current.description() {
        lines.push(format!("Condition: {}", description));
    }
    if let Some(temp) = current.temp {
        lines.push(format!("Temperature: {:.2}°C", temp));
    }
    if let Some(feels_like) = current.feels_like {
        lines.push(format!("Feels Like: {:.2}°C", feels_like));
    }
    if let Some(pressure) = current.pressure {
        lines.push(format!("Pressure: {} hPa", pressure));
    }
    if let Some(humidity) = current.humidity {
        lines.push(format!("Humidity: {}%", humidity));
    }
    if let Some(visibility) = current.visibility {
        lines.push(format!("Visibility: {} meters", visibility));
    }
    if let Some(wind_speed) = current.wind_speed {
        lines.push(format!("Wind Speed: {} m/s", wind_speed));
    }

    let forecast = report.forecast();
    if !forecast.is_empty() {
        let mut table = new_table();
        table.set_header(vec!["Date", "Temp (Day)", "Humidity", "Description"]);
        for day in forecast {
            table.add_row(vec![
                date_label(day.dt),
                day.temp
                    .day
                    .map(|t| format!("{:.2}°C", t))
                    .unwrap_or_default(),
                day.humidity.map(|h| format!("{}%", h)).unwrap_or_default(),
                day.description().unwrap_or_default().to_string(),
            ]);
        }
        lines.push(String::new());
        lines.push(format!("{}-Day Forecast", forecast.len()));
        lines.push(table.to_string());
    }

    lines.join("\n")
}
