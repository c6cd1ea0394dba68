//! Command implementations
//!
//! Table commands drive a [`TableBrowser`] through the same events an
//! interactive front-end would send, so validation, refresh-after-write and
//! error messages are identical.

use anyhow::{Context, Result};
use std::sync::Arc;
use tabula_client::{HttpBackend, WeatherClient, WeatherQuery};
use tabula_core::{DbBackend, SortDirection};
use tabula_services::{
    AlwaysConfirm, BrowserEvent, BrowserState, ConfirmDelete, EventOutcome, MetadataResolver,
    TableBrowser,
};

use crate::confirm::PromptConfirm;
use crate::settings::TabulaSettings;
use crate::{Cli, Command, SortArgs, WeatherCommand, logging, output};

pub async fn run(cli: Cli, settings: TabulaSettings) -> Result<()> {
    let client_config = settings.client_config(cli.api_base_url.as_deref());
    tracing::debug!(base_url = %client_config.base_url, "backend configured");
    let backend = || -> Result<Arc<dyn DbBackend>> {
        Ok(Arc::new(HttpBackend::new(&client_config)?))
    };

    match cli.command {
        Command::Tables => {
            let tables = backend()?
                .list_tables()
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Error fetching tables.")))?;
            println!("{}", output::table_list(&tables));
        }
        Command::Describe { table } => {
            let metadata = MetadataResolver::new(backend()?).resolve(&table).await?;
            println!("{}", output::metadata_table(&metadata));
            if let Some(column) = metadata.default_sort_column() {
                println!("Default sort: {} {}", column, SortDirection::Asc);
            }
        }
        Command::Rows { table, sort } => {
            let browser = browser(backend()?, &settings, Arc::new(AlwaysConfirm));
            let state = open_table(&browser, &table, &sort).await?;
            print_rows(&state);
        }
        Command::Select { table, row, sort } => {
            let browser = browser(backend()?, &settings, Arc::new(AlwaysConfirm));
            open_table(&browser, &table, &sort).await?;
            browser.dispatch(BrowserEvent::ClickRow(row)).await?;

            let state = browser.snapshot();
            println!("{}", output::draft_table(&state.pk_draft));
            if state.edit.target_column.is_empty() {
                println!("No editable column.");
            } else {
                println!("Field: {}", state.edit.target_column);
                println!("{}", state.edit.new_value);
            }
        }
        Command::Update {
            table,
            pk,
            field,
            value,
        } => {
            let browser = browser(backend()?, &settings, Arc::new(AlwaysConfirm));
            open_table(&browser, &table, &SortArgs::default()).await?;
            fill_primary_key(&browser, pk).await?;
            if let Some(field) = field {
                browser.dispatch(BrowserEvent::SelectField(field)).await?;
            }
            browser.dispatch(BrowserEvent::EditValue(value)).await?;

            let outcome = browser.dispatch(BrowserEvent::SubmitUpdate).await?;
            report_mutation(&browser, outcome);
        }
        Command::Delete { table, pk, yes } => {
            let confirm: Arc<dyn ConfirmDelete> = if yes {
                Arc::new(AlwaysConfirm)
            } else {
                Arc::new(PromptConfirm)
            };
            let browser = browser(backend()?, &settings, confirm);
            open_table(&browser, &table, &SortArgs::default()).await?;
            fill_primary_key(&browser, pk).await?;

            let outcome = browser.dispatch(BrowserEvent::SubmitDelete).await?;
            report_mutation(&browser, outcome);
        }
        Command::Suggest { query } => {
            let client = WeatherClient::new(&client_config)?;
            let suggestions = client
                .suggest_locations(&query)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Error fetching suggestions.")))?;
            if suggestions.is_empty() {
                eprintln!("No suggestions.");
            }
            for suggestion in suggestions {
                println!("{}", suggestion);
            }
        }
        Command::Weather { query } => {
            let query = weather_query(query)?;
            let client = WeatherClient::new(&client_config)?;
            let report = client
                .current_weather(&query)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message("Error fetching weather data.")))?;
            println!("{}", output::weather_report(&report));
        }
        Command::Settings { init } => show_settings(&settings, init)?,
    }
    Ok(())
}

fn browser(
    backend: Arc<dyn DbBackend>,
    settings: &TabulaSettings,
    confirm: Arc<dyn ConfirmDelete>,
) -> TableBrowser {
    TableBrowser::new(backend, settings.browser_config(), confirm)
}

/// Select `table` and apply the requested ordering.
///
/// The direction is set first so that the selection fetches rows in the
/// final direction; an explicit sort column costs one more row fetch.
async fn open_table(browser: &TableBrowser, table: &str, sort: &SortArgs) -> Result<BrowserState> {
    if sort.desc {
        browser
            .dispatch(BrowserEvent::SetSortDirection(SortDirection::Desc))
            .await?;
    }
    browser
        .dispatch(BrowserEvent::SelectTable(table.to_string()))
        .await?;
    if let Some(column) = &sort.sort_by {
        browser
            .dispatch(BrowserEvent::SetSortColumn(column.clone()))
            .await?;
    }
    Ok(browser.snapshot())
}

async fn fill_primary_key(browser: &TableBrowser, pk: Vec<(String, String)>) -> Result<()> {
    for (column, value) in pk {
        browser
            .dispatch(BrowserEvent::EditPrimaryKey { column, value })
            .await?;
    }
    Ok(())
}

fn print_rows(state: &BrowserState) {
    let Some(metadata) = &state.metadata else {
        return;
    };
    println!("{}", output::rows_table(metadata.columns(), &state.rows));
    println!(
        "{} rows from '{}', sorted by {}",
        state.rows.len(),
        metadata.table_name(),
        state.sort_label()
    );
}

fn report_mutation(browser: &TableBrowser, outcome: EventOutcome) {
    let state = browser.snapshot();
    for line in mutation_report(&outcome, &state) {
        match line {
            ReportLine::Info(text) => println!("{}", text),
            ReportLine::Warning(text) => eprintln!("Warning: {}", text),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ReportLine {
    Info(String),
    Warning(String),
}

fn mutation_report(outcome: &EventOutcome, state: &BrowserState) -> Vec<ReportLine> {
    let mut lines = Vec::new();
    match outcome {
        EventOutcome::Applied { message } => {
            if !message.is_empty() {
                lines.push(ReportLine::Info(message.clone()));
            }
            match &state.last_error {
                Some(error) => lines.push(ReportLine::Warning(format!(
                    "the change was applied but the rows could not be refreshed: {}",
                    error
                ))),
                None => lines.push(ReportLine::Info(format!(
                    "{} rows after refresh.",
                    state.rows.len()
                ))),
            }
        }
        EventOutcome::Cancelled => lines.push(ReportLine::Info("Delete cancelled.".to_string())),
        EventOutcome::Done | EventOutcome::Superseded => {}
    }
    lines
}

fn weather_query(command: WeatherCommand) -> Result<WeatherQuery> {
    Ok(match command {
        WeatherCommand::City { name } => WeatherQuery::City { city: name },
        WeatherCommand::Zip { zip, country } => WeatherQuery::Zip { zip, country },
        WeatherCommand::Gps { coordinates } => WeatherQuery::parse_gps(&coordinates)?,
    })
}

fn show_settings(settings: &TabulaSettings, init: bool) -> Result<()> {
    if init {
        let path = TabulaSettings::default()
            .save()
            .context("Failed to write default settings")?;
        println!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    let path = TabulaSettings::settings_path()?;
    println!("Settings file: {}", path.display());
    println!("Log directory: {}", logging::log_directory().display());
    println!("{}", serde_json::to_string_pretty(settings)?);
    Ok(())
}
