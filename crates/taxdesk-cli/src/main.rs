//! taxdesk: terminal viewer and editor for the remote tax record store.

mod render;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use clap::Parser;
use taxdesk_app::{App, SaveOutcome};
use taxdesk_client::{ApiClient, DEFAULT_BASE_URL};
use taxdesk_query::QueryClient;

#[derive(Parser)]
#[command(
    name = "taxdesk",
    about = "Terminal viewer for remote tax customer records",
    version
)]
struct Cli {
    /// Base URL of the record store API.
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    api_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    tracing::info!("taxdesk v{}", env!("CARGO_PKG_VERSION"));

    let store = Arc::new(ApiClient::new(cli.api_url));
    let queries = Arc::new(QueryClient::new());
    let mut app = App::new(store, queries);

    println!("Loading...");
    app.load().await;
    render::print_view(&app);

    repl(&mut app).await
}

const HELP: &str = "\
commands:
  rows               render the table
  countries          list country options
  filter <country>   toggle a country in the filter
  filter clear       clear the filter
  edit <row>         open the edit form for a visible row
  name <value>       set the name field of the open form
  country <value>    pick a country for the open form
  save               submit the open form
  cancel             discard the open form
  refresh            refetch records from the store
  quit";

async fn repl(app: &mut App<ApiClient>) -> anyhow::Result<()> {
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim();
        let (cmd, arg) = match line.split_once(' ') {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (line, ""),
        };

        match cmd {
            "" => {}
            "help" => println!("{HELP}"),
            "rows" => render::print_view(app),
            "countries" => {
                for country in app.countries() {
                    println!("  {country}");
                }
            }
            "filter" => {
                if arg == "clear" {
                    app.table.clear_filter();
                } else if arg.is_empty() {
                    println!("usage: filter <country> | filter clear");
                    continue;
                } else {
                    app.table.toggle_country(arg);
                }
                render::print_view(app);
            }
            "edit" => match arg.parse::<usize>() {
                Ok(row) => {
                    if app.request_edit(row) {
                        render::print_view(app);
                    } else {
                        println!("no such row: {row}");
                    }
                }
                Err(_) => println!("usage: edit <row>"),
            },
            "name" => {
                app.edit.set_name(arg);
                render::print_view(app);
            }
            "country" => {
                // Picker semantics: only known countries, never free text.
                if app.countries().iter().any(|c| c == arg) {
                    app.edit.select_country(arg);
                    render::print_view(app);
                } else {
                    println!("unknown country: {arg}");
                }
            }
            "save" => match app.save().await {
                Ok(SaveOutcome::Saved) | Ok(SaveOutcome::Failed(_)) => render::print_view(app),
                Err(err) => println!("{err}"),
            },
            "cancel" => {
                app.edit.cancel();
                render::print_view(app);
            }
            "refresh" => {
                app.refresh().await;
                render::print_view(app);
            }
            "quit" | "exit" => return Ok(()),
            other => println!("unknown command: {other} (try `help`)"),
        }
    }
}
