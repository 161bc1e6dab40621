use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde_json::json;

use query_lens::chart::ViewKind;
use query_lens::config::PipelineConfig;
use query_lens::data::filter::parse_facet_filters;
use query_lens::data::loader::load_file;
use query_lens::data::sort::SortSpec;
use query_lens::query::{QueryRequest, QueryService, StaticQueryExecutor};
use query_lens::state::AppState;
use query_lens::ui::{panels, plot, table};

/// Run queries against a data directory and view the results as tables,
/// charts or CSV.
#[derive(Parser)]
#[command(name = "query-lens")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding `<table>.json` files
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    /// JSON file overriding pipeline settings
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print derived models as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query and show the result table
    Query {
        /// e.g. "select * from customers"
        sql: String,
        #[command(flatten)]
        view: TableArgs,
    },
    /// Show the table for a saved query response
    Show {
        /// Path to a `.json` response or headers/rows payload
        file: PathBuf,
        #[command(flatten)]
        view: TableArgs,
    },
    /// Run a query and draw a chart
    Chart {
        sql: String,
        /// bar or line
        #[arg(long, default_value = "bar")]
        kind: ViewKind,
        /// Column for the x axis (string or date)
        #[arg(long)]
        x: Option<String>,
        /// Column for the y axis (number or currency)
        #[arg(long)]
        y: Option<String>,
    },
    /// Run a query and write selected rows as CSV
    Export {
        sql: String,
        /// Row numbers as shown in the table's `#` column
        #[arg(long, value_delimiter = ',', conflicts_with = "all")]
        rows: Vec<usize>,
        /// Export every row that passes the filters
        #[arg(long)]
        all: bool,
        /// Directory the CSV file is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        #[command(flatten)]
        view: TableArgs,
    },
}

#[derive(Args)]
struct TableArgs {
    /// Facet filter `key=value`; repeat to allow several values
    #[arg(long = "facet")]
    facets: Vec<String>,
    /// Text searched in the search column
    #[arg(long)]
    search: Option<String>,
    /// Sort column, `key` or `key:desc`
    #[arg(long)]
    sort: Option<SortSpec>,
    /// Page to show, starting at 1
    #[arg(long, default_value = "1")]
    page: usize,
}

impl TableArgs {
    fn apply(&self, state: &mut AppState) {
        state.set_filters(parse_facet_filters(&self.facets));
        if let Some(text) = &self.search {
            state.set_search(text);
        }
        state.set_sort(self.sort.clone());
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = PipelineConfig::load_or_default(cli.config.as_deref())?;
    let mut state = AppState::new(config);

    match &cli.command {
        Commands::Query { sql, view } => {
            run_query(&mut state, &cli.data_dir, sql)?;
            view.apply(&mut state);
            print_table(&state, view.page, cli.json)?;
        }
        Commands::Show { file, view } => {
            let result = load_file(file)
                .with_context(|| format!("loading {}", file.display()))?;
            state.set_result(result);
            view.apply(&mut state);
            print_table(&state, view.page, cli.json)?;
        }
        Commands::Chart { sql, kind, x, y } => {
            run_query(&mut state, &cli.data_dir, sql)?;
            if let Some(key) = x {
                if !state.set_x_axis(key) {
                    bail!("'{key}' is not a string or date column");
                }
            }
            if let Some(key) = y {
                if !state.set_y_axis(key) {
                    bail!("'{key}' is not a number or currency column");
                }
            }
            if state.set_view(*kind) != *kind {
                log::warn!("Result has no chartable columns, showing the table");
            }
            if cli.json {
                let points = state.chart_points();
                let out = json!({ "chart": state.chart_spec(), "points": points, "axes": state.axes });
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else {
                match plot::render_chart(&state) {
                    Some(text) => print!("{text}"),
                    None => print_table(&state, 1, false)?,
                }
            }
        }
        Commands::Export {
            sql,
            rows,
            all,
            out_dir,
            view,
        } => {
            run_query(&mut state, &cli.data_dir, sql)?;
            view.apply(&mut state);
            if *all {
                state.select_all_visible(true);
            } else {
                for &row in rows {
                    state.toggle_row(row);
                }
            }
            match state.export_selected(Utc::now())? {
                Some(artifact) => {
                    let path = artifact.write_to(out_dir)?;
                    println!("{} -> {}", state.selection_summary(), path.display());
                }
                None => println!("No rows selected, nothing exported"),
            }
        }
    }
    Ok(())
}

fn run_query(state: &mut AppState, data_dir: &Path, sql: &str) -> Result<()> {
    let executor = StaticQueryExecutor::new(data_dir);
    state.apply_response(executor.execute(&QueryRequest::new(sql)));
    if let Some(message) = &state.status_message {
        bail!("{message}");
    }
    Ok(())
}

fn print_table(state: &AppState, page: usize, as_json: bool) -> Result<()> {
    let page = page.saturating_sub(1);
    if as_json {
        let rows: Vec<_> = state.page(page).iter().map(|&i| &state.records[i]).collect();
        let out = json!({
            "columns": state.columns,
            "rows": rows,
            "visible": state.visible_indices.len(),
            "pages": state.page_count(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }
    println!("{}", panels::status_line(state));
    print!("{}", panels::toolbar(state));
    print!("{}", table::render_table(state, page));
    Ok(())
}
