use crate::infra::{build_sort, parse_date, parse_domain, parse_tab, Session};
use crate::render;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;
use vendor_kpi::dashboard::{FilterOptions, PreAwardTab};
use vendor_kpi::error::AppError;
use vendor_kpi::vendors::KpiDomain;

#[derive(Parser, Debug)]
#[command(
    name = "Vendor KPI Dashboard",
    about = "Filter, aggregate and rank vendor KPIs from the command line",
    version
)]
struct Cli {
    #[command(flatten)]
    session: SessionArgs,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the values available for each filter
    Filters,
    /// Render the KPI page for one domain
    Page(PageArgs),
    /// Render the sortable vendor table for one domain
    Table(TableArgs),
}

/// Options shared by every command.
#[derive(Args, Debug, Default)]
pub(crate) struct SessionArgs {
    /// Vendor JSON file (overrides VENDOR_DATA_PATH; bundled sample otherwise)
    #[arg(long, global = true)]
    pub(crate) data: Option<PathBuf>,
    #[command(flatten)]
    pub(crate) filters: FilterArgs,
    /// Vendor id whose own KPIs replace the aggregate
    #[arg(long, global = true)]
    pub(crate) pin: Option<String>,
    /// Date shown as the last refresh (YYYY-MM-DD). Defaults to today.
    #[arg(long, global = true, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Emit JSON instead of text
    #[arg(long, global = true)]
    pub(crate) json: bool,
}

/// Repeatable filter flags; `all` lifts the restriction on its dimension.
#[derive(Args, Debug, Default, Clone)]
pub(crate) struct FilterArgs {
    #[arg(long, global = true)]
    pub(crate) category: Vec<String>,
    #[arg(long, global = true)]
    pub(crate) sub_category: Vec<String>,
    #[arg(long, global = true)]
    pub(crate) activity: Vec<String>,
    #[arg(long, global = true)]
    pub(crate) tiering: Vec<String>,
    #[arg(long, global = true)]
    pub(crate) region: Vec<String>,
    #[arg(long, global = true)]
    pub(crate) vendor: Vec<String>,
}

#[derive(Args, Debug)]
pub(crate) struct PageArgs {
    /// pre-award, post-award or material
    #[arg(value_parser = parse_domain)]
    pub(crate) domain: KpiDomain,
    /// Pre-award tab: overview or performance
    #[arg(long, value_parser = parse_tab, default_value = "overview")]
    pub(crate) view: PreAwardTab,
}

#[derive(Args, Debug)]
pub(crate) struct TableArgs {
    /// pre-award, post-award or material
    #[arg(value_parser = parse_domain)]
    pub(crate) domain: KpiDomain,
    /// Simulate header clicks, in order (e.g. --click hseScore --click hseScore)
    #[arg(long = "click")]
    pub(crate) clicks: Vec<String>,
    #[arg(long, value_enum, default_value_t = TableFormat::Text)]
    pub(crate) format: TableFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum TableFormat {
    Text,
    Json,
    Csv,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let session = Session::open(&cli.session)?;
    let dashboard = session.dashboard();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::Filters => {
            let options = FilterOptions::from_vendors(session.repository().vendors());
            if cli.session.json {
                render::json(&mut out, &options)?;
            } else {
                render::filter_options(&mut out, &options)?;
            }
        }
        Command::Page(args) => {
            let view = dashboard.page(args.domain, args.view);
            if cli.session.json {
                render::json(&mut out, &view)?;
            } else {
                render::page(&mut out, &view)?;
            }
        }
        Command::Table(args) => {
            let sort = build_sort(args.domain, &args.clicks)?;
            let table = dashboard.table(args.domain, &sort);
            let format = if cli.session.json {
                TableFormat::Json
            } else {
                args.format
            };
            info!(domain = args.domain.key(), ?sort, rows = table.rows.len(), "rendering table");
            match format {
                TableFormat::Text => render::table(&mut out, &table)?,
                TableFormat::Json => render::json(&mut out, &table)?,
                TableFormat::Csv => render::csv(&mut out, &table)?,
            }
        }
    }

    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_table_clicks_and_filters() {
        let cli = Cli::try_parse_from([
            "vendor-kpi-dashboard",
            "table",
            "material",
            "--click",
            "otifScore",
            "--click",
            "otifScore",
            "--region",
            "Europe",
            "--region",
            "Asia",
            "--format",
            "csv",
        ])
        .expect("arguments parse");

        assert_eq!(cli.session.filters.region, ["Europe", "Asia"]);
        match cli.command {
            Command::Table(args) => {
                assert_eq!(args.domain, KpiDomain::Material);
                assert_eq!(args.clicks.len(), 2);
                assert_eq!(args.format, TableFormat::Csv);
            }
            other => panic!("expected table command, got {other:?}"),
        }
    }

    #[test]
    fn page_defaults_to_overview() {
        let cli = Cli::try_parse_from(["vendor-kpi-dashboard", "page", "pre-award", "--pin", "v-003"])
            .expect("arguments parse");
        assert_eq!(cli.session.pin.as_deref(), Some("v-003"));
        match cli.command {
            Command::Page(args) => assert_eq!(args.view, PreAwardTab::Overview),
            other => panic!("expected page command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_domain() {
        assert!(Cli::try_parse_from(["vendor-kpi-dashboard", "page", "logistics"]).is_err());
    }
}
