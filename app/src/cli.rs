//! FILENAME: app/src/cli.rs
// PURPOSE: Command-line front end over the dashboard commands.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{format_count, format_metric, Field, Metric};
use persistence::ExportFormat;
use pivot_engine::CrosstabAxes;
use serde::Serialize;

use crate::api_types::{DrillRequest, FilterRequest};
use crate::commands::{
    apply_filters, drill_through, export_active, get_dashboard, get_filter_options, get_insights,
    get_matrix, get_rankings, load_data, seconds_until_refresh,
};
use crate::logging::{init_logger, parse_level};
use crate::{create_app_state, lock, log_info, log_warn, render, AppState, DashboardConfig};

// ============================================================================
// ARGUMENTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FieldArg {
    Division,
    Name,
    Focus,
    Stage,
}

impl From<FieldArg> for Field {
    fn from(value: FieldArg) -> Self {
        match value {
            FieldArg::Division => Field::Division,
            FieldArg::Name => Field::Name,
            FieldArg::Focus => Field::FocusArea,
            FieldArg::Stage => Field::Stage,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MetricArg {
    Count,
    Smv,
    Oh,
    Other,
    Total,
}

impl From<MetricArg> for Metric {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Count => Metric::Count,
            MetricArg::Smv => Metric::Smv,
            MetricArg::Oh => Metric::Oh,
            MetricArg::Other => Metric::Other,
            MetricArg::Total => Metric::Total,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Xlsx,
}

impl From<FormatArg> for ExportFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Xlsx => ExportFormat::Xlsx,
        }
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "dashboard",
    about = "Solution savings dashboard",
    long_about = "Loads the solution list workbook, applies the dropdown/search filters \
                  and prints KPIs, the stage x focus area matrix, division rankings, \
                  insights, drill-through pages and exports."
)]
pub struct Cli {
    #[arg(long, value_name = "FILE", help = "JSON config file (defaults apply when omitted)")]
    pub config: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Source workbook, overrides the config")]
    pub source: Option<PathBuf>,

    #[arg(long, help = "Worksheet name (first sheet when omitted)")]
    pub sheet: Option<String>,

    #[arg(long, help = "Only this division")]
    pub division: Option<String>,

    #[arg(long, help = "Only this stage")]
    pub stage: Option<String>,

    #[arg(long = "focus", help = "Only this focus area")]
    pub focus_area: Option<String>,

    #[arg(long, help = "Case-insensitive solution name search")]
    pub search: Option<String>,

    #[arg(long, help = "Print JSON instead of text tables")]
    pub json: bool,

    #[arg(long, help = "Log level: error, warn, info, debug, trace")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// KPIs, division rankings and insights
    Summary,
    /// Crosstab of two fields
    Matrix {
        #[arg(long, value_enum, default_value_t = FieldArg::Stage)]
        rows: FieldArg,
        #[arg(long, value_enum, default_value_t = FieldArg::Focus)]
        cols: FieldArg,
    },
    /// Groups ranked by a metric, largest first
    Rankings {
        #[arg(long, value_enum, default_value_t = FieldArg::Division)]
        by: FieldArg,
        #[arg(long, value_enum, default_value_t = MetricArg::Total)]
        metric: MetricArg,
    },
    /// Headline facts about the filtered solutions
    Insights,
    /// Records behind a matrix cell, total or division
    Drill(DrillArgs),
    /// Write the active records (drill subset when drilling) to a file
    Export {
        #[arg(long, value_enum, help = "Output format (from the file extension when omitted)")]
        format: Option<FormatArg>,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        #[command(flatten)]
        drill: DrillArgs,
    },
    /// Values offered by the filter dropdowns
    Options,
    /// Reload every refresh interval and print the summary
    Watch {
        #[arg(long, help = "Stop after this many reloads")]
        ticks: Option<u64>,
    },
}

/// Drill flags: a stage row and/or focus area column of the default matrix,
/// or one division from the rankings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub struct DrillArgs {
    #[arg(long = "stage", help = "Matrix row (stage)")]
    pub row: Option<String>,

    #[arg(long = "focus", help = "Matrix column (focus area)")]
    pub col: Option<String>,

    #[arg(long = "division", conflicts_with_all = ["row", "col"], help = "Ranking row (division)")]
    pub division: Option<String>,
}

impl DrillArgs {
    /// None when no drill flag is set.
    pub fn to_request(&self) -> Option<DrillRequest> {
        if let Some(label) = &self.division {
            return Some(DrillRequest::Division {
                label: label.clone(),
            });
        }
        if self.row.is_none() && self.col.is_none() {
            return None;
        }
        Some(DrillRequest::Matrix {
            axes: CrosstabAxes::default(),
            row: self.row.clone(),
            col: self.col.clone(),
        })
    }
}

impl Cli {
    pub fn filter_request(&self) -> FilterRequest {
        FilterRequest {
            division: self.division.clone(),
            stage: self.stage.clone(),
            focus_area: self.focus_area.clone(),
            search: self.search.clone(),
        }
    }

    /// The config file (or defaults) with command-line overrides applied.
    pub fn resolve_config(&self) -> Result<DashboardConfig, String> {
        let mut config = match &self.config {
            Some(path) => DashboardConfig::load(path)?,
            None => DashboardConfig::default(),
        };
        if let Some(source) = &self.source {
            config.source_path = source.clone();
        }
        if let Some(sheet) = &self.sheet {
            config.sheet_name = Some(sheet.clone());
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        Ok(config)
    }
}

// ============================================================================
// EXECUTION
// ============================================================================

pub fn run(cli: Cli) -> Result<(), String> {
    let config = cli.resolve_config()?;
    init_logger(parse_level(&config.log_level)?, config.log_path.as_deref())?;

    let state = create_app_state(config);
    let filters = cli.filter_request();

    if let Command::Watch { ticks } = cli.command {
        return watch(&state, &filters, ticks, cli.json);
    }

    load_data(&state)?;
    apply_filters(&state, filters)?;
    print!("{}", execute(&state, &cli.command, cli.json)?);
    Ok(())
}

/// Runs one command against loaded state and returns its output.
pub fn execute(state: &AppState, command: &Command, json: bool) -> Result<String, String> {
    match command {
        Command::Summary => emit(json, &get_dashboard(state)?, render::render_summary),
        Command::Matrix { rows, cols } => {
            let axes = CrosstabAxes::new((*rows).into(), (*cols).into());
            emit(json, &get_matrix(state, axes)?, render::render_matrix)
        }
        Command::Rankings { by, metric } => {
            let field: Field = (*by).into();
            let rankings = get_rankings(state, field, (*metric).into())?;
            emit(json, &rankings, |r| render::render_rankings(field, r))
        }
        Command::Insights => emit(json, &get_insights(state)?, render::render_insights),
        Command::Drill(args) => {
            let request = args.to_request().unwrap_or(DrillRequest::Matrix {
                axes: CrosstabAxes::default(),
                row: None,
                col: None,
            });
            emit(json, &drill_through(state, request)?, render::render_drill)
        }
        Command::Export { format, out, drill } => {
            if let Some(request) = drill.to_request() {
                drill_through(state, request)?;
            }
            let response = export_active(state, out.as_deref(), format.map(ExportFormat::from))?;
            emit(json, &response, render::render_export)
        }
        Command::Options => emit(json, &get_filter_options(state)?, render::render_options),
        Command::Watch { .. } => Err("watch cannot run as a one-shot command".to_string()),
    }
}

fn emit<T, F>(json: bool, value: &T, text: F) -> Result<String, String>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    if json {
        let mut out = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
        out.push('\n');
        Ok(out)
    } else {
        Ok(text(value))
    }
}

/// Reload loop: replace the snapshot, recompute, print. A failed reload
/// keeps the previous snapshot and the loop carries on.
fn watch(
    state: &AppState,
    filters: &FilterRequest,
    ticks: Option<u64>,
    json: bool,
) -> Result<(), String> {
    *lock(&state.filters)? = filters.to_predicate();

    let mut tick: u64 = 0;
    loop {
        match load_data(state) {
            Ok(response) => log_info!("WATCH", "{}", render::render_load(&response).trim_end()),
            Err(e) => log_warn!("WATCH", "Keeping previous snapshot: {}", e),
        }

        let dashboard = get_dashboard(state)?;
        log_info!(
            "WATCH",
            "KPIs: {} solutions, total {}",
            format_count(dashboard.view.kpis.count),
            format_metric(Metric::Total, dashboard.view.kpis.total())
        );
        print!("{}", emit(json, &dashboard, render::render_summary)?);

        tick += 1;
        if ticks.map_or(false, |n| tick >= n) {
            return Ok(());
        }
        let wait = seconds_until_refresh(state)?.max(1);
        std::thread::sleep(Duration::from_secs(wait));
    }
}
