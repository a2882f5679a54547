//! FILENAME: app/src/render.rs
// PURPOSE: Plain-text rendering of dashboard views for the terminal.

use engine::{format_count, format_metric, Field, Metric, Record};
use pivot_engine::{Crosstab, DrillView, FilterOptions, Group, Insights, RankedGroup, Superlative};

use crate::api_types::{DashboardResponse, ExportResponse, LoadResponse};

const GROUP_METRICS: [Metric; 5] = [
    Metric::Count,
    Metric::Smv,
    Metric::Oh,
    Metric::Other,
    Metric::Total,
];

// ============================================================================
// TABLES
// ============================================================================

/// Aligned text table: first column left-aligned, the rest right-aligned.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    out.push_str(&format_row(headers, &widths));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row, &widths));
        out.push('\n');
    }
    out
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    let parts: Vec<String> = widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            if i == 0 {
                format!("{:<w$}", cell, w = *w)
            } else {
                format!("{:>w$}", cell, w = *w)
            }
        })
        .collect();
    parts.join("  ").trim_end().to_string()
}

fn group_headers(first: &str) -> Vec<String> {
    std::iter::once(first.to_string())
        .chain(GROUP_METRICS.iter().map(|m| m.display_name().to_string()))
        .collect()
}

fn group_cells(label: &str, group: &Group) -> Vec<String> {
    std::iter::once(label.to_string())
        .chain(GROUP_METRICS.iter().map(|m| format_metric(*m, group.metric(*m))))
        .collect()
}

// ============================================================================
// PANELS
// ============================================================================

pub fn render_kpis(kpis: &Group) -> String {
    render_table(&group_headers(""), &[group_cells("Solutions", kpis)])
}

/// Ranking table; the top ranks are starred.
pub fn render_rankings(field: Field, rankings: &[RankedGroup]) -> String {
    let mut headers = vec!["#".to_string()];
    headers.extend(group_headers(field.display_name()));

    let rows: Vec<Vec<String>> = rankings
        .iter()
        .map(|r| {
            let marker = if r.is_top {
                format!("{}*", r.rank)
            } else {
                r.rank.to_string()
            };
            std::iter::once(marker)
                .chain(group_cells(&r.label, &r.group))
                .collect()
        })
        .collect();
    render_table(&headers, &rows)
}

/// Matrix of "total (count)" cells; empty combinations show "-".
pub fn render_matrix(matrix: &Crosstab) -> String {
    if matrix.row_labels.is_empty() {
        return "No data\n".to_string();
    }

    let corner = format!(
        "{} \\ {}",
        matrix.axes.row_field.display_name(),
        matrix.axes.col_field.display_name()
    );
    let headers: Vec<String> = std::iter::once(corner)
        .chain(matrix.col_labels.iter().cloned())
        .chain(std::iter::once("Total".to_string()))
        .collect();

    let mut rows: Vec<Vec<String>> = matrix
        .row_labels
        .iter()
        .zip(matrix.cells.iter().zip(matrix.row_totals.iter()))
        .map(|(label, (cells, row_total))| {
            std::iter::once(label.clone())
                .chain(cells.iter().map(matrix_cell))
                .chain(std::iter::once(matrix_cell(row_total)))
                .collect()
        })
        .collect();

    rows.push(
        std::iter::once("Total".to_string())
            .chain(matrix.col_totals.iter().map(matrix_cell))
            .chain(std::iter::once(matrix_cell(&matrix.grand_total)))
            .collect(),
    );

    render_table(&headers, &rows)
}

fn matrix_cell(group: &Group) -> String {
    if group.is_empty() {
        "-".to_string()
    } else {
        format!(
            "{} ({})",
            format_metric(Metric::Total, group.total()),
            format_count(group.count)
        )
    }
}

pub fn render_insights(insights: &Insights) -> String {
    if !insights.has_data() {
        return "No insights: the current filters match no solutions.\n".to_string();
    }

    let mut out = String::new();
    push_superlative(&mut out, "Top division by total savings", &insights.top_division, Metric::Total);
    push_superlative(&mut out, "Best SMV unlock", &insights.best_smv, Metric::Smv);
    push_superlative(&mut out, "Best OH reduction", &insights.best_oh, Metric::Oh);
    push_superlative(&mut out, "Most solutions", &insights.most_solutions, Metric::Count);
    out.push_str(&format!(
        "Commercialized solutions: {}\n",
        format_count(insights.commercialized as u64)
    ));
    out.push_str(&format!(
        "R&D solutions: {}\n",
        format_count(insights.r_and_d as u64)
    ));
    out
}

fn push_superlative(out: &mut String, caption: &str, value: &Option<Superlative>, metric: Metric) {
    if let Some(s) = value {
        out.push_str(&format!(
            "{}: {} ({})\n",
            caption,
            s.label,
            format_metric(metric, s.value)
        ));
    }
}

pub fn render_records(records: &[Record]) -> String {
    let headers: Vec<String> = persistence::EXPORT_HEADERS
        .iter()
        .map(|h| h.to_string())
        .collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| {
            vec![
                r.name.clone(),
                r.division.clone(),
                r.focus_area.clone(),
                r.stage.clone(),
                format_metric(Metric::Smv, r.smv),
                format_metric(Metric::Oh, r.oh),
                format_metric(Metric::Other, r.other),
                format_metric(Metric::Total, r.total()),
            ]
        })
        .collect();
    render_table(&headers, &rows)
}

pub fn render_drill(view: &DrillView) -> String {
    let mut out = format!("{}\n{}\n", view.title, view.subtitle);
    if view.fell_back {
        out.push_str("No solutions match this selection; showing all filtered solutions.\n");
    }
    out.push('\n');
    out.push_str(&render_kpis(&view.totals));
    out.push('\n');
    out.push_str(&render_records(&view.records));
    out
}

pub fn render_options(options: &FilterOptions) -> String {
    let mut out = String::new();
    for (caption, values) in [
        ("Divisions", &options.divisions),
        ("Stages", &options.stages),
        ("Focus Areas", &options.focus_areas),
    ] {
        out.push_str(&format!("{} ({}):\n", caption, values.len()));
        for value in values {
            out.push_str(&format!("  {}\n", value));
        }
    }
    out
}

pub fn render_summary(response: &DashboardResponse) -> String {
    let status = if response.connected { "Connected" } else { "Disconnected" };
    let mut out = format!(
        "{}\nLast refresh: {} ({}), next in {}s\n\n",
        response.filter_message,
        response.last_refresh.as_deref().unwrap_or("never"),
        status,
        response.seconds_until_refresh
    );
    out.push_str(&render_kpis(&response.view.kpis));
    out.push('\n');
    out.push_str(&render_rankings(Field::Division, &response.view.rankings));
    out.push('\n');
    out.push_str(&render_insights(&response.view.insights));
    out
}

pub fn render_load(response: &LoadResponse) -> String {
    format!(
        "Loaded {} solutions from {} at {}\n",
        format_count(response.record_count as u64),
        response.source.as_deref().unwrap_or("memory"),
        response.loaded_at
    )
}

pub fn render_export(response: &ExportResponse) -> String {
    format!(
        "Exported {} rows ({:?}, {:?}) to {}\n",
        format_count(response.rows as u64),
        response.format,
        response.scope,
        response.path
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{canonicalize, ColumnKeys, RawRecord};
    use pivot_engine::{build_crosstab, extract_insights};

    fn records() -> Vec<Record> {
        let rows = vec![
            RawRecord::new()
                .with("Division", "Ops")
                .with("Stage", "Pilot")
                .with("Focus Area", "Cost")
                .with("SMV Unlock", "2")
                .with("OH Reduction", "1"),
            RawRecord::new()
                .with("Division", "IT")
                .with("Stage", "R&D")
                .with("Focus Area", "Quality")
                .with("OH Reduction", "1500"),
        ];
        canonicalize(&rows, &ColumnKeys::default())
    }

    #[test]
    fn test_render_table_alignment() {
        let headers = vec!["Name".to_string(), "Total".to_string()];
        let rows = vec![
            vec!["A".to_string(), "1.00".to_string()],
            vec!["Longer".to_string(), "1,000.00".to_string()],
        ];
        let text = render_table(&headers, &rows);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name       Total");
        assert_eq!(lines[1], "------  --------");
        assert_eq!(lines[2], "A           1.00");
        assert_eq!(lines[3], "Longer  1,000.00");
    }

    #[test]
    fn test_render_matrix_marks_empty_cells() {
        let records = records();
        let refs: Vec<&Record> = records.iter().collect();
        let text = render_matrix(&build_crosstab(&refs, Field::Stage, Field::FocusArea));
        assert!(text.starts_with("Stage \\ Focus Area"));
        assert!(text.contains("-"));
        assert!(text.contains("1,500.00 (1)"));
        assert!(text.lines().last().unwrap().starts_with("Total"));
    }

    #[test]
    fn test_render_empty_matrix() {
        let refs: Vec<&Record> = Vec::new();
        let text = render_matrix(&build_crosstab(&refs, Field::Stage, Field::FocusArea));
        assert_eq!(text, "No data\n");
    }

    #[test]
    fn test_render_insights() {
        let records = records();
        let refs: Vec<&Record> = records.iter().collect();
        let text = render_insights(&extract_insights(&refs));
        assert!(text.contains("Top division by total savings: IT (1,500.00)"));
        assert!(text.contains("Best SMV unlock: Ops (2.000)"));
        assert!(text.contains("R&D solutions: 1"));
        assert!(text.contains("Commercialized solutions: 0"));
    }

    #[test]
    fn test_render_insights_empty() {
        let text = render_insights(&Insights::default());
        assert!(text.starts_with("No insights"));
    }
}
