use serde::Serialize;
use std::io::Write;
use vendor_kpi::dashboard::views::{Gauge, StatCard};
use vendor_kpi::dashboard::{
    FilterDimension, FilterOptions, PageHeader, PageView, SortDirection, VendorTable,
};
use vendor_kpi::error::AppError;

pub(crate) fn json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<(), AppError> {
    serde_json::to_writer_pretty(&mut *out, value).map_err(|err| AppError::Render(Box::new(err)))?;
    writeln!(out)?;
    Ok(())
}

pub(crate) fn csv<W: Write>(out: &mut W, table: &VendorTable) -> Result<(), AppError> {
    let mut writer = ::csv::Writer::from_writer(out);
    let render_err = |err: ::csv::Error| AppError::Render(Box::new(err));

    writer
        .write_record(table.header.iter().map(|cell| cell.label))
        .map_err(render_err)?;
    for row in &table.rows {
        writer
            .write_record(row.cells.iter().map(|cell| cell.display()))
            .map_err(render_err)?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn filter_options<W: Write>(out: &mut W, options: &FilterOptions) -> Result<(), AppError> {
    writeln!(out, "Available filters")?;
    for dimension in FilterDimension::ordered() {
        writeln!(
            out,
            "- {} ({}): {}",
            dimension.label(),
            dimension.key(),
            options.options(dimension).join(", ")
        )?;
    }
    Ok(())
}

fn header<W: Write>(out: &mut W, header: &PageHeader) -> Result<(), AppError> {
    writeln!(
        out,
        "{} | {} vendors | {} active filters | refreshed {}",
        header.title,
        header.vendor_count,
        header.active_filters,
        header.refreshed_on.format("%Y-%m-%d")
    )?;
    if let Some(name) = &header.pinned_vendor {
        writeln!(out, "Showing {name} (pinned)")?;
    }
    Ok(())
}

fn gauge<W: Write>(out: &mut W, gauge: &Gauge) -> Result<(), AppError> {
    let level = gauge.level.map(|level| level.label()).unwrap_or("-");
    writeln!(out, "  {}: {}/{} ({level})", gauge.title, gauge.value, gauge.max)?;
    Ok(())
}

fn cards<W: Write>(out: &mut W, title: &str, cards: &[StatCard]) -> Result<(), AppError> {
    writeln!(out, "{title}")?;
    for card in cards {
        writeln!(out, "  {}: {}", card.title, card.value)?;
    }
    Ok(())
}

pub(crate) fn page<W: Write>(out: &mut W, view: &PageView) -> Result<(), AppError> {
    header(out, view.header())?;
    match view {
        PageView::PreAwardOverview(page) => {
            writeln!(out, "Scores")?;
            for item in &page.gauges {
                gauge(out, item)?;
            }
            cards(out, "Screening & responsiveness", &page.cards)?;
            writeln!(out, "{}", page.revenue_title)?;
            for point in &page.revenue {
                writeln!(
                    out,
                    "  {}: {} M€ | dependance {}%",
                    point.year, point.revenue, point.dependance
                )?;
            }
            writeln!(out, "{} (K units)", page.capacity_title)?;
            for bar in &page.capacity {
                writeln!(
                    out,
                    "  {}: production {:.1} | open {:.1}",
                    bar.name, bar.production, bar.open_capacity
                )?;
            }
        }
        PageView::PreAwardPerformance(page) => cards(out, "Performance", &page.cards)?,
        PageView::PostAward(page) => {
            cards(out, "Contracts & quality", &page.cards)?;
            gauge(out, &page.avenant)?;
            writeln!(out, "Discipline scores")?;
            for bar in &page.disciplines {
                writeln!(out, "  {}: {} ({})", bar.discipline, bar.score, bar.level.label())?;
            }
        }
        PageView::Material(page) => {
            gauge(out, &page.otif)?;
            cards(out, "Delivery & quality", &page.cards)?;
            writeln!(out, "  Status: {}", page.delivery_status.label())?;
            writeln!(out, "{}", page.deliveries_title)?;
            for bar in &page.deliveries {
                writeln!(out, "  {}: planned {} | actual {}", bar.name, bar.planned, bar.actual)?;
            }
            writeln!(out, "Conformity")?;
            for share in &page.conformity {
                writeln!(out, "  {}: {} ({}%)", share.name, share.value, share.percent)?;
            }
            cards(out, "OSD", &page.osd)?;
        }
    }
    Ok(())
}

fn indicator(direction: Option<SortDirection>) -> &'static str {
    match direction {
        Some(SortDirection::Ascending) => " ↑",
        Some(SortDirection::Descending) => " ↓",
        None => "",
    }
}

pub(crate) fn table<W: Write>(out: &mut W, table: &VendorTable) -> Result<(), AppError> {
    let labels: Vec<String> = table
        .header
        .iter()
        .map(|cell| format!("{}{}", cell.label, indicator(cell.sort)))
        .collect();
    let rows: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(|cell| cell.display()).collect())
        .collect();

    let mut widths: Vec<usize> = labels.iter().map(|label| label.chars().count()).collect();
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ")
    };

    writeln!(out, "  {}", line(&labels).trim_end())?;
    for (row, cells) in table.rows.iter().zip(&rows) {
        let marker = if row.pinned { "*" } else { " " };
        writeln!(out, "{marker} {}", line(cells).trim_end())?;
    }
    if table.rows.is_empty() {
        writeln!(out, "  (no vendors match the current filters)")?;
    }
    Ok(())
}
