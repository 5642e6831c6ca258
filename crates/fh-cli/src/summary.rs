use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use fh_cli::pipeline::PipelineOutcome;
use fh_output::{DashboardKpis, ExportArtifact};
use fh_transform::AgeBucketing;

pub fn print_run_summary(outcome: &PipelineOutcome) {
    println!("Source: {}", outcome.source);
    match outcome.seed {
        Some(seed) => println!("Seed: {seed}"),
        None => println!("Seed: random"),
    }

    let mut stages = Table::new();
    stages.set_header(vec![
        header_cell("Stage"),
        header_cell("Tables"),
        header_cell("Records"),
        header_cell("Time (ms)"),
    ]);
    apply_summary_table_style(&mut stages);
    for column in 1..4 {
        align_column(&mut stages, column, CellAlignment::Right);
    }
    for stage in &outcome.stages {
        stages.add_row(vec![
            Cell::new(stage.stage)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(stage.tables),
            Cell::new(stage.records),
            dim_cell(stage.duration_ms),
        ]);
    }
    println!("{stages}");

    let mut tables = Table::new();
    tables.set_header(vec![
        header_cell("Table"),
        header_cell("Loaded"),
        header_cell("Blanks"),
        header_cell("Duplicates"),
    ]);
    apply_summary_table_style(&mut tables);
    for column in 1..4 {
        align_column(&mut tables, column, CellAlignment::Right);
    }
    for table in outcome.loaded.iter() {
        let stats = outcome.clean.tables.get(&table.name).copied().unwrap_or_default();
        tables.add_row(vec![
            Cell::new(&table.name),
            Cell::new(table.record_count()),
            count_cell(stats.blanks_replaced, Color::Yellow),
            count_cell(stats.duplicates_removed, Color::Yellow),
        ]);
    }
    println!("{tables}");

    let transform = &outcome.transform;
    match &transform.age_bucketing {
        AgeBucketing::Applied {
            bucketed,
            out_of_range,
        } => println!("Age groups: {bucketed} bucketed, {out_of_range} out of range"),
        AgeBucketing::Skipped { reason } => println!("Age groups: skipped ({reason})"),
    }
    println!(
        "Simulation: {} bookings, {} zeroed at capacity, {} passengers",
        transform.simulated_bookings, transform.zeroed_bookings, transform.total_passengers
    );
}

pub fn print_kpis(kpis: &DashboardKpis) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("KPI"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let growth = kpis
        .growth_pct
        .map_or_else(|| "-".to_string(), |pct| format!("{pct:+.1}%"));
    let month = kpis
        .current_month
        .map_or_else(|| "-".to_string(), |m| format!("{}-{:02}", m.year, m.month));
    table.add_row(vec![Cell::new("Total travelers"), Cell::new(kpis.total_travelers)]);
    table.add_row(vec![Cell::new("Total flights"), Cell::new(kpis.total_flights)]);
    table.add_row(vec![
        Cell::new("Preferred destination"),
        Cell::new(kpis.preferred_destination.as_deref().unwrap_or("-")),
    ]);
    table.add_row(vec![Cell::new("Current month"), Cell::new(month)]);
    table.add_row(vec![
        Cell::new("Bookings this month"),
        Cell::new(kpis.current_month_bookings),
    ]);
    table.add_row(vec![
        Cell::new("Bookings last month"),
        Cell::new(kpis.previous_month_bookings),
    ]);
    table.add_row(vec![Cell::new("Growth"), Cell::new(growth)]);
    println!("{table}");
}

pub fn print_tables(rows: &[(String, usize)]) {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Table"), header_cell("Rows")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (name, count) in rows {
        table.add_row(vec![Cell::new(name), Cell::new(count)]);
    }
    println!("{table}");
}

pub fn print_export(artifact: &ExportArtifact) {
    println!(
        "Exported {} bytes ({}) to {}",
        artifact.bytes.len(),
        artifact.mime,
        artifact.path.display()
    );
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
