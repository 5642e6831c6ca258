//! Terminal progress bars for the load stage.

use std::collections::HashMap;
use std::io::{self, IsTerminal};

use fh_ingest::{LoadProgress, NoProgress};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

const TEMPLATE: &str = "  {prefix:<20} {bar:40.cyan/blue} {pos}/{len} rows [{elapsed_precise}]";

/// One bar per table, advanced per batch.
pub struct LoadBars {
    multi: MultiProgress,
    style: ProgressStyle,
    bars: HashMap<String, ProgressBar>,
}

impl LoadBars {
    fn new() -> Self {
        let style = ProgressStyle::with_template(TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        Self {
            multi: MultiProgress::new(),
            style,
            bars: HashMap::new(),
        }
    }
}

impl LoadProgress for LoadBars {
    fn on_table_start(&mut self, table: &str, rows: usize) {
        let bar = self.multi.add(ProgressBar::new(rows as u64));
        bar.set_style(self.style.clone());
        bar.set_prefix(table.to_string());
        self.bars.insert(table.to_string(), bar);
    }

    fn on_batch(&mut self, table: &str, rows: usize) {
        if let Some(bar) = self.bars.get(table) {
            bar.inc(rows as u64);
        }
    }

    fn on_table_done(&mut self, table: &str, rows: usize) {
        if let Some(bar) = self.bars.get(table) {
            bar.set_length(rows as u64);
            bar.set_position(rows as u64);
            bar.finish();
        }
    }
}

/// Bars when stderr is a terminal, nothing otherwise.
pub fn load_progress() -> Box<dyn LoadProgress> {
    if io::stderr().is_terminal() {
        Box::new(LoadBars::new())
    } else {
        Box::new(NoProgress)
    }
}
