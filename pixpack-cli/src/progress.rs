//! Terminal progress bar fed by the core's progress notifications

use indicatif::{ProgressBar, ProgressStyle};
use pixpack_core::ProgressObserver;
use std::path::Path;

const BYTES_TEMPLATE: &str = "{spinner} [{bar:40}] {bytes}/{total_bytes} {wide_msg}";
const ITEMS_TEMPLATE: &str = "{spinner} [{bar:40}] {pos}/{len} {wide_msg}";

/// [`ProgressObserver`] drawing an `indicatif` bar on stderr
pub struct BarProgress {
    pb: ProgressBar,
}

impl BarProgress {
    /// Bar measured in bytes, for encoding
    pub fn bytes() -> Self {
        Self::with_template(BYTES_TEMPLATE)
    }

    /// Bar measured in images, for decoding
    pub fn images() -> Self {
        Self::with_template(ITEMS_TEMPLATE)
    }

    fn with_template(template: &str) -> Self {
        let style = ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        let pb = ProgressBar::new(0);
        pb.set_style(style);
        Self { pb }
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}

impl ProgressObserver for BarProgress {
    fn on_record(&mut self, name: &str, bytes_done: u64, bytes_total: u64) {
        self.pb.set_length(bytes_total);
        self.pb.set_position(bytes_done);
        self.pb.set_message(name.to_string());
    }

    fn on_image(&mut self, path: &Path, index: usize, total: usize) {
        self.pb.set_length(total as u64);
        self.pb.set_position(index as u64);
        self.pb.set_message(path.display().to_string());
    }
}
