//! Progress display using indicatif

use ccflash_core::Progress;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress reporter using indicatif progress bars
pub(crate) struct IndicatifProgress {
    current_bar: Option<ProgressBar>,
    sectors: usize,
}

impl IndicatifProgress {
    pub(crate) fn new() -> Self {
        Self {
            current_bar: None,
            sectors: 0,
        }
    }

    /// Byte progress bar for reading and writing
    pub(crate) fn create_bar(&mut self, total: u64, phase: &'static str) {
        self.finish_silently();
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template(&format!(
                    "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
                    phase
                ))
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        self.current_bar = Some(pb);
    }

    fn create_spinner(&mut self, message: String) {
        self.finish_silently();
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(message);
        pb.enable_steady_tick(Duration::from_millis(100));
        self.current_bar = Some(pb);
    }

    pub(crate) fn set_position(&self, pos: u64) {
        if let Some(pb) = &self.current_bar {
            pb.set_position(pos);
        }
    }

    pub(crate) fn finish(&mut self, message: &str) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_with_message(message.to_string());
        }
    }

    fn finish_silently(&mut self) {
        if let Some(pb) = self.current_bar.take() {
            pb.finish_and_clear();
        }
    }
}

impl Progress for IndicatifProgress {
    fn erasing(&mut self, sectors: usize) {
        self.sectors = sectors;
        self.create_spinner(format!("Erasing {} sectors...", sectors));
    }

    fn erase_progress(&mut self, sectors_erased: usize) {
        if let Some(pb) = &self.current_bar {
            pb.set_message(format!(
                "Erased {}/{} sectors...",
                sectors_erased, self.sectors
            ));
        }
    }

    fn writing(&mut self, bytes: usize) {
        self.create_bar(bytes as u64, "Writing");
    }

    fn write_progress(&mut self, bytes_written: usize) {
        self.set_position(bytes_written as u64);
    }

    fn complete(&mut self) {
        self.finish("done");
    }
}

impl Drop for IndicatifProgress {
    fn drop(&mut self) {
        // Leave no bar spinning if an operation failed
        self.finish_silently();
    }
}
