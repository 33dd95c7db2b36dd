//! Per-epoch metrics CSV for offline analysis.

use std::fs::File;
use std::io::Write;
use std::path::Path;

pub struct MetricsCsv {
    file: File,
}

impl MetricsCsv {
    pub fn new(path: &Path) -> std::io::Result<Self> {
        let mut file = File::create(path)?;
        writeln!(file, "epoch,phase,loss,auc,lr,secs")?;
        Ok(Self { file })
    }

    pub fn record(&mut self, epoch: usize, phase: &str, loss: f64, auc: f64, lr: f64, secs: f64) {
        let _ = writeln!(
            self.file,
            "{},{},{:.6},{:.6},{:.2e},{:.1}",
            epoch, phase, loss, auc, lr, secs
        );
        let _ = self.file.flush();
    }
}
