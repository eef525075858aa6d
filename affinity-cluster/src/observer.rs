use log::info;

/// Receives the quality of each seed's partition while a search runs.
pub trait SeedObserver {
    /// Called once per seed, after the partition for the 1-based `seed_index` is found.
    fn seed_quality(&mut self, seed_index: usize, quality: f64);
}

impl<F: FnMut(usize, f64)> SeedObserver for F {
    fn seed_quality(&mut self, seed_index: usize, quality: f64) {
        self(seed_index, quality)
    }
}

/// Writes each seed's quality to the log at info level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogObserver;

impl SeedObserver for LogObserver {
    fn seed_quality(&mut self, seed_index: usize, quality: f64) {
        info!("Leiden clustering quality for seed {seed_index}: {quality}");
    }
}
