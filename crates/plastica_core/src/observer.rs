use crate::population::{Population, TrajectoryRow};

/// Receives per-generation output from [`Population::evolve`].
///
/// Called single-threaded, after each development barrier.
pub trait EvolutionObserver {
    /// A developed generation. Only called in test mode.
    fn on_generation(&mut self, epoch: usize, population: &Population) -> anyhow::Result<()>;

    fn on_trajectory(&mut self, row: &TrajectoryRow) -> anyhow::Result<()>;
}

/// Collects trajectory rows in memory and ignores generations.
impl EvolutionObserver for Vec<TrajectoryRow> {
    fn on_generation(&mut self, _epoch: usize, _population: &Population) -> anyhow::Result<()> {
        Ok(())
    }

    fn on_trajectory(&mut self, row: &TrajectoryRow) -> anyhow::Result<()> {
        self.push(row.clone());
        Ok(())
    }
}
