use crate::config::AlphaSchedule;

/// Cooling schedule of a layout run.
///
/// `alpha` scales every force. It decays geometrically after each tick and
/// snaps to zero once it falls under the schedule minimum, which ends the run.
#[derive(Clone, Debug)]
pub struct Simulation {
    schedule: AlphaSchedule,
    alpha: f32,
    generation: u64,
    ticks: usize,
}

impl Simulation {
    pub fn new(schedule: AlphaSchedule) -> Self {
        Self {
            schedule,
            alpha: schedule.start,
            generation: 0,
            ticks: 0,
        }
    }

    /// Starts a new run from full heat. Any previous run is abandoned.
    pub fn restart(&mut self) {
        self.alpha = self.schedule.start;
        self.generation += 1;
        self.ticks = 0;
    }

    /// Alpha to use for the tick about to run, or `None` once settled.
    pub fn current(&self) -> Option<f32> {
        self.is_running().then_some(self.alpha)
    }

    /// Cools after a tick; returns whether the run is still going.
    pub fn advance(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }

        self.ticks += 1;
        self.alpha *= self.schedule.decay;
        if self.alpha < self.schedule.min {
            self.alpha = 0.0;
            tracing::debug!(
                generation = self.generation,
                ticks = self.ticks,
                "layout settled"
            );
            return false;
        }
        true
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_running(&self) -> bool {
        self.alpha > 0.0
    }

    /// Bumped on every restart.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ticks taken since the last restart.
    pub fn ticks(&self) -> usize {
        self.ticks
    }
}
