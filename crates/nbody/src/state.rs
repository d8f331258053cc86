use crate::store::ParticleStore;

/// Clock and particle set of a fixed-step simulation
///
/// `time` is always `timestep * delta_time` rather than a running sum, so a
/// run reaches the same instants regardless of how many steps preceded them.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Current simulation time
    pub time: f64,
    /// Index of the last completed step (0 before the first step)
    pub timestep: u64,
    /// Fixed step size
    pub delta_time: f64,
    /// Time at which the run ends
    pub max_time: f64,
    /// Set once `time >= max_time`; terminal
    pub done: bool,
    /// Particles of the current step
    pub particles: ParticleStore,
}

impl SimulationState {
    /// Creates a state at `t = 0`
    ///
    /// # Examples
    ///
    /// ```
    /// use nbody::state::SimulationState;
    /// use nbody::store::ParticleStore;
    ///
    /// let state = SimulationState::new(0.01, 1.0, ParticleStore::new());
    ///
    /// assert_eq!(state.timestep, 0);
    /// assert_eq!(state.time, 0.0);
    /// assert!(!state.done);
    /// ```
    pub fn new(delta_time: f64, max_time: f64, particles: ParticleStore) -> Self {
        Self {
            time: 0.0,
            timestep: 0,
            delta_time,
            max_time,
            done: false,
            particles,
        }
    }

    /// Moves the clock forward by one step and returns the new timestep
    pub fn advance_clock(&mut self) -> u64 {
        self.timestep += 1;
        self.time = self.timestep as f64 * self.delta_time;
        self.timestep
    }

    /// Whether the clock has reached the end of the run
    pub fn is_finished(&self) -> bool {
        self.time >= self.max_time
    }

    /// Number of steps a complete run takes
    ///
    /// This is the smallest `k` with `k * delta_time >= max_time`, which is
    /// `max_time / delta_time` whenever that ratio is whole.
    pub fn total_steps(&self) -> u64 {
        let mut steps = (self.max_time / self.delta_time).floor() as u64;
        while (steps as f64) * self.delta_time < self.max_time {
            steps += 1;
        }
        steps
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }
}
