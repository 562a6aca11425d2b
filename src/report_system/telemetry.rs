use crate::entry_system::entry::{EntryOutcome, EntryState};

/// Altitude band with the highest energy deposition rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakDeposition {
    pub altitude_km: f64,
    pub time_s: f64,
    pub megatons_per_km: f64,
}

/// Playback recorder for an entry sequence. Fed one state at a time, so it
/// works the same on the lazy sequence as on a collected trajectory.
pub struct EntryTelemetry {
    pub log: Vec<String>,
    max_velocity: f64,
    min_mass_fraction: f64,
    total_deposited: f64,
    peak_deposition: Option<PeakDeposition>,
    previous: Option<EntryState>,
    outcome_time: Option<(EntryOutcome, f64)>,
}

impl Default for EntryTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntryTelemetry {
    pub fn new() -> Self {
        EntryTelemetry {
            log: Vec::new(),
            max_velocity: 0.0,
            min_mass_fraction: 1.0,
            total_deposited: 0.0,
            peak_deposition: None,
            previous: None,
            outcome_time: None,
        }
    }

    pub fn format_time(elapsed_time: f64) -> String {
        if elapsed_time >= 60.0 {
            let minutes = (elapsed_time / 60.0).floor();
            let seconds = elapsed_time % 60.0;
            format!("{:.0}m {:.2}s", minutes, seconds)
        } else {
            format!("{:.2}s", elapsed_time)
        }
    }

    pub fn format_altitude(altitude_km: f64) -> String {
        if altitude_km >= 1.0 {
            format!("{:.2} km", altitude_km)
        } else {
            format!("{:.0} m", altitude_km * 1000.0)
        }
    }

    /// Records one state and returns its formatted log line.
    pub fn collect_data(&mut self, state: &EntryState) -> &str {
        if state.velocity_km_s > self.max_velocity {
            self.max_velocity = state.velocity_km_s;
        }
        if state.mass_fraction_remaining < self.min_mass_fraction {
            self.min_mass_fraction = state.mass_fraction_remaining;
        }
        self.total_deposited = state.energy_deposited_megatons;

        if let Some(previous) = &self.previous {
            let descent = previous.altitude_km - state.altitude_km;
            let deposited = state.energy_deposited_megatons - previous.energy_deposited_megatons;
            if descent > 0.0 {
                let rate = deposited / descent;
                let is_peak = self
                    .peak_deposition
                    .map_or(true, |peak| rate > peak.megatons_per_km);
                if is_peak {
                    self.peak_deposition = Some(PeakDeposition {
                        altitude_km: state.altitude_km,
                        time_s: state.time_s,
                        megatons_per_km: rate,
                    });
                }
            }
        }
        self.previous = Some(*state);

        self.log.push(format!(
            "T+{} | altitude {} | velocity {:.2} km/s | mass {:.1}% | deposited {:.4} Mt",
            Self::format_time(state.time_s),
            Self::format_altitude(state.altitude_km),
            state.velocity_km_s,
            state.mass_fraction_remaining * 100.0,
            state.energy_deposited_megatons
        ));
        self.log.last().map_or("", String::as_str)
    }

    /// Marks the end of the sequence with the terminal event.
    pub fn record_outcome(&mut self, outcome: EntryOutcome) {
        let time = self.previous.map_or(0.0, |state| state.time_s);
        self.outcome_time = Some((outcome, time));
    }

    pub fn max_velocity(&self) -> f64 {
        self.max_velocity
    }

    pub fn min_mass_fraction(&self) -> f64 {
        self.min_mass_fraction
    }

    pub fn total_deposited(&self) -> f64 {
        self.total_deposited
    }

    pub fn peak_deposition(&self) -> Option<PeakDeposition> {
        self.peak_deposition
    }

    pub fn outcome_time(&self) -> Option<(EntryOutcome, f64)> {
        self.outcome_time
    }

    pub fn summary(&self) -> Vec<String> {
        let mut lines = vec![
            format!("Max Velocity: {:.2} km/s", self.max_velocity),
            format!("Min Mass Remaining: {:.1}%", self.min_mass_fraction * 100.0),
            format!("Energy Deposited: {:.4} Mt", self.total_deposited),
        ];
        if let Some(peak) = &self.peak_deposition {
            lines.push(format!(
                "Peak Deposition: {:.4} Mt/km at {} (T+{})",
                peak.megatons_per_km,
                Self::format_altitude(peak.altitude_km),
                Self::format_time(peak.time_s)
            ));
        }
        match self.outcome_time {
            Some((EntryOutcome::GroundImpact, time)) => {
                lines.push(format!("Ground impact at T+{}", Self::format_time(time)))
            }
            Some((EntryOutcome::Airburst, time)) => {
                lines.push(format!("Airburst at T+{}", Self::format_time(time)))
            }
            None => lines.push("Entry did not terminate".to_string()),
        }
        lines
    }
}
