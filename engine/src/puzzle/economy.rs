use super::settings::EconomySettings;
use super::types::ActionOffer;

/// Settled grid figures the economy decides from.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridReading {
    pub row_count: usize,
    pub active_count: usize,
    pub grid_value: f64,
}

impl GridReading {
    fn density(&self) -> f64 {
        if self.row_count == 0 {
            return 0.0;
        }
        self.active_count as f64 / self.row_count as f64
    }
}

/// Build and scramble bookkeeping for the current cycle. A cycle starts at
/// generate or scramble and runs through any number of matches and builds.
#[derive(Clone, Debug)]
pub struct Economy {
    settings: EconomySettings,
    build_count: u32,
    consecutive_builds: u32,
    last_was_build: bool,
    baseline_grid_value: Option<f64>,
    enable_build: bool,
    enable_scramble: bool,
}

impl Economy {
    pub fn new(settings: EconomySettings) -> Self {
        Self {
            settings,
            build_count: 0,
            consecutive_builds: 0,
            last_was_build: false,
            baseline_grid_value: None,
            enable_build: false,
            enable_scramble: false,
        }
    }

    pub fn build_count(&self) -> u32 {
        self.build_count
    }

    /// Builds made back to back after the first one of a run.
    pub fn consecutive_builds(&self) -> u32 {
        self.consecutive_builds
    }

    pub fn baseline_grid_value(&self) -> Option<f64> {
        self.baseline_grid_value
    }

    pub fn build_enabled(&self) -> bool {
        self.enable_build
    }

    pub fn scramble_enabled(&self) -> bool {
        self.enable_scramble
    }

    pub fn offer(&self, grid_value: f64) -> ActionOffer {
        match (self.enable_build, self.enable_scramble) {
            (_, true) => ActionOffer::ScrambleOffered,
            (true, false) => ActionOffer::BuildOffered,
            (false, false) if grid_value > 0.0 => ActionOffer::NoAction,
            (false, false) => ActionOffer::BothDisabled,
        }
    }

    pub fn record_build(&mut self) {
        self.build_count += 1;
        if self.last_was_build {
            self.consecutive_builds += 1;
        } else {
            self.consecutive_builds = 0;
        }
        self.last_was_build = true;
    }

    pub fn record_match(&mut self) {
        self.consecutive_builds = 0;
        self.last_was_build = false;
    }

    /// Starts a new cycle anchored on the freshly settled grid value.
    pub fn start_cycle(&mut self, baseline_grid_value: f64) {
        self.build_count = 0;
        self.consecutive_builds = 0;
        self.last_was_build = false;
        self.baseline_grid_value = Some(baseline_grid_value);
    }

    /// Recomputes which recovery actions to offer. Returns true when either
    /// flag changed.
    pub fn recompute(&mut self, reading: GridReading) -> bool {
        let before = (self.enable_build, self.enable_scramble);
        let (build, scramble) = self.decide(reading);
        self.enable_build = build;
        self.enable_scramble = scramble;
        before != (build, scramble)
    }

    fn decide(&self, reading: GridReading) -> (bool, bool) {
        let s = &self.settings;
        if reading.active_count == 0 {
            return (false, false);
        }

        let value = reading.grid_value;
        let baseline = self.baseline_grid_value.unwrap_or(0.0);
        let low = value <= s.build_scramble_threshold * baseline;
        let dried_up = self.baseline_grid_value.is_some() && value <= s.dry_value_threshold * baseline;
        let rows = reading.row_count;
        let above_floor = rows as f64 >= s.scramble_rows as f64 * s.scramble_row_fraction;
        let streak = self.consecutive_builds;

        let mut build = false;
        let mut scramble = false;

        let streak_stalled = (streak == 2 && reading.density() >= s.density_threshold && low)
            || (streak >= 3 && low);
        let unanchored_streak = self.baseline_grid_value.is_none() && streak >= 2;
        if above_floor && (dried_up || unanchored_streak || streak_stalled) {
            scramble = true;
        } else if low {
            if self.build_count >= s.build_count_min && rows >= s.scramble_rows {
                scramble = true;
            } else {
                build = true;
            }
        }

        if low && self.build_count >= s.build_count_max {
            scramble = true;
            build = false;
        }

        if value == 0.0 && rows >= s.scramble_rows {
            scramble = true;
            build = false;
        }

        (build, scramble)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(row_count: usize, active_count: usize, grid_value: f64) -> GridReading {
        GridReading {
            row_count,
            active_count,
            grid_value,
        }
    }

    fn anchored(baseline: f64) -> Economy {
        let mut economy = Economy::new(EconomySettings::default());
        economy.start_cycle(baseline);
        economy
    }

    #[test]
    fn test_healthy_grid_offers_nothing() {
        let mut economy = anchored(20.0);

        economy.recompute(reading(6, 50, 12.0));

        assert!(!economy.build_enabled());
        assert!(!economy.scramble_enabled());
        assert_eq!(economy.offer(12.0), ActionOffer::NoAction);
    }

    #[test]
    fn test_low_small_grid_offers_build() {
        let mut economy = anchored(20.0);

        economy.recompute(reading(4, 8, 2.0));

        assert!(economy.build_enabled());
        assert!(!economy.scramble_enabled());
        assert_eq!(economy.offer(2.0), ActionOffer::BuildOffered);
    }

    #[test]
    fn test_dried_up_tall_grid_offers_scramble() {
        let mut economy = anchored(20.0);

        economy.recompute(reading(9, 40, 0.0));

        assert!(economy.scramble_enabled());
        assert!(!economy.build_enabled());
    }

    #[test]
    fn test_dried_up_short_grid_still_builds() {
        let mut economy = anchored(20.0);

        economy.recompute(reading(5, 30, 0.0));

        assert!(economy.build_enabled());
        assert!(!economy.scramble_enabled());
    }

    #[test]
    fn test_build_min_on_tall_grid_switches_to_scramble() {
        let mut economy = anchored(20.0);
        for _ in 0..6 {
            economy.record_build();
            economy.record_match();
        }

        economy.recompute(reading(20, 150, 3.0));

        assert!(economy.scramble_enabled());
        assert!(!economy.build_enabled());
    }

    #[test]
    fn test_build_max_retires_build() {
        let mut economy = anchored(20.0);
        for _ in 0..12 {
            economy.record_build();
            economy.record_match();
        }

        economy.recompute(reading(3, 10, 3.0));

        assert!(economy.scramble_enabled());
        assert!(!economy.build_enabled());
    }

    #[test]
    fn test_empty_grid_with_many_rows_forces_scramble() {
        let mut economy = anchored(0.0);

        economy.recompute(reading(25, 4, 0.0));

        assert!(economy.scramble_enabled());
        assert!(!economy.build_enabled());
    }

    #[test]
    fn test_cleared_grid_offers_nothing() {
        let mut economy = anchored(20.0);

        economy.recompute(reading(0, 0, 0.0));

        assert_eq!(economy.offer(0.0), ActionOffer::BothDisabled);
    }

    #[test]
    fn test_streak_counts_repeats_only() {
        let mut economy = anchored(20.0);

        economy.record_build();
        assert_eq!(economy.consecutive_builds(), 0);
        economy.record_build();
        economy.record_build();
        assert_eq!(economy.consecutive_builds(), 2);
        economy.record_match();
        economy.record_build();
        assert_eq!(economy.consecutive_builds(), 0);
        assert_eq!(economy.build_count(), 4);
    }

    #[test]
    fn test_unanchored_streak_offers_scramble() {
        let mut economy = Economy::new(EconomySettings::default());
        for _ in 0..3 {
            economy.record_build();
        }

        economy.recompute(reading(10, 30, 5.0));

        assert!(economy.scramble_enabled());
    }

    #[test]
    fn test_stagnant_builds_eventually_offer_scramble() {
        // Value stays low and rows grow with each build: once the streak is
        // long enough scramble must be on the table.
        let mut economy = anchored(20.0);
        let mut rows = 4;
        let mut offered_at = None;

        for build in 1..=12 {
            economy.record_build();
            rows += 3;
            economy.recompute(reading(rows, rows * 5, 2.0));
            if economy.scramble_enabled() {
                offered_at = Some(build);
                break;
            }
            assert!(economy.build_enabled());
        }

        assert!(offered_at.is_some());
    }

    #[test]
    fn test_start_cycle_resets_counters() {
        let mut economy = anchored(20.0);
        economy.record_build();
        economy.record_build();

        economy.start_cycle(15.0);

        assert_eq!(economy.build_count(), 0);
        assert_eq!(economy.consecutive_builds(), 0);
        assert_eq!(economy.baseline_grid_value(), Some(15.0));
    }

    #[test]
    fn test_recompute_reports_changes() {
        let mut economy = anchored(20.0);

        assert!(economy.recompute(reading(4, 8, 2.0)));
        assert!(!economy.recompute(reading(4, 8, 2.0)));
        assert!(economy.recompute(reading(4, 8, 10.0)));
    }
}
