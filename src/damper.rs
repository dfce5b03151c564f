//! Exponential smoothing over a fixed set of named scalar values.
//!
//! A [`Damper`] keeps three parallel maps (`current`, `target`, `delta`)
//! over the key set given at construction. Each [`update`](Damper::update)
//! closes a fixed fraction of the remaining distance to target; once every
//! key is within `epsilon` the step snaps exactly onto the target.
//!
//! The step is not frame-rate compensated. Callers drive it once per
//! rendered frame.
//!
//! A `None` value means "no baseline yet" and is kept distinct from zero:
//! a key whose current value is `None` jumps straight to its target on the
//! next update (there is nothing to animate from), and a key whose target
//! is `None` is carried through as `None`.

use rustc_hash::FxHashMap;

/// Key → nullable scalar map used for damper snapshots.
pub type DamperValues = FxHashMap<String, Option<f32>>;

/// Default distance below which a value counts as having reached target.
pub const DEFAULT_EPSILON: f32 = 0.001;

/// Stateful exponential smoother over named values.
///
/// Preconditions (not checked): `damping_factor` in `(0, 1]`, `epsilon`
/// positive.
#[derive(Debug, Clone)]
pub struct Damper {
    current: DamperValues,
    target: DamperValues,
    delta: DamperValues,
    damping_factor: f32,
    epsilon: f32,
    reached: bool,
}

impl Damper {
    /// Create a damper whose current and target values both start at
    /// `values`. The key set is fixed from here on.
    pub fn new<K: Into<String>>(
        values: impl IntoIterator<Item = (K, Option<f32>)>,
        damping_factor: f32,
    ) -> Self {
        let current: DamperValues =
            values.into_iter().map(|(k, v)| (k.into(), v)).collect();
        let delta = current.keys().map(|k| (k.clone(), Some(0.0))).collect();
        Self {
            target: current.clone(),
            current,
            delta,
            damping_factor,
            epsilon: DEFAULT_EPSILON,
            reached: true,
        }
    }

    /// Override the "reached" threshold.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Merge `values` into the target map. Keys outside the construction
    /// key set are ignored.
    pub fn set_target<K: AsRef<str>>(
        &mut self,
        values: impl IntoIterator<Item = (K, Option<f32>)>,
    ) {
        for (key, value) in values {
            match self.target.get_mut(key.as_ref()) {
                Some(slot) => {
                    *slot = value;
                    self.reached = false;
                }
                None => log::trace!("damper: ignoring unknown key {}", key.as_ref()),
            }
        }
    }

    /// Accumulate `amount` onto the target of `key`.
    ///
    /// Returns `false` (and changes nothing) when the key is unknown or its
    /// target has no baseline yet.
    pub fn add_to_target(&mut self, key: &str, amount: f32) -> bool {
        match self.target.get_mut(key) {
            Some(Some(value)) => {
                *value += amount;
                self.reached = false;
                true
            }
            _ => false,
        }
    }

    /// Advance every value one step toward its target.
    pub fn update(&mut self) {
        let all_within = self.current.iter().all(|(key, current)| {
            match (*current, self.target.get(key).copied().flatten()) {
                (Some(c), Some(t)) => (t - c).abs() < self.epsilon,
                _ => true,
            }
        });

        for (key, current) in &mut self.current {
            let target = self.target.get(key).copied().flatten();
            let step = match (*current, target) {
                (Some(c), Some(t)) if all_within => {
                    *current = Some(t);
                    Some(t - c)
                }
                (Some(c), Some(t)) => {
                    let step = self.damping_factor * (t - c);
                    *current = Some(c + step);
                    Some(step)
                }
                (None, Some(t)) => {
                    *current = Some(t);
                    None
                }
                (_, None) => {
                    *current = None;
                    None
                }
            };
            if let Some(slot) = self.delta.get_mut(key) {
                *slot = step;
            }
        }

        self.reached = all_within;
    }

    /// Hard-set every key's current and target to `value` without
    /// animating, zero the deltas and mark the target reached.
    pub fn reset_all(&mut self, value: Option<f32>) {
        for (key, current) in &mut self.current {
            *current = value;
            if let Some(target) = self.target.get_mut(key) {
                *target = value;
            }
            if let Some(delta) = self.delta.get_mut(key) {
                *delta = Some(0.0);
            }
        }
        self.reached = true;
    }

    /// Hard-set the listed keys' current and target values without
    /// animating. Every delta is zeroed and the target is marked reached.
    pub fn reset_data<K: AsRef<str>>(
        &mut self,
        values: impl IntoIterator<Item = (K, Option<f32>)>,
    ) {
        for (key, value) in values {
            if let Some(current) = self.current.get_mut(key.as_ref()) {
                *current = value;
            }
            if let Some(target) = self.target.get_mut(key.as_ref()) {
                *target = value;
            }
        }
        for delta in self.delta.values_mut() {
            *delta = Some(0.0);
        }
        self.reached = true;
    }

    /// Copy of the current values.
    #[must_use]
    pub fn current_values(&self) -> DamperValues {
        self.current.clone()
    }

    /// Copy of the deltas applied by the last update.
    #[must_use]
    pub fn delta_values(&self) -> DamperValues {
        self.delta.clone()
    }

    /// Copy of the target values.
    #[must_use]
    pub fn target_values(&self) -> DamperValues {
        self.target.clone()
    }

    /// Current value of a single key (`None` if unknown or unbaselined).
    #[must_use]
    pub fn current(&self, key: &str) -> Option<f32> {
        self.current.get(key).copied().flatten()
    }

    /// Delta of a single key from the last update.
    #[must_use]
    pub fn delta(&self, key: &str) -> Option<f32> {
        self.delta.get(key).copied().flatten()
    }

    /// Target of a single key.
    #[must_use]
    pub fn target(&self, key: &str) -> Option<f32> {
        self.target.get(key).copied().flatten()
    }

    /// Whether the last update found every key within epsilon.
    #[must_use]
    pub fn reached_target(&self) -> bool {
        self.reached
    }

    /// Per-step fraction of the remaining distance closed.
    #[must_use]
    pub fn damping_factor(&self) -> f32 {
        self.damping_factor
    }

    /// Change the damping factor for subsequent updates.
    pub fn set_damping_factor(&mut self, damping_factor: f32) {
        self.damping_factor = damping_factor;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy(factor: f32) -> Damper {
        Damper::new([("x", Some(0.0)), ("y", Some(0.0))], factor)
    }

    #[test]
    fn converges_monotonically_then_snaps() {
        let mut damper = xy(0.5);
        damper.set_target([("x", Some(10.0))]);
        assert!(!damper.reached_target());

        let mut last = 0.0;
        let mut steps = 0;
        while !damper.reached_target() {
            damper.update();
            let x = damper.current("x").unwrap_or_default();
            assert!(x >= last && x <= 10.0);
            last = x;
            steps += 1;
            assert!(steps < 40, "did not converge");
        }
        // 10 * 0.5^k < 0.001 first holds at k = 14, snap happens on step 15
        assert_eq!(steps, 15);
        assert_eq!(damper.current("x"), Some(10.0));
        assert_eq!(damper.current("y"), Some(0.0));
    }

    #[test]
    fn snap_reports_the_remaining_distance_as_delta() {
        let mut damper = xy(0.5);
        damper.set_target([("x", Some(0.0005))]);
        damper.update();
        assert!(damper.reached_target());
        assert_eq!(damper.current("x"), Some(0.0005));
        assert_eq!(damper.delta("x"), Some(0.0005));
    }

    #[test]
    fn factor_one_snaps_in_a_single_step() {
        let mut damper = xy(1.0);
        damper.set_target([("y", Some(-4.0))]);
        damper.update();
        assert_eq!(damper.current("y"), Some(-4.0));
        assert_eq!(damper.delta("y"), Some(-4.0));
        assert!(!damper.reached_target());
        damper.update();
        assert!(damper.reached_target());
    }

    #[test]
    fn add_to_target_accumulates() {
        let mut damper = xy(0.5);
        assert!(damper.add_to_target("x", 2.0));
        assert!(damper.add_to_target("x", 3.0));
        assert_eq!(damper.target("x"), Some(5.0));
        assert!(!damper.add_to_target("z", 1.0));
    }

    #[test]
    fn add_to_target_refuses_null_baseline() {
        let mut damper = Damper::new([("x", None::<f32>)], 0.5);
        assert!(!damper.add_to_target("x", 1.0));
        assert_eq!(damper.target("x"), None);
    }

    #[test]
    fn null_current_jumps_to_first_target() {
        let mut damper = Damper::new([("x", None), ("y", None)], 0.5);
        damper.set_target([("x", Some(0.3)), ("y", Some(-0.2))]);
        damper.update();
        assert_eq!(damper.current("x"), Some(0.3));
        assert_eq!(damper.delta("x"), None);
        damper.set_target([("x", Some(0.5))]);
        damper.update();
        assert!((damper.current("x").unwrap_or_default() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn reset_all_rebaselines_without_animating() {
        let mut damper = xy(0.5);
        damper.set_target([("x", Some(8.0))]);
        damper.update();
        damper.reset_all(None);
        assert!(damper.reached_target());
        assert_eq!(damper.current("x"), None);
        assert_eq!(damper.target("x"), None);
        assert_eq!(damper.delta("x"), Some(0.0));
    }

    #[test]
    fn reset_data_sets_listed_keys() {
        let mut damper = xy(0.5);
        damper.set_target([("x", Some(8.0))]);
        damper.reset_data([("x", Some(1.0))]);
        assert!(damper.reached_target());
        assert_eq!(damper.current("x"), Some(1.0));
        assert_eq!(damper.target("x"), Some(1.0));
    }

    #[test]
    fn snapshots_are_copies() {
        let mut damper = xy(0.5);
        let mut snapshot = damper.current_values();
        let _ = snapshot.insert("x".into(), Some(99.0));
        damper.update();
        assert_eq!(damper.current("x"), Some(0.0));
        assert_eq!(damper.current_values().len(), 2);
        assert_eq!(damper.delta_values().len(), 2);
    }

    #[test]
    fn unknown_keys_do_not_grow_the_key_set() {
        let mut damper = xy(0.5);
        damper.set_target([("z", Some(1.0))]);
        assert_eq!(damper.target_values().len(), 2);
    }
}
