//! Volumetric energy scatter adapter.
//!
//! Validates the raw grid, then renders it as a sparse 3D scatter of the
//! samples above the epsilon cutoff. The color scale runs from ten times
//! the grid minimum (energies are negative in the interesting region) up
//! to a fixed ceiling so wildly clipped repulsive samples do not wash
//! out the ramp. When the grid resolution changes the host must dispose
//! and reinit its chart; `reinit` flags that, and
//! [`REINIT_RESIZE_DELAYS_MS`](super::REINIT_RESIZE_DELAYS_MS) gives
//! the follow-up resize burst
//! ([`UPDATE_RESIZE_DELAYS_MS`](super::UPDATE_RESIZE_DELAYS_MS) after a
//! plain restyle).

use crate::error::SpbError;
use crate::grid::EnergyGrid;
use crate::options::ChartOptions;
use crate::state::DemoState;

/// Chart data for one scatter render.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSpec {
    /// Whether the host must dispose and reinit the chart first.
    pub reinit: bool,
    /// Samples per grid axis.
    pub grid_dim: usize,
    /// `[x, y, z, value]` rows, grid indices as coordinates.
    pub points: Vec<[f64; 4]>,
    /// Lower bound of the color scale.
    pub visual_min: f64,
    /// Upper bound of the color scale.
    pub visual_max: f64,
    /// Smallest and largest rendered point size.
    pub symbol_size: [f64; 2],
    /// Opacity range mapped across the color scale.
    pub color_alpha: [f64; 2],
    /// Color ramp stops, cold to hot.
    pub color_ramp: Vec<String>,
}

/// Tracks the last-rendered grid resolution across updates.
#[derive(Debug)]
pub struct EnergyScatter {
    options: ChartOptions,
    last_dim: Option<usize>,
}

impl EnergyScatter {
    /// Create the adapter with the given chart constants.
    #[must_use]
    pub fn new(options: ChartOptions) -> Self {
        Self {
            options,
            last_dim: None,
        }
    }

    /// Build the scatter spec for the current state. Returns `Ok(None)`
    /// when the structure carries no energy grid (the host hides the
    /// surface).
    ///
    /// # Errors
    ///
    /// Returns [`SpbError::MalformedGrid`] when the attached grid is
    /// ragged, non-cubic, or carries malformed samples.
    pub fn update(
        &mut self,
        state: &DemoState,
    ) -> Result<Option<ScatterSpec>, SpbError> {
        let Some(raw) = state.energy.as_ref() else {
            self.last_dim = None;
            return Ok(None);
        };

        let grid = EnergyGrid::validate(raw.clone())?;
        let reinit = self.last_dim != Some(grid.dim());
        self.last_dim = Some(grid.dim());

        let cloud = grid.point_cloud(self.options.energy_epsilon);
        log::debug!(
            "energy scatter: {} of {} samples above cutoff",
            cloud.points.len(),
            grid.dim().pow(3)
        );

        Ok(Some(ScatterSpec {
            reinit,
            grid_dim: grid.dim(),
            points: cloud.points,
            visual_min: cloud.min * 10.0,
            visual_max: self.options.visual_max,
            symbol_size: self.options.symbol_size,
            color_alpha: self.options.color_alpha,
            color_ramp: self.options.color_ramp.clone(),
        }))
    }

    /// Forget the rendered grid (host disposed its chart).
    pub fn reset(&mut self) {
        self.last_dim = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{EnergyCell, RawEnergyGrid};

    fn cube(dim: usize, value: f64) -> RawEnergyGrid {
        vec![vec![vec![EnergyCell::Scalar(value); dim]; dim]; dim]
    }

    fn state_with_grid(raw: RawEnergyGrid) -> DemoState {
        DemoState {
            energy: Some(raw),
            ..DemoState::default()
        }
    }

    #[test]
    fn hidden_without_an_energy_grid() {
        let mut scatter = EnergyScatter::new(ChartOptions::default());
        let result = scatter.update(&DemoState::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn first_render_requires_reinit() {
        let mut scatter = EnergyScatter::new(ChartOptions::default());
        let mut raw = cube(2, 0.0);
        raw[0][0][0] = EnergyCell::Scalar(-40.0);
        let state = state_with_grid(raw);

        let spec = scatter.update(&state).unwrap().unwrap();
        assert!(spec.reinit);
        assert_eq!(spec.grid_dim, 2);
        // Only the one sample above the cutoff is plotted.
        assert_eq!(spec.points, vec![[0.0, 0.0, 0.0, -40.0]]);
        assert_eq!(spec.visual_min, -400.0);
        assert_eq!(spec.visual_max, 1_000_000.0);
        assert_eq!(spec.color_ramp.len(), 11);

        // Same resolution again: restyle without a dispose cycle.
        let spec = scatter.update(&state).unwrap().unwrap();
        assert!(!spec.reinit);
    }

    #[test]
    fn resolution_change_forces_a_dispose_cycle() {
        let mut scatter = EnergyScatter::new(ChartOptions::default());
        let _ = scatter.update(&state_with_grid(cube(2, 1.0))).unwrap();

        let spec = scatter
            .update(&state_with_grid(cube(3, 1.0)))
            .unwrap()
            .unwrap();
        assert!(spec.reinit);
        assert_eq!(spec.grid_dim, 3);
    }

    #[test]
    fn losing_the_grid_resets_tracking() {
        let mut scatter = EnergyScatter::new(ChartOptions::default());
        let state = state_with_grid(cube(2, 1.0));
        let _ = scatter.update(&state).unwrap();

        assert!(scatter.update(&DemoState::default()).unwrap().is_none());
        // Grid comes back at the same resolution: still a fresh chart.
        let spec = scatter.update(&state).unwrap().unwrap();
        assert!(spec.reinit);
    }

    #[test]
    fn malformed_grid_is_rejected() {
        let mut scatter = EnergyScatter::new(ChartOptions::default());
        let raw: RawEnergyGrid =
            vec![vec![vec![EnergyCell::Scalar(0.0); 4]; 3]; 2];
        let result = scatter.update(&state_with_grid(raw));
        assert!(matches!(result, Err(SpbError::MalformedGrid(_))));
    }
}
