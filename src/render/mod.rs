//! Rendering adapters for the four demo surfaces.
//!
//! Adapters do not draw. Each one turns the current [`DemoState`] into a
//! plain-data redraw spec the host feeds to its 3D viewer or chart
//! binding, and tracks just enough of what it last produced to skip
//! redundant geometry reloads. The host decides when to call `update`
//! (typically on the matching [`StateChange`]s) and owns the actual
//! viewer/chart handles for the lifetime of the surface.
//!
//! [`DemoState`]: crate::state::DemoState
//! [`StateChange`]: crate::state::StateChange

pub mod attention_view;
pub mod box_plot;
pub mod energy_scatter;
pub mod molecule;

/// Delays (ms) for the chart resize burst after a dispose-and-reinit
/// cycle. Host layout settles asynchronously, so one resize is not
/// enough; a short staggered series catches up with it.
pub const REINIT_RESIZE_DELAYS_MS: [u64; 3] = [50, 150, 300];

/// Delays (ms) for the resize burst after a plain option update on an
/// already-initialized chart.
pub const UPDATE_RESIZE_DELAYS_MS: [u64; 3] = [100, 300, 500];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resize_bursts_are_staggered() {
        for schedule in [REINIT_RESIZE_DELAYS_MS, UPDATE_RESIZE_DELAYS_MS] {
            for pair in schedule.windows(2) {
                assert!(pair[0] < pair[1]);
            }
        }
        // Reinit chases a fresh chart, so its burst starts sooner.
        assert!(REINIT_RESIZE_DELAYS_MS[0] < UPDATE_RESIZE_DELAYS_MS[0]);
        assert_eq!(REINIT_RESIZE_DELAYS_MS, [50, 150, 300]);
        assert_eq!(UPDATE_RESIZE_DELAYS_MS, [100, 300, 500]);
    }
}
