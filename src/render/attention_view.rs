//! Attention viewer adapter.
//!
//! Shares geometry with the plain molecule viewer but re-styles per-atom
//! sphere radii from the normalized attention vector. Geometry reloads
//! only when the structure changes; slider moves, sub-task switches, and
//! fresh attention data all resolve to a cheap restyle of the model that
//! is already loaded.

use crate::attention::render_radii;
use crate::options::ViewerOptions;
use crate::state::DemoState;

/// One attention-surface update.
#[derive(Debug, Clone, PartialEq)]
pub struct AttentionRestyle {
    /// XYZ text to load first, present only when the structure changed.
    pub reload: Option<String>,
    /// Per-atom sphere radii, index-aligned with the model's atoms.
    pub radii: Vec<f64>,
    /// Bond stick radius for the base style.
    pub stick_radius: f64,
}

/// Tracks the last-loaded geometry for the attention surface.
#[derive(Debug)]
pub struct AttentionView {
    options: ViewerOptions,
    last_xyz: Option<String>,
}

impl AttentionView {
    /// Create the adapter with the given base style.
    #[must_use]
    pub fn new(options: ViewerOptions) -> Self {
        Self {
            options,
            last_xyz: None,
        }
    }

    /// Produce the restyle for the current state, or `None` when there
    /// is no geometry to show. Without an attention vector for the
    /// active sub-task every atom keeps the base sphere radius.
    pub fn update(&mut self, state: &DemoState) -> Option<AttentionRestyle> {
        let structure = state.structure.as_ref()?;

        let reload = if self.last_xyz.as_deref() == Some(structure.raw()) {
            None
        } else {
            self.last_xyz = Some(structure.raw().to_owned());
            Some(structure.raw().to_owned())
        };

        let radii = match state.current_attention() {
            Some(attn) => render_radii(
                attn,
                structure.atoms(),
                &state.sliders,
                self.options.sphere_radius,
            ),
            None => {
                vec![self.options.sphere_radius; structure.atom_count()]
            }
        };

        Some(AttentionRestyle {
            reload,
            radii,
            stick_radius: self.options.stick_radius,
        })
    }

    /// Forget the loaded model (host disposed its viewer).
    pub fn reset(&mut self) {
        self.last_xyz = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::XyzStructure;

    const XYZ: &str = "3\nm\nC 0.0 0.0 0.0\nH 1.0 0.0 0.0\nO 2.0 0.0 0.0\n";

    fn state_with_structure() -> DemoState {
        DemoState {
            structure: Some(XyzStructure::parse(XYZ).unwrap()),
            ..DemoState::default()
        }
    }

    #[test]
    fn base_radii_until_attention_arrives() {
        let mut view = AttentionView::new(ViewerOptions::default());
        let state = state_with_structure();

        let restyle = view.update(&state).unwrap();
        assert!(restyle.reload.is_some());
        assert_eq!(restyle.radii, vec![0.1, 0.1, 0.1]);
    }

    #[test]
    fn geometry_reloads_only_on_structure_change() {
        let mut view = AttentionView::new(ViewerOptions::default());
        let mut state = state_with_structure();

        assert!(view.update(&state).unwrap().reload.is_some());

        // Attention arriving restyles without a reload.
        let _ = state
            .attns
            .insert("CO2".to_owned(), vec![0.2, 0.5, 0.9]);
        let restyle = view.update(&state).unwrap();
        assert!(restyle.reload.is_none());
        assert_eq!(restyle.radii.len(), 3);
        // Hydrogen keeps the base radius through the normalization.
        assert_eq!(restyle.radii[1], 0.1);
    }

    #[test]
    fn slider_moves_change_radii_in_place() {
        let mut view = AttentionView::new(ViewerOptions::default());
        let mut state = state_with_structure();
        let _ = state
            .attns
            .insert("CO2".to_owned(), vec![0.2, 0.5, 0.9]);

        let before = view.update(&state).unwrap();
        state.sliders.max = 5.0;
        let after = view.update(&state).unwrap();

        assert!(after.reload.is_none());
        assert_ne!(before.radii, after.radii);
    }

    #[test]
    fn no_restyle_without_geometry() {
        let mut view = AttentionView::new(ViewerOptions::default());
        assert!(view.update(&DemoState::default()).is_none());
    }
}
