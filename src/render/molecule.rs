//! Plain molecule viewer adapter.

use crate::options::ViewerOptions;
use crate::state::DemoState;

/// Everything the host needs to redraw the plain molecule surface.
#[derive(Debug, Clone, PartialEq)]
pub struct MoleculeRedraw {
    /// XYZ text to load as the new model.
    pub xyz: String,
    /// Bond stick radius for the base style.
    pub stick_radius: f64,
    /// Atom sphere radius for the base style.
    pub sphere_radius: f64,
    /// Whether the viewer should auto-rotate.
    pub spin: bool,
}

/// Tracks the last-loaded geometry so a model is only reloaded when the
/// structure actually changed. Spin toggles restyle in place.
#[derive(Debug)]
pub struct MoleculeView {
    options: ViewerOptions,
    spin: bool,
    last_xyz: Option<String>,
}

impl MoleculeView {
    /// Create the adapter with the given base style.
    #[must_use]
    pub fn new(options: ViewerOptions) -> Self {
        let spin = options.spin;
        Self {
            options,
            spin,
            last_xyz: None,
        }
    }

    /// Current auto-rotate setting.
    #[must_use]
    pub fn spin(&self) -> bool {
        self.spin
    }

    /// Toggle auto-rotation. Returns whether the setting changed; the
    /// host applies it directly without reloading geometry.
    pub fn set_spin(&mut self, spin: bool) -> bool {
        if spin == self.spin {
            return false;
        }
        self.spin = spin;
        true
    }

    /// Produce a redraw spec if the structure changed since the last
    /// update. Returns `None` when there is no geometry yet or the
    /// current model is already loaded.
    pub fn update(&mut self, state: &DemoState) -> Option<MoleculeRedraw> {
        let structure = state.structure.as_ref()?;
        if self.last_xyz.as_deref() == Some(structure.raw()) {
            return None;
        }
        self.last_xyz = Some(structure.raw().to_owned());
        Some(MoleculeRedraw {
            xyz: structure.raw().to_owned(),
            stick_radius: self.options.stick_radius,
            sphere_radius: self.options.sphere_radius,
            spin: self.spin,
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

    fn state_with_xyz(xyz: &str) -> DemoState {
        DemoState {
            structure: Some(XyzStructure::parse(xyz).unwrap()),
            ..DemoState::default()
        }
    }

    const XYZ_A: &str = "1\na\nC 0.0 0.0 0.0\n";
    const XYZ_B: &str = "1\nb\nO 1.0 0.0 0.0\n";

    #[test]
    fn redraws_once_per_structure() {
        let mut view = MoleculeView::new(ViewerOptions::default());
        let state = state_with_xyz(XYZ_A);

        let redraw = view.update(&state).unwrap();
        assert_eq!(redraw.xyz, XYZ_A);
        assert_eq!(redraw.stick_radius, 0.15);
        assert!(redraw.spin);

        // Same geometry again: nothing to do.
        assert!(view.update(&state).is_none());

        let next = state_with_xyz(XYZ_B);
        assert!(view.update(&next).is_some());
    }

    #[test]
    fn no_redraw_without_geometry() {
        let mut view = MoleculeView::new(ViewerOptions::default());
        assert!(view.update(&DemoState::default()).is_none());
    }

    #[test]
    fn spin_toggle_does_not_reload_geometry() {
        let mut view = MoleculeView::new(ViewerOptions::default());
        let state = state_with_xyz(XYZ_A);
        let _ = view.update(&state);

        assert!(view.set_spin(false));
        assert!(!view.set_spin(false));
        // Still the same model; the toggle alone forces no redraw.
        assert!(view.update(&state).is_none());
        assert!(!view.spin());
    }

    #[test]
    fn reset_forces_the_next_redraw() {
        let mut view = MoleculeView::new(ViewerOptions::default());
        let state = state_with_xyz(XYZ_A);
        let _ = view.update(&state);

        view.reset();
        assert!(view.update(&state).is_some());
    }
}
