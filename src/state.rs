//! Shared demo state and the change events the adapters subscribe to.

use rustc_hash::FxHashMap;

use crate::grid::RawEnergyGrid;
use crate::options::SliderOptions;
use crate::structure::XyzStructure;
use crate::task::{TaskCategory, DEFAULT_CIFID};

/// The three independent loading indicators. They may overlap freely;
/// there is no aggregate "ready" state. Each surface reacts to its own
/// flag plus data presence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    /// Geometry + energy fetch in flight.
    pub structure: bool,
    /// Property prediction fetch in flight.
    pub properties: bool,
    /// Attention vector fetch in flight.
    pub attention: bool,
}

impl LoadingFlags {
    /// Whether any fetch is in flight (used to disable upload controls).
    #[must_use]
    pub fn any(self) -> bool {
        self.structure || self.properties || self.attention
    }
}

/// Which fetch category an event or failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// The `/cif` registration POST.
    Register,
    /// Geometry + energy grid.
    Structure,
    /// Property predictions.
    Properties,
    /// Attention vector.
    Attention,
}

/// One observable state transition, delivered to the host after each
/// [`poll`](crate::fetch::Orchestrator::poll) so it can notify exactly
/// the surfaces whose inputs moved.
#[derive(Debug, Clone, PartialEq)]
pub enum StateChange {
    /// The active structure identifier changed.
    CifidChanged,
    /// The task category changed (sub-task was reset to the first entry).
    CategoryChanged,
    /// The active sub-task changed.
    SubtaskChanged,
    /// New geometry and/or energy grid arrived.
    StructureData,
    /// A new property-prediction set arrived.
    PropertyData,
    /// An attention vector arrived or was served from cache.
    AttentionData,
    /// One of the attention sliders moved.
    SlidersMoved,
    /// A loading flag was raised or lowered.
    LoadingChanged,
    /// An uploaded structure was accepted under a server-confirmed id.
    UploadAccepted {
        /// The identifier the server registered the upload under.
        cifid: String,
    },
    /// A fetch failed; transient and scoped to one surface.
    FetchFailed {
        /// Which fetch category failed.
        kind: FetchKind,
        /// Human-readable error for the host's notification.
        message: String,
    },
}

/// All data the four rendering surfaces draw from.
#[derive(Debug, Clone)]
pub struct DemoState {
    /// Current structure identifier.
    pub cifid: String,
    /// Selected task category.
    pub task_category: TaskCategory,
    /// Active sub-task within the category.
    pub attn_task: String,
    /// Predictions for the current structure + category, replaced
    /// wholesale on each successful property fetch.
    pub properties: FxHashMap<String, f64>,
    /// Parsed geometry for the current structure.
    pub structure: Option<XyzStructure>,
    /// Raw energy grid; validated lazily by the scatter adapter.
    pub energy: Option<RawEnergyGrid>,
    /// Attention vectors keyed by sub-task. Accumulates across sub-task
    /// switches for the lifetime of the current structure.
    pub attns: FxHashMap<String, Vec<f64>>,
    /// Live positions of the three attention sliders.
    pub sliders: SliderOptions,
    /// Independent per-category loading indicators.
    pub loading: LoadingFlags,
}

impl Default for DemoState {
    fn default() -> Self {
        let task_category = TaskCategory::default();
        Self {
            cifid: DEFAULT_CIFID.to_owned(),
            task_category,
            attn_task: task_category.first_subtask().to_owned(),
            properties: FxHashMap::default(),
            structure: None,
            energy: None,
            attns: FxHashMap::default(),
            sliders: SliderOptions::default(),
            loading: LoadingFlags::default(),
        }
    }
}

impl DemoState {
    /// The cached attention vector for the active sub-task, if fetched.
    #[must_use]
    pub fn current_attention(&self) -> Option<&[f64]> {
        self.attns.get(&self.attn_task).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_matches_first_load() {
        let state = DemoState::default();
        assert_eq!(state.cifid, DEFAULT_CIFID);
        assert_eq!(state.task_category, TaskCategory::Adsorption);
        assert_eq!(state.attn_task, "CO2");
        assert!(!state.loading.any());
        assert!(state.current_attention().is_none());
    }

    #[test]
    fn any_flag_reports_overlap() {
        let mut flags = LoadingFlags::default();
        assert!(!flags.any());
        flags.attention = true;
        assert!(flags.any());
        flags.structure = true;
        flags.attention = false;
        assert!(flags.any());
    }
}
