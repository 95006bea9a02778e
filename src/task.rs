//! Task categories, sub-task lists, and their reference distributions.
//!
//! A task category selects which predictions the demo shows: gas uptake
//! (adsorption), pairwise selectivity (separation), or intrinsic material
//! properties. Each category carries a fixed sub-task list, axis labels
//! for the box plot, and static reference distributions (five-number
//! summaries over the SpbNet training set) the live predictions are
//! plotted against.

use serde::{Deserialize, Serialize};

/// Built-in structure shown on first load.
pub const DEFAULT_CIFID: &str = "abb3976_data_s1";

/// Preset structure identifiers offered alongside the default.
pub const EXAMPLE_CIFS: [&str; 4] =
    ["abb3976_data_s1", "HKUST-1", "ZIF-8", "MOF-5"];

/// Which set of sub-tasks and reference distributions applies.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Single-gas uptake predictions.
    #[default]
    Adsorption,
    /// Pairwise gas selectivity predictions.
    Separation,
    /// Intrinsic material properties.
    Intrinsic,
}

impl TaskCategory {
    /// All categories in display order.
    pub const ALL: [Self; 3] =
        [Self::Adsorption, Self::Separation, Self::Intrinsic];

    /// Sub-task names within this category.
    #[must_use]
    pub fn subtasks(self) -> &'static [&'static str] {
        match self {
            Self::Adsorption => &["CO2", "CH4", "N2", "Kr", "Xe"],
            Self::Separation => &["CO2/N2", "CO2/CH4", "Kr/Xe"],
            Self::Intrinsic => &["Tsd", "Qst"],
        }
    }

    /// Box-plot axis labels, index-aligned with [`subtasks`](Self::subtasks).
    #[must_use]
    pub fn labels(self) -> &'static [&'static str] {
        match self {
            Self::Adsorption => &[
                "CO2 [mol/kg]",
                "CH4 [mol/kg]",
                "N2 [mol/kg]",
                "Kr [mol/kg]",
                "Xe [mol/kg]",
            ],
            Self::Separation => &["CO2/N2", "CO2/CH4", "Kr/Xe"],
            Self::Intrinsic => &["Tsd [100 K]", "Qst [kJ/mol]"],
        }
    }

    /// Training-set reference distributions as `[min, q1, median, q3, max]`
    /// rows, index-aligned with [`subtasks`](Self::subtasks).
    #[must_use]
    pub fn reference_distributions(self) -> &'static [[f64; 5]] {
        match self {
            Self::Adsorption => &[
                [0.10, 0.80, 1.60, 2.90, 6.50],
                [0.05, 0.50, 1.10, 2.00, 4.80],
                [0.01, 0.20, 0.45, 0.90, 2.40],
                [0.02, 0.30, 0.70, 1.30, 3.10],
                [0.05, 0.60, 1.40, 2.60, 5.90],
            ],
            Self::Separation => &[
                [1.20, 4.00, 8.50, 18.00, 60.00],
                [1.00, 2.20, 3.90, 7.40, 24.00],
                [0.20, 0.70, 1.10, 1.80, 4.50],
            ],
            Self::Intrinsic => &[
                [1.80, 3.10, 3.70, 4.30, 5.60],
                [4.00, 12.00, 18.00, 26.00, 48.00],
            ],
        }
    }

    /// The sub-task a category change resets the active selection to.
    #[must_use]
    pub fn first_subtask(self) -> &'static str {
        self.subtasks()[0]
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Adsorption => write!(f, "adsorption"),
            Self::Separation => write!(f, "separation"),
            Self::Intrinsic => write!(f, "intrinsic"),
        }
    }
}

/// Sub-task name as sent in `task=` query parameters. Separation pairs
/// contain a `/`, which the API does not accept in a parameter value.
#[must_use]
pub fn query_param(subtask: &str) -> String {
    subtask.replace('/', "")
}

/// Ingest a raw property value from the API. `Tsd` arrives in Kelvin and
/// is stored in hundreds of Kelvin to share an axis with the rest of the
/// intrinsic panel.
#[must_use]
pub fn ingest_value(subtask: &str, raw: f64) -> f64 {
    if subtask == "Tsd" {
        0.01 * raw
    } else {
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tsd_scale_correction() {
        assert_eq!(ingest_value("Tsd", 250.0), 2.5);
        assert_eq!(ingest_value("Qst", 250.0), 250.0);
        assert_eq!(ingest_value("CO2", 3.2), 3.2);
    }

    #[test]
    fn category_change_resets_to_first_subtask() {
        assert_eq!(TaskCategory::Adsorption.first_subtask(), "CO2");
        assert_eq!(TaskCategory::Separation.first_subtask(), "CO2/N2");
        assert_eq!(TaskCategory::Intrinsic.first_subtask(), "Tsd");
    }

    #[test]
    fn separation_pairs_lose_slash_in_query_params() {
        assert_eq!(query_param("CO2/N2"), "CO2N2");
        assert_eq!(query_param("Xe"), "Xe");
    }

    #[test]
    fn tables_are_index_aligned() {
        for cat in TaskCategory::ALL {
            assert_eq!(cat.subtasks().len(), cat.labels().len());
            assert_eq!(
                cat.subtasks().len(),
                cat.reference_distributions().len()
            );
        }
    }

    #[test]
    fn reference_rows_are_sorted_summaries() {
        for cat in TaskCategory::ALL {
            for row in cat.reference_distributions() {
                for pair in row.windows(2) {
                    assert!(pair[0] <= pair[1]);
                }
            }
        }
    }
}
