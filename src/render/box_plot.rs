//! Property box-plot adapter.
//!
//! Plots the category's static training-set distributions as boxes, with
//! the live predictions overlaid as mark points. Pure function of the
//! state; the host rebuilds its chart options from the spec on every
//! property or category change.

use crate::state::DemoState;

/// One live-prediction marker on the box plot.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkPoint {
    /// Index of the sub-task on the category axis.
    pub index: usize,
    /// Display label, two decimals or `"0"` while the value is missing.
    pub label: String,
    /// Plotted value; 0.0 while the prediction has not arrived.
    pub value: f64,
}

/// Chart data for the box-plot surface.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxPlotSpec {
    /// Axis labels, one per sub-task.
    pub labels: Vec<&'static str>,
    /// `[min, q1, median, q3, max]` per sub-task.
    pub boxes: Vec<[f64; 5]>,
    /// One marker per sub-task.
    pub mark_points: Vec<MarkPoint>,
}

/// Prediction label: two decimals, or `"0"` while missing.
#[must_use]
pub fn format_prediction(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "0".to_owned(),
    }
}

/// Build the box-plot spec for the current category and predictions.
#[must_use]
pub fn build(state: &DemoState) -> BoxPlotSpec {
    let category = state.task_category;
    let mark_points = category
        .subtasks()
        .iter()
        .enumerate()
        .map(|(index, subtask)| {
            let value = state.properties.get(*subtask).copied();
            MarkPoint {
                index,
                label: format_prediction(value),
                value: value.unwrap_or(0.0),
            }
        })
        .collect();

    BoxPlotSpec {
        labels: category.labels().to_vec(),
        boxes: category.reference_distributions().to_vec(),
        mark_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskCategory;

    #[test]
    fn empty_predictions_render_zero_placeholders() {
        let spec = build(&DemoState::default());
        assert_eq!(spec.labels.len(), 5);
        assert_eq!(spec.boxes.len(), 5);
        for point in &spec.mark_points {
            assert_eq!(point.label, "0");
            assert_eq!(point.value, 0.0);
        }
    }

    #[test]
    fn predictions_format_to_two_decimals() {
        let mut state = DemoState::default();
        let _ = state.properties.insert("CO2".to_owned(), 3.456);
        let _ = state.properties.insert("N2".to_owned(), 0.5);

        let spec = build(&state);
        assert_eq!(spec.mark_points[0].label, "3.46");
        assert_eq!(spec.mark_points[0].value, 3.456);
        assert_eq!(spec.mark_points[2].label, "0.50");
        // CH4 missing
        assert_eq!(spec.mark_points[1].label, "0");
    }

    #[test]
    fn category_switch_swaps_axes_and_boxes() {
        let mut state = DemoState {
            task_category: TaskCategory::Intrinsic,
            ..DemoState::default()
        };
        let _ = state.properties.insert("Tsd".to_owned(), 2.5);

        let spec = build(&state);
        assert_eq!(spec.labels, vec!["Tsd [100 K]", "Qst [kJ/mol]"]);
        assert_eq!(spec.boxes.len(), 2);
        assert_eq!(spec.mark_points[0].label, "2.50");
    }
}
