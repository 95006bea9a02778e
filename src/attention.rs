//! Attention-score to sphere-radius normalization.
//!
//! The attention viewer encodes per-atom importance as sphere size. Raw
//! attention vectors are heavily skewed, so the pipeline is:
//!
//! 1. Threshold at the `percentile`-th order statistic (nearest rank) and
//!    zero everything at or below it.
//! 2. Divide by the mean of the **original** vector and raise to an
//!    exponent derived from the `ratio` slider and the vector's
//!    coefficient of variation.
//! 3. Cap at the `max` slider's radius bound and halve for display.
//!
//! Hydrogens are skipped entirely and keep the base sphere style. The
//! whole transform is a pure function of the vector, the three sliders,
//! and the atom elements; it is recomputed in full on any input change.

use crate::options::SliderOptions;
use crate::structure::Atom;

/// Slider gain: full-scale `ratio` maps to an exponent of 6.5 at unit
/// coefficient of variation.
const RATIO_GAIN: f64 = 5.0 * 1.3;

/// Full-scale `max` maps to this radius cap before display halving.
const MAX_RADIUS_SPAN: f64 = 5.0;

/// Display scale applied to every normalized radius.
const DISPLAY_SCALE: f64 = 0.5;

/// Nearest-rank order statistic: sort ascending and index at
/// `floor(percentile * n / 100)`, clamped to the last element so
/// `percentile = 100` stays defined.
///
/// Returns 0.0 for an empty slice.
#[must_use]
pub fn find_percentile(values: &[f64], percentile: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| {
        a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal)
    });
    let idx = ((percentile * sorted.len() as f64) / 100.0).floor() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Mean of a slice; 0.0 when empty.
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0.0 when empty.
fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>()
        / values.len() as f64;
    var.sqrt()
}

/// Per-atom render radii for the attention viewer.
///
/// `base_radius` is the unstyled sphere radius; hydrogens and degenerate
/// input (empty vector, zero mean) fall back to it. When the vector and
/// atom list disagree in length, the overhang is ignored.
#[must_use]
pub fn render_radii(
    attn: &[f64],
    atoms: &[Atom],
    sliders: &SliderOptions,
    base_radius: f64,
) -> Vec<f64> {
    let m = mean(attn);
    if attn.is_empty() || m == 0.0 {
        return vec![base_radius; atoms.len()];
    }

    if attn.len() != atoms.len() {
        log::warn!(
            "attention length {} does not match atom count {}",
            attn.len(),
            atoms.len()
        );
    }

    let threshold = find_percentile(attn, sliders.percentile);
    let std = std_dev(attn, m);

    let mut exponent = (sliders.ratio / 100.0) * RATIO_GAIN / (std / m);
    if exponent.is_nan() {
        exponent = 0.0;
    }

    let cap = (sliders.max / 100.0) * MAX_RADIUS_SPAN;

    atoms
        .iter()
        .enumerate()
        .map(|(i, atom)| {
            if atom.is_hydrogen() {
                return base_radius;
            }
            let Some(&raw) = attn.get(i) else {
                return base_radius;
            };
            let kept = if raw > threshold { raw } else { 0.0 };
            // powf(0, 0) == 1, which the capping below turns into a
            // visible (defined) radius rather than a hole.
            let normalized = (kept / m).powf(exponent);
            normalized.min(cap) * DISPLAY_SCALE
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atoms_of(elements: &[&str]) -> Vec<Atom> {
        elements
            .iter()
            .map(|e| Atom {
                element: (*e).to_owned(),
                position: [0.0; 3],
            })
            .collect()
    }

    fn sliders(ratio: f64, percentile: f64, max: f64) -> SliderOptions {
        SliderOptions {
            ratio,
            percentile,
            max,
        }
    }

    #[test]
    fn nearest_rank_percentile() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        // floor(60 * 5 / 100) = 3 -> sorted[3] = 4
        assert_eq!(find_percentile(&a, 60.0), 4.0);
        assert_eq!(find_percentile(&a, 0.0), 1.0);
        // index clamps to the last element
        assert_eq!(find_percentile(&a, 100.0), 5.0);
    }

    #[test]
    fn percentile_sorts_a_copy() {
        let a = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(find_percentile(&a, 60.0), 4.0);
        assert_eq!(a[0], 5.0);
    }

    #[test]
    fn zero_ratio_flattens_all_radii() {
        // exponent = 0, so every kept value normalizes to 1 and every
        // thresholded-out value hits 0^0 = 1: a uniform, defined radius.
        let attn = [0.1, 0.4, 0.9, 0.2];
        let atoms = atoms_of(&["C", "O", "Zn", "N"]);
        let radii =
            render_radii(&attn, &atoms, &sliders(0.0, 50.0, 50.0), 0.1);
        for r in radii {
            assert_eq!(r, 0.5); // min(1, 2.5) * 0.5
        }
    }

    #[test]
    fn hydrogens_keep_base_radius() {
        let attn = [0.9, 0.9, 0.1];
        let atoms = atoms_of(&["C", "H", "O"]);
        let radii =
            render_radii(&attn, &atoms, &sliders(50.0, 0.0, 100.0), 0.1);
        assert_eq!(radii[1], 0.1);
        assert!(radii[0] > radii[2]);
    }

    #[test]
    fn max_slider_caps_radii() {
        let attn = [100.0, 0.01, 0.01, 0.01];
        let atoms = atoms_of(&["Zn", "C", "C", "C"]);
        let radii =
            render_radii(&attn, &atoms, &sliders(100.0, 0.0, 20.0), 0.1);
        // cap = (20/100)*5 = 1.0, halved for display; the dominant atom
        // saturates it exactly
        assert_eq!(radii[0], 0.5);
    }

    #[test]
    fn thresholded_atoms_shrink_under_positive_ratio() {
        let attn = [1.0, 2.0, 3.0, 10.0];
        let atoms = atoms_of(&["C", "C", "C", "Zn"]);
        let radii =
            render_radii(&attn, &atoms, &sliders(50.0, 60.0, 100.0), 0.1);
        // threshold = sorted[floor(60*4/100)] = sorted[2] = 3.0, so the
        // first three atoms are zeroed and 0^positive = 0.
        assert_eq!(radii[0], 0.0);
        assert_eq!(radii[1], 0.0);
        assert_eq!(radii[2], 0.0);
        assert!(radii[3] > 0.0);
    }

    #[test]
    fn degenerate_input_falls_back_to_base() {
        let atoms = atoms_of(&["C", "O"]);
        let empty =
            render_radii(&[], &atoms, &sliders(50.0, 50.0, 50.0), 0.1);
        assert_eq!(empty, vec![0.1, 0.1]);

        let zeros = render_radii(
            &[0.0, 0.0],
            &atoms,
            &sliders(50.0, 50.0, 50.0),
            0.1,
        );
        assert_eq!(zeros, vec![0.1, 0.1]);
    }
}
