//! Typed response bodies for the four API endpoints.

use serde::Deserialize;

use crate::grid::RawEnergyGrid;

/// `POST /cif`: structure registration. The server may assign a
/// different identifier than the one submitted.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    /// Server-confirmed structure identifier.
    pub cifid: String,
}

/// `GET /modal`: geometry plus the optional potential-energy grid.
#[derive(Debug, Clone, Deserialize)]
pub struct ModalResponse {
    /// Atomic coordinates in XYZ text format.
    pub xyz: String,
    /// Raw 3D energy grid; absent or null when the server has none.
    #[serde(default)]
    pub energy: Option<RawEnergyGrid>,
}

/// `GET /property`: one predicted value for one sub-task.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyResponse {
    /// Predicted property value, pre scale correction.
    pub value: f64,
}

/// `GET /attn`: the per-atom attention vector for one sub-task.
#[derive(Debug, Clone, Deserialize)]
pub struct AttnResponse {
    /// One non-negative score per atom.
    pub attn: Vec<f64>,
}
