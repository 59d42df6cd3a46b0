// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for intersection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Reasons an intersection or join produces no result
///
/// Only `InvalidPolygon` and `InvalidTolerance` describe malformed input.
/// Every other variant is an expected outcome ("the polygons do not relate")
/// and is surfaced as `None` by the `Option` based API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid polygon: {0}")]
    InvalidPolygon(String),

    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(f64),

    #[error("Degenerate plane: {0}")]
    DegeneratePlane(String),

    #[error("Orientation mismatch: {0}")]
    OrientationMismatch(String),

    #[error("Polygons are not coplanar: {0}")]
    NotCoplanar(String),

    #[error("Polygons share no area or boundary")]
    Disjoint,

    #[error("Polygons only share a boundary")]
    AdjacentOnly,

    #[error("Union encloses {0} void(s)")]
    EnclosedVoid(usize),
}

impl Error {
    /// True for malformed input, false for the "no result" outcomes
    pub fn is_contract_violation(&self) -> bool {
        matches!(self, Error::InvalidPolygon(_) | Error::InvalidTolerance(_))
    }
}
