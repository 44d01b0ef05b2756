//! Stroke projection and terrain deformation geometry core.
//!
//! Converts ordered 2D pointer samples into 3D curves and meshes via
//! camera-ray unprojection, and reshapes a grid terrain's height field
//! along gestured silhouettes with distance-weighted falloff.

use std::error::Error;
use std::fmt;

/// Screen-aligned ribbon projection onto camera, world-plane, billboard and sky anchors.
pub mod billboard;

/// Immutable camera snapshot and NDC ray unprojection.
pub mod camera;

/// Height-field reshaping along a silhouette curve with radial falloff.
pub mod deform;

/// Grid terrain mesh owning the mutable height buffer.
pub mod ground;

/// Ray/plane and ray/sphere intersection primitives.
pub mod raycast;

/// Constant-width triangulated stroke strips with minimum-spacing resampling.
pub mod ribbon;

/// Projection of screen paths onto reshape planes.
pub mod silhouette;

/// Failures surfaced by the geometry core.
///
/// Missed intersections abort the whole operation rather than substituting
/// an undefined point; construction-time misconfiguration is fatal to the
/// constructing call. Nothing here retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchError {
    /// A ray failed to intersect its target plane or sphere, or a stroke
    /// was too degenerate to define a projection frame.
    DegenerateProjection,
    /// A non-positive size, resolution or width was passed at construction.
    InvalidConfiguration(&'static str),
}

impl fmt::Display for SketchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateProjection => {
                write!(f, "ray missed the projection target or stroke is degenerate")
            }
            Self::InvalidConfiguration(what) => write!(f, "invalid configuration: {what}"),
        }
    }
}

impl Error for SketchError {}
