//! Shared tuning parameters for the sketch geometry engine.

/// Default ground plate extent in world units (the grid spans [-size/2, size/2])
pub const DEFAULT_GROUND_SIZE: f32 = 100.0;

/// Default ground grid resolution (cells per side)
pub const DEFAULT_GROUND_SEGMENTS: u32 = 100;

/// Default ink ribbon width in device-normalized units
pub const DEFAULT_STROKE_WIDTH: f32 = 0.02;

/// Distance from the reshape plane beyond which a sculpt stroke has no effect
pub const DEFAULT_INFLUENCE_RADIUS: f32 = 5.0;

/// Radius of the sky dome sphere centred at the world origin
pub const SKY_DOME_RADIUS: f32 = 495.0;

/// NDC depth at which a mid-draw stroke floats in front of the camera.
/// Bevy uses reverse-z clip space, so 1.0 is the near plane and smaller
/// values sit further away; 0.05 puts the live ribbon a couple of units
/// out at the default near plane of 0.1.
pub const LIVE_STROKE_NDC_DEPTH: f32 = 0.05;

/// Minimum |ray . normal| below which a ray counts as parallel to a plane
pub const PLANE_PARALLEL_EPSILON: f32 = 1e-6;

/// Minimum cursor travel (device-normalized) before the sculpt tool records
/// a new gesture sample
pub const SCULPT_SAMPLE_SPACING: f32 = 0.01;
