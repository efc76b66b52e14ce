//! # Viewer and Chunk Visibility
//!
//! The core never owns a camera. The outer render loop hands in a [`Viewer`] (eye
//! position plus forward vector) once per frame and [`VisibilityPolicy`] decides which
//! chunks stay enabled:
//!
//! - beyond `max_distance`: hidden
//! - within `always_visible_distance`: shown
//! - in between: shown while the direction from the viewer to the chunk centre is not
//!   too far behind the forward vector
//!
//! The angular test uses a lower cutoff for chunks that are already visible, so a
//! chunk near the threshold does not flicker while the viewer turns.

use cgmath::{Angle, InnerSpace, Point3, Rad, Vector3};

use crate::config::CullingConfig;

/// Where the viewer stands and where it looks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewer {
    pub position: Point3<f32>,
    /// Normalized view direction.
    pub forward: Vector3<f32>,
}

impl Viewer {
    /// Creates a viewer; `forward` is normalized here. A zero vector is replaced by +Z.
    pub fn new(position: Point3<f32>, forward: Vector3<f32>) -> Self {
        let forward = if forward.magnitude2() > f32::EPSILON {
            forward.normalize()
        } else {
            Vector3::unit_z()
        };
        Viewer { position, forward }
    }

    /// Creates a viewer from first-person yaw (around Y) and pitch (around X) angles.
    pub fn from_yaw_pitch<Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: Point3<f32>,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let (yaw_sin, yaw_cos) = yaw.into().sin_cos();
        let (pitch_sin, pitch_cos) = pitch.into().sin_cos();
        Self::new(
            position,
            Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin),
        )
    }
}

/// Distance and facing thresholds applied by chunk culling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilityPolicy {
    max_distance_squared: f32,
    always_visible_distance_squared: f32,
    backward_cutoff: f32,
    hysteresis: f32,
}

impl VisibilityPolicy {
    pub fn new(config: &CullingConfig) -> Self {
        VisibilityPolicy {
            max_distance_squared: config.max_distance * config.max_distance,
            always_visible_distance_squared: config.always_visible_distance
                * config.always_visible_distance,
            backward_cutoff: config.backward_cutoff,
            hysteresis: config.hysteresis,
        }
    }

    /// Whether a chunk centred on `center` should be enabled this frame.
    ///
    /// # Arguments
    /// * `viewer` - The current viewer
    /// * `center` - World-space centre of the chunk
    /// * `currently_visible` - Visibility from the previous evaluation
    pub fn is_visible(&self, viewer: &Viewer, center: Point3<f32>, currently_visible: bool) -> bool {
        let offset = center - viewer.position;
        let distance_squared = offset.magnitude2();

        if distance_squared > self.max_distance_squared {
            return false;
        }
        if distance_squared <= self.always_visible_distance_squared {
            return true;
        }

        let facing = offset.normalize().dot(viewer.forward);
        let cutoff = if currently_visible {
            self.backward_cutoff - self.hysteresis
        } else {
            self.backward_cutoff
        };
        facing > cutoff
    }
}
