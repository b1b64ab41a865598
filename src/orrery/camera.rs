//! Camera with an eased look target.
//!
//! The eye stays where it was placed; only the point it looks at follows the
//! selected body. Pointer drags and the wheel may move the eye around that
//! point (see [`OrbitControl`]).

use nalgebra::{Matrix4, Point3, Vector3};

use crate::config::CameraConfig;
use crate::scene::{BodyRef, Scene};

/// Fraction of the remaining distance the look target covers each frame.
pub const TRACKING_LERP: f32 = 0.05;

const MIN_EYE_DISTANCE: f32 = 150.0;
const MAX_EYE_DISTANCE: f32 = 8000.0;
/// Keeps the eye off the poles, where `look_at` degenerates.
const MAX_ELEVATION: f32 = 1.5;
const DRAG_SENSITIVITY: f32 = 0.005;
const ZOOM_SENSITIVITY: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracking {
    Idle,
    Following(BodyRef),
}

pub struct CameraState {
    eye: Point3<f32>,
    look_target: Vector3<f32>,
    tracking: Tracking,
    fov: f32,
    near: f32,
    far: f32,
}

impl CameraState {
    pub fn new(config: &CameraConfig) -> Self {
        let [x, y, z] = config.eye;
        CameraState {
            eye: Point3::new(x, y, z),
            look_target: Vector3::zeros(),
            tracking: Tracking::Idle,
            fov: config.fov_degrees.to_radians(),
            near: config.near,
            far: config.far,
        }
    }

    pub fn eye(&self) -> Point3<f32> {
        self.eye
    }

    pub fn look_target(&self) -> Vector3<f32> {
        self.look_target
    }

    pub fn tracking(&self) -> Tracking {
        self.tracking
    }

    /// Apply the current selection. A name that does not resolve stops
    /// tracking, exactly like clearing the selection.
    pub fn retarget(&mut self, scene: &Scene, selection: Option<&str>) {
        let next = match selection.and_then(|name| scene.resolve(name)) {
            Some(target) => Tracking::Following(target),
            None => Tracking::Idle,
        };
        if next != self.tracking {
            match (next, selection) {
                (Tracking::Idle, Some(name)) => log::debug!("camera: unknown body `{name}`, tracking stopped"),
                (Tracking::Idle, None) => log::debug!("camera: tracking stopped"),
                (Tracking::Following(_), name) => log::debug!("camera: tracking {}", name.unwrap_or_default()),
            }
            self.tracking = next;
        }
    }

    /// Ease the look target toward the tracked body's current position.
    pub fn follow(&mut self, scene: &Scene) {
        if let Tracking::Following(target) = self.tracking {
            let position = scene.world_position(target);
            self.look_target = self.look_target.lerp(&position, TRACKING_LERP);
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &Point3::from(self.look_target), &Vector3::y())
    }

    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        Matrix4::new_perspective(aspect, self.fov, self.near, self.far)
    }

    /// Swing the eye around the look target, keeping its distance.
    pub fn orbit(&mut self, d_azimuth: f32, d_elevation: f32) {
        let offset = self.eye.coords - self.look_target;
        let distance = offset.norm();
        if distance <= f32::EPSILON {
            return;
        }
        let azimuth = offset.x.atan2(offset.z) + d_azimuth;
        let elevation = ((offset.y / distance).clamp(-1.0, 1.0).asin() + d_elevation)
            .clamp(-MAX_ELEVATION, MAX_ELEVATION);
        self.place_eye(azimuth, elevation, distance);
    }

    /// Move the eye toward (negative) or away from (positive) the look target.
    pub fn zoom(&mut self, delta: f32) {
        let offset = self.eye.coords - self.look_target;
        let distance = offset.norm();
        if distance <= f32::EPSILON {
            return;
        }
        let azimuth = offset.x.atan2(offset.z);
        let elevation = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let distance = (distance + delta * ZOOM_SENSITIVITY).clamp(MIN_EYE_DISTANCE, MAX_EYE_DISTANCE);
        self.place_eye(azimuth, elevation, distance);
    }

    fn place_eye(&mut self, azimuth: f32, elevation: f32, distance: f32) {
        let offset = Vector3::new(
            distance * elevation.cos() * azimuth.sin(),
            distance * elevation.sin(),
            distance * elevation.cos() * azimuth.cos(),
        );
        self.eye = Point3::from(self.look_target + offset);
    }
}

/// Pointer-drag rotation and wheel zoom of the camera eye.
#[derive(Debug, Default)]
pub struct OrbitControl {
    dragging: bool,
    last: (f32, f32),
}

impl OrbitControl {
    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.dragging = true;
        self.last = (x, y);
    }

    pub fn pointer_up(&mut self) {
        self.dragging = false;
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32, camera: &mut CameraState) {
        if !self.dragging {
            return;
        }
        let dx = x - self.last.0;
        let dy = y - self.last.1;
        camera.orbit(-dx * DRAG_SENSITIVITY, dy * DRAG_SENSITIVITY);
        self.last = (x, y);
    }

    pub fn wheel(&mut self, delta: f32, camera: &mut CameraState) {
        camera.zoom(delta);
    }
}
