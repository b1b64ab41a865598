//! The render loop context: owns scene, camera and frame counter, reads a
//! [`Controls`] snapshot each tick and issues one frame of draw commands.

pub mod camera;
pub mod controls;
pub mod draw;

use crate::config::{ConfigError, OrreryConfig};
use crate::engine::surface::DrawSurface;
use crate::scene::Scene;

pub use camera::{CameraState, OrbitControl, Tracking};
pub use controls::{Controls, Pointer, SpeedMode};

pub struct Orrery {
    config: OrreryConfig,
    scene: Scene,
    camera: CameraState,
    orbit_control: OrbitControl,
    frame: u64,
    show_orbits: bool,
}

impl Orrery {
    pub fn new(config: OrreryConfig) -> Result<Self, ConfigError> {
        let scene = Scene::from_config(&config)?;
        Ok(Self::with_scene(config, scene))
    }

    pub fn with_scene(config: OrreryConfig, scene: Scene) -> Self {
        let camera = CameraState::new(&config.camera);
        Orrery {
            config,
            scene,
            camera,
            orbit_control: OrbitControl::default(),
            frame: 0,
            show_orbits: true,
        }
    }

    /// Advance one frame: move every body, then ease the camera toward the
    /// current selection.
    pub fn tick(&mut self, controls: &Controls, pointer: &Pointer) {
        let multiplier = controls.speed_mode().movement_multiplier(pointer);
        self.scene.advance(multiplier);
        self.camera.retarget(&self.scene, controls.selected_body.as_deref());
        self.camera.follow(&self.scene);
        self.show_orbits = controls.show_orbits;
        self.frame += 1;
    }

    pub fn draw<S: DrawSurface>(&self, surface: &mut S) {
        draw::draw_frame(
            surface,
            &draw::Frame {
                scene: &self.scene,
                camera: &self.camera,
                frame: self.frame,
                show_orbits: self.show_orbits,
            },
        );
    }

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.orbit_control.pointer_down(x, y);
    }

    pub fn pointer_up(&mut self) {
        self.orbit_control.pointer_up();
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.orbit_control.pointer_moved(x, y, &mut self.camera);
    }

    pub fn wheel(&mut self, delta: f32) {
        self.orbit_control.wheel(delta, &mut self.camera);
    }

    pub fn config(&self) -> &OrreryConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &CameraState {
        &self.camera
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}
