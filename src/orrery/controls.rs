/// Largest magnitude of the interactive movement multiplier.
pub const MAX_MULTIPLIER: f32 = 3.0;

/// What the page currently asks of the render loop.
///
/// The page writes it whenever a button or list item is clicked; the loop
/// reads a snapshot once at the start of every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Controls {
    pub selected_body: Option<String>,
    pub interactive_speed: bool,
    pub show_orbits: bool,
}

impl Default for Controls {
    fn default() -> Self {
        Controls {
            selected_body: None,
            interactive_speed: false,
            show_orbits: true,
        }
    }
}

impl Controls {
    pub fn speed_mode(&self) -> SpeedMode {
        if self.interactive_speed {
            SpeedMode::Interactive
        } else {
            SpeedMode::Fixed
        }
    }
}

/// Horizontal pointer position over the canvas, in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    pub x: f32,
    pub canvas_width: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedMode {
    Fixed,
    /// Pointer x scrubs time: left edge -3, center paused, right edge +3.
    Interactive,
}

impl SpeedMode {
    pub fn movement_multiplier(self, pointer: &Pointer) -> f32 {
        match self {
            SpeedMode::Fixed => 1.0,
            SpeedMode::Interactive => {
                if pointer.canvas_width <= 0.0 {
                    return 0.0;
                }
                map_range(pointer.x, 0.0, pointer.canvas_width, -MAX_MULTIPLIER, MAX_MULTIPLIER)
            }
        }
    }
}

/// Linear map without clamping.
fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    out_min + (value - in_min) / (in_max - in_min) * (out_max - out_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: f32) -> f32 {
        SpeedMode::Interactive.movement_multiplier(&Pointer { x, canvas_width: 800.0 })
    }

    #[test]
    fn defaults_show_orbits_at_fixed_speed() {
        let c = Controls::default();
        assert!(c.selected_body.is_none());
        assert!(c.show_orbits);
        assert_eq!(c.speed_mode(), SpeedMode::Fixed);
    }

    #[test]
    fn fixed_mode_ignores_pointer() {
        let pointer = Pointer { x: 0.0, canvas_width: 800.0 };
        assert_eq!(SpeedMode::Fixed.movement_multiplier(&pointer), 1.0);
    }

    #[test]
    fn interactive_edges_and_center() {
        assert_eq!(at(0.0), -3.0);
        assert_eq!(at(800.0), 3.0);
        assert_eq!(at(400.0), 0.0);
    }

    #[test]
    fn interactive_is_linear() {
        assert_eq!(at(200.0), -1.5);
        assert_eq!(at(600.0), 1.5);
    }

    #[test]
    fn interactive_is_not_clamped() {
        assert!(at(1600.0) > 3.0);
    }

    #[test]
    fn zero_width_canvas_pauses() {
        let pointer = Pointer { x: 10.0, canvas_width: 0.0 };
        assert_eq!(SpeedMode::Interactive.movement_multiplier(&pointer), 0.0);
    }

    #[test]
    fn toggle_selects_mode() {
        let c = Controls { interactive_speed: true, ..Controls::default() };
        assert_eq!(c.speed_mode(), SpeedMode::Interactive);
    }
}
