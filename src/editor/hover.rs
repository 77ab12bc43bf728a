use crate::config::EditorConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HoverPhase {
    /// Pointer inside (or just entered): full opacity at the docked position.
    Active,
    /// Pointer left; opacity falls linearly while `elapsed` grows towards the fade duration.
    FadingOut { elapsed: f32 },
    /// Fade finished: resting opacity at the retracted position.
    Resting,
}

/// What the panel looks like right now, in toolkit-neutral units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelAppearance {
    pub opacity: f32,
    /// Horizontal offset as a fraction of the parent width.
    pub x: f32,
}

#[derive(Debug, Clone)]
pub struct HoverAnimator {
    phase: HoverPhase,
    fade_duration: f32,
    docked_x: f32,
    retracted_x: f32,
    resting_opacity: f32,
    appearance: PanelAppearance,
}

impl HoverAnimator {
    pub fn new(fade_duration: f32, docked_x: f32, retracted_x: f32, resting_opacity: f32) -> Self {
        Self {
            phase: HoverPhase::FadingOut { elapsed: 0.0 },
            fade_duration: fade_duration.max(f32::EPSILON),
            docked_x,
            retracted_x,
            resting_opacity,
            appearance: PanelAppearance { opacity: 1.0, x: docked_x },
        }
    }

    pub fn from_config(config: &EditorConfig) -> Self {
        Self::new(config.fade_duration_secs, config.docked_x, config.retracted_x, config.resting_opacity)
    }

    pub fn phase(&self) -> HoverPhase {
        self.phase
    }

    pub fn appearance(&self) -> PanelAppearance {
        self.appearance
    }

    pub fn fade_duration(&self) -> f32 {
        self.fade_duration
    }

    pub fn pointer_entered(&mut self) {
        self.phase = HoverPhase::Active;
        self.appearance = PanelAppearance { opacity: 1.0, x: self.docked_x };
    }

    pub fn pointer_left(&mut self) {
        if self.phase == HoverPhase::Active {
            self.phase = HoverPhase::FadingOut { elapsed: 0.0 };
        }
    }

    /// Advances the fade by `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let HoverPhase::FadingOut { elapsed } = self.phase else {
            return;
        };
        let elapsed = elapsed + dt.max(0.0);
        if elapsed >= self.fade_duration {
            self.phase = HoverPhase::Resting;
            self.appearance = PanelAppearance { opacity: self.resting_opacity, x: self.retracted_x };
        } else {
            self.phase = HoverPhase::FadingOut { elapsed };
            self.appearance.opacity = 1.0 - elapsed / self.fade_duration;
        }
    }

    /// Back to the freshly constructed state, keeping the configured geometry.
    pub fn reset(&mut self) {
        self.phase = HoverPhase::FadingOut { elapsed: 0.0 };
        self.appearance = PanelAppearance { opacity: 1.0, x: self.docked_x };
    }
}
