use ratatui::style::Color;

/// Runtime palette
#[derive(Debug, Clone)]
pub struct Theme {
    // Background colors
    pub bg0: Color,
    pub bg1: Color,
    pub bg2: Color,

    // Foreground colors
    pub fg0: Color,
    pub fg1: Color,
    pub grey0: Color,
    pub grey1: Color,

    // Semantic colors
    pub accent: Color,
    pub highlight: Color,
    pub progress: Color,
    pub muted: Color,

    /// Background layer tints, cycled by section
    pub layers: Vec<Color>,
}

impl Default for Theme {
    fn default() -> Self {
        // Ember: warm glow on near-black
        Self {
            bg0: Color::Rgb(0x0c, 0x0a, 0x09),
            bg1: Color::Rgb(0x17, 0x13, 0x11),
            bg2: Color::Rgb(0x26, 0x1f, 0x1b),
            fg0: Color::Rgb(0xf5, 0xed, 0xe4),
            fg1: Color::Rgb(0xd6, 0xc8, 0xb8),
            grey0: Color::Rgb(0x6b, 0x5f, 0x57),
            grey1: Color::Rgb(0x9a, 0x8c, 0x80),
            accent: Color::Rgb(0xff, 0x8a, 0x3d),
            highlight: Color::Rgb(0xff, 0xc2, 0x7a),
            progress: Color::Rgb(0xe8, 0x5d, 0x2a),
            muted: Color::Rgb(0x4a, 0x3f, 0x39),
            layers: vec![
                Color::Rgb(0x3a, 0x14, 0x0c),
                Color::Rgb(0x44, 0x1c, 0x0a),
                Color::Rgb(0x4d, 0x26, 0x0b),
                Color::Rgb(0x3f, 0x10, 0x16),
                Color::Rgb(0x52, 0x2e, 0x0e),
                Color::Rgb(0x36, 0x17, 0x1f),
                Color::Rgb(0x47, 0x21, 0x12),
                Color::Rgb(0x2f, 0x16, 0x0d),
                Color::Rgb(0x55, 0x1f, 0x0f),
                Color::Rgb(0x3b, 0x1f, 0x17),
            ],
        }
    }
}

impl Theme {
    /// Tint of the background layer for a section
    pub fn layer(&self, section: usize) -> Color {
        if self.layers.is_empty() {
            return self.bg1;
        }
        self.layers[section % self.layers.len()]
    }

    /// Blend `color` over the base background at the given opacity
    pub fn fade(&self, color: Color, opacity: f32) -> Color {
        blend(self.bg0, color, opacity)
    }
}

/// Linear blend between two RGB colors; non-RGB colors snap at half opacity
pub fn blend(base: Color, over: Color, opacity: f32) -> Color {
    let t = opacity.clamp(0.0, 1.0);
    match (base, over) {
        (Color::Rgb(r0, g0, b0), Color::Rgb(r1, g1, b1)) => {
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            Color::Rgb(mix(r0, r1), mix(g0, g1), mix(b0, b1))
        }
        _ if t >= 0.5 => over,
        _ => base,
    }
}
