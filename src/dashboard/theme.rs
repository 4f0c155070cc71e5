use crate::framebuffer::color::Color;

/// Colors the renderer uses that do not come from the elements themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    /// Frame clear and element backgrounds
    pub background: Color,
    /// Graph guide lines
    pub grid: Color,
    /// Value indicator up to the warning threshold
    pub normal: Color,
    pub warning: Color,
    pub danger: Color,
}

impl Theme {
    /// Black background, gray grid and a green/yellow/red indicator.
    pub const fn classic() -> Self {
        Self {
            background: Color::from_hex(0x000000),
            grid: Color::from_hex(0x808080),
            normal: Color::from_hex(0x00FF00),
            warning: Color::from_hex(0xFFFF00),
            danger: Color::from_hex(0xFF0000),
        }
    }

    /// Dark gray panels for displays with poor black levels.
    pub const fn night() -> Self {
        Self {
            background: Color::from_hex(0x121212),
            grid: Color::from_hex(0x3A3A3A),
            normal: Color::from_hex(0x4CAF50),
            warning: Color::from_hex(0xFF9800),
            danger: Color::from_hex(0xF44336),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
