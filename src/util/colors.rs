use ratatui::style::Color;

pub const PRIMARY: Color = Color::from_u32(0x001db954);
pub const SECONDARY: Color = Color::from_u32(0x00117a37);
pub const NEUTRAL: Color = Color::from_u32(0x00404040);
pub const TEXT: Color = Color::from_u32(0x00b3b3b3);
pub const BACKGROUND: Color = Color::from_u32(0x00121212);
pub const SURFACE: Color = Color::from_u32(0x00000000);
pub const ACCENT: Color = Color::from_u32(0x00ffffff);

/// Blends `from` toward `to` by `percent` (0 keeps `from`, 100 yields `to`).
/// Terminals have no alpha channel, so opacity is rendered as a colour mix.
pub fn fade(from: Color, to: Color, percent: u8) -> Color {
    let (Some(from), Some(to)) = (rgb(from), rgb(to)) else {
        return if percent >= 50 { to } else { from };
    };

    let t = u16::from(percent.min(100));
    let mix = |a: u8, b: u8| ((u16::from(a) * (100 - t) + u16::from(b) * t) / 100) as u8;
    Color::Rgb(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

fn rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}
