//! Derived visual values: the color palette, layout proportions and the
//! now-playing animation clock. Everything here is a pure function of the
//! preference record so a change is visible on the next draw.

use ratatui::style::Color;

use super::model::{Background, PlayerSize, Theme};

/// Colors the UI draws with, derived from the active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: Color,
    pub dim: Color,
    pub accent: Color,
    /// Foreground used on top of accent-colored highlights.
    pub highlight_fg: Color,
    /// Fill for the solid background mode.
    pub solid_bg: Color,
    pub grad_top: (u8, u8, u8),
    pub grad_bottom: (u8, u8, u8),
    pub bar: Color,
    pub bar_track: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Default => Palette {
            text: Color::Gray,
            dim: Color::DarkGray,
            accent: Color::Cyan,
            highlight_fg: Color::Black,
            solid_bg: Color::Reset,
            grad_top: (30, 30, 46),
            grad_bottom: (17, 17, 27),
            bar: Color::Cyan,
            bar_track: Color::DarkGray,
        },
        Theme::Dark => Palette {
            text: Color::Rgb(205, 214, 244),
            dim: Color::Rgb(88, 91, 112),
            accent: Color::Rgb(137, 180, 250),
            highlight_fg: Color::Rgb(17, 17, 27),
            solid_bg: Color::Rgb(17, 17, 27),
            grad_top: (24, 24, 37),
            grad_bottom: (9, 9, 16),
            bar: Color::Rgb(137, 180, 250),
            bar_track: Color::Rgb(49, 50, 68),
        },
        Theme::Light => Palette {
            text: Color::Rgb(60, 56, 70),
            dim: Color::Rgb(140, 138, 158),
            accent: Color::Rgb(30, 102, 245),
            highlight_fg: Color::Rgb(239, 241, 245),
            solid_bg: Color::Rgb(239, 241, 245),
            grad_top: (230, 233, 239),
            grad_bottom: (204, 208, 218),
            bar: Color::Rgb(30, 102, 245),
            bar_track: Color::Rgb(188, 192, 204),
        },
        Theme::Ocean => Palette {
            text: Color::Rgb(192, 222, 234),
            dim: Color::Rgb(84, 110, 122),
            accent: Color::Rgb(0, 188, 212),
            highlight_fg: Color::Rgb(10, 25, 41),
            solid_bg: Color::Rgb(10, 25, 41),
            grad_top: (13, 42, 73),
            grad_bottom: (4, 16, 28),
            bar: Color::Rgb(0, 188, 212),
            bar_track: Color::Rgb(34, 54, 74),
        },
        Theme::Sunset => Palette {
            text: Color::Rgb(255, 224, 202),
            dim: Color::Rgb(146, 93, 81),
            accent: Color::Rgb(255, 121, 63),
            highlight_fg: Color::Rgb(43, 19, 32),
            solid_bg: Color::Rgb(43, 19, 32),
            grad_top: (84, 24, 48),
            grad_bottom: (26, 10, 20),
            bar: Color::Rgb(255, 121, 63),
            bar_track: Color::Rgb(74, 35, 49),
        },
    }
}

impl Palette {
    /// Background color for one row of a gradient fill, top to bottom.
    pub fn gradient_row(&self, row: u16, height: u16) -> Color {
        let t = if height <= 1 {
            0.0
        } else {
            row as f32 / (height - 1) as f32
        };
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::Rgb(
            lerp(self.grad_top.0, self.grad_bottom.0),
            lerp(self.grad_top.1, self.grad_bottom.1),
            lerp(self.grad_top.2, self.grad_bottom.2),
        )
    }
}

/// One line of the dotted background pattern.
pub fn dots_row(width: u16, row: u16) -> String {
    (0..width)
        .map(|col| {
            if (col + row * 2) % 4 == 0 {
                '\u{00b7}'
            } else {
                ' '
            }
        })
        .collect()
}

/// Extra blank rows around text blocks. The terminal analog of font size:
/// bigger preference, roomier layout.
pub fn spacing(font_size: u8) -> u16 {
    match font_size {
        0..=13 => 0,
        14..=17 => 1,
        _ => 2,
    }
}

/// Rows the player pane occupies for a given size preference.
pub fn player_pane_height(size: PlayerSize, spacing: u16) -> u16 {
    let base = match size {
        PlayerSize::Compact => 4,
        PlayerSize::Normal => 6,
        PlayerSize::Expanded => 9,
    };
    base + spacing
}

/// Whether the background mode needs a per-row fill pass.
pub fn fills_rows(background: Background) -> bool {
    !matches!(background, Background::Solid)
}

/// Frame index for the now-playing animation after `elapsed_ms`.
/// Frames advance every 250 ms at speed 1.0; the speed preference scales
/// that rate linearly.
pub fn animation_frame(elapsed_ms: u64, speed: f32, frame_count: usize) -> usize {
    if frame_count == 0 {
        return 0;
    }
    let ticks = (elapsed_ms as f32 * speed / 250.0) as u64;
    (ticks % frame_count as u64) as usize
}
