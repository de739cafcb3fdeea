//! Terminal rendering: one `draw` call paints the whole frame.
//!
//! Every visual choice here is derived from the preference record: the
//! palette, the background fill, the player pane height and the animation
//! clock. Changing a preference shows up on the next draw.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph, Wrap},
};
use std::time::Duration;

use crate::app::{AccountField, App, NoticeLevel, Panel, StyleRow};
use crate::config::ControlsSettings;
use crate::player::{PlaybackState, progress_fraction};
use crate::prefs::{
    Background, Palette, Preferences, animation_frame, dots_row, fills_rows, palette,
    player_pane_height, spacing,
};

/// Screen regions the runtime needs for mouse hit-testing. Zero-sized when
/// the current layout leaves no room for that control.
#[derive(Debug, Default, Clone, Copy)]
pub struct UiAreas {
    pub progress_bar: Rect,
    pub volume_bar: Rect,
}

const ANIMATION_FRAMES: [&str; 4] = ["▁ ▃ ▅ ▃", "▃ ▅ ▃ ▁", "▅ ▃ ▁ ▃", "▃ ▁ ▃ ▅"];

/// Render a duration as zero-padded `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Render the controls help text for the active panel. The signed-out
/// account form types into its fields, so it gets its own line.
fn controls_text(panel: Panel, signed_in: bool, scrub_seconds: u64) -> String {
    match panel {
        Panel::Library => format!(
            "[j/k] up/down | [enter] play | [space] pause | [h/l] prev/next | \
             [H/L] scrub -/+{}s | [J/K] move | [x] remove | [c] clear | [/] filter | \
             [-/+] volume | [m] mute | [tab] panel | [q] quit",
            scrub_seconds
        ),
        Panel::Style => {
            "[j/k] row | [h/l] adjust | [enter] apply | [tab] panel | [q] quit".to_string()
        }
        Panel::Account if signed_in => "[enter] sign out | [tab] panel | [q] quit".to_string(),
        Panel::Account => {
            "[up/down] field | [left/right] mode | [enter] submit | [tab] panel".to_string()
        }
    }
}

/// One horizontal bar: a filled run in the bar color, the rest in the
/// track color.
fn bar_line(fraction: f32, width: u16, pal: &Palette) -> Line<'static> {
    let width = width as usize;
    if width == 0 {
        return Line::raw("");
    }
    let filled = ((fraction.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    Line::from(vec![
        Span::styled("━".repeat(filled), Style::default().fg(pal.bar)),
        Span::styled("─".repeat(width - filled), Style::default().fg(pal.bar_track)),
    ])
}

/// Paint the background mode under everything else. Widgets drawn on top
/// only set foregrounds, so the fill shows through.
fn fill_background(frame: &mut Frame, prefs: &Preferences, pal: &Palette) {
    let area = frame.area();
    if fills_rows(prefs.background) {
        let mut lines: Vec<Line> = Vec::with_capacity(area.height as usize);
        for row in 0..area.height {
            let line = match prefs.background {
                Background::Gradient => Line::styled(
                    " ".repeat(area.width as usize),
                    Style::default().bg(pal.gradient_row(row, area.height)),
                ),
                Background::Dots => Line::styled(
                    dots_row(area.width, row),
                    Style::default().fg(pal.dim).bg(pal.solid_bg),
                ),
                Background::Solid => Line::raw(""),
            };
            lines.push(line);
        }
        frame.render_widget(Paragraph::new(lines), area);
    } else if pal.solid_bg != Color::Reset {
        frame.render_widget(
            Block::default().style(Style::default().bg(pal.solid_bg)),
            area,
        );
    }
}

fn panel_block(title: &str, pal: &Palette, pad: u16) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {title} "))
        .border_style(Style::default().fg(pal.dim))
        .padding(Padding {
            left: 1,
            right: 1,
            top: pad,
            bottom: 0,
        })
}

/// Render the entire UI into the provided `frame` using `app` state and
/// settings. Returns the regions mouse events get mapped against.
pub fn draw(frame: &mut Frame, app: &App, controls_settings: &ControlsSettings) -> UiAreas {
    let pal = palette(app.prefs.theme);
    let pad = spacing(app.prefs.font_size);

    fill_background(frame, &app.prefs, &pal);

    let player_height = player_pane_height(app.prefs.player_size, pad);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(player_height),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(frame.area());

    draw_header(frame, app, &pal, chunks[0]);
    let areas = draw_player(frame, app, &pal, chunks[1]);
    match app.panel {
        Panel::Library => draw_library(frame, app, &pal, pad, chunks[2]),
        Panel::Style => draw_style(frame, app, &pal, pad, chunks[2]),
        Panel::Account => draw_account(frame, app, &pal, pad, chunks[2]),
    }
    draw_status(frame, app, &pal, chunks[3]);

    let help = controls_text(app.panel, app.signed_in(), controls_settings.scrub_seconds);
    let footer = Paragraph::new(help)
        .style(Style::default().fg(pal.dim))
        .block(panel_block("controls", &pal, 0))
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[4]);

    areas
}

fn draw_header(frame: &mut Frame, app: &App, pal: &Palette, area: Rect) {
    let mut spans: Vec<Span> = Vec::new();
    for (i, p) in [Panel::Library, Panel::Style, Panel::Account]
        .into_iter()
        .enumerate()
    {
        if i > 0 {
            spans.push(Span::styled("  |  ", Style::default().fg(pal.dim)));
        }
        let style = if app.panel == p {
            Style::default().fg(pal.highlight_fg).bg(pal.accent)
        } else {
            Style::default().fg(pal.dim)
        };
        spans.push(Span::styled(format!(" {} ", p.label()), style));
    }

    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" vivace ")
                .title_alignment(Alignment::Center)
                .border_style(Style::default().fg(pal.dim)),
        );
    frame.render_widget(header, area);
}

fn draw_player(frame: &mut Frame, app: &App, pal: &Palette, area: Rect) -> UiAreas {
    let mut areas = UiAreas::default();

    let block = panel_block("player", pal, 0);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return areas;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(inner);

    // Engine-side clock; the rest of playback state lives in the model.
    let mut elapsed = Duration::ZERO;
    if let Some(ref h) = app.playback_handle {
        if let Ok(info) = h.lock() {
            elapsed = info.elapsed;
        }
    }

    let state = match app.player.playback {
        PlaybackState::Playing => "Playing",
        PlaybackState::Paused => "Paused",
        PlaybackState::Stopped => "Stopped",
    };
    let current = app.player.current.and_then(|i| app.playlist.get(i));
    let title = match current {
        Some(t) => t.display.clone(),
        None => "nothing playing".to_string(),
    };
    let total = app.player.track_duration.or(current.and_then(|t| t.duration));

    let now_playing = Line::from(vec![
        Span::styled(
            format!(" {state} "),
            Style::default().fg(pal.highlight_fg).bg(pal.accent),
        ),
        Span::raw("  "),
        Span::styled(title, Style::default().fg(pal.text)),
    ]);
    frame.render_widget(Paragraph::new(now_playing), rows[0]);

    // Progress bar with the time readout on the right.
    let progress_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(14)])
        .split(rows[1]);
    areas.progress_bar = progress_cols[0];
    let fraction = progress_fraction(elapsed, total);
    frame.render_widget(
        Paragraph::new(bar_line(fraction, progress_cols[0].width, pal)),
        progress_cols[0],
    );
    let time_text = match total {
        Some(t) => format!("{} / {}", format_mmss(elapsed), format_mmss(t)),
        None => format!("{} / --:--", format_mmss(elapsed)),
    };
    frame.render_widget(
        Paragraph::new(time_text)
            .alignment(Alignment::Right)
            .style(Style::default().fg(pal.text)),
        progress_cols[1],
    );

    // Volume bar, same shape.
    let volume_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(14)])
        .split(rows[2]);
    areas.volume_bar = volume_cols[0];
    frame.render_widget(
        Paragraph::new(bar_line(
            app.player.effective_volume(),
            volume_cols[0].width,
            pal,
        )),
        volume_cols[0],
    );
    let volume_text = if app.player.muted {
        "muted".to_string()
    } else {
        format!("vol {:3.0}%", app.player.volume * 100.0)
    };
    frame.render_widget(
        Paragraph::new(volume_text)
            .alignment(Alignment::Right)
            .style(Style::default().fg(pal.text)),
        volume_cols[1],
    );

    // Spare rows in the expanded layout get the animation.
    if rows[3].height > 0 && app.player.playback == PlaybackState::Playing {
        let idx = animation_frame(
            app.animation_elapsed_ms(),
            app.prefs.animation_speed,
            ANIMATION_FRAMES.len(),
        );
        frame.render_widget(
            Paragraph::new(ANIMATION_FRAMES[idx])
                .alignment(Alignment::Center)
                .style(Style::default().fg(pal.accent)),
            rows[3],
        );
    }

    areas
}

fn draw_library(frame: &mut Frame, app: &App, pal: &Palette, pad: u16, area: Rect) {
    let block = panel_block(&format!("tracks ({})", app.playlist.len()), pal, pad);

    if !app.has_tracks() {
        let hint = Paragraph::new("playlist is empty; pass a directory or files on the command line")
            .style(Style::default().fg(pal.dim))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, area);
        return;
    }

    let display = app.visible_indices();
    if display.is_empty() {
        let hint = Paragraph::new("no tracks match the filter")
            .style(Style::default().fg(pal.dim))
            .block(block);
        frame.render_widget(hint, area);
        return;
    }

    // Only a window of the list fits on screen; keep the selection near
    // the middle of it when the list is long enough to scroll.
    // Only build ListItems for the visible window.
    let total = display.len();
    let list_height = block.inner(area).height as usize;
    let sel_pos = display.iter().position(|&i| i == app.selected).unwrap_or(0);
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = if sel_pos > half { sel_pos - half } else { 0 };
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let visible_items: Vec<ListItem> = display[start..end]
        .iter()
        .map(|&i| {
            let track = &app.playlist.tracks()[i];
            let mut spans: Vec<Span> = Vec::new();
            if app.player.current == Some(i) {
                spans.push(Span::styled("▶ ", Style::default().fg(pal.accent)));
            } else {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(
                track.display.clone(),
                Style::default().fg(pal.text),
            ));
            if let Some(d) = track.duration {
                spans.push(Span::styled(
                    format!("  {}", format_mmss(d)),
                    Style::default().fg(pal.dim),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(visible_items)
        .block(block)
        .highlight_style(Style::default().fg(pal.highlight_fg).bg(pal.accent))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    state.select(Some(selected_pos_in_visible));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_style(frame: &mut Frame, app: &App, pal: &Palette, pad: u16, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for row in StyleRow::ALL {
        let selected = app.style_row == row;
        let value = match row {
            StyleRow::Theme => app.prefs.theme.label().to_string(),
            StyleRow::Size => app.prefs.player_size.label().to_string(),
            StyleRow::Background => app.prefs.background.label().to_string(),
            StyleRow::FontSize => app.prefs.font_size.to_string(),
            StyleRow::Speed => format!("{:.2}x", app.prefs.animation_speed),
            StyleRow::Save => {
                if app.prefs_dirty() {
                    "unsaved changes".to_string()
                } else {
                    "saved".to_string()
                }
            }
            StyleRow::Reset => String::new(),
        };

        let value_row = !matches!(row, StyleRow::Save | StyleRow::Reset);
        let text = if selected && value_row {
            format!(" {:<16} ◂ {value} ▸", row.label())
        } else {
            format!(" {:<16}   {value}", row.label())
        };
        let style = if selected {
            Style::default().fg(pal.highlight_fg).bg(pal.accent)
        } else {
            Style::default().fg(pal.text)
        };
        lines.push(Line::styled(text, style));
        for _ in 0..pad {
            lines.push(Line::raw(""));
        }
    }

    let panel = Paragraph::new(lines).block(panel_block("style", pal, pad));
    frame.render_widget(panel, area);
}

fn draw_account(frame: &mut Frame, app: &App, pal: &Palette, pad: u16, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(user) = &app.user {
        lines.push(Line::styled(
            format!(" signed in as {}", user.email),
            Style::default().fg(pal.text),
        ));
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            " preferences and playlist sync to this account",
            Style::default().fg(pal.dim),
        ));
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            " [enter] sign out",
            Style::default().fg(pal.dim),
        ));
    } else {
        let form = &app.account;
        let focus_style = Style::default().fg(pal.highlight_fg).bg(pal.accent);
        let field_style = Style::default().fg(pal.text);

        let email_style = if form.focus == AccountField::Email {
            focus_style
        } else {
            field_style
        };
        lines.push(Line::styled(
            format!(" email     {}", form.email),
            email_style,
        ));
        for _ in 0..pad {
            lines.push(Line::raw(""));
        }

        let password_style = if form.focus == AccountField::Password {
            focus_style
        } else {
            field_style
        };
        let masked = "*".repeat(form.password.chars().count());
        lines.push(Line::styled(
            format!(" password  {masked}"),
            password_style,
        ));
        for _ in 0..pad {
            lines.push(Line::raw(""));
        }

        let action_style = if form.focus == AccountField::Action {
            focus_style
        } else {
            field_style
        };
        lines.push(Line::styled(
            format!(" [ {} ]", form.mode.label()),
            action_style,
        ));
        if form.busy {
            lines.push(Line::raw(""));
            lines.push(Line::styled(
                " contacting server...",
                Style::default().fg(pal.dim),
            ));
        }
    }

    let panel = Paragraph::new(lines).block(panel_block("account", pal, pad));
    frame.render_widget(panel, area);
}

fn draw_status(frame: &mut Frame, app: &App, pal: &Palette, area: Rect) {
    let (text, style) = match app.current_notice() {
        Some(n) => {
            let fg = match n.level {
                NoticeLevel::Info => pal.accent,
                NoticeLevel::Error => Color::LightRed,
            };
            (n.text.clone(), Style::default().fg(fg))
        }
        None => {
            let mut parts: Vec<String> = Vec::new();

            let q = app.filter_query.trim();
            if app.filter_mode || !q.is_empty() {
                let mut filter_part = String::from("FILTER:");
                if !q.is_empty() {
                    filter_part.push(' ');
                    filter_part.push_str(q);
                }
                if app.filter_mode {
                    filter_part.push('_');
                }
                parts.push(filter_part);
            }

            match &app.user {
                Some(u) => parts.push(format!("ACCOUNT: {}", u.email)),
                None => parts.push("ACCOUNT: signed out".to_string()),
            }

            if app.prefs_dirty() {
                parts.push("STYLE: unsaved".to_string());
            }

            (parts.join(" • "), Style::default().fg(pal.text))
        }
    };

    let status = Paragraph::new(text)
        .style(style)
        .block(panel_block("status", pal, 0))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}
