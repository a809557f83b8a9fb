//! Animated album disk rendering
//!
//! A turntable drawn on a braille canvas: star field, deck plate, platter,
//! the album disk with rotating spokes, spindle and tone arm. A card on the
//! right carries the controls and track position.

use std::f64::consts::{FRAC_PI_4, PI};

use rand::{rngs::StdRng, Rng, SeedableRng};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Circle, Context, Line as CanvasLine, Points, Rectangle},
        Block, Borders, Clear, Padding, Paragraph, Wrap,
    },
    Frame,
};

use super::state::ViewState;
use super::utils::{centered_rect, controls_line, truncate_string, ACCENT, KEY_HINTS};

const HALF_HEIGHT: f64 = 3.0;
const STAR_COUNT: usize = 120;
const STAR_SEED: u64 = 0x5eed_d15c;

const DISK_RADIUS: f64 = 1.7;
const PLATTER_RADIUS: f64 = 2.0;
const SPINDLE_RADIUS: f64 = 0.2;
const SPOKES: usize = 4;

const DECK: Color = Color::Rgb(0x8b, 0x45, 0x13);
const PLATTER: Color = Color::Rgb(0x30, 0x30, 0x30);

/// Fixed star positions, identical every frame.
fn star_field(half_width: f64) -> Vec<(f64, f64)> {
    let mut rng = StdRng::seed_from_u64(STAR_SEED);
    (0..STAR_COUNT)
        .map(|_| {
            (
                rng.gen_range(-half_width..half_width),
                rng.gen_range(-HALF_HEIGHT..HALF_HEIGHT),
            )
        })
        .collect()
}

/// Canvas half-width that keeps braille dots square in `area`.
fn half_width_for(area: Rect) -> f64 {
    if area.height == 0 {
        return HALF_HEIGHT;
    }
    HALF_HEIGHT * (area.width as f64 * 2.0) / (area.height as f64 * 4.0)
}

/// Endpoints of the spokes drawn on the disk at `angle`.
fn spoke_segments(angle: f64) -> Vec<((f64, f64), (f64, f64))> {
    (0..SPOKES)
        .map(|i| {
            let theta = angle + i as f64 * PI / SPOKES as f64;
            let (sin, cos) = theta.sin_cos();
            let inner = SPINDLE_RADIUS + 0.1;
            (
                (cos * DISK_RADIUS, sin * DISK_RADIUS),
                (-cos * inner, -sin * inner),
            )
        })
        .collect()
}

pub fn render_disk(frame: &mut Frame, area: Rect, view: &ViewState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    render_turntable(frame, chunks[0], view);
    render_control_card(frame, chunks[1], view);
}

fn render_turntable(frame: &mut Frame, area: Rect, view: &ViewState) {
    let half_width = half_width_for(area);
    let stars = star_field(half_width);
    let art = view.disk_art_url().map(str::to_string);
    let angle = view.disk_angle;

    let canvas = Canvas::default()
        .background_color(Color::Black)
        .marker(Marker::Braille)
        .x_bounds([-half_width, half_width])
        .y_bounds([-HALF_HEIGHT, HALF_HEIGHT])
        .paint(move |ctx| {
            ctx.draw(&Points {
                coords: &stars,
                color: Color::Gray,
            });
            ctx.layer();

            paint_deck(ctx);
            ctx.layer();

            // The disk only exists while there is art to press onto it
            if art.is_some() {
                paint_album_disk(ctx, angle);
                ctx.layer();
            }

            ctx.draw(&Circle {
                x: 0.0,
                y: 0.0,
                radius: SPINDLE_RADIUS,
                color: Color::White,
            });
            paint_tone_arm(ctx);

            if let Some(url) = &art {
                ctx.print(
                    -half_width + 0.2,
                    -HALF_HEIGHT + 0.2,
                    Line::styled(truncate_string(url, 48), Style::default().fg(Color::DarkGray)),
                );
            }
        });

    frame.render_widget(canvas, area);
}

fn paint_deck(ctx: &mut Context) {
    ctx.draw(&Rectangle {
        x: -2.0,
        y: -2.6,
        width: 4.0,
        height: 4.0,
        color: DECK,
    });
    ctx.draw(&Circle {
        x: 0.0,
        y: 0.0,
        radius: PLATTER_RADIUS,
        color: PLATTER,
    });
}

fn paint_album_disk(ctx: &mut Context, angle: f64) {
    for radius in [DISK_RADIUS, DISK_RADIUS * 0.8, DISK_RADIUS * 0.6] {
        ctx.draw(&Circle {
            x: 0.0,
            y: 0.0,
            radius,
            color: ACCENT,
        });
    }
    for ((x1, y1), (x2, y2)) in spoke_segments(angle) {
        ctx.draw(&CanvasLine {
            x1,
            y1,
            x2,
            y2,
            color: Color::LightGreen,
        });
    }
}

fn paint_tone_arm(ctx: &mut Context) {
    let (sin, cos) = FRAC_PI_4.sin_cos();
    let (cx, cy, half) = (1.0, -1.2, 1.0);
    ctx.draw(&CanvasLine {
        x1: cx - cos * half,
        y1: cy + sin * half,
        x2: cx + cos * half,
        y2: cy - sin * half,
        color: Color::Gray,
    });
}

fn render_control_card(frame: &mut Frame, area: Rect, view: &ViewState) {
    let card = centered_rect(area, area.width.saturating_sub(2).min(40), 12);
    frame.render_widget(Clear, card);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Disk Player ")
        .title_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .padding(Padding::uniform(1))
        .border_style(Style::default().fg(if view.controls_enabled { ACCENT } else { Color::DarkGray }))
        .style(Style::default().bg(Color::Rgb(30, 30, 30)));

    let mut lines = vec![
        controls_line(view),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Track "),
            Span::styled(view.position.as_str(), Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::raw(""),
        Line::styled(view.status.as_str(), Style::default().fg(Color::Gray)),
    ];
    if !view.track_info.is_empty() {
        lines.push(Line::styled(
            view.track_info.as_str(),
            Style::default().fg(Color::White).add_modifier(Modifier::ITALIC),
        ));
    }

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, card);

    let hints = Rect {
        y: area.bottom().saturating_sub(1),
        height: 1,
        ..area
    };
    frame.render_widget(
        Paragraph::new(KEY_HINTS)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        hints,
    );
}
