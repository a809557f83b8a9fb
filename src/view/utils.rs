//! Shared helpers for both player views

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

use super::state::ViewState;

pub const ACCENT: Color = Color::Rgb(0x1d, 0xb9, 0x54);

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Fixed-size rectangle centered in `area`, clamped to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// `◀  ▶/❚❚  ▶` with key hints, dimmed until a device is ready.
pub fn controls_line(view: &ViewState) -> Line<'static> {
    let (side, main) = if view.controls_enabled {
        (
            Style::default().fg(Color::White),
            Style::default().fg(Color::Black).bg(ACCENT).add_modifier(Modifier::BOLD),
        )
    } else {
        let dim = Style::default().fg(Color::DarkGray);
        (dim, dim)
    };

    Line::from(vec![
        Span::styled(" ◀ ", side),
        Span::raw("   "),
        Span::styled(format!(" {} ", view.glyph), main),
        Span::raw("   "),
        Span::styled(" ▶ ", side),
    ])
}

pub const KEY_HINTS: &str = "Space play/pause · Enter play · n/p next/prev · v view · q quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncates_long_strings() {
        assert_eq!(truncate_string("https://i.scdn.co/image/abcdef", 12), "https://i...");
        assert_eq!(truncate_string("short", 12), "short");
    }

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect(area, 10, 4), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect(area, 40, 40), area);
    }
}
