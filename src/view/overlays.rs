//! Overlay rendering (error notification)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn render_error_notification(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let popup_width = 52.min(area.width.saturating_sub(4));
    let inner_width = popup_width.saturating_sub(4).max(1) as usize;

    // Wrapped line count plus the two border rows
    let line_count = message.chars().count().div_ceil(inner_width).max(1) as u16;
    let popup_height = (2 + line_count).min(area.height.saturating_sub(4).max(3));

    let popup_area = Rect {
        x: area.width.saturating_sub(popup_width) / 2,
        y: area.height.saturating_sub(popup_height) / 2,
        width: popup_width,
        height: popup_height,
    };

    frame.render_widget(Clear, popup_area);

    let error_widget = Paragraph::new(message.to_string())
        .style(Style::default().fg(Color::Red))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error (Esc to dismiss) ")
                .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(error_widget, popup_area);
}
