//! Flat status panel rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
    Frame,
};

use super::state::ViewState;
use super::utils::{centered_rect, controls_line, truncate_string, ACCENT, KEY_HINTS};

const PANEL_WIDTH: u16 = 64;
const PANEL_HEIGHT: u16 = 14;

pub fn render_panel(frame: &mut Frame, area: Rect, view: &ViewState) {
    let panel = centered_rect(area, PANEL_WIDTH, PANEL_HEIGHT);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Disk Player ")
        .title_bottom(Line::from(format!(" {} ", KEY_HINTS)).centered())
        .padding(Padding::horizontal(2))
        .border_style(Style::default().fg(if view.controls_enabled { ACCENT } else { Color::DarkGray }));
    let inner = block.inner(panel);
    frame.render_widget(block, panel);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Status
            Constraint::Length(2), // Track position
            Constraint::Length(2), // Controls
            Constraint::Min(0),    // Album art
        ])
        .split(inner);

    let status = Paragraph::new(view.status.as_str())
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[0]);

    let position = Paragraph::new(Line::from(vec![
        Span::raw("Track "),
        Span::styled(view.position.as_str(), Style::default().add_modifier(Modifier::BOLD)),
    ]));
    frame.render_widget(position, chunks[1]);

    frame.render_widget(
        Paragraph::new(controls_line(view)).alignment(Alignment::Center),
        chunks[2],
    );

    render_album_art(frame, chunks[3], view);
}

/// Nothing is drawn while the art is hidden.
fn render_album_art(frame: &mut Frame, area: Rect, view: &ViewState) {
    let Some(art) = &view.art else {
        return;
    };

    let width = area.width.saturating_sub(6) as usize;
    let mut lines = vec![Line::from(vec![
        Span::styled("Album art ", Style::default().fg(Color::DarkGray)),
        Span::styled(truncate_string(&art.image_url, width), Style::default().fg(Color::Cyan)),
    ])];
    if !view.track_info.is_empty() {
        lines.push(Line::from(Span::styled(
            truncate_string(&view.track_info, area.width as usize),
            Style::default().fg(Color::White).add_modifier(Modifier::ITALIC),
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    use crate::model::{PlaybackSession, TrackRef, UiState};
    use crate::player::{AlbumArt, DeviceId};

    fn buffer_text(buffer: &Buffer) -> String {
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn draw(view: &ViewState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| render_panel(f, f.area(), view))
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn shows_position_status_and_art() {
        let mut session = PlaybackSession::new(vec![
            TrackRef::new("trackA", None),
            TrackRef::new("trackB", None),
        ]);
        session.set_device(DeviceId::new("dev"));
        session.next_track();
        let ui = UiState {
            status: "Playing track 2 of 2".to_string(),
            album_art: Some(AlbumArt {
                image_url: "https://img/b".to_string(),
                track_info: Some("Song — Band".to_string()),
            }),
            ..UiState::default()
        };

        let text = draw(&ViewState::project(&session, &ui));
        assert!(text.contains("Track 2 / 2"));
        assert!(text.contains("Playing track 2 of 2"));
        assert!(text.contains("https://img/b"));
        assert!(text.contains("Song — Band"));
    }

    #[test]
    fn hidden_art_draws_nothing() {
        let session = PlaybackSession::new(vec![TrackRef::new("trackA", None)]);
        let text = draw(&ViewState::project(&session, &UiState::default()));
        assert!(text.contains("Waiting for device..."));
        assert!(!text.contains("Album art"));
    }
}
