//! Key event handling

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::AppController;

impl AppController {
    /// Map a key press to a user intent. Each intent puts its own failures on screen.
    pub async fn handle_key_event(&self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.model.lock().await.set_should_quit(true).await;
            return;
        }

        {
            let model = self.model.lock().await;
            let phase = model.phase().await;
            tracing::trace!(key = ?key.code, ?phase, "Key pressed");

            // Error popup blocks everything but dismissal and quitting
            if model.has_error().await {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter => model.clear_error().await,
                    KeyCode::Char('q') | KeyCode::Char('Q') => model.set_should_quit(true).await,
                    _ => {}
                }
                return;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') => {
                    model.set_should_quit(true).await;
                    return;
                }
                KeyCode::Char('v') | KeyCode::Char('V') => {
                    let mode = model.toggle_view_mode().await;
                    tracing::debug!(?mode, "Switched view");
                    return;
                }
                _ => {}
            }
        }

        let _ = match key.code {
            KeyCode::Char(' ') => self.user_toggle().await,
            KeyCode::Enter => self.user_play().await,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Right => self.user_next().await,
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Left => self.user_prev().await,
            _ => Ok(()),
        };
    }
}
