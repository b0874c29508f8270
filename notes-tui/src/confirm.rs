//! Confirmation dialog drawn over the terminal.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use async_trait::async_trait;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{backend::Backend, Terminal};

use notes_core::Confirm;

use crate::ui;

/// Asks with a centered dialog and waits for `y`/`n`.
///
/// Shares the terminal with the main loop, which only borrows it while drawing.
pub struct DialogConfirm<B: Backend> {
    terminal: Rc<RefCell<Terminal<B>>>,
}

impl<B: Backend> DialogConfirm<B> {
    pub fn new(terminal: Rc<RefCell<Terminal<B>>>) -> Self {
        Self { terminal }
    }

    async fn ask(&self, title: &str, message: &str) -> io::Result<bool> {
        self.terminal
            .borrow_mut()
            .draw(|frame| ui::render_confirm(frame, title, message))?;

        loop {
            let event = tokio::task::spawn_blocking(event::read)
                .await
                .map_err(io::Error::other)??;

            let Event::Key(key) = event else { continue };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => return Ok(true),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => return Ok(false),
                _ => {}
            }
        }
    }
}

#[async_trait(?Send)]
impl<B: Backend> Confirm for DialogConfirm<B> {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        match self.ask(title, message).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(error = %e, "confirmation dialog failed");
                false
            }
        }
    }
}
