//! Notes screen state.
//!
//! Starts in the loading state, reaches the list once the first fetch
//! settles (successfully or not) and drives the editor modal and deletes from
//! there. Only this control flow mutates the note list.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use notes_core::{Confirm, DocumentStore, NewNote, Note, NoteChanges, NoteService};

/// A message shown in the status bar until the next key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

impl Alert {
    fn new(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.title == "Error"
    }
}

pub struct NotesScreen<S: DocumentStore, C: Confirm> {
    service: NoteService<S>,
    confirm: C,
    /// Owner stamped on new notes.
    user_id: String,
    /// Owner to restrict listings to, if any.
    owner_filter: Option<String>,

    pub notes: Vec<Note>,
    pub selected: usize,
    pub modal_visible: bool,
    /// Editor buffer.
    pub note_text: String,
    pub editing_note: Option<Note>,
    pub loading: bool,
    pub refreshing: bool,
    pub alert: Option<Alert>,
    pub should_quit: bool,
}

impl<S: DocumentStore, C: Confirm> NotesScreen<S, C> {
    pub fn new(
        service: NoteService<S>,
        confirm: C,
        user_id: impl Into<String>,
        owner_filter: Option<String>,
    ) -> Self {
        Self {
            service,
            confirm,
            user_id: user_id.into(),
            owner_filter,
            notes: Vec::new(),
            selected: 0,
            modal_visible: false,
            note_text: String::new(),
            editing_note: None,
            loading: true,
            refreshing: false,
            alert: None,
            should_quit: false,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editing_note.is_some()
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.notes.get(self.selected)
    }

    /// Initial load when the screen is first shown.
    pub async fn mount(&mut self) {
        self.load_notes().await;
    }

    /// Replace the list with a fresh fetch. On failure the previous list stays.
    pub async fn load_notes(&mut self) {
        self.loading = true;

        match self.service.get_notes(self.owner_filter.as_deref()).await {
            Ok(notes) => {
                tracing::debug!(count = notes.len(), "fetched notes");
                self.notes = notes;
                self.clamp_selection();
            }
            Err(e) => {
                tracing::error!(error = ?e, "error loading notes");
                self.alert = Some(Alert::new(
                    "Error",
                    "Failed to load notes. Make sure the backend permissions are set.",
                ));
            }
        }

        self.loading = false;
        self.refreshing = false;
    }

    pub async fn refresh(&mut self) {
        self.refreshing = true;
        self.load_notes().await;
    }

    /// Open the editor for a new note.
    pub fn open_create(&mut self) {
        self.editing_note = None;
        self.note_text.clear();
        self.modal_visible = true;
    }

    pub fn edit_note(&mut self, note: Note) {
        self.note_text = note.content.clone();
        self.editing_note = Some(note);
        self.modal_visible = true;
    }

    pub fn edit_selected(&mut self) {
        if let Some(note) = self.selected_note().cloned() {
            self.edit_note(note);
        }
    }

    pub fn close_modal(&mut self) {
        self.modal_visible = false;
        self.note_text.clear();
        self.editing_note = None;
    }

    /// Create or update from the editor buffer, then reload.
    ///
    /// A blank buffer is ignored and the modal stays open. On failure the
    /// modal also stays open with the buffer intact.
    pub async fn save_note(&mut self) {
        if self.note_text.trim().is_empty() {
            tracing::debug!("note text is empty, not saving");
            return;
        }

        let result = match &self.editing_note {
            Some(note) => self
                .service
                .update_note(&note.id, NoteChanges::from_content(self.note_text.clone()))
                .await
                .map(|_| "Note updated!"),
            None => self
                .service
                .create_note(NewNote::from_content(self.note_text.clone(), &self.user_id))
                .await
                .map(|_| "Note created!"),
        };

        match result {
            Ok(message) => {
                self.alert = Some(Alert::new("Success", message));
                self.close_modal();
                self.load_notes().await;
            }
            Err(e) => {
                tracing::error!(error = ?e, "error saving note");
                self.alert = Some(Alert::new("Error", format!("Failed to save note: {e}")));
            }
        }
    }

    /// Delete after confirmation, dropping the note locally on success.
    pub async fn delete_note(&mut self, id: &str) {
        if !self.confirm.confirm("Delete Note", "Are you sure?").await {
            tracing::debug!(id, "delete cancelled");
            return;
        }

        match self.service.delete_note(id).await {
            Ok(()) => {
                self.notes.retain(|n| n.id != id);
                self.clamp_selection();
                self.alert = Some(Alert::new("Success", "Note deleted!"));
            }
            Err(e) => {
                tracing::error!(error = ?e, id, "error deleting note");
                self.alert = Some(Alert::new("Error", format!("Failed to delete note: {e}")));
            }
        }
    }

    pub async fn delete_selected(&mut self) {
        if let Some(id) = self.selected_note().map(|n| n.id.clone()) {
            self.delete_note(&id).await;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.notes.len() {
            self.selected += 1;
        }
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.notes.len().saturating_sub(1));
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub async fn handle_key(&mut self, key: KeyEvent) {
        self.alert = None;

        if self.modal_visible {
            self.handle_editor_key(key).await;
            return;
        }

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.quit(),
            KeyCode::Char('n') | KeyCode::Char('+') => self.open_create(),
            KeyCode::Enter | KeyCode::Char('e') => self.edit_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected().await,
            KeyCode::Char('r') => self.refresh().await,
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            _ => {}
        }
    }

    async fn handle_editor_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Char('s') if ctrl => self.save_note().await,
            KeyCode::Esc => self.close_modal(),
            KeyCode::Enter => self.note_text.push('\n'),
            KeyCode::Tab => self.note_text.push('\t'),
            KeyCode::Backspace => {
                self.note_text.pop();
            }
            KeyCode::Char(c) if !ctrl => self.note_text.push(c),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;

    use notes_core::{Assume, Error, MemoryDocuments};

    type Screen = NotesScreen<Arc<MemoryDocuments>, Assume>;

    fn screen(store: &Arc<MemoryDocuments>, confirm: bool) -> Screen {
        NotesScreen::new(
            NoteService::new(store.clone()),
            Assume(confirm),
            "user-001",
            None,
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    async fn type_text(screen: &mut Screen, text: &str) {
        for c in text.chars() {
            screen.handle_key(key(KeyCode::Char(c))).await;
        }
    }

    async fn seed(store: &Arc<MemoryDocuments>, content: &str) -> Note {
        NoteService::new(store.clone())
            .create_note(NewNote::from_content(content, "user-001"))
            .await
            .unwrap()
    }

    fn unauthorized() -> Error {
        Error::Backend {
            status: 401,
            kind: "user_unauthorized".into(),
            message: "not authorized".into(),
        }
    }

    #[tokio::test]
    async fn starts_loading_and_settles_after_mount() {
        let store = Arc::new(MemoryDocuments::new());
        seed(&store, "hello").await;
        let mut screen = screen(&store, true);

        assert!(screen.loading);
        screen.mount().await;

        assert!(!screen.loading);
        assert_eq!(screen.notes.len(), 1);
        assert!(screen.alert.is_none());
    }

    #[tokio::test]
    async fn owner_filter_limits_the_list() {
        let store = Arc::new(MemoryDocuments::new());
        seed(&store, "mine").await;
        NoteService::new(store.clone())
            .create_note(NewNote::from_content("theirs", "user-002"))
            .await
            .unwrap();

        let mut scoped = NotesScreen::new(
            NoteService::new(store.clone()),
            Assume(true),
            "user-001",
            Some("user-001".to_string()),
        );
        scoped.mount().await;

        assert_eq!(scoped.notes.len(), 1);
        assert_eq!(scoped.notes[0].content, "mine");

        let mut unscoped = screen(&store, true);
        unscoped.mount().await;
        assert_eq!(unscoped.notes.len(), 2);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_list() {
        let store = Arc::new(MemoryDocuments::new());
        seed(&store, "hello").await;
        let mut screen = screen(&store, true);
        screen.mount().await;

        store.fail_next(unauthorized());
        screen.refresh().await;

        assert!(!screen.loading);
        assert!(!screen.refreshing);
        assert_eq!(screen.notes.len(), 1);
        assert!(screen.alert.as_ref().is_some_and(Alert::is_error));
    }

    #[tokio::test]
    async fn failed_first_load_still_leaves_loading() {
        let store = Arc::new(MemoryDocuments::new());
        store.fail_next(unauthorized());
        let mut screen = screen(&store, true);

        screen.mount().await;

        assert!(!screen.loading);
        assert!(screen.notes.is_empty());
        assert!(screen.alert.is_some());
    }

    #[tokio::test]
    async fn create_flow_saves_and_reloads() {
        let store = Arc::new(MemoryDocuments::new());
        let mut screen = screen(&store, true);
        screen.mount().await;

        screen.handle_key(key(KeyCode::Char('n'))).await;
        assert!(screen.modal_visible);
        assert!(!screen.is_editing());

        type_text(&mut screen, "Buy milk").await;
        screen.handle_key(ctrl('s')).await;

        assert!(!screen.modal_visible);
        assert!(screen.note_text.is_empty());
        assert_eq!(screen.notes.len(), 1);
        assert_eq!(screen.notes[0].title, "Buy milk");
        assert_eq!(screen.notes[0].user_id, "user-001");
        assert_eq!(screen.alert, Some(Alert::new("Success", "Note created!")));
    }

    #[tokio::test]
    async fn blank_save_is_ignored() {
        let store = Arc::new(MemoryDocuments::new());
        let mut screen = screen(&store, true);
        screen.mount().await;

        for text in ["", "   "] {
            screen.open_create();
            screen.note_text = text.into();
            screen.save_note().await;

            assert!(screen.modal_visible);
            assert!(screen.alert.is_none());
            assert!(store.is_empty());
        }
    }

    #[tokio::test]
    async fn edit_flow_updates_existing_note() {
        let store = Arc::new(MemoryDocuments::new());
        let note = seed(&store, "first").await;
        let mut screen = screen(&store, true);
        screen.mount().await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        screen.handle_key(key(KeyCode::Enter)).await;
        assert!(screen.is_editing());
        assert_eq!(screen.note_text, "first");

        screen.handle_key(key(KeyCode::Backspace)).await;
        type_text(&mut screen, "t edition").await;
        screen.handle_key(ctrl('s')).await;

        assert!(!screen.modal_visible);
        assert!(screen.editing_note.is_none());
        assert_eq!(screen.notes.len(), 1);
        let updated = &screen.notes[0];
        assert_eq!(updated.id, note.id);
        assert_eq!(updated.content, "first edition");
        assert_eq!(updated.title, "first edition");
        assert!(updated.updated_at > updated.created_at);
    }

    #[tokio::test]
    async fn failed_save_keeps_modal_open() {
        let store = Arc::new(MemoryDocuments::new());
        let mut screen = screen(&store, true);
        screen.mount().await;

        screen.open_create();
        screen.note_text = "draft".into();
        store.fail_next(unauthorized());
        screen.save_note().await;

        assert!(screen.modal_visible);
        assert_eq!(screen.note_text, "draft");
        assert_eq!(
            screen.alert.as_ref().map(|a| a.message.as_str()),
            Some("Failed to save note: not authorized")
        );
    }

    #[tokio::test]
    async fn cancel_clears_the_editor() {
        let store = Arc::new(MemoryDocuments::new());
        seed(&store, "kept").await;
        let mut screen = screen(&store, true);
        screen.mount().await;

        screen.edit_selected();
        screen.handle_key(key(KeyCode::Esc)).await;

        assert!(!screen.modal_visible);
        assert!(screen.note_text.is_empty());
        assert!(screen.editing_note.is_none());
        assert!(!screen.should_quit);
    }

    #[tokio::test]
    async fn confirmed_delete_removes_locally_without_reload() {
        let store = Arc::new(MemoryDocuments::new());
        let a = seed(&store, "A").await;
        let b = seed(&store, "B").await;
        let mut screen = screen(&store, true);
        screen.mount().await;

        // Only visible after a reload
        seed(&store, "C").await;
        screen.delete_note(&b.id).await;

        let ids: Vec<_> = screen.notes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, [a.id.as_str()]);
        assert_eq!(screen.alert, Some(Alert::new("Success", "Note deleted!")));
        assert!(store.get(&b.id).is_none());
    }

    #[tokio::test]
    async fn declined_delete_does_nothing() {
        let store = Arc::new(MemoryDocuments::new());
        let a = seed(&store, "A").await;
        let mut screen = screen(&store, false);
        screen.mount().await;

        screen.delete_note(&a.id).await;

        assert_eq!(screen.notes.len(), 1);
        assert!(screen.alert.is_none());
        assert!(store.get(&a.id).is_some());
    }

    #[tokio::test]
    async fn failed_delete_leaves_list_unchanged() {
        let store = Arc::new(MemoryDocuments::new());
        seed(&store, "A").await;
        let mut screen = screen(&store, true);
        screen.mount().await;

        screen.delete_note("does-not-exist").await;

        assert_eq!(screen.notes.len(), 1);
        let alert = screen.alert.unwrap();
        assert!(alert.is_error());
        assert!(alert.message.starts_with("Failed to delete note: "));
    }

    #[tokio::test]
    async fn selection_stays_in_bounds() {
        let store = Arc::new(MemoryDocuments::new());
        seed(&store, "A").await;
        seed(&store, "B").await;
        let mut screen = screen(&store, true);
        screen.mount().await;

        screen.handle_key(key(KeyCode::Down)).await;
        screen.handle_key(key(KeyCode::Down)).await;
        assert_eq!(screen.selected, 1);

        screen.delete_selected().await;
        assert_eq!(screen.selected, 0);

        screen.handle_key(key(KeyCode::Up)).await;
        assert_eq!(screen.selected, 0);
    }

    #[tokio::test]
    async fn quits_from_list_mode() {
        let store = Arc::new(MemoryDocuments::new());
        let mut screen = screen(&store, true);
        screen.mount().await;

        screen.handle_key(key(KeyCode::Char('q'))).await;
        assert!(screen.should_quit);
    }
}
