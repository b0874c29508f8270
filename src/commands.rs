//! Non-interactive note commands.

use std::io::Write;

use chrono::Local;
use notes_core::{
    models::TITLE_MAX_CHARS, Confirm, DocumentStore, Error, ErrorKind, NewNote, Note,
    NoteChanges, NoteService,
};

fn non_empty(content: &str) -> notes_core::Result<&str> {
    if content.trim().is_empty() {
        Err(Error::EmptyContent)
    } else {
        Ok(content)
    }
}

/// Follow-up line printed under a failed command.
pub fn hint(err: &Error) -> Option<&'static str> {
    match err.kind() {
        ErrorKind::Network => Some("check APPWRITE_ENDPOINT and that the backend is reachable"),
        ErrorKind::PermissionDenied => {
            Some("check APPWRITE_API_KEY and the collection's document permissions")
        }
        ErrorKind::NotFound => Some("run `notes list` to see the available ids"),
        ErrorKind::Validation => match err {
            Error::EmptyContent => None,
            _ => Some("see `notes --help` for the configuration flags and variables"),
        },
        ErrorKind::Other => None,
    }
}

fn local_time(note_time: chrono::DateTime<chrono::Utc>) -> String {
    note_time.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn write_row<W: Write>(out: &mut W, note: &Note) -> std::io::Result<()> {
    let title = note.title.lines().next().unwrap_or_default();
    writeln!(
        out,
        "{:<32}  {:<16}  {:<width$}",
        note.id,
        local_time(note.updated_at),
        title,
        width = TITLE_MAX_CHARS
    )
}

pub async fn list<S, W>(
    service: &NoteService<S>,
    owner: Option<&str>,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: DocumentStore,
    W: Write,
{
    let notes = service.get_notes(owner).await?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &notes)?;
        writeln!(out)?;
    } else if notes.is_empty() {
        writeln!(out, "No notes yet. Create one with `notes add <text>`.")?;
    } else {
        for note in &notes {
            write_row(out, note)?;
        }
    }

    Ok(())
}

pub async fn show<S, W>(service: &NoteService<S>, id: &str, json: bool, out: &mut W) -> anyhow::Result<()>
where
    S: DocumentStore,
    W: Write,
{
    let note = service.get_note(id).await?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &note)?;
        writeln!(out)?;
    } else {
        writeln!(out, "id:      {}", note.id)?;
        writeln!(out, "owner:   {}", note.user_id)?;
        writeln!(out, "created: {}", local_time(note.created_at))?;
        writeln!(out, "updated: {}", local_time(note.updated_at))?;
        writeln!(out)?;
        writeln!(out, "{}", note.content)?;
    }

    Ok(())
}

pub async fn add<S, W>(
    service: &NoteService<S>,
    content: &str,
    user: &str,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: DocumentStore,
    W: Write,
{
    let content = non_empty(content)?;
    let note = service.create_note(NewNote::from_content(content, user)).await?;

    writeln!(out, "Note created: {}", note.id)?;
    Ok(())
}

pub async fn edit<S, W>(service: &NoteService<S>, id: &str, content: &str, out: &mut W) -> anyhow::Result<()>
where
    S: DocumentStore,
    W: Write,
{
    let content = non_empty(content)?;
    let note = service.update_note(id, NoteChanges::from_content(content)).await?;

    writeln!(out, "Note updated: {}", note.id)?;
    Ok(())
}

pub async fn delete<S, W>(
    service: &NoteService<S>,
    confirm: &dyn Confirm,
    id: &str,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: DocumentStore,
    W: Write,
{
    if !confirm.confirm("Delete Note", "Are you sure?").await {
        writeln!(out, "Cancelled.")?;
        return Ok(());
    }

    service.delete_note(id).await?;
    writeln!(out, "Note deleted!")?;
    Ok(())
}
