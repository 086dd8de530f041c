//! Plain-text rendering of notes for the terminal.

use std::fmt::Write;

use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use quill_service::Note;

pub fn notes(notes: &[Note]) -> String {
	if notes.is_empty() {
		return "No notes yet.".to_string();
	}

	notes.iter().map(note).collect::<Vec<_>>().join("\n\n")
}

pub fn note(note: &Note) -> String {
	let created = note.created_at.format(&Rfc3339).unwrap_or_else(|_| note.created_at.to_string());
	let mut out = format!("{}  {created}\n  {}\n", note.note_id, note.title);

	push_indented(&mut out, &note.content, "    ");

	if let Some(summary) = &note.summary {
		out.push_str("  Summary:\n");

		push_indented(&mut out, summary, "    ");
	}

	out.truncate(out.trim_end().len());

	out
}

pub fn summary(note_id: Uuid, summary: &str) -> String {
	let mut out = format!("{note_id}  Summary:\n");

	push_indented(&mut out, summary, "  ");
	out.truncate(out.trim_end().len());

	out
}

fn push_indented(out: &mut String, text: &str, indent: &str) {
	for line in text.lines() {
		let _ = writeln!(out, "{indent}{line}");
	}
}
