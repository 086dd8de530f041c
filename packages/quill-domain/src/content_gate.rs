#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectCode {
	RejectEmpty,
	RejectTooLong,
}

pub fn content_gate(content: &str, cfg: &quill_config::Summarize) -> Result<(), RejectCode> {
	if content.trim().is_empty() {
		return Err(RejectCode::RejectEmpty);
	}
	if content.chars().count() > cfg.max_content_chars as usize {
		return Err(RejectCode::RejectTooLong);
	}

	Ok(())
}
