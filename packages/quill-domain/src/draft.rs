#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
	pub title: String,
	pub content: String,
}
impl NoteDraft {
	pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
		Self { title: title.into(), content: content.into() }
	}

	/// Both fields must carry visible text before a note can be created.
	pub fn is_eligible(&self) -> bool {
		!self.title.trim().is_empty() && !self.content.trim().is_empty()
	}

	pub fn clear(&mut self) {
		self.title.clear();
		self.content.clear();
	}
}
