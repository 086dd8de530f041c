use serde::Serialize;

pub const TEMPERATURE: f32 = 0.5;

const SYSTEM_PROMPT: &str =
	"You are an assistant that summarizes notes into concise bullet points.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	System,
	User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
	pub role: Role,
	pub content: String,
}

/// Builds the fixed two-message conversation sent to the text-generation model.
pub fn summary_messages(content: &str) -> [ChatMessage; 2] {
	[
		ChatMessage { role: Role::System, content: SYSTEM_PROMPT.to_string() },
		ChatMessage {
			role: Role::User,
			content: format!("Please summarize the following note:\n\n{content}"),
		},
	]
}
