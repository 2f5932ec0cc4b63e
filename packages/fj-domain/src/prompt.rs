use serde::{Deserialize, Serialize};

pub const PROMPT_COUNT: usize = 4;

/// The fixed daily prompts, in answer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prompt {
	Focus,
	Gratitude,
	Fulfillment,
	Progress,
}
impl Prompt {
	pub const ALL: [Self; PROMPT_COUNT] =
		[Self::Focus, Self::Gratitude, Self::Fulfillment, Self::Progress];

	pub fn question(self) -> &'static str {
		match self {
			Self::Focus => "What do you want to focus on tomorrow?",
			Self::Gratitude => "What is something you're grateful for?",
			Self::Fulfillment => "What will you do to feel fulfilled?",
			Self::Progress => "What will you do to make progress?",
		}
	}

	pub fn label(self) -> &'static str {
		match self {
			Self::Focus => "Focus",
			Self::Gratitude => "Gratitude",
			Self::Fulfillment => "Fulfillment",
			Self::Progress => "Progress",
		}
	}

	pub fn index(self) -> usize {
		self as usize
	}
}

/// One answer per prompt, positionally fixed. Answers may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Answers([String; PROMPT_COUNT]);
impl Answers {
	pub fn new(answers: [String; PROMPT_COUNT]) -> Self {
		Self(answers)
	}

	pub fn get(&self, prompt: Prompt) -> &str {
		&self.0[prompt.index()]
	}

	pub fn iter(&self) -> impl Iterator<Item = (Prompt, &str)> {
		Prompt::ALL.into_iter().map(|prompt| (prompt, self.get(prompt)))
	}

	pub fn as_slice(&self) -> &[String] {
		&self.0
	}

	pub fn is_all_empty(&self) -> bool {
		self.0.iter().all(|answer| answer.trim().is_empty())
	}
}
impl TryFrom<Vec<String>> for Answers {
	type Error = String;

	fn try_from(value: Vec<String>) -> Result<Self, Self::Error> {
		let len = value.len();

		<[String; PROMPT_COUNT]>::try_from(value)
			.map(Self)
			.map_err(|_| format!("Expected exactly {PROMPT_COUNT} answers, got {len}."))
	}
}
impl From<Answers> for Vec<String> {
	fn from(value: Answers) -> Self {
		value.0.into()
	}
}
