pub mod canvas;
pub mod compile;
pub mod entry;
pub mod prompt;
pub mod session;

pub use canvas::{Canvas, Point, RenderError, RenderOptions, Stroke};
pub use compile::compile_prompt;
pub use entry::{Analysis, JournalEntry, NewJournalEntry};
pub use prompt::{Answers, PROMPT_COUNT, Prompt};
pub use session::{PipelinePhase, SessionState};
