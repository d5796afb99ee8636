// User-visible strings. Tests compare against these, so keep them in one place.

pub const PROMPT_REQUIRED: &str = "Please enter a prompt to ask the AI.";
pub const NO_RESULT: &str = "Sorry, the cosmos is silent right now. Please try again.";
pub const DISPATCH_FAILED: &str = "Error contacting the AI. Please check the logs for details.";

pub const GREETING: &str = "Hey, how can I help you?";
pub const WAKE_REPLY: &str = "How can I help you?";

pub fn opening(name: &str) -> String {
    format!("Opening {name}")
}
