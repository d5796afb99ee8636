use crate::text::normalize_transcript;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceCommand {
    pub phrase: String,
    pub url: String,
}

impl VoiceCommand {
    pub fn new(phrase: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            phrase: phrase.into(),
            url: url.into(),
        }
    }

    /// Spoken name of the target, e.g. "open github" -> "github".
    pub fn target_name(&self) -> String {
        let phrase = normalize_transcript(&self.phrase);
        match phrase.strip_prefix("open ") {
            Some(rest) => rest.to_string(),
            None => phrase,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandAction {
    Greet,
    Open { name: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandTable {
    pub wake_phrases: Vec<String>,
    // Order matters: the first phrase found in the transcript wins.
    pub commands: Vec<VoiceCommand>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self {
            wake_phrases: vec!["hey cosmic ai assistant".into(), "hey cosmic ai".into()],
            commands: vec![
                VoiceCommand::new("open youtube", "https://www.youtube.com"),
                VoiceCommand::new("open google", "https://www.google.com"),
                VoiceCommand::new("open linkedin", "https://www.linkedin.com/in/abhishek-gidd/"),
                VoiceCommand::new("open github", "https://github.com/Abhigidd"),
            ],
        }
    }
}

impl CommandTable {
    pub fn interpret(&self, transcript: &str) -> Option<CommandAction> {
        let heard = normalize_transcript(transcript);
        if heard.is_empty() {
            return None;
        }

        // Wake phrase takes priority over any command in the same utterance.
        if self
            .wake_phrases
            .iter()
            .any(|w| heard.contains(&normalize_transcript(w)))
        {
            return Some(CommandAction::Greet);
        }

        self.commands
            .iter()
            .find(|c| heard.contains(&normalize_transcript(&c.phrase)))
            .map(|c| CommandAction::Open {
                name: c.target_name(),
                url: c.url.clone(),
            })
    }
}
