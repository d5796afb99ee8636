use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    Text(String),
    // 2xx, but nothing usable in the body.
    Empty,
}

/// Terminal result of one dispatch. Exactly one is produced per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Success { reply: Reply, attempts: u32 },
    Failure { reason: String, attempts: u32 },
    // A newer request took over the display before this one finished.
    Superseded { attempts: u32 },
}

impl Outcome {
    pub fn attempts(&self) -> u32 {
        match self {
            Outcome::Success { attempts, .. }
            | Outcome::Failure { attempts, .. }
            | Outcome::Superseded { attempts } => *attempts,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Outcome::Success {
                reply: Reply::Text(t),
                ..
            } => Some(t),
            _ => None,
        }
    }
}
