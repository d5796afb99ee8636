use serde::{Deserialize, Serialize};

/// What the chat surface shows. Owned by the front end; the dispatcher only
/// describes changes to it through [`DisplayUpdate`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayState {
    pub text: String,
    pub is_loading: bool,
    pub is_typing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayUpdate {
    SetLoading(bool),
    SetTyping(bool),
    Clear,
    SetText(String),
    Append(char),
}

impl DisplayState {
    pub fn apply(&mut self, update: &DisplayUpdate) {
        match update {
            DisplayUpdate::SetLoading(v) => self.is_loading = *v,
            DisplayUpdate::SetTyping(v) => self.is_typing = *v,
            DisplayUpdate::Clear => self.text.clear(),
            DisplayUpdate::SetText(s) => {
                self.text.clear();
                self.text.push_str(s);
            }
            DisplayUpdate::Append(c) => self.text.push(*c),
        }
    }

    pub fn replay<'a>(updates: impl IntoIterator<Item = &'a DisplayUpdate>) -> Self {
        let mut state = Self::default();
        for u in updates {
            state.apply(u);
        }
        state
    }
}
