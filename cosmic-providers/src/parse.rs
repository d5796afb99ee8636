use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedText {
    Text(String),
    Empty,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Extract `candidates[0].content.parts[0].text`.
///
/// A 2xx body that cannot be decoded, or that lacks any of those pieces, is
/// reported as `Empty` rather than an error: the request went through and
/// retrying would not change the answer.
pub fn parse_generate_content(body: &[u8]) -> GeneratedText {
    let Ok(resp) = serde_json::from_slice::<GenerateContentResponse>(body) else {
        return GeneratedText::Empty;
    };

    resp.candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().next())
        .and_then(|p| p.text)
        .map_or(GeneratedText::Empty, GeneratedText::Text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_first_candidate_text() {
        let body = br#"{"candidates":[{"content":{"parts":[{"text":"hi"},{"text":"ignored"}]}},{"content":{"parts":[{"text":"second"}]}}]}"#;
        assert_eq!(parse_generate_content(body), GeneratedText::Text("hi".into()));
    }

    #[test]
    fn zero_candidates_is_empty() {
        assert_eq!(parse_generate_content(br#"{"candidates":[]}"#), GeneratedText::Empty);
        assert_eq!(parse_generate_content(br#"{}"#), GeneratedText::Empty);
    }

    #[test]
    fn missing_parts_or_text_is_empty() {
        assert_eq!(
            parse_generate_content(br#"{"candidates":[{"content":{"parts":[]}}]}"#),
            GeneratedText::Empty
        );
        assert_eq!(
            parse_generate_content(br#"{"candidates":[{"finishReason":"SAFETY"}]}"#),
            GeneratedText::Empty
        );
        assert_eq!(
            parse_generate_content(br#"{"candidates":[{"content":{"parts":[{}]}}]}"#),
            GeneratedText::Empty
        );
    }

    #[test]
    fn undecodable_body_is_empty() {
        assert_eq!(parse_generate_content(b"<html>oops</html>"), GeneratedText::Empty);
    }
}
