//! Outbound webhook message.

use serde::Serialize;
use serde_json::{Map, Value};

use super::Submission;
use crate::error::RelayError;

/// Most rich-content blocks a single webhook message may carry.
pub const MAX_EMBEDS: usize = 10;

/// Who may be pinged by the forwarded message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MentionPolicy {
    /// No `@everyone`, role or user pings.
    #[default]
    Suppress,
    /// Caller explicitly authorized broad mentions.
    Broad,
}

/// Wire form of the mention policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowedMentions {
    pub parse: Vec<&'static str>,
}

impl From<MentionPolicy> for AllowedMentions {
    fn from(policy: MentionPolicy) -> Self {
        let parse = match policy {
            MentionPolicy::Suppress => Vec::new(),
            MentionPolicy::Broad => vec!["everyone", "roles", "users"],
        };
        Self { parse }
    }
}

/// Normalized message sent to every attempted endpoint.
///
/// Built fresh per request, identical across shards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchPayload {
    pub content: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embeds: Option<Vec<Map<String, Value>>>,
    pub allowed_mentions: AllowedMentions,
}

impl DispatchPayload {
    /// Normalize a submission: cap content, validate embeds, pick mention policy.
    ///
    /// A message with neither content nor embeds carries `placeholder` instead.
    pub fn from_submission(
        submission: Submission,
        username: &str,
        max_content_chars: usize,
        placeholder: &str,
    ) -> Result<Self, RelayError> {
        let embeds = submission.embeds.filter(|e| !e.is_empty());
        if embeds.as_ref().is_some_and(|e| e.len() > MAX_EMBEDS) {
            return Err(RelayError::Validation(format!(
                "at most {MAX_EMBEDS} embeds are allowed"
            )));
        }

        let content = match submission.content {
            Some(c) if !c.trim().is_empty() => c,
            _ if embeds.is_none() => placeholder.to_string(),
            _ => String::new(),
        };
        let content = truncate_chars(&content, max_content_chars).to_string();

        let policy = if submission.allow_mentions {
            MentionPolicy::Broad
        } else {
            MentionPolicy::Suppress
        };

        Ok(Self {
            content,
            username: username.to_string(),
            embeds,
            allowed_mentions: policy.into(),
        })
    }
}

/// Cut `s` to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(content: &str) -> Submission {
        Submission {
            content: Some(content.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_long_content_truncated_to_cap() {
        let long = "a".repeat(2500);
        let payload = DispatchPayload::from_submission(submission(&long), "bot", 1900, "No content").unwrap();
        assert_eq!(payload.content.chars().count(), 1900);
    }

    #[test]
    fn test_short_content_untouched() {
        let payload = DispatchPayload::from_submission(submission("hello"), "bot", 1900, "No content").unwrap();
        assert_eq!(payload.content, "hello");

        let exact = "b".repeat(1900);
        let payload = DispatchPayload::from_submission(submission(&exact), "bot", 1900, "No content").unwrap();
        assert_eq!(payload.content, exact);
    }

    #[test]
    fn test_truncate_respects_multibyte_chars() {
        assert_eq!(truncate_chars("héllo wörld", 4), "héll");
        assert_eq!(truncate_chars("🦀🦀🦀", 2), "🦀🦀");
        assert_eq!(truncate_chars("", 5), "");
    }

    #[test]
    fn test_mentions_suppressed_by_default() {
        let payload = DispatchPayload::from_submission(submission("@everyone"), "bot", 1900, "No content").unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["allowed_mentions"]["parse"], serde_json::json!([]));
        assert_eq!(json["username"], "bot");
        assert!(json.get("embeds").is_none());
    }

    #[test]
    fn test_broad_mentions_when_authorized() {
        let mut sub = submission("@everyone");
        sub.allow_mentions = true;
        let payload = DispatchPayload::from_submission(sub, "bot", 1900, "No content").unwrap();
        assert_eq!(
            payload.allowed_mentions.parse,
            vec!["everyone", "roles", "users"]
        );
    }

    #[test]
    fn test_empty_message_gets_placeholder() {
        let payload =
            DispatchPayload::from_submission(Submission::default(), "bot", 1900, "No content")
                .unwrap();
        assert_eq!(payload.content, "No content");

        let payload =
            DispatchPayload::from_submission(submission("   "), "bot", 1900, "No content").unwrap();
        assert_eq!(payload.content, "No content");
    }

    #[test]
    fn test_placeholder_respects_cap() {
        let payload =
            DispatchPayload::from_submission(Submission::default(), "bot", 2, "No content").unwrap();
        assert_eq!(payload.content, "No");
    }

    #[test]
    fn test_embeds_only_message_allowed() {
        let mut embed = Map::new();
        embed.insert("title".into(), Value::String("t".into()));
        let sub = Submission {
            embeds: Some(vec![embed]),
            ..Default::default()
        };

        let payload = DispatchPayload::from_submission(sub, "bot", 1900, "No content").unwrap();
        assert_eq!(payload.content, "");
        assert_eq!(payload.embeds.map(|e| e.len()), Some(1));
    }

    #[test]
    fn test_too_many_embeds_rejected() {
        let sub = Submission {
            content: Some("x".into()),
            embeds: Some(vec![Map::new(); MAX_EMBEDS + 1]),
            ..Default::default()
        };
        assert!(DispatchPayload::from_submission(sub, "bot", 1900, "No content").is_err());
    }
}
