//! Log-channel reports for accepted guesses

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use zoowatch_classifiers::AnimalFact;
use zoowatch_core::IncomingMessage;

/// Longest field value the chat API accepts
const MAX_FIELD_CHARS: usize = 1024;

/// Longest description the chat API accepts
const MAX_DESCRIPTION_CHARS: usize = 4096;

/// What kind of accepted message a report describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    /// The message guessed the mascot
    CorrectGuess,

    /// An animal plus other words
    MixedContent,

    /// Just an animal
    AnimalOnly,
}

impl ReportKind {
    /// Embed color
    pub fn color(&self) -> u32 {
        match self {
            ReportKind::CorrectGuess => 0x00FF00,
            ReportKind::MixedContent => 0xFFFF00,
            ReportKind::AnimalOnly => 0x808080,
        }
    }

    /// Embed title for `animal`
    pub fn title(&self, animal: &str) -> String {
        match self {
            ReportKind::CorrectGuess => format!("🎉 Correct Mascot Guess: {}", animal),
            ReportKind::MixedContent => format!("⚠️ Mixed Content: {}", animal),
            ReportKind::AnimalOnly => format!("🪶 Animal Message: {}", animal),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportAuthor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportField {
    pub name: String,
    pub value: String,
}

impl ReportField {
    fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: truncate(&value.into(), MAX_FIELD_CHARS),
        }
    }
}

/// Report posted to the log channel for every accepted message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogReport {
    pub kind: ReportKind,
    pub title: String,
    pub color: u32,
    pub description: String,
    pub author: ReportAuthor,
    pub fields: Vec<ReportField>,
    pub timestamp: DateTime<Utc>,
    pub url: String,
}

impl LogReport {
    /// Build the report for an accepted message.
    ///
    /// A correct guess takes precedence over mixed content.
    pub fn build(
        message: &IncomingMessage,
        animal: &str,
        fact: &AnimalFact,
        correct_guess: bool,
        residual_words: &[String],
    ) -> Self {
        let kind = if correct_guess {
            ReportKind::CorrectGuess
        } else if !residual_words.is_empty() {
            ReportKind::MixedContent
        } else {
            ReportKind::AnimalOnly
        };

        let fact_text = if fact.fact.trim().is_empty() {
            "No fact available"
        } else {
            fact.fact.as_str()
        };

        let mut fields = vec![
            ReportField::new("Animal Fact", fact_text),
            ReportField::new("Channel", format!("<#{}>", message.channel_id)),
            ReportField::new("Message ID", message.id.as_str()),
        ];
        match kind {
            ReportKind::CorrectGuess => {
                fields.push(ReportField::new("Note", "This user guessed the mascot!"));
            }
            ReportKind::MixedContent => {
                fields.push(ReportField::new("Non-Animal Words", residual_words.join(", ")));
            }
            ReportKind::AnimalOnly => {}
        }

        Self {
            kind,
            title: kind.title(animal),
            color: kind.color(),
            description: truncate(&message.content, MAX_DESCRIPTION_CHARS),
            author: ReportAuthor {
                name: message.author.tag.clone(),
                icon_url: message.author.avatar_url.clone(),
            },
            fields,
            timestamp: Utc::now(),
            url: message.jump_url(),
        }
    }

    /// Value of the field called `name`
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }

    /// Webhook body carrying this report as one embed.
    ///
    /// Mentions are disabled so a reported message cannot ping anyone.
    pub fn to_webhook_payload(&self) -> Value {
        let fields: Vec<Value> = self
            .fields
            .iter()
            .map(|f| json!({ "name": f.name, "value": f.value, "inline": false }))
            .collect();

        let mut author = json!({ "name": self.author.name });
        if let Some(icon) = &self.author.icon_url {
            author["icon_url"] = json!(icon);
        }

        json!({
            "embeds": [{
                "title": self.title,
                "description": self.description,
                "color": self.color,
                "url": self.url,
                "timestamp": self.timestamp.to_rfc3339(),
                "author": author,
                "fields": fields,
            }],
            "allowed_mentions": { "parse": [] },
        })
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use zoowatch_core::Author;

    fn message(content: &str) -> IncomingMessage {
        IncomingMessage::new(
            "1003",
            "1002",
            Author {
                id: "7".to_string(),
                tag: "ada#0001".to_string(),
                avatar_url: Some("https://cdn.example/a.png".to_string()),
                bot: false,
            },
            content,
        )
        .in_guild("1001")
    }

    fn fact(text: &str) -> AnimalFact {
        AnimalFact {
            animal: "red panda".to_string(),
            fact: text.to_string(),
            source_url: None,
        }
    }

    #[test]
    fn test_correct_guess_report() {
        let report = LogReport::build(
            &message("is it a red panda?"),
            "red panda",
            &fact("Red pandas eat bamboo."),
            true,
            &["is".to_string()],
        );

        assert_eq!(report.kind, ReportKind::CorrectGuess);
        assert_eq!(report.color, 0x00FF00);
        assert!(report.title.ends_with("Correct Mascot Guess: red panda"));
        assert_eq!(report.field("Note"), Some("This user guessed the mascot!"));
        assert_eq!(report.field("Non-Animal Words"), None);
        assert_eq!(report.field("Channel"), Some("<#1002>"));
        assert_eq!(report.field("Message ID"), Some("1003"));
        assert_eq!(report.url, "https://discord.com/channels/1001/1002/1003");
    }

    #[test]
    fn test_mixed_content_report() {
        let residual = vec!["saw".to_string(), "today".to_string()];
        let report = LogReport::build(
            &message("I saw a red panda today"),
            "red panda",
            &fact("Red pandas eat bamboo."),
            false,
            &residual,
        );

        assert_eq!(report.color, 0xFFFF00);
        assert!(report.title.ends_with("Mixed Content: red panda"));
        assert_eq!(report.field("Non-Animal Words"), Some("saw, today"));
    }

    #[test]
    fn test_plain_animal_report() {
        let report = LogReport::build(&message("owl"), "owl", &fact(""), false, &[]);

        assert_eq!(report.kind, ReportKind::AnimalOnly);
        assert_eq!(report.color, 0x808080);
        assert_eq!(report.field("Animal Fact"), Some("No fact available"));
        assert_eq!(report.fields.len(), 3);
    }

    #[test]
    fn test_long_fact_is_truncated() {
        let long = "x".repeat(5000);
        let report = LogReport::build(&message("owl"), "owl", &fact(&long), false, &[]);

        let value = report.field("Animal Fact").unwrap();
        assert_eq!(value.chars().count(), MAX_FIELD_CHARS);
        assert!(value.ends_with('…'));
    }

    #[test]
    fn test_webhook_payload_shape() {
        let report = LogReport::build(&message("owl"), "owl", &fact("Owls hoot."), false, &[]);
        let payload = report.to_webhook_payload();

        let embed = &payload["embeds"][0];
        assert_eq!(embed["color"], 0x808080);
        assert_eq!(embed["description"], "owl");
        assert_eq!(embed["author"]["name"], "ada#0001");
        assert_eq!(embed["author"]["icon_url"], "https://cdn.example/a.png");
        assert_eq!(embed["fields"][0]["name"], "Animal Fact");
        assert_eq!(embed["fields"][0]["value"], "Owls hoot.");
        assert_eq!(payload["allowed_mentions"]["parse"], json!([]));
    }
}
