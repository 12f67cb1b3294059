//! Core types for zoowatch

use serde::{Deserialize, Serialize};

/// Outcome of classifying one chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Whether the message names an animal
    pub is_animal: bool,

    /// The phrase identified as the animal name
    pub matched_phrase: Option<String>,

    /// Input tokens that are not part of the matched phrase
    pub residual_words: Vec<String>,
}

impl ClassificationResult {
    /// A positive result for `phrase`
    pub fn animal(phrase: impl Into<String>, residual_words: Vec<String>) -> Self {
        Self {
            is_animal: true,
            matched_phrase: Some(phrase.into()),
            residual_words,
        }
    }

    /// A negative result
    pub fn not_animal(residual_words: Vec<String>) -> Self {
        Self {
            is_animal: false,
            matched_phrase: None,
            residual_words,
        }
    }

    /// The matched phrase, when the message names an animal
    pub fn animal_name(&self) -> Option<&str> {
        if self.is_animal {
            self.matched_phrase.as_deref()
        } else {
            None
        }
    }

    /// Whether the message carries words besides the animal name
    pub fn has_residual_words(&self) -> bool {
        !self.residual_words.is_empty()
    }
}

/// One knowledge-base search result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Page title
    pub title: String,

    /// Plain-text excerpt around the match
    pub snippet: String,
}

impl SearchHit {
    /// Create a new search hit
    pub fn new(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
        }
    }
}

/// Author of a chat message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Platform user id
    #[serde(default)]
    pub id: String,

    /// Display tag, e.g. `name#0001`
    pub tag: String,

    /// Avatar image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,

    /// Whether the author is a bot account
    #[serde(default)]
    pub bot: bool,
}

impl Author {
    /// Mention markup for the author
    pub fn mention(&self) -> String {
        if self.id.is_empty() {
            format!("@{}", self.tag)
        } else {
            format!("<@{}>", self.id)
        }
    }
}

/// A message received from the chat platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Message id
    pub id: String,

    /// Guild (server) id
    #[serde(default)]
    pub guild_id: String,

    /// Channel the message was posted in
    pub channel_id: String,

    /// Message author
    pub author: Author,

    /// Raw message text
    pub content: String,
}

impl IncomingMessage {
    /// Create a new message
    pub fn new(
        id: impl Into<String>,
        channel_id: impl Into<String>,
        author: Author,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            guild_id: String::new(),
            channel_id: channel_id.into(),
            author,
            content: content.into(),
        }
    }

    /// Set the guild id
    pub fn in_guild(mut self, guild_id: impl Into<String>) -> Self {
        self.guild_id = guild_id.into();
        self
    }

    /// Link that opens this message in the client
    pub fn jump_url(&self) -> String {
        format!(
            "https://discord.com/channels/{}/{}/{}",
            self.guild_id, self.channel_id, self.id
        )
    }
}
