use serde::{Deserialize, Serialize};

//
// ─── CONTENT TOKEN ────────────────────────────────────────────────────────────
//

/// One segment of question content: either prose or a reference to an image.
///
/// Question banks store prompts and choices as flat string lists. A string is
/// an image reference when it starts with `images/` or `image/`; everything
/// else is literal text. The discrimination happens once, on deserialization,
/// so the rest of the engine never re-inspects prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentToken {
    Text(String),
    Image(String),
}

impl ContentToken {
    /// Classifies a raw string from a question bank.
    #[must_use]
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.starts_with("images/") || raw.starts_with("image/") {
            ContentToken::Image(raw)
        } else {
            ContentToken::Text(raw)
        }
    }

    /// Returns the raw string form, as stored in the bank.
    #[must_use]
    pub fn as_raw(&self) -> &str {
        match self {
            ContentToken::Text(s) | ContentToken::Image(s) => s,
        }
    }

    #[must_use]
    pub fn is_image(&self) -> bool {
        matches!(self, ContentToken::Image(_))
    }

    /// Resolves an image token to a served URL under `base`.
    ///
    /// The legacy `image/` prefix (singular) is stripped; `images/` paths are
    /// kept whole. Leading slashes on the relative part are trimmed so the
    /// caller's `base` controls the final shape. Returns `None` for text.
    #[must_use]
    pub fn image_src(&self, base: &str) -> Option<String> {
        let ContentToken::Image(raw) = self else {
            return None;
        };
        let rel = raw.strip_prefix("image/").unwrap_or(raw);
        let rel = rel.trim_start_matches('/');
        Some(format!("{base}{rel}"))
    }
}

impl From<String> for ContentToken {
    fn from(raw: String) -> Self {
        Self::classify(raw)
    }
}

impl From<ContentToken> for String {
    fn from(token: ContentToken) -> Self {
        match token {
            ContentToken::Text(s) | ContentToken::Image(s) => s,
        }
    }
}

impl From<&str> for ContentToken {
    fn from(raw: &str) -> Self {
        Self::classify(raw)
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
