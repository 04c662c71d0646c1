//! The newsletter artifact and its audience tag.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{NewsletterError, Result};

/// Minimum trimmed headline length, in characters.
pub const MIN_HEADLINE_CHARS: usize = 5;

/// Minimum trimmed introduction length, in characters.
pub const MIN_INTRODUCTION_CHARS: usize = 10;

/// At least one section must be longer than this, in characters.
pub const MIN_SECTION_CHARS: usize = 20;

/// Maximum number of body sections.
pub const MAX_SECTIONS: usize = 3;

/// Reader group a newsletter is written for. Only affects prompt wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    #[default]
    Business,
    Technical,
}

impl Audience {
    pub const ALL: [Audience; 2] = [Audience::Business, Audience::Technical];

    /// Lowercase identifier used on the wire.
    pub fn id(&self) -> &'static str {
        match self {
            Audience::Business => "business",
            Audience::Technical => "technical",
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Audience::Business => "Business",
            Audience::Technical => "Technical",
        }
    }
}

impl fmt::Display for Audience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Audience {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "business" => Ok(Self::Business),
            "technical" => Ok(Self::Technical),
            _ => Err(format!("Invalid audience: {}. Valid options: business, technical", s)),
        }
    }
}

/// Entry of the audience listing served to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudienceInfo {
    pub id: &'static str,
    pub name: &'static str,
}

/// All audiences with display names.
pub fn audiences() -> Vec<AudienceInfo> {
    Audience::ALL
        .iter()
        .map(|audience| AudienceInfo { id: audience.id(), name: audience.display_name() })
        .collect()
}

/// A composed newsletter.
///
/// Built once per request by either the model path or the fallback path and
/// not modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Newsletter {
    pub headline: String,
    pub introduction: String,
    pub sections: Vec<String>,
    pub cta: String,
}

impl Newsletter {
    /// Names of the required fields that are missing or too short.
    ///
    /// Reports `title` for the headline, `introduction`, `sections` when there
    /// are none, and `valid sections` when none is longer than
    /// [`MIN_SECTION_CHARS`]. The call to action is never required.
    pub fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if char_len(&self.headline) < MIN_HEADLINE_CHARS {
            missing.push("title".to_string());
        }
        if char_len(&self.introduction) < MIN_INTRODUCTION_CHARS {
            missing.push("introduction".to_string());
        }
        if self.sections.is_empty() {
            missing.push("sections".to_string());
        } else if !self.sections.iter().any(|section| char_len(section) > MIN_SECTION_CHARS) {
            missing.push("valid sections".to_string());
        }

        missing
    }

    /// Check the structural minimums of a newsletter.
    ///
    /// # Errors
    ///
    /// Returns [`NewsletterError::Incomplete`] naming every failing field.
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() { Ok(()) } else { Err(NewsletterError::Incomplete { missing }) }
    }

    /// Indented JSON with non-ASCII characters kept as-is.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the newsletter as indented UTF-8 JSON to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }
}

fn char_len(text: &str) -> usize {
    text.trim().chars().count()
}
