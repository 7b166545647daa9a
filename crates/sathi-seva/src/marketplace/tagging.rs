//! Skill tag suggestions for new job postings.
//!
//! A remote suggester (typically a language model) is tried first when one is configured.
//! The keyword table below is used when no suggester is configured, when the remote call
//! fails, or when it returns nothing usable.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const MAX_KEYWORD_TAGS: usize = 6;
const MAX_PARSED_TAGS: usize = 10;
const MAX_TAG_CHARS: usize = 30;

const SERVICE_KEYWORDS: &[(&str, [&str; 3])] = &[
    ("cleaning", ["House Cleaning", "Deep Cleaning", "Office Cleaning"]),
    ("cook", ["Cooking", "Meal Prep", "Indian Cuisine"]),
    ("plumb", ["Plumbing", "Pipe Repair", "Bathroom Fitting"]),
    ("electric", ["Electrical Work", "Wiring", "Appliance Repair"]),
    ("garden", ["Gardening", "Plant Care", "Landscaping"]),
    ("paint", ["Painting", "Wall Painting", "Interior Design"]),
    ("repair", ["Home Repair", "Maintenance", "Handyman"]),
    ("delivery", ["Delivery", "Pickup", "Transportation"]),
    ("tutor", ["Tutoring", "Teaching", "Education"]),
    ("beauty", ["Beauty Services", "Salon", "Grooming"]),
    ("massage", ["Massage", "Therapy", "Wellness"]),
    ("laundry", ["Laundry", "Dry Cleaning", "Ironing"]),
    ("baby", ["Babysitting", "Child Care", "Nanny"]),
    ("elder", ["Elder Care", "Nursing", "Companion"]),
    ("pet", ["Pet Care", "Dog Walking", "Pet Sitting"]),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRequest {
    #[serde(default)]
    pub title: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagSource {
    Remote,
    Keyword,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSuggestion {
    pub tags: Vec<String>,
    pub source: TagSource,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagSuggestionError {
    #[error("tag suggester request failed: {0}")]
    Request(String),
    #[error("tag suggester returned an unexpected payload: {0}")]
    InvalidResponse(String),
}

/// Remote suggester returning raw tag text (comma separated).
pub trait TagSuggester: Send + Sync {
    fn suggest(&self, request: &TagRequest) -> Result<String, TagSuggestionError>;
}

/// Deterministic keyword lookup over the lower-cased title and description.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTagSuggester;

impl KeywordTagSuggester {
    pub fn suggest(&self, request: &TagRequest) -> Vec<String> {
        let text = format!(
            "{} {}",
            request.title.as_deref().unwrap_or_default(),
            request.description
        )
        .to_lowercase();

        let mut tags: Vec<String> = Vec::new();
        for (keyword, related) in SERVICE_KEYWORDS {
            if !text.contains(keyword) {
                continue;
            }
            for tag in related {
                if !tags.iter().any(|existing| existing == tag) {
                    tags.push((*tag).to_string());
                }
            }
        }
        tags.truncate(MAX_KEYWORD_TAGS);
        tags
    }
}

/// Normalise comma separated tag text: strip quotes, trim, drop empty or overlong entries.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.trim()
        .replace(['"', '\''], "")
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && tag.chars().count() <= MAX_TAG_CHARS)
        .take(MAX_PARSED_TAGS)
        .map(str::to_string)
        .collect()
}

/// Remote-then-keyword tag suggestion.
#[derive(Clone, Default)]
pub struct TagSuggestionService {
    remote: Option<Arc<dyn TagSuggester>>,
    keywords: KeywordTagSuggester,
}

impl TagSuggestionService {
    pub fn new(remote: Option<Arc<dyn TagSuggester>>) -> Self {
        Self {
            remote,
            keywords: KeywordTagSuggester,
        }
    }

    /// Keyword suggestions only, for deployments without a remote credential.
    pub fn keyword_only() -> Self {
        Self::default()
    }

    pub fn suggest(&self, request: &TagRequest) -> TagSuggestion {
        match &self.remote {
            None => debug!("no remote tag suggester configured, using keywords"),
            Some(remote) => match remote.suggest(request) {
                Ok(raw) => {
                    let tags = parse_tag_list(&raw);
                    if !tags.is_empty() {
                        return TagSuggestion {
                            tags,
                            source: TagSource::Remote,
                        };
                    }
                    warn!("remote tag suggester returned no usable tags, using keywords");
                }
                Err(error) => warn!(%error, "remote tag suggester failed, using keywords"),
            },
        }

        TagSuggestion {
            tags: self.keywords.suggest(request),
            source: TagSource::Keyword,
        }
    }
}
