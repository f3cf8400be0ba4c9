//! Timestamp extraction: finds video timestamp citations in an assistant
//! response and classifies the feedback around each one.
//!
//! Flow: regex scan → canonical timestamp → context window → keyword
//!       classification → dedup (last seen wins) → sort by start time.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Characters of context kept before a match.
const CONTEXT_BEFORE: usize = 50;
/// Characters of context kept after a match.
const CONTEXT_AFTER: usize = 200;

static TIMESTAMP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:at|around|between|from)\s+(\d+):(\d{1,2})(?:\s*-\s*(\d+):(\d{1,2})|\s+and\s+(\d+):(\d{1,2}))?",
    )
    .expect("valid timestamp regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampType {
    Positive,
    Concern,
    Instruction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampReference {
    /// `M:SS` or `M:SS-M:SS`.
    pub timestamp: String,
    /// Surrounding response text.
    pub text: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<TimestampType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAnalysis {
    pub has_media: bool,
    pub media_count: usize,
    pub timestamp_references: Vec<TimestampReference>,
    pub has_video_timestamps: bool,
}

/// Keyword lists for classifying the text around a timestamp.
/// Checked in order positive, concern, instruction; first hit wins.
#[derive(Debug, Clone)]
pub struct TimestampKeywords {
    pub positive: Vec<String>,
    pub concern: Vec<String>,
    pub instruction: Vec<String>,
}

impl Default for TimestampKeywords {
    fn default() -> Self {
        let owned =
            |words: &[&str]| -> Vec<String> { words.iter().map(|w| w.to_string()).collect() };
        Self {
            positive: owned(&["good", "nice", "well", "correct"]),
            concern: owned(&["wrong", "issue", "problem", "concern", "worry"]),
            instruction: owned(&["try", "should", "need to", "focus on"]),
        }
    }
}

impl TimestampKeywords {
    pub fn classify(&self, text: &str) -> Option<TimestampType> {
        let lowered = text.to_lowercase();
        let hit = |words: &[String]| words.iter().any(|w| lowered.contains(&w.to_lowercase()));

        if hit(&self.positive) {
            Some(TimestampType::Positive)
        } else if hit(&self.concern) {
            Some(TimestampType::Concern)
        } else if hit(&self.instruction) {
            Some(TimestampType::Instruction)
        } else {
            None
        }
    }
}

/// Builds the media analysis for a response to a message with attachments.
///
/// Only called when `media_urls` is non-empty, so `has_media` is always true.
pub fn extract_timestamp_analysis(
    text: &str,
    media_urls: &[String],
    keywords: &TimestampKeywords,
) -> MediaAnalysis {
    // (start seconds, reference)
    let mut found: Vec<(u64, TimestampReference)> = Vec::new();

    for caps in TIMESTAMP_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let (timestamp, start_secs) = canonical_timestamp(&caps);
        let window = context_window(text, whole.start(), whole.end());
        let reference = TimestampReference {
            timestamp,
            text: window.to_string(),
            kind: keywords.classify(window),
        };

        match found
            .iter_mut()
            .find(|(_, r)| r.timestamp == reference.timestamp)
        {
            Some(existing) => existing.1 = reference,
            None => found.push((start_secs, reference)),
        }
    }

    found.sort_by_key(|(secs, _)| *secs);
    let timestamp_references: Vec<TimestampReference> =
        found.into_iter().map(|(_, r)| r).collect();

    MediaAnalysis {
        has_media: true,
        media_count: media_urls.len(),
        has_video_timestamps: !timestamp_references.is_empty(),
        timestamp_references,
    }
}

/// Formats one `M:SS` clock from the matched digits and returns it with its
/// offset in seconds. Minute digits are kept as written (minus leading
/// zeros) so values too large to parse still display faithfully; their
/// sort key falls back to 0.
fn clock(caps: &Captures, minutes: usize, seconds: usize) -> Option<(String, u64)> {
    let minutes = caps.get(minutes)?.as_str();
    let seconds: u64 = caps.get(seconds)?.as_str().parse().unwrap_or(0);

    let trimmed = minutes.trim_start_matches('0');
    let display = format!(
        "{}:{seconds:02}",
        if trimmed.is_empty() { "0" } else { trimmed }
    );
    let offset = minutes
        .parse::<u64>()
        .map(|m| m.saturating_mul(60).saturating_add(seconds))
        .unwrap_or(0);
    Some((display, offset))
}

/// Returns the display form and the start time in seconds.
fn canonical_timestamp(caps: &Captures) -> (String, u64) {
    let (start, start_secs) = clock(caps, 1, 2).unwrap_or_else(|| ("0:00".to_string(), 0));
    let end = [(3, 4), (5, 6)]
        .into_iter()
        .find_map(|(m, s)| clock(caps, m, s));

    let display = match end {
        Some((end, _)) => format!("{start}-{end}"),
        None => start,
    };
    (display, start_secs)
}

/// Up to `CONTEXT_BEFORE` chars before and `CONTEXT_AFTER` chars after the
/// match, trimmed. Counts chars, not bytes.
fn context_window(text: &str, start: usize, end: usize) -> &str {
    let from = text[..start]
        .char_indices()
        .rev()
        .nth(CONTEXT_BEFORE - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let to = text[end..]
        .char_indices()
        .nth(CONTEXT_AFTER)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());
    text[from..to].trim()
}
