//! Tutor dialogue response protocol.
//!
//! A dialogue reply is one free-text string that may embed a correction block
//! and a language separator:
//!
//! ```text
//! [CORRECTION: Je la regarde. Il pronome va prima del verbo.] Très bien ! ||| Ottimo lavoro.
//! ```
//!
//! The text before `|||` is the persona's target-language utterance, the text
//! after it the native-language aside. `*...*` spans are stage directions:
//! shown set off in the transcript, stripped before speech.
//!
//! The producer is a generative model, so none of this can be assumed
//! well-formed. The parser never fails: every optional field defaults to
//! absent, and an unterminated correction block is left verbatim in the
//! display text so malformed output stays visible instead of vanishing.

use crate::model::Correction;

/// Opening delimiter of a correction block.
pub const CORRECTION_OPEN: &str = "[CORRECTION:";

/// Closing delimiter of a correction block.
pub const CORRECTION_CLOSE: char = ']';

/// Separator between the target-language and native-language parts.
pub const LANGUAGE_SEPARATOR: &str = "|||";

/// Fallback explanation when a correction block has no internal period.
pub const GENERIC_CORRECTION_NOTE: &str = "Correggi la grammatica.";

//
// ─── PARSED REPLY ──────────────────────────────────────────────────────────────
//

/// Which voice a speech segment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentLanguage {
    /// The language being learned; spoken by the persona voice.
    Target,
    /// The learner's native language; spoken by the explainer voice.
    Native,
}

/// A language-tagged slice of a reply destined for one speech request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechSegment {
    pub text: String,
    pub language: SegmentLanguage,
}

/// Decoded form of one raw dialogue reply. Ephemeral; recomputed per reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    /// Transcript text: correction block removed, separator turned into a
    /// paragraph break, stage-direction asterisks kept for rendering.
    pub display_text: String,
    /// Extracted correction, if the reply carried a well-formed block.
    pub correction: Option<Correction>,
    /// Ordered speech segments, target first, asides stripped.
    pub segments: Vec<SpeechSegment>,
}

impl ParsedReply {
    /// True when the reply produced nothing to show or speak.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display_text.is_empty() && self.correction.is_none() && self.segments.is_empty()
    }
}

//
// ─── PARSER ────────────────────────────────────────────────────────────────────
//

/// Decodes a raw dialogue reply. Never fails; see the module docs.
#[must_use]
pub fn parse(raw: &str) -> ParsedReply {
    let raw = raw.trim();
    if raw.is_empty() {
        return ParsedReply {
            display_text: String::new(),
            correction: None,
            segments: Vec::new(),
        };
    }

    let (remainder, correction) = extract_correction(raw);
    let remainder = remainder.trim();

    let (target_part, native_part) = match remainder.split_once(LANGUAGE_SEPARATOR) {
        Some((before, after)) => (before, Some(after)),
        None => (remainder, None),
    };

    let mut segments = Vec::new();
    let spoken_target = strip_stage_directions(target_part);
    if !spoken_target.is_empty() {
        segments.push(SpeechSegment {
            text: spoken_target,
            language: SegmentLanguage::Target,
        });
    }
    if let Some(native_part) = native_part {
        let spoken_native = strip_stage_directions(native_part);
        if !spoken_native.is_empty() {
            segments.push(SpeechSegment {
                text: spoken_native,
                language: SegmentLanguage::Native,
            });
        }
    }

    let display_text = match native_part {
        Some(after) => format!("{}\n\n{}", target_part.trim(), after.trim()),
        None => target_part.trim().to_string(),
    };

    ParsedReply {
        display_text,
        correction,
        segments,
    }
}

/// Pulls the first well-formed correction block out of the text.
///
/// An unterminated block is treated as absent and left in place.
fn extract_correction(raw: &str) -> (String, Option<Correction>) {
    let Some(open) = raw.find(CORRECTION_OPEN) else {
        return (raw.to_string(), None);
    };
    let body_start = open + CORRECTION_OPEN.len();
    let Some(close_offset) = raw[body_start..].find(CORRECTION_CLOSE) else {
        return (raw.to_string(), None);
    };
    let body = &raw[body_start..body_start + close_offset];
    let remainder = format!(
        "{}{}",
        &raw[..open],
        &raw[body_start + close_offset + CORRECTION_CLOSE.len_utf8()..]
    );

    // The corrected sentence runs up to the first period; the rest is the
    // explanation. A block with no period is all sentence.
    let correction = match body.find('.') {
        Some(dot) if dot > 0 => Correction {
            corrected_sentence: body[..=dot].trim().to_string(),
            explanation: body[dot + 1..].trim().to_string(),
        },
        _ => Correction {
            corrected_sentence: body.trim().to_string(),
            explanation: GENERIC_CORRECTION_NOTE.to_string(),
        },
    };

    (remainder, Some(correction))
}

/// Removes `*...*` stage-direction spans, leaving surrounding text intact.
///
/// An unpaired trailing asterisk is kept as-is.
fn strip_stage_directions(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find('*') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        match after_open.find('*') {
            Some(close) => {
                rest = &after_open[close + 1..];
                // Dropping the span must not leave a doubled space behind.
                if out.ends_with(' ') {
                    rest = rest.trim_start_matches(' ');
                }
            }
            None => {
                // No closing marker: keep the remainder untouched.
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
