use std::sync::Arc;

use async_trait::async_trait;

use tutor_core::protocol::{SegmentLanguage, SpeechSegment};

use crate::error::SpeechError;

//
// ─── FACILITY SEAMS ────────────────────────────────────────────────────────────
//

/// One utterance handed to the speech output facility.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechRequest {
    pub text: String,
    pub language_tag: String,
    pub rate: f32,
    pub pitch: f32,
    pub voice: Option<String>,
}

/// An available synthesis voice on the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub locale: String,
}

/// Text-to-speech facility. Fire-and-forget: the facility serializes
/// playback of enqueued requests itself.
pub trait SpeechOutput: Send + Sync {
    /// Queues one utterance for playback.
    fn enqueue(&self, request: SpeechRequest);

    /// Stops any pending or in-progress utterance immediately.
    fn cancel_all(&self);

    /// Voices currently available on the platform.
    fn voices(&self) -> Vec<Voice>;
}

/// Speech-to-text facility yielding a single transcript per listen.
#[async_trait]
pub trait SpeechInput: Send + Sync {
    /// Listens once and returns the recognized transcript.
    ///
    /// # Errors
    ///
    /// Returns a classified `SpeechError` (permission denied, no speech,
    /// unsupported, other).
    async fn listen(&self, language_tag: &str) -> Result<String, SpeechError>;
}

//
// ─── VOICE SELECTION ───────────────────────────────────────────────────────────
//

/// Name fragments that tend to mark higher-quality platform voices.
const QUALITY_HINTS: [&str; 4] = ["Google", "Natural", "Premium", "Enhanced"];

/// Picks the best available voice for a language tag.
///
/// Preference order: exact locale with a quality-hint name, exact locale,
/// any voice matching the primary subtag, none (platform default).
#[must_use]
pub fn select_voice(voices: &[Voice], language_tag: &str) -> Option<Voice> {
    let primary = language_tag.split('-').next().unwrap_or(language_tag);

    voices
        .iter()
        .find(|v| {
            v.locale == language_tag && QUALITY_HINTS.iter().any(|hint| v.name.contains(hint))
        })
        .or_else(|| voices.iter().find(|v| v.locale == language_tag))
        .or_else(|| {
            voices
                .iter()
                .find(|v| v.locale.split('-').next() == Some(primary))
        })
        .cloned()
}

//
// ─── SEQUENCER ─────────────────────────────────────────────────────────────────
//

/// Rate/pitch pair for one speaking voice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryProfile {
    pub rate: f32,
    pub pitch: f32,
}

/// Language tags and delivery profiles for the two speaking roles.
///
/// The persona voice and the explainer voice get distinct pitch/rate so a
/// listener can tell "the character talking" from "the tutor explaining".
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    pub target_tag: String,
    pub native_tag: String,
    pub target_profile: DeliveryProfile,
    pub native_profile: DeliveryProfile,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            target_tag: "fr-FR".into(),
            native_tag: "it-IT".into(),
            // Energetic persona voice vs. neutral, slightly deeper explainer.
            target_profile: DeliveryProfile {
                rate: 0.95,
                pitch: 1.05,
            },
            native_profile: DeliveryProfile {
                rate: 1.0,
                pitch: 0.95,
            },
        }
    }
}

impl VoiceSettings {
    #[must_use]
    pub fn tag_for(&self, language: SegmentLanguage) -> &str {
        match language {
            SegmentLanguage::Target => &self.target_tag,
            SegmentLanguage::Native => &self.native_tag,
        }
    }

    #[must_use]
    pub fn profile_for(&self, language: SegmentLanguage) -> DeliveryProfile {
        match language {
            SegmentLanguage::Target => self.target_profile,
            SegmentLanguage::Native => self.native_profile,
        }
    }
}

/// Issues ordered, cancellable speech requests for parsed reply segments.
///
/// Only one sequence may be active per session: `speak` always cancels any
/// in-flight speech before enqueueing, so audio never overlaps.
#[derive(Clone)]
pub struct SpeechSequencer {
    output: Arc<dyn SpeechOutput>,
    settings: VoiceSettings,
}

impl SpeechSequencer {
    #[must_use]
    pub fn new(output: Arc<dyn SpeechOutput>) -> Self {
        Self {
            output,
            settings: VoiceSettings::default(),
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: VoiceSettings) -> Self {
        self.settings = settings;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &VoiceSettings {
        &self.settings
    }

    /// Cancels any in-flight speech, then speaks the segments in order.
    pub fn speak(&self, segments: &[SpeechSegment]) {
        self.output.cancel_all();

        if segments.is_empty() {
            return;
        }
        let voices = self.output.voices();
        for segment in segments {
            let tag = self.settings.tag_for(segment.language);
            let profile = self.settings.profile_for(segment.language);
            self.output.enqueue(SpeechRequest {
                text: segment.text.clone(),
                language_tag: tag.to_string(),
                rate: profile.rate,
                pitch: profile.pitch,
                voice: select_voice(&voices, tag).map(|v| v.name),
            });
        }
    }

    /// Stops any pending or in-progress utterance.
    pub fn cancel(&self) {
        self.output.cancel_all();
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn voice(name: &str, locale: &str) -> Voice {
        Voice {
            name: name.into(),
            locale: locale.into(),
        }
    }

    #[test]
    fn prefers_quality_voice_on_exact_locale() {
        let voices = vec![
            voice("Amélie", "fr-FR"),
            voice("Google français", "fr-FR"),
            voice("Luca", "it-IT"),
        ];
        let chosen = select_voice(&voices, "fr-FR").unwrap();
        assert_eq!(chosen.name, "Google français");
    }

    #[test]
    fn falls_back_to_exact_locale_then_primary_subtag() {
        let voices = vec![voice("Chantal", "fr-CA"), voice("Amélie", "fr-FR")];
        assert_eq!(select_voice(&voices, "fr-FR").unwrap().name, "Amélie");

        let voices = vec![voice("Chantal", "fr-CA")];
        assert_eq!(select_voice(&voices, "fr-FR").unwrap().name, "Chantal");

        assert!(select_voice(&voices, "it-IT").is_none());
    }

    #[derive(Default)]
    struct RecordingOutput {
        events: Mutex<Vec<String>>,
        requests: Mutex<Vec<SpeechRequest>>,
    }

    impl SpeechOutput for RecordingOutput {
        fn enqueue(&self, request: SpeechRequest) {
            self.events.lock().unwrap().push("enqueue".into());
            self.requests.lock().unwrap().push(request);
        }

        fn cancel_all(&self) {
            self.events.lock().unwrap().push("cancel".into());
        }

        fn voices(&self) -> Vec<Voice> {
            vec![voice("Google français", "fr-FR"), voice("Alice", "it-IT")]
        }
    }

    #[test]
    fn speak_cancels_first_then_enqueues_in_order() {
        let output = Arc::new(RecordingOutput::default());
        let sequencer = SpeechSequencer::new(output.clone());

        sequencer.speak(&[
            SpeechSegment {
                text: "Très bien !".into(),
                language: SegmentLanguage::Target,
            },
            SpeechSegment {
                text: "Bravo.".into(),
                language: SegmentLanguage::Native,
            },
        ]);

        let events = output.events.lock().unwrap().clone();
        assert_eq!(events, vec!["cancel", "enqueue", "enqueue"]);

        let requests = output.requests.lock().unwrap().clone();
        assert_eq!(requests[0].language_tag, "fr-FR");
        assert_eq!(requests[0].voice.as_deref(), Some("Google français"));
        assert!((requests[0].pitch - 1.05).abs() < f32::EPSILON);
        assert_eq!(requests[1].language_tag, "it-IT");
        assert_eq!(requests[1].voice.as_deref(), Some("Alice"));
        assert!((requests[1].rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn empty_segment_list_still_cancels_only() {
        let output = Arc::new(RecordingOutput::default());
        let sequencer = SpeechSequencer::new(output.clone());
        sequencer.speak(&[]);
        assert_eq!(*output.events.lock().unwrap(), vec!["cancel".to_string()]);
    }
}
