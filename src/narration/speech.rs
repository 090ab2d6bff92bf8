//! Speech timing: synthesizer boundary and the per-play narration track.

use crate::foundation::core::Seconds;
use crate::foundation::error::{GeomotionError, GeomotionResult};
use crate::narration::bookmarks::parse_bookmarks;
use crate::scene::stage::Scene;
use std::collections::BTreeMap;

/// Timing of one synthesized narration clip.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SpeechClip {
    /// Spoken text with markers removed.
    pub text: String,
    /// Total clip length.
    pub duration: Seconds,
    /// Offset of every bookmark from the start of the clip.
    pub bookmarks: BTreeMap<String, Seconds>,
}

/// Narration backend. Audio is the implementation's business; the scene only consumes timing.
pub trait SpeechSynthesizer {
    /// Synthesize `text`, which may contain `<bookmark mark='X'/>` markers.
    fn synthesize(&self, text: &str) -> GeomotionResult<SpeechClip>;
}

/// Deterministic estimator that speaks at a fixed word rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WordRateSynthesizer {
    /// Spoken words per second.
    pub words_per_second: f64,
}

impl Default for WordRateSynthesizer {
    fn default() -> Self {
        Self {
            words_per_second: 2.5,
        }
    }
}

impl SpeechSynthesizer for WordRateSynthesizer {
    fn synthesize(&self, text: &str) -> GeomotionResult<SpeechClip> {
        if !self.words_per_second.is_finite() || self.words_per_second <= 0.0 {
            return Err(GeomotionError::narration("words_per_second must be finite and > 0"));
        }
        let marked = parse_bookmarks(text)?;
        let rate = self.words_per_second;
        Ok(SpeechClip {
            duration: marked.word_count() as f64 / rate,
            bookmarks: marked
                .bookmarks
                .into_iter()
                .map(|b| (b.mark, b.word_index as f64 / rate))
                .collect(),
            text: marked.plain,
        })
    }
}

/// A clip that started playing at a known scene time.
///
/// Every query is measured against the scene clock, so waiting or playing through the scene
/// advances the track.
#[derive(Clone, Debug)]
pub struct NarrationTrack {
    clip: SpeechClip,
    started_at: Seconds,
    scene: Scene,
}

impl NarrationTrack {
    pub(crate) fn new(clip: SpeechClip, started_at: Seconds, scene: Scene) -> Self {
        Self {
            clip,
            started_at,
            scene,
        }
    }

    /// The synthesized clip.
    pub fn clip(&self) -> &SpeechClip {
        &self.clip
    }

    /// Total clip length.
    pub fn duration(&self) -> Seconds {
        self.clip.duration
    }

    /// Scene time at which speech started.
    pub fn started_at(&self) -> Seconds {
        self.started_at
    }

    /// Scene time spent since speech started.
    pub fn elapsed(&self) -> Seconds {
        self.scene.time() - self.started_at
    }

    /// Offset of `mark` from the start of the clip.
    pub fn bookmark_offset(&self, mark: &str) -> GeomotionResult<Seconds> {
        self.clip
            .bookmarks
            .get(mark)
            .copied()
            .ok_or_else(|| GeomotionError::narration(format!("unknown bookmark '{mark}'")))
    }

    /// Time left until speech reaches `mark`; zero once it has passed.
    pub fn time_until_bookmark(&self, mark: &str) -> GeomotionResult<Seconds> {
        Ok((self.bookmark_offset(mark)? - self.elapsed()).max(0.0))
    }

    /// Advance the scene (without animation) until speech reaches `mark`.
    pub fn wait_until_bookmark(&self, mark: &str) -> GeomotionResult<()> {
        let wait = self.time_until_bookmark(mark)?;
        tracing::debug!(mark, wait, "wait until bookmark");
        self.scene.wait(wait)
    }

    /// Speech left after subtracting `buffer`; never negative.
    pub fn remaining_duration(&self, buffer: Seconds) -> Seconds {
        (self.clip.duration - self.elapsed() - buffer).max(0.0)
    }

    /// Wait out whatever speech is left.
    pub fn finish(&self) -> GeomotionResult<()> {
        self.scene.wait(self.remaining_duration(0.0))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/narration/speech.rs"]
mod tests;
