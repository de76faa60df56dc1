//! Text-to-speech playback.
//!
//! [`Narrator`] maps the selected language to a speech locale and makes sure
//! only one utterance plays at a time. The actual synthesis is behind the
//! [`SpeechSynthesizer`] trait; [`CommandSynthesizer`] drives an external
//! program such as `espeak-ng`.

use crate::error::SpeechError;
use crate::models::Language;
use std::io;
use tokio::process::{Child, Command};
use tracing::{debug, instrument};

/// Program used when none is configured.
pub const DEFAULT_TTS_COMMAND: &str = "espeak-ng";

/// A speech backend.
pub trait SpeechSynthesizer: Send {
    /// Stop the utterance in progress, if any.
    fn cancel(&mut self);

    /// Start reading `text` in `locale` (e.g. `en-US`). Returns once playback
    /// has started.
    fn speak(&mut self, text: &str, locale: &str) -> Result<(), SpeechError>;
}

/// Reads text aloud in the selected language.
pub struct Narrator {
    backend: Option<Box<dyn SpeechSynthesizer>>,
}

impl Narrator {
    pub fn new(backend: Box<dyn SpeechSynthesizer>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// A narrator with no backend; every request reports
    /// [`SpeechError::Unsupported`].
    pub fn unavailable() -> Self {
        Self { backend: None }
    }

    /// A narrator that runs `program`, or [`Narrator::unavailable`] when
    /// `program` is blank.
    pub fn for_command(program: &str) -> Self {
        let program = program.trim();
        if program.is_empty() {
            Self::unavailable()
        } else {
            Self::new(Box::new(CommandSynthesizer::new(program)))
        }
    }

    /// Read `text` aloud, interrupting whatever is playing. Blank text is
    /// ignored.
    #[instrument(level = "debug", skip(self, text), fields(chars = text.chars().count()))]
    pub fn speak(&mut self, text: &str, lang: Language) -> Result<(), SpeechError> {
        if text.trim().is_empty() {
            return Ok(());
        }
        let backend = self.backend.as_mut().ok_or(SpeechError::Unsupported)?;
        backend.cancel();
        backend.speak(text, lang.speech_locale())
    }
}

/// Speaks by spawning `<program> -v <voice> <text>`.
///
/// The voice is the locale in lower case, which `espeak-ng` understands
/// (`en-us`, `hi-in`, `ta-in`).
#[derive(Debug)]
pub struct CommandSynthesizer {
    program: String,
    current: Option<Child>,
}

impl CommandSynthesizer {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            current: None,
        }
    }
}

impl SpeechSynthesizer for CommandSynthesizer {
    fn cancel(&mut self) {
        if let Some(mut child) = self.current.take() {
            if let Err(e) = child.start_kill() {
                debug!(error = %e, "Previous utterance already finished");
            }
        }
    }

    fn speak(&mut self, text: &str, locale: &str) -> Result<(), SpeechError> {
        let child = Command::new(&self.program)
            .arg("-v")
            .arg(locale.to_ascii_lowercase())
            .arg(text)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => SpeechError::Unsupported,
                _ => SpeechError::Io(e),
            })?;
        self.current = Some(child);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct Recorder {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl SpeechSynthesizer for Recorder {
        fn cancel(&mut self) {
            self.events.lock().unwrap().push("cancel".to_string());
        }

        fn speak(&mut self, text: &str, locale: &str) -> Result<(), SpeechError> {
            self.events
                .lock()
                .unwrap()
                .push(format!("speak {locale}: {text}"));
            Ok(())
        }
    }

    #[test]
    fn test_speak_cancels_then_speaks_with_locale() {
        let recorder = Recorder::default();
        let mut narrator = Narrator::new(Box::new(recorder.clone()));

        narrator.speak("Namaste", Language::Hi).unwrap();
        narrator.speak("Vanakkam", Language::Ta).unwrap();

        assert_eq!(
            *recorder.events.lock().unwrap(),
            [
                "cancel",
                "speak hi-IN: Namaste",
                "cancel",
                "speak ta-IN: Vanakkam"
            ]
        );
    }

    #[test]
    fn test_blank_text_is_ignored() {
        let recorder = Recorder::default();
        let mut narrator = Narrator::new(Box::new(recorder.clone()));

        narrator.speak("   ", Language::En).unwrap();
        assert!(recorder.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_backend_is_reported() {
        let mut narrator = Narrator::unavailable();
        let err = narrator.speak("Hello", Language::En).unwrap_err();
        assert!(matches!(err, SpeechError::Unsupported));
        assert!(narrator.speak("", Language::En).is_ok());
    }

    #[test]
    fn test_blank_command_disables_speech() {
        let mut narrator = Narrator::for_command("  ");
        assert!(narrator.backend.is_none());
        assert!(matches!(
            narrator.speak("Hello", Language::En),
            Err(SpeechError::Unsupported)
        ));

        assert!(Narrator::for_command("espeak-ng").backend.is_some());
    }

    #[tokio::test]
    async fn test_missing_program_is_unsupported() {
        let mut synth = CommandSynthesizer::new("definitely-not-a-tts-program-4c1e");
        let err = synth.speak("Hello", "en-US").unwrap_err();
        assert!(matches!(err, SpeechError::Unsupported));
    }
}
