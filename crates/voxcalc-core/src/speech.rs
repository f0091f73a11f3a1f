//! Speech collaborator seams
//!
//! Capturing audio and synthesizing speech happen outside the core. A
//! [`Transcriber`] hands over one finalized transcript per utterance and a
//! [`Speaker`] plays back the display string. [`VoiceSession`] wires both
//! around a [`Calculator`] and keeps the session history.

use crate::history::{CalculationRecord, History};
use crate::{Calculation, Calculator, Result};

/// Source of finalized transcripts
pub trait Transcriber {
    /// Wait for the next utterance
    ///
    /// `Ok(None)` means the source is exhausted. Failures are reported as
    /// `Error::UnsupportedEnvironment` or `Error::Recognition`.
    fn listen(&mut self) -> Result<Option<String>>;
}

/// Sink for spoken results, fire-and-forget
pub trait Speaker {
    fn speak(&mut self, text: &str);
}

/// Speaker that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Mute;

impl Speaker for Mute {
    fn speak(&mut self, _text: &str) {}
}

/// Drives listen → calculate → record → speak, one utterance per step
pub struct VoiceSession<T, S> {
    transcriber: T,
    speaker: S,
    calculator: Calculator,
    history: History,
}

impl<T: Transcriber, S: Speaker> VoiceSession<T, S> {
    pub fn new(transcriber: T, speaker: S) -> Self {
        Self::with_calculator(Calculator::default(), transcriber, speaker)
    }

    pub fn with_calculator(calculator: Calculator, transcriber: T, speaker: S) -> Self {
        VoiceSession {
            transcriber,
            speaker,
            calculator,
            history: History::new(),
        }
    }

    /// Process the next utterance
    ///
    /// Returns `Ok(None)` once the transcriber is exhausted. A failed
    /// calculation is returned as `Err` and leaves the history untouched;
    /// the session can be stepped again.
    pub fn step(&mut self) -> Result<Option<Calculation>> {
        let Some(phrase) = self.transcriber.listen()? else {
            return Ok(None);
        };
        tracing::debug!(transcript = %phrase, "utterance received");

        let calculation = self.calculator.calculate(&phrase)?;
        self.history
            .push(CalculationRecord::new(phrase, calculation.result.clone()));
        self.speaker.speak(&calculation.result);

        Ok(Some(calculation))
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn into_history(self) -> History {
        self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::collections::VecDeque;

    struct Script(VecDeque<Result<Option<String>>>);

    impl Script {
        fn new(items: Vec<Result<Option<String>>>) -> Self {
            Script(items.into())
        }

        fn phrases(phrases: &[&str]) -> Self {
            Script::new(phrases.iter().map(|p| Ok(Some(p.to_string()))).collect())
        }
    }

    impl Transcriber for Script {
        fn listen(&mut self) -> Result<Option<String>> {
            self.0.pop_front().unwrap_or(Ok(None))
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<String>);

    impl Speaker for &mut Recorder {
        fn speak(&mut self, text: &str) {
            self.0.push(text.to_string());
        }
    }

    #[test]
    fn test_step_calculates_records_and_speaks() {
        let mut spoken = Recorder::default();
        let mut session = VoiceSession::new(Script::phrases(&["two plus three times four"]), &mut spoken);

        let calculation = session.step().unwrap().unwrap();
        assert_eq!(calculation.result, "14");
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().last().unwrap().expression, "two plus three times four");
        assert_eq!(session.history().last().unwrap().result, "14");

        assert!(session.step().unwrap().is_none());
        drop(session);
        assert_eq!(spoken.0, vec!["14"]);
    }

    #[test]
    fn test_failed_calculation_leaves_history_untouched() {
        let mut session = VoiceSession::new(
            Script::phrases(&["one divided by zero", "five factorial"]),
            Mute,
        );

        let err = session.step().unwrap_err();
        assert!(matches!(err, Error::InvalidResult(_)));
        assert!(session.history().is_empty());

        // session keeps working after an error
        let calculation = session.step().unwrap().unwrap();
        assert_eq!(calculation.result, "120");
        assert_eq!(session.into_history().len(), 1);
    }

    #[test]
    fn test_collaborator_errors_propagate() {
        let mut session = VoiceSession::new(
            Script::new(vec![
                Err(Error::UnsupportedEnvironment("no microphone".into())),
                Err(Error::Recognition("aborted".into())),
            ]),
            Mute,
        );

        let err = session.step().unwrap_err();
        assert!(err.is_collaborator_error());
        assert_eq!(err.to_string(), "Speech support unavailable: no microphone");
        assert!(matches!(session.step().unwrap_err(), Error::Recognition(_)));
        assert!(session.step().unwrap().is_none());
    }

    #[test]
    fn test_empty_utterance_is_empty_expression() {
        let mut session = VoiceSession::new(Script::phrases(&["what is"]), Mute);
        assert_eq!(session.step().unwrap_err(), Error::EmptyExpression);
    }
}
