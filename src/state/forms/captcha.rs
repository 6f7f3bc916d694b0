//! Client-side CAPTCHA challenge

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;

/// Number of characters in a challenge
pub const CAPTCHA_LENGTH: usize = 6;

/// A short random string the user must retype
///
/// This is a human-interaction prompt, not an anti-bot control: the text is
/// generated and checked locally. `generation` increases every time a new
/// challenge is issued for the same form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptchaChallenge {
    text: String,
    generation: u64,
}

impl CaptchaChallenge {
    /// Draw a new challenge from `[A-Za-z0-9]`
    pub fn generate(generation: u64) -> Self {
        let text = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(CAPTCHA_LENGTH)
            .map(char::from)
            .collect();
        Self { text, generation }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Exact, case-sensitive comparison
    pub fn matches(&self, input: &str) -> bool {
        self.text == input
    }

    /// The challenge that replaces this one
    pub fn regenerate(&self) -> Self {
        Self::generate(self.generation + 1)
    }
}
