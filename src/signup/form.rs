//! Signup submission payload.

use serde::{Deserialize, Serialize};

/// The only captcha token the server accepts.
pub const CAPTCHA_PASSED: &str = "passed";

/// Fields posted to `/submit`, as JSON or urlencoded form.
///
/// Missing strings default to empty so that field rules, not the parser,
/// decide what is wrong with a submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_phrase: Option<RecoveryPhrase>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha: Option<String>,

    /// Honeypot. Hidden in the page; people leave it empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_initial: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name_check_pending: Option<PendingFlag>,
}

impl SignupForm {
    pub fn captcha_passed(&self) -> bool {
        self.captcha.as_deref() == Some(CAPTCHA_PASSED)
    }

    pub fn honeypot_filled(&self) -> bool {
        self.middle_initial.as_deref().is_some_and(|v| !v.is_empty())
    }

    pub fn check_pending(&self) -> bool {
        self.display_name_check_pending
            .as_ref()
            .is_some_and(PendingFlag::is_set)
    }

    pub fn recovery_present(&self) -> bool {
        self.recovery_phrase
            .as_ref()
            .is_some_and(|phrase| !phrase.is_empty())
    }
}

/// Recovery phrase: the page posts a list of words, older clients a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecoveryPhrase {
    Words(Vec<String>),
    Phrase(String),
}

impl RecoveryPhrase {
    pub fn is_empty(&self) -> bool {
        match self {
            RecoveryPhrase::Words(words) => words.is_empty(),
            RecoveryPhrase::Phrase(phrase) => phrase.is_empty(),
        }
    }
}

/// Raw `display_name_check_pending` value.
///
/// Set when it is the string `"1"` or the boolean `true`; anything else,
/// including `"0"`, means no check is outstanding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PendingFlag(pub serde_json::Value);

impl PendingFlag {
    pub fn pending() -> Self {
        Self(serde_json::Value::String("1".to_string()))
    }

    pub fn is_set(&self) -> bool {
        match &self.0 {
            serde_json::Value::String(s) => s == "1",
            serde_json::Value::Bool(b) => *b,
            _ => false,
        }
    }
}
