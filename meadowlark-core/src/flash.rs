use serde::{Deserialize, Serialize};

use crate::session::SessionData;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Warning,
    Danger,
}

/// A one-shot notice shown on the next page a visitor sees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    #[serde(rename = "type")]
    pub kind: FlashKind,
    pub intro: String,
    pub message: String,
}

impl Flash {
    pub fn new(kind: FlashKind, intro: impl Into<String>, message: impl Into<String>) -> Self {
        Self { kind, intro: intro.into(), message: message.into() }
    }

    pub fn success(intro: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(FlashKind::Success, intro, message)
    }

    pub fn warning(intro: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(FlashKind::Warning, intro, message)
    }

    pub fn danger(intro: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(FlashKind::Danger, intro, message)
    }
}

/// Replaces whatever flash is pending. There is one slot, no queue.
pub fn set_flash(session: &mut SessionData, flash: Flash) {
    session.flash = Some(flash);
}

pub fn take_flash(session: &mut SessionData) -> Option<Flash> {
    session.flash.take()
}
