use crate::error::{CanvasError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_IMAGES: u32 = 1;
pub const MAX_IMAGES: u32 = 5;
pub const DEFAULT_PROMPT: &str = "Sunset on a beach";

/// Text describing the desired image. Never blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Prompt(String);

impl Prompt {
    pub fn new(text: impl Into<String>) -> Result<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(CanvasError::InvalidRequest("prompt must not be empty".into()));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Prompt {
    type Error = CanvasError;

    fn try_from(value: String) -> Result<Self> {
        Prompt::new(value)
    }
}

impl From<Prompt> for String {
    fn from(prompt: Prompt) -> Self {
        prompt.0
    }
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    pub prompt: Prompt,
    pub count: u32,
}

impl GenerationRequest {
    pub fn new(prompt: Prompt, count: u32) -> Self {
        Self { prompt, count }
    }

    pub fn validate(&self) -> Result<()> {
        if !(MIN_IMAGES..=MAX_IMAGES).contains(&self.count) {
            return Err(CanvasError::InvalidRequest(format!(
                "count must be between {} and {}, got {}",
                MIN_IMAGES, MAX_IMAGES, self.count
            )));
        }
        Ok(())
    }

    /// The batch handed to the model: `count` copies of the prompt.
    pub fn batch(&self) -> Vec<Prompt> {
        vec![self.prompt.clone(); self.count as usize]
    }
}
