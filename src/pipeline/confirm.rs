//! Gate in front of the stages that cost money

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm as Prompt};
use std::io::IsTerminal;

pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Answers yes to everything (`--yes`)
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Asks on the terminal. Without a terminal attached nothing can be
/// answered, so the stage is declined.
#[derive(Debug, Default, Clone, Copy)]
pub struct InteractiveConfirm;

impl Confirm for InteractiveConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        if !std::io::stdin().is_terminal() {
            tracing::warn!("stdin is not a terminal; pass --yes to run without prompting");
            return Ok(false);
        }

        Ok(Prompt::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(false)
            .interact()?)
    }
}
