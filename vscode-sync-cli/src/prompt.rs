//! Interactive overwrite confirmation.

use std::path::Path;

use dialoguer::Confirm;
use vscode_sync::pack::OverwritePrompt;

/// Asks on the terminal before replacing an existing file.
///
/// With `assume_yes` every overwrite is accepted without asking. When the
/// terminal cannot be read (no TTY, closed stdin) the file is kept.
#[derive(Debug, Clone, Copy)]
pub struct ConfirmPrompt {
    assume_yes: bool,
}

impl ConfirmPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl OverwritePrompt for ConfirmPrompt {
    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        if self.assume_yes {
            return true;
        }

        match Confirm::new()
            .with_prompt(format!("File {} already exists. Overwrite?", path.display()))
            .default(false)
            .interact()
        {
            Ok(answer) => answer,
            Err(e) => {
                tracing::debug!(error = %e, path = %path.display(), "Overwrite prompt unavailable");
                false
            }
        }
    }
}
