//! Interactive delete confirmation

use std::io::{BufRead, Write};
use tabula_core::PrimaryKeyTuple;
use tabula_services::ConfirmDelete;

/// Asks `y/N` on stderr and reads the answer from stdin
pub struct PromptConfirm;

impl ConfirmDelete for PromptConfirm {
    fn confirm(&self, table: &str, pk: &PrimaryKeyTuple) -> bool {
        let mut stderr = std::io::stderr();
        // A failed prompt write still falls through to reading the answer
        let _ = write!(
            stderr,
            "Are you sure you want to delete the record from '{}' where {}? [y/N] ",
            table, pk
        );
        let _ = stderr.flush();

        let mut answer = String::new();
        if let Err(e) = std::io::stdin().lock().read_line(&mut answer) {
            tracing::warn!(error = %e, "could not read confirmation");
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
