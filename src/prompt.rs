use std::io::{self, BufRead, Write};

use async_trait::async_trait;
use notes_core::Confirm;

/// Asks on stderr and reads a `y`/`n` answer from stdin. Anything but yes declines.
pub struct StdinConfirm;

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait(?Send)]
impl Confirm for StdinConfirm {
    async fn confirm(&self, title: &str, message: &str) -> bool {
        eprint!("{title}: {message} [y/N] ");
        let _ = io::stderr().flush();

        let answer = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            io::stdin().lock().read_line(&mut line).map(|_| line)
        })
        .await;

        match answer {
            Ok(Ok(line)) => is_yes(&line),
            Ok(Err(e)) => {
                tracing::error!(error = %e, "failed to read confirmation");
                false
            }
            Err(e) => {
                tracing::error!(error = %e, "confirmation task failed");
                false
            }
        }
    }
}
