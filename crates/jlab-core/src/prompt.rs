//! Interactive confirmation.

use crate::error::Result;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Asks the user yes/no questions.
#[async_trait]
pub trait Prompt: Send + Sync {
    /// Returns `true` when the user agrees.
    async fn confirm(&self, question: &str) -> Result<bool>;
}

/// Reads answers from standard input.
#[derive(Debug, Default)]
pub struct StdinPrompt;

#[async_trait]
impl Prompt for StdinPrompt {
    async fn confirm(&self, question: &str) -> Result<bool> {
        let mut stdout = tokio::io::stdout();
        stdout.write_all(question.as_bytes()).await?;
        stdout.write_all(b" ").await?;
        stdout.flush().await?;

        let mut answer = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut answer)
            .await?;

        Ok(is_affirmative(&answer))
    }
}

/// `y` or `yes`, in any case.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative("y\n"));
        assert!(is_affirmative("YES"));
        assert!(is_affirmative("  Yes \r\n"));

        assert!(!is_affirmative(""));
        assert!(!is_affirmative("n"));
        assert!(!is_affirmative("yeah"));
    }
}
