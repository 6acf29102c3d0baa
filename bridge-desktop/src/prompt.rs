//! Terminal authorization prompt

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    prompt::AuthorizationPrompt,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

/// Prints the authorization URL to stdout and reads one line from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinAuthorizationPrompt;

impl StdinAuthorizationPrompt {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AuthorizationPrompt for StdinAuthorizationPrompt {
    async fn request_code(&self, auth_url: &str) -> Result<String> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(
                format!(
                    "Authorize this app by visiting this URL: {}\nEnter the code from that page here: ",
                    auth_url
                )
                .as_bytes(),
            )
            .await?;
        stdout.flush().await?;

        let mut line = String::new();
        let read = BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await?;

        if read == 0 {
            return Err(BridgeError::NotAvailable(
                "stdin closed before an authorization code was entered".to_string(),
            ));
        }

        Ok(line.trim().to_string())
    }
}
