use std::process::{Child, Command, Stdio};

use tracing::{debug, info};

use crate::config::PlayerConfig;
use crate::error::{Error, Result};

/// Hands a source URL to an outside program (the browser by default).
pub struct ExternalOpener {
    command: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl ExternalOpener {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
            child: None,
        }
    }

    pub fn from_config(config: &PlayerConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }

    /// Launch the opener with `url` as its last argument
    pub fn open(&mut self, url: &str) -> Result<()> {
        // Reap the previous launch so openers that linger don't pile up
        self.is_running();

        let mut cmd = Command::new(&self.command);

        // Keep the opener's chatter off the TUI
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());
        cmd.stdin(Stdio::null());

        cmd.args(&self.args);
        cmd.arg(url);

        debug!(command = %self.command, url = %url, "Launching opener");

        let child = cmd.spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::OpenerNotFound(self.command.clone())
            } else {
                Error::OpenerLaunch(e.to_string())
            }
        })?;

        info!(command = %self.command, url = %url, "Opened source");
        self.child = Some(child);
        Ok(())
    }

    /// Check if the last launched opener is still running
    pub fn is_running(&mut self) -> bool {
        if let Some(ref mut child) = self.child {
            match child.try_wait() {
                Ok(Some(_)) => {
                    self.child = None;
                    false
                }
                Ok(None) => true,
                Err(_) => false,
            }
        } else {
            false
        }
    }
}

impl Default for ExternalOpener {
    fn default() -> Self {
        Self::from_config(&PlayerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_command() {
        let mut opener = ExternalOpener::new("level1-no-such-opener", Vec::new());
        match opener.open("https://animesonlinecc.to/episodio/x-episodio-1") {
            Err(Error::OpenerNotFound(cmd)) => assert_eq!(cmd, "level1-no-such-opener"),
            other => panic!("expected OpenerNotFound, got {:?}", other),
        }
        assert!(!opener.is_running());
    }

    #[cfg(unix)]
    #[test]
    fn test_launches_command() {
        let mut opener = ExternalOpener::new("true", vec!["--ignored".to_string()]);
        opener
            .open("https://animesonlinecc.to/episodio/x-episodio-1")
            .unwrap();

        if let Some(child) = opener.child.as_mut() {
            assert!(child.wait().unwrap().success());
        }
        assert!(!opener.is_running());
    }

    #[test]
    fn test_from_config() {
        let config = PlayerConfig {
            command: "firefox".to_string(),
            args: vec!["--new-tab".to_string()],
        };
        let opener = ExternalOpener::from_config(&config);
        assert_eq!(opener.command, "firefox");
        assert_eq!(opener.args, vec!["--new-tab"]);
    }
}
