#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use logexec::config::SupervisorConfig;

/// Builder for `SupervisorConfig` to simplify test setup.
pub struct SupervisorConfigBuilder {
    config: SupervisorConfig,
}

impl SupervisorConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SupervisorConfig::default(),
        }
    }

    pub fn max_line(mut self, max_line: usize) -> Self {
        self.config.max_line = max_line;
        self
    }

    pub fn ignore_signals(mut self, val: bool) -> Self {
        self.config.ignore_signals = val;
        self
    }

    pub fn eof_grace(mut self, grace: Duration) -> Self {
        self.config.eof_grace = grace;
        self
    }

    pub fn tag(mut self, tag: &str) -> Self {
        self.config.tag = tag.to_string();
        self
    }

    pub fn socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.socket_paths = vec![path.into()];
        self
    }

    pub fn build(self) -> SupervisorConfig {
        self.config
    }
}

impl Default for SupervisorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Command vector for `sh -c <script>`.
pub fn sh(script: &str) -> Vec<String> {
    vec!["sh".to_string(), "-c".to_string(), script.to_string()]
}
