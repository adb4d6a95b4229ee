use std::sync::Arc;

use super::{
    config::Config,
    wol::runner::{CommandRunner, ProcessRunner},
};

pub struct ServerState {
    pub config: Config,
    pub runner: Arc<dyn CommandRunner>,
}

impl ServerState {
    pub fn new(config: Config) -> Self {
        let runner = Arc::new(ProcessRunner::new(config.command_timeout));
        Self::with_runner(config, runner)
    }

    pub fn with_runner(config: Config, runner: Arc<dyn CommandRunner>) -> Self {
        Self { config, runner }
    }
}
