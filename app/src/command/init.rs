use crate::command::CommandStrategy;
use staffbot_config::Config;

/// Strategy for creating the initial config file.
pub struct InitStrategy;

impl CommandStrategy for InitStrategy {
    type Input = ();

    async fn execute(&self, (): Self::Input) -> anyhow::Result<()> {
        Config::create_config()
    }
}
