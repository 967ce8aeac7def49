//! Command front end: routes raw chat lines into the dish processor and
//! renders replies. The console runner stands in for a chat transport so the
//! whole flow is exercisable end to end.

pub mod dispatch;

use anyhow::Result;
use log::{debug, info};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::config::Config;
use crate::dish::{DishCommand, DishProcessor, DishStore};
use crate::logutil::escape_log;

pub use dispatch::{parse_line, RoutedCommand};

/// The bot: owns the configuration and the dish processor.
pub struct Bot {
    config: Config,
    processor: DishProcessor,
}

impl Bot {
    pub fn new(config: Config) -> Result<Self> {
        let store = DishStore::open(&config.storage.data_dir)?;
        Ok(Self {
            config,
            processor: DishProcessor::new(store),
        })
    }

    pub fn processor(&self) -> &DishProcessor {
        &self.processor
    }

    /// Handle one raw chat line from `user_id`. Returns `Ok(None)` when the
    /// line is not addressed to the bot.
    pub fn handle_line(&self, user_id: &str, raw: &str) -> Result<Option<String>> {
        let Some(routed) = dispatch::parse_line(raw, &self.config.bot.command_word) else {
            return Ok(None);
        };
        debug!(
            "routed line: user={} subcmd={:?}",
            escape_log(user_id),
            routed.subcmd
        );
        let command = DishCommand::parse(
            routed.subcmd.as_deref(),
            routed.arg1.as_deref(),
            routed.arg2.as_deref(),
        );
        let reply = self.processor.handle(user_id, command)?;
        Ok(Some(reply))
    }

    /// Console REPL: each stdin line is a message from `user_id`. Ends on EOF.
    pub async fn run_console(&self, user_id: &str) -> Result<()> {
        info!(
            "console session started: user={} command_word={}",
            escape_log(user_id),
            self.config.bot.command_word
        );
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            if let Some(reply) = self.handle_line(user_id, &line)? {
                println!("{}", reply);
            }
        }
        info!("console session ended: user={}", escape_log(user_id));
        Ok(())
    }

    /// Print a brief status summary: how many dishes exist and for whom.
    pub fn show_status(&self) -> Result<()> {
        let ids = self.processor.store().list_user_ids()?;
        println!("{}: {} dish(es)", self.config.bot.name, ids.len());
        for id in ids {
            println!("  - {}", id);
        }
        Ok(())
    }
}
