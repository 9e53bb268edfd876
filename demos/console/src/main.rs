//! Interactive Warden console.
//!
//! Drives a `Warden` over the in-memory host from stdin so the AFK and
//! cooldown behaviour can be tried without a game server. Messages the
//! host "delivers" are printed once a second.
//!
//! ```text
//! cargo run -p warden-console -- [config.json]
//! > join Steve
//! > cmd Steve /home
//! ```

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use warden::prelude::*;

const HELP: &str = "\
commands:
  join <name>                      player connects
  quit <name>                      player disconnects
  chat <name>                      player chats (activity)
  cmd <name> <line..>              player runs a command
  afk <name> [status..]            mark as away
  status <name>                    AFK state and away status
  cooldowns <name>                 active cooldowns
  warmups <name>                   pending warmups
  cancel <name> cooldown|warmup <command>
  reload <path>                    reload AFK and cooldown settings
  exit";

#[tokio::main]
async fn main() -> Result<(), WardenError> {
    warden::telemetry::init_with_default("warden=info,warden_afk=debug,info").ok();

    let config = match std::env::args().nth(1) {
        Some(path) => WardenConfig::load(path)?,
        None => WardenConfig::default(),
    };

    let host = Arc::new(InMemoryHost::new(20));
    let mut warden = Warden::builder().config(config).host(Arc::clone(&host)).start()?;

    let outbox = Arc::clone(&host);
    let printer = tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        let mut replayed = 0;
        loop {
            interval.tick().await;
            for (to, text) in outbox.take_messages() {
                println!("[to {to}] {text}");
            }
            let dispatched = outbox.dispatched();
            for (who, line) in &dispatched[replayed..] {
                println!("[{who} ran] /{line}");
            }
            replayed = dispatched.len();
        }
    });

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["exit"] => break,
            ["help"] => println!("{HELP}"),
            ["join", name] => {
                let identity = Identity::player(name);
                host.connect(&identity);
                warden.player_joined(&identity);
            }
            ["quit", name] => {
                let identity = Identity::player(name);
                host.disconnect(&identity);
                warden.player_quit(&identity);
            }
            ["chat", name] => {
                warden.activity(&Identity::player(name), ActivityEvent::Chat);
            }
            ["cmd", name, rest @ ..] if !rest.is_empty() => {
                let command = rest.join(" ");
                let admitted = warden.command_preprocess(&Identity::player(name), &command);
                println!("{command}: {}", if admitted { "runs" } else { "held" });
            }
            ["afk", name, status @ ..] => {
                let status = status.join(" ");
                let status = (!status.is_empty()).then_some(status.as_str());
                if let Err(e) = warden.afk().set_away(&Identity::player(name), status) {
                    warn!(error = %e, "afk rejected");
                }
            }
            ["status", name] => {
                let identity = Identity::player(name);
                println!(
                    "{identity}: afk={} status={:?}",
                    warden.afk().is_afk(&identity),
                    warden.afk().away_status(&identity)
                );
            }
            ["cooldowns", name] => {
                for (command, left) in warden.cooldowns().active_cooldowns(&Identity::player(name)) {
                    println!("  {command}: {}", warden::warden_cooldown::format_remaining(left));
                }
            }
            ["warmups", name] => {
                for (command, left) in warden.cooldowns().active_warmups(&Identity::player(name)) {
                    println!("  {command}: {}", warden::warden_cooldown::format_remaining(left));
                }
            }
            ["cancel", name, kind, command] => {
                let identity = Identity::player(name);
                let result = match *kind {
                    "cooldown" => warden.cooldowns().cancel_cooldown(&identity, command),
                    "warmup" => warden.cooldowns().cancel_warmup(&identity, command),
                    _ => {
                        println!("expected 'cooldown' or 'warmup'");
                        continue;
                    }
                };
                if let Err(e) = result {
                    println!("{e}");
                }
            }
            ["reload", path] => match WardenConfig::load(path).map_err(WardenError::from) {
                Ok(config) => match warden.reload(config) {
                    Ok(()) => info!(path, "config reloaded"),
                    Err(e) => warn!(error = %e, "reload rejected"),
                },
                Err(e) => warn!(error = %e, "reload failed"),
            },
            _ => println!("unknown command, try 'help'"),
        }
    }

    printer.abort();
    warden.shutdown().await
}
