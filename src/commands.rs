//! Point-gated command economy
//!
//! Commands are plain text pulled out of comments: `name argument...`.
//! A command only takes effect when the ledger debit for its configured
//! cost succeeds. A refused or unrecognized command leaves no trace beyond
//! a log line: no partial debit, no effect emission.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::score::Ledger;

/// A parsed, not-yet-paid command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandRequest {
    pub user: String,
    /// Lowercased command name.
    pub name: String,
    /// Display argument, truncated to the configured length. May be empty.
    pub argument: String,
    pub avatar: Option<String>,
}

/// A validated, ledger-approved effect, ready for the rendering and audio
/// collaborators to realize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectRequest {
    pub user: String,
    pub command: String,
    pub argument: String,
    pub avatar: Option<String>,
}

/// Parse a comment into a command request if its first word is a configured
/// command name (matched case-insensitively). Returns `None` for ordinary
/// comments. The argument is display-only: it is truncated, never
/// interpreted.
pub fn parse(
    user: &str,
    text: &str,
    avatar: Option<String>,
    cfg: &GameConfig,
) -> Option<CommandRequest> {
    let trimmed = text.trim();
    let mut words = trimmed.splitn(2, char::is_whitespace);
    let name = words.next()?.to_lowercase();
    if !cfg.command_costs.contains_key(&name) {
        return None;
    }
    let argument: String = words
        .next()
        .unwrap_or("")
        .trim()
        .chars()
        .take(cfg.max_command_arg_len)
        .collect();
    Some(CommandRequest {
        user: user.to_owned(),
        name,
        argument,
        avatar,
    })
}

/// Execute a parsed command against the ledger.
///
/// The debit happens first and alone decides the outcome: only a successful
/// debit emits an effect. Unknown names are a silent no-op by design.
pub fn execute(
    req: CommandRequest,
    ledger: &mut Ledger,
    cfg: &GameConfig,
) -> Option<EffectRequest> {
    let Some(&cost) = cfg.command_costs.get(&req.name) else {
        log::debug!("ignoring unknown command {:?} from {}", req.name, req.user);
        return None;
    };
    if let Err(err) = ledger.debit(&req.user, cost) {
        log::info!("command {:?} from {} refused: {err}", req.name, req.user);
        return None;
    }
    log::info!("{} spent {cost} on {:?}", req.user, req.name);
    Some(EffectRequest {
        user: req.user,
        command: req.name,
        argument: req.argument,
        avatar: req.avatar,
    })
}
