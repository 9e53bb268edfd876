//! Unified error type for Warden.

use warden_afk::AfkError;
use warden_cooldown::CooldownError;
use warden_tick::TickError;

use crate::ConfigError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `warden` meta-crate, you deal with this single error
/// type instead of importing errors from each sub-crate. The `#[from]`
/// attribute on each variant auto-generates `From` impls, so the `?`
/// operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum WardenError {
    /// Configuration could not be read, parsed, or was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A tick driver failed to start or stop.
    #[error(transparent)]
    Tick(#[from] TickError),

    /// An AFK request was rejected.
    #[error(transparent)]
    Afk(#[from] AfkError),

    /// A cooldown/warmup management operation found nothing to act on.
    #[error(transparent)]
    Cooldown(#[from] CooldownError),
}

#[cfg(test)]
mod tests {
    use warden_cooldown::LimitKind;
    use warden_host::Identity;

    use super::*;

    #[test]
    fn test_from_config_error() {
        let err = ConfigError::Invalid("bad".into());
        let warden_err: WardenError = err.into();
        assert!(matches!(warden_err, WardenError::Config(_)));
        assert!(warden_err.to_string().contains("bad"));
    }

    #[test]
    fn test_from_tick_error() {
        let err = TickError::NotRunning("sweeps");
        let warden_err: WardenError = err.into();
        assert!(matches!(warden_err, WardenError::Tick(_)));
        assert!(warden_err.to_string().contains("sweeps"));
    }

    #[test]
    fn test_from_afk_error() {
        let err = AfkError::NotAPlayer(Identity::console());
        let warden_err: WardenError = err.into();
        assert!(matches!(warden_err, WardenError::Afk(_)));
        assert_eq!(warden_err.to_string(), "#console is not a player");
    }

    #[test]
    fn test_from_cooldown_error() {
        let err = CooldownError::NoneActive {
            kind: LimitKind::Warmup,
            command: "heal".into(),
        };
        let warden_err: WardenError = err.into();
        assert!(matches!(warden_err, WardenError::Cooldown(_)));
        assert_eq!(warden_err.to_string(), "No warmup for input heal");
    }
}
