//! Integration tests for the cooldown/warmup engine.
//!
//! Sweeps are driven by hand: one `sweep_now()` call is one tick.

use std::sync::Arc;

use warden_cooldown::{
    CommandLimits, CooldownConfig, CooldownEngine, CooldownError, CooldownState, LimitKind,
};
use warden_host::{Identity, InMemoryHost};
use warden_session::SessionRegistry;

// =========================================================================
// Helpers
// =========================================================================

struct Fixture {
    registry: Arc<SessionRegistry>,
    host: Arc<InMemoryHost>,
    engine: CooldownEngine<InMemoryHost>,
    steve: Identity,
}

fn limits(cooldown: Option<u32>, warmup: Option<u32>) -> CommandLimits {
    CommandLimits { cooldown, warmup }
}

fn fixture() -> Fixture {
    let config = CooldownConfig::empty()
        .with_command("jump", limits(Some(5), None))
        .with_command("heal", limits(None, Some(3)))
        .with_command("home", limits(Some(2), Some(2)));
    let registry = Arc::new(SessionRegistry::new());
    let host = Arc::new(InMemoryHost::new(20));
    let engine = CooldownEngine::new(&registry, Arc::clone(&host), config);
    let steve = Identity::player("Steve");
    host.connect(&steve);
    Fixture {
        registry,
        host,
        engine,
        steve,
    }
}

fn ticks(f: &Fixture, n: usize) {
    for _ in 0..n {
        f.engine.sweep_now();
    }
}

fn cooldown_elapsed(f: &Fixture, command: &str) -> Option<u32> {
    f.registry
        .store::<CooldownState>()
        .get(&f.steve)
        .and_then(|handle| handle.lock().cooldown_elapsed(command))
}

fn warmup_elapsed(f: &Fixture, command: &str) -> Option<u32> {
    f.registry
        .store::<CooldownState>()
        .get(&f.steve)
        .and_then(|handle| handle.lock().warmup_elapsed(command))
}

// =========================================================================
// Cooldown
// =========================================================================

#[test]
fn test_check_cooldown_unconfigured_passes() {
    let f = fixture();
    assert!(f.engine.check_cooldown(&f.steve, "/spawn"));
    assert!(f.host.messages_for(&f.steve).is_empty());
}

#[test]
fn test_check_cooldown_first_use_is_refused() {
    let f = fixture();

    assert!(!f.engine.check_cooldown(&f.steve, "/jump high"));

    assert_eq!(
        f.host.messages_for(&f.steve),
        vec!["The command 'jump' has a remaining cooldown of 00:05 seconds."]
    );
    assert_eq!(cooldown_elapsed(&f, "jump"), Some(0));
}

#[test]
fn test_check_cooldown_passes_after_exactly_required_ticks() {
    let f = fixture();
    assert!(!f.engine.check_cooldown(&f.steve, "jump"));

    ticks(&f, 4);
    assert!(!f.engine.check_cooldown(&f.steve, "jump"), "one tick short");

    ticks(&f, 1);
    assert!(f.engine.check_cooldown(&f.steve, "jump"));
    assert_eq!(cooldown_elapsed(&f, "jump"), None, "counter removed on pass");
}

#[test]
fn test_check_cooldown_counter_saturates_at_required() {
    let f = fixture();
    f.engine.check_cooldown(&f.steve, "jump");

    ticks(&f, 50);

    assert_eq!(cooldown_elapsed(&f, "jump"), Some(5));
}

#[test]
fn test_check_cooldown_override_passes_and_resets() {
    let f = fixture();
    f.engine.check_cooldown(&f.steve, "jump");
    ticks(&f, 2);
    f.host.grant(&f.steve, "warden.cooldown.override.jump");

    assert!(f.engine.check_cooldown(&f.steve, "jump"));
    assert_eq!(cooldown_elapsed(&f, "jump"), None);
}

#[test]
fn test_check_cooldown_override_on_first_use_passes() {
    let f = fixture();
    f.host.grant(&f.steve, "warden.cooldown.override.jump");

    assert!(f.engine.check_cooldown(&f.steve, "/jump"));
    assert_eq!(cooldown_elapsed(&f, "jump"), None);
}

#[test]
fn test_check_cooldown_command_name_is_case_insensitive() {
    let f = fixture();
    f.engine.check_cooldown(&f.steve, "/JUMP");

    assert_eq!(cooldown_elapsed(&f, "jump"), Some(0));
}

// =========================================================================
// Warmup
// =========================================================================

#[test]
fn test_check_warmup_first_use_is_held() {
    let f = fixture();

    assert!(!f.engine.check_warmup(&f.steve, "/heal Alex"));

    assert_eq!(
        f.host.messages_for(&f.steve),
        vec!["Warmup started for command 'heal', time remaining: 00:03 seconds"]
    );
    assert_eq!(warmup_elapsed(&f, "heal"), Some(0));
}

#[test]
fn test_warmup_replays_exactly_once_after_required_ticks() {
    let f = fixture();
    f.engine.check_warmup(&f.steve, "/heal Alex");

    ticks(&f, 2);
    assert!(f.host.dispatched().is_empty());

    ticks(&f, 1);
    assert_eq!(f.host.dispatched(), vec![(f.steve.clone(), "heal Alex".to_string())]);

    ticks(&f, 10);
    assert_eq!(f.host.dispatched().len(), 1, "fires once");
    assert_eq!(warmup_elapsed(&f, "heal"), None);
}

#[test]
fn test_warmup_after_replay_starts_fresh() {
    let f = fixture();
    f.engine.check_warmup(&f.steve, "heal");
    ticks(&f, 3);

    assert!(!f.engine.check_warmup(&f.steve, "heal"));
    assert_eq!(warmup_elapsed(&f, "heal"), Some(0));
}

#[test]
fn test_check_warmup_same_line_is_silent_and_does_not_restart() {
    let f = fixture();
    f.engine.check_warmup(&f.steve, "/heal Alex");
    ticks(&f, 2);
    f.host.take_messages();

    assert!(!f.engine.check_warmup(&f.steve, "/heal Alex"));

    assert!(f.host.messages_for(&f.steve).is_empty());
    assert_eq!(warmup_elapsed(&f, "heal"), Some(2));
}

#[test]
fn test_check_warmup_different_line_points_to_cancel() {
    let f = fixture();
    f.engine.check_warmup(&f.steve, "/heal Alex");
    f.host.take_messages();

    assert!(!f.engine.check_warmup(&f.steve, "/heal Steve"));

    assert_eq!(
        f.host.messages_for(&f.steve),
        vec![
            "You are trying to use the command 'heal Steve', which already has a warmup \
             in progress. Type /warmup cancel heal to cancel the existing warmup"
        ]
    );
}

#[test]
fn test_check_warmup_override_passes() {
    let f = fixture();
    f.host.grant(&f.steve, "warden.warmup.override.heal");

    assert!(f.engine.check_warmup(&f.steve, "/heal"));
    assert_eq!(warmup_elapsed(&f, "heal"), None);
}

#[test]
fn test_warmup_discarded_when_owner_disconnected() {
    let f = fixture();
    f.engine.check_warmup(&f.steve, "/heal");
    f.registry.handle_disconnect(&f.steve);

    ticks(&f, 3);

    assert!(f.host.dispatched().is_empty());
    assert_eq!(warmup_elapsed(&f, "heal"), None);
}

// =========================================================================
// Admission
// =========================================================================

#[test]
fn test_admit_cooldown_refusal_skips_warmup() {
    let f = fixture();

    assert!(!f.engine.admit(&f.steve, "/home"));

    assert_eq!(cooldown_elapsed(&f, "home"), Some(0));
    assert_eq!(warmup_elapsed(&f, "home"), None);
}

#[test]
fn test_admit_runs_both_gates() {
    let f = fixture();
    f.engine.admit(&f.steve, "/home");
    ticks(&f, 2);

    // Cooldown passes, warmup holds the command.
    assert!(!f.engine.admit(&f.steve, "/home"));
    assert_eq!(cooldown_elapsed(&f, "home"), None);
    assert_eq!(warmup_elapsed(&f, "home"), Some(0));

    ticks(&f, 2);
    assert_eq!(f.host.dispatched(), vec![(f.steve.clone(), "home".to_string())]);
}

#[test]
fn test_admit_unlimited_command_passes() {
    let f = fixture();
    assert!(f.engine.admit(&f.steve, "/spawn"));
}

// =========================================================================
// Config reload and pruning
// =========================================================================

#[test]
fn test_reload_prunes_unconfigured_counters_on_next_tick() {
    let f = fixture();
    f.engine.check_cooldown(&f.steve, "jump");
    f.engine.check_warmup(&f.steve, "heal");

    f.engine.reload(CooldownConfig::empty());
    ticks(&f, 1);

    assert_eq!(cooldown_elapsed(&f, "jump"), None);
    assert_eq!(warmup_elapsed(&f, "heal"), None);
    assert!(f.host.dispatched().is_empty());
}

#[test]
fn test_reload_unconfigured_command_now_passes() {
    let f = fixture();
    f.engine.check_cooldown(&f.steve, "jump");

    f.engine.reload(CooldownConfig::empty());

    assert!(f.engine.check_cooldown(&f.steve, "jump"));
}

// =========================================================================
// Management
// =========================================================================

#[test]
fn test_active_cooldowns_lists_remaining() {
    let f = fixture();
    f.engine.check_cooldown(&f.steve, "jump");
    f.engine.check_cooldown(&f.steve, "home");
    ticks(&f, 1);

    assert_eq!(
        f.engine.active_cooldowns(&f.steve),
        vec![("home".to_string(), 1), ("jump".to_string(), 4)]
    );
}

#[test]
fn test_active_warmups_lists_remaining() {
    let f = fixture();
    f.engine.check_warmup(&f.steve, "/heal Alex");
    ticks(&f, 1);

    assert_eq!(f.engine.active_warmups(&f.steve), vec![("heal".to_string(), 2)]);
}

#[test]
fn test_active_lists_unknown_identity_empty() {
    let f = fixture();
    let nobody = Identity::player("Nobody");
    assert!(f.engine.active_cooldowns(&nobody).is_empty());
    assert!(f.engine.active_warmups(&nobody).is_empty());
}

#[test]
fn test_cancel_warmup_prevents_replay() {
    let f = fixture();
    f.engine.check_warmup(&f.steve, "/heal Alex");
    f.host.take_messages();

    f.engine.cancel_warmup(&f.steve, "heal").unwrap();
    ticks(&f, 5);

    assert!(f.host.dispatched().is_empty());
    assert_eq!(
        f.host.messages_for(&f.steve),
        vec!["Warmup for command 'heal' removed."]
    );
}

#[test]
fn test_cancel_cooldown_removes_counter() {
    let f = fixture();
    f.engine.check_cooldown(&f.steve, "jump");

    f.engine.cancel_cooldown(&f.steve, "Jump").unwrap();

    assert_eq!(cooldown_elapsed(&f, "jump"), None);
}

#[test]
fn test_cancel_nothing_tracked_returns_none_active() {
    let f = fixture();

    let err = f.engine.cancel_cooldown(&f.steve, "jump").unwrap_err();

    assert!(matches!(
        &err,
        CooldownError::NoneActive { kind: LimitKind::Cooldown, command } if command == "jump"
    ));
    assert_eq!(err.to_string(), "No cooldown for input jump");
}

// =========================================================================
// Concurrency
// =========================================================================

const PLAYER_THREADS: usize = 4;
const SWEEP_THREADS: usize = 2;
const ROUNDS: usize = 500;

#[test]
fn test_check_warmup_racing_sweeps_replays_each_warmup_once() {
    let f = fixture();

    let fired: usize = std::thread::scope(|scope| {
        for _ in 0..PLAYER_THREADS {
            scope.spawn(|| {
                for _ in 0..ROUNDS {
                    f.engine.check_warmup(&f.steve, "/heal");
                }
            });
        }
        let sweepers: Vec<_> = (0..SWEEP_THREADS)
            .map(|_| scope.spawn(|| (0..ROUNDS).map(|_| f.engine.sweep_now()).sum::<usize>()))
            .collect();
        sweepers.into_iter().map(|t| t.join().unwrap()).sum()
    });

    let started = f
        .host
        .messages_for(&f.steve)
        .iter()
        .filter(|text| text.starts_with("Warmup started"))
        .count();
    let pending = f.engine.active_warmups(&f.steve).len();

    assert_eq!(f.host.dispatched().len(), fired);
    assert!(f.host.dispatched().iter().all(|(_, line)| line == "heal"));
    // Every warmup that was started is either replayed once or still held.
    assert_eq!(started, fired + pending);
}

#[test]
fn test_check_cooldown_racing_sweeps_never_passes_early() {
    let f = fixture();

    let passes: usize = std::thread::scope(|scope| {
        let players: Vec<_> = (0..PLAYER_THREADS)
            .map(|_| {
                scope.spawn(|| {
                    (0..ROUNDS)
                        .filter(|_| f.engine.check_cooldown(&f.steve, "/jump"))
                        .count()
                })
            })
            .collect();
        for _ in 0..SWEEP_THREADS {
            scope.spawn(|| ticks(&f, ROUNDS));
        }
        players.into_iter().map(|t| t.join().unwrap()).sum()
    });

    // Each pass needs five ticks after the counter was started.
    assert!(passes <= SWEEP_THREADS * ROUNDS / 5, "{passes} passes");
    assert!(cooldown_elapsed(&f, "jump").is_none_or(|elapsed| elapsed <= 5));
}
