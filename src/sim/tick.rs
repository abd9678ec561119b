//! Fixed timestep simulation tick
//!
//! Core game loop that advances the night deterministically.

use super::creature::Surroundings;
use super::night::{NightTransition, Outcome};
use super::player::MoveIntent;
use super::radio::Band;
use super::shop::{self, ShopItem};
use super::state::{GameEvent, GameState};
use crate::consts::*;
use crate::within_range;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Held movement keys
    pub movement: MoveIntent,
    /// Use whatever is in reach (supply hut, radio, console)
    pub interact: bool,
    /// Flashlight toggle
    pub toggle_flashlight: bool,
    /// Switch the band selector
    pub select_band: Option<Band>,
    /// Start the run over from night 1
    pub restart: bool,
    /// Shell wants to close
    pub quit: bool,
    /// Autopilot mode - the sim plays itself
    pub autopilot: bool,
}

/// Advance the game state by one timestep
///
/// `dt` is clamped to `[0, MAX_TICK_DT]`; a non-finite delta counts as zero.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    if input.quit {
        state.quit_requested = true;
    }

    if input.restart {
        state.restart();
        return;
    }

    // Victory and defeat freeze everything until a restart
    if state.is_terminal() {
        return;
    }

    let dt = if dt.is_finite() { dt.clamp(0.0, MAX_TICK_DT) } else { 0.0 };
    state.time_ticks += 1;

    let mut input = input.clone();
    if input.autopilot {
        drive_autopilot(state, &mut input);
    }

    // Discrete actions
    if let Some(band) = input.select_band {
        state.player.selected_band = band;
    }
    if input.toggle_flashlight {
        let on = state.player.toggle_flashlight();
        state.events.push(GameEvent::FlashlightToggled { on });
    }
    if input.interact {
        let event = interact(state);
        state.events.push(event);
    }

    let night = state.night.night;

    // Movement against the walls as they stand at the start of the tick
    state.player.step_movement(
        input.movement,
        &state.world,
        night,
        state.tuning.player_speed,
        dt,
    );

    state.world.advance(dt);

    let in_safe = state.in_safe_zone();
    let report = state.player.update_meters(night, in_safe, dt);
    if report.battery_died {
        state.events.push(GameEvent::BatteryDrained);
    }

    let view = Surroundings {
        player_pos: state.player.pos,
        flashlight_on: state.player.flashlight_on,
        player_in_safe: in_safe,
        time: state.world.time,
    };
    let contacts = state.night.creatures.update(
        &view,
        &mut state.player,
        &state.tuning,
        &mut state.rng,
        dt,
    );
    for contact in contacts {
        state.events.push(GameEvent::CreatureHit {
            kind: contact.kind,
            health_damage: contact.health_damage,
            sanity_damage: contact.sanity_damage,
            ward_used: contact.ward_used,
        });
    }

    state.night.tick_objective(
        dt,
        &state.world,
        &state.tuning,
        &mut state.rng,
        &mut state.events,
    );
    let transition = state
        .night
        .tick_countdown(dt, &mut state.rng, &mut state.events);

    // Death wins over anything the countdown decided this tick
    if state.player.is_dead() {
        state.night.outcome = Outcome::Defeat;
        state.events.push(GameEvent::Defeat);
        log::info!(
            "Defeat on night {} (health {:.1}, sanity {:.1})",
            night,
            state.player.health.current(),
            state.player.sanity.current()
        );
        return;
    }

    match transition {
        NightTransition::Continue => {}
        NightTransition::Advance(next) => state.start_night(next, false),
        NightTransition::Victory => {
            state.night.outcome = Outcome::Victory;
            state.events.push(GameEvent::Victory);
            log::info!("Victory: survived all {} nights", TOTAL_NIGHTS);
        }
    }
}

/// Route an interact press: supply hut, then radios, then the lift console
fn interact(state: &mut GameState) -> GameEvent {
    let pos = state.player.pos;
    let band = state.player.selected_band;

    if state
        .world
        .supply_huts
        .iter()
        .any(|hut| within_range(pos, *hut, INTERACT_RANGE))
    {
        let item = ShopItem::for_band(band);
        return match shop::purchase(item, &mut state.player, &mut state.night, &state.tuning) {
            Ok(receipt) => GameEvent::Purchased {
                item,
                cost: receipt.cost,
            },
            Err(err) => {
                log::debug!("Purchase refused: {}", err);
                GameEvent::PurchaseRefused {
                    item,
                    cost: item.cost(&state.tuning),
                    shortfall: err.shortfall(),
                }
            }
        };
    }

    let node = state
        .world
        .radios
        .iter()
        .find(|radio| within_range(pos, radio.pos, INTERACT_RANGE))
        .map(|radio| radio.index);
    if let Some(node) = node {
        return state.night.interact_radio(
            node,
            band,
            &mut state.player,
            &mut state.world,
            &state.tuning,
            &mut state.rng,
        );
    }

    if (pos.x - CONSOLE_X).abs() < INTERACT_RANGE {
        GameEvent::ConsoleStatus
    } else {
        GameEvent::NothingToInteract
    }
}

/// Fill `input` for autopilot play
///
/// Chases the live radio on its band; otherwise shelters in the nearest
/// sanctuary with the flashlight off.
fn drive_autopilot(state: &GameState, input: &mut TickInput) {
    let pos = state.player.pos;

    let target = match state.night.radio.active() {
        Some(signal) => {
            if state.player.selected_band != signal.target_band {
                input.select_band = Some(signal.target_band);
            }
            state.world.radios.get(signal.node).map(|radio| {
                // Press once the tuned band is in place
                input.interact = within_range(pos, radio.pos, INTERACT_RANGE - 10.0)
                    && state.player.selected_band == signal.target_band;
                radio.pos
            })
        }
        None => state
            .safe_zone
            .sanctuaries
            .iter()
            .copied()
            .min_by(|a, b| {
                a.distance_squared(pos)
                    .partial_cmp(&b.distance_squared(pos))
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
    };

    let in_safe = state.in_safe_zone();
    let want_light = !in_safe && state.player.battery.current() > 20.0;
    input.toggle_flashlight = state.player.flashlight_on != want_light;

    let Some(target) = target else {
        return;
    };
    let delta = target - pos;
    let mut movement = MoveIntent {
        left: delta.x < -4.0,
        right: delta.x > 4.0,
        ..Default::default()
    };

    if delta.x.abs() > 30.0 {
        // Sweep up and down so dividers eventually line up with a gap
        let sweep = (state.time_ticks as f32 * 0.02).sin();
        movement.up = sweep > 0.0;
        movement.down = sweep <= 0.0;
    } else {
        movement.up = delta.y < -4.0;
        movement.down = delta.y > 4.0;
    }
    input.movement = movement;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::creature::CreatureKind;
    use crate::sim::radio::{ActiveSignal, RadioObjective};
    use glam::Vec2;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn force_active(state: &mut GameState, node: usize, band: Band, presses: u8) {
        state.night.radio = RadioObjective::Active(ActiveSignal {
            node,
            target_band: band,
            time_left: 30.0,
            presses_needed: presses,
            presses_done: 0,
        });
    }

    fn press() -> TickInput {
        TickInput {
            interact: true,
            ..Default::default()
        }
    }

    fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    #[test]
    fn test_wrong_band_keeps_timer() {
        let mut state = GameState::new(12345);
        force_active(&mut state, 0, Band::Fm, 2);
        state.player.pos = state.world.radios[0].pos;
        state.player.selected_band = Band::Am;

        tick(&mut state, &press(), DT);

        assert!(state.events.contains(&GameEvent::WrongBand {
            target: Band::Fm,
            presses_needed: 2
        }));
        let signal = state.night.radio.active().expect("still active");
        assert_eq!(signal.presses_done, 0);
        // Only the normal tick countdown, no penalty
        assert!((signal.time_left - (30.0 - DT)).abs() < 1e-4);
    }

    #[test]
    fn test_single_success_event() {
        let mut state = GameState::new(12345);
        force_active(&mut state, 1, Band::Ghostband, 2);
        state.player.pos = state.world.radios[1].pos;

        let tune = TickInput {
            select_band: Some(Band::Ghostband),
            interact: true,
            ..Default::default()
        };
        tick(&mut state, &tune, DT);
        assert!(state.events.contains(&GameEvent::SignalLocking { remaining: 1 }));

        let mut stabilized = 0;
        for _ in 0..5 {
            tick(&mut state, &press(), DT);
            stabilized += count(&state.events, |e| {
                matches!(e, GameEvent::RadioStabilized { .. })
            });
        }
        assert_eq!(stabilized, 1);
        assert_eq!(state.night.radios_completed, 1);
        assert_eq!(state.player.credits, 35 + 10);
        assert!(state.world.doors_open());
    }

    #[test]
    fn test_missed_window_spawns_all_archetypes_at_once() {
        let mut state = GameState::new(777);
        force_active(&mut state, 2, Band::Am, 3);
        if let RadioObjective::Active(signal) = &mut state.night.radio {
            signal.time_left = 0.01;
        }

        tick(&mut state, &TickInput::default(), DT);

        assert!(state.night.failed);
        assert_eq!(state.night.creatures.len(), 3);
        for kind in CreatureKind::ALL {
            assert_eq!(state.night.creatures.count(kind), 1);
        }
        assert!(state.events.contains(&GameEvent::RadioFailed { node: 2 }));
        assert_eq!(
            count(&state.events, |e| matches!(e, GameEvent::CreatureSpawned { .. })),
            3
        );
    }

    #[test]
    fn test_countdown_advances_night() {
        let mut state = GameState::new(5);
        state.player.health.set(70.0);
        state.player.sanity.set(30.0);
        state.player.battery.set(20.0);
        state.player.pos.x = 300.0;
        state.night.time_left = 0.01;
        state.night.failed = true;
        state.night.creatures.spawn(None, 1, &mut state.rng);

        tick(&mut state, &TickInput::default(), DT);

        assert_eq!(state.night.night, 2);
        assert_eq!(state.night.time_left, 180.0);
        assert!(!state.night.failed);
        assert!(state.night.creatures.is_empty());
        assert_eq!(state.player.pos, Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y));
        // Restores land on top of this tick's drain
        assert!(state.player.health.current() > 89.0);
        assert!(state.player.sanity.current() > 55.0);
        assert!(state.player.battery.current() > 54.0);
        assert!(state.events.contains(&GameEvent::NightStarted {
            night: 2,
            required_radios: 3
        }));
    }

    #[test]
    fn test_final_night_ends_in_victory() {
        let mut state = GameState::new(5);
        state.start_night(7, false);
        state.night.time_left = 0.01;

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.outcome(), Outcome::Victory);
        assert!(state.events.contains(&GameEvent::Victory));
    }

    #[test]
    fn test_death_overrides_victory() {
        let mut state = GameState::new(5);
        state.start_night(7, false);
        state.night.time_left = 0.01;
        state.player.sanity.set(0.0);

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(state.outcome(), Outcome::Defeat);
        assert!(state.events.contains(&GameEvent::Defeat));
        assert!(!state.events.contains(&GameEvent::Victory));
    }

    #[test]
    fn test_terminal_state_ignores_input() {
        let mut state = GameState::new(5);
        state.night.outcome = Outcome::Defeat;
        let ticks = state.time_ticks;
        let pos = state.player.pos;
        let time_left = state.night.time_left;

        let input = TickInput {
            movement: MoveIntent {
                right: true,
                ..Default::default()
            },
            toggle_flashlight: true,
            select_band: Some(Band::Ghostband),
            interact: true,
            ..Default::default()
        };
        tick(&mut state, &input, DT);

        assert_eq!(state.time_ticks, ticks);
        assert_eq!(state.player.pos, pos);
        assert_eq!(state.night.time_left, time_left);
        assert_eq!(state.player.selected_band, Band::Am);
        assert!(state.player.flashlight_on);
        assert!(state.events.is_empty());

        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart, DT);
        assert_eq!(state.outcome(), Outcome::Ongoing);
        assert!(state.events.contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_dt_is_clamped() {
        let mut state = GameState::new(8);
        tick(&mut state, &TickInput::default(), 1.0);
        assert!((state.night.time_left - (180.0 - MAX_TICK_DT)).abs() < 1e-4);

        let before = state.night.time_left;
        tick(&mut state, &TickInput::default(), f32::NAN);
        tick(&mut state, &TickInput::default(), -3.0);
        assert_eq!(state.night.time_left, before);
    }

    #[test]
    fn test_supply_hut_takes_priority() {
        let mut state = GameState::new(9);
        state.player.pos = state.world.supply_huts[0];
        state.player.battery.set(50.0);

        let buy = TickInput {
            select_band: Some(Band::Fm),
            interact: true,
            ..Default::default()
        };
        tick(&mut state, &buy, DT);
        assert!(state.events.contains(&GameEvent::Purchased {
            item: ShopItem::BatteryCell,
            cost: 18
        }));
        assert_eq!(state.player.credits, 17);

        tick(&mut state, &buy, DT);
        assert!(state.events.contains(&GameEvent::PurchaseRefused {
            item: ShopItem::BatteryCell,
            cost: 18,
            shortfall: 1
        }));
        assert_eq!(state.player.credits, 17);
    }

    #[test]
    fn test_console_and_empty_interact() {
        let mut state = GameState::new(10);
        state.player.pos = Vec2::new(CONSOLE_X, FLOOR_Y - 100.0);
        tick(&mut state, &press(), DT);
        assert!(state.events.contains(&GameEvent::ConsoleStatus));

        state.player.pos = Vec2::new(PLAYER_SPAWN_X, PLAYER_SPAWN_Y);
        tick(&mut state, &press(), DT);
        assert!(state.events.contains(&GameEvent::NothingToInteract));
    }

    #[test]
    fn test_radio_warming_up_before_first_signal() {
        let mut state = GameState::new(11);
        state.player.pos = state.world.radios[0].pos;
        tick(&mut state, &press(), DT);
        assert!(state.events.contains(&GameEvent::RadioWarmingUp));
    }

    #[test]
    fn test_sanctuary_blocks_contact() {
        let mut state = GameState::new(12);
        state.player.pos = state.world.booths[0];
        state.night.creatures.spawn(Some(CreatureKind::Stalker), 1, &mut state.rng);
        state.night.creatures.enemies[0].pos = state.player.pos;

        tick(&mut state, &TickInput::default(), DT);
        assert_eq!(
            count(&state.events, |e| matches!(e, GameEvent::CreatureHit { .. })),
            0
        );

        let mut exposed = GameState::new(12);
        exposed
            .night
            .creatures
            .spawn(Some(CreatureKind::Stalker), 1, &mut exposed.rng);
        exposed.night.creatures.enemies[0].pos = exposed.player.pos;

        tick(&mut exposed, &TickInput::default(), DT);
        assert_eq!(
            count(&exposed.events, |e| matches!(e, GameEvent::CreatureHit { .. })),
            1
        );
        assert!(exposed.player.health.current() < 100.0);
    }

    #[test]
    fn test_flashlight_toggle_event() {
        let mut state = GameState::new(13);
        let toggle = TickInput {
            toggle_flashlight: true,
            ..Default::default()
        };
        tick(&mut state, &toggle, DT);
        assert!(state.events.contains(&GameEvent::FlashlightToggled { on: false }));
        assert!(!state.player.flashlight_on);
    }

    #[test]
    fn test_autopilot_tunes_live_radio() {
        let mut state = GameState::new(14);
        force_active(&mut state, 0, Band::Ghostband, 1);
        let auto = TickInput {
            autopilot: true,
            ..Default::default()
        };
        tick(&mut state, &auto, DT);
        assert_eq!(state.player.selected_band, Band::Ghostband);
        // Radio 1 is to the right of spawn
        assert!(state.player.pos.x > PLAYER_SPAWN_X);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);

        for i in 0..3000u32 {
            let input = TickInput {
                movement: MoveIntent {
                    right: i % 400 < 200,
                    left: i % 400 >= 200,
                    up: i % 90 < 30,
                    ..Default::default()
                },
                interact: i % 25 == 0,
                select_band: Some(Band::ALL[(i / 100) as usize % 3]),
                toggle_flashlight: i % 500 == 0,
                ..Default::default()
            };
            tick(&mut state1, &input, DT);
            tick(&mut state2, &input, DT);
        }

        assert_eq!(state1.time_ticks, state2.time_ticks);
        assert_eq!(state1.snapshot(), state2.snapshot());
    }

    proptest! {
        #[test]
        fn prop_tick_keeps_invariants(
            steps in prop::collection::vec(
                (any::<[bool; 4]>(), any::<bool>(), any::<bool>(), 0u8..4, -0.1f32..0.2),
                1..400,
            ),
        ) {
            let mut state = GameState::new(4242);
            let mut last_night = state.night.night;
            for ([up, down, left, right], interact, toggle, band, dt) in steps {
                let input = TickInput {
                    movement: MoveIntent { up, down, left, right },
                    interact,
                    toggle_flashlight: toggle,
                    select_band: Band::ALL.get(band as usize).copied(),
                    ..Default::default()
                };
                tick(&mut state, &input, dt);

                for meter in [state.player.health, state.player.sanity, state.player.battery] {
                    prop_assert!(meter.current() >= 0.0);
                    prop_assert!(meter.current() <= meter.max());
                }
                prop_assert!(state.night.night >= last_night);
                prop_assert!((1..=TOTAL_NIGHTS).contains(&state.night.night));
                prop_assert!(state.player.pos.x >= PLAYER_MIN_X && state.player.pos.x <= PLAYER_MAX_X);
                prop_assert!(state.night.time_left <= state.tuning.night_time_cap());
                last_night = state.night.night;
            }
        }
    }
}
