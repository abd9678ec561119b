//! Radio tuning objective
//!
//! At most one radio task exists at a time. It sleeps for a random delay,
//! then lights up a random radio node with a target band and a number of
//! confirmation presses. Stabilizing it in time pays out; missing the window
//! takes the radio network offline for the rest of the night.
//!
//! ```text
//! Dormant(delay) --delay expires--> Active --presses met--> Dormant(new delay)
//!                                     |
//!                                     +--time_left hits 0--> Offline
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Radio band; also doubles as the supply hut menu key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Band {
    #[default]
    Am,
    Fm,
    Ghostband,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Am, Band::Fm, Band::Ghostband];

    pub fn as_str(&self) -> &'static str {
        match self {
            Band::Am => "AM",
            Band::Fm => "FM",
            Band::Ghostband => "Ghostband",
        }
    }

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl std::fmt::Display for Band {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A live radio task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveSignal {
    /// Index of the radio node that is live
    pub node: usize,
    pub target_band: Band,
    pub time_left: f32,
    /// 1..=3
    pub presses_needed: u8,
    pub presses_done: u8,
}

impl ActiveSignal {
    pub fn presses_remaining(&self) -> u8 {
        self.presses_needed.saturating_sub(self.presses_done)
    }
}

/// Objective state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RadioObjective {
    /// Waiting to go live
    Dormant { delay: f32 },
    Active(ActiveSignal),
    /// Window missed; nothing more is offered tonight
    Offline,
}

/// What happened to the objective during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum RadioTick {
    Quiet,
    /// A node went live
    Activated {
        node: usize,
        band: Band,
        presses_needed: u8,
    },
    /// The window ran out on `node`
    Failed { node: usize },
}

/// Response to the player interacting with a radio node
#[derive(Debug, Clone, PartialEq)]
pub enum RadioResponse {
    /// No task is live yet
    WarmingUp,
    /// Radio network is down for the night
    Offline,
    /// This node is not the live one
    IdleNode { node: usize },
    /// Correct band, more presses needed
    Locking { remaining: u8 },
    /// Wrong band; press count starts over
    WrongBand { target: Band, presses_needed: u8 },
    /// Task complete; a fresh dormant task has been rolled
    Stabilized { node: usize },
}

impl RadioObjective {
    /// Fresh dormant objective with a delay in [min, min + jitter)
    pub fn dormant(tuning: &Tuning, rng: &mut impl Rng) -> Self {
        let jitter = if tuning.radio_delay_jitter > 0.0 {
            rng.random_range(0.0..tuning.radio_delay_jitter)
        } else {
            0.0
        };
        RadioObjective::Dormant {
            delay: tuning.radio_delay_min + jitter,
        }
    }

    /// Light up a random node
    pub fn activate(node_count: usize, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        RadioObjective::Active(ActiveSignal {
            node: rng.random_range(0..node_count.max(1)),
            target_band: Band::random(rng),
            time_left: tuning.radio_window,
            presses_needed: rng.random_range(1..=3),
            presses_done: 0,
        })
    }

    pub fn active(&self) -> Option<&ActiveSignal> {
        match self {
            RadioObjective::Active(signal) => Some(signal),
            _ => None,
        }
    }

    pub fn is_offline(&self) -> bool {
        matches!(self, RadioObjective::Offline)
    }

    /// Count down the dormant delay or the active window
    pub fn tick(&mut self, dt: f32, node_count: usize, tuning: &Tuning, rng: &mut impl Rng) -> RadioTick {
        match self {
            RadioObjective::Dormant { delay } => {
                *delay = (*delay - dt).max(0.0);
                if *delay > 0.0 {
                    return RadioTick::Quiet;
                }
                *self = Self::activate(node_count, tuning, rng);
                match self {
                    RadioObjective::Active(signal) => RadioTick::Activated {
                        node: signal.node,
                        band: signal.target_band,
                        presses_needed: signal.presses_needed,
                    },
                    _ => RadioTick::Quiet,
                }
            }
            RadioObjective::Active(signal) => {
                signal.time_left = (signal.time_left - dt).max(0.0);
                if signal.time_left > 0.0 {
                    return RadioTick::Quiet;
                }
                let node = signal.node;
                *self = RadioObjective::Offline;
                RadioTick::Failed { node }
            }
            RadioObjective::Offline => RadioTick::Quiet,
        }
    }

    /// Player pressed interact within range of radio node `node` with `band` selected
    pub fn interact(&mut self, node: usize, band: Band, tuning: &Tuning, rng: &mut impl Rng) -> RadioResponse {
        let signal = match self {
            RadioObjective::Dormant { .. } => return RadioResponse::WarmingUp,
            RadioObjective::Offline => return RadioResponse::Offline,
            RadioObjective::Active(signal) => signal,
        };

        if signal.node != node {
            return RadioResponse::IdleNode { node };
        }

        if band != signal.target_band {
            signal.presses_done = 0;
            return RadioResponse::WrongBand {
                target: signal.target_band,
                presses_needed: signal.presses_needed,
            };
        }

        signal.presses_done = (signal.presses_done + 1).min(signal.presses_needed);
        if signal.presses_done < signal.presses_needed {
            return RadioResponse::Locking {
                remaining: signal.presses_remaining(),
            };
        }

        let node = signal.node;
        *self = Self::dormant(tuning, rng);
        RadioResponse::Stabilized { node }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn active(node: usize, band: Band, presses: u8) -> RadioObjective {
        RadioObjective::Active(ActiveSignal {
            node,
            target_band: band,
            time_left: 30.0,
            presses_needed: presses,
            presses_done: 0,
        })
    }

    #[test]
    fn test_dormant_delay_range() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            match RadioObjective::dormant(&tuning, &mut rng) {
                RadioObjective::Dormant { delay } => assert!((10.0..14.0).contains(&delay)),
                other => panic!("expected dormant, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_activation_rolls_valid_task() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..200 {
            let mut radio = RadioObjective::Dormant { delay: 0.01 };
            let result = radio.tick(0.05, 3, &tuning, &mut rng);
            assert!(matches!(result, RadioTick::Activated { .. }));
            let signal = radio.active().expect("active after delay");
            assert!(signal.node < 3);
            assert!((1..=3).contains(&signal.presses_needed));
            assert_eq!(signal.presses_done, 0);
            assert_eq!(signal.time_left, 30.0);
        }
    }

    #[test]
    fn test_wrong_band_resets_presses_without_touching_timer() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut radio = active(1, Band::Fm, 3);

        assert_eq!(
            radio.interact(1, Band::Fm, &tuning, &mut rng),
            RadioResponse::Locking { remaining: 2 }
        );
        radio.tick(1.5, 3, &tuning, &mut rng);
        let before = radio.active().unwrap().time_left;

        let response = radio.interact(1, Band::Ghostband, &tuning, &mut rng);
        assert_eq!(
            response,
            RadioResponse::WrongBand {
                target: Band::Fm,
                presses_needed: 3
            }
        );
        let signal = radio.active().unwrap();
        assert_eq!(signal.presses_done, 0);
        assert_eq!(signal.time_left, before);
    }

    #[test]
    fn test_success_rolls_new_dormant() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut radio = active(2, Band::Am, 2);

        assert!(matches!(
            radio.interact(2, Band::Am, &tuning, &mut rng),
            RadioResponse::Locking { remaining: 1 }
        ));
        assert_eq!(
            radio.interact(2, Band::Am, &tuning, &mut rng),
            RadioResponse::Stabilized { node: 2 }
        );
        match radio {
            RadioObjective::Dormant { delay } => assert!((10.0..14.0).contains(&delay)),
            ref other => panic!("expected dormant, got {:?}", other),
        }

        // A further press finds the network warming up, not a second success
        assert_eq!(
            radio.interact(2, Band::Am, &tuning, &mut rng),
            RadioResponse::WarmingUp
        );
    }

    #[test]
    fn test_idle_node_is_rejected() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut radio = active(0, Band::Am, 1);
        assert_eq!(
            radio.interact(2, Band::Am, &tuning, &mut rng),
            RadioResponse::IdleNode { node: 2 }
        );
        assert_eq!(radio.active().unwrap().presses_done, 0);
    }

    #[test]
    fn test_window_expiry_goes_offline() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(9);
        let mut radio = active(1, Band::Fm, 2);

        assert_eq!(radio.tick(29.9, 3, &tuning, &mut rng), RadioTick::Quiet);
        assert_eq!(radio.tick(0.2, 3, &tuning, &mut rng), RadioTick::Failed { node: 1 });
        assert!(radio.is_offline());

        // Offline stays offline
        assert_eq!(radio.tick(100.0, 3, &tuning, &mut rng), RadioTick::Quiet);
        assert_eq!(
            radio.interact(1, Band::Fm, &tuning, &mut rng),
            RadioResponse::Offline
        );
    }
}
