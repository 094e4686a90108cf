// walls_bot/bot/src/systems/physics/practice.rs
//! Headless practice arena: one controlled bot against stationary opponents.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing::{debug, trace};

use super::collision::{bot_contact, clamp_to_arena};
use crate::core::config::{BotColors, PracticeConfig};
use crate::core::constants::*;
use crate::core::geometry::{advance, calc_delta_angle, calc_gun_heat, calc_max_turn_rate, direction_to, normalize_absolute_angle};
use crate::core::types::{BotEvent, BotId, BotSnapshot, HitBotEvent, ScannedBotEvent, Vec2};
use crate::runtime::{Simulation, TickIntent, TickReport};

const PLACEMENT_ATTEMPTS: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub struct Opponent {
    pub id: BotId,
    pub position: Vec2,
}

pub struct PracticeArena {
    width: f64,
    height: f64,
    max_turns: u64,
    turn: u64,
    position: Vec2,
    direction: f64,
    gun_direction: f64,
    speed: f64,
    gun_heat: f64,
    opponents: Vec<Opponent>,
    in_radar_arc: HashSet<BotId>,
    colors: Option<BotColors>,
    bullets_fired: u64,
}

impl PracticeArena {
    pub fn new(config: &PracticeConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let (width, height) = (config.arena_width, config.arena_height);

        let (position, _) = clamp_to_arena(
            config.start_position.unwrap_or(Vec2::new(width / 2.0, height / 2.0)),
            BOT_BOUNDING_CIRCLE_RADIUS,
            width,
            height,
        );
        let direction = normalize_absolute_angle(config.start_direction.unwrap_or_else(|| rng.gen_range(0.0..360.0)));
        let gun_direction = normalize_absolute_angle(config.start_gun_direction.unwrap_or(direction));

        let mut opponent_positions = config.opponents.clone();
        if opponent_positions.is_empty() {
            opponent_positions = Self::place_opponents(&mut rng, config.random_opponents, position, width, height);
        }
        let opponents = opponent_positions
            .into_iter()
            .enumerate()
            .map(|(i, p)| Opponent {
                id: i as BotId + 2,
                position: clamp_to_arena(p, BOT_BOUNDING_CIRCLE_RADIUS, width, height).0,
            })
            .collect::<Vec<_>>();

        debug!(width, height, ?position, direction, opponents = opponents.len(), "Practice arena ready");

        PracticeArena {
            width,
            height,
            max_turns: config.max_turns,
            turn: 0,
            position,
            direction,
            gun_direction,
            speed: 0.0,
            gun_heat: INITIAL_GUN_HEAT,
            opponents,
            in_radar_arc: HashSet::new(),
            colors: None,
            bullets_fired: 0,
        }
    }

    fn place_opponents(rng: &mut StdRng, count: usize, own: Vec2, width: f64, height: f64) -> Vec<Vec2> {
        let margin = BOT_BOUNDING_CIRCLE_RADIUS;
        let min_gap = 4.0 * BOT_BOUNDING_CIRCLE_RADIUS;
        let mut placed: Vec<Vec2> = Vec::with_capacity(count);
        for _ in 0..PLACEMENT_ATTEMPTS {
            if placed.len() == count {
                break;
            }
            let candidate = Vec2::new(rng.gen_range(margin..width - margin), rng.gen_range(margin..height - margin));
            let clear = candidate.distance_to(own) > min_gap && placed.iter().all(|p| p.distance_to(candidate) > min_gap);
            if clear {
                placed.push(candidate);
            }
        }
        placed
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn opponents(&self) -> &[Opponent] {
        &self.opponents
    }

    pub fn colors(&self) -> Option<BotColors> {
        self.colors
    }

    pub fn bullets_fired(&self) -> u64 {
        self.bullets_fired
    }

    fn move_body(&mut self, requested: f64, events: &mut Vec<BotEvent>) -> (f64, bool) {
        let step = requested.clamp(-MAX_SPEED, MAX_SPEED);
        if step == 0.0 {
            return (0.0, false);
        }
        let target = advance(self.position, self.direction, step);

        let contact = self
            .opponents
            .iter()
            .filter_map(|o| bot_contact(self.position, target, o.position, 2.0 * BOT_BOUNDING_CIRCLE_RADIUS).map(|t| (t, o)))
            .min_by(|a, b| a.0.total_cmp(&b.0));
        if let Some((t, opponent)) = contact {
            let moved = step * t;
            self.position = advance(self.position, self.direction, moved);
            trace!(victim = opponent.id, "Practice bot rammed an opponent");
            events.push(BotEvent::HitBot(HitBotEvent {
                victim_id: opponent.id,
                x: opponent.position.x,
                y: opponent.position.y,
                rammed: step > 0.0,
            }));
            return (moved, true);
        }

        let (clamped, hit_wall) = clamp_to_arena(target, BOT_BOUNDING_CIRCLE_RADIUS, self.width, self.height);
        let moved = if hit_wall { step.signum() * self.position.distance_to(clamped) } else { step };
        self.position = clamped;
        (moved, hit_wall)
    }

    fn sweep_radar(&mut self, radar_turned: bool, rescan: bool, events: &mut Vec<BotEvent>) {
        let mut now_in_arc = HashSet::new();
        for opponent in &self.opponents {
            let distance = self.position.distance_to(opponent.position);
            if distance > RADAR_RADIUS {
                continue;
            }
            let off_axis = calc_delta_angle(direction_to(self.position, opponent.position), self.gun_direction);
            if off_axis.abs() > RADAR_ARC_DEGREES / 2.0 {
                continue;
            }
            now_in_arc.insert(opponent.id);
            if rescan || radar_turned || !self.in_radar_arc.contains(&opponent.id) {
                events.push(BotEvent::ScannedBot(ScannedBotEvent {
                    scanned_bot_id: opponent.id,
                    x: opponent.position.x,
                    y: opponent.position.y,
                    distance,
                }));
            }
        }
        self.in_radar_arc = now_in_arc;
    }
}

impl Simulation for PracticeArena {
    fn snapshot(&self) -> BotSnapshot {
        BotSnapshot {
            turn: self.turn,
            position: self.position,
            direction: self.direction,
            gun_direction: self.gun_direction,
            speed: self.speed,
            gun_heat: self.gun_heat,
            arena_width: self.width,
            arena_height: self.height,
            running: self.turn < self.max_turns,
        }
    }

    fn step(&mut self, intent: &TickIntent) -> TickReport {
        self.turn += 1;
        let mut events = Vec::new();

        let turn_rate = calc_max_turn_rate(self.speed);
        let body_turned = intent.turn_remaining.clamp(-turn_rate, turn_rate);
        let gun_turned = intent.gun_turn_remaining.clamp(-MAX_GUN_TURN_RATE, MAX_GUN_TURN_RATE);
        self.direction = normalize_absolute_angle(self.direction + body_turned);
        // The gun is mounted on the body and turns with it.
        self.gun_direction = normalize_absolute_angle(self.gun_direction + body_turned + gun_turned);

        let (distance_moved, movement_blocked) = self.move_body(intent.distance_remaining, &mut events);
        self.speed = if movement_blocked { 0.0 } else { distance_moved };

        self.gun_heat = (self.gun_heat - GUN_COOLING_RATE).max(0.0);
        if self.gun_heat < NEAR_ZERO {
            self.gun_heat = 0.0;
        }
        let fired = intent.firepower.map(|power| {
            if self.gun_heat == 0.0 && power >= MIN_FIREPOWER {
                self.gun_heat = calc_gun_heat(power);
                self.bullets_fired += 1;
                true
            } else {
                false
            }
        });

        self.sweep_radar(body_turned != 0.0 || gun_turned != 0.0, intent.rescan, &mut events);

        TickReport {
            snapshot: self.snapshot(),
            distance_moved,
            body_turned,
            gun_turned,
            movement_blocked,
            fired,
            events,
            round_over: self.turn >= self.max_turns,
        }
    }

    fn set_colors(&mut self, colors: &BotColors) {
        self.colors = Some(*colors);
    }
}
