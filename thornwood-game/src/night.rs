//! Night phase: environmental upkeep followed by the random event draw.

use std::cmp::Ordering;

use serde::Serialize;

use crate::combat::{
    BanditReport, EncounterDecider, WildlifeReport, resolve_bandits, resolve_wildlife,
};
use crate::constants::{
    BANDIT_BASE_CHANCE, COLD_THRESHOLD, CRITICAL_NEED, DEHYDRATION_DAMAGE_EXPOSED,
    DEHYDRATION_DAMAGE_SHELTERED, ENCOUNTER_BAND, FIRE_WARMTH, FREEZING_THRESHOLD, GIFT_BAND,
    HEAT_THIRST, HEAT_THRESHOLD, HUNGER_DRIFT_EXPOSED, HUNGER_DRIFT_SHELTERED, LOG_NIGHT_ABORTED,
    LOG_NIGHT_BANDITS, LOG_NIGHT_FROSTBITE, LOG_NIGHT_INFECTION, LOG_NIGHT_MERCHANT,
    LOG_NIGHT_PREDATOR, LOG_NIGHT_QUIET, LOG_NIGHT_SPOILAGE, LOG_NIGHT_TRAP_CAUGHT,
    LOG_NIGHT_TRAP_EMPTY, LOG_NIGHT_TRAVELER, LOG_NIGHT_WILDLIFE, MERCHANT_BASE_CHANCE,
    PREDATOR_BAND, SECOND_GIFT_BAND, SHELTER_WARMTH, STARVATION_DAMAGE_EXPOSED,
    STARVATION_DAMAGE_SHELTERED, SUMMER_SPOILAGE_CHANCE, THIRST_DRIFT_EXPOSED,
    THIRST_DRIFT_SHELTERED, WINTER_FROSTBITE_CHANCE,
};
use crate::difficulty::DifficultyProfile;
use crate::numbers::scaled_chance;
use crate::rng::{RandomSource, pick};
use crate::season::{Season, TemperatureBand};
use crate::state::{DamageCause, PlayerState};
use crate::status::EffectKind;
use crate::trade::{TradeReport, trade};

const MAJOR_POOL: &str = "night.major";
const MERCHANT_POOL: &str = "night.merchant";
const AMBUSH_POOL: &str = "night.ambush";

/// Environmental upkeep applied at the end of every day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NightReport {
    pub temperature: i32,
    pub band: TemperatureBand,
    pub health_change: i32,
    pub expired_effects: Vec<EffectKind>,
    pub narrative: Vec<String>,
}

/// Tick status effects, settle temperature, drift needs and charge damage.
///
/// `day_went_well` is false when a gathering action failed that day; such a
/// night costs an extra 1d4 health.
pub fn apply_night_effects<R: RandomSource + ?Sized>(
    state: &mut PlayerState,
    rng: &mut R,
    day_went_well: bool,
) -> NightReport {
    let health_before = state.vitals.health;
    let mut narrative = Vec::new();
    let mut expired_effects = Vec::new();

    for tick in state.status_effects.tick(rng) {
        if tick.damage > 0 {
            state.damage(tick.damage, DamageCause::from(tick.kind));
            narrative.push(format!("The {} costs you {} health.", tick.kind, tick.damage));
        }
        if tick.thirst_delta != 0 {
            state.adjust_thirst(tick.thirst_delta);
            narrative.push(format!("The {} leaves you parched.", tick.kind));
        }
        if tick.expired {
            expired_effects.push(tick.kind);
            narrative.push(format!("The {} has passed.", tick.kind));
        }
    }

    let profile = state.season.profile();
    let sheltered = state.shelter;
    let mut temperature = profile.base_temp;
    if sheltered {
        temperature += SHELTER_WARMTH;
    }
    if state.fire {
        temperature += FIRE_WARMTH;
    }
    state.temperature = temperature;

    if temperature <= FREEZING_THRESHOLD {
        if !state.fire {
            let damage = rng.roll_dice(2, 6);
            state.damage(damage, DamageCause::Cold);
            narrative.push(format!("The freezing cold causes {damage} damage!"));
        }
    } else if temperature <= COLD_THRESHOLD {
        if !state.fire {
            let damage = rng.roll_die(4);
            state.damage(damage, DamageCause::Cold);
            narrative.push(format!("The cold causes {damage} damage."));
        }
    } else if temperature >= HEAT_THRESHOLD {
        state.adjust_thirst(HEAT_THIRST);
        narrative.push("The scorching heat increases your thirst.".to_string());
    }

    let (hunger_drift, thirst_drift) = if sheltered {
        (HUNGER_DRIFT_SHELTERED, THIRST_DRIFT_SHELTERED)
    } else {
        (HUNGER_DRIFT_EXPOSED, THIRST_DRIFT_EXPOSED)
    };
    state.adjust_hunger(hunger_drift + profile.hunger_mod);
    state.adjust_thirst(thirst_drift + profile.thirst_mod);

    if !sheltered {
        match profile.health_mod.cmp(&0) {
            Ordering::Less => {
                state.damage(profile.health_mod.unsigned_abs(), DamageCause::Exposure);
            }
            Ordering::Greater => {
                state.heal(profile.health_mod.unsigned_abs());
            }
            Ordering::Equal => {}
        }
    }

    if state.vitals.hunger >= CRITICAL_NEED {
        let damage = if sheltered {
            STARVATION_DAMAGE_SHELTERED
        } else {
            STARVATION_DAMAGE_EXPOSED
        };
        state.damage(damage, DamageCause::Starvation);
        narrative.push(format!("Hunger gnaws at you (-{damage} health)."));
    }
    if state.vitals.thirst >= CRITICAL_NEED {
        let damage = if sheltered {
            DEHYDRATION_DAMAGE_SHELTERED
        } else {
            DEHYDRATION_DAMAGE_EXPOSED
        };
        state.damage(damage, DamageCause::Dehydration);
        narrative.push(format!("Thirst weakens you (-{damage} health)."));
    }
    if !day_went_well {
        let damage = rng.roll_die(4);
        state.damage(damage, DamageCause::Exhaustion);
        narrative.push(format!("Wounds and exhaustion from a bad day cost {damage} health."));
    }

    state.clamp_vitals();
    let report = NightReport {
        temperature,
        band: TemperatureBand::from_temperature(temperature),
        health_change: state.vitals.health - health_before,
        expired_effects,
        narrative,
    };
    log::debug!(
        "night {}: {} ({}), health {:+}",
        state.day,
        report.temperature,
        report.band.as_str(),
        report.health_change
    );
    report
}

/// One band of a uniform draw, `[lower, upper)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventBand {
    pub id: String,
    pub lower: f64,
    pub upper: f64,
}

/// Record of a single random selection during the night.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventDecisionTrace {
    /// Identifier for the selection pool (e.g., `night.major`).
    pub pool_id: String,
    pub roll: f64,
    pub candidates: Vec<EventBand>,
    pub chosen_id: String,
}

impl EventDecisionTrace {
    fn binary(pool_id: &str, roll: f64, threshold: f64, hit: &str, miss: &str) -> Self {
        let chosen = if roll < threshold { hit } else { miss };
        Self {
            pool_id: pool_id.to_string(),
            roll,
            candidates: vec![
                EventBand {
                    id: hit.to_string(),
                    lower: 0.0,
                    upper: threshold,
                },
                EventBand {
                    id: miss.to_string(),
                    lower: threshold,
                    upper: 1.0,
                },
            ],
            chosen_id: chosen.to_string(),
        }
    }
}

/// Outcome bands of the major night draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MajorBand {
    Encounter,
    Predator,
    Traveler,
    Wanderer,
    Quiet,
}

impl MajorBand {
    const BANDS: [(Self, f64, f64); 5] = [
        (Self::Encounter, 0.0, ENCOUNTER_BAND),
        (Self::Predator, ENCOUNTER_BAND, PREDATOR_BAND),
        (Self::Traveler, PREDATOR_BAND, GIFT_BAND),
        (Self::Wanderer, GIFT_BAND, SECOND_GIFT_BAND),
        (Self::Quiet, SECOND_GIFT_BAND, 1.0),
    ];

    #[must_use]
    pub fn from_roll(roll: f64) -> Self {
        Self::BANDS
            .iter()
            .find(|(_, _, upper)| roll < *upper)
            .map_or(Self::Quiet, |(band, _, _)| *band)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Encounter => "encounter",
            Self::Predator => "predator",
            Self::Traveler => "traveler",
            Self::Wanderer => "wanderer",
            Self::Quiet => "quiet",
        }
    }

    fn trace(roll: f64) -> EventDecisionTrace {
        EventDecisionTrace {
            pool_id: MAJOR_POOL.to_string(),
            roll,
            candidates: Self::BANDS
                .iter()
                .map(|(band, lower, upper)| EventBand {
                    id: band.as_str().to_string(),
                    lower: *lower,
                    upper: *upper,
                })
                .collect(),
            chosen_id: Self::from_roll(roll).as_str().to_string(),
        }
    }
}

/// Supplies left behind by a passing traveler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gift {
    Water,
    Food,
    Cloth,
}

impl Gift {
    pub const ALL: [Self; 3] = [Self::Water, Self::Food, Self::Cloth];

    fn grant(self, state: &mut PlayerState) {
        let slot = match self {
            Self::Water => &mut state.inventory.water,
            Self::Food => &mut state.inventory.food,
            Self::Cloth => &mut state.inventory.cloth,
        };
        *slot = slot.saturating_add(1);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NightEvent {
    TrapCaught { food: u32 },
    TrapEmpty,
    Frostbite { damage: i32 },
    Spoilage { lost: u32 },
    Merchant { report: TradeReport },
    Bandits { report: BanditReport },
    Wildlife { report: WildlifeReport },
    EncounterAborted { reason: String },
    Predator { damage: i32, food_stolen: u32 },
    Traveler { gift: Gift },
    Quiet,
    Infection { damage: i32 },
}

impl NightEvent {
    #[must_use]
    pub const fn log_key(&self) -> &'static str {
        match self {
            Self::TrapCaught { .. } => LOG_NIGHT_TRAP_CAUGHT,
            Self::TrapEmpty => LOG_NIGHT_TRAP_EMPTY,
            Self::Frostbite { .. } => LOG_NIGHT_FROSTBITE,
            Self::Spoilage { .. } => LOG_NIGHT_SPOILAGE,
            Self::Merchant { .. } => LOG_NIGHT_MERCHANT,
            Self::Bandits { .. } => LOG_NIGHT_BANDITS,
            Self::Wildlife { .. } => LOG_NIGHT_WILDLIFE,
            Self::EncounterAborted { .. } => LOG_NIGHT_ABORTED,
            Self::Predator { .. } => LOG_NIGHT_PREDATOR,
            Self::Traveler { .. } => LOG_NIGHT_TRAVELER,
            Self::Quiet => LOG_NIGHT_QUIET,
            Self::Infection { .. } => LOG_NIGHT_INFECTION,
        }
    }
}

/// Everything the random night draw produced.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DangerReport {
    pub events: Vec<NightEvent>,
    pub traces: Vec<EventDecisionTrace>,
    pub narrative: Vec<String>,
}

impl DangerReport {
    fn push(&mut self, event: NightEvent, line: impl Into<String>) {
        self.events.push(event);
        self.narrative.push(line.into());
    }

    fn push_all(&mut self, event: NightEvent, lines: &[String]) {
        self.events.push(event);
        self.narrative.extend(lines.iter().cloned());
    }
}

/// Resolve the trap, the seasonal hazard, the major draw and infection, in
/// that order. Stops at the first step that leaves the survivor dead.
pub fn danger_event<R, D>(
    state: &mut PlayerState,
    rng: &mut R,
    difficulty: &DifficultyProfile,
    decider: &mut D,
) -> DangerReport
where
    R: RandomSource + ?Sized,
    D: EncounterDecider + ?Sized,
{
    let mut report = DangerReport::default();
    let profile = state.season.profile();

    if state.trap_set {
        let chance = scaled_chance(profile.trap_chance, difficulty.trap_success_mod);
        if rng.succeeds(chance) {
            let food = rng.range(1, 3);
            state.inventory.food = state.inventory.food.saturating_add(food);
            report.push(
                NightEvent::TrapCaught { food },
                format!("Your trap caught {food} food overnight."),
            );
        } else {
            report.push(NightEvent::TrapEmpty, "Your trap caught nothing.");
        }
        state.trap_set = false;
    }

    let hazard_roll = rng.chance();
    match state.season {
        Season::Winter if hazard_roll < WINTER_FROSTBITE_CHANCE => {
            let raw = rng.roll_die(8);
            let damage = state.damage(raw, DamageCause::Frostbite);
            report.push(
                NightEvent::Frostbite { damage },
                format!("A freezing night causes {raw} damage!"),
            );
        }
        Season::Summer if hazard_roll < SUMMER_SPOILAGE_CHANCE => {
            let lost = state.inventory.food.min(1);
            state.inventory.food -= lost;
            report.push(
                NightEvent::Spoilage { lost },
                "The intense heat spoils some of your food.",
            );
        }
        _ => {}
    }
    if state.is_dead() {
        return report;
    }

    let roll = rng.chance();
    report.traces.push(MajorBand::trace(roll));
    match MajorBand::from_roll(roll) {
        MajorBand::Encounter => encounter(state, rng, difficulty, decider, &mut report),
        MajorBand::Predator => {
            let raw = rng.roll_die(8);
            let damage = state.damage(raw, DamageCause::Predator);
            let mut food_stolen = 0;
            if state.inventory.food > 0 {
                food_stolen = state.inventory.food.min(rng.range(1, 2));
                state.inventory.food -= food_stolen;
            }
            report.push(
                NightEvent::Predator {
                    damage,
                    food_stolen,
                },
                format!("A predator attacks! You lose {raw} health and {food_stolen} food."),
            );
        }
        MajorBand::Traveler | MajorBand::Wanderer => {
            let gift = pick(rng, &Gift::ALL).copied().unwrap_or(Gift::Food);
            gift.grant(state);
            let line = match gift {
                Gift::Cloth => "A passing traveler leaves a scrap of cloth.".to_string(),
                Gift::Food => "A passing traveler leaves behind food for you.".to_string(),
                Gift::Water => "A passing traveler leaves behind water for you.".to_string(),
            };
            report.push(NightEvent::Traveler { gift }, line);
        }
        MajorBand::Quiet => report.push(NightEvent::Quiet, "The night passes quietly."),
    }
    if state.is_dead() {
        return report;
    }

    if state.infection {
        let raw = rng.roll_die(6);
        let damage = state.damage(raw, DamageCause::Infection);
        report.push(
            NightEvent::Infection { damage },
            format!("Your infection worsens overnight (-{raw} health)."),
        );
    }
    report
}

fn encounter<R, D>(
    state: &mut PlayerState,
    rng: &mut R,
    difficulty: &DifficultyProfile,
    decider: &mut D,
    report: &mut DangerReport,
) where
    R: RandomSource + ?Sized,
    D: EncounterDecider + ?Sized,
{
    if !state.merchant_hostile {
        let threshold = scaled_chance(MERCHANT_BASE_CHANCE, difficulty.merchant_chance_mod);
        let roll = rng.chance();
        let trace =
            EventDecisionTrace::binary(MERCHANT_POOL, roll, threshold, "merchant", "ambush");
        report.traces.push(trace);
        if roll < threshold {
            let order = decider.merchant_order(state);
            let deal = trade(state, order);
            let line = format!("A wandering merchant stops by. {}", deal.line);
            report.push(NightEvent::Merchant { report: deal }, line);
            return;
        }
    }

    let threshold = scaled_chance(BANDIT_BASE_CHANCE, difficulty.bandit_multiplier);
    let roll = rng.chance();
    report
        .traces
        .push(EventDecisionTrace::binary(AMBUSH_POOL, roll, threshold, "bandits", "wildlife"));
    if roll < threshold {
        let bandits = resolve_bandits(state, rng, difficulty, decider);
        let lines = bandits.narrative.clone();
        report.push_all(NightEvent::Bandits { report: bandits }, &lines);
        return;
    }

    match resolve_wildlife(state, rng, difficulty, decider) {
        Ok(wildlife) => {
            let lines = wildlife.narrative.clone();
            report.push_all(NightEvent::Wildlife { report: wildlife }, &lines);
        }
        Err(err) => {
            log::warn!("night encounter aborted: {err}");
            report.push(
                NightEvent::EncounterAborted {
                    reason: err.to_string(),
                },
                "Something stirs in the dark, then is gone.",
            );
        }
    }
}

/// Tools that can turn up in the morning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Knife,
    Hatchet,
}

impl Tool {
    pub const ALL: [Self; 2] = [Self::Knife, Self::Hatchet];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Knife => "knife",
            Self::Hatchet => "hatchet",
        }
    }
}

/// Small chance of finding an abandoned tool as a new day begins.
pub fn morning_discovery<R: RandomSource + ?Sized>(
    state: &mut PlayerState,
    rng: &mut R,
    chance: f64,
) -> Option<Tool> {
    if !rng.succeeds(chance) {
        return None;
    }
    let tool = pick(rng, &Tool::ALL).copied()?;
    match tool {
        Tool::Knife => state.inventory.knife = true,
        Tool::Hatchet => state.inventory.hatchet = true,
    }
    Some(tool)
}

/// The whole night as seen by a session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NightOutcome {
    pub effects: NightReport,
    /// Absent when the survivor died before the event draw.
    pub danger: Option<DangerReport>,
    pub discovery: Option<Tool>,
}

impl NightOutcome {
    /// Narrative lines in the order they happened.
    #[must_use]
    pub fn narrative(&self) -> Vec<String> {
        let mut lines = self.effects.narrative.clone();
        if let Some(danger) = &self.danger {
            lines.extend(danger.narrative.iter().cloned());
        }
        if let Some(tool) = self.discovery {
            lines.push(format!(
                "You discover an abandoned {}! It may help future actions.",
                tool.as_str()
            ));
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::field_reassign_with_default)]

    use super::*;
    use crate::combat::{BanditOutcome, CautiousDecider};
    use crate::difficulty::select_difficulty;
    use crate::rng::ScriptedRolls;

    fn normal() -> DifficultyProfile {
        DifficultyProfile::normal()
    }

    #[test]
    fn calm_summer_night_only_drifts_needs() {
        let mut state = PlayerState::default();
        let mut rng = ScriptedRolls::new();
        let report = apply_night_effects(&mut state, &mut rng, true);
        assert_eq!(report.temperature, 25);
        assert_eq!(report.band, TemperatureBand::Hot);
        assert_eq!(report.health_change, 0);
        assert_eq!(state.vitals.hunger, 25);
        assert_eq!(state.vitals.thirst, 35);
    }

    #[test]
    fn exposed_winter_night_hurts() {
        let mut state = PlayerState::default();
        state.season = Season::Winter;
        let mut rng = ScriptedRolls::new().with_rolls([3, 4, 2]);
        let report = apply_night_effects(&mut state, &mut rng, false);
        assert_eq!(report.temperature, -15);
        assert_eq!(state.vitals.health, 89);
        assert_eq!(report.health_change, -11);
        assert_eq!(state.vitals.hunger, 30);
        assert_eq!(state.vitals.thirst, 25);
        assert_eq!(state.last_damage, Some(DamageCause::Exhaustion));
    }

    #[test]
    fn shelter_and_fire_keep_winter_mild() {
        let mut state = PlayerState::default();
        state.season = Season::Winter;
        state.shelter = true;
        state.fire = true;
        let mut rng = ScriptedRolls::new();
        let report = apply_night_effects(&mut state, &mut rng, true);
        assert_eq!(report.temperature, 10);
        assert_eq!(state.vitals.health, 100);
        assert_eq!(state.vitals.hunger, 25);
        assert_eq!(state.vitals.thirst, 17);
    }

    #[test]
    fn critical_needs_cost_health_under_shelter() {
        let mut state = PlayerState::default();
        state.shelter = true;
        state.vitals.hunger = 75;
        state.vitals.thirst = 70;
        let mut rng = ScriptedRolls::new();
        let report = apply_night_effects(&mut state, &mut rng, true);
        // sheltered summer reaches 35 degrees
        assert_eq!(report.band, TemperatureBand::Scorching);
        assert_eq!(state.vitals.hunger, 85);
        assert_eq!(state.vitals.thirst, 97);
        assert_eq!(state.vitals.health, 85);
    }

    #[test]
    fn status_effects_tick_before_environment() {
        let mut state = PlayerState::default();
        state.status_effects.apply(EffectKind::Poison, 2);
        state.status_effects.apply(EffectKind::Fever, 1);
        let mut rng = ScriptedRolls::new().with_rolls([3]);
        let report = apply_night_effects(&mut state, &mut rng, true);
        assert_eq!(state.vitals.health, 97);
        assert_eq!(state.vitals.thirst, 45);
        assert_eq!(state.status_effects.remaining(EffectKind::Poison), Some(1));
        assert_eq!(report.expired_effects, vec![EffectKind::Fever]);
    }

    #[test]
    fn trap_catches_food_and_clears() {
        let mut state = PlayerState::default();
        state.trap_set = true;
        let food = state.inventory.food;
        let mut rng = ScriptedRolls::new()
            .with_chances([0.5, 0.9, 0.95])
            .with_rolls([2]);
        let report = danger_event(&mut state, &mut rng, &normal(), &mut CautiousDecider);
        assert!(!state.trap_set);
        assert_eq!(state.inventory.food, food + 2);
        assert_eq!(
            report.events,
            vec![NightEvent::TrapCaught { food: 2 }, NightEvent::Quiet]
        );
        assert_eq!(report.traces.len(), 1);
        assert_eq!(report.traces[0].chosen_id, "quiet");
    }

    #[test]
    fn hardcore_traps_never_catch() {
        let hardcore = select_difficulty("Hardcore").expect("hardcore");
        let mut state = PlayerState::new_game(&hardcore);
        state.trap_set = true;
        let mut rng = ScriptedRolls::new().with_chances([0.0, 0.99, 0.99]);
        let report = danger_event(&mut state, &mut rng, &hardcore, &mut CautiousDecider);
        assert_eq!(report.events[0], NightEvent::TrapEmpty);
        assert!(!state.trap_set);
    }

    #[test]
    fn winter_hazard_frostbites() {
        let mut state = PlayerState::default();
        state.season = Season::Winter;
        let mut rng = ScriptedRolls::new()
            .with_chances([0.1, 0.99])
            .with_rolls([5]);
        let report = danger_event(&mut state, &mut rng, &normal(), &mut CautiousDecider);
        assert_eq!(report.events[0], NightEvent::Frostbite { damage: 5 });
        assert_eq!(state.vitals.health, 95);
        assert_eq!(state.last_damage, Some(DamageCause::Frostbite));
    }

    #[test]
    fn summer_heat_spoils_food() {
        let mut state = PlayerState::default();
        let food = state.inventory.food;
        let mut rng = ScriptedRolls::new().with_chances([0.05, 0.99]);
        let report = danger_event(&mut state, &mut rng, &normal(), &mut CautiousDecider);
        assert_eq!(report.events[0], NightEvent::Spoilage { lost: 1 });
        assert_eq!(state.inventory.food, food - 1);
    }

    #[test]
    fn predator_steals_food() {
        let mut state = PlayerState::default();
        state.inventory.food = 2;
        let mut rng = ScriptedRolls::new()
            .with_chances([0.99, 0.15])
            .with_rolls([6, 2]);
        let report = danger_event(&mut state, &mut rng, &normal(), &mut CautiousDecider);
        assert_eq!(
            report.events,
            vec![NightEvent::Predator {
                damage: 6,
                food_stolen: 2
            }]
        );
        assert_eq!(state.inventory.food, 0);
        assert_eq!(state.vitals.health, 94);
        assert_eq!(report.traces[0].chosen_id, "predator");
    }

    #[test]
    fn traveler_leaves_a_gift() {
        let mut state = PlayerState::default();
        let mut rng = ScriptedRolls::new()
            .with_chances([0.99, 0.2])
            .with_rolls([2]);
        let report = danger_event(&mut state, &mut rng, &normal(), &mut CautiousDecider);
        assert_eq!(report.events, vec![NightEvent::Traveler { gift: Gift::Cloth }]);
        assert_eq!(state.inventory.cloth, 1);
    }

    #[test]
    fn merchant_visit_uses_decider_order() {
        let mut state = PlayerState::default();
        let mut rng = ScriptedRolls::new().with_chances([0.99, 0.05, 0.1]);
        let report = danger_event(&mut state, &mut rng, &normal(), &mut CautiousDecider);
        assert!(matches!(report.events[0], NightEvent::Merchant { .. }));
        assert_eq!(state.inventory.bandages, 1);
        assert_eq!(state.inventory.gold, 0);
        assert_eq!(report.traces[1].pool_id, "night.merchant");
    }

    #[test]
    fn hostile_merchant_means_bandits() {
        let mut state = PlayerState::default();
        state.merchant_hostile = true;
        let mut rng = ScriptedRolls::new()
            .with_chances([0.99, 0.05, 0.1])
            .with_rolls([1, 3]);
        let report = danger_event(&mut state, &mut rng, &normal(), &mut CautiousDecider);
        let NightEvent::Bandits { report: bandits } = &report.events[0] else {
            panic!("expected bandits, got {:?}", report.events);
        };
        assert_eq!(bandits.outcome, BanditOutcome::Paid { amount: 3 });
        assert_eq!(state.inventory.gold, 2);
        assert_eq!(report.traces[1].pool_id, "night.ambush");
    }

    #[test]
    fn infection_worsens_every_night() {
        let mut state = PlayerState::default();
        state.infection = true;
        let mut rng = ScriptedRolls::new()
            .with_chances([0.99, 0.99])
            .with_rolls([4]);
        let report = danger_event(&mut state, &mut rng, &normal(), &mut CautiousDecider);
        assert_eq!(
            report.events.last(),
            Some(&NightEvent::Infection { damage: 4 })
        );
        assert_eq!(state.vitals.health, 96);
    }

    #[test]
    fn death_stops_event_processing() {
        let mut state = PlayerState::default();
        state.season = Season::Winter;
        state.infection = true;
        state.vitals.health = 3;
        let mut rng = ScriptedRolls::new()
            .with_chances([0.1, 0.01])
            .with_rolls([8, 6]);
        let report = danger_event(&mut state, &mut rng, &normal(), &mut CautiousDecider);
        assert!(state.is_dead());
        assert_eq!(report.events.len(), 1);
        assert!(report.traces.is_empty());
        assert_eq!(rng.chances_remaining(), 1);
    }

    #[test]
    fn major_bands_partition_the_draw() {
        assert_eq!(MajorBand::from_roll(0.0), MajorBand::Encounter);
        assert_eq!(MajorBand::from_roll(0.099), MajorBand::Encounter);
        assert_eq!(MajorBand::from_roll(0.10), MajorBand::Predator);
        assert_eq!(MajorBand::from_roll(0.18), MajorBand::Traveler);
        assert_eq!(MajorBand::from_roll(0.25), MajorBand::Wanderer);
        assert_eq!(MajorBand::from_roll(0.30), MajorBand::Quiet);
        assert_eq!(MajorBand::from_roll(0.999), MajorBand::Quiet);
    }

    #[test]
    fn morning_discovery_finds_a_tool() {
        let mut state = PlayerState::default();
        let mut rng = ScriptedRolls::new().with_chances([0.05]).with_rolls([1]);
        assert_eq!(
            morning_discovery(&mut state, &mut rng, 0.08),
            Some(Tool::Hatchet)
        );
        assert!(state.inventory.hatchet);
        assert_eq!(morning_discovery(&mut state, &mut rng, 0.08), None);
    }
}
