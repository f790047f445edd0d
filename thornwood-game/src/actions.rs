//! The day-action catalogue.
//!
//! Every action is a function of `(state, rng, difficulty)` that mutates the
//! state in place and returns an [`ActionReport`]. Gathering actions resolve a
//! tiered d20 check: the difficulty bonus is added once through
//! [`DifficultyProfile::player_roll`], then any equipment or attribute bonus.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BANDAGE_HEAL, DEFAULT_GROWTH_CHANCE, DRINK_THIRST_RELIEF, EAT_HUNGER_RELIEF, FIRE_FOOD_CHANCE,
    FIRE_MIN_TEMPERATURE, FIRE_TARGET, FORAGE_HIGH, FORAGE_MID, HATCHET_BONUS, HERB_BANDAGE_TARGET,
    HUNT_HIGH, HUNT_MID, HUNT_STRENGTH_GROWTH, KNIFE_HUNT_BONUS, LOG_BANDAGE_APPLIED,
    LOG_BANDAGE_CRAFTED, LOG_BANDAGE_CRAFT_FAILED, LOG_BANDAGE_HERBS, LOG_BANDAGE_NONE, LOG_DRINK,
    LOG_DRINK_EMPTY, LOG_EAT, LOG_EAT_EMPTY, LOG_FIRE_FAILED, LOG_FIRE_LIT, LOG_FORAGE_HIGH,
    LOG_FORAGE_LOW, LOG_FORAGE_MID, LOG_HUNT_HIGH, LOG_HUNT_LOW, LOG_HUNT_MID, LOG_REST,
    LOG_RIVER_HIGH, LOG_RIVER_LOW, LOG_RIVER_MID, LOG_SCAVENGE_HIGH, LOG_SCAVENGE_LOW,
    LOG_SCAVENGE_MID, LOG_SHELTER_BUILT, LOG_SHELTER_EXISTS, LOG_SHELTER_FAILED, LOG_TRAP_EXISTS,
    LOG_TRAP_FAILED, LOG_TRAP_SET, REST_ENDURANCE_GROWTH, RIVER_HIGH, RIVER_KNIFE_LOSS_CHANCE,
    RIVER_MID, SCAVENGE_HIGH, SCAVENGE_INFECTION_CHANCE, SCAVENGE_MID, SHELTER_ROLL_BONUS,
    SHELTER_TARGET, TRAP_TARGET,
};
use crate::difficulty::DifficultyProfile;
use crate::numbers::roll_to_i32;
use crate::rng::{RandomSource, pick};
use crate::state::{Attribute, DamageCause, PlayerState};
use crate::status::EffectKind;
use crate::trade::{TradeOrder, trade};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("unknown action `{id}`")]
    UnknownAction { id: String },
}

/// Identifier of a player-invocable action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionId {
    Forage,
    Hunt,
    ExploreRiver,
    ScavengeRuins,
    Rest,
    Eat,
    Drink,
    BuildShelter,
    MakeFire,
    SetTrap,
    CraftBandage,
    UseBandage,
    Trade(TradeOrder),
}

impl ActionId {
    /// Every action a caller may request, in menu order.
    pub const CATALOG: [Self; 16] = [
        Self::Forage,
        Self::Hunt,
        Self::Rest,
        Self::Drink,
        Self::Eat,
        Self::BuildShelter,
        Self::ExploreRiver,
        Self::ScavengeRuins,
        Self::CraftBandage,
        Self::UseBandage,
        Self::MakeFire,
        Self::SetTrap,
        Self::Trade(TradeOrder::BuyBandage),
        Self::Trade(TradeOrder::BuyWater),
        Self::Trade(TradeOrder::SellCloth),
        Self::Trade(TradeOrder::Leave),
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Forage => "forage",
            Self::Hunt => "hunt",
            Self::ExploreRiver => "explore_river",
            Self::ScavengeRuins => "scavenge_ruins",
            Self::Rest => "rest",
            Self::Eat => "eat",
            Self::Drink => "drink",
            Self::BuildShelter => "build_shelter",
            Self::MakeFire => "make_fire",
            Self::SetTrap => "set_trap",
            Self::CraftBandage => "craft_bandage",
            Self::UseBandage => "use_bandage",
            Self::Trade(TradeOrder::BuyBandage) => "trade:buy_bandage",
            Self::Trade(TradeOrder::BuyWater) => "trade:buy_water",
            Self::Trade(TradeOrder::SellCloth) => "trade:sell_cloth",
            Self::Trade(TradeOrder::Leave) => "trade:leave",
        }
    }

    /// Risky outings whose failure spoils the day.
    #[must_use]
    pub const fn is_gathering(self) -> bool {
        matches!(
            self,
            Self::Forage | Self::Hunt | Self::ExploreRiver | Self::ScavengeRuins
        )
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionId {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id = s.trim().to_ascii_lowercase();
        Self::CATALOG
            .into_iter()
            .find(|action| action.as_str() == id)
            .ok_or(ActionError::UnknownAction { id })
    }
}

/// Quality band of an action's check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeTier {
    High,
    Mid,
    Low,
    /// No check was rolled.
    Automatic,
    /// Missing materials or coin; nothing happened.
    Blocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionReport {
    pub action: ActionId,
    pub success: bool,
    pub tier: OutcomeTier,
    pub log_key: &'static str,
    pub narrative: Vec<String>,
}

impl ActionReport {
    fn new(
        action: ActionId,
        success: bool,
        tier: OutcomeTier,
        log_key: &'static str,
        narrative: Vec<String>,
    ) -> Self {
        Self {
            action,
            success,
            tier,
            log_key,
            narrative,
        }
    }

    fn line(
        action: ActionId,
        success: bool,
        tier: OutcomeTier,
        log_key: &'static str,
        line: impl Into<String>,
    ) -> Self {
        Self::new(action, success, tier, log_key, vec![line.into()])
    }
}

/// Run one action against the survivor.
pub fn perform<R: RandomSource + ?Sized>(
    action: ActionId,
    state: &mut PlayerState,
    rng: &mut R,
    difficulty: &DifficultyProfile,
) -> ActionReport {
    let report = match action {
        ActionId::Forage => forage(state, rng, difficulty),
        ActionId::Hunt => hunt(state, rng, difficulty),
        ActionId::ExploreRiver => explore_river(state, rng, difficulty),
        ActionId::ScavengeRuins => scavenge_ruins(state, rng, difficulty),
        ActionId::Rest => rest(state, rng),
        ActionId::Eat => eat(state),
        ActionId::Drink => drink(state),
        ActionId::BuildShelter => build_shelter(state, rng),
        ActionId::MakeFire => make_fire(state, rng, difficulty),
        ActionId::SetTrap => set_trap(state, rng, difficulty),
        ActionId::CraftBandage => craft_bandage(state, rng, difficulty),
        ActionId::UseBandage => use_bandage(state),
        ActionId::Trade(order) => trade_with_merchant(state, order),
    };
    log::debug!(
        "day {} action {} -> {} ({:?})",
        state.day,
        action,
        report.log_key,
        report.tier
    );
    report
}

fn growth_line(state: &PlayerState, attribute: Attribute) -> String {
    format!(
        "Your {attribute} improved to {}.",
        state.attribute(attribute)
    )
}

fn grow<R: RandomSource + ?Sized>(
    state: &mut PlayerState,
    attribute: Attribute,
    chance: f64,
    rng: &mut R,
    narrative: &mut Vec<String>,
) {
    if state.check_stat_increase(attribute, chance, rng) {
        narrative.push(growth_line(state, attribute));
    }
}

fn injure<R: RandomSource + ?Sized>(state: &mut PlayerState, rng: &mut R, die: u32) -> i32 {
    let amount = rng.roll_die(die);
    state.damage(amount, DamageCause::Injury)
}

pub fn forage<R: RandomSource + ?Sized>(
    state: &mut PlayerState,
    rng: &mut R,
    difficulty: &DifficultyProfile,
) -> ActionReport {
    let action = ActionId::Forage;
    let roll = difficulty.player_roll(rng);
    if roll >= FORAGE_HIGH {
        let food = rng.range(1, 3);
        let water = rng.range(1, 2);
        state.inventory.food = state.inventory.food.saturating_add(food);
        state.inventory.water = state.inventory.water.saturating_add(water);
        let mut narrative = vec![format!(
            "The undergrowth is generous: {food} food and {water} water."
        )];
        grow(state, Attribute::Endurance, DEFAULT_GROWTH_CHANCE, rng, &mut narrative);
        ActionReport::new(action, true, OutcomeTier::High, LOG_FORAGE_HIGH, narrative)
    } else if roll >= FORAGE_MID {
        state.inventory.food = state.inventory.food.saturating_add(1);
        ActionReport::line(
            action,
            true,
            OutcomeTier::Mid,
            LOG_FORAGE_MID,
            "You gather a handful of berries (1 food).",
        )
    } else {
        let lost = injure(state, rng, 6);
        ActionReport::line(
            action,
            false,
            OutcomeTier::Low,
            LOG_FORAGE_LOW,
            format!("You slip on a bank while foraging and lose {lost} health."),
        )
    }
}

pub fn hunt<R: RandomSource + ?Sized>(
    state: &mut PlayerState,
    rng: &mut R,
    difficulty: &DifficultyProfile,
) -> ActionReport {
    let action = ActionId::Hunt;
    let knife = if state.inventory.knife {
        KNIFE_HUNT_BONUS
    } else {
        0
    };
    let roll = difficulty.player_roll(rng) + knife + state.attribute_bonus(Attribute::Strength);
    if roll >= HUNT_HIGH {
        let food = rng.range(2, 5);
        state.inventory.food = state.inventory.food.saturating_add(food);
        let mut narrative = vec![format!("A clean kill. You dress {food} food.")];
        grow(state, Attribute::Strength, HUNT_STRENGTH_GROWTH, rng, &mut narrative);
        ActionReport::new(action, true, OutcomeTier::High, LOG_HUNT_HIGH, narrative)
    } else if roll >= HUNT_MID {
        state.inventory.food = state.inventory.food.saturating_add(1);
        ActionReport::line(
            action,
            true,
            OutcomeTier::Mid,
            LOG_HUNT_MID,
            "You snare a small bird (1 food).",
        )
    } else {
        let lost = injure(state, rng, 8);
        ActionReport::line(
            action,
            false,
            OutcomeTier::Low,
            LOG_HUNT_LOW,
            format!("The hunt goes wrong and you lose {lost} health."),
        )
    }
}

pub fn explore_river<R: RandomSource + ?Sized>(
    state: &mut PlayerState,
    rng: &mut R,
    difficulty: &DifficultyProfile,
) -> ActionReport {
    let action = ActionId::ExploreRiver;
    let roll = difficulty.player_roll(rng);
    if roll >= RIVER_HIGH {
        let food = rng.range(1, 3);
        let water = rng.range(1, 3);
        state.inventory.food = state.inventory.food.saturating_add(food);
        state.inventory.water = state.inventory.water.saturating_add(water);
        let mut narrative = vec![format!(
            "The river yields fish and clean water: {food} food, {water} water."
        )];
        grow(state, Attribute::Agility, DEFAULT_GROWTH_CHANCE, rng, &mut narrative);
        ActionReport::new(action, true, OutcomeTier::High, LOG_RIVER_HIGH, narrative)
    } else if roll >= RIVER_MID {
        state.inventory.water = state.inventory.water.saturating_add(1);
        ActionReport::line(
            action,
            true,
            OutcomeTier::Mid,
            LOG_RIVER_MID,
            "You fill a skin at the shallows (1 water).",
        )
    } else {
        let lost = injure(state, rng, 8);
        let mut narrative = vec![format!(
            "The current drags you over the rocks and you lose {lost} health."
        )];
        if rng.succeeds(RIVER_KNIFE_LOSS_CHANCE) && state.inventory.knife {
            state.inventory.knife = false;
            narrative.push("Your knife is gone, swept downstream.".to_string());
        }
        ActionReport::new(action, false, OutcomeTier::Low, LOG_RIVER_LOW, narrative)
    }
}

/// Items a successful scavenge can turn up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Loot {
    Food,
    Water,
    Cloth,
    Bandage,
    Knife,
    Hatchet,
}

const LOOT_TABLE: [Loot; 6] = [
    Loot::Food,
    Loot::Water,
    Loot::Cloth,
    Loot::Bandage,
    Loot::Knife,
    Loot::Hatchet,
];

pub fn scavenge_ruins<R: RandomSource + ?Sized>(
    state: &mut PlayerState,
    rng: &mut R,
    difficulty: &DifficultyProfile,
) -> ActionReport {
    let action = ActionId::ScavengeRuins;
    let hatchet = if state.inventory.hatchet {
        HATCHET_BONUS
    } else {
        0
    };
    let roll = difficulty.player_roll(rng) + hatchet;
    if roll >= SCAVENGE_HIGH {
        let loot = pick(rng, &LOOT_TABLE).copied().unwrap_or(Loot::Food);
        let inventory = &mut state.inventory;
        let line = match loot {
            Loot::Food => {
                let qty = rng.range(1, 3);
                inventory.food = inventory.food.saturating_add(qty);
                format!("Sealed tins in the rubble: {qty} food.")
            }
            Loot::Water => {
                let qty = rng.range(1, 3);
                inventory.water = inventory.water.saturating_add(qty);
                format!("An intact cistern: {qty} water.")
            }
            Loot::Cloth => {
                inventory.cloth = inventory.cloth.saturating_add(1);
                "You pull a usable length of cloth from the debris.".to_string()
            }
            Loot::Bandage => {
                inventory.bandages = inventory.bandages.saturating_add(1);
                "A forgotten first-aid pouch holds a bandage.".to_string()
            }
            Loot::Knife => {
                inventory.knife = true;
                "You find a knife, still sharp.".to_string()
            }
            Loot::Hatchet => {
                inventory.hatchet = true;
                "You find a hatchet with a sound handle.".to_string()
            }
        };
        ActionReport::line(action, true, OutcomeTier::High, LOG_SCAVENGE_HIGH, line)
    } else if roll >= SCAVENGE_MID {
        state.inventory.food = state.inventory.food.saturating_add(1);
        ActionReport::line(
            action,
            true,
            OutcomeTier::Mid,
            LOG_SCAVENGE_MID,
            "Picked-over ruins; one stale ration (1 food).",
        )
    } else {
        let lost = injure(state, rng, 10);
        let mut narrative = vec![format!(
            "A wall gives way in the ruins and you lose {lost} health."
        )];
        if rng.succeeds(SCAVENGE_INFECTION_CHANCE) {
            state.infection = true;
            narrative.push("The gash looks dirty. It is getting infected.".to_string());
        }
        ActionReport::new(action, false, OutcomeTier::Low, LOG_SCAVENGE_LOW, narrative)
    }
}

pub fn rest<R: RandomSource + ?Sized>(state: &mut PlayerState, rng: &mut R) -> ActionReport {
    let amount = rng.roll_die(6) + u32::from(state.attributes.endurance / 2);
    let healed = state.heal(amount);
    let mut narrative = vec![format!("You rest and recover {healed} health.")];
    grow(state, Attribute::Endurance, REST_ENDURANCE_GROWTH, rng, &mut narrative);
    ActionReport::new(ActionId::Rest, true, OutcomeTier::Automatic, LOG_REST, narrative)
}

pub fn eat(state: &mut PlayerState) -> ActionReport {
    if state.inventory.food == 0 {
        return ActionReport::line(
            ActionId::Eat,
            false,
            OutcomeTier::Blocked,
            LOG_EAT_EMPTY,
            "You have nothing to eat.",
        );
    }
    state.inventory.food -= 1;
    state.adjust_hunger(-EAT_HUNGER_RELIEF);
    ActionReport::line(
        ActionId::Eat,
        true,
        OutcomeTier::Automatic,
        LOG_EAT,
        format!("You eat. Hunger is now {}.", state.vitals.hunger),
    )
}

pub fn drink(state: &mut PlayerState) -> ActionReport {
    if state.inventory.water == 0 {
        return ActionReport::line(
            ActionId::Drink,
            false,
            OutcomeTier::Blocked,
            LOG_DRINK_EMPTY,
            "You have no water.",
        );
    }
    state.inventory.water -= 1;
    state.adjust_thirst(-DRINK_THIRST_RELIEF);
    ActionReport::line(
        ActionId::Drink,
        true,
        OutcomeTier::Automatic,
        LOG_DRINK,
        format!("You drink. Thirst is now {}.", state.vitals.thirst),
    )
}

/// Shelter building is plain labor: the difficulty bonus does not apply.
pub fn build_shelter<R: RandomSource + ?Sized>(
    state: &mut PlayerState,
    rng: &mut R,
) -> ActionReport {
    let action = ActionId::BuildShelter;
    if state.shelter {
        return ActionReport::line(
            action,
            true,
            OutcomeTier::Automatic,
            LOG_SHELTER_EXISTS,
            "Your shelter is already secure.",
        );
    }
    let roll = roll_to_i32(rng.roll_die(20)) + SHELTER_ROLL_BONUS;
    if roll >= SHELTER_TARGET {
        state.shelter = true;
        ActionReport::line(
            action,
            true,
            OutcomeTier::High,
            LOG_SHELTER_BUILT,
            "You lash together a lean-to that will keep the wind off.",
        )
    } else {
        ActionReport::line(
            action,
            false,
            OutcomeTier::Low,
            LOG_SHELTER_FAILED,
            "The frame collapses. No shelter tonight.",
        )
    }
}

pub fn make_fire<R: RandomSource + ?Sized>(
    state: &mut PlayerState,
    rng: &mut R,
    difficulty: &DifficultyProfile,
) -> ActionReport {
    let action = ActionId::MakeFire;
    let hatchet = if state.inventory.hatchet {
        HATCHET_BONUS
    } else {
        0
    };
    let roll = difficulty.player_roll(rng) + hatchet + state.season.profile().fire_mod;
    if roll < FIRE_TARGET {
        state.fire = false;
        return ActionReport::line(
            action,
            false,
            OutcomeTier::Low,
            LOG_FIRE_FAILED,
            "The tinder smokes and dies.",
        );
    }
    state.fire = true;
    state.temperature = state.temperature.max(FIRE_MIN_TEMPERATURE);
    let mut narrative = vec!["The fire catches and throws off real heat.".to_string()];
    if state.inventory.food > 0 && rng.succeeds(FIRE_FOOD_CHANCE) {
        state.inventory.food = state.inventory.food.saturating_add(1);
        narrative.push("You roast roots in the embers (1 food).".to_string());
    }
    ActionReport::new(action, true, OutcomeTier::High, LOG_FIRE_LIT, narrative)
}

pub fn set_trap<R: RandomSource + ?Sized>(
    state: &mut PlayerState,
    rng: &mut R,
    difficulty: &DifficultyProfile,
) -> ActionReport {
    let action = ActionId::SetTrap;
    if state.trap_set {
        return ActionReport::line(
            action,
            true,
            OutcomeTier::Automatic,
            LOG_TRAP_EXISTS,
            "Your trap is already waiting.",
        );
    }
    if difficulty.player_roll(rng) >= TRAP_TARGET {
        state.trap_set = true;
        ActionReport::line(
            action,
            true,
            OutcomeTier::High,
            LOG_TRAP_SET,
            "You set a snare along a game trail.",
        )
    } else {
        ActionReport::line(
            action,
            false,
            OutcomeTier::Low,
            LOG_TRAP_FAILED,
            "The snare keeps springing. You give up for today.",
        )
    }
}

pub fn craft_bandage<R: RandomSource + ?Sized>(
    state: &mut PlayerState,
    rng: &mut R,
    difficulty: &DifficultyProfile,
) -> ActionReport {
    let action = ActionId::CraftBandage;
    if state.inventory.cloth > 0 {
        state.inventory.cloth -= 1;
        state.inventory.bandages = state.inventory.bandages.saturating_add(1);
        return ActionReport::line(
            action,
            true,
            OutcomeTier::Automatic,
            LOG_BANDAGE_CRAFTED,
            "You tear cloth into a clean bandage.",
        );
    }
    if difficulty.player_roll(rng) >= HERB_BANDAGE_TARGET {
        state.inventory.bandages = state.inventory.bandages.saturating_add(1);
        ActionReport::line(
            action,
            true,
            OutcomeTier::Mid,
            LOG_BANDAGE_HERBS,
            "You bind moss and broad leaves into a rough bandage.",
        )
    } else {
        ActionReport::line(
            action,
            false,
            OutcomeTier::Low,
            LOG_BANDAGE_CRAFT_FAILED,
            "Without cloth, nothing you try holds together.",
        )
    }
}

pub fn use_bandage(state: &mut PlayerState) -> ActionReport {
    let action = ActionId::UseBandage;
    if state.inventory.bandages == 0 {
        return ActionReport::line(
            action,
            false,
            OutcomeTier::Blocked,
            LOG_BANDAGE_NONE,
            "You have no bandages.",
        );
    }
    state.inventory.bandages -= 1;
    let healed = state.heal(u32::try_from(BANDAGE_HEAL).unwrap_or(0));
    let mut narrative = vec![format!("You dress your wounds and recover {healed} health.")];
    if state.status_effects.remove(EffectKind::Bleeding) {
        narrative.push("The bleeding stops.".to_string());
    }
    if state.infection {
        state.infection = false;
        narrative.push("The infection is cleaned out.".to_string());
    }
    ActionReport::new(action, true, OutcomeTier::Automatic, LOG_BANDAGE_APPLIED, narrative)
}

fn trade_with_merchant(state: &mut PlayerState, order: TradeOrder) -> ActionReport {
    let report = trade(state, order);
    let tier = if report.completed {
        OutcomeTier::Automatic
    } else {
        OutcomeTier::Blocked
    };
    ActionReport::line(
        ActionId::Trade(order),
        report.completed,
        tier,
        report.log_key,
        report.line,
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::field_reassign_with_default)]

    use super::*;
    use crate::difficulty::select_difficulty;
    use crate::rng::ScriptedRolls;
    use crate::season::Season;

    fn normal() -> DifficultyProfile {
        DifficultyProfile::normal()
    }

    #[test]
    fn action_ids_round_trip_and_reject_unknowns() {
        for action in ActionId::CATALOG {
            assert_eq!(action.as_str().parse::<ActionId>(), Ok(action));
        }
        assert_eq!(" FORAGE ".parse::<ActionId>(), Ok(ActionId::Forage));
        assert!(matches!(
            "dance".parse::<ActionId>(),
            Err(ActionError::UnknownAction { .. })
        ));
    }

    #[test]
    fn forage_high_tier_gathers_food_and_water() {
        let mut state = PlayerState::default();
        let (food, water) = (state.inventory.food, state.inventory.water);
        let mut rng = ScriptedRolls::new().with_rolls([17, 3, 2]);
        let report = forage(&mut state, &mut rng, &normal());
        assert!(report.success);
        assert_eq!(report.tier, OutcomeTier::High);
        assert_eq!(state.inventory.food, food + 3);
        assert_eq!(state.inventory.water, water + 2);
    }

    #[test]
    fn forage_low_tier_injures() {
        let mut state = PlayerState::default();
        let mut rng = ScriptedRolls::new().with_rolls([3, 5]);
        let report = forage(&mut state, &mut rng, &normal());
        assert!(!report.success);
        assert_eq!(report.tier, OutcomeTier::Low);
        assert_eq!(state.vitals.health, 95);
        assert_eq!(state.last_damage, Some(DamageCause::Injury));
    }

    #[test]
    fn gathering_log_keys_name_action_and_tier() {
        let gathering = [
            ActionId::Forage,
            ActionId::Hunt,
            ActionId::ExploreRiver,
            ActionId::ScavengeRuins,
        ];
        for action in gathering {
            let mut state = PlayerState::default();
            let report = perform(action, &mut state, &mut ScriptedRolls::new(), &normal());
            assert_eq!(report.tier, OutcomeTier::Low);
            assert_eq!(report.log_key, format!("log.action.{action}.low"));

            let mut state = PlayerState::default();
            let mut rng = ScriptedRolls::new().with_rolls([20]);
            let report = perform(action, &mut state, &mut rng, &normal());
            assert_eq!(report.tier, OutcomeTier::High);
            assert_eq!(report.log_key, format!("log.action.{action}.high"));
        }
    }

    #[test]
    fn difficulty_bonus_moves_tiers() {
        let easy = select_difficulty("Easy").expect("easy");
        let hard = select_difficulty("Hard").expect("hard");

        let mut state = PlayerState::default();
        let mut rng = ScriptedRolls::new().with_rolls([6]);
        assert_eq!(forage(&mut state, &mut rng, &easy).tier, OutcomeTier::Mid);

        let mut state = PlayerState::default();
        let mut rng = ScriptedRolls::new().with_rolls([9, 1]);
        assert_eq!(forage(&mut state, &mut rng, &hard).tier, OutcomeTier::Low);
    }

    #[test]
    fn hunt_adds_knife_and_strength() {
        let mut state = PlayerState::default();
        state.inventory.knife = true;
        state.attributes.strength = 3;
        let food = state.inventory.food;
        // 11 + knife 2 + strength 3 = 16
        let mut rng = ScriptedRolls::new().with_rolls([11, 4]);
        let report = hunt(&mut state, &mut rng, &normal());
        assert_eq!(report.tier, OutcomeTier::High);
        assert_eq!(state.inventory.food, food + 4);
    }

    #[test]
    fn river_failure_can_lose_the_knife() {
        let mut state = PlayerState::default();
        state.inventory.knife = true;
        let mut rng = ScriptedRolls::new().with_rolls([2, 4]).with_chances([0.05]);
        let report = explore_river(&mut state, &mut rng, &normal());
        assert!(!report.success);
        assert!(!state.inventory.knife);
        assert_eq!(state.vitals.health, 96);
    }

    #[test]
    fn scavenge_failure_may_infect() {
        let mut state = PlayerState::default();
        let mut rng = ScriptedRolls::new().with_rolls([1, 10]).with_chances([0.2]);
        let report = scavenge_ruins(&mut state, &mut rng, &normal());
        assert!(!report.success);
        assert!(state.infection);
        assert_eq!(state.vitals.health, 90);
    }

    #[test]
    fn scavenge_high_tier_can_find_tools() {
        let mut state = PlayerState::default();
        state.inventory.hatchet = true;
        // 14 + hatchet 2 = 16; loot index 4 = knife
        let mut rng = ScriptedRolls::new().with_rolls([14, 4]);
        let report = scavenge_ruins(&mut state, &mut rng, &normal());
        assert_eq!(report.tier, OutcomeTier::High);
        assert!(state.inventory.knife);
    }

    #[test]
    fn rest_heals_with_endurance_bonus() {
        let mut state = PlayerState::default();
        state.vitals.health = 50;
        state.attributes.endurance = 5;
        let mut rng = ScriptedRolls::new().with_rolls([4]);
        let report = rest(&mut state, &mut rng);
        assert!(report.success);
        assert_eq!(state.vitals.health, 56);
    }

    #[test]
    fn eat_floors_hunger_and_fails_without_food() {
        let mut state = PlayerState::default();
        state.inventory.food = 0;
        let before = state.clone();
        assert!(!eat(&mut state).success);
        assert_eq!(state, before);

        state.inventory.food = 1;
        state.vitals.hunger = 10;
        assert!(eat(&mut state).success);
        assert_eq!(state.inventory.food, 0);
        assert_eq!(state.vitals.hunger, 0);
    }

    #[test]
    fn drink_relieves_thirst() {
        let mut state = PlayerState::default();
        state.inventory.water = 1;
        state.vitals.thirst = 50;
        assert!(drink(&mut state).success);
        assert_eq!(state.vitals.thirst, 15);
        assert!(!drink(&mut state).success);
    }

    #[test]
    fn shelter_ignores_difficulty_bonus() {
        let easy = select_difficulty("Easy").expect("easy");
        let mut state = PlayerState::default();
        let mut rng = ScriptedRolls::new().with_rolls([9]);
        let report = perform(ActionId::BuildShelter, &mut state, &mut rng, &easy);
        assert!(!report.success, "9 + 2 misses 12 even on Easy");
        let mut rng = ScriptedRolls::new().with_rolls([10]);
        assert!(build_shelter(&mut state, &mut rng).success);
        assert!(state.shelter);
        let mut rng = ScriptedRolls::new();
        let again = build_shelter(&mut state, &mut rng);
        assert!(again.success);
        assert_eq!(again.log_key, LOG_SHELTER_EXISTS);
    }

    #[test]
    fn fire_uses_season_modifier_and_warms() {
        let mut state = PlayerState::default();
        state.season = Season::Winter;
        state.temperature = -15;
        let mut rng = ScriptedRolls::new().with_rolls([11]);
        assert!(!make_fire(&mut state, &mut rng, &normal()).success);
        assert!(!state.fire);

        state.season = Season::Summer;
        let mut rng = ScriptedRolls::new().with_rolls([8]).with_chances([0.1]);
        let food = state.inventory.food;
        assert!(make_fire(&mut state, &mut rng, &normal()).success);
        assert!(state.fire);
        assert_eq!(state.temperature, 5);
        assert_eq!(state.inventory.food, food + 1);
    }

    #[test]
    fn trap_is_noop_when_already_set() {
        let mut state = PlayerState::default();
        let mut rng = ScriptedRolls::new().with_rolls([8]);
        assert!(set_trap(&mut state, &mut rng, &normal()).success);
        assert!(state.trap_set);
        let mut rng = ScriptedRolls::new();
        let report = set_trap(&mut state, &mut rng, &normal());
        assert_eq!(report.log_key, LOG_TRAP_EXISTS);
    }

    #[test]
    fn craft_bandage_prefers_cloth_then_herbs() {
        let mut state = PlayerState::default();
        state.inventory.cloth = 1;
        let mut rng = ScriptedRolls::new();
        assert!(craft_bandage(&mut state, &mut rng, &normal()).success);
        assert_eq!(state.inventory.cloth, 0);
        assert_eq!(state.inventory.bandages, 1);

        let mut rng = ScriptedRolls::new().with_rolls([12]);
        let herbs = craft_bandage(&mut state, &mut rng, &normal());
        assert_eq!(herbs.log_key, LOG_BANDAGE_HERBS);
        assert_eq!(state.inventory.bandages, 2);

        let mut rng = ScriptedRolls::new().with_rolls([11]);
        assert!(!craft_bandage(&mut state, &mut rng, &normal()).success);
    }

    #[test]
    fn bandage_clears_bleeding_and_infection() {
        let mut state = PlayerState::default();
        state.inventory.bandages = 1;
        state.vitals.health = 50;
        state.status_effects.apply(EffectKind::Bleeding, 2);
        state.infection = true;

        let report = use_bandage(&mut state);
        assert!(report.success);
        assert_eq!(state.inventory.bandages, 0);
        assert_eq!(state.vitals.health, 58);
        assert!(state.status_effects.is_empty());
        assert!(!state.infection);

        assert!(!use_bandage(&mut state).success);
    }

    #[test]
    fn bandage_heal_is_capped() {
        let mut state = PlayerState::default();
        state.inventory.bandages = 1;
        state.vitals.health = 97;
        assert!(use_bandage(&mut state).success);
        assert_eq!(state.vitals.health, 100);
    }

    #[test]
    fn trade_actions_route_to_merchant() {
        let mut state = PlayerState::default();
        state.inventory.gold = 2;
        let mut rng = ScriptedRolls::new();
        let report = perform(
            ActionId::Trade(TradeOrder::BuyWater),
            &mut state,
            &mut rng,
            &normal(),
        );
        assert!(report.success);
        assert_eq!(state.inventory.gold, 0);
        let blocked = perform(
            ActionId::Trade(TradeOrder::BuyBandage),
            &mut state,
            &mut rng,
            &normal(),
        );
        assert_eq!(blocked.tier, OutcomeTier::Blocked);
    }
}
