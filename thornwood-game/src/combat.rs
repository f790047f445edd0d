//! Turn-based combat and the encounters built on it.
//!
//! A [`Combat`] is a small state machine: it starts `Ongoing` and ends in
//! `Victory`, `Defeat` or `Fled`. Fleeing is a single attempt; a failed
//! attempt still ends the fight, only with damage taken on the way out.
//! Choices come from the caller through [`EncounterDecider`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BANDIT_HEALTH_PER_MEMBER, BANDIT_LOOT_KNIFE_CHANCE, BEAR_BLEED_TURNS, BEAR_MAUL_MARGIN,
    ENEMY_BLEED_CHANCE, ENEMY_BLEED_MARGIN, FLEE_AGILITY_GROWTH, FLEE_TARGET,
    SNAKE_POISON_CHANCE, SNAKE_POISON_TURNS, WILDLIFE_STRENGTH_GROWTH,
};
use crate::difficulty::DifficultyProfile;
use crate::numbers::roll_to_i32;
use crate::rng::{RandomSource, pick};
use crate::state::{Attribute, DamageCause, PlayerState};
use crate::status::EffectKind;
use crate::trade::TradeOrder;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CombatError {
    #[error("invalid enemy `{name}`: {reason}")]
    InvalidEnemy { name: String, reason: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Wolf,
    Bear,
    HostileSurvivor,
    Snake,
    Bandits,
}

impl EnemyKind {
    pub const WILDLIFE: [Self; 4] = [Self::Wolf, Self::Bear, Self::HostileSurvivor, Self::Snake];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Wolf => "Wolf",
            Self::Bear => "Bear",
            Self::HostileSurvivor => "Hostile Survivor",
            Self::Snake => "Snake",
            Self::Bandits => "Bandit Group",
        }
    }
}

/// A transient opponent, alive only for one encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub kind: EnemyKind,
    pub health: u32,
    pub strength: u32,
    #[serde(default)]
    pub bleeding: bool,
}

impl Enemy {
    #[must_use]
    pub fn wildlife(kind: EnemyKind) -> Self {
        let (health, strength) = match kind {
            EnemyKind::Wolf => (12, 2),
            EnemyKind::Bear => (20, 4),
            EnemyKind::HostileSurvivor => (15, 3),
            EnemyKind::Snake => (8, 1),
            EnemyKind::Bandits => (BANDIT_HEALTH_PER_MEMBER, 2),
        };
        Self {
            name: kind.label().to_string(),
            kind,
            health,
            strength,
            bleeding: false,
        }
    }

    /// A bandit group; angry groups (unpaid demands) hit one point harder.
    #[must_use]
    pub fn bandit_group(members: u32, angry: bool) -> Self {
        let name = if angry {
            format!("Angry Bandit Group ({members})")
        } else {
            format!("Bandit Group ({members})")
        };
        Self {
            name,
            kind: EnemyKind::Bandits,
            health: BANDIT_HEALTH_PER_MEMBER.saturating_mul(members),
            strength: members.saturating_add(if angry { 2 } else { 1 }),
            bleeding: false,
        }
    }

    /// Reject opponents that cannot take part in a fight.
    ///
    /// # Errors
    ///
    /// Returns `CombatError::InvalidEnemy` for a blank name or zero health.
    pub fn validate(&self) -> Result<(), CombatError> {
        let reason = if self.name.trim().is_empty() {
            "missing name"
        } else if self.health == 0 {
            "no health"
        } else {
            return Ok(());
        };
        Err(CombatError::InvalidEnemy {
            name: self.name.clone(),
            reason,
        })
    }

    fn strength_bonus(&self) -> i32 {
        roll_to_i32(self.strength)
    }
}

impl fmt::Display for Enemy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} health, {} strength)",
            self.name, self.health, self.strength
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatCommand {
    Attack,
    Flee,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BanditResponse {
    Fight,
    Pay,
    Flee,
}

/// Source of encounter choices; supplied by whoever drives the session.
pub trait EncounterDecider {
    fn combat_command(&mut self, state: &PlayerState, enemy: &Enemy) -> CombatCommand;

    fn bandit_response(&mut self, state: &PlayerState, bandits: u32, demand: u32)
    -> BanditResponse;

    fn merchant_order(&mut self, state: &PlayerState) -> TradeOrder;
}

impl<D: EncounterDecider + ?Sized> EncounterDecider for Box<D> {
    fn combat_command(&mut self, state: &PlayerState, enemy: &Enemy) -> CombatCommand {
        (**self).combat_command(state, enemy)
    }

    fn bandit_response(
        &mut self,
        state: &PlayerState,
        bandits: u32,
        demand: u32,
    ) -> BanditResponse {
        (**self).bandit_response(state, bandits, demand)
    }

    fn merchant_order(&mut self, state: &PlayerState) -> TradeOrder {
        (**self).merchant_order(state)
    }
}

/// Default decider: fights only while healthy, pays when it can, buys what
/// it lacks.
#[derive(Debug, Clone, Copy, Default)]
pub struct CautiousDecider;

impl EncounterDecider for CautiousDecider {
    fn combat_command(&mut self, state: &PlayerState, enemy: &Enemy) -> CombatCommand {
        let danger = roll_to_i32(enemy.strength.saturating_mul(6));
        if state.vitals.health > danger.max(30) {
            CombatCommand::Attack
        } else {
            CombatCommand::Flee
        }
    }

    fn bandit_response(
        &mut self,
        state: &PlayerState,
        _bandits: u32,
        demand: u32,
    ) -> BanditResponse {
        if state.inventory.gold >= demand {
            BanditResponse::Pay
        } else {
            BanditResponse::Flee
        }
    }

    fn merchant_order(&mut self, state: &PlayerState) -> TradeOrder {
        let inventory = &state.inventory;
        if inventory.bandages == 0 && inventory.gold >= TradeOrder::BuyBandage.price() {
            TradeOrder::BuyBandage
        } else if inventory.water < 2 && inventory.gold >= TradeOrder::BuyWater.price() {
            TradeOrder::BuyWater
        } else {
            TradeOrder::Leave
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatPhase {
    Ongoing,
    Victory,
    Defeat,
    Fled { clean: bool },
}

impl CombatPhase {
    #[must_use]
    pub const fn is_over(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

/// One exchange of blows or one escape attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombatRound {
    pub command: CombatCommand,
    pub player_roll: i32,
    pub enemy_roll: Option<i32>,
    pub damage_to_enemy: u32,
    pub damage_to_player: i32,
}

#[derive(Debug, Clone)]
pub struct Combat {
    enemy: Enemy,
    phase: CombatPhase,
    rounds: Vec<CombatRound>,
    narrative: Vec<String>,
}

impl Combat {
    /// Open an encounter.
    ///
    /// # Errors
    ///
    /// Returns `CombatError::InvalidEnemy` when the opponent fails validation;
    /// nothing has been rolled or applied at that point.
    pub fn new(enemy: Enemy) -> Result<Self, CombatError> {
        enemy.validate()?;
        let narrative = vec![format!("A {enemy} appears!")];
        Ok(Self {
            enemy,
            phase: CombatPhase::Ongoing,
            rounds: Vec::new(),
            narrative,
        })
    }

    #[must_use]
    pub const fn phase(&self) -> CombatPhase {
        self.phase
    }

    #[must_use]
    pub const fn enemy(&self) -> &Enemy {
        &self.enemy
    }

    #[must_use]
    pub fn rounds(&self) -> &[CombatRound] {
        &self.rounds
    }

    /// Resolve one command. Does nothing once the fight is over.
    pub fn step<R: RandomSource + ?Sized>(
        &mut self,
        command: CombatCommand,
        state: &mut PlayerState,
        rng: &mut R,
        difficulty: &DifficultyProfile,
    ) -> CombatPhase {
        if self.phase.is_over() {
            return self.phase;
        }
        match command {
            CombatCommand::Attack => self.attack(state, rng, difficulty),
            CombatCommand::Flee => self.flee(state, rng),
        }
        self.phase
    }

    fn attack<R: RandomSource + ?Sized>(
        &mut self,
        state: &mut PlayerState,
        rng: &mut R,
        difficulty: &DifficultyProfile,
    ) {
        let player_roll =
            difficulty.player_roll(rng) + state.attribute_bonus(Attribute::Strength);
        let enemy_roll = roll_to_i32(rng.roll_die(20)) + self.enemy.strength_bonus();
        self.narrative
            .push(format!("You roll {player_roll} against {enemy_roll}."));

        let mut round = CombatRound {
            command: CombatCommand::Attack,
            player_roll,
            enemy_roll: Some(enemy_roll),
            damage_to_enemy: 0,
            damage_to_player: 0,
        };

        if player_roll >= enemy_roll {
            let damage =
                rng.roll_die(6) + u32::from(state.attribute(Attribute::Strength));
            self.enemy.health = self.enemy.health.saturating_sub(damage);
            round.damage_to_enemy = damage;
            self.narrative.push(format!("You hit for {damage} damage."));
            if player_roll >= enemy_roll + ENEMY_BLEED_MARGIN && rng.succeeds(ENEMY_BLEED_CHANCE) {
                self.enemy.bleeding = true;
                self.narrative
                    .push(format!("The {} is bleeding.", self.enemy.name));
            }
            if self.enemy.health == 0 {
                self.phase = CombatPhase::Victory;
                self.narrative
                    .push(format!("The {} falls.", self.enemy.name));
            }
        } else {
            let damage = rng.roll_die(6) + self.enemy.strength;
            round.damage_to_player = state.damage(damage, DamageCause::Combat);
            self.narrative
                .push(format!("You are hit for {damage} damage."));
            match self.enemy.kind {
                EnemyKind::Snake if rng.succeeds(SNAKE_POISON_CHANCE) => {
                    state
                        .status_effects
                        .apply(EffectKind::Poison, SNAKE_POISON_TURNS);
                    self.narrative
                        .push("Venom burns in your veins.".to_string());
                }
                EnemyKind::Bear if enemy_roll >= player_roll + BEAR_MAUL_MARGIN => {
                    state
                        .status_effects
                        .apply(EffectKind::Bleeding, BEAR_BLEED_TURNS);
                    self.narrative
                        .push("The bear's claws leave you bleeding.".to_string());
                }
                _ => {}
            }
            if state.is_dead() {
                self.phase = CombatPhase::Defeat;
            }
        }
        self.rounds.push(round);
    }

    fn flee<R: RandomSource + ?Sized>(&mut self, state: &mut PlayerState, rng: &mut R) {
        let flee_roll =
            roll_to_i32(rng.roll_die(20)) + state.attribute_bonus(Attribute::Agility);
        let mut round = CombatRound {
            command: CombatCommand::Flee,
            player_roll: flee_roll,
            enemy_roll: None,
            damage_to_enemy: 0,
            damage_to_player: 0,
        };
        if flee_roll >= FLEE_TARGET {
            self.narrative.push("You slip away.".to_string());
            if state.check_stat_increase(Attribute::Agility, FLEE_AGILITY_GROWTH, rng) {
                self.narrative.push(format!(
                    "Your agility improved to {}.",
                    state.attributes.agility
                ));
            }
            self.phase = CombatPhase::Fled { clean: true };
        } else {
            let damage = rng.roll_die(4) + self.enemy.strength;
            round.damage_to_player = state.damage(damage, DamageCause::Combat);
            self.narrative.push(format!(
                "You break away but take {damage} damage in the retreat."
            ));
            self.phase = if state.is_dead() {
                CombatPhase::Defeat
            } else {
                CombatPhase::Fled { clean: false }
            };
        }
        self.rounds.push(round);
    }

    #[must_use]
    pub fn finish(self) -> CombatResult {
        CombatResult {
            enemy: self.enemy,
            outcome: self.phase,
            rounds: self.rounds.len(),
            narrative: self.narrative,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombatResult {
    pub enemy: Enemy,
    pub outcome: CombatPhase,
    pub rounds: usize,
    pub narrative: Vec<String>,
}

impl CombatResult {
    /// True only when the enemy was beaten; fleeing and dying are both false.
    #[must_use]
    pub const fn victory(&self) -> bool {
        matches!(self.outcome, CombatPhase::Victory)
    }
}

/// Fight until someone drops or the survivor runs.
///
/// # Errors
///
/// Returns `CombatError::InvalidEnemy` before any roll when the opponent is
/// malformed.
pub fn resolve_combat<R, D>(
    state: &mut PlayerState,
    enemy: Enemy,
    rng: &mut R,
    difficulty: &DifficultyProfile,
    decider: &mut D,
) -> Result<CombatResult, CombatError>
where
    R: RandomSource + ?Sized,
    D: EncounterDecider + ?Sized,
{
    let mut combat = Combat::new(enemy)?;
    while !combat.phase().is_over() {
        let command = decider.combat_command(state, combat.enemy());
        combat.step(command, state, rng, difficulty);
    }
    let result = combat.finish();
    log::debug!(
        "combat vs {} ended {:?} after {} rounds",
        result.enemy.name,
        result.outcome,
        result.rounds
    );
    Ok(result)
}

/// How a bandit encounter ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BanditOutcome {
    Paid { amount: u32 },
    Fought { outcome: CombatPhase, loot: u32 },
    Escaped,
    CaughtFleeing { damage: i32, gold_lost: u32 },
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BanditReport {
    pub bandits: u32,
    pub demand: u32,
    pub response: BanditResponse,
    pub outcome: BanditOutcome,
    pub narrative: Vec<String>,
}

/// Bandits demand gold; the decider picks fight, pay or flee.
pub fn resolve_bandits<R, D>(
    state: &mut PlayerState,
    rng: &mut R,
    difficulty: &DifficultyProfile,
    decider: &mut D,
) -> BanditReport
where
    R: RandomSource + ?Sized,
    D: EncounterDecider + ?Sized,
{
    let bandits = rng.range(1, 3);
    let demand = bandits * rng.range(3, 6);
    let mut narrative = vec![format!(
        "{bandits} bandits block the path and demand {demand} gold."
    )];
    let response = decider.bandit_response(state, bandits, demand);

    let outcome = match response {
        BanditResponse::Pay if state.inventory.gold >= demand => {
            state.inventory.gold -= demand;
            narrative.push(format!("You hand over {demand} gold. They let you pass."));
            BanditOutcome::Paid { amount: demand }
        }
        BanditResponse::Pay | BanditResponse::Fight => {
            let angry = response == BanditResponse::Pay;
            if angry {
                narrative.push("You cannot pay. The bandits attack!".to_string());
            }
            match resolve_combat(
                state,
                Enemy::bandit_group(bandits, angry),
                rng,
                difficulty,
                decider,
            ) {
                Ok(result) => {
                    let mut loot = 0;
                    narrative.extend(result.narrative.iter().cloned());
                    if !angry && result.victory() {
                        loot = rng.range(2, 5) * bandits;
                        state.inventory.gold = state.inventory.gold.saturating_add(loot);
                        narrative.push(format!("The bandits scatter, leaving {loot} gold."));
                        if rng.succeeds(BANDIT_LOOT_KNIFE_CHANCE) {
                            state.inventory.knife = true;
                            narrative.push("One of them dropped a knife.".to_string());
                        }
                    }
                    BanditOutcome::Fought {
                        outcome: result.outcome,
                        loot,
                    }
                }
                Err(err) => {
                    log::warn!("bandit encounter aborted: {err}");
                    narrative.push(format!("The encounter falls apart ({err})."));
                    BanditOutcome::Aborted
                }
            }
        }
        BanditResponse::Flee => {
            let roll = roll_to_i32(rng.roll_die(20)) + state.attribute_bonus(Attribute::Agility);
            if roll >= FLEE_TARGET + roll_to_i32(bandits) {
                narrative.push("You outrun them.".to_string());
                BanditOutcome::Escaped
            } else {
                let raw = rng.roll_dice(2, 4).saturating_mul(bandits);
                let damage = state.damage(raw, DamageCause::Combat);
                let gold_lost = state.inventory.gold.min(rng.range(1, 5) * bandits);
                state.inventory.gold -= gold_lost;
                narrative.push(format!(
                    "They run you down: {raw} damage and {gold_lost} gold taken."
                ));
                BanditOutcome::CaughtFleeing { damage, gold_lost }
            }
        }
    };

    BanditReport {
        bandits,
        demand,
        response,
        outcome,
        narrative,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WildlifeReport {
    pub kind: EnemyKind,
    pub outcome: CombatPhase,
    pub food_gained: u32,
    pub narrative: Vec<String>,
}

/// A random animal or desperate survivor attacks.
///
/// # Errors
///
/// Propagates `CombatError::InvalidEnemy` from the combat setup.
pub fn resolve_wildlife<R, D>(
    state: &mut PlayerState,
    rng: &mut R,
    difficulty: &DifficultyProfile,
    decider: &mut D,
) -> Result<WildlifeReport, CombatError>
where
    R: RandomSource + ?Sized,
    D: EncounterDecider + ?Sized,
{
    let kind = pick(rng, &EnemyKind::WILDLIFE)
        .copied()
        .unwrap_or(EnemyKind::Wolf);
    let result = resolve_combat(state, Enemy::wildlife(kind), rng, difficulty, decider)?;
    let mut narrative = result.narrative.clone();
    let mut food_gained = 0;
    if result.victory() {
        food_gained = rng.range(1, 3);
        state.inventory.food = state.inventory.food.saturating_add(food_gained);
        narrative.push(format!("You salvage {food_gained} food."));
        if state.check_stat_increase(Attribute::Strength, WILDLIFE_STRENGTH_GROWTH, rng) {
            narrative.push(format!(
                "Your strength improved to {}.",
                state.attributes.strength
            ));
        }
    }
    Ok(WildlifeReport {
        kind,
        outcome: result.outcome,
        food_gained,
        narrative,
    })
}
