use std::fmt;
use std::str::FromStr;

use anyhow::{Error, bail};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thornwood_game::{
    ActionId, BanditResponse, CautiousDecider, CombatCommand, EffectKind, EncounterDecider, Enemy,
    PlayerState, Season, TradeOrder,
};

/// Action chosen by a [`PlayerPolicy`] plus the reason behind it.
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub action: ActionId,
    pub rationale: &'static str,
}

impl PolicyDecision {
    #[must_use]
    pub const fn new(action: ActionId, rationale: &'static str) -> Self {
        Self { action, rationale }
    }
}

/// Day-action interface for automated play.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    fn choose_action(&mut self, state: &PlayerState) -> PolicyDecision;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameplayStrategy {
    Cautious,
    Balanced,
    Aggressive,
    Random,
}

impl GameplayStrategy {
    pub const ALL: [Self; 4] = [Self::Cautious, Self::Balanced, Self::Aggressive, Self::Random];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cautious => "Cautious",
            Self::Balanced => "Balanced",
            Self::Aggressive => "Aggressive",
            Self::Random => "Random",
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Cautious => "cautious",
            Self::Balanced => "balanced",
            Self::Aggressive => "aggressive",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy> {
        match self {
            Self::Cautious => Box::new(CautiousPolicy),
            Self::Balanced => Box::new(BalancedPolicy),
            Self::Aggressive => Box::new(AggressivePolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }

    /// Encounter choices that go with the day policy.
    #[must_use]
    pub fn create_decider(self) -> Box<dyn EncounterDecider> {
        match self {
            Self::Aggressive => Box::new(BoldDecider),
            Self::Cautious | Self::Balanced | Self::Random => Box::new(CautiousDecider),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GameplayStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        if let Some(strategy) = Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(wanted))
        {
            return Ok(strategy);
        }
        bail!("Unknown strategy: {wanted}")
    }
}

/// Parse a strategy list; `all` expands to every built-in strategy.
pub fn resolve_strategies(tokens: &[String]) -> anyhow::Result<Vec<GameplayStrategy>> {
    let mut strategies = Vec::new();
    for token in tokens {
        if token.eq_ignore_ascii_case("all") {
            strategies.extend(GameplayStrategy::ALL);
            continue;
        }
        strategies.push(token.parse()?);
    }
    let mut seen = Vec::new();
    strategies.retain(|strategy| {
        if seen.contains(strategy) {
            return false;
        }
        seen.push(*strategy);
        true
    });
    if strategies.is_empty() {
        strategies.push(GameplayStrategy::Cautious);
    }
    Ok(strategies)
}

struct CautiousPolicy;
struct BalancedPolicy;
struct AggressivePolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

/// Needs that must be met before anything else, in priority order.
fn urgent_need(state: &PlayerState, need_threshold: i32) -> Option<PolicyDecision> {
    let vitals = state.vitals;
    let inventory = state.inventory;
    if vitals.thirst >= need_threshold && inventory.water > 0 {
        return Some(PolicyDecision::new(ActionId::Drink, "thirsty"));
    }
    if vitals.hunger >= need_threshold && inventory.food > 0 {
        return Some(PolicyDecision::new(ActionId::Eat, "hungry"));
    }
    let wounded = state.status_effects.contains(EffectKind::Bleeding) || state.infection;
    if wounded && inventory.bandages > 0 {
        return Some(PolicyDecision::new(ActionId::UseBandage, "wounded"));
    }
    None
}

const fn cold_season(season: Season) -> bool {
    matches!(season, Season::Fall | Season::Winter)
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn choose_action(&mut self, state: &PlayerState) -> PolicyDecision {
        if let Some(decision) = urgent_need(state, 40) {
            return decision;
        }
        if !state.shelter {
            return PolicyDecision::new(ActionId::BuildShelter, "no shelter");
        }
        if !state.fire && cold_season(state.season) {
            return PolicyDecision::new(ActionId::MakeFire, "cold night ahead");
        }
        if state.vitals.health < 50 {
            return PolicyDecision::new(ActionId::Rest, "low health");
        }
        if state.inventory.water < 2 {
            return PolicyDecision::new(ActionId::ExploreRiver, "low water");
        }
        if !state.trap_set {
            return PolicyDecision::new(ActionId::SetTrap, "trap idle");
        }
        PolicyDecision::new(ActionId::Forage, "stock up")
    }
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn choose_action(&mut self, state: &PlayerState) -> PolicyDecision {
        if let Some(decision) = urgent_need(state, 50) {
            return decision;
        }
        let inventory = state.inventory;
        if inventory.bandages == 0 && inventory.gold >= TradeOrder::BuyBandage.price() {
            return PolicyDecision::new(ActionId::Trade(TradeOrder::BuyBandage), "buy bandage");
        }
        if inventory.bandages == 0 && inventory.cloth >= 2 {
            return PolicyDecision::new(ActionId::CraftBandage, "craft bandage");
        }
        if !state.shelter {
            return PolicyDecision::new(ActionId::BuildShelter, "no shelter");
        }
        if !state.fire && state.season != Season::Summer {
            return PolicyDecision::new(ActionId::MakeFire, "keep warm");
        }
        if state.vitals.health < 40 {
            return PolicyDecision::new(ActionId::Rest, "low health");
        }
        match state.day % 4 {
            0 => PolicyDecision::new(ActionId::Hunt, "rotation"),
            1 => PolicyDecision::new(ActionId::ExploreRiver, "rotation"),
            2 => PolicyDecision::new(ActionId::ScavengeRuins, "rotation"),
            _ => PolicyDecision::new(ActionId::Forage, "rotation"),
        }
    }
}

impl PlayerPolicy for AggressivePolicy {
    fn name(&self) -> &'static str {
        "Aggressive"
    }

    fn choose_action(&mut self, state: &PlayerState) -> PolicyDecision {
        if let Some(decision) = urgent_need(state, 70) {
            return decision;
        }
        if state.vitals.health < 25 {
            return PolicyDecision::new(ActionId::Rest, "patch up");
        }
        if state.day % 2 == 0 {
            PolicyDecision::new(ActionId::Hunt, "hunt")
        } else {
            PolicyDecision::new(ActionId::ScavengeRuins, "loot")
        }
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn choose_action(&mut self, _state: &PlayerState) -> PolicyDecision {
        let index = self.rng.gen_range(0..ActionId::CATALOG.len());
        let action = ActionId::CATALOG
            .get(index)
            .copied()
            .unwrap_or(ActionId::Rest);
        PolicyDecision::new(action, "random")
    }
}

/// Stands and fights every time.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoldDecider;

impl EncounterDecider for BoldDecider {
    fn combat_command(&mut self, state: &PlayerState, _enemy: &Enemy) -> CombatCommand {
        if state.vitals.health > 15 {
            CombatCommand::Attack
        } else {
            CombatCommand::Flee
        }
    }

    fn bandit_response(
        &mut self,
        _state: &PlayerState,
        _bandits: u32,
        _demand: u32,
    ) -> BanditResponse {
        BanditResponse::Fight
    }

    fn merchant_order(&mut self, state: &PlayerState) -> TradeOrder {
        if state.inventory.gold >= TradeOrder::BuyBandage.price() {
            TradeOrder::BuyBandage
        } else if state.inventory.cloth > 0 {
            TradeOrder::SellCloth
        } else {
            TradeOrder::Leave
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::field_reassign_with_default)]

    use super::*;

    #[test]
    fn strategies_parse_case_insensitively() {
        assert_eq!(
            "Aggressive".parse::<GameplayStrategy>().unwrap(),
            GameplayStrategy::Aggressive
        );
        assert!("reckless".parse::<GameplayStrategy>().is_err());
    }

    #[test]
    fn resolve_strategies_expands_all_and_dedupes() {
        let tokens = vec!["cautious".to_string(), "all".to_string()];
        let strategies = resolve_strategies(&tokens).unwrap();
        assert_eq!(strategies, GameplayStrategy::ALL.to_vec());
        assert_eq!(
            resolve_strategies(&[]).unwrap(),
            vec![GameplayStrategy::Cautious]
        );
    }

    #[test]
    fn urgent_needs_come_first() {
        let mut state = PlayerState::default();
        state.vitals.thirst = 80;
        let mut policy = GameplayStrategy::Cautious.create_policy(1);
        assert_eq!(policy.choose_action(&state).action, ActionId::Drink);

        state.inventory.water = 0;
        state.vitals.hunger = 80;
        assert_eq!(policy.choose_action(&state).action, ActionId::Eat);
    }

    #[test]
    fn cautious_builds_shelter_before_gathering() {
        let state = PlayerState::default();
        let mut policy = GameplayStrategy::Cautious.create_policy(1);
        let decision = policy.choose_action(&state);
        assert_eq!(decision.action, ActionId::BuildShelter);
        assert_eq!(decision.rationale, "no shelter");
    }

    #[test]
    fn random_policy_is_seed_stable() {
        let state = PlayerState::default();
        let mut first = GameplayStrategy::Random.create_policy(9);
        let mut second = GameplayStrategy::Random.create_policy(9);
        for _ in 0..10 {
            assert_eq!(
                first.choose_action(&state).action,
                second.choose_action(&state).action
            );
        }
    }

    #[test]
    fn bold_decider_always_fights_bandits() {
        let state = PlayerState::default();
        let mut decider = GameplayStrategy::Aggressive.create_decider();
        assert_eq!(decider.bandit_response(&state, 3, 2), BanditResponse::Fight);
    }
}
