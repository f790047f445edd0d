//! Centralized balance and tuning constants for Thornwood game logic.
//!
//! These values define the deterministic math for the core simulation.
//! Difficulty presets live in JSON; everything else is adjusted here.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_FORAGE_HIGH: &str = "log.action.forage.high";
pub(crate) const LOG_FORAGE_MID: &str = "log.action.forage.mid";
pub(crate) const LOG_FORAGE_LOW: &str = "log.action.forage.low";
pub(crate) const LOG_HUNT_HIGH: &str = "log.action.hunt.high";
pub(crate) const LOG_HUNT_MID: &str = "log.action.hunt.mid";
pub(crate) const LOG_HUNT_LOW: &str = "log.action.hunt.low";
pub(crate) const LOG_RIVER_HIGH: &str = "log.action.explore_river.high";
pub(crate) const LOG_RIVER_MID: &str = "log.action.explore_river.mid";
pub(crate) const LOG_RIVER_LOW: &str = "log.action.explore_river.low";
pub(crate) const LOG_SCAVENGE_HIGH: &str = "log.action.scavenge_ruins.high";
pub(crate) const LOG_SCAVENGE_MID: &str = "log.action.scavenge_ruins.mid";
pub(crate) const LOG_SCAVENGE_LOW: &str = "log.action.scavenge_ruins.low";
pub(crate) const LOG_REST: &str = "log.action.rest";
pub(crate) const LOG_EAT: &str = "log.action.eat";
pub(crate) const LOG_EAT_EMPTY: &str = "log.action.eat.empty";
pub(crate) const LOG_DRINK: &str = "log.action.drink";
pub(crate) const LOG_DRINK_EMPTY: &str = "log.action.drink.empty";
pub(crate) const LOG_SHELTER_BUILT: &str = "log.action.build_shelter.built";
pub(crate) const LOG_SHELTER_FAILED: &str = "log.action.build_shelter.failed";
pub(crate) const LOG_SHELTER_EXISTS: &str = "log.action.build_shelter.exists";
pub(crate) const LOG_FIRE_LIT: &str = "log.action.make_fire.lit";
pub(crate) const LOG_FIRE_FAILED: &str = "log.action.make_fire.failed";
pub(crate) const LOG_TRAP_SET: &str = "log.action.set_trap.set";
pub(crate) const LOG_TRAP_FAILED: &str = "log.action.set_trap.failed";
pub(crate) const LOG_TRAP_EXISTS: &str = "log.action.set_trap.exists";
pub(crate) const LOG_BANDAGE_CRAFTED: &str = "log.action.craft_bandage.cloth";
pub(crate) const LOG_BANDAGE_HERBS: &str = "log.action.craft_bandage.herbs";
pub(crate) const LOG_BANDAGE_CRAFT_FAILED: &str = "log.action.craft_bandage.failed";
pub(crate) const LOG_BANDAGE_APPLIED: &str = "log.action.use_bandage.applied";
pub(crate) const LOG_BANDAGE_NONE: &str = "log.action.use_bandage.none";
pub(crate) const LOG_TRADE_BOUGHT_BANDAGE: &str = "log.action.trade.buy_bandage";
pub(crate) const LOG_TRADE_BOUGHT_WATER: &str = "log.action.trade.buy_water";
pub(crate) const LOG_TRADE_SOLD_CLOTH: &str = "log.action.trade.sell_cloth";
pub(crate) const LOG_TRADE_DECLINED: &str = "log.action.trade.declined";
pub(crate) const LOG_TRADE_LEFT: &str = "log.action.trade.leave";
pub(crate) const LOG_TRADE_REFUSED: &str = "log.action.trade.refused";
pub(crate) const LOG_NIGHT_TRAP_CAUGHT: &str = "log.night.trap.caught";
pub(crate) const LOG_NIGHT_TRAP_EMPTY: &str = "log.night.trap.empty";
pub(crate) const LOG_NIGHT_FROSTBITE: &str = "log.night.frostbite";
pub(crate) const LOG_NIGHT_SPOILAGE: &str = "log.night.spoilage";
pub(crate) const LOG_NIGHT_MERCHANT: &str = "log.night.merchant";
pub(crate) const LOG_NIGHT_BANDITS: &str = "log.night.bandits";
pub(crate) const LOG_NIGHT_WILDLIFE: &str = "log.night.wildlife";
pub(crate) const LOG_NIGHT_ABORTED: &str = "log.night.encounter-aborted";
pub(crate) const LOG_NIGHT_PREDATOR: &str = "log.night.predator";
pub(crate) const LOG_NIGHT_TRAVELER: &str = "log.night.traveler";
pub(crate) const LOG_NIGHT_QUIET: &str = "log.night.quiet";
pub(crate) const LOG_NIGHT_INFECTION: &str = "log.night.infection";

// Vitals and attributes ----------------------------------------------------
pub(crate) const VITAL_MIN: i32 = 0;
pub(crate) const VITAL_MAX: i32 = 100;
pub(crate) const ATTRIBUTE_MIN: u8 = 1;
pub(crate) const ATTRIBUTE_MAX: u8 = 10;

// Fresh survivor -----------------------------------------------------------
pub(crate) const FRESH_HEALTH: i32 = 100;
pub(crate) const FRESH_HUNGER: i32 = 10;
pub(crate) const FRESH_THIRST: i32 = 10;
pub(crate) const FRESH_FOOD: u32 = 1;
pub(crate) const FRESH_WATER: u32 = 1;
pub(crate) const FRESH_GOLD: u32 = 5;
pub(crate) const FRESH_TEMPERATURE: i32 = 25;

// Session tuning -----------------------------------------------------------
pub(crate) const DEFAULT_MAX_DAYS: u32 = 20;
pub(crate) const DEFAULT_ACTIONS_PER_DAY: u8 = 2;
pub(crate) const DEFAULT_DAYS_PER_SEASON: u32 = 5;
pub(crate) const DEFAULT_MORNING_FIND_CHANCE: f64 = 0.08;
pub(crate) const VALIDATION_BLEED_PENALTY: i32 = 5;

// Gathering actions --------------------------------------------------------
pub(crate) const DEFAULT_GROWTH_CHANCE: f64 = 0.15;
pub(crate) const FORAGE_HIGH: i32 = 15;
pub(crate) const FORAGE_MID: i32 = 8;
pub(crate) const HUNT_HIGH: i32 = 16;
pub(crate) const HUNT_MID: i32 = 9;
pub(crate) const KNIFE_HUNT_BONUS: i32 = 2;
pub(crate) const HUNT_STRENGTH_GROWTH: f64 = 0.2;
pub(crate) const RIVER_HIGH: i32 = 15;
pub(crate) const RIVER_MID: i32 = 8;
pub(crate) const RIVER_KNIFE_LOSS_CHANCE: f64 = 0.12;
pub(crate) const SCAVENGE_HIGH: i32 = 16;
pub(crate) const SCAVENGE_MID: i32 = 9;
pub(crate) const HATCHET_BONUS: i32 = 2;
pub(crate) const SCAVENGE_INFECTION_CHANCE: f64 = 0.4;

// Camp actions -------------------------------------------------------------
pub(crate) const REST_ENDURANCE_GROWTH: f64 = 0.1;
pub(crate) const EAT_HUNGER_RELIEF: i32 = 40;
pub(crate) const DRINK_THIRST_RELIEF: i32 = 35;
pub(crate) const SHELTER_TARGET: i32 = 12;
pub(crate) const SHELTER_ROLL_BONUS: i32 = 2;
pub(crate) const FIRE_TARGET: i32 = 10;
pub(crate) const FIRE_MIN_TEMPERATURE: i32 = 5;
pub(crate) const FIRE_FOOD_CHANCE: f64 = 0.3;
pub(crate) const TRAP_TARGET: i32 = 8;
pub(crate) const HERB_BANDAGE_TARGET: i32 = 12;
pub(crate) const BANDAGE_HEAL: i32 = 8;

// Merchant -----------------------------------------------------------------
pub(crate) const PRICE_BANDAGE: u32 = 5;
pub(crate) const PRICE_WATER: u32 = 2;
pub(crate) const CLOTH_SALE_PRICE: u32 = 1;

// Combat -------------------------------------------------------------------
pub(crate) const FLEE_TARGET: i32 = 12;
pub(crate) const FLEE_AGILITY_GROWTH: f64 = 0.2;
pub(crate) const ENEMY_BLEED_MARGIN: i32 = 10;
pub(crate) const ENEMY_BLEED_CHANCE: f64 = 0.3;
pub(crate) const SNAKE_POISON_CHANCE: f64 = 0.4;
pub(crate) const SNAKE_POISON_TURNS: u8 = 3;
pub(crate) const BEAR_MAUL_MARGIN: i32 = 5;
pub(crate) const BEAR_BLEED_TURNS: u8 = 2;
pub(crate) const BANDIT_HEALTH_PER_MEMBER: u32 = 10;
pub(crate) const BANDIT_LOOT_KNIFE_CHANCE: f64 = 0.3;
pub(crate) const WILDLIFE_STRENGTH_GROWTH: f64 = 0.2;

// Night --------------------------------------------------------------------
pub(crate) const SHELTER_WARMTH: i32 = 10;
pub(crate) const FIRE_WARMTH: i32 = 15;
pub(crate) const FREEZING_THRESHOLD: i32 = -10;
pub(crate) const COLD_THRESHOLD: i32 = 0;
pub(crate) const HEAT_THRESHOLD: i32 = 35;
pub(crate) const HEAT_THIRST: i32 = 10;
pub(crate) const FEVER_THIRST: i32 = 10;
pub(crate) const HUNGER_DRIFT_EXPOSED: i32 = 15;
pub(crate) const HUNGER_DRIFT_SHELTERED: i32 = 10;
pub(crate) const THIRST_DRIFT_EXPOSED: i32 = 20;
pub(crate) const THIRST_DRIFT_SHELTERED: i32 = 12;
pub(crate) const CRITICAL_NEED: i32 = 80;
pub(crate) const STARVATION_DAMAGE_EXPOSED: u32 = 10;
pub(crate) const STARVATION_DAMAGE_SHELTERED: u32 = 6;
pub(crate) const DEHYDRATION_DAMAGE_EXPOSED: u32 = 15;
pub(crate) const DEHYDRATION_DAMAGE_SHELTERED: u32 = 9;
pub(crate) const WINTER_FROSTBITE_CHANCE: f64 = 0.15;
pub(crate) const SUMMER_SPOILAGE_CHANCE: f64 = 0.12;
pub(crate) const MERCHANT_BASE_CHANCE: f64 = 0.4;
pub(crate) const BANDIT_BASE_CHANCE: f64 = 0.3;

// Major event bands (upper bounds on a single uniform draw) -----------------
pub(crate) const ENCOUNTER_BAND: f64 = 0.10;
pub(crate) const PREDATOR_BAND: f64 = 0.18;
pub(crate) const GIFT_BAND: f64 = 0.25;
pub(crate) const SECOND_GIFT_BAND: f64 = 0.30;

// Temperature labels -------------------------------------------------------
pub(crate) const TEMP_FREEZING_MAX: i32 = -10;
pub(crate) const TEMP_COLD_MAX: i32 = 0;
pub(crate) const TEMP_MILD_MAX: i32 = 20;
pub(crate) const TEMP_HOT_MAX: i32 = 30;
