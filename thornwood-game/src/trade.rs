//! Merchant menu: fixed prices, no haggling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    CLOTH_SALE_PRICE, LOG_TRADE_BOUGHT_BANDAGE, LOG_TRADE_BOUGHT_WATER, LOG_TRADE_DECLINED,
    LOG_TRADE_LEFT, LOG_TRADE_REFUSED, LOG_TRADE_SOLD_CLOTH, PRICE_BANDAGE, PRICE_WATER,
};
use crate::state::PlayerState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeOrder {
    BuyBandage,
    BuyWater,
    SellCloth,
    Leave,
}

impl TradeOrder {
    pub const ALL: [Self; 4] = [Self::BuyBandage, Self::BuyWater, Self::SellCloth, Self::Leave];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::BuyBandage => "buy_bandage",
            Self::BuyWater => "buy_water",
            Self::SellCloth => "sell_cloth",
            Self::Leave => "leave",
        }
    }

    /// Gold paid (buying) or received (selling).
    #[must_use]
    pub const fn price(self) -> u32 {
        match self {
            Self::BuyBandage => PRICE_BANDAGE,
            Self::BuyWater => PRICE_WATER,
            Self::SellCloth => CLOTH_SALE_PRICE,
            Self::Leave => 0,
        }
    }
}

impl fmt::Display for TradeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for TradeOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.key() == s.trim())
            .ok_or(())
    }
}

/// Outcome of a single merchant order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeReport {
    pub order: TradeOrder,
    pub completed: bool,
    pub log_key: &'static str,
    pub line: String,
}

impl TradeReport {
    fn new(order: TradeOrder, completed: bool, log_key: &'static str, line: String) -> Self {
        Self {
            order,
            completed,
            log_key,
            line,
        }
    }
}

/// Execute one merchant order against the survivor's purse and pack.
pub fn trade(state: &mut PlayerState, order: TradeOrder) -> TradeReport {
    if state.merchant_hostile {
        return TradeReport::new(
            order,
            false,
            LOG_TRADE_REFUSED,
            "The merchant remembers you and refuses to deal.".to_string(),
        );
    }

    let inventory = &mut state.inventory;
    match order {
        TradeOrder::BuyBandage if inventory.gold >= order.price() => {
            inventory.gold -= order.price();
            inventory.bandages = inventory.bandages.saturating_add(1);
            TradeReport::new(
                order,
                true,
                LOG_TRADE_BOUGHT_BANDAGE,
                format!("You bought a bandage for {} gold.", order.price()),
            )
        }
        TradeOrder::BuyWater if inventory.gold >= order.price() => {
            inventory.gold -= order.price();
            inventory.water = inventory.water.saturating_add(1);
            TradeReport::new(
                order,
                true,
                LOG_TRADE_BOUGHT_WATER,
                format!("You bought a water skin for {} gold.", order.price()),
            )
        }
        TradeOrder::BuyBandage | TradeOrder::BuyWater => TradeReport::new(
            order,
            false,
            LOG_TRADE_DECLINED,
            format!(
                "You need {} gold but only have {}.",
                order.price(),
                inventory.gold
            ),
        ),
        TradeOrder::SellCloth if inventory.cloth > 0 => {
            inventory.cloth -= 1;
            inventory.gold = inventory.gold.saturating_add(order.price());
            TradeReport::new(
                order,
                true,
                LOG_TRADE_SOLD_CLOTH,
                format!("You sold a strip of cloth for {} gold.", order.price()),
            )
        }
        TradeOrder::SellCloth => TradeReport::new(
            order,
            false,
            LOG_TRADE_DECLINED,
            "You have no cloth to sell.".to_string(),
        ),
        TradeOrder::Leave => TradeReport::new(
            order,
            true,
            LOG_TRADE_LEFT,
            "You nod to the merchant and move on.".to_string(),
        ),
    }
}
