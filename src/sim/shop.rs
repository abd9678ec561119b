//! Supply hut purchases
//!
//! The band selector doubles as the menu key: AM buys a fuse, FM a battery
//! cell, Ghostband a ward chip. A purchase either goes through completely or
//! leaves every piece of state untouched.

use serde::{Deserialize, Serialize};

use super::night::NightController;
use super::player::PlayerState;
use super::radio::Band;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopItem {
    /// Extends the night countdown
    Fuse,
    /// Refills flashlight battery
    BatteryCell,
    /// Dampens the next creature hit
    WardChip,
}

impl ShopItem {
    pub fn for_band(band: Band) -> Self {
        match band {
            Band::Am => ShopItem::Fuse,
            Band::Fm => ShopItem::BatteryCell,
            Band::Ghostband => ShopItem::WardChip,
        }
    }

    pub fn cost(&self, tuning: &Tuning) -> u32 {
        match self {
            ShopItem::Fuse => tuning.shop.fuse_cost,
            ShopItem::BatteryCell => tuning.shop.battery_cost,
            ShopItem::WardChip => tuning.shop.ward_chip_cost,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShopItem::Fuse => "Fuse",
            ShopItem::BatteryCell => "Battery Cell",
            ShopItem::WardChip => "Ward Chip",
        }
    }
}

impl std::fmt::Display for ShopItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PurchaseError {
    #[error("need {cost} credits for {item}, have {credits}")]
    InsufficientCredits { item: ShopItem, cost: u32, credits: u32 },
}

impl PurchaseError {
    /// Credits still missing
    pub fn shortfall(&self) -> u32 {
        match self {
            PurchaseError::InsufficientCredits { cost, credits, .. } => cost.saturating_sub(*credits),
        }
    }
}

/// A completed purchase
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Receipt {
    pub item: ShopItem,
    pub cost: u32,
    pub credits_left: u32,
}

/// Buy `item`, applying its effect to the player or the night countdown
pub fn purchase(
    item: ShopItem,
    player: &mut PlayerState,
    night: &mut NightController,
    tuning: &Tuning,
) -> Result<Receipt, PurchaseError> {
    let cost = item.cost(tuning);
    if player.credits < cost {
        return Err(PurchaseError::InsufficientCredits {
            item,
            cost,
            credits: player.credits,
        });
    }

    player.credits -= cost;
    match item {
        ShopItem::Fuse => night.extend_countdown(tuning.shop.fuse_seconds, tuning.night_time_cap()),
        ShopItem::BatteryCell => player.battery.add(tuning.shop.battery_amount),
        ShopItem::WardChip => player.ward_chips += 1,
    }

    log::debug!("Bought {} for {} credits ({} left)", item, cost, player.credits);
    Ok(Receipt {
        item,
        cost,
        credits_left: player.credits,
    })
}
