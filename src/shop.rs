//! The trader's camp: selling wood and buying gear.

use crate::config::*;
use crate::error::ActionError;
use crate::geometry::distance;
use crate::player::Player;
use bevy::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Food,
    Potion,
    BetterAxe,
    Protection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopListing {
    pub name: &'static str,
    pub price: u32,
    pub description: &'static str,
}

impl ItemKind {
    /// Catalog order, also the quick-buy slot order
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Food,
        ItemKind::Potion,
        ItemKind::BetterAxe,
        ItemKind::Protection,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ItemKind::Food => "food",
            ItemKind::Potion => "potion",
            ItemKind::BetterAxe => "better_axe",
            ItemKind::Protection => "protection",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }

    pub fn listing(self) -> ShopListing {
        match self {
            ItemKind::Food => ShopListing {
                name: "Food",
                price: 10,
                description: "Restores 40 energy",
            },
            ItemKind::Potion => ShopListing {
                name: "Health Potion",
                price: 20,
                description: "Restores 50 health",
            },
            ItemKind::BetterAxe => ShopListing {
                name: "Better Axe",
                price: 50,
                description: "Chops harder, fells big trees, faster walking",
            },
            ItemKind::Protection => ShopListing {
                name: "Protection Charm",
                price: 30,
                description: "Halves damage for 60 seconds",
            },
        }
    }
}

/// Success or failure, used to colour the trade message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Failure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeMessage {
    pub text: String,
    pub tone: Tone,
    pub remaining: f32,
}

/// Whether a listing can be bought right now, for the shop panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    TooExpensive,
    Owned,
}

/// Is the player close enough to trade? Inclusive at exactly `radius`.
pub fn is_trader_nearby(player_pos: Vec2, trader_pos: Vec2, radius: f32) -> bool {
    distance(player_pos, trader_pos) <= radius
}

#[derive(Debug, Clone, Default)]
pub struct ShopSystem {
    pub shop_active: bool,
    message: Option<TradeMessage>,
}

impl ShopSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(&self) -> Option<&TradeMessage> {
        self.message.as_ref()
    }

    /// Age the trade message, and close the panel once the player walks off
    pub fn update(&mut self, dt: f32, trader_nearby: bool) {
        if let Some(msg) = &mut self.message {
            msg.remaining -= dt;
            if msg.remaining <= 0.0 {
                self.message = None;
            }
        }
        if self.shop_active && !trader_nearby {
            self.close();
        }
    }

    pub fn open(&mut self) {
        if !self.shop_active {
            self.shop_active = true;
            debug!("[Shop] Opened");
        }
    }

    pub fn close(&mut self) {
        if self.shop_active {
            self.shop_active = false;
            debug!("[Shop] Closed");
        }
    }

    pub fn show_message(&mut self, text: impl Into<String>, tone: Tone) {
        self.message = Some(TradeMessage {
            text: text.into(),
            tone,
            remaining: SHOP_MESSAGE_DURATION,
        });
    }

    fn post<T>(&mut self, result: &Result<T, ActionError>, success: impl FnOnce(&T) -> String) {
        match result {
            Ok(value) => self.show_message(success(value), Tone::Success),
            Err(err) => self.show_message(err.to_string(), Tone::Failure),
        }
    }

    /// Sell every log. Returns coins earned.
    pub fn sell_wood(&mut self, player: &mut Player) -> Result<u32, ActionError> {
        let result = if player.wood == 0 {
            Err(ActionError::NoWood)
        } else {
            let sold = player.wood;
            let earned = sold * WOOD_PRICE;
            player.coins += earned;
            player.wood = 0;
            info!("[Shop] Sold {} wood for {} coins", sold, earned);
            Ok(earned)
        };
        self.post(&result, |earned| format!("Sold wood for {} coins!", earned));
        result
    }

    pub fn buy_item(&mut self, player: &mut Player, kind: ItemKind) -> Result<ItemKind, ActionError> {
        let result = Self::check_purchase(player, kind).map(|listing| {
            player.coins -= listing.price;
            player.add_item(kind, 1);
            info!("[Shop] Bought {} for {} coins", listing.name, listing.price);
            kind
        });
        self.post(&result, |kind| format!("Bought {}!", kind.listing().name));
        result
    }

    pub fn buy_by_key(&mut self, player: &mut Player, key: &str) -> Result<ItemKind, ActionError> {
        match ItemKind::from_key(key) {
            Some(kind) => self.buy_item(player, kind),
            None => {
                let err = ActionError::UnknownItem(key.to_string());
                warn!("[Shop] {}", err);
                self.show_message(err.to_string(), Tone::Failure);
                Err(err)
            }
        }
    }

    fn check_purchase(player: &Player, kind: ItemKind) -> Result<ShopListing, ActionError> {
        let listing = kind.listing();
        match kind {
            ItemKind::BetterAxe if player.has_better_axe => return Err(ActionError::AlreadyOwned),
            ItemKind::Protection if player.has_protection => {
                return Err(ActionError::ProtectionActive);
            }
            _ => {}
        }
        if player.coins < listing.price {
            return Err(ActionError::NotEnoughCoins {
                price: listing.price,
                have: player.coins,
            });
        }
        Ok(listing)
    }

    pub fn availability(player: &Player, kind: ItemKind) -> Availability {
        match Self::check_purchase(player, kind) {
            Ok(_) => Availability::Available,
            Err(ActionError::NotEnoughCoins { .. }) => Availability::TooExpensive,
            Err(_) => Availability::Owned,
        }
    }
}
