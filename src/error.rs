//! Why an in-game action was refused.
//!
//! Every player action either changes state and succeeds, or leaves state
//! untouched and returns one of these. The `Display` text is what the HUD
//! shows.

/// Reasons a player action or trade did not go through.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    #[error("Too tired to swing the axe ({have}/{needed} energy)")]
    NotEnoughEnergy { needed: u32, have: u32 },

    #[error("No {0} within reach")]
    NothingInRange(&'static str),

    #[error("This tree is too big for your axe! Buy a better one.")]
    AxeTooWeak,

    #[error("Not ready yet ({remaining:.1}s)")]
    OnCooldown { remaining: f32 },

    #[error("The goblin slipped away!")]
    Escaped,

    #[error("You have no food left")]
    NoFood,

    #[error("You have no potions left")]
    NoPotion,

    #[error("Your energy is already full")]
    EnergyFull,

    #[error("Your health is already full")]
    HealthFull,

    #[error("You have no wood to sell!")]
    NoWood,

    #[error("Not enough coins! You need {price} coins.")]
    NotEnoughCoins { price: u32, have: u32 },

    #[error("You already own the better axe!")]
    AlreadyOwned,

    #[error("Your protection is still active!")]
    ProtectionActive,

    #[error("Unknown item '{0}'!")]
    UnknownItem(String),

    #[error("The trader is too far away")]
    TraderTooFar,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(
            ActionError::NotEnoughCoins { price: 50, have: 10 }.to_string(),
            "Not enough coins! You need 50 coins."
        );
        assert_eq!(
            ActionError::UnknownItem("sword".into()).to_string(),
            "Unknown item 'sword'!"
        );
        assert_eq!(ActionError::NothingInRange("tree").to_string(), "No tree within reach");
    }
}
