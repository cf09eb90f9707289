//! Sale Stage Controller
//!
//! Four-state machine gating every admission call. Stages only move
//! forward: Inactive → PreSale → PublicSale.

use serde::{Deserialize, Serialize};

use crate::sale::error::SaleError;

/// Sale stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Stage {
    /// Nothing can be minted.
    #[default]
    Inactive = 0,
    /// Whitelisted ticket holders may mint.
    PreSale = 1,
    /// Anyone paying the mint price may mint.
    PublicSale = 2,
    /// Declared terminal state. No transition reaches it.
    SoldOut = 3,
}

impl Stage {
    /// Stage from its numeric value.
    pub fn from_index(index: u8) -> Option<Stage> {
        match index {
            0 => Some(Stage::Inactive),
            1 => Some(Stage::PreSale),
            2 => Some(Stage::PublicSale),
            3 => Some(Stage::SoldOut),
            _ => None,
        }
    }
}

/// Holds the current stage and enforces transitions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageController {
    current: Stage,
}

impl StageController {
    /// Controller starting at `Inactive`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage.
    #[inline]
    pub fn current(&self) -> Stage {
        self.current
    }

    /// Guard: fail unless the sale is in `required`.
    #[inline]
    pub fn require(&self, required: Stage) -> Result<(), SaleError> {
        if self.current != required {
            return Err(SaleError::StageMismatch {
                required,
                current: self.current,
            });
        }
        Ok(())
    }

    /// Move from `from` to `to`. Fails unless the current stage is `from`.
    pub fn transition(&mut self, from: Stage, to: Stage) -> Result<(), SaleError> {
        self.require(from)?;
        self.current = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_inactive() {
        assert_eq!(StageController::new().current(), Stage::Inactive);
    }

    #[test]
    fn test_forward_transitions() {
        let mut controller = StageController::new();
        controller.transition(Stage::Inactive, Stage::PreSale).unwrap();
        assert_eq!(controller.current(), Stage::PreSale);
        controller.transition(Stage::PreSale, Stage::PublicSale).unwrap();
        assert_eq!(controller.current(), Stage::PublicSale);
    }

    #[test]
    fn test_transition_from_wrong_stage() {
        let mut controller = StageController::new();
        let err = controller
            .transition(Stage::PreSale, Stage::PublicSale)
            .unwrap_err();
        assert_eq!(
            err,
            SaleError::StageMismatch {
                required: Stage::PreSale,
                current: Stage::Inactive
            }
        );
        assert_eq!(controller.current(), Stage::Inactive);
    }

    #[test]
    fn test_require() {
        let controller = StageController::new();
        assert!(controller.require(Stage::Inactive).is_ok());
        assert!(controller.require(Stage::PublicSale).is_err());
    }

    #[test]
    fn test_from_index() {
        for stage in [Stage::Inactive, Stage::PreSale, Stage::PublicSale, Stage::SoldOut] {
            assert_eq!(Stage::from_index(stage as u8), Some(stage));
        }
        assert_eq!(Stage::from_index(4), None);
    }
}
