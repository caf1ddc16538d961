//! Toggle action dispatch.

use utopia_common::AppError;

/// What a toggle request asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionType {
    /// `action_type = 1`: like, follow or favorite.
    Activate,
    /// `action_type = 2`: the reverse.
    Deactivate,
}

impl TryFrom<i32> for ActionType {
    type Error = AppError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Activate),
            2 => Ok(Self::Deactivate),
            _ => Err(AppError::InvalidActionType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values() {
        assert_eq!(ActionType::try_from(1).ok(), Some(ActionType::Activate));
        assert_eq!(ActionType::try_from(2).ok(), Some(ActionType::Deactivate));
    }

    #[test]
    fn test_unknown_values_are_rejected() {
        for value in [0, 3, -1, i32::MAX] {
            assert!(matches!(
                ActionType::try_from(value),
                Err(AppError::InvalidActionType)
            ));
        }
    }
}
