// SPDX-License-Identifier: GPL-3.0-only

//! Errors returned by the keyboard switcher.

use std::fmt;

use crate::layout::{LayoutBuildError, VariantId};

/// Errors that can occur while loading layouts or switching variants.
#[derive(Debug)]
pub enum SwitchError {
    /// A variant was selected before any layout configuration was loaded.
    ///
    /// The state machine must not select before a successful load; this is
    /// a bug in the caller.
    NoLayoutSet { requested: VariantId },
    /// A variant was selected while no surfaces are attached.
    NoSurfaceBundle { requested: VariantId },
    /// The layout-set builder failed; the previous state was kept.
    Build(LayoutBuildError),
}

impl SwitchError {
    pub fn no_layout_set(requested: VariantId) -> Self {
        SwitchError::NoLayoutSet { requested }
    }

    pub fn no_surface_bundle(requested: VariantId) -> Self {
        SwitchError::NoSurfaceBundle { requested }
    }

    /// Returns `true` for errors caused by a caller breaking the contract.
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, SwitchError::NoLayoutSet { .. })
    }
}

impl fmt::Display for SwitchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchError::NoLayoutSet { requested } => write!(
                f,
                "Cannot select '{}': no layout configuration is loaded",
                requested
            ),
            SwitchError::NoSurfaceBundle { requested } => write!(
                f,
                "Cannot select '{}': no surfaces are attached",
                requested
            ),
            SwitchError::Build(e) => write!(f, "Failed to build layout set: {}", e),
        }
    }
}

impl std::error::Error for SwitchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SwitchError::Build(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LayoutBuildError> for SwitchError {
    fn from(e: LayoutBuildError) -> Self {
        SwitchError::Build(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SwitchError::no_layout_set(VariantId::Symbols);
        assert_eq!(
            err.to_string(),
            "Cannot select 'symbols': no layout configuration is loaded"
        );
        assert!(err.is_precondition_violation());
        assert!(!SwitchError::no_surface_bundle(VariantId::Emoji).is_precondition_violation());
    }
}
