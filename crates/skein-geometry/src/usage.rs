//! Display purpose attached to a curve.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a curve is for; a display layer picks its stroke style from this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Usage {
    #[default]
    Default,
    /// Helper geometry that is drawn but not part of the result.
    Construction,
    Selected,
    /// The nominal shape before any offset or tolerance is applied.
    Ideal,
    Custom(String),
}

impl fmt::Display for Usage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Usage::Default => write!(f, "default"),
            Usage::Construction => write!(f, "construction"),
            Usage::Selected => write!(f, "selected"),
            Usage::Ideal => write!(f, "ideal"),
            Usage::Custom(tag) => write!(f, "custom:{tag}"),
        }
    }
}
