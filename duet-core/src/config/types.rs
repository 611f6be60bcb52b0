//! Configuration type definitions

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::timing::Timing;

/// Maximum device name length shown in the header
pub const MAX_NAME_LEN: usize = 8;

/// Which side of the pair this node plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Role {
    /// Owns rotation timing and starts every demo with the turn
    #[default]
    Master,
    /// Follows `DemoSync` and starts every demo without the turn
    Slave,
}

impl Role {
    /// Check if this is the rotation-owning side
    pub fn is_master(self) -> bool {
        matches!(self, Role::Master)
    }

    /// Header label used when no name is configured
    pub fn default_name(self) -> &'static str {
        match self {
            Role::Master => "ESP_A",
            Role::Slave => "ESP_B",
        }
    }
}

/// Complete node configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NodeConfig {
    /// Master or slave
    pub role: Role,
    /// Device label in the header (empty means the role's default)
    pub name: String<MAX_NAME_LEN>,
    /// Protocol intervals
    pub timing: Timing,
}

impl NodeConfig {
    /// Create a config for the given role with default timing
    pub fn new(role: Role) -> Self {
        Self {
            role,
            name: String::new(),
            timing: Timing::default(),
        }
    }

    /// Device label, falling back to the role's default name
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.role.default_name()
        } else {
            self.name.as_str()
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::new(Role::Master)
    }
}
