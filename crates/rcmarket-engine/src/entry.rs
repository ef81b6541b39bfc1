//! Entry-point surface of the resources contract

use rcmarket_core::Authority;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryPoint {
    GetResourceLimits,
    ConsumeBlockResources,
    GetResourceMarkets,
    SetResourceMarketsParameters,
    GetResourceParameters,
    SetResourceParameters,
}

impl EntryPoint {
    pub const ALL: [EntryPoint; 6] = [
        Self::GetResourceLimits,
        Self::ConsumeBlockResources,
        Self::GetResourceMarkets,
        Self::SetResourceMarketsParameters,
        Self::GetResourceParameters,
        Self::SetResourceParameters,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::GetResourceLimits => "get_resource_limits",
            Self::ConsumeBlockResources => "consume_block_resources",
            Self::GetResourceMarkets => "get_resource_markets",
            Self::SetResourceMarketsParameters => "set_resource_markets_parameters",
            Self::GetResourceParameters => "get_resource_parameters",
            Self::SetResourceParameters => "set_resource_parameters",
        }
    }

    /// Numeric selector, for entry points that shipped with one
    pub fn selector(&self) -> Option<u32> {
        match self {
            Self::GetResourceLimits => Some(0x427a_0394),
            Self::ConsumeBlockResources => Some(0x9850_b1fd),
            Self::GetResourceMarkets => Some(0xebe9_b9e7),
            _ => None,
        }
    }

    pub fn from_selector(selector: u32) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|entry| entry.selector() == Some(selector))
    }

    /// Authority the caller must hold, `None` for open queries
    pub fn required_authority(&self) -> Option<Authority> {
        match self {
            Self::ConsumeBlockResources => Some(Authority::KernelMode),
            Self::SetResourceMarketsParameters | Self::SetResourceParameters => {
                Some(Authority::SystemAuthority)
            }
            _ => None,
        }
    }

    pub fn is_read_only(&self) -> bool {
        self.required_authority().is_none()
    }
}

impl fmt::Display for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
