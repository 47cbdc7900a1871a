//! JSON payload handed to test scripts as their only argument

use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};
use crate::project::{Canister, Canisters};

/// `{ "canisters": {...}, "selected_canister": "<name>" }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestPayload {
    pub canisters: Canisters,
    pub selected_canister: String,
}

impl TestPayload {
    pub fn new(canisters: Canisters, selected_canister: impl Into<String>) -> Self {
        Self {
            canisters,
            selected_canister: selected_canister.into(),
        }
    }

    /// Encode as a single-line JSON argument
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode the argument a test script received
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::InvalidPayload(e.to_string()))
    }

    /// The record of the selected canister
    pub fn selected(&self) -> Result<&Canister> {
        self.canisters
            .get(&self.selected_canister)
            .ok_or_else(|| Error::UnknownCanister(self.selected_canister.clone()))
    }
}
