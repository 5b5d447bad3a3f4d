//! Bounded group-size selector.

use serde::Serialize;

use crate::config::DEFAULT_GROUP_SIZE;
use crate::error::{CoreError, Result};

pub const MIN_GROUP_SIZE: u32 = 18;
pub const MAX_GROUP_SIZE: u32 = 50;

/// Group size stepped one at a time within 18..=50.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupSizeCounter {
    value: u32,
}

impl Default for GroupSizeCounter {
    fn default() -> Self {
        Self { value: DEFAULT_GROUP_SIZE }
    }
}

impl GroupSizeCounter {
    pub fn new(value: u32) -> Result<Self> {
        Self::check(value)?;
        Ok(Self { value })
    }

    pub fn value(self) -> u32 {
        self.value
    }

    pub fn increment(&mut self) -> Result<u32> {
        self.set(self.value.saturating_add(1))
    }

    pub fn decrement(&mut self) -> Result<u32> {
        self.set(self.value.saturating_sub(1))
    }

    /// Replace the value. Out-of-range values leave the counter unchanged.
    pub fn set(&mut self, value: u32) -> Result<u32> {
        Self::check(value)?;
        self.value = value;
        Ok(value)
    }

    fn check(value: u32) -> Result<()> {
        if (MIN_GROUP_SIZE..=MAX_GROUP_SIZE).contains(&value) {
            Ok(())
        } else {
            Err(CoreError::InvalidGroupSize { value, min: MIN_GROUP_SIZE, max: MAX_GROUP_SIZE })
        }
    }
}
