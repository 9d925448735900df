use serde::{Deserialize, Deserializer};
use std::time::Duration;

// the SDK reports positions as plain JS numbers, so accept floats as well as integers
pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = f64::deserialize(deserializer)?;
    Ok(Duration::from_millis(millis.max(0.0) as u64))
}
