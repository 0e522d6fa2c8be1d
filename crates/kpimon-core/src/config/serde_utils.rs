//! Serde helpers for configuration values

/// Durations written as a number of seconds, fractions allowed.
///
/// `initial = 0.25` is a quarter second and `connect_timeout = 10` is ten
/// seconds. Negative, NaN and out-of-range values are rejected while
/// parsing, so a loaded `Duration` is always representable.
pub mod fractional_secs {
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs)
            .map_err(|e| D::Error::custom(format!("invalid duration {} s: {}", secs, e)))
    }
}
