use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serializer};

/// Run timestamps are recorded as `YYYY-MM-DD HH:MM:SS`, without a zone.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn serialize_option_run_timestamp<S>(
    value: &Option<NaiveDateTime>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.collect_str(&ts.format(RUN_TIMESTAMP_FORMAT)),
        None => serializer.serialize_none(),
    }
}

pub fn deserialize_option_run_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    opt.map(|s| {
        NaiveDateTime::parse_from_str(&s, RUN_TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize)]
    struct Run {
        #[serde(
            default,
            serialize_with = "serialize_option_run_timestamp",
            deserialize_with = "deserialize_option_run_timestamp"
        )]
        run_on: Option<NaiveDateTime>,
    }

    #[test]
    fn test_run_timestamp_round_trips_source_format() {
        let run: Run = serde_json::from_str(r#"{"run_on":"2026-02-02 06:00:00"}"#).unwrap();
        let ts = run.run_on.unwrap();
        assert_eq!(ts.format("%H:%M").to_string(), "06:00");

        let json = serde_json::to_string(&run).unwrap();
        assert_eq!(json, r#"{"run_on":"2026-02-02 06:00:00"}"#);
    }

    #[test]
    fn test_run_timestamp_missing_is_none() {
        let run: Run = serde_json::from_str("{}").unwrap();
        assert!(run.run_on.is_none());
    }

    #[test]
    fn test_run_timestamp_rejects_iso_t_separator() {
        let result: Result<Run, _> = serde_json::from_str(r#"{"run_on":"2026-02-02T06:00:00"}"#);
        assert!(result.is_err());
    }
}
