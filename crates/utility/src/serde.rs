pub mod date_time {
    use chrono::{DateTime, Local, NaiveDateTime, TimeZone as _};
    use serde::{de::Error, Deserialize as _, Deserializer};

    /// Wire format of the prediction service: `YYYY-MM-DD HH:MM:SS`,
    /// interpreted in the caller's local timezone.
    pub const WIRE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn deserialize_local<'de, D>(
        deserializer: D,
    ) -> Result<DateTime<Local>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let naive_datetime = NaiveDateTime::parse_from_str(&s, WIRE_FORMAT)
            .map_err(Error::custom)?;
        let local_datetime = Local
            .from_local_datetime(&naive_datetime)
            .single()
            .ok_or_else(|| Error::custom("Invalid local datetime"))?;
        Ok(local_datetime)
    }

    pub fn serialize_local<S>(
        datetime: &DateTime<Local>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&datetime.format(WIRE_FORMAT).to_string())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Timelike;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(deserialize_with = "super::date_time::deserialize_local")]
        datetime: chrono::DateTime<chrono::Local>,
    }

    #[test]
    fn deserializes_wire_format() {
        let stamped: Stamped =
            serde_json::from_str(r#"{"datetime":"2025-06-01 08:30:00"}"#).unwrap();
        assert_eq!(stamped.datetime.hour(), 8);
        assert_eq!(stamped.datetime.minute(), 30);
    }

    #[test]
    fn rejects_iso_t_separator() {
        let result: Result<Stamped, _> =
            serde_json::from_str(r#"{"datetime":"2025-06-01T08:30:00"}"#);
        assert!(result.is_err());
    }
}
