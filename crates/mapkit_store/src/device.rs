use chrono::Utc;
use mapkit_model::derive::Model;
use uuid::Uuid;

/// Identity of the device a keychain lives on.
///
/// Created once per primary keychain and kept by
/// [`Keychain::destroy`](crate::Keychain::destroy).
#[derive(Model, Default, Debug, Clone, PartialEq)]
pub struct DeviceId {
    pub uuid: String,
    /// Creation time, in unix seconds.
    pub timestamp: f64,
}

impl DeviceId {
    /// A new random identity, stamped with the current time.
    pub fn generate() -> Self {
        let now = Utc::now();
        Self {
            uuid: Uuid::new_v4().hyphenated().to_string().to_uppercase(),
            timestamp: now.timestamp() as f64 + f64::from(now.timestamp_subsec_micros()) / 1e6,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use mapkit_model::ModelExt;

    use super::DeviceId;

    #[test]
    fn generated_ids_differ() {
        let a = DeviceId::generate();
        let b = DeviceId::generate();
        assert_ne!(a.uuid, b.uuid);
        assert_eq!(a.uuid.len(), 36);
        assert!(a.timestamp > 1_600_000_000.0);
    }

    #[test]
    fn maps_as_json() {
        let id = DeviceId {
            uuid: "ABC".into(),
            timestamp: 12.5,
        };
        let text = id.to_json().unwrap();
        assert_eq!(text, r#"{"timestamp":12.5,"uuid":"ABC"}"#);
        assert_eq!(DeviceId::from_json(&text).unwrap(), id);
    }
}
