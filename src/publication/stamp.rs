use chrono::{DateTime, Utc};

/// The per-build values that make each package unique.
///
/// Keeping these in one place means two builds of the same request with the same stamp produce
/// identical package contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildStamp {
    /// Unique identifier stored as `dc:identifier` and the NCX `dtb:uid`
    pub identifier: String,
    /// Stored as `dcterms:modified`
    pub modified: DateTime<Utc>,
}

impl BuildStamp {
    /// A fresh stamp: a random UUID and the current time.
    pub fn now() -> BuildStamp {
        BuildStamp {
            identifier: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
            modified: Utc::now(),
        }
    }

    pub fn new<S: ToString>(identifier: S, modified: DateTime<Utc>) -> BuildStamp {
        BuildStamp {
            identifier: identifier.to_string(),
            modified,
        }
    }

    /// `dcterms:modified` requires second precision with a `Z` suffix.
    pub fn modified_string(&self) -> String {
        self.modified.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fresh_stamps_are_unique() {
        let a = BuildStamp::now();
        let b = BuildStamp::now();
        assert!(a.identifier.starts_with("urn:uuid:"));
        assert_ne!(a.identifier, b.identifier);
    }

    #[test]
    fn modified_is_second_precision_utc() {
        let stamp = BuildStamp::new(
            "urn:uuid:test",
            Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).unwrap(),
        );
        assert_eq!(stamp.modified_string(), "2024-05-01T09:30:05Z");
    }
}
