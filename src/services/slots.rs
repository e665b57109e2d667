use anyhow::Context;
use chrono::{NaiveDateTime, Timelike};

/// The ordered universe of bookable time-of-day labels. The same grid
/// applies to every calendar date.
#[derive(Debug, Clone)]
pub struct SlotCatalog {
    labels: Vec<String>,
}

impl SlotCatalog {
    /// Builds a catalog from `HH:MM` labels, keeping the given order.
    /// Rejects unparseable and duplicate labels.
    pub fn new(labels: Vec<String>) -> anyhow::Result<Self> {
        anyhow::ensure!(!labels.is_empty(), "slot grid must not be empty");
        for (i, label) in labels.iter().enumerate() {
            minutes_of_day(label).with_context(|| format!("invalid slot label: {label}"))?;
            if labels[..i].contains(label) {
                anyhow::bail!("duplicate slot label: {label}");
            }
        }
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    pub fn position(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Sorts labels into catalog order; labels not in the catalog sink to
    /// the end.
    pub fn sort_in_catalog_order(&self, labels: &mut [String]) {
        labels.sort_by_key(|l| self.position(l).unwrap_or(usize::MAX));
    }
}

/// Parses a `HH:MM` label into minutes since midnight.
pub fn minutes_of_day(label: &str) -> anyhow::Result<u32> {
    let time = chrono::NaiveTime::parse_from_str(label, "%H:%M")
        .with_context(|| format!("invalid time format: {label}"))?;
    Ok(time.hour() * 60 + time.minute())
}

pub fn minutes_now(now: &NaiveDateTime) -> u32 {
    now.time().hour() * 60 + now.time().minute()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(labels: &[&str]) -> SlotCatalog {
        SlotCatalog::new(labels.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_minutes_of_day() {
        assert_eq!(minutes_of_day("09:00").unwrap(), 540);
        assert_eq!(minutes_of_day("18:30").unwrap(), 1110);
        assert_eq!(minutes_of_day("00:00").unwrap(), 0);
    }

    #[test]
    fn test_invalid_labels_rejected() {
        assert!(minutes_of_day("25:00").is_err());
        assert!(minutes_of_day("9am").is_err());
        assert!(SlotCatalog::new(vec!["09:00".to_string(), "bad".to_string()]).is_err());
    }

    #[test]
    fn test_duplicate_labels_rejected() {
        assert!(SlotCatalog::new(vec!["09:00".to_string(), "09:00".to_string()]).is_err());
    }

    #[test]
    fn test_empty_grid_rejected() {
        assert!(SlotCatalog::new(vec![]).is_err());
    }

    #[test]
    fn test_contains_and_position() {
        let cat = catalog(&["09:00", "09:30", "14:00"]);
        assert!(cat.contains("09:30"));
        assert!(!cat.contains("10:00"));
        assert_eq!(cat.position("14:00"), Some(2));
    }

    #[test]
    fn test_sort_in_catalog_order() {
        let cat = catalog(&["09:00", "09:30", "14:00"]);
        let mut labels = vec!["14:00".to_string(), "09:00".to_string()];
        cat.sort_in_catalog_order(&mut labels);
        assert_eq!(labels, vec!["09:00", "14:00"]);
    }
}
