use crate::catalog::{self, Unit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One of the four tracked weeks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekIndex(u8);

impl WeekIndex {
    pub const ALL: [WeekIndex; 4] = [WeekIndex(1), WeekIndex(2), WeekIndex(3), WeekIndex(4)];

    pub fn new(week: u8) -> Option<Self> {
        (1..=4).contains(&week).then_some(Self(week))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for WeekIndex {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for WeekIndex {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("week must be between 1 and 4, got {value}"))
    }
}

impl From<WeekIndex> for u8 {
    fn from(week: WeekIndex) -> Self {
        week.0
    }
}

impl fmt::Display for WeekIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Memorized counts per week and unit. Values are stored as given; range
/// clamping happens where input enters the system.
#[derive(Debug, Clone, Default)]
pub struct ProgressStore {
    weeks: BTreeMap<WeekIndex, BTreeMap<&'static str, u32>>,
}

impl ProgressStore {
    pub fn get(&self, week: WeekIndex, unit: &Unit) -> u32 {
        self.weeks
            .get(&week)
            .and_then(|units| units.get(unit.name))
            .copied()
            .unwrap_or(0)
    }

    pub fn set(&mut self, week: WeekIndex, unit: &'static Unit, value: u32) {
        self.weeks.entry(week).or_default().insert(unit.name, value);
    }

    /// Entries recorded for `week`, untouched units omitted.
    pub fn week_entries(&self, week: WeekIndex) -> BTreeMap<String, u32> {
        self.weeks
            .get(&week)
            .map(|units| {
                units
                    .iter()
                    .map(|(name, value)| (name.to_string(), *value))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Current week's count for every catalog unit, in catalog order.
    pub fn week_rows(&self, week: WeekIndex) -> Vec<(&'static Unit, u32)> {
        catalog::UNITS
            .iter()
            .map(|unit| (unit, self.get(week, unit)))
            .collect()
    }

    /// Whole store keyed by week number as a string, every week present.
    pub fn snapshot(&self) -> BTreeMap<String, BTreeMap<String, u32>> {
        WeekIndex::ALL
            .iter()
            .map(|week| (week.to_string(), self.week_entries(*week)))
            .collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReflectionStore {
    entries: BTreeMap<WeekIndex, String>,
}

impl ReflectionStore {
    pub fn get(&self, week: WeekIndex) -> &str {
        self.entries.get(&week).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, week: WeekIndex, text: impl Into<String>) {
        self.entries.insert(week, text.into());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }
}

/// What a CSV save recorded, echoed back on the next render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecord {
    pub date: String,
    pub week: u8,
    pub progress: BTreeMap<String, u32>,
    pub reflection: String,
}

/// Per-session state carried across interactions.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    pub current_week: WeekIndex,
    pub history_week: WeekIndex,
    pub progress: ProgressStore,
    pub reflections: ReflectionStore,
    pub notice: Option<Notice>,
    pub saved: Option<SavedRecord>,
}

impl Tracker {
    pub fn current_reflection(&self) -> &str {
        self.reflections.get(self.current_week)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRow {
    pub name: String,
    pub total_items: u32,
    pub memorized: u32,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartBar {
    pub name: String,
    pub total: u32,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierView {
    pub label: String,
    pub message: String,
    pub kind: NoticeKind,
    pub celebrate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryView {
    pub week: u8,
    pub entries: BTreeMap<String, u32>,
}

/// Everything one render of the page needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
    pub week: u8,
    pub units: Vec<UnitRow>,
    pub chart: Vec<ChartBar>,
    pub reflection: String,
    pub achievement: f64,
    pub tier: TierView,
    pub history: HistoryView,
    pub notice: Option<Notice>,
    pub saved: Option<SavedRecord>,
}

/// Result of a CSV save: the log path and how many rows were appended.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportResponse {
    pub path: String,
    pub rows: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnapshotResponse {
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(n: u8) -> WeekIndex {
        WeekIndex::new(n).unwrap()
    }

    #[test]
    fn week_index_rejects_out_of_range() {
        assert!(WeekIndex::new(0).is_none());
        assert!(WeekIndex::new(5).is_none());
        assert_eq!(WeekIndex::new(4).map(WeekIndex::get), Some(4));
        assert!(serde_json::from_str::<WeekIndex>("7").is_err());
    }

    #[test]
    fn unset_progress_defaults_to_zero() {
        let store = ProgressStore::default();
        for w in WeekIndex::ALL {
            for unit in &catalog::UNITS {
                assert_eq!(store.get(w, unit), 0);
            }
        }
    }

    #[test]
    fn set_then_get_returns_value() {
        let mut store = ProgressStore::default();
        for unit in &catalog::UNITS {
            for value in [0, 1, unit.total_items / 2, unit.total_items] {
                store.set(week(3), unit, value);
                assert_eq!(store.get(week(3), unit), value);
            }
        }
        assert_eq!(store.get(week(2), &catalog::UNITS[0]), 0);
    }

    #[test]
    fn snapshot_includes_every_week() {
        let mut store = ProgressStore::default();
        let yaseen = catalog::find("Yaseen").unwrap();
        store.set(week(1), yaseen, 3);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 4);
        assert_eq!(snapshot["1"]["Yaseen"], 3);
        assert!(snapshot["2"].is_empty());
    }

    #[test]
    fn reflection_replaced_wholesale_per_week() {
        let mut reflections = ReflectionStore::default();
        assert_eq!(reflections.get(week(1)), "");
        reflections.set(week(1), "first");
        reflections.set(week(2), "other");
        reflections.set(week(1), "second");
        assert_eq!(reflections.get(week(1)), "second");
        assert_eq!(reflections.get(week(2)), "other");
    }
}
