use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Sport,
    Work,
    Goals,
}

impl Tag {
    pub const ALL: [Tag; 3] = [Tag::Sport, Tag::Work, Tag::Goals];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Sport => "sport",
            Tag::Work => "work",
            Tag::Goals => "goals",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "sport" => Some(Tag::Sport),
            "work" => Some(Tag::Work),
            "goals" => Some(Tag::Goals),
            _ => None,
        }
    }
}

/// Tags recorded for a single date, in the order they were selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet(Vec<Tag>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.0.contains(&tag)
    }

    /// Returns `false` if the tag was already present.
    pub fn insert(&mut self, tag: Tag) -> bool {
        if self.contains(tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    pub fn remove(&mut self, tag: Tag) -> bool {
        let before = self.0.len();
        self.0.retain(|existing| *existing != tag);
        self.0.len() != before
    }

    /// Adds the tag if absent, removes it otherwise.
    pub fn toggle(&mut self, tag: Tag) {
        if !self.remove(tag) {
            self.0.push(tag);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

// Stored logs may carry tags this build does not know, or non-string items;
// those are skipped.
impl<'de> Deserialize<'de> for TagSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
        Ok(raw
            .iter()
            .filter_map(|value| value.as_str().and_then(Tag::parse))
            .collect())
    }
}

/// Which subset of tags a logged date carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Combination {
    AllThree,
    SportWork,
    SportGoals,
    WorkGoals,
    SportOnly,
    WorkOnly,
    GoalsOnly,
}

impl Combination {
    pub const CHART_ORDER: [Combination; 7] = [
        Combination::SportWork,
        Combination::SportGoals,
        Combination::WorkGoals,
        Combination::AllThree,
        Combination::SportOnly,
        Combination::WorkOnly,
        Combination::GoalsOnly,
    ];

    pub fn classify(tags: &TagSet) -> Option<Self> {
        let sport = tags.contains(Tag::Sport);
        let work = tags.contains(Tag::Work);
        let goals = tags.contains(Tag::Goals);

        match (sport, work, goals) {
            (true, true, true) => Some(Combination::AllThree),
            (true, true, false) => Some(Combination::SportWork),
            (true, false, true) => Some(Combination::SportGoals),
            (false, true, true) => Some(Combination::WorkGoals),
            (true, false, false) => Some(Combination::SportOnly),
            (false, true, false) => Some(Combination::WorkOnly),
            (false, false, true) => Some(Combination::GoalsOnly),
            (false, false, false) => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Combination::AllThree => "All Three",
            Combination::SportWork => "Sport + Work",
            Combination::SportGoals => "Sport + Goals",
            Combination::WorkGoals => "Work + Goals",
            Combination::SportOnly => "Sport Only",
            Combination::WorkOnly => "Work Only",
            Combination::GoalsOnly => "Goals Only",
        }
    }
}

pub type ActivityLog = BTreeMap<String, TagSet>;
pub type Notes = BTreeMap<String, String>;

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppData {
    #[serde(default)]
    pub activities: ActivityLog,
    #[serde(default)]
    pub comments: Notes,
}

#[derive(Debug, Deserialize)]
pub struct DayRequest {
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub tag: Tag,
}

#[derive(Debug, Deserialize)]
pub struct GridQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct DayResponse {
    pub date: String,
    pub tags: TagSet,
    pub note: String,
}

#[derive(Debug, Serialize)]
pub struct MonthlySeries {
    pub labels: [&'static str; 12],
    pub sport: [u64; 12],
    pub work: [u64; 12],
    pub goals: [u64; 12],
}

#[derive(Debug, Serialize)]
pub struct ShareBreakdown {
    pub sport: u64,
    pub work: u64,
    pub sport_percent: f64,
    pub work_percent: f64,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct Balance {
    pub sport: u32,
    pub work: u32,
    pub goals: u32,
}

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct CoOccurrence {
    pub all_three: u64,
    pub sport_work: u64,
    pub sport_goals: u64,
    pub work_goals: u64,
    pub sport_only: u64,
    pub work_only: u64,
    pub goals_only: u64,
}

impl CoOccurrence {
    pub fn get(&self, combination: Combination) -> u64 {
        match combination {
            Combination::AllThree => self.all_three,
            Combination::SportWork => self.sport_work,
            Combination::SportGoals => self.sport_goals,
            Combination::WorkGoals => self.work_goals,
            Combination::SportOnly => self.sport_only,
            Combination::WorkOnly => self.work_only,
            Combination::GoalsOnly => self.goals_only,
        }
    }

    pub fn total(&self) -> u64 {
        Combination::CHART_ORDER.iter().map(|c| self.get(*c)).sum()
    }
}

#[derive(Debug, Serialize)]
pub struct CombinationPoint {
    pub kind: Combination,
    pub label: &'static str,
    pub days: u64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub monthly: MonthlySeries,
    pub share: ShareBreakdown,
    pub balance: Balance,
    pub combinations: Vec<CombinationPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_selection() {
        let mut tags: TagSet = [Tag::Work].into_iter().collect();
        let before = tags.clone();

        tags.toggle(Tag::Sport);
        assert!(tags.contains(Tag::Sport));
        tags.toggle(Tag::Sport);
        assert_eq!(tags, before);

        tags.toggle(Tag::Work);
        tags.toggle(Tag::Work);
        assert!(tags.contains(Tag::Work));
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn tag_set_ignores_duplicates_and_unknown_tags() {
        let tags: TagSet =
            serde_json::from_str(r#"["work", "sleep", "sport", "work"]"#).unwrap();
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec![Tag::Work, Tag::Sport]);
        assert_eq!(serde_json::to_string(&tags).unwrap(), r#"["work","sport"]"#);
    }

    #[test]
    fn tag_set_skips_non_string_items() {
        let tags: TagSet = serde_json::from_str(r#"["sport", 1, {"tag": "work"}]"#).unwrap();
        assert_eq!(tags.iter().collect::<Vec<_>>(), vec![Tag::Sport]);
    }

    #[test]
    fn classify_prefers_all_three_then_pairs() {
        let all: TagSet = Tag::ALL.into_iter().collect();
        assert_eq!(Combination::classify(&all), Some(Combination::AllThree));

        let pair: TagSet = [Tag::Goals, Tag::Work].into_iter().collect();
        assert_eq!(Combination::classify(&pair), Some(Combination::WorkGoals));

        let single: TagSet = [Tag::Goals].into_iter().collect();
        assert_eq!(Combination::classify(&single), Some(Combination::GoalsOnly));

        assert_eq!(Combination::classify(&TagSet::new()), None);
    }

    #[test]
    fn combination_serializes_kebab_case() {
        let value = serde_json::to_value(Combination::SportWork).unwrap();
        assert_eq!(value, serde_json::json!("sport-work"));
    }
}
