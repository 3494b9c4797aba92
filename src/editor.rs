use crate::models::{AppData, DayResponse, Tag, TagSet};

#[derive(Debug, Clone, PartialEq)]
pub struct DayDraft {
    date: String,
    selection: TagSet,
    note: String,
}

impl DayDraft {
    pub fn open(date: impl Into<String>, data: &AppData) -> Self {
        let date = date.into();
        let selection = data.activities.get(&date).cloned().unwrap_or_default();
        let note = data.comments.get(&date).cloned().unwrap_or_default();
        Self {
            date,
            selection,
            note,
        }
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn selection(&self) -> &TagSet {
        &self.selection
    }

    pub fn toggle(&mut self, tag: Tag) {
        self.selection.toggle(tag);
    }

    pub fn set_selection(&mut self, tags: impl IntoIterator<Item = Tag>) {
        self.selection = tags.into_iter().collect();
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.note = note.into();
    }

    /// Writes the draft into `data`. An empty selection or a blank note
    /// removes the stored entry; the two maps are updated independently.
    pub fn commit(self, data: &mut AppData) -> DayResponse {
        if self.selection.is_empty() {
            data.activities.remove(&self.date);
        } else {
            data.activities
                .insert(self.date.clone(), self.selection.clone());
        }

        let note = self.note.trim().to_string();
        if note.is_empty() {
            data.comments.remove(&self.date);
        } else {
            data.comments.insert(self.date.clone(), note.clone());
        }

        DayResponse {
            date: self.date,
            tags: self.selection,
            note,
        }
    }
}

pub fn day_response(date: &str, data: &AppData) -> DayResponse {
    DayResponse {
        date: date.to_string(),
        tags: data.activities.get(date).cloned().unwrap_or_default(),
        note: data.comments.get(date).cloned().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATE: &str = "2026-05-04";

    #[test]
    fn open_loads_stored_selection_and_note() {
        let mut data = AppData::default();
        data.activities
            .insert(DATE.to_string(), [Tag::Goals].into_iter().collect());
        data.comments.insert(DATE.to_string(), "ran 5k".to_string());

        let draft = DayDraft::open(DATE, &data);
        assert_eq!(draft.date(), DATE);
        assert!(draft.selection().contains(Tag::Goals));
        assert_eq!(draft.commit(&mut data).note, "ran 5k");
    }

    #[test]
    fn toggling_a_tag_twice_is_a_no_op() {
        let mut draft = DayDraft::open(DATE, &AppData::default());
        draft.toggle(Tag::Work);
        let before = draft.clone();

        draft.toggle(Tag::Sport);
        draft.toggle(Tag::Sport);
        assert_eq!(draft, before);
    }

    #[test]
    fn commit_with_selection_writes_log() {
        let mut data = AppData::default();
        let mut draft = DayDraft::open(DATE, &data);
        draft.toggle(Tag::Sport);
        draft.toggle(Tag::Work);
        draft.set_note("  long day  ");

        let saved = draft.commit(&mut data);
        assert_eq!(saved.tags.len(), 2);
        assert_eq!(saved.note, "long day");
        assert_eq!(data.activities.get(DATE), Some(&saved.tags));
        assert_eq!(data.comments.get(DATE).map(String::as_str), Some("long day"));
    }

    #[test]
    fn commit_with_empty_selection_removes_date() {
        let mut data = AppData::default();
        data.activities
            .insert(DATE.to_string(), [Tag::Sport].into_iter().collect());
        data.comments.insert(DATE.to_string(), "keep".to_string());

        let mut draft = DayDraft::open(DATE, &data);
        draft.toggle(Tag::Sport);
        draft.commit(&mut data);

        assert!(!data.activities.contains_key(DATE));
        assert_eq!(data.comments.get(DATE).map(String::as_str), Some("keep"));
    }

    #[test]
    fn blank_note_removes_comment_but_keeps_tags() {
        let mut data = AppData::default();
        data.comments.insert(DATE.to_string(), "old".to_string());

        let mut draft = DayDraft::open(DATE, &data);
        draft.set_selection([Tag::Goals, Tag::Goals]);
        draft.set_note("   ");
        draft.commit(&mut data);

        assert!(!data.comments.contains_key(DATE));
        assert_eq!(data.activities.get(DATE).map(TagSet::len), Some(1));
    }
}
