//! Section and field editors.
//!
//! Pure helpers over a document snapshot. Each returns a `SectionUpdate` that
//! the caller hands to `Session::mutate_section`, so editors never write.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::markup::split_list_items;
use crate::models::resume::{
    new_entry_id, AdditionalSection, Basics, CertificationEntry, EducationEntry, PartialBasics,
    Profile, ProjectEntry, ResumeDocument, SectionKey, SectionUpdate, SkillEntry, WorkEntry,
};

pub mod handlers;

#[derive(Debug, Error, PartialEq)]
pub enum EditError {
    #[error("No {section} entry at index {index}")]
    IndexOutOfRange { section: SectionKey, index: usize },

    #[error("No profile at index {0}")]
    ProfileOutOfRange(usize),

    #[error("Patch must be a JSON object")]
    PatchNotObject,

    #[error("Entry ids cannot be changed")]
    IdChange,

    #[error("Invalid {section} entry: {message}")]
    InvalidEntry { section: SectionKey, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn offset(self) -> isize {
        match self {
            Direction::Up => -1,
            Direction::Down => 1,
        }
    }
}

/// An operation on one entry list.
#[derive(Debug, Clone, PartialEq)]
pub enum ListOp {
    /// Append a blank entry with a fresh id.
    Append,
    Remove(usize),
    Move(usize, Direction),
    /// Field-level overrides merged into the entry at the index.
    Patch(usize, Value),
}

/// An entry in one of the list sections.
pub trait ListEntry: Clone + Serialize + DeserializeOwned {
    fn id(&self) -> &str;

    /// An empty entry carrying a fresh id.
    fn blank() -> Self;
}

macro_rules! list_entry {
    ($ty:ty) => {
        impl ListEntry for $ty {
            fn id(&self) -> &str {
                &self.id
            }

            fn blank() -> Self {
                Self {
                    id: new_entry_id(),
                    ..Default::default()
                }
            }
        }
    };
}

list_entry!(WorkEntry);
list_entry!(EducationEntry);
list_entry!(SkillEntry);
list_entry!(ProjectEntry);
list_entry!(CertificationEntry);
list_entry!(AdditionalSection);

/// Applies `op` to a copy of `list`.
pub fn apply_list_op<T: ListEntry>(section: SectionKey, list: &[T], op: ListOp) -> Result<Vec<T>, EditError> {
    let mut next = list.to_vec();
    let out_of_range = |index| EditError::IndexOutOfRange { section, index };

    match op {
        ListOp::Append => next.push(T::blank()),
        ListOp::Remove(index) => {
            if index >= next.len() {
                return Err(out_of_range(index));
            }
            next.remove(index);
        }
        ListOp::Move(index, direction) => {
            if index >= next.len() {
                return Err(out_of_range(index));
            }
            // Moving past either end is a no-op.
            if let Some(target) = index.checked_add_signed(direction.offset()) {
                if target < next.len() {
                    next.swap(index, target);
                }
            }
        }
        ListOp::Patch(index, patch) => {
            let entry = next.get(index).ok_or_else(|| out_of_range(index))?;
            let patched = patch_entry(section, entry, patch)?;
            next[index] = patched;
        }
    }
    Ok(next)
}

fn patch_entry<T: ListEntry>(section: SectionKey, entry: &T, patch: Value) -> Result<T, EditError> {
    let Value::Object(fields) = patch else {
        return Err(EditError::PatchNotObject);
    };
    if let Some(id) = fields.get("id") {
        if id.as_str() != Some(entry.id()) {
            return Err(EditError::IdChange);
        }
    }

    let invalid = |e: serde_json::Error| EditError::InvalidEntry {
        section,
        message: e.to_string(),
    };
    let mut current = serde_json::to_value(entry).map_err(invalid)?;
    if let Value::Object(target) = &mut current {
        target.extend(fields);
    }
    serde_json::from_value(current).map_err(invalid)
}

/// Runs a list operation against the named section of `doc`.
pub fn edit_list(doc: &ResumeDocument, section: SectionKey, op: ListOp) -> Result<SectionUpdate, EditError> {
    Ok(match section {
        SectionKey::Work => SectionUpdate::Work(apply_list_op(section, &doc.work, op)?),
        SectionKey::Education => {
            SectionUpdate::Education(apply_list_op(section, &doc.education, op)?)
        }
        SectionKey::Skills => SectionUpdate::Skills(apply_list_op(section, &doc.skills, op)?),
        SectionKey::Projects => {
            SectionUpdate::Projects(apply_list_op(section, &doc.projects, op)?)
        }
        SectionKey::Certifications => {
            SectionUpdate::Certifications(apply_list_op(section, &doc.certifications, op)?)
        }
        SectionKey::Additional => {
            SectionUpdate::Additional(apply_list_op(section, &doc.additional, op)?)
        }
    })
}

/// Moves the section at `index` one step. Out-of-range moves leave the order as is.
pub fn move_section(doc: &ResumeDocument, index: usize, direction: Direction) -> SectionUpdate {
    let order = doc
        .section_order
        .swapped(index, direction.offset())
        .unwrap_or_else(|| doc.section_order.clone());
    SectionUpdate::SectionOrder(order)
}

/// Field-level basics edit: present fields override, location merges per field.
pub fn patch_basics(basics: &Basics, patch: PartialBasics) -> SectionUpdate {
    SectionUpdate::Basics(patch.merge_into(basics))
}

/// Appends a blank social profile to basics.
pub fn add_profile(basics: &Basics) -> SectionUpdate {
    let mut next = basics.clone();
    next.profiles.push(Profile::default());
    SectionUpdate::Basics(next)
}

pub fn remove_profile(basics: &Basics, index: usize) -> Result<SectionUpdate, EditError> {
    if index >= basics.profiles.len() {
        return Err(EditError::ProfileOutOfRange(index));
    }
    let mut next = basics.clone();
    next.profiles.remove(index);
    Ok(SectionUpdate::Basics(next))
}

/// Replaces the highlights of a work entry from rich-text editor markup.
pub fn set_work_highlights(doc: &ResumeDocument, index: usize, markup: &str) -> Result<SectionUpdate, EditError> {
    let highlights = split_list_items(markup);
    edit_list(
        doc,
        SectionKey::Work,
        ListOp::Patch(index, serde_json::json!({ "highlights": highlights })),
    )
}

/// Replaces the highlights of a project entry from rich-text editor markup.
pub fn set_project_highlights(doc: &ResumeDocument, index: usize, markup: &str) -> Result<SectionUpdate, EditError> {
    let highlights = split_list_items(markup);
    edit_list(
        doc,
        SectionKey::Projects,
        ListOp::Patch(index, serde_json::json!({ "highlights": highlights })),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc_with_work(names: &[&str]) -> ResumeDocument {
        let mut doc = ResumeDocument::default();
        doc.work = names
            .iter()
            .map(|n| WorkEntry {
                id: format!("id-{n}"),
                name: n.to_string(),
                ..Default::default()
            })
            .collect();
        doc
    }

    fn work(update: SectionUpdate) -> Vec<WorkEntry> {
        match update {
            SectionUpdate::Work(list) => list,
            other => panic!("expected work update, got {}", other.section_name()),
        }
    }

    #[test]
    fn test_append_adds_blank_entry_with_fresh_id() {
        let doc = doc_with_work(&["Acme"]);
        let list = work(edit_list(&doc, SectionKey::Work, ListOp::Append).unwrap());
        assert_eq!(list.len(), 2);
        assert!(list[1].name.is_empty());
        assert!(!list[1].id.is_empty());
        assert_ne!(list[1].id, list[0].id);
        // The source document is untouched.
        assert_eq!(doc.work.len(), 1);
    }

    #[test]
    fn test_remove_out_of_range_errors() {
        let doc = doc_with_work(&["Acme"]);
        assert_eq!(
            edit_list(&doc, SectionKey::Work, ListOp::Remove(3)),
            Err(EditError::IndexOutOfRange {
                section: SectionKey::Work,
                index: 3
            })
        );
    }

    #[test]
    fn test_move_entry_and_edges() {
        let doc = doc_with_work(&["A", "B", "C"]);
        let moved = work(edit_list(&doc, SectionKey::Work, ListOp::Move(2, Direction::Up)).unwrap());
        assert_eq!(
            moved.iter().map(|w| w.name.as_str()).collect::<Vec<_>>(),
            vec!["A", "C", "B"]
        );
        let unchanged =
            work(edit_list(&doc, SectionKey::Work, ListOp::Move(0, Direction::Up)).unwrap());
        assert_eq!(unchanged, doc.work);
    }

    #[test]
    fn test_patch_overrides_fields_and_keeps_others() {
        let doc = doc_with_work(&["Acme"]);
        let list = work(
            edit_list(
                &doc,
                SectionKey::Work,
                ListOp::Patch(0, json!({ "position": "CTO", "startDate": "2020-01" })),
            )
            .unwrap(),
        );
        assert_eq!(list[0].name, "Acme");
        assert_eq!(list[0].position, "CTO");
        assert_eq!(list[0].start_date, "2020-01");
        assert_eq!(list[0].id, "id-Acme");
    }

    #[test]
    fn test_patch_rejects_id_change_and_bad_types() {
        let doc = doc_with_work(&["Acme"]);
        assert_eq!(
            edit_list(&doc, SectionKey::Work, ListOp::Patch(0, json!({ "id": "other" }))),
            Err(EditError::IdChange)
        );
        assert_eq!(
            edit_list(&doc, SectionKey::Work, ListOp::Patch(0, json!(["x"]))),
            Err(EditError::PatchNotObject)
        );
        assert!(matches!(
            edit_list(&doc, SectionKey::Work, ListOp::Patch(0, json!({ "highlights": 5 }))),
            Err(EditError::InvalidEntry { .. })
        ));
    }

    #[test]
    fn test_move_section_swaps_neighbours() {
        let doc = ResumeDocument::default();
        let SectionUpdate::SectionOrder(order) = move_section(&doc, 1, Direction::Up) else {
            panic!("expected section order update");
        };
        assert_eq!(order.keys()[0], SectionKey::Education);
        assert_eq!(order.keys()[1], SectionKey::Work);

        let SectionUpdate::SectionOrder(same) = move_section(&doc, 5, Direction::Down) else {
            panic!("expected section order update");
        };
        assert_eq!(same, doc.section_order);
    }

    #[test]
    fn test_patch_basics_merges_location() {
        let mut basics = Basics::default();
        basics.location.region = "CA".to_string();
        let patch: PartialBasics =
            serde_json::from_value(json!({ "name": "Lin", "location": { "city": "Oakland" } }))
                .unwrap();
        let SectionUpdate::Basics(merged) = patch_basics(&basics, patch) else {
            panic!("expected basics update");
        };
        assert_eq!(merged.name, "Lin");
        assert_eq!(merged.location.city, "Oakland");
        assert_eq!(merged.location.region, "CA");
    }

    #[test]
    fn test_add_and_remove_profiles() {
        let basics = Basics::default();
        let SectionUpdate::Basics(with_one) = add_profile(&basics) else {
            panic!("expected basics update");
        };
        assert_eq!(with_one.profiles.len(), 1);
        let SectionUpdate::Basics(empty) = remove_profile(&with_one, 0).unwrap() else {
            panic!("expected basics update");
        };
        assert!(empty.profiles.is_empty());
        assert_eq!(remove_profile(&empty, 0), Err(EditError::ProfileOutOfRange(0)));
    }

    #[test]
    fn test_highlights_from_markup() {
        let doc = doc_with_work(&["Acme"]);
        let list = work(
            set_work_highlights(&doc, 0, "<ul><li>Cut costs 20%</li><li>Hired 4</li></ul>").unwrap(),
        );
        assert_eq!(list[0].highlights, vec!["Cut costs 20%", "Hired 4"]);
    }
}
