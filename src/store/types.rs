use serde::{Deserialize, Serialize};

/// A task list as returned by the store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ListRecord {
    pub id: String,
    pub title: String,
    /// RFC 3339 timestamp of the last change. Only ever compared, never parsed.
    #[serde(default)]
    pub updated: String,
}

/// Completion state of a task. Wire names match the hosted API.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum ItemStatus {
    #[default]
    NeedsAction,
    Completed,
}

impl ItemStatus {
    pub fn label(self) -> &'static str {
        match self {
            ItemStatus::NeedsAction => "needsAction",
            ItemStatus::Completed => "completed",
        }
    }

    pub fn is_completed(self) -> bool {
        self == ItemStatus::Completed
    }
}

/// A single task inside a list.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ItemRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default)]
    pub status: ItemStatus,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub updated: String,
}

/// Parameters for listing the tasks of one list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemQuery {
    pub list_id: String,
    pub include_completed: bool,
    pub include_hidden: bool,
    pub sort: super::SortKey,
}

/// Fields for a task that does not exist yet.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct NewItem {
    pub title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&ItemStatus::NeedsAction).unwrap(),
            "\"needsAction\""
        );
        assert_eq!(
            serde_json::to_string(&ItemStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_item_record_sparse_json() {
        // The hosted API omits notes/due when unset
        let item: ItemRecord =
            serde_json::from_str(r#"{"id":"t1","title":"Milk","status":"completed"}"#).unwrap();
        assert_eq!(item.notes, "");
        assert_eq!(item.due, None);
        assert!(item.status.is_completed());
        assert!(!item.hidden);
    }

    #[test]
    fn test_new_item_skips_empty_fields() {
        let body = serde_json::to_value(NewItem {
            title: "Bread".into(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({ "title": "Bread" }));
    }
}
