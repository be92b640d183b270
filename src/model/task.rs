use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::column::ColumnId;

/// Opaque task identifier. Stored as a string; numeric ids written by older
/// exports are accepted and read back as their decimal text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        TaskId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        TaskId(s.to_string())
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        TaskId(s)
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

/// Either form an id may take in stored data
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

impl From<RawId> for TaskId {
    fn from(raw: RawId) -> Self {
        TaskId(raw.into())
    }
}

/// Card color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskColor {
    #[default]
    White,
    Mint,
    Surface,
    SoftTeal,
    DeepTeal,
}

impl TaskColor {
    /// Palette order as shown in the form
    pub const ALL: [TaskColor; 5] = [
        TaskColor::White,
        TaskColor::Mint,
        TaskColor::Surface,
        TaskColor::SoftTeal,
        TaskColor::DeepTeal,
    ];

    /// The token used in stored data
    pub fn token(self) -> &'static str {
        match self {
            TaskColor::White => "white",
            TaskColor::Mint => "mint",
            TaskColor::Surface => "surface",
            TaskColor::SoftTeal => "soft-teal",
            TaskColor::DeepTeal => "deep-teal",
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            TaskColor::White => "White",
            TaskColor::Mint => "Mint",
            TaskColor::Surface => "Surface",
            TaskColor::SoftTeal => "Soft Teal",
            TaskColor::DeepTeal => "Deep Teal",
        }
    }

    /// Dark cards render their text in white
    pub fn is_dark(self) -> bool {
        self == TaskColor::DeepTeal
    }

    /// Match a token or display name, ignoring case
    pub fn from_token(s: &str) -> Option<TaskColor> {
        let s = s.trim();
        TaskColor::ALL
            .into_iter()
            .find(|c| c.token().eq_ignore_ascii_case(s) || c.name().eq_ignore_ascii_case(s))
    }

    /// Map a CSS class list from the browser version (e.g.
    /// `bg-[#83ecbb] border-[#539190]/20`) to the palette entry with the
    /// same background.
    pub fn from_legacy_class(s: &str) -> Option<TaskColor> {
        let bg = s.split_whitespace().find(|c| c.starts_with("bg-"))?;
        match bg.to_ascii_lowercase().as_str() {
            "bg-white" => Some(TaskColor::White),
            "bg-[#83ecbb]" => Some(TaskColor::Mint),
            "bg-[#f3f5f0]" => Some(TaskColor::Surface),
            "bg-[#d0e0e0]" => Some(TaskColor::SoftTeal),
            "bg-[#539190]" => Some(TaskColor::DeepTeal),
            _ => None,
        }
    }

    /// Parse anything a stored task might carry. Unknown values fall back to
    /// the default color rather than failing the load.
    pub fn parse_lenient(s: &str) -> TaskColor {
        TaskColor::from_token(s)
            .or_else(|| TaskColor::from_legacy_class(s))
            .unwrap_or_default()
    }
}

impl fmt::Display for TaskColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for TaskColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskColor::from_token(s).ok_or_else(|| {
            let tokens: Vec<&str> = TaskColor::ALL.iter().map(|c| c.token()).collect();
            format!("unknown color '{}' (expected one of: {})", s, tokens.join(", "))
        })
    }
}

impl<'de> Deserialize<'de> for TaskColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(TaskColor::parse_lenient(&s))
    }
}

/// A single card on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Owning column
    pub column_id: ColumnId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub color: TaskColor,
    #[serde(default)]
    pub completed: bool,
    /// Filled with the load time when a dataset omits it
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    /// Present exactly while `completed` is true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Set the completion flag, keeping `completed_at` in step with it.
    /// Setting the flag to its current value changes nothing.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        if self.completed == completed {
            return;
        }
        self.completed = completed;
        self.completed_at = if completed { Some(now) } else { None };
    }
}

/// Fields supplied when creating a task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub color: TaskColor,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            ..Default::default()
        }
    }
}

/// Partial update merged into an existing task. `None` leaves a field alone;
/// `description: Some(None)` clears the description.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<TaskColor>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.color.is_none()
    }

    /// Merge into `task`
    pub fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = description;
        }
        if let Some(color) = self.color {
            task.color = color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_read_as_strings() {
        let task: Task = serde_json::from_str(
            r#"{"id":1712345678901,"columnId":"todo","title":"x","color":"mint","completed":false,"createdAt":"2025-01-02T03:04:05.000Z"}"#,
        )
        .unwrap();
        assert_eq!(task.id.as_str(), "1712345678901");
        assert_eq!(task.color, TaskColor::Mint);
    }

    #[test]
    fn legacy_class_colors_are_mapped() {
        assert_eq!(
            TaskColor::parse_lenient("bg-[#539190] text-white border-transparent"),
            TaskColor::DeepTeal
        );
        assert_eq!(
            TaskColor::parse_lenient("bg-[#83ecbb] border-[#539190]/20"),
            TaskColor::Mint
        );
        assert_eq!(
            TaskColor::parse_lenient("bg-[#f3f5f0] border-[#539190]/20"),
            TaskColor::Surface
        );
        assert_eq!(TaskColor::parse_lenient("bg-white border-transparent"), TaskColor::White);
        assert_eq!(TaskColor::parse_lenient("chartreuse"), TaskColor::White);
    }

    #[test]
    fn color_tokens_and_names_parse() {
        assert_eq!("soft-teal".parse::<TaskColor>(), Ok(TaskColor::SoftTeal));
        assert_eq!("Deep Teal".parse::<TaskColor>(), Ok(TaskColor::DeepTeal));
        assert!("teal".parse::<TaskColor>().is_err());
    }

    #[test]
    fn serialization_omits_absent_optionals() {
        let task = Task {
            id: "7".into(),
            column_id: "todo".into(),
            title: "Write docs".into(),
            description: None,
            color: TaskColor::SoftTeal,
            completed: false,
            created_at: Utc::now(),
            completed_at: None,
        };
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["columnId"], "todo");
        assert_eq!(json["color"], "soft-teal");
        assert!(json.get("description").is_none());
        assert!(json.get("completedAt").is_none());
    }

    #[test]
    fn set_completed_tracks_timestamp() {
        let mut task: Task =
            serde_json::from_str(r#"{"id":"1","columnId":"todo","title":"t"}"#).unwrap();
        let now = Utc::now();
        task.set_completed(true, now);
        assert_eq!(task.completed_at, Some(now));
        task.set_completed(true, now + chrono::Duration::seconds(5));
        assert_eq!(task.completed_at, Some(now));
        task.set_completed(false, now);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn patch_clears_description() {
        let mut task: Task = serde_json::from_str(
            r#"{"id":"1","columnId":"todo","title":"t","description":"old"}"#,
        )
        .unwrap();
        TaskPatch {
            title: Some("new".into()),
            description: Some(None),
            color: None,
        }
        .apply(&mut task);
        assert_eq!(task.title, "new");
        assert!(task.description.is_none());
    }
}
