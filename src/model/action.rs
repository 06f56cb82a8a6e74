use std::fmt;

/// What a changelist did to one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileAction {
    Add,
    Edit,
    Delete,
    Branch,
    Integrate,
    MoveAdd,
    MoveDelete,
    Other(String),
}

impl FileAction {
    pub fn from_token(token: &str) -> FileAction {
        match token.to_ascii_lowercase().as_str() {
            "add" => FileAction::Add,
            "edit" => FileAction::Edit,
            "delete" => FileAction::Delete,
            "branch" => FileAction::Branch,
            "integrate" => FileAction::Integrate,
            "move/add" => FileAction::MoveAdd,
            "move/delete" => FileAction::MoveDelete,
            other => FileAction::Other(other.to_string()),
        }
    }

    /// Only plain deletions are excluded from overlay consideration.
    pub fn is_delete(&self) -> bool {
        matches!(self, FileAction::Delete)
    }

    pub fn as_str(&self) -> &str {
        match self {
            FileAction::Add => "add",
            FileAction::Edit => "edit",
            FileAction::Delete => "delete",
            FileAction::Branch => "branch",
            FileAction::Integrate => "integrate",
            FileAction::MoveAdd => "move/add",
            FileAction::MoveDelete => "move/delete",
            FileAction::Other(s) => s,
        }
    }
}

impl fmt::Display for FileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
