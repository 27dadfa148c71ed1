use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub user_id: String,
    pub is_hidden: bool,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub is_hidden: bool,
}

impl NewCategory {
    /// Validated constructor. Rejects empty or whitespace-only names.
    pub fn new(name: &str, color: &str, is_hidden: bool) -> AppResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::Validation("Category name is empty".into()));
        }
        let color = color.trim();
        let color = if color.is_empty() {
            default_color()
        } else {
            color.to_string()
        };
        Ok(Self {
            name: name.to_string(),
            color,
            is_hidden,
        })
    }
}

fn default_color() -> String {
    "#6b7280".to_string()
}
