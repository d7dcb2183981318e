use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;

/// The life-domain an activity belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Health,
    Learning,
    Leisure,
    Family,
    Outdoor,
    Personal,
}

/// Display metadata attached to each category.
#[derive(Debug, PartialEq, Eq)]
pub struct CategoryStyle {
    pub name: &'static str,
    pub hex: &'static str,
    pub rgb: (u8, u8, u8),
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Work,
        Category::Health,
        Category::Learning,
        Category::Leisure,
        Category::Family,
        Category::Outdoor,
        Category::Personal,
    ];

    /// The key used in storage and on the command line.
    pub fn key(self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Health => "health",
            Category::Learning => "learning",
            Category::Leisure => "leisure",
            Category::Family => "family",
            Category::Outdoor => "outdoor",
            Category::Personal => "personal",
        }
    }

    /// The category stored under exactly `key`.
    pub fn from_key(key: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|category| category.key() == key)
    }

    pub fn style(self) -> &'static CategoryStyle {
        match self {
            Category::Work => &WORK,
            Category::Health => &HEALTH,
            Category::Learning => &LEARNING,
            Category::Leisure => &LEISURE,
            Category::Family => &FAMILY,
            Category::Outdoor => &OUTDOOR,
            Category::Personal => &PERSONAL,
        }
    }

    pub fn display_name(self) -> &'static str {
        self.style().name
    }

    pub fn hex(self) -> &'static str {
        self.style().hex
    }

    pub fn rgb(self) -> (u8, u8, u8) {
        self.style().rgb
    }
}

const WORK: CategoryStyle = CategoryStyle {
    name: "Work",
    hex: "#3b82f6",
    rgb: (59, 130, 246),
};
const HEALTH: CategoryStyle = CategoryStyle {
    name: "Health & Fitness",
    hex: "#22c55e",
    rgb: (34, 197, 94),
};
const LEARNING: CategoryStyle = CategoryStyle {
    name: "Learning",
    hex: "#a855f7",
    rgb: (168, 85, 247),
};
const LEISURE: CategoryStyle = CategoryStyle {
    name: "Leisure",
    hex: "#f59e0b",
    rgb: (245, 158, 11),
};
const FAMILY: CategoryStyle = CategoryStyle {
    name: "Family",
    hex: "#ec4899",
    rgb: (236, 72, 153),
};
const OUTDOOR: CategoryStyle = CategoryStyle {
    name: "Outdoor",
    hex: "#10b981",
    rgb: (16, 185, 129),
};
const PERSONAL: CategoryStyle = CategoryStyle {
    name: "Personal",
    hex: "#8b5cf6",
    rgb: (139, 92, 246),
};

impl FromStr for Category {
    type Err = PlannerError;

    /// Lenient parse for typed input: surrounding blanks and case are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Category::from_key(&key).ok_or_else(|| PlannerError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
