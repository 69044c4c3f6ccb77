/// A static classification label with display name and color.
/// Categories are reference data: the store only looks them up by id,
/// never mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

/// Display fallbacks for category ids with no reference-data entry.
pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown";
pub const DEFAULT_CATEGORY_COLOR: &str = "#666666";

/// The predefined category table. `income` is reserved for income
/// transactions; everything else classifies expenses.
pub const CATEGORIES: &[Category] = &[
    Category { id: "housing", name: "Housing", color: "#8B5CF6" },
    Category { id: "food", name: "Food & Dining", color: "#EC4899" },
    Category { id: "transportation", name: "Transportation", color: "#10B981" },
    Category { id: "utilities", name: "Utilities", color: "#F59E0B" },
    Category { id: "entertainment", name: "Entertainment", color: "#3B82F6" },
    Category { id: "healthcare", name: "Healthcare", color: "#EF4444" },
    Category { id: "shopping", name: "Shopping", color: "#6366F1" },
    Category { id: "personal", name: "Personal", color: "#8B5CF6" },
    Category { id: "education", name: "Education", color: "#F97316" },
    Category { id: "savings", name: "Savings", color: "#14B8A6" },
    Category { id: "debt", name: "Debt", color: "#F43F5E" },
    Category { id: "income", name: "Income", color: "#22C55E" },
    Category { id: "other", name: "Other", color: "#64748B" },
];

impl Category {
    /// Total lookup: unknown ids yield `None`, callers apply the
    /// fallback display policy.
    pub fn find(id: &str) -> Option<&'static Category> {
        CATEGORIES.iter().find(|c| c.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_known() {
        let food = Category::find("food").unwrap();
        assert_eq!(food.name, "Food & Dining");
        assert_eq!(food.color, "#EC4899");
    }

    #[test]
    fn test_find_unknown() {
        assert!(Category::find("crypto").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        for (i, a) in CATEGORIES.iter().enumerate() {
            for b in &CATEGORIES[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }
}
