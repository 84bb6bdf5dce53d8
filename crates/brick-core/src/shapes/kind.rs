use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete brick category.
///
/// Variants are declared in logical rank order, so the derived `Ord` sorts
/// `Undefined` lowest and `TwoByFour` highest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ShapeType {
    #[default]
    #[serde(rename = "undefined")]
    Undefined,
    #[serde(rename = "1x3")]
    OneByThree,
    #[serde(rename = "1x4")]
    OneByFour,
    #[serde(rename = "2x2")]
    TwoByTwo,
    #[serde(rename = "2x4")]
    TwoByFour,
}

impl ShapeType {
    pub fn label(&self) -> &'static str {
        match self {
            ShapeType::Undefined => "undefined",
            ShapeType::OneByThree => "1x3",
            ShapeType::OneByFour => "1x4",
            ShapeType::TwoByTwo => "2x2",
            ShapeType::TwoByFour => "2x4",
        }
    }

    /// Family this type belongs to, `None` for `Undefined`
    pub fn family(&self) -> Option<Family> {
        match self {
            ShapeType::Undefined => None,
            ShapeType::OneByThree | ShapeType::OneByFour => Some(Family::Narrow),
            ShapeType::TwoByTwo | ShapeType::TwoByFour => Some(Family::Wide),
        }
    }
}

impl fmt::Display for ShapeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pair of mutually exclusive shape types for one colour group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// 1x3 / 1x4, used by blue and yellow bricks
    Narrow,
    /// 2x2 / 2x4, used by red and green bricks
    Wide,
}

impl Family {
    pub fn larger(&self) -> ShapeType {
        match self {
            Family::Narrow => ShapeType::OneByFour,
            Family::Wide => ShapeType::TwoByFour,
        }
    }

    pub fn smaller(&self) -> ShapeType {
        match self {
            Family::Narrow => ShapeType::OneByThree,
            Family::Wide => ShapeType::TwoByTwo,
        }
    }

    /// Members in evaluation order, larger first
    pub fn members(&self) -> [ShapeType; 2] {
        [self.larger(), self.smaller()]
    }

    pub fn contains(&self, shape_type: ShapeType) -> bool {
        shape_type.family() == Some(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_order() {
        let mut types = vec![
            ShapeType::TwoByFour,
            ShapeType::Undefined,
            ShapeType::OneByFour,
            ShapeType::TwoByTwo,
            ShapeType::OneByThree,
        ];
        types.sort();
        assert_eq!(
            types,
            vec![
                ShapeType::Undefined,
                ShapeType::OneByThree,
                ShapeType::OneByFour,
                ShapeType::TwoByTwo,
                ShapeType::TwoByFour,
            ]
        );
    }

    #[test]
    fn test_family_members_larger_first() {
        assert_eq!(
            Family::Narrow.members(),
            [ShapeType::OneByFour, ShapeType::OneByThree]
        );
        assert_eq!(
            Family::Wide.members(),
            [ShapeType::TwoByFour, ShapeType::TwoByTwo]
        );
        assert!(!Family::Wide.contains(ShapeType::OneByFour));
        assert!(!Family::Narrow.contains(ShapeType::Undefined));
    }

    #[test]
    fn test_labels_match_serde_names() {
        let json = serde_json::to_string(&ShapeType::TwoByFour).unwrap();
        assert_eq!(json, "\"2x4\"");
        assert_eq!(ShapeType::OneByThree.to_string(), "1x3");
    }
}
