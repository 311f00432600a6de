use super::Compare;

/// The `WHERE` clause of a statement.
#[derive(Debug, PartialEq, Clone, Default)]
pub enum ConditionTree<'a> {
    /// `(left AND right AND ...)`, always written inside parentheses, also
    /// when holding a single comparison.
    And(Vec<Compare<'a>>),
    /// A leaf that does nothing to the condition, `1=1`
    #[default]
    NoCondition,
}

impl<'a> ConditionTree<'a> {
    /// Adds one more comparison to the conjunction.
    pub fn and(self, compare: Compare<'a>) -> ConditionTree<'a> {
        match self {
            ConditionTree::And(mut compares) => {
                compares.push(compare);
                ConditionTree::And(compares)
            }
            ConditionTree::NoCondition => ConditionTree::from(compare),
        }
    }
}

impl<'a> FromIterator<Compare<'a>> for ConditionTree<'a> {
    fn from_iter<I: IntoIterator<Item = Compare<'a>>>(iter: I) -> Self {
        let compares: Vec<_> = iter.into_iter().collect();

        if compares.is_empty() {
            ConditionTree::NoCondition
        } else {
            ConditionTree::And(compares)
        }
    }
}
