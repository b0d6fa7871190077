//! Keyword-based category assignment.

use std::collections::HashSet;

use crate::types::claim::Category;

/// Keyword sets checked in order; the first category with a hit wins.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (
        Category::Institutional,
        &[
            "university",
            "college",
            "institute",
            "school",
            "company",
            "corporation",
            "organization",
            "hospital",
            "museum",
            "foundation",
            "agency",
            "founded",
            "established",
        ],
    ),
    (
        Category::Demographic,
        &[
            "population",
            "people",
            "residents",
            "inhabitants",
            "census",
            "citizens",
            "birth rate",
            "life expectancy",
            "immigrants",
            "demographic",
        ],
    ),
    (
        Category::Economic,
        &[
            "gdp",
            "economy",
            "economic",
            "inflation",
            "unemployment",
            "income",
            "dollars",
            "revenue",
            "trade",
            "market",
            "wage",
            "wages",
            "debt",
            "tax",
            "taxes",
        ],
    ),
    (
        Category::Scientific,
        &[
            "scientist",
            "scientists",
            "study",
            "research",
            "climate",
            "species",
            "vaccine",
            "vaccines",
            "disease",
            "temperature",
            "planet",
            "earth",
            "atoms",
            "dna",
            "physics",
            "chemistry",
            "biology",
            "brain",
        ],
    ),
    (
        Category::Political,
        &[
            "president",
            "election",
            "government",
            "congress",
            "parliament",
            "senate",
            "vote",
            "law",
            "minister",
            "policy",
            "party",
            "governor",
        ],
    ),
];

/// Assign a category to a statement.
pub fn categorize(statement: &str) -> Category {
    let lower = statement.to_lowercase();
    let words: HashSet<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    CATEGORY_KEYWORDS
        .iter()
        .find(|(_, keywords)| {
            keywords.iter().any(|keyword| {
                // Multi-word keywords match as phrases, single words as whole tokens
                if keyword.contains(' ') {
                    lower.contains(keyword)
                } else {
                    words.contains(keyword)
                }
            })
        })
        .map(|(category, _)| *category)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_institutional() {
        assert_eq!(
            categorize("Stanford University was founded in 1885"),
            Category::Institutional
        );
    }

    #[test]
    fn test_demographic() {
        assert_eq!(
            categorize("The population of Tokyo is 14 million"),
            Category::Demographic
        );
        assert_eq!(
            categorize("Japan has the highest life expectancy"),
            Category::Demographic
        );
    }

    #[test]
    fn test_economic() {
        assert_eq!(categorize("US GDP grew 2.5% last year"), Category::Economic);
    }

    #[test]
    fn test_first_match_wins() {
        // "university" (institutional) beats "research" (scientific)
        assert_eq!(
            categorize("The university does research"),
            Category::Institutional
        );
    }

    #[test]
    fn test_whole_word_only() {
        // "lawn" must not match "law"
        assert_eq!(categorize("The lawn is green"), Category::General);
    }
}
