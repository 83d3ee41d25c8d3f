//! Static exercise-tutorial catalog and keyword matcher.
//!
//! The catalog maps canonical lowercase exercise names to reference-video
//! links. It is built once at startup and never mutated; matching is a pure
//! function of the input text and the table. Entries keep their declared
//! order, and that order is the match output order regardless of where the
//! keys appear in the scanned text.

use serde::Serialize;

/// One catalog entry: canonical lowercase name plus its video links.
#[derive(Debug, Clone)]
pub struct CatalogEntry {
    /// Canonical lowercase exercise name (unique within the catalog).
    pub name: &'static str,
    /// Reference-video URLs, in display order.
    pub links: &'static [&'static str],
}

/// A tutorial match produced for a response. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TutorialMatch {
    /// Display-cased exercise name (`"push ups"` → `"Push Ups"`).
    pub exercise: String,
    /// Video links for the exercise, in catalog order.
    pub links: Vec<String>,
}

/// Result of a direct tutorial lookup by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The query matched a catalog key exactly.
    Exact(TutorialMatch),
    /// One or more keys matched by bidirectional substring containment.
    Partial(Vec<TutorialMatch>),
    /// No catalog key qualified.
    NotFound,
}

/// The static exercise catalog.
#[derive(Debug)]
pub struct ExerciseCatalog {
    entries: Vec<CatalogEntry>,
}

impl ExerciseCatalog {
    /// Build the built-in catalog (24 exercises, grouped by muscle area).
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ENTRIES.to_vec(),
        }
    }

    /// Number of catalog entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All catalog keys, in declared order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.to_owned()).collect()
    }

    /// Iterate over entries in declared order.
    pub fn entries(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter()
    }

    /// Scan `haystack` for catalog keys (case-insensitive contiguous
    /// substring test) and return a match per found key, in catalog order.
    ///
    /// Keys that nest inside other keys each match independently; there is
    /// no de-duplication beyond key uniqueness.
    #[must_use]
    pub fn find_matches(&self, haystack: &str) -> Vec<TutorialMatch> {
        let lowered = haystack.to_lowercase();
        self.entries
            .iter()
            .filter(|e| lowered.contains(e.name))
            .map(|e| e.to_match())
            .collect()
    }

    /// Direct lookup by name for tutorial queries.
    ///
    /// An exact match on the trimmed lowercase name wins outright with a
    /// single result. Otherwise every key related to the query by substring
    /// containment in either direction is returned. Callers receiving
    /// [`Lookup::NotFound`] are expected to surface [`Self::names`] as
    /// guidance.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Lookup {
        let query = name.trim().to_lowercase();
        if query.is_empty() {
            return Lookup::NotFound;
        }

        if let Some(entry) = self.entries.iter().find(|e| e.name == query) {
            return Lookup::Exact(entry.to_match());
        }

        let matches: Vec<TutorialMatch> = self
            .entries
            .iter()
            .filter(|e| e.name.contains(&query) || query.contains(e.name))
            .map(|e| e.to_match())
            .collect();

        if matches.is_empty() {
            Lookup::NotFound
        } else {
            Lookup::Partial(matches)
        }
    }
}

impl Default for ExerciseCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CatalogEntry {
    fn to_match(&self) -> TutorialMatch {
        TutorialMatch {
            exercise: display_case(self.name),
            links: self.links.iter().map(|&l| l.to_owned()).collect(),
        }
    }
}

/// Title-case a lowercase catalog key for display: first letter of each
/// whitespace-separated word uppercased, the rest untouched.
#[must_use]
pub fn display_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The built-in exercise table. Order here is match output order.
const BUILTIN_ENTRIES: &[CatalogEntry] = &[
    // Chest
    CatalogEntry {
        name: "bench press",
        links: &[
            "https://www.youtube.com/watch?v=rT7DgCr-3pg",
            "https://www.youtube.com/watch?v=gRVjAtPip0Y",
        ],
    },
    CatalogEntry {
        name: "push ups",
        links: &[
            "https://www.youtube.com/watch?v=IODxDxX7oi4",
            "https://www.youtube.com/watch?v=_l3ySVKYVJ8",
        ],
    },
    CatalogEntry {
        name: "chest fly",
        links: &[
            "https://www.youtube.com/watch?v=eozdVDA78K0",
            "https://www.youtube.com/watch?v=Z56EYFZemhk",
        ],
    },
    // Back
    CatalogEntry {
        name: "pull ups",
        links: &[
            "https://www.youtube.com/watch?v=eGo4IYlbE5g",
            "https://www.youtube.com/watch?v=fLw3i7FiXsE",
        ],
    },
    CatalogEntry {
        name: "deadlift",
        links: &[
            "https://www.youtube.com/watch?v=ytGaGIn3SjE",
            "https://www.youtube.com/watch?v=r4MzxtBKyNE",
        ],
    },
    CatalogEntry {
        name: "rows",
        links: &[
            "https://www.youtube.com/watch?v=roCP6wCXPqo",
            "https://www.youtube.com/watch?v=9efgcAjQe7E",
        ],
    },
    // Legs
    CatalogEntry {
        name: "squats",
        links: &[
            "https://www.youtube.com/watch?v=ultWZbUMPL8",
            "https://www.youtube.com/watch?v=gcNh17Ckjgg",
        ],
    },
    CatalogEntry {
        name: "lunges",
        links: &[
            "https://www.youtube.com/watch?v=QOVaHwm-Q6U",
            "https://www.youtube.com/watch?v=wrwwXE_x-pQ",
        ],
    },
    CatalogEntry {
        name: "leg press",
        links: &[
            "https://www.youtube.com/watch?v=IZxyjW7MPJQ",
            "https://www.youtube.com/watch?v=z7eQq-GN-Nc",
        ],
    },
    // Shoulders
    CatalogEntry {
        name: "shoulder press",
        links: &[
            "https://www.youtube.com/watch?v=qEwKCR5JCog",
            "https://www.youtube.com/watch?v=M2rwvNhTOu0",
        ],
    },
    CatalogEntry {
        name: "lateral raises",
        links: &[
            "https://www.youtube.com/watch?v=3VcKaXpzqRo",
            "https://www.youtube.com/watch?v=kDqklk1ZESo",
        ],
    },
    // Arms
    CatalogEntry {
        name: "bicep curls",
        links: &[
            "https://www.youtube.com/watch?v=ykJmrZ5v0Oo",
            "https://www.youtube.com/watch?v=av7-8igSXTs",
        ],
    },
    CatalogEntry {
        name: "tricep dips",
        links: &[
            "https://www.youtube.com/watch?v=6kALZikXxLc",
            "https://www.youtube.com/watch?v=0326dy_-CzM",
        ],
    },
    // Core
    CatalogEntry {
        name: "plank",
        links: &[
            "https://www.youtube.com/watch?v=ASdvN_XEl_c",
            "https://www.youtube.com/watch?v=pvIjsG5Svck",
        ],
    },
    CatalogEntry {
        name: "crunches",
        links: &[
            "https://www.youtube.com/watch?v=Xyd_fa5zoEU",
            "https://www.youtube.com/watch?v=MKmrqcoCZ-M",
        ],
    },
    CatalogEntry {
        name: "russian twists",
        links: &[
            "https://www.youtube.com/watch?v=wkD8rjkodUI",
            "https://www.youtube.com/watch?v=JyUqwkVpsi8",
        ],
    },
    // Cardio
    CatalogEntry {
        name: "hiit",
        links: &[
            "https://www.youtube.com/watch?v=ml6cT4AZdqI",
            "https://www.youtube.com/watch?v=cZnsLVArIt8",
        ],
    },
    CatalogEntry {
        name: "running",
        links: &[
            "https://www.youtube.com/watch?v=brFHyOtTwH4",
            "https://www.youtube.com/watch?v=_kGESn8ArrU",
        ],
    },
    CatalogEntry {
        name: "burpees",
        links: &[
            "https://www.youtube.com/watch?v=TU8QYVW0gDU",
            "https://www.youtube.com/watch?v=JZQA08SlJnM",
        ],
    },
    // Full body
    CatalogEntry {
        name: "full body workout",
        links: &[
            "https://www.youtube.com/watch?v=UBMk30rjy0o",
            "https://www.youtube.com/watch?v=Yz6PmHcYbN0",
        ],
    },
    CatalogEntry {
        name: "abs workout",
        links: &[
            "https://www.youtube.com/watch?v=DHD1-2P94DI",
            "https://www.youtube.com/watch?v=1919eTCoESo",
        ],
    },
    // Weight loss
    CatalogEntry {
        name: "weight loss workout",
        links: &[
            "https://www.youtube.com/watch?v=2MicE75thDQ",
            "https://www.youtube.com/watch?v=kZDvg92tTMc",
        ],
    },
    CatalogEntry {
        name: "fat burning",
        links: &[
            "https://www.youtube.com/watch?v=ml6cT4AZdqI",
            "https://www.youtube.com/watch?v=cZnsLVArIt8",
        ],
    },
    CatalogEntry {
        name: "home workout",
        links: &[
            "https://www.youtube.com/watch?v=UBMk30rjy0o",
            "https://www.youtube.com/watch?v=Yz6PmHcYbN0",
        ],
    },
    CatalogEntry {
        name: "beginner workout",
        links: &[
            "https://www.youtube.com/watch?v=oAPCPjnU1wA",
            "https://www.youtube.com/watch?v=2MicE75thDQ",
        ],
    },
];

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

    use super::*;

    #[test]
    fn builtin_catalog_shape() {
        let catalog = ExerciseCatalog::builtin();
        assert_eq!(catalog.len(), 24);
        for entry in catalog.entries() {
            assert_eq!(entry.name, entry.name.to_lowercase());
            assert!(!entry.links.is_empty());
        }
    }

    #[test]
    fn find_matches_is_case_insensitive_substring() {
        let catalog = ExerciseCatalog::builtin();
        let matches = catalog.find_matches("Start with SQUATS and finish with a plank hold");
        let names: Vec<&str> = matches.iter().map(|m| m.exercise.as_str()).collect();
        assert_eq!(names, vec!["Squats", "Plank"]);
    }

    #[test]
    fn find_matches_every_result_is_a_substring() {
        let catalog = ExerciseCatalog::builtin();
        let haystack = "deadlift then rows then burpees";
        for m in catalog.find_matches(haystack) {
            assert!(haystack.contains(&m.exercise.to_lowercase()));
        }
    }

    #[test]
    fn find_matches_order_is_catalog_order_not_haystack_order() {
        let catalog = ExerciseCatalog::builtin();
        // Haystack mentions squats before push ups; catalog declares push ups first.
        let matches = catalog.find_matches("try squats then push ups");
        let names: Vec<&str> = matches.iter().map(|m| m.exercise.as_str()).collect();
        assert_eq!(names, vec!["Push Ups", "Squats"]);
    }

    #[test]
    fn find_matches_empty_haystack_is_empty() {
        let catalog = ExerciseCatalog::builtin();
        assert!(catalog.find_matches("").is_empty());
    }

    #[test]
    fn find_matches_nested_keys_both_returned() {
        // "workout" nests inside several keys; a haystack containing a
        // longer key also contains any key nested within it.
        let catalog = ExerciseCatalog::builtin();
        let matches = catalog.find_matches("a beginner workout plus an abs workout");
        let names: Vec<&str> = matches.iter().map(|m| m.exercise.as_str()).collect();
        assert_eq!(names, vec!["Abs Workout", "Beginner Workout"]);
    }

    #[test]
    fn resolve_exact_match_wins_outright() {
        let catalog = ExerciseCatalog::builtin();
        match catalog.resolve("squats") {
            Lookup::Exact(m) => {
                assert_eq!(m.exercise, "Squats");
                assert_eq!(m.links.len(), 2);
            }
            other => panic!("expected exact match, got {other:?}"),
        }
    }

    #[test]
    fn resolve_trims_and_lowercases() {
        let catalog = ExerciseCatalog::builtin();
        assert!(matches!(catalog.resolve("  Push Ups  "), Lookup::Exact(_)));
    }

    #[test]
    fn resolve_partial_is_bidirectional() {
        let catalog = ExerciseCatalog::builtin();
        // Query contained in keys:
        match catalog.resolve("press") {
            Lookup::Partial(matches) => {
                let names: Vec<&str> = matches.iter().map(|m| m.exercise.as_str()).collect();
                assert_eq!(names, vec!["Bench Press", "Leg Press", "Shoulder Press"]);
            }
            other => panic!("expected partial matches, got {other:?}"),
        }
        // Key contained in query:
        match catalog.resolve("weighted plank hold") {
            Lookup::Partial(matches) => {
                assert_eq!(matches.len(), 1);
                assert_eq!(matches[0].exercise, "Plank");
            }
            other => panic!("expected partial matches, got {other:?}"),
        }
    }

    #[test]
    fn resolve_not_found() {
        let catalog = ExerciseCatalog::builtin();
        assert_eq!(catalog.resolve("zzz-nonexistent"), Lookup::NotFound);
        assert_eq!(catalog.names().len(), 24);
    }

    #[test]
    fn resolve_empty_query_is_not_found() {
        let catalog = ExerciseCatalog::builtin();
        assert_eq!(catalog.resolve("   "), Lookup::NotFound);
    }

    #[test]
    fn display_case_per_word() {
        assert_eq!(display_case("push ups"), "Push Ups");
        assert_eq!(display_case("hiit"), "Hiit");
        assert_eq!(display_case("full body workout"), "Full Body Workout");
    }
}
