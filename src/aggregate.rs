use crate::models::{AuthorCommitCount, CommitRecord};
use std::collections::HashMap;

/// Groups raw commit records by author display name, counting occurrences
///
/// Pure and deterministic up to output ordering: one entry per distinct
/// author, counts summing to the input length. Records missing author
/// identity at any nesting level are counted under `"Unknown"`.
pub fn aggregate_commits(commits: &[CommitRecord]) -> Vec<AuthorCommitCount> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for commit in commits {
        *counts.entry(commit.author_name()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(author, commits)| AuthorCommitCount {
            author: author.to_string(),
            commits,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommitAuthor, CommitDetail};
    use proptest::prelude::*;

    fn commit(name: Option<&str>) -> CommitRecord {
        CommitRecord {
            commit: Some(CommitDetail {
                author: name.map(|name| CommitAuthor {
                    name: Some(name.to_string()),
                }),
            }),
        }
    }

    fn count_for<'a>(counts: &'a [AuthorCommitCount], author: &str) -> Option<u64> {
        counts
            .iter()
            .find(|entry| entry.author == author)
            .map(|entry| entry.commits)
    }

    #[test]
    fn test_counts_per_author() {
        let commits = vec![
            commit(Some("alice")),
            commit(Some("alice")),
            commit(None),
        ];

        let counts = aggregate_commits(&commits);
        assert_eq!(counts.len(), 2);
        assert_eq!(count_for(&counts, "alice"), Some(2));
        assert_eq!(count_for(&counts, "Unknown"), Some(1));
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_commits(&[]).is_empty());
    }

    #[test]
    fn test_missing_nesting_levels_count_as_unknown() {
        let commits = vec![
            CommitRecord { commit: None },
            CommitRecord {
                commit: Some(CommitDetail { author: None }),
            },
            commit(None),
        ];

        let counts = aggregate_commits(&commits);
        assert_eq!(counts.len(), 1);
        assert_eq!(count_for(&counts, "Unknown"), Some(3));
    }

    proptest! {
        #[test]
        fn prop_counts_sum_to_input_length(names in proptest::collection::vec(
            proptest::option::of("[a-z]{1,8}"), 0..50,
        )) {
            let commits: Vec<CommitRecord> =
                names.iter().map(|name| commit(name.as_deref())).collect();
            let counts = aggregate_commits(&commits);

            let total: u64 = counts.iter().map(|entry| entry.commits).sum();
            prop_assert_eq!(total, commits.len() as u64);
        }

        #[test]
        fn prop_one_entry_per_distinct_author(names in proptest::collection::vec(
            proptest::option::of("[a-z]{1,8}"), 0..50,
        )) {
            let commits: Vec<CommitRecord> =
                names.iter().map(|name| commit(name.as_deref())).collect();
            let counts = aggregate_commits(&commits);

            let distinct: std::collections::HashSet<&str> = commits
                .iter()
                .map(|commit| commit.author_name())
                .collect();
            prop_assert_eq!(counts.len(), distinct.len());

            let mut authors: Vec<&str> =
                counts.iter().map(|entry| entry.author.as_str()).collect();
            authors.sort_unstable();
            authors.dedup();
            prop_assert_eq!(authors.len(), counts.len());
        }
    }
}
