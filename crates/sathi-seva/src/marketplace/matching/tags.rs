use std::collections::BTreeSet;

/// True when the worker has at least one of the required tags.
///
/// Matching is exact and case-sensitive; an empty side never matches.
pub fn matches(worker_skills: &BTreeSet<String>, required_tags: &BTreeSet<String>) -> bool {
    !worker_skills.is_disjoint(required_tags)
}

/// Tags shared by both sets, in sorted order.
pub fn shared_tags<'a>(
    worker_skills: &'a BTreeSet<String>,
    required_tags: &'a BTreeSet<String>,
) -> Vec<&'a str> {
    worker_skills
        .intersection(required_tags)
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(tags: &[&str]) -> BTreeSet<String> {
        tags.iter().map(|tag| tag.to_string()).collect()
    }

    #[test]
    fn any_common_tag_is_enough() {
        assert!(matches(&set(&["Plumbing"]), &set(&["Plumbing", "Wiring"])));
        assert!(matches(
            &set(&["Cooking", "Wiring"]),
            &set(&["Plumbing", "Wiring"])
        ));
    }

    #[test]
    fn disjoint_or_empty_sets_never_match() {
        assert!(!matches(&set(&["Cooking"]), &set(&["Plumbing"])));
        assert!(!matches(&set(&[]), &set(&["Plumbing"])));
        assert!(!matches(&set(&["Plumbing"]), &set(&[])));
        assert!(!matches(&set(&[]), &set(&[])));
    }

    #[test]
    fn comparison_is_case_sensitive() {
        assert!(!matches(&set(&["plumbing"]), &set(&["Plumbing"])));
    }

    #[test]
    fn matches_agrees_with_intersection() {
        let pool = ["Plumbing", "Wiring", "Cooking", "Painting"];
        for worker_mask in 0u8..16 {
            for job_mask in 0u8..16 {
                let pick = |mask: u8| -> BTreeSet<String> {
                    pool.iter()
                        .enumerate()
                        .filter(|(idx, _)| mask & (1 << idx) != 0)
                        .map(|(_, tag)| tag.to_string())
                        .collect()
                };
                let worker = pick(worker_mask);
                let job = pick(job_mask);
                assert_eq!(
                    matches(&worker, &job),
                    !shared_tags(&worker, &job).is_empty()
                );
                assert_eq!(matches(&worker, &job), worker_mask & job_mask != 0);
            }
        }
    }
}
