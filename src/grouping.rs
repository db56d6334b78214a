use std::error::Error;

/// Splits a hyphen-separated word string into `num_groups` contiguous
/// groups of near-equal size. The words are sorted lexicographically
/// first; group sizes are `floor(n / k)`, with the first `n mod k`
/// groups taking one extra word. Asking for more groups than words
/// yields trailing empty groups.
///
/// # Arguments
/// * `words` - The raw input string, words separated by `-`.
/// * `num_groups` - The number of groups to produce.
///
/// # Errors
/// Returns an error if `num_groups` is zero.
pub fn split_into_groups(
    words: &str,
    num_groups: usize,
) -> Result<Vec<Vec<String>>, Box<dyn Error>> {
    if num_groups == 0 {
        return Err("number of groups must be at least 1".into());
    }

    let mut word_list: Vec<String> = words.split('-').map(|w| w.to_string()).collect();
    word_list.sort();

    let group_size = word_list.len() / num_groups;
    let remainder = word_list.len() % num_groups;

    let mut groups = Vec::with_capacity(num_groups);
    let mut start = 0;
    for i in 0..num_groups {
        let end = start + group_size + usize::from(i < remainder);
        groups.push(word_list[start..end].to_vec());
        start = end;
    }

    Ok(groups)
}

/// Formats each group as `"{index+1}-{category}: {word, word, ...}"`,
/// cycling through the categories round-robin.
///
/// # Arguments
/// * `groups` - The ordered groups from [`split_into_groups`].
/// * `categories` - The category list to cycle through.
///
/// # Errors
/// Returns an error if the category list is empty.
pub fn categorize_groups(
    groups: &[Vec<String>],
    categories: &[String],
) -> Result<Vec<String>, Box<dyn Error>> {
    if categories.is_empty() {
        return Err("category list is empty: the dataset has no labeled records".into());
    }

    Ok(groups
        .iter()
        .enumerate()
        .map(|(i, group)| {
            let category = &categories[i % categories.len()];
            format!("{}-{}: {}", i + 1, category, group.join(", "))
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_split_sorts_and_partitions() -> Result<(), Box<dyn std::error::Error>> {
        let groups = split_into_groups("banana-apple-cherry-date", 2)?;

        assert_eq!(
            groups,
            vec![strings(&["apple", "banana"]), strings(&["cherry", "date"])]
        );
        Ok(())
    }

    #[test]
    fn test_split_remainder_goes_to_leading_groups() -> Result<(), Box<dyn std::error::Error>> {
        let groups = split_into_groups("a-b-c-d-e", 3)?;

        // 5 words into 3 groups: sizes 2, 2, 1.
        assert_eq!(
            groups,
            vec![strings(&["a", "b"]), strings(&["c", "d"]), strings(&["e"])]
        );
        Ok(())
    }

    #[test]
    fn test_split_partition_properties() -> Result<(), Box<dyn std::error::Error>> {
        let words = "fig-egg-date-cherry-banana-apple-grape";
        let n = 7;

        for k in 1..=n {
            let groups = split_into_groups(words, k)?;
            assert_eq!(groups.len(), k);

            // All words present, in sorted order, none duplicated.
            let flat: Vec<String> = groups.iter().flatten().cloned().collect();
            assert_eq!(
                flat,
                strings(&["apple", "banana", "cherry", "date", "egg", "fig", "grape"])
            );

            // Sizes differ by at most one, larger groups first.
            for (i, group) in groups.iter().enumerate() {
                let expected = n / k + usize::from(i < n % k);
                assert_eq!(group.len(), expected);
            }
        }
        Ok(())
    }

    #[test]
    fn test_split_more_groups_than_words() -> Result<(), Box<dyn std::error::Error>> {
        let groups = split_into_groups("b-a", 4)?;

        // Trailing groups come back empty rather than failing.
        assert_eq!(
            groups,
            vec![strings(&["a"]), strings(&["b"]), vec![], vec![]]
        );
        Ok(())
    }

    #[test]
    fn test_split_zero_groups_fails() {
        assert!(split_into_groups("a-b", 0).is_err());
    }

    #[test]
    fn test_categorize_cycles_round_robin() -> Result<(), Box<dyn std::error::Error>> {
        let groups = vec![
            strings(&["apple", "banana"]),
            strings(&["cherry"]),
            strings(&["date"]),
        ];
        let categories = strings(&["fruit", "red"]);

        let lines = categorize_groups(&groups, &categories)?;

        assert_eq!(
            lines,
            vec![
                "1-fruit: apple, banana",
                "2-red: cherry",
                "3-fruit: date"
            ]
        );
        Ok(())
    }

    #[test]
    fn test_categorize_empty_categories_fails() {
        let groups = vec![strings(&["apple"])];
        assert!(categorize_groups(&groups, &[]).is_err());
    }
}
