/// Convert snake_case, kebab-case or camelCase to PascalCase.
///
/// Only the first letter of each segment is changed, so `fooBar` becomes
/// `FooBar` and `post_author` becomes `PostAuthor`.
///
/// # Examples
/// ```
/// use sitegraph_core::utils::to_pascal_case;
/// assert_eq!(to_pascal_case("foo_bar"), "FooBar");
/// assert_eq!(to_pascal_case("frontmatter"), "Frontmatter");
/// assert_eq!(to_pascal_case("coverImage"), "CoverImage");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    s.split(is_separator)
        .filter(|segment| !segment.is_empty())
        .map(upper_first)
        .collect()
}

/// Uppercase the first character, leaving the rest untouched.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

/// Lowercase the first character, leaving the rest untouched.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_lowercase().chain(chars).collect(),
    }
}

/// Convert any identifier-ish text to camelCase.
///
/// Words are split on separators and on case boundaries, so acronyms are
/// normalized: `PostsJSON` becomes `postsJson`.
///
/// # Examples
/// ```
/// use sitegraph_core::utils::to_camel_case;
/// assert_eq!(to_camel_case("IndexQuery"), "indexQuery");
/// assert_eq!(to_camel_case("blog-post query"), "blogPostQuery");
/// assert_eq!(to_camel_case("PostsJSON"), "postsJson");
/// ```
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, word) in split_words(s).iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            out.push_str(&upper_first(&lower));
        }
    }
    out
}

fn is_separator(c: char) -> bool {
    !c.is_alphanumeric()
}

/// Split into words on separators, lower→upper transitions and the end of
/// an uppercase run (`XMLHttp` → `XML`, `Http`).
fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if is_separator(c) {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p))
            && !current.is_empty()
        {
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let lower_to_upper = (prev.is_lowercase() || prev.is_ascii_digit()) && c.is_uppercase();
            let acronym_end = prev.is_uppercase() && c.is_uppercase() && next_is_lower;
            if lower_to_upper || acronym_end {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Levenshtein distance, counted in characters.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b_len = b.chars().count();
    if a.is_empty() {
        return b_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];
    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.chars().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b_len]
}

/// Closest candidate by edit distance, if within `max_distance`.
///
/// Ties go to the earlier candidate.
pub fn find_similar<'a>(name: &str, candidates: &[&'a str], max_distance: usize) -> Option<&'a str> {
    candidates
        .iter()
        .map(|&c| (c, edit_distance(name, c)))
        .filter(|(_, d)| *d <= max_distance)
        .min_by_key(|(_, d)| *d)
        .map(|(c, _)| c)
}
