//! URL slugs for geography and keyword names.

/// Combining ring above, the decomposed form of the å diacritic.
const COMBINING_RING: char = '\u{030a}';
/// Combining diaeresis, the decomposed form of the ä/ö diacritic.
const COMBINING_DIAERESIS: char = '\u{0308}';

/// Derive the URL slug for a display name.
///
/// Lowercases, maps separators (space, `&`, parentheses) to hyphens,
/// transliterates the Swedish letters å/ä → a and ö → o (composed or
/// decomposed form), and collapses hyphen runs. Deterministic and
/// idempotent; everything else passes through unchanged, so distinct
/// county and municipality names keep distinct slugs.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut mapped = String::with_capacity(name.len());
    for c in name.chars().flat_map(char::to_lowercase) {
        match c {
            ' ' | '&' | '(' | ')' => mapped.push('-'),
            'å' | 'ä' => mapped.push('a'),
            'ö' => mapped.push('o'),
            // Decomposed å/ä/ö: the base letter was already pushed.
            COMBINING_RING | COMBINING_DIAERESIS => {}
            _ => mapped.push(c),
        }
    }

    let mut slug = String::with_capacity(mapped.len());
    let mut previous_was_hyphen = false;
    for c in mapped.chars() {
        if c == '-' {
            if !previous_was_hyphen {
                slug.push('-');
            }
            previous_was_hyphen = true;
        } else {
            slug.push(c);
            previous_was_hyphen = false;
        }
    }
    slug
}
