/*!
 * URL slug helpers.
 *
 * `slugify` turns a display name into a lowercase kebab-case key; it is used
 * for navigation item type keys and the CLI's generated tag slugs.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9\s-]+").expect("valid slug character regex"));

static SEPARATOR_RUNS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s-]+").expect("valid separator regex"));

/// Fold common Latin accented characters to ASCII
fn fold_char(c: char) -> Option<&'static str> {
    let folded = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => "a",
        'æ' => "ae",
        'ç' | 'ć' | 'č' | 'ĉ' => "c",
        'ď' | 'đ' | 'ð' => "d",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' | 'ě' => "e",
        'ğ' | 'ĝ' | 'ġ' => "g",
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ı' => "i",
        'ł' | 'ľ' => "l",
        'ñ' | 'ń' | 'ň' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ő' => "o",
        'œ' => "oe",
        'ř' => "r",
        'ś' | 'š' | 'ş' => "s",
        'ß' => "ss",
        'ť' | 'ţ' => "t",
        'þ' => "th",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ů' | 'ű' => "u",
        'ý' | 'ÿ' => "y",
        'ź' | 'ż' | 'ž' => "z",
        _ => return None,
    };
    Some(folded)
}

/// Build a slug from arbitrary text
///
/// `_` becomes a separator and `@` becomes `-at-`; other punctuation is
/// dropped.
pub fn slugify(text: &str) -> String {
    let mut folded = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        match c {
            '_' => folded.push('-'),
            '@' => folded.push_str("-at-"),
            _ => match fold_char(c) {
                Some(ascii) => folded.push_str(ascii),
                None => folded.push(c),
            },
        }
    }

    let cleaned = NON_SLUG_CHARS.replace_all(&folded, "");
    let collapsed = SEPARATOR_RUNS.replace_all(&cleaned, "-");
    collapsed.trim_matches('-').to_string()
}

/// Check that a slug is non-empty lowercase kebab-case
pub fn validate_slug(slug: &str) -> anyhow::Result<()> {
    let is_valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--")
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if is_valid {
        Ok(())
    } else {
        Err(anyhow::anyhow!("slug '{}' must be lowercase kebab-case", slug))
    }
}
