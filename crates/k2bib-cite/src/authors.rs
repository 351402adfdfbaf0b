// Author list rendering.
//
// Names on the program pages are written "Surname, Given". The first word
// of each name is therefore the surname followed by a comma, which is the
// character dropped below.

use unicode_normalization::UnicodeNormalization;

use crate::CiteError;

/// Render one author as `{Surname}, I.`.
///
/// Only the first whitespace-delimited word is used. Its final character
/// is dropped to give the surname, and its first character is the initial:
/// `"Howell, Steve"` renders as `{Howell}, H.`.
pub fn format_author(author: &str) -> Result<String, CiteError> {
    let malformed = || CiteError::MalformedAuthor(author.trim().to_string());

    // NFC first so a combining accent is never split from its letter.
    let word: Vec<char> = author
        .split_whitespace()
        .next()
        .ok_or_else(malformed)?
        .nfc()
        .collect();
    if word.len() < 2 {
        return Err(malformed());
    }

    let surname: String = word[..word.len() - 1].iter().collect();
    let initial = word[0];
    Ok(format!("{{{surname}}}, {initial}."))
}

/// Render an author list joined with " and ". Blank entries are skipped.
pub fn format_authors(authors: &[&str]) -> Result<String, CiteError> {
    let rendered = authors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(format_author)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rendered.join(" and "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surname_comma_form() {
        assert_eq!(format_author("Howell, Steve").unwrap(), "{Howell}, H.");
    }

    #[test]
    fn test_only_first_word_used() {
        assert_eq!(format_author("  Cody, Ann Marie ").unwrap(), "{Cody}, C.");
    }

    #[test]
    fn test_given_name_first_is_mangled() {
        // Names not in "Surname, Given" form lose their last letter.
        assert_eq!(format_author("Jane D").unwrap(), "{Jan}, J.");
    }

    #[test]
    fn test_list_joined_with_and() {
        let out = format_authors(&["Jane D", "", " John S "]).unwrap();
        assert_eq!(out, "{Jan}, J. and {Joh}, J.");
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_authors(&[]).unwrap(), "");
    }

    #[test]
    fn test_single_character_word() {
        assert_eq!(format_author("X Y"), Err(CiteError::MalformedAuthor("X Y".to_string())));
    }

    #[test]
    fn test_blank_author() {
        assert!(format_author("   ").is_err());
    }

    #[test]
    fn test_decomposed_accent() {
        // "Lopé," with a combining acute on the e.
        assert_eq!(format_author("Lope\u{0301}, Maria").unwrap(), "{Lop\u{e9}}, L.");
    }
}
