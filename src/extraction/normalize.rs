/// Collapse whitespace runs to single spaces, trim, and upper-case.
///
/// Used for label and placeholder matching only; values are always read
/// from the original line.
pub fn normalize(line: &str) -> String {
    line.split(is_text_space)
        .filter(|word| !word.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
        .to_uppercase()
}

/// Unicode whitespace plus the ASCII information separators `\x1c`..=`\x1f`.
pub fn is_text_space(character: char) -> bool {
    character.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&character)
}

/// Line boundaries: `\n`, `\r`, vertical tab, form feed, the file/group/record
/// separators, NEL, and the Unicode line and paragraph separators.
pub fn is_line_break(character: char) -> bool {
    matches!(
        character,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'..='\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Word title case: a cased letter following another cased letter is
/// lower-cased, any other cased letter is upper-cased.
pub fn title_case(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut previous_cased = false;

    for character in text.chars() {
        let cased = character.is_uppercase() || character.is_lowercase();
        if cased && previous_cased {
            output.extend(character.to_lowercase());
        } else if cased {
            output.extend(character.to_uppercase());
        } else {
            output.push(character);
        }
        previous_cased = cased;
    }

    output
}
