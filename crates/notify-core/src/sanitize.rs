use regex::Regex;
use std::sync::LazyLock;

// Characters with structural meaning in Discord markdown are swapped for
// fullwidth lookalikes; the two mention triggers are reduced to plain words.
const CHAR_REPLACEMENTS: &[(&str, &str)] = &[
    ("*", "＊"),
    ("`", "'"),
    ("_", "＿"),
    ("~", "～"),
    ("@here", "here"),
    ("@everyone", "everyone"),
];

const MARKUP_TAGS: &[&str] = &["</color>", "</size>", "<i>", "</i>", "<b>", "</b>"];

static MARKUP_TAG_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["<color=.+?>", "<size=.+?>"]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("markup tag pattern must compile"))
        .collect()
});

/// Neutralizes Discord markup and mention triggers in user-supplied text.
///
/// Applied to every player-controlled string (names, chat text, ban and kick
/// reasons) before it reaches a template. System-generated labels such as
/// grid coordinates skip this on purpose.
pub fn replace_chars(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let mut output = text.to_string();
    for (from, to) in CHAR_REPLACEMENTS {
        output = output.replace(from, to);
    }
    output
}

/// Strips the game's inline markup tags (color/size/bold/italic) out of a
/// message, substituting the configured replacement token.
pub fn strip_markup_tags(text: &str, replacement: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut output = text.to_string();
    for tag in MARKUP_TAGS {
        output = output.replace(tag, replacement);
    }

    for pattern in MARKUP_TAG_PATTERNS.iter() {
        output = pattern.replace_all(&output, replacement).into_owned();
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_delimiters_become_fullwidth() {
        assert_eq!(replace_chars("a*b_c~d"), "a＊b＿c～d");
        assert_eq!(replace_chars("say `hi`"), "say 'hi'");
    }

    #[test]
    fn mention_triggers_are_neutralized() {
        assert_eq!(replace_chars("hello @everyone and @here"), "hello everyone and here");
    }

    #[test]
    fn whitespace_only_input_becomes_empty() {
        assert_eq!(replace_chars("   "), "");
        assert_eq!(replace_chars(""), "");
    }

    #[test]
    fn literal_and_parameterized_tags_are_stripped() {
        let input = "<color=#ff0000>Killer</color> eliminated <b>Victim</b> <size=12>far away</size>";
        assert_eq!(
            strip_markup_tags(input, "`"),
            "`Killer` eliminated `Victim` `far away`"
        );
    }

    #[test]
    fn strip_leaves_plain_text_alone() {
        assert_eq!(strip_markup_tags("no tags here", "`"), "no tags here");
    }
}
