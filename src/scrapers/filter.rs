/// Title fragments that mark room-shares and single-room lets
const UNWANTED_KEYWORDS: [&str; 6] = [
    "hybel",
    "rom i bofellesskap",
    "bofellesskap",
    // common misspelling used in many ads
    "bofelleskap",
    "ledig rom",
    "rom i bofelleskap",
];

/// True when the title looks like a room-share or a single room rather than a whole unit
pub fn is_unwanted(title: &str) -> bool {
    let title = title.to_lowercase();
    UNWANTED_KEYWORDS
        .iter()
        .any(|keyword| title.contains(keyword))
}
