//! Devanagari spell-out for name responses.
//!
//! When the assistant says a learned name back, it also spells it in
//! Latin letters so the user can confirm what was actually stored
//! ("राम" -> "RAM"). Consonants carry their inherent vowel mapping,
//! matras attach to the preceding chunk, virama is dropped.

/// Letter-by-letter transliteration chunks, uppercased for display.
const DEVANAGARI_LATIN: &[(char, &str)] = &[
    ('अ', "A"), ('आ', "AA"), ('इ', "I"), ('ई', "EE"), ('उ', "U"),
    ('ऊ', "OO"), ('ए', "E"), ('ऐ', "AI"), ('ओ', "O"), ('औ', "AU"),
    ('क', "K"), ('ख', "KH"), ('ग', "G"), ('घ', "GH"), ('च', "CH"),
    ('छ', "CHH"), ('ज', "J"), ('झ', "JH"), ('ट', "T"), ('ठ', "TH"),
    ('ड', "D"), ('ढ', "DH"), ('ण', "N"), ('त', "T"), ('थ', "TH"),
    ('द', "D"), ('ध', "DH"), ('न', "N"), ('प', "P"), ('फ', "F"),
    ('ब', "B"), ('भ', "BH"), ('म', "M"), ('य', "Y"), ('र', "R"),
    ('ल', "L"), ('व', "V"), ('श', "SH"), ('ष', "SH"), ('स', "S"),
    ('ह', "H"),
    ('ा', "A"), ('ि', "I"), ('ी', "EE"), ('ु', "U"), ('ू', "OO"),
    ('े', "E"), ('ै', "AI"), ('ो', "O"), ('ौ', "AU"),
    ('्', ""), ('ं', "N"), ('ः', "H"),
];

fn latin_chunk(c: char) -> Option<&'static str> {
    DEVANAGARI_LATIN
        .iter()
        .find(|(dev, _)| *dev == c)
        .map(|(_, latin)| *latin)
}

/// Spell `text` out in uppercase Latin letters. Characters outside the
/// table pass through uppercased if alphanumeric and are dropped
/// otherwise (spaces, punctuation).
pub fn spell_out(text: &str) -> String {
    let mut out = String::new();
    for c in text.chars() {
        if let Some(chunk) = latin_chunk(c) {
            out.push_str(chunk);
        } else if c.is_alphanumeric() {
            out.extend(c.to_uppercase());
        }
    }
    out
}
