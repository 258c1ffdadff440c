//! Hindi numeral and arithmetic parser.
//!
//! Extracts numeric operands and an operator from free transcribed
//! text: "पांच प्लस तीन" becomes 5 + 3. The lexicon covers spelled
//! cardinals 0-100, the scale words हजार/लाख/करोड़, and the
//! transliterated English digits the recognizer tends to emit for
//! code-switched speech (वन, टू, थ्री, ...). Devanagari and ASCII
//! digit strings parse directly.

use crate::fuzzy::{contains_fuzzy, similarity_ratio};
use tracing::debug;

/// Closed numeral lexicon. Slice order matters: fuzzy lookup accepts
/// the first key whose similarity ratio exceeds the numeral threshold.
const NUMBER_WORDS: &[(&str, i64)] = &[
    ("शून्य", 0), ("जीरो", 0), ("एक", 1), ("दो", 2), ("तीन", 3),
    ("चार", 4), ("पाँच", 5), ("पांच", 5), ("छह", 6), ("चे", 6),
    ("सात", 7), ("आठ", 8), ("नौ", 9), ("दस", 10),
    ("ग्यारह", 11), ("बारह", 12), ("तेरह", 13), ("चौदह", 14), ("पंद्रह", 15),
    ("सोलह", 16), ("सत्रह", 17), ("अठारह", 18), ("उन्नीस", 19), ("बीस", 20),
    ("इक्कीस", 21), ("बाइस", 22), ("तेइस", 23), ("चौबीस", 24), ("पच्चीस", 25),
    ("छब्बीस", 26), ("सत्ताइस", 27), ("अट्ठाइस", 28), ("उनतीस", 29), ("तीस", 30),
    ("इकतीस", 31), ("बत्तीस", 32), ("तैंतीस", 33), ("चौंतीस", 34), ("पैंतीस", 35),
    ("छत्तीस", 36), ("सैंतीस", 37), ("अड़तीस", 38), ("उनतालीस", 39), ("चालीस", 40),
    ("इकतालीस", 41), ("बयालीस", 42), ("तैंतालीस", 43), ("चवालीस", 44), ("पैंतालीस", 45),
    ("छियालीस", 46), ("सैंतालीस", 47), ("अड़तालीस", 48), ("उनचास", 49), ("पचास", 50),
    ("इक्यावन", 51), ("बावन", 52), ("तिरेपन", 53), ("चौवन", 54), ("पचपन", 55),
    ("छप्पन", 56), ("सत्तावन", 57), ("अट्ठावन", 58), ("उनसठ", 59), ("साठ", 60),
    ("इकसठ", 61), ("बासठ", 62), ("तिरसठ", 63), ("चौंसठ", 64), ("पैंसठ", 65),
    ("सियासठ", 66), ("सड़सठ", 67), ("अड़सठ", 68), ("उनहत्तर", 69), ("सत्तर", 70),
    ("इकहत्तर", 71), ("बहत्तर", 72), ("तिहत्तर", 73), ("चौहत्तर", 74), ("पचहत्तर", 75),
    ("छिहत्तर", 76), ("सतहत्तर", 77), ("अठहत्तर", 78), ("उन्यासी", 79), ("अस्सी", 80),
    ("इक्यासी", 81), ("बयासी", 82), ("तिरासी", 83), ("चौरासी", 84), ("पचासी", 85),
    ("छियासी", 86), ("सत्तासी", 87), ("अट्ठासी", 88), ("नवासी", 89), ("नब्बे", 90),
    ("इक्यानवे", 91), ("बानवे", 92), ("तिरानवे", 93), ("चौरानवे", 94), ("पचानवे", 95),
    ("छियानवे", 96), ("सत्तानवे", 97), ("अट्ठानवे", 98), ("निन्यानवे", 99), ("सौ", 100),
    ("हजार", 1000), ("लाख", 100_000), ("करोड़", 10_000_000),
    ("वन", 1), ("टू", 2), ("थ्री", 3), ("फोर", 4), ("फाइव", 5),
    ("फाई", 5), ("सिक्स", 6), ("सेवन", 7), ("एट", 8), ("नाइन", 9), ("टेन", 10),
];

/// Arithmetic operation recognized in an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Sub,
    Div,
}

impl Operator {
    /// Spoken synonym sets, in detection priority order.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Operator::Add => &["प्लस", "जोड़ो", "धन"],
            Operator::Sub => &["माइनस", "घटाओ", "कम"],
            Operator::Div => &["भाग", "डिवाइड"],
        }
    }
}

/// Every operator synonym, for the safety net's math rule (the rule
/// fires on the operator words alone, operands or not).
pub const ALL_OPERATOR_WORDS: &[&str] =
    &["प्लस", "माइनस", "जोड़ो", "घटाओ", "भाग", "डिवाइड"];

/// Result of evaluating an arithmetic utterance: a spoken sentence
/// and a compact rendering for the 16x2 display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathReply {
    pub spoken: String,
    pub display: String,
}

/// Parse a token made entirely of ASCII or Devanagari digits.
fn parse_digits(token: &str) -> Option<i64> {
    if token.is_empty() {
        return None;
    }
    let mut value: i64 = 0;
    for c in token.chars() {
        let digit = match c {
            '0'..='9' => c as i64 - '0' as i64,
            '०'..='९' => c as i64 - '०' as i64,
            _ => return None,
        };
        value = value.checked_mul(10)?.checked_add(digit)?;
    }
    Some(value)
}

/// Resolve one token to an integer: digit string, exact lexicon hit,
/// or the first lexicon key above `threshold` similarity.
fn resolve_token(token: &str, threshold: f64) -> Option<i64> {
    if let Some(value) = parse_digits(token) {
        return Some(value);
    }
    if let Some(&(_, value)) = NUMBER_WORDS.iter().find(|(word, _)| *word == token) {
        return Some(value);
    }
    for (word, value) in NUMBER_WORDS {
        if similarity_ratio(token, word) > threshold {
            debug!(token, word, value, "fuzzy numeral match");
            return Some(*value);
        }
    }
    None
}

/// Collect resolved integers in token order.
pub fn resolve_numbers(text: &str, threshold: f64) -> Vec<i64> {
    text.split_whitespace()
        .filter_map(|token| resolve_token(token, threshold))
        .collect()
}

/// Detect the operator by fuzzy-testing the whole utterance against
/// each synonym set, addition before subtraction before division.
pub fn detect_operator(text: &str, threshold: f64) -> Option<Operator> {
    [Operator::Add, Operator::Sub, Operator::Div]
        .into_iter()
        .find(|op| contains_fuzzy(text, op.synonyms(), threshold))
}

/// Evaluate an arithmetic utterance.
///
/// Returns `None` when fewer than two operands resolve, no operator is
/// found, or the result does not fit in `i64` - the caller treats all
/// of these as a non-math utterance. Only the first two operands
/// count. Division by zero yields a canned warning pair instead of a
/// computed result.
pub fn evaluate(text: &str, numeral_threshold: f64, operator_threshold: f64) -> Option<MathReply> {
    let nums = resolve_numbers(text, numeral_threshold);
    if nums.len() < 2 {
        return None;
    }
    let op = detect_operator(text, operator_threshold)?;
    let (a, b) = (nums[0], nums[1]);

    let reply = match op {
        Operator::Add => {
            let sum = a.checked_add(b)?;
            MathReply {
                spoken: format!("{} plus {} hota hai {}", a, b, sum),
                display: format!("{}+{}={}", a, b, sum),
            }
        }
        Operator::Sub => {
            let diff = a.checked_sub(b)?;
            MathReply {
                spoken: format!("{} minus {} hota hai {}", a, b, diff),
                display: format!("{}-{}={}", a, b, diff),
            }
        }
        Operator::Div => {
            if b == 0 {
                return Some(MathReply {
                    spoken: "Zero se divide nahi kar sakte.".to_string(),
                    display: "ERROR".to_string(),
                });
            }
            let quotient = a as f64 / b as f64;
            MathReply {
                spoken: format!("{} divide by {} hota hai {:.1}", a, b, quotient),
                display: format!("{}/{}={:.1}", a, b, quotient),
            }
        }
    };
    Some(reply)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NUMERAL: f64 = 0.85;
    const OPERATOR: f64 = 0.6;

    #[test]
    fn test_addition() {
        let reply = evaluate("पांच प्लस तीन", NUMERAL, OPERATOR).unwrap();
        assert_eq!(reply.display, "5+3=8");
        assert_eq!(reply.spoken, "5 plus 3 hota hai 8");
    }

    #[test]
    fn test_subtraction() {
        let reply = evaluate("बीस घटाओ चार", NUMERAL, OPERATOR).unwrap();
        assert_eq!(reply.display, "20-4=16");
    }

    #[test]
    fn test_division_one_decimal() {
        let reply = evaluate("नौ भाग दो", NUMERAL, OPERATOR).unwrap();
        assert_eq!(reply.display, "9/2=4.5");
        assert_eq!(reply.spoken, "9 divide by 2 hota hai 4.5");
    }

    #[test]
    fn test_division_by_zero() {
        let reply = evaluate("दस भाग शून्य", NUMERAL, OPERATOR).unwrap();
        assert_eq!(reply.display, "ERROR");
        assert_eq!(reply.spoken, "Zero se divide nahi kar sakte.");
    }

    #[test]
    fn test_digit_tokens() {
        let reply = evaluate("12 प्लस 30", NUMERAL, OPERATOR).unwrap();
        assert_eq!(reply.display, "12+30=42");
    }

    #[test]
    fn test_devanagari_digit_tokens() {
        assert_eq!(parse_digits("१५"), Some(15));
        let reply = evaluate("१५ माइनस ५", NUMERAL, OPERATOR).unwrap();
        assert_eq!(reply.display, "15-5=10");
    }

    #[test]
    fn test_fuzzy_numeral_token() {
        // "पाच" is a common recognizer output for पांच; ratio 6/7 > 0.85.
        assert_eq!(resolve_token("पाच", NUMERAL), Some(5));
    }

    #[test]
    fn test_operands_beyond_second_ignored() {
        let reply = evaluate("दो प्लस तीन चार", NUMERAL, OPERATOR).unwrap();
        assert_eq!(reply.display, "2+3=5");
    }

    #[test]
    fn test_overflowing_sum_is_not_math() {
        // i64::MAX plus one has no representable result; treated like
        // an unparseable utterance instead of panicking.
        assert_eq!(
            evaluate("9223372036854775807 प्लस 1", NUMERAL, OPERATOR),
            None
        );
    }

    #[test]
    fn test_single_operand_is_not_math() {
        assert_eq!(evaluate("पांच प्लस", NUMERAL, OPERATOR), None);
    }

    #[test]
    fn test_no_operator_is_not_math() {
        assert_eq!(evaluate("पांच तीन", NUMERAL, OPERATOR), None);
    }

    #[test]
    fn test_operator_priority_addition_first() {
        // Both plus and minus words present: addition wins.
        assert_eq!(
            detect_operator("पांच प्लस तीन माइनस", OPERATOR),
            Some(Operator::Add)
        );
    }

    #[test]
    fn test_deterministic() {
        let first = evaluate("सात जोड़ो आठ", NUMERAL, OPERATOR);
        let second = evaluate("सात जोड़ो आठ", NUMERAL, OPERATOR);
        assert_eq!(first, second);
        assert_eq!(first.unwrap().display, "7+8=15");
    }
}
