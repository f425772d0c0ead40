//! Icelandic number words.

/// Largest value [`spell_cardinal`] writes out in words.
pub const MAX_CARDINAL: u32 = 999_999;

const DIGITS: [&str; 10] = [
    "núll", "einn", "tveir", "þrír", "fjórir", "fimm", "sex", "sjö", "átta", "níu",
];

const TEENS: [&str; 10] = [
    "tíu", "ellefu", "tólf", "þrettán", "fjórtán", "fimmtán", "sextán", "sautján", "átján",
    "nítján",
];

const TENS: [&str; 10] = [
    "", "", "tuttugu", "þrjátíu", "fjörutíu", "fimmtíu", "sextíu", "sjötíu", "áttatíu",
    "níutíu",
];

/// 1 to 4 agree in gender with the noun they count.
fn unit(n: u32, neuter: bool) -> &'static str {
    match (n, neuter) {
        (1, true) => "eitt",
        (2, true) => "tvö",
        (3, true) => "þrjú",
        (4, true) => "fjögur",
        _ => DIGITS[n as usize],
    }
}

/// Phrases of `n` (< 1000) before "og" is placed.
fn group_atoms(n: u32, neuter: bool, atoms: &mut Vec<String>) {
    let hundreds = n / 100;
    let rest = n % 100;
    match hundreds {
        0 => {}
        1 => atoms.push("hundrað".to_string()),
        h => atoms.push(format!("{} hundruð", unit(h, true))),
    }
    match rest {
        0 => {}
        1..=9 => atoms.push(unit(rest, neuter).to_string()),
        10..=19 => atoms.push(TEENS[(rest - 10) as usize].to_string()),
        _ => {
            atoms.push(TENS[(rest / 10) as usize].to_string());
            if rest % 10 != 0 {
                atoms.push(unit(rest % 10, neuter).to_string());
            }
        }
    }
}

fn join_with_og(atoms: Vec<String>) -> String {
    match atoms.split_last() {
        Some((last, init)) if !init.is_empty() => format!("{} og {}", init.join(" "), last),
        _ => atoms.join(" "),
    }
}

/// Masculine cardinal for `n`, or `None` above [`MAX_CARDINAL`].
///
/// "og" joins the last element: 123 is "hundrað tuttugu og þrír".
pub fn spell_cardinal(n: u32) -> Option<String> {
    if n > MAX_CARDINAL {
        return None;
    }
    if n == 0 {
        return Some(DIGITS[0].to_string());
    }
    let mut atoms = Vec::new();
    match n / 1000 {
        0 => {}
        1 => atoms.push("þúsund".to_string()),
        thousands => {
            let mut count = Vec::new();
            group_atoms(thousands, true, &mut count);
            atoms.push(format!("{} þúsund", join_with_og(count)));
        }
    }
    group_atoms(n % 1000, false, &mut atoms);
    Some(join_with_og(atoms))
}

/// Name of one ASCII digit.
pub fn digit_name(digit: char) -> Option<&'static str> {
    digit.to_digit(10).map(|d| DIGITS[d as usize])
}

/// Reads each digit of `token` on its own; runs of other characters are kept.
pub fn spell_digits(token: &str) -> String {
    let mut words: Vec<String> = Vec::new();
    let mut run = String::new();
    for c in token.chars() {
        match digit_name(c) {
            Some(name) => {
                if !run.is_empty() {
                    words.push(std::mem::take(&mut run));
                }
                words.push(name.to_string());
            }
            None => run.push(c),
        }
    }
    if !run.is_empty() {
        words.push(run);
    }
    words.join(" ")
}

/// Reads a digit-only token: as a cardinal when it fits, else digit by digit.
///
/// Leading zeros mean the token is a code rather than a quantity.
pub fn normalize_number(digits: &str) -> String {
    let as_cardinal = !(digits.len() > 1 && digits.starts_with('0'));
    digits
        .parse::<u32>()
        .ok()
        .filter(|_| as_cardinal)
        .and_then(spell_cardinal)
        .unwrap_or_else(|| spell_digits(digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers() {
        assert_eq!(spell_cardinal(0).unwrap(), "núll");
        assert_eq!(spell_cardinal(3).unwrap(), "þrír");
        assert_eq!(spell_cardinal(13).unwrap(), "þrettán");
        assert_eq!(spell_cardinal(40).unwrap(), "fjörutíu");
    }

    #[test]
    fn og_precedes_last_element() {
        assert_eq!(spell_cardinal(21).unwrap(), "tuttugu og einn");
        assert_eq!(spell_cardinal(120).unwrap(), "hundrað og tuttugu");
        assert_eq!(spell_cardinal(123).unwrap(), "hundrað tuttugu og þrír");
        assert_eq!(spell_cardinal(1100).unwrap(), "þúsund og hundrað");
        assert_eq!(
            spell_cardinal(1234).unwrap(),
            "þúsund tvö hundruð þrjátíu og fjórir"
        );
    }

    #[test]
    fn counted_hundreds_and_thousands_are_neuter() {
        assert_eq!(spell_cardinal(300).unwrap(), "þrjú hundruð");
        assert_eq!(spell_cardinal(2000).unwrap(), "tvö þúsund");
        assert_eq!(spell_cardinal(21_000).unwrap(), "tuttugu og eitt þúsund");
        assert_eq!(
            spell_cardinal(999_999).unwrap(),
            "níu hundruð níutíu og níu þúsund níu hundruð níutíu og níu"
        );
        assert!(spell_cardinal(1_000_000).is_none());
    }

    #[test]
    fn digits_read_one_by_one() {
        assert_eq!(spell_digits("112"), "einn einn tveir");
        assert_eq!(spell_digits("A4"), "A fjórir");
        assert_eq!(spell_digits("abc"), "abc");
    }

    #[test]
    fn normalize_number_falls_back_to_digits() {
        assert_eq!(normalize_number("42"), "fjörutíu og tveir");
        assert_eq!(normalize_number("007"), "núll núll sjö");
        assert_eq!(normalize_number("1234567"), "einn tveir þrír fjórir fimm sex sjö");
    }
}
