//! Icelandic phone inventory with its IPA and X-SAMPA spellings.

/// Short pause, spelled the same in every alphabet.
pub const PAUSE: &str = "sp";

/// Syllable boundary, spelled the same in every alphabet.
pub const SYLLABLE_BOUNDARY: &str = ".";

/// Digit appended to vowels in the stress-marked X-SAMPA alphabet.
pub const UNSTRESSED: &str = "0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneClass {
    Vowel,
    Consonant,
}

#[derive(Debug, Clone, Copy)]
pub struct PhoneEntry {
    pub ipa: &'static str,
    pub xsampa: &'static str,
    pub class: PhoneClass,
}

const fn vowel(ipa: &'static str, xsampa: &'static str) -> PhoneEntry {
    PhoneEntry {
        ipa,
        xsampa,
        class: PhoneClass::Vowel,
    }
}

const fn consonant(ipa: &'static str, xsampa: &'static str) -> PhoneEntry {
    PhoneEntry {
        ipa,
        xsampa,
        class: PhoneClass::Consonant,
    }
}

pub const ICELANDIC: &[PhoneEntry] = &[
    vowel("a", "a"),
    vowel("a\u{2d0}", "a:"),
    vowel("ai", "ai"),
    vowel("ai\u{2d0}", "ai:"),
    vowel("au", "au"),
    vowel("au\u{2d0}", "au:"),
    vowel("ei", "ei"),
    vowel("ei\u{2d0}", "ei:"),
    vowel("\u{25b}", "E"),
    vowel("\u{25b}\u{2d0}", "E:"),
    vowel("i", "i"),
    vowel("i\u{2d0}", "i:"),
    vowel("\u{26a}", "I"),
    vowel("\u{26a}\u{2d0}", "I:"),
    vowel("\u{254}", "O"),
    vowel("\u{254}\u{2d0}", "O:"),
    vowel("\u{254}i", "Oi"),
    vowel("ou", "ou"),
    vowel("ou\u{2d0}", "ou:"),
    vowel("\u{153}", "9"),
    vowel("\u{153}\u{2d0}", "9:"),
    vowel("\u{153}y", "9Y"),
    vowel("\u{153}y\u{2d0}", "9Y:"),
    vowel("u", "u"),
    vowel("u\u{2d0}", "u:"),
    vowel("\u{28f}", "Y"),
    vowel("\u{28f}\u{2d0}", "Y:"),
    vowel("\u{28f}i", "Yi"),
    consonant("c", "c"),
    consonant("c\u{2b0}", "c_h"),
    consonant("\u{e7}", "C"),
    consonant("\u{f0}", "D"),
    consonant("f", "f"),
    consonant("\u{263}", "G"),
    consonant("h", "h"),
    consonant("j", "j"),
    consonant("k", "k"),
    consonant("k\u{2b0}", "k_h"),
    consonant("l", "l"),
    consonant("l\u{325}", "l_0"),
    consonant("m", "m"),
    consonant("m\u{325}", "m_0"),
    consonant("n", "n"),
    consonant("n\u{325}", "n_0"),
    consonant("\u{272}", "J"),
    consonant("\u{272}\u{30a}", "J_0"),
    consonant("\u{14b}", "N"),
    consonant("\u{14b}\u{30a}", "N_0"),
    consonant("p", "p"),
    consonant("p\u{2b0}", "p_h"),
    consonant("r", "r"),
    consonant("r\u{325}", "r_0"),
    consonant("s", "s"),
    consonant("t", "t"),
    consonant("t\u{2b0}", "t_h"),
    consonant("v", "v"),
    consonant("x", "x"),
    consonant("\u{3b8}", "T"),
];
