//! Icelandic letter-to-sound rules.
//!
//! Words are cut into grapheme units (digraphs first, longest match), then
//! each unit is rewritten from its neighbours. Output is IPA.

use crate::g2p::TranslationFailure;
use crate::pipeline::traits::Transcriber;
use crate::types::PhoneSeq;

const DIGRAPHS: &[&str] = &[
    "au", "ei", "ey", "ll", "nn", "pp", "tt", "kk", "gg", "bb", "dd", "ff", "mm", "ss", "rr",
    "ng", "nk",
];

const VOWELS: &[&str] = &[
    "a", "á", "e", "é", "i", "í", "o", "ó", "u", "ú", "y", "ý", "æ", "ö", "au", "ei", "ey",
];

/// Units that palatalize a preceding velar.
const FRONT: &[&str] = &["e", "é", "i", "í", "y", "ý", "æ", "ei", "ey", "j"];

#[derive(Debug, Clone, Copy, Default)]
pub struct IcelandicRules;

impl IcelandicRules {
    pub fn new() -> Self {
        Self
    }
}

impl Transcriber for IcelandicRules {
    fn transcribe(&self, word: &str) -> Result<PhoneSeq, TranslationFailure> {
        let lower = word.to_lowercase();
        let units = grapheme_units(&lower);
        let mut out: Vec<&'static str> = Vec::new();
        let mut stressed_seen = false;

        for (i, unit) in units.iter().copied().enumerate() {
            let prev = i.checked_sub(1).map(|p| units[p]);
            let next = units.get(i + 1).copied();

            if is_vowel(unit) {
                if unit == "é" {
                    out.push("j");
                }
                let quality = vowel_quality(unit, next);
                let long = !stressed_seen && is_long(&units[i + 1..]);
                stressed_seen = true;
                out.push(if long { lengthen(quality) } else { quality });
                continue;
            }
            out.extend(consonant(unit, prev, next, i == 0));
        }

        if out.is_empty() {
            return Err(TranslationFailure::Unpronounceable(word.to_string()));
        }
        Ok(out.into_iter().map(str::to_string).collect())
    }
}

fn grapheme_units(word: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut pos = 0;
    while pos < word.len() {
        let rest = &word[pos..];
        let len = if pos == 0 && rest.starts_with("hv") {
            2
        } else if let Some(d) = DIGRAPHS.iter().find(|d| rest.starts_with(**d)) {
            d.len()
        } else {
            rest.chars().next().map_or(1, char::len_utf8)
        };
        units.push(&rest[..len]);
        pos += len;
    }
    units
}

fn is_vowel(unit: &str) -> bool {
    VOWELS.contains(&unit)
}

fn is_front(unit: Option<&str>) -> bool {
    unit.is_some_and(|u| FRONT.contains(&u))
}

fn vowel_quality(unit: &str, next: Option<&str>) -> &'static str {
    if matches!(next, Some("ng" | "nk")) {
        match unit {
            "a" => return "au",
            "e" => return "ei",
            "i" | "y" => return "i",
            "o" => return "ou",
            "u" => return "u",
            "ö" => return "œy",
            _ => {}
        }
    }
    match unit {
        "a" => "a",
        "á" => "au",
        "e" | "é" => "ɛ",
        "i" | "y" => "ɪ",
        "í" | "ý" => "i",
        "o" => "ɔ",
        "ó" => "ou",
        "u" => "ʏ",
        "ú" => "u",
        "æ" => "ai",
        "ö" => "œ",
        "au" => "œy",
        _ => "ei",
    }
}

fn lengthen(vowel: &'static str) -> &'static str {
    match vowel {
        "a" => "aː",
        "ai" => "aiː",
        "au" => "auː",
        "ei" => "eiː",
        "ɛ" => "ɛː",
        "i" => "iː",
        "ɪ" => "ɪː",
        "ɔ" => "ɔː",
        "ou" => "ouː",
        "œ" => "œː",
        "œy" => "œyː",
        "u" => "uː",
        "ʏ" => "ʏː",
        other => other,
    }
}

fn consonant_weight(unit: &str) -> usize {
    // doubled letters, ng, nk and hv are the only two-byte ASCII units
    if (unit.len() == 2 && unit.is_ascii()) || unit == "x" {
        2
    } else {
        1
    }
}

/// Stressed vowel length from the consonants that follow it.
fn is_long(following: &[&str]) -> bool {
    let cluster: Vec<&str> = following
        .iter()
        .copied()
        .take_while(|u| !is_vowel(u))
        .collect();
    let weight: usize = cluster.iter().map(|u| consonant_weight(u)).sum();
    if weight <= 1 {
        return true;
    }
    matches!(
        cluster.as_slice(),
        [first, second, ..]
            if matches!(*first, "p" | "t" | "k" | "s") && matches!(*second, "j" | "v" | "r")
    )
}

fn consonant(unit: &str, prev: Option<&str>, next: Option<&str>, initial: bool) -> Vec<&'static str> {
    let front = is_front(next);
    let between_vowels = prev.is_some_and(is_vowel) && next.map_or(true, is_vowel);
    let velar = |aspirated: bool| match (front, aspirated) {
        (true, true) => "cʰ",
        (true, false) => "c",
        (false, true) => "kʰ",
        (false, false) => "k",
    };

    match unit {
        "p" => vec![if initial { "pʰ" } else { "p" }],
        "t" => vec![if initial { "tʰ" } else { "t" }],
        "k" => vec![velar(initial)],
        "b" | "bb" => vec!["p"],
        "d" | "dd" => vec!["t"],
        "g" if !initial && between_vowels => vec!["ɣ"],
        "g" | "gg" => vec![velar(false)],
        "pp" => vec!["h", "p"],
        "tt" => vec!["h", "t"],
        "kk" => vec!["h", velar(false)],
        "ll" => vec!["t", "l"],
        "ng" => vec!["ŋ", "k"],
        "nk" => vec!["ŋ̊", "k"],
        "hv" => vec!["kʰ", "v"],
        "f" if initial => vec!["f"],
        "f" if matches!(next, Some("l" | "n" | "ll" | "nn")) => vec!["p"],
        "f" if between_vowels => vec!["v"],
        "f" | "ff" => vec!["f"],
        "x" => vec!["k", "s"],
        "þ" => vec!["θ"],
        "ð" => vec!["ð"],
        "z" | "s" | "ss" => vec!["s"],
        "c" | "q" => vec!["k"],
        "w" | "v" => vec!["v"],
        "nn" | "n" => vec!["n"],
        "mm" | "m" => vec!["m"],
        "rr" | "r" => vec!["r"],
        "h" => vec!["h"],
        "j" => vec!["j"],
        "l" => vec!["l"],
        _ => Vec::new(),
    }
}
