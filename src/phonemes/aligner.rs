use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::FrontendError;
use crate::phonemes::table::{PAUSE, SYLLABLE_BOUNDARY};
use crate::types::{Alphabet, PhoneSeq};

/// Greedy longest-match segmenter over one alphabet's phone inventory.
pub struct PhoneAligner {
    alphabet: Alphabet,
    /// Phone -> number of times it was emitted by `align`.
    phones: HashMap<String, AtomicU64>,
    max_phone_chars: usize,
}

impl PhoneAligner {
    pub fn new<I, S>(alphabet: Alphabet, inventory: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let phones: HashMap<String, AtomicU64> = inventory
            .into_iter()
            .map(|p| (p.into(), AtomicU64::new(0)))
            .filter(|(p, _)| !p.is_empty())
            .collect();
        let max_phone_chars = phones.keys().map(|p| p.chars().count()).max().unwrap_or(0);
        Self {
            alphabet,
            phones,
            max_phone_chars,
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    pub fn max_phone_chars(&self) -> usize {
        self.max_phone_chars
    }

    pub fn contains(&self, phone: &str) -> bool {
        self.phones.contains_key(phone)
    }

    /// Splits `input` into inventory phones.
    ///
    /// Spaces separate independently segmented chunks; any other character
    /// (tabs included) must belong to a phone.
    pub fn align(&self, input: &str) -> Result<PhoneSeq, FrontendError> {
        let mut out = Vec::new();
        for chunk in input.split(' ').filter(|c| !c.is_empty()) {
            if chunk == PAUSE || chunk == SYLLABLE_BOUNDARY {
                out.push(chunk.to_string());
                continue;
            }
            self.align_chunk(chunk, input, &mut out)?;
        }
        Ok(out)
    }

    fn align_chunk(&self, chunk: &str, input: &str, out: &mut PhoneSeq) -> Result<(), FrontendError> {
        let bounds: Vec<usize> = chunk
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(chunk.len()))
            .collect();
        let char_len = bounds.len() - 1;

        let mut pos = 0usize;
        while pos < char_len {
            let longest = self.max_phone_chars.min(char_len - pos);
            let start = bounds[pos];
            let matched = (1..=longest).rev().find_map(|len| {
                let candidate = &chunk[start..bounds[pos + len]];
                self.phones
                    .get_key_value(candidate)
                    .map(|(phone, hits)| (len, phone, hits))
            });

            let Some((len, phone, hits)) = matched else {
                tracing::debug!(
                    alphabet = self.alphabet.as_str(),
                    input,
                    position = start,
                    "aligner: no phone matches"
                );
                return Err(FrontendError::alignment(&chunk[start..], input));
            };
            hits.fetch_add(1, Ordering::Relaxed);
            out.push(phone.clone());
            pos += len;
        }
        Ok(())
    }

    /// Snapshot of per-phone hit counters, for diagnostics.
    pub fn hit_counts(&self) -> BTreeMap<String, u64> {
        self.phones
            .iter()
            .map(|(phone, hits)| (phone.clone(), hits.load(Ordering::Relaxed)))
            .collect()
    }
}
