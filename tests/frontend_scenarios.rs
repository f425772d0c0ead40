use std::io::Cursor;
use std::sync::Arc;

use speech_frontend::g2p::{ComposedTranslator, IcelandicRules, LexiconTranslator, RuleBasedTranslator};
use speech_frontend::ssml::SsmlParser;
use speech_frontend::{
    Alphabet, FrontendBuilder, FrontendConfig, FrontendError, LexWord, Lexicon, Phonemes,
    SsmlRequest, Transcriber, Translator, Word,
};

fn phonemes() -> Arc<Phonemes> {
    Arc::new(Phonemes::icelandic())
}

fn rule_based(phonemes: Arc<Phonemes>) -> Translator {
    let engine: Arc<dyn Transcriber> = Arc::new(IcelandicRules::new());
    Translator::RuleBased(RuleBasedTranslator::new(
        [("is-IS".to_string(), engine)],
        false,
        phonemes,
    ))
}

fn single_entry(phonemes: &Arc<Phonemes>, grapheme: &str, phone: &str) -> Translator {
    let lexicon = Lexicon::new("is-IS", Alphabet::XSampa, phonemes.clone()).expect("lexicon");
    lexicon.insert(LexWord::new(grapheme, [phone]));
    Translator::Lexicon(LexiconTranslator::new([Arc::new(lexicon)], phonemes.clone()))
}

#[test]
fn rule_based_transcribes_kleprar() {
    let translator = rule_based(phonemes());
    let phones = translator
        .translate("kleprar", "is-IS", &[], Alphabet::Ipa)
        .unwrap();
    assert_eq!(phones, ["kʰ", "l", "ɛː", "p", "r", "a", "r"]);
}

#[test]
fn xsampa_string_aligns_to_ipa() {
    let phonemes = Phonemes::icelandic();
    assert_eq!(phonemes.align_ipa_from_xsampa("tO:a:D").unwrap(), "t ɔː aː ð");
}

#[test]
fn tab_in_phone_string_is_alignment_error() {
    let phonemes = Phonemes::icelandic();
    let err = phonemes.align_ipa_from_xsampa("t O: a: D\t").unwrap_err();
    assert!(matches!(err, FrontendError::Alignment { .. }));
}

#[test]
fn ssml_text_keeps_annotated_words() {
    let phonemes = Phonemes::icelandic();
    let parser = SsmlParser::parse(
        &phonemes,
        "<speak>Halló <phoneme alphabet='x-sampa' ph='a'>aa</phoneme></speak>",
    )
    .unwrap();
    assert_eq!(parser.get_text().unwrap(), "Halló aa");
}

#[test]
fn unclosed_root_is_validation_error() {
    let phonemes = Phonemes::icelandic();
    let err = SsmlParser::parse(&phonemes, "<speak>")
        .and_then(|parser| parser.get_text())
        .unwrap_err();
    assert!(matches!(err, FrontendError::Validation { .. }));
}

#[test]
fn unmatched_closing_tags_are_rejected() {
    let phonemes = Phonemes::icelandic();
    for markup in [
        "<speak>a</prosody></speak>",
        "<speak><prosody rate='slow'>a</speak></prosody>",
        "<speak>a</speak></speak>",
    ] {
        let result = SsmlParser::parse(&phonemes, markup).and_then(|p| p.get_text());
        assert!(
            matches!(result, Err(FrontendError::Validation { .. })),
            "{markup} should be rejected"
        );
    }
    for markup in [
        "<speak>a</speak>",
        "<speak><prosody rate='slow'><sub alias='b'>c</sub></prosody></speak>",
    ] {
        assert!(SsmlParser::parse(&phonemes, markup).is_ok(), "{markup} should parse");
    }
}

#[test]
fn ipa_lexicon_answers_in_xsampa() {
    let lexicon = Lexicon::from_reader(
        Cursor::new("pöbb pʰ œ p\n"),
        "is-IS",
        Alphabet::Ipa,
        phonemes(),
    )
    .unwrap();
    assert_eq!(lexicon.get_xsampa("pöbb").unwrap(), ["p_h", "9", "p"]);
}

#[test]
fn composed_chain_prefers_earlier_translator() {
    let phonemes = phonemes();
    let first_then_second = ComposedTranslator::new(vec![
        single_entry(&phonemes, "foo", "x"),
        single_entry(&phonemes, "foo", "G"),
    ])
    .unwrap();
    let second_then_first = ComposedTranslator::new(vec![
        single_entry(&phonemes, "foo", "G"),
        single_entry(&phonemes, "foo", "x"),
    ])
    .unwrap();
    assert_eq!(
        first_then_second.translate("foo", "is-IS", &[], Alphabet::XSampa).unwrap(),
        ["x"]
    );
    assert_eq!(
        second_then_first.translate("foo", "is-IS", &[], Alphabet::XSampa).unwrap(),
        ["G"]
    );
}

#[test]
fn word_spans_and_whitespace_cover_plain_input() {
    let frontend = FrontendBuilder::new(FrontendConfig::default()).build().unwrap();
    let text = "Ég á 2 ketti.  Þeir heita\tMjá og Kló!";
    let words: Vec<Word> = frontend
        .normalize(text, &SsmlRequest::plain(Alphabet::Ipa))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    let mut cursor = 0;
    let mut covered = 0;
    for word in words.iter().filter(|w| !w.is_separator()) {
        assert!(word.start_byte_offset >= cursor, "{word:?} overlaps");
        assert!(text[cursor..word.start_byte_offset].trim().is_empty());
        covered += word.start_byte_offset - cursor;
        covered += word.end_byte_offset - word.start_byte_offset;
        assert_eq!(&text[word.start_byte_offset..word.end_byte_offset], word.original_symbol);
        cursor = word.end_byte_offset;
    }
    covered += text.len() - cursor;
    assert!(text[cursor..].trim().is_empty());
    assert_eq!(covered, text.len());
}

#[test]
fn full_pipeline_over_ssml() {
    let frontend = FrontendBuilder::new(FrontendConfig::default()).build().unwrap();
    let markup = "<speak>Takk. <prosody rate='slow'>Bók</prosody></speak>";
    let words: Vec<Word> = frontend
        .process(markup, &SsmlRequest::ssml(Alphabet::XSampa))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    let non_separators: Vec<&Word> = words.iter().filter(|w| !w.is_separator()).collect();
    assert_eq!(non_separators[0].original_symbol, "Takk");
    assert_eq!(non_separators[0].phone_sequence, ["t_h", "a", "h", "k"]);
    let book = non_separators.last().unwrap();
    assert_eq!(&markup[book.start_byte_offset..book.end_byte_offset], "Bók");
    assert_eq!(book.phone_sequence, ["p", "ou:", "k"]);
    assert!(words.iter().any(Word::is_separator));
}
