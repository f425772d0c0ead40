use std::io::{BufWriter, Read, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use speech_frontend::{Alphabet, FrontendBuilder, FrontendConfig, SsmlRequest};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum AlphabetChoice {
    Ipa,
    #[value(name = "x-sampa")]
    XSampa,
    #[value(name = "x-sampa+syll+stress")]
    XSampaWithStress,
}

impl From<AlphabetChoice> for Alphabet {
    fn from(choice: AlphabetChoice) -> Self {
        match choice {
            AlphabetChoice::Ipa => Alphabet::Ipa,
            AlphabetChoice::XSampa => Alphabet::XSampa,
            AlphabetChoice::XSampaWithStress => Alphabet::XSampaWithStress,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "g2p_frontend")]
#[command(about = "Normalize text or SSML and print phone-annotated words as JSON lines")]
struct Args {
    #[arg(long, env = "G2P_FRONTEND_CONFIG")]
    config: Option<PathBuf>,
    /// Overrides the configured default language.
    #[arg(long, env = "G2P_FRONTEND_LANG")]
    lang: Option<String>,
    /// Fallback language, may be repeated. Replaces the configured list.
    #[arg(long = "failure-lang")]
    failure_langs: Vec<String>,
    #[arg(
        long,
        env = "G2P_FRONTEND_ALPHABET",
        value_enum,
        default_value_t = AlphabetChoice::Ipa
    )]
    alphabet: AlphabetChoice,
    /// Treat the input as SSML markup.
    #[arg(long, default_value_t = false)]
    ssml: bool,
    /// Input text; read from stdin when absent.
    text: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("g2p_frontend: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = Args::parse();

    let config = match args.config.as_ref() {
        Some(path) => FrontendConfig::load(path).map_err(|e| e.to_string())?,
        None => FrontendConfig::default(),
    };
    let lang = args
        .lang
        .clone()
        .unwrap_or_else(|| config.default_language.clone());
    let failure_langs = if args.failure_langs.is_empty() {
        config.failure_languages.clone()
    } else {
        args.failure_langs.clone()
    };
    let frontend = FrontendBuilder::new(config)
        .build()
        .map_err(|e| e.to_string())?;

    let text = match args.text {
        Some(text) => text,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read stdin: {e}"))?;
            buf
        }
    };
    let request = SsmlRequest {
        process_as_ssml: args.ssml,
        alphabet: args.alphabet.into(),
    };

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for word in frontend
        .process_in(&text, &lang, &failure_langs, &request)
        .map_err(|e| e.to_string())?
    {
        let word = word.map_err(|e| e.to_string())?;
        serde_json::to_writer(&mut out, &word).map_err(|e| e.to_string())?;
        writeln!(out).map_err(|e| format!("failed to write output: {e}"))?;
    }
    out.flush()
        .map_err(|e| format!("failed to write output: {e}"))?;

    let phonemes = frontend.phonemes();
    tracing::debug!(
        ipa = ?phonemes.ipa_aligner().hit_counts(),
        xsampa = ?phonemes.xsampa_aligner().hit_counts(),
        "g2p_frontend: aligner phone hits"
    );
    Ok(())
}
