//! `{...}` spans: literal phone strings embedded in text.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Token(&'a str),
    Phones(String),
}

/// Splits `text` on whitespace, gathering brace-delimited spans into
/// [`Segment::Phones`]. A span may cover several whitespace-separated pieces
/// and ends at its closing brace; text glued after the brace is segmented
/// again. An unclosed span runs to the end of the text.
pub(crate) fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut open: Option<Vec<&str>> = None;

    for mut piece in text.split_whitespace() {
        while !piece.is_empty() {
            match open.take() {
                None => match piece.strip_prefix('{') {
                    Some(rest) => {
                        open = Some(Vec::new());
                        piece = rest;
                    }
                    None => {
                        out.push(Segment::Token(piece));
                        piece = "";
                    }
                },
                Some(mut parts) => match piece.split_once('}') {
                    Some((last, rest)) => {
                        parts.push(last);
                        out.push(Segment::Phones(join_nonempty(&parts)));
                        piece = rest;
                    }
                    None => {
                        parts.push(piece);
                        open = Some(parts);
                        piece = "";
                    }
                },
            }
        }
    }

    if let Some(parts) = open {
        tracing::debug!(text, "embedded phones: unclosed brace, taking rest of text");
        out.push(Segment::Phones(join_nonempty(&parts)));
    }
    out
}

fn join_nonempty(parts: &[&str]) -> String {
    parts
        .iter()
        .filter(|p| !p.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
}
