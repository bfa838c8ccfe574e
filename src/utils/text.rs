use regex::Regex;
use std::sync::LazyLock;

/// Splits `text` into chunks of at most `max_len` characters, breaking on
/// sentence boundaries first and on whitespace inside sentences that are too
/// long on their own.
///
/// A single word longer than `max_len` is never cut; it is emitted as its own
/// oversized chunk and left for the speech service to accept or reject.
pub fn split_text_into_chunks(text: &str, max_len: usize) -> Vec<String> {
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    if char_len(text) <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        if char_len(sentence) > max_len {
            flush(&mut chunks, &mut current);

            let mut word_chunk = String::new();
            for word in sentence.split_whitespace() {
                if !word_chunk.is_empty() && joined_len(&word_chunk, word) > max_len {
                    flush(&mut chunks, &mut word_chunk);
                }
                append(&mut word_chunk, word);
            }
            // The packed tail keeps accumulating following sentences.
            current = word_chunk;
        } else {
            if !current.is_empty() && joined_len(&current, sentence) > max_len {
                flush(&mut chunks, &mut current);
            }
            append(&mut current, sentence);
        }
    }

    flush(&mut chunks, &mut current);
    chunks
}

/// Sentence terminator plus the whitespace run that follows it.
static SENTENCE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// The terminator stays with its sentence and the whitespace run is dropped.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;

    for m in SENTENCE_BREAK.find_iter(text) {
        // Terminators are single-byte ASCII.
        sentences.push(&text[start..m.start() + 1]);
        start = m.end();
    }

    if start < text.len() {
        sentences.push(&text[start..]);
    }
    sentences
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn joined_len(current: &str, next: &str) -> usize {
    char_len(current) + 1 + char_len(next)
}

fn append(buf: &mut String, piece: &str) {
    if !buf.is_empty() {
        buf.push(' ');
    }
    buf.push_str(piece);
}

fn flush(chunks: &mut Vec<String>, buf: &mut String) {
    let trimmed = buf.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
    buf.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prose(target_len: usize) -> String {
        let sentence = "The quick brown fox jumps over the lazy dog near the river bank. ";
        sentence.repeat(target_len / sentence.len() + 1)[..target_len].to_string()
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = split_text_into_chunks("  Hello there. How are you?  ", 100);
        assert_eq!(chunks, vec!["Hello there. How are you?".to_string()]);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        assert!(split_text_into_chunks("", 10).is_empty());
        assert!(split_text_into_chunks("   \n\t ", 10).is_empty());
    }

    #[test]
    fn test_sentence_boundaries_respected() {
        let text = "One two three. Four five six! Seven eight nine? Ten.";
        let chunks = split_text_into_chunks(text, 30);
        assert_eq!(
            chunks,
            vec![
                "One two three. Four five six!".to_string(),
                "Seven eight nine? Ten.".to_string(),
            ]
        );
    }

    #[test]
    fn test_five_thousand_chars_of_prose() {
        let text = prose(5000);
        let chunks = split_text_into_chunks(&text, 4096);

        assert!(chunks.len() >= 2);
        assert!(chunks.iter().all(|c| c.chars().count() <= 4096));
        assert!(!chunks.last().unwrap().is_empty());
    }

    #[test]
    fn test_rejoined_chunks_preserve_content() {
        let text = "[Host]: Welcome back.\n\n[Guest]: Thanks for having me!  It is great. \
                    Really?   Yes, really.";
        let chunks = split_text_into_chunks(text, 25);

        assert!(chunks.iter().all(|c| c.chars().count() <= 25));
        let rejoined = chunks.join(" ");
        let normalize = |s: &str| s.split_whitespace().collect::<Vec<_>>().join(" ");
        assert_eq!(normalize(&rejoined), normalize(text));
    }

    #[test]
    fn test_long_sentence_split_on_words() {
        let text = "alpha beta gamma delta epsilon zeta eta theta iota kappa. Short one.";
        let chunks = split_text_into_chunks(text, 20);

        assert_eq!(
            chunks,
            vec![
                "alpha beta gamma".to_string(),
                "delta epsilon zeta".to_string(),
                "eta theta iota".to_string(),
                "kappa. Short one.".to_string(),
            ]
        );
    }

    #[test]
    fn test_oversized_word_emitted_whole() {
        let long_word = "x".repeat(30);
        let text = format!("Tiny start here. {} tail words.", long_word);
        let chunks = split_text_into_chunks(&text, 12);

        assert!(chunks.contains(&long_word));
        let oversized: Vec<_> = chunks.iter().filter(|c| c.chars().count() > 12).collect();
        assert_eq!(oversized, vec![&long_word]);
    }

    #[test]
    fn test_multibyte_text_counts_chars() {
        let text = "Ça va? Très bien. Merci beaucoup!";
        let chunks = split_text_into_chunks(text, 18);
        assert!(chunks.iter().all(|c| c.chars().count() <= 18));
        assert_eq!(chunks[0], "Ça va? Très bien.");
    }

    #[test]
    fn test_split_sentences_keeps_terminator() {
        assert_eq!(
            split_sentences("Hi. There!  Done?x Yes"),
            vec!["Hi.", "There!", "Done?x Yes"]
        );
        assert_eq!(split_sentences("Wait... what?\n\nNo."), vec!["Wait...", "what?", "No."]);
        assert_eq!(split_sentences("No break at end."), vec!["No break at end."]);
    }
}
