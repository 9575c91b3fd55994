use std::num::NonZeroUsize;

/// Splits a fully known reply into fixed-size pieces for a typing effect.
///
/// Chunk sizes count characters, not bytes. Iterating is lazy and can be
/// repeated; the chunks always concatenate back to the original text.
#[derive(Debug, Clone, Copy)]
pub struct TextStreamer<'a> {
    text: &'a str,
    chunk_size: NonZeroUsize,
}

impl<'a> TextStreamer<'a> {
    pub fn new(text: &'a str, chunk_size: NonZeroUsize) -> Self {
        Self { text, chunk_size }
    }

    pub fn chunks(&self) -> Chunks<'a> {
        Chunks {
            rest: self.text,
            chunk_size: self.chunk_size.get(),
        }
    }
}

impl<'a> IntoIterator for &TextStreamer<'a> {
    type Item = &'a str;
    type IntoIter = Chunks<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.chunks()
    }
}

#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    rest: &'a str,
    chunk_size: usize,
}

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        let end = self
            .rest
            .char_indices()
            .nth(self.chunk_size)
            .map(|(i, _)| i)
            .unwrap_or(self.rest.len());
        let (chunk, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn splits_into_fixed_size_chunks() {
        let streamer = TextStreamer::new("HelloWorld", size(5));
        let chunks: Vec<&str> = streamer.chunks().collect();
        assert_eq!(chunks, ["Hello", "World"]);
    }

    #[test]
    fn last_chunk_may_be_short() {
        let chunks: Vec<&str> = TextStreamer::new("abcdefg", size(3)).chunks().collect();
        assert_eq!(chunks, ["abc", "def", "g"]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert_eq!(TextStreamer::new("", size(5)).chunks().count(), 0);
    }

    #[test]
    fn never_splits_a_code_point() {
        let text = "team’s — naïve";
        let chunks: Vec<&str> = TextStreamer::new(text, size(2)).chunks().collect();
        assert!(chunks.iter().all(|c| c.chars().count() <= 2));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn concatenation_is_lossless_for_any_size() {
        let text = "Thank you, and what is the expected geography of the case?\n\n- **Global**";
        for n in 1..=text.len() + 1 {
            let joined: String = TextStreamer::new(text, size(n)).chunks().collect();
            assert_eq!(joined, text, "chunk size {n}");
        }
    }

    #[test]
    fn iteration_restarts() {
        let streamer = TextStreamer::new("restartable", size(4));
        let first: Vec<&str> = (&streamer).into_iter().collect();
        let second: Vec<&str> = (&streamer).into_iter().collect();
        assert_eq!(first, second);
    }
}
