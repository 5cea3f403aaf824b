/// Splits raw document text into overlapping, sentence-aware segments.
///
/// The walk advances in windows of `chunk_size` bytes. When a window
/// boundary would land mid-sentence, the nearest preceding period is used
/// instead, but only if it lies past the midpoint of the window; breaking
/// earlier would produce pathologically tiny chunks. Consecutive windows
/// overlap by `chunk_overlap` so context is not lost at boundaries.
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            // Overlap must leave room for forward progress.
            chunk_overlap: chunk_overlap.min(chunk_size.saturating_sub(1)),
        }
    }

    /// Split text into ordered, overlapping chunks.
    ///
    /// Whitespace-only chunks are dropped. Text shorter than the chunk
    /// size comes back as a single stripped chunk; empty input yields no
    /// chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        let text_len = text.len();
        let mut chunks = Vec::new();
        let mut start = 0;

        while start < text_len {
            // Logical window end; may exceed the text and is clamped only
            // when slicing, so the overlap step stays uniform.
            let mut end = start + self.chunk_size;

            if end < text_len {
                let window_end = floor_char_boundary(text, end);
                if let Some(rel) = text[start..window_end].rfind('.') {
                    let sentence_end = start + rel;
                    // Only accept the sentence break past the window
                    // midpoint.
                    if sentence_end > start + self.chunk_size / 2 {
                        end = sentence_end + 1;
                    }
                }
            }

            let slice_end = floor_char_boundary(text, end.min(text_len));
            let chunk = text[start..slice_end].trim();
            if !chunk.is_empty() {
                chunks.push(chunk.to_string());
            }

            if end >= text_len {
                break;
            }

            let next = floor_char_boundary(text, end.saturating_sub(self.chunk_overlap));
            start = if next > start {
                next
            } else {
                // Degenerate parameters; force progress so the walk
                // terminates.
                ceil_char_boundary(text, start + 1)
            };
        }

        chunks
    }
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    idx = idx.min(text.len());
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle_text(len: usize) -> String {
        (0..len).map(|i| (b'a' + (i % 26) as u8) as char).collect()
    }

    #[test]
    fn test_short_text_single_chunk() {
        let chunker = TextChunker::new(1000, 200);
        let chunks = chunker.split("  What is a fixed deposit?  ");
        assert_eq!(chunks, vec!["What is a fixed deposit?".to_string()]);
    }

    #[test]
    fn test_empty_text_yields_no_chunks() {
        let chunker = TextChunker::new(1000, 200);
        assert!(chunker.split("").is_empty());
        assert!(chunker.split("   \n\t ").is_empty());
    }

    #[test]
    fn test_2500_chars_make_three_chunks() {
        let chunker = TextChunker::new(1000, 200);
        let text = cycle_text(2500);
        let chunks = chunker.split(&text);

        assert_eq!(chunks.len(), 3);
        for chunk in &chunks {
            assert!(chunk.len() <= 1000);
        }
        // Adjacent chunks share a 200-char overlap region.
        assert_eq!(chunks[0][800..1000], chunks[1][..200]);
        assert_eq!(chunks[1][800..1000], chunks[2][..200]);
    }

    #[test]
    fn test_deoverlapped_concatenation_reconstructs_text() {
        let chunker = TextChunker::new(1000, 200);
        let text = cycle_text(2500);
        let chunks = chunker.split(&text);

        let mut reconstructed = chunks[0].clone();
        for chunk in &chunks[1..] {
            reconstructed.push_str(&chunk[200..]);
        }
        assert_eq!(reconstructed, text);
    }

    #[test]
    fn test_breaks_at_sentence_past_midpoint() {
        let chunker = TextChunker::new(100, 20);
        let mut text = cycle_text(90);
        text.push('.');
        text.push_str(&cycle_text(60));

        let chunks = chunker.split(&text);
        assert!(chunks[0].ends_with('.'), "chunk should end at the sentence");
        assert_eq!(chunks[0].len(), 91);
    }

    #[test]
    fn test_ignores_sentence_before_midpoint() {
        let chunker = TextChunker::new(100, 20);
        let mut text = cycle_text(20);
        text.push('.');
        text.push_str(&cycle_text(140));

        let chunks = chunker.split(&text);
        // The early period is rejected; the first window stays full size.
        assert_eq!(chunks[0].len(), 100);
    }

    #[test]
    fn test_multibyte_text_does_not_panic() {
        let chunker = TextChunker::new(50, 10);
        let text = "ब्याज दर और सावधि जमा. ".repeat(40);
        let chunks = chunker.split(&text);
        assert!(!chunks.is_empty());
        for chunk in chunks {
            assert!(!chunk.is_empty());
        }
    }

    #[test]
    fn test_degenerate_overlap_still_terminates() {
        let chunker = TextChunker::new(10, 100);
        let chunks = chunker.split(&cycle_text(55));
        assert!(!chunks.is_empty());
    }
}
