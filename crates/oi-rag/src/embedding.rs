//! Text embeddings for document retrieval.
//!
//! The default `HashingEmbedder` needs no model: it hashes word and
//! character-trigram features into a fixed-size vector, which is enough to
//! rank a few dozen short telemetry snippets against a question. Swap in a
//! model-backed `Embedder` without touching the index.

/// Maps text onto a dense vector. Implementations must be deterministic.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Vec<f32>;

    fn dimensions(&self) -> usize;
}

const STOPWORDS: &[&str] = &[
    "a", "an", "and", "are", "be", "can", "do", "does", "how", "i", "is", "it", "me", "my",
    "of", "on", "or", "should", "status", "severity", "the", "to", "what", "whats", "with",
    "your",
];

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Feature-hashing embedder over words and character trigrams.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dims: usize,
}

impl HashingEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims: dims.max(1) }
    }

    fn add(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let h = fnv1a(feature.as_bytes());
        let slot = (h % self.dims as u64) as usize;
        // Top bit picks the sign so colliding features tend to cancel.
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        vector[slot] += sign * weight;
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(512)
    }
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; self.dims];
        for word in tokens(text) {
            self.add(&mut vector, &word, WORD_WEIGHT);
            let padded: Vec<char> = format!("^{word}$").chars().collect();
            for tri in padded.windows(3) {
                let gram: String = tri.iter().collect();
                self.add(&mut vector, &format!("#{gram}"), TRIGRAM_WEIGHT);
            }
        }
        normalize(&mut vector);
        vector
    }

    fn dimensions(&self) -> usize {
        self.dims
    }
}

/// Lowercased alphanumeric words, stopwords removed.
fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .filter(|w| !STOPWORDS.contains(&w.as_str()))
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for b in bytes {
        hash ^= u64::from(*b);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// Scale to unit length in place. Zero vectors stay zero.
pub fn normalize(v: &mut [f32]) {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

/// Cosine similarity; zero when either side is a zero vector or lengths differ.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut na2 = 0.0f32;
    let mut nb2 = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        na2 += x * x;
        nb2 += y * y;
    }
    if na2 == 0.0 || nb2 == 0.0 {
        0.0
    } else {
        dot / (na2.sqrt() * nb2.sqrt())
    }
}
