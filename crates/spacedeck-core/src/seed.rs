//! Built-in starter deck (Portuguese prompts, English answers).

use crate::model::Item;

const WORDS: &[(&str, &str, &str)] = &[
    ("w1", "casa", "house"),
    ("w2", "cachorro", "dog"),
    ("w3", "gato", "cat"),
    ("w4", "água", "water"),
    ("w5", "livro", "book"),
    ("w6", "amigo", "friend"),
    ("w7", "comida", "food"),
    ("w8", "escola", "school"),
    ("w9", "tempo", "time"),
    ("w10", "amor", "love"),
    ("w11", "sol", "sun"),
    ("w12", "lua", "moon"),
];

const SENTENCES: &[(&str, &str, &str)] = &[
    ("s1", "Eu estou aprendendo inglês", "I am learning English"),
    ("s2", "O cachorro está muito feliz", "The dog is very happy"),
    ("s3", "Ela lê um livro todos os dias", "She reads a book every day"),
    ("s4", "Nós amamos comer comida", "We love to eat food"),
    ("s5", "O sol está brilhante hoje", "The sun is bright today"),
    ("s6", "Meu amigo vai para a escola", "My friend goes to school"),
    ("s7", "O tempo voa muito rápido", "Time flies very fast"),
];

/// Words followed by sentences, all with zero-value status.
pub fn default_items() -> Vec<Item> {
    let words = WORDS
        .iter()
        .map(|(id, prompt, answer)| Item::word(*id, prompt, answer));
    let sentences = SENTENCES
        .iter()
        .map(|(id, prompt, answer)| Item::sentence(*id, prompt, answer));
    words.chain(sentences).collect()
}

/// Whether `id` belongs to the built-in deck.
pub fn is_seed_id(id: &str) -> bool {
    WORDS
        .iter()
        .chain(SENTENCES.iter())
        .any(|(seed_id, _, _)| *seed_id == id)
}
