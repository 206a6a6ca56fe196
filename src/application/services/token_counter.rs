use std::sync::LazyLock;

use tiktoken_rs::CoreBPE;

static TOKENIZER: LazyLock<Option<CoreBPE>> = LazyLock::new(|| match tiktoken_rs::cl100k_base() {
    Ok(bpe) => Some(bpe),
    Err(e) => {
        tracing::error!(error = %e, "Failed to initialize cl100k_base tokenizer");
        None
    }
});

/// cl100k token count, falling back to a chars/4 estimate if the tokenizer is unavailable.
pub fn count_tokens(text: &str) -> usize {
    match TOKENIZER.as_ref() {
        Some(bpe) => bpe.encode_with_special_tokens(text).len(),
        None => text.chars().count().div_ceil(4),
    }
}
