//! # Markov oracle
//!
//! An order-k symbol model over the instruction alphabet: count tables
//! with shorter-context backoff and greedy argmax decoding. Deliberately
//! shallow - the capability contract treats the model as an opaque
//! predict-next-token box, and this is the smallest deterministic box
//! that exercises all of it.
//!
//! Training and generation share one async mutex over the model state,
//! so a background retraining loop and a queue refill holding the same
//! instance are serialized rather than interleaved.

use super::{OracleError, SequenceOracle, SymbolChunk, SymbolStream, CONTEXT_LENGTH};
use crate::opcode::{Op, ALPHABET, VOCAB_SIZE};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Configuration for the Markov oracle
#[derive(Debug, Clone, Copy)]
pub struct MarkovConfig {
    /// Longest context considered when predicting the next symbol
    pub order: usize,
    /// Context window the seed is padded/truncated to
    pub context_length: usize,
}

impl Default for MarkovConfig {
    fn default() -> Self {
        Self {
            order: 3,
            context_length: CONTEXT_LENGTH,
        }
    }
}

/// Count tables for contexts of every length up to the model order.
///
/// Cloneable so streaming generation can work from a consistent snapshot
/// without holding the model lock across yields.
#[derive(Debug, Clone, Default)]
struct ModelTable {
    /// Context window (token indices) -> next-token counts
    counts: HashMap<Vec<u8>, [u64; VOCAB_SIZE]>,
    /// Fallback when no context matches
    unigram: [u64; VOCAB_SIZE],
}

impl ModelTable {
    fn fit(tokens: &[u8], order: usize) -> Self {
        let mut table = Self::default();
        for &t in tokens {
            table.unigram[t as usize] += 1;
        }
        for k in 1..=order {
            for window in tokens.windows(k + 1) {
                let (context, next) = window.split_at(k);
                table.counts.entry(context.to_vec()).or_default()[next[0] as usize] += 1;
            }
        }
        table
    }

    /// Predict the next token for a context: longest matching suffix
    /// wins, backing off to shorter suffixes and finally the unigram
    /// distribution. Ties break toward the lowest token index so
    /// generation is fully deterministic.
    fn predict(&self, context: &[u8], order: usize) -> Option<u8> {
        let longest = order.min(context.len());
        for k in (1..=longest).rev() {
            let suffix = &context[context.len() - k..];
            if let Some(counts) = self.counts.get(suffix) {
                if let Some(token) = argmax(counts) {
                    return Some(token);
                }
            }
        }
        argmax(&self.unigram)
    }
}

fn argmax(counts: &[u64; VOCAB_SIZE]) -> Option<u8> {
    let mut best: Option<(u8, u64)> = None;
    for (i, &c) in counts.iter().enumerate() {
        if c > 0 && best.map_or(true, |(_, b)| c > b) {
            best = Some((i as u8, c));
        }
    }
    best.map(|(i, _)| i)
}

#[derive(Debug, Default)]
struct ModelState {
    table: ModelTable,
    /// Completed warm-up rounds
    rounds: u64,
    /// Symbols seen in the last fit
    trained_symbols: usize,
}

/// The concrete oracle used in play: deterministic, in-process, cheap to
/// refit.
#[derive(Debug)]
pub struct MarkovOracle {
    config: MarkovConfig,
    state: Mutex<ModelState>,
    ready: AtomicBool,
}

impl Default for MarkovOracle {
    fn default() -> Self {
        Self::new(MarkovConfig::default())
    }
}

impl MarkovOracle {
    /// Create an untrained oracle
    pub fn new(config: MarkovConfig) -> Self {
        Self {
            config,
            state: Mutex::new(ModelState::default()),
            ready: AtomicBool::new(false),
        }
    }

    /// Completed warm-up rounds so far
    pub async fn rounds(&self) -> u64 {
        self.state.lock().await.rounds
    }

    /// Seed text -> fixed-width context of token indices, left-padded
    /// with the first vocabulary symbol (the original pads seeds with
    /// `>` to the context window).
    fn context_from_seed(&self, seed: &str) -> Vec<u8> {
        let tokens: Vec<u8> = tokenize(seed);
        let width = self.config.context_length;
        let mut context = vec![0u8; width.saturating_sub(tokens.len())];
        let keep = tokens.len().saturating_sub(width);
        context.extend_from_slice(&tokens[keep..]);
        context
    }

    fn push_context(&self, context: &mut Vec<u8>, token: u8) {
        if context.len() >= self.config.context_length {
            context.remove(0);
        }
        context.push(token);
    }
}

/// Corpus text -> token indices, dropping everything outside the alphabet
fn tokenize(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(Op::from_char)
        .map(|op| op.token_index() as u8)
        .collect()
}

impl SequenceOracle for MarkovOracle {
    fn name(&self) -> &str {
        "markov"
    }

    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    async fn warm_up(&self, corpus: &[String]) -> Result<(), OracleError> {
        let mut tokens = Vec::new();
        for text in corpus {
            tokens.extend(tokenize(text));
        }
        if tokens.is_empty() {
            return Err(OracleError::EmptyCorpus);
        }

        let table = ModelTable::fit(&tokens, self.config.order);

        let mut state = self.state.lock().await;
        state.table = table;
        state.rounds += 1;
        state.trained_symbols = tokens.len();
        drop(state);

        self.ready.store(true, Ordering::Release);
        Ok(())
    }

    async fn extend(&self, seed: &str, count: usize) -> Result<String, OracleError> {
        if !self.is_ready() {
            return Err(OracleError::NotReady);
        }

        let state = self.state.lock().await;
        let mut context = self.context_from_seed(seed);
        let mut symbols = String::with_capacity(count);
        for _ in 0..count {
            let token = state
                .table
                .predict(&context, self.config.order)
                .ok_or_else(|| OracleError::Generation("model table is empty".to_string()))?;
            symbols.push(ALPHABET[token as usize]);
            self.push_context(&mut context, token);
        }
        Ok(symbols)
    }

    async fn stream(&self, seed: &str, count: usize) -> Result<SymbolStream, OracleError> {
        if !self.is_ready() {
            return Err(OracleError::NotReady);
        }

        // Snapshot the table so the stream yields from a consistent
        // model even if a refit lands mid-generation.
        let table = self.state.lock().await.table.clone();
        let mut context = self.context_from_seed(seed);
        let order = self.config.order;
        let context_length = self.config.context_length;

        Ok(SymbolStream::new(async_stream::stream! {
            for _ in 0..count {
                match table.predict(&context, order) {
                    Some(token) => {
                        if context.len() >= context_length {
                            context.remove(0);
                        }
                        context.push(token);
                        yield SymbolChunk::Symbol(ALPHABET[token as usize]);
                    }
                    None => {
                        yield SymbolChunk::Error("model table is empty".to_string());
                        return;
                    }
                }
            }
            yield SymbolChunk::Done;
        }))
    }
}
