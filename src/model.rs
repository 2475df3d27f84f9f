//! Prediction by Partial Matching context model.
//!
//! The model keeps a tree of contexts. A context at depth `k` stands for the
//! `k` most recent symbols and counts which symbols followed them. Coding a
//! symbol starts at the deepest context matching the current history and
//! walks towards the root, emitting the escape symbol at every context that
//! has never seen the symbol. If even the root (order 0) escapes, the symbol
//! is coded against a flat order −1 table over the whole alphabet.
//!
//! Contexts live in an arena and refer to their children by [`ContextId`].
//! Children are created lazily the first time a history reaches them, with
//! the escape symbol seeded at frequency 1 so that a fresh context can always
//! pass control to the next lower order.
//!
//! Encoder and decoder must call [`PpmModel::encode_symbol`] /
//! [`PpmModel::decode_symbol`] and [`PpmModel::increment_contexts`] with the
//! same histories in the same order, or the streams diverge.

use std::io::{Read, Write};

use crate::coder::{Decoder, Encoder};
use crate::frequency::{FlatFrequencyTable, FrequencyTable, FrequencyTableMut, SimpleFrequencyTable};
use crate::{Error, Result};

/// Index of a context in the model's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(u32);

impl ContextId {
    /// Position of the context in creation order; the root is 0.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of the context tree.
#[derive(Debug, Clone)]
pub struct Context {
    frequencies: SimpleFrequencyTable,
    children: Option<Box<[Option<ContextId>]>>,
    depth: u32,
}

impl Context {
    fn new(symbol_limit: usize, has_children: bool, depth: u32) -> Result<Self> {
        Ok(Self {
            frequencies: SimpleFrequencyTable::zeroed(symbol_limit)?,
            children: has_children.then(|| vec![None; symbol_limit].into_boxed_slice()),
            depth,
        })
    }

    /// Symbol counts observed in this context, escape included.
    pub fn frequencies(&self) -> &SimpleFrequencyTable {
        &self.frequencies
    }

    /// The child extending this context by `symbol`, if it exists yet.
    pub fn child(&self, symbol: usize) -> Option<ContextId> {
        self.children.as_ref()?.get(symbol).copied().flatten()
    }

    /// Whether this context sits below the model order and can have children.
    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }

    /// Number of history symbols this context conditions on.
    pub fn depth(&self) -> u32 {
        self.depth
    }
}

/// An adaptive PPM model over the alphabet `0..symbol_limit`.
#[derive(Debug, Clone)]
pub struct PpmModel {
    order: i32,
    symbol_limit: usize,
    escape_symbol: usize,
    // contexts[0] is the root when order >= 0.
    contexts: Vec<Context>,
    order_minus1: FlatFrequencyTable,
}

impl PpmModel {
    /// Creates an empty model.
    ///
    /// With `order == -1` no contexts are ever created and every symbol is
    /// coded against the flat fallback table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `order < -1`, `symbol_limit == 0`
    /// or `escape_symbol >= symbol_limit`.
    pub fn new(order: i32, symbol_limit: usize, escape_symbol: usize) -> Result<Self> {
        if order < -1 {
            return Err(Error::InvalidConfig(format!(
                "model order {} must be at least -1",
                order
            )));
        }
        if symbol_limit == 0 {
            return Err(Error::InvalidConfig(
                "symbol limit must be positive".into(),
            ));
        }
        if escape_symbol >= symbol_limit {
            return Err(Error::InvalidConfig(format!(
                "escape symbol {} out of range [0-{})",
                escape_symbol, symbol_limit
            )));
        }

        let mut contexts = Vec::new();
        if order >= 0 {
            let mut root = Context::new(symbol_limit, order >= 1, 0)?;
            root.frequencies.increment(escape_symbol)?;
            contexts.push(root);
        }
        Ok(Self {
            order,
            symbol_limit,
            escape_symbol,
            contexts,
            order_minus1: FlatFrequencyTable::new(symbol_limit)?,
        })
    }

    /// Maximum context depth; −1 disables context tracking.
    pub fn order(&self) -> i32 {
        self.order
    }

    /// Size of the alphabet, escape symbol included.
    pub fn symbol_limit(&self) -> usize {
        self.symbol_limit
    }

    /// The reserved symbol meaning "consult the next lower order".
    pub fn escape_symbol(&self) -> usize {
        self.escape_symbol
    }

    /// Longest history the model accepts.
    pub fn max_history(&self) -> usize {
        self.order.max(0) as usize
    }

    /// The order −1 table, in which every symbol has frequency 1.
    pub fn order_minus1(&self) -> &FlatFrequencyTable {
        &self.order_minus1
    }

    /// The order 0 context, absent when the order is −1.
    pub fn root(&self) -> Option<ContextId> {
        (!self.contexts.is_empty()).then_some(ContextId(0))
    }

    /// Returns the context for `id`.
    pub fn context(&self, id: ContextId) -> &Context {
        &self.contexts[id.index()]
    }

    /// Number of contexts created so far, root included.
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Depth of the deepest context created so far, or `None` for order −1.
    pub fn max_depth(&self) -> Option<u32> {
        self.contexts.iter().map(Context::depth).max()
    }

    /// Follows `path` (most recent symbol first) down from the root.
    ///
    /// Returns `None` as soon as a required child has not been created.
    pub fn lookup_path(&self, path: &[usize]) -> Option<ContextId> {
        let mut id = self.root()?;
        for &symbol in path {
            id = self.context(id).child(symbol)?;
        }
        Some(id)
    }

    fn check_history(&self, history: &[usize]) -> Result<()> {
        if history.len() > self.max_history() {
            return Err(Error::InvalidArgument(format!(
                "history of {} symbols exceeds model order {}",
                history.len(),
                self.order
            )));
        }
        self.check_symbols(history)
    }

    fn check_symbols(&self, symbols: &[usize]) -> Result<()> {
        match symbols.iter().find(|&&s| s >= self.symbol_limit) {
            Some(&s) => Err(Error::InvalidArgument(format!(
                "symbol {} out of range [0-{})",
                s, self.symbol_limit
            ))),
            None => Ok(()),
        }
    }

    /// Encodes `symbol` given `history`, escaping down the orders as needed.
    ///
    /// The escape symbol itself is never coded directly in a context: passing
    /// it here escapes all the way to the order −1 table, which is how the
    /// driver marks the end of the stream.
    pub fn encode_symbol<W: Write>(
        &self,
        history: &[usize],
        symbol: usize,
        encoder: &mut Encoder<W>,
    ) -> Result<()> {
        self.check_history(history)?;
        self.check_symbols(&[symbol])?;
        for order in (0..=history.len()).rev() {
            let Some(id) = self.lookup_path(&history[..order]) else {
                continue;
            };
            let table = &self.context(id).frequencies;
            if symbol != self.escape_symbol && table.get(symbol)? > 0 {
                return encoder.write(table, symbol);
            }
            encoder.write(table, self.escape_symbol)?;
        }
        encoder.write(&self.order_minus1, symbol)
    }

    /// Decodes the next symbol given `history`.
    ///
    /// Returns the escape symbol only when it was decoded from the order −1
    /// table.
    pub fn decode_symbol<R: Read>(
        &self,
        history: &[usize],
        decoder: &mut Decoder<R>,
    ) -> Result<usize> {
        self.check_history(history)?;
        for order in (0..=history.len()).rev() {
            let Some(id) = self.lookup_path(&history[..order]) else {
                continue;
            };
            let symbol = decoder.read(&self.context(id).frequencies)?;
            if symbol != self.escape_symbol {
                return Ok(symbol);
            }
        }
        decoder.read(&self.order_minus1)
    }

    /// Records that `symbol` followed `history`.
    ///
    /// Increments `symbol` in the root and in every context along `history`,
    /// creating missing contexts on the way. Does nothing at order −1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `history` is longer than the
    /// model order or contains, like `symbol`, an out-of-range value. The
    /// model is unchanged in that case.
    pub fn increment_contexts(&mut self, history: &[usize], symbol: usize) -> Result<()> {
        if self.order == -1 {
            return Ok(());
        }
        self.check_history(history)?;
        self.check_symbols(&[symbol])?;

        let mut id = ContextId(0);
        self.contexts[0].frequencies.increment(symbol)?;
        for (i, &sym) in history.iter().enumerate() {
            let child = match self.context(id).child(sym) {
                Some(child) => child,
                None => self.create_child(id, sym, i + 1)?,
            };
            self.contexts[child.index()].frequencies.increment(symbol)?;
            id = child;
        }
        Ok(())
    }

    fn create_child(&mut self, parent: ContextId, symbol: usize, depth: usize) -> Result<ContextId> {
        let id = u32::try_from(self.contexts.len())
            .map(ContextId)
            .map_err(|_| Error::ResourceLimitExceeded("context arena is full".into()))?;
        let has_children = (depth as i32) < self.order;
        let mut context = Context::new(self.symbol_limit, has_children, depth as u32)?;
        context.frequencies.increment(self.escape_symbol)?;

        let slots = self.contexts[parent.index()]
            .children
            .as_mut()
            .ok_or_else(|| {
                Error::InvariantViolation(format!(
                    "context at depth {} cannot have children",
                    depth - 1
                ))
            })?;
        slots[symbol] = Some(id);
        self.contexts.push(context);
        log::trace!("created order-{} context {} via symbol {}", depth, id.0, symbol);
        Ok(id)
    }
}
