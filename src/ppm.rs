//! Prediction by partial matching (PPM) context-tree model.
//!
//! A context is a node in a trie keyed by recently seen symbols; each one
//! holds the distribution of symbols observed after that particular
//! history suffix. The model only maintains the tree; walking it and
//! feeding the right table to the arithmetic coder, escape by escape, is
//! the stream driver's job, and must follow the same schedule on the
//! encoding and decoding sides.

use crate::error::{Error, Result};
use crate::frequency::{FlatFrequencyTable, FrequencyTable, SimpleFrequencyTable};

/// A node in the context trie.
///
/// Owns its frequency table and, for depths strictly below the model
/// order, a lazily filled vector of child slots. Children are uniquely
/// owned; dropping the root releases the whole tree.
#[derive(Debug)]
pub struct Context {
    frequencies: SimpleFrequencyTable,
    children: Option<Vec<Option<Box<Context>>>>,
}

impl Context {
    fn new(symbol_limit: u32, escape_symbol: u32, has_children: bool) -> Result<Self> {
        let mut frequencies = SimpleFrequencyTable::new(vec![0; symbol_limit as usize])?;
        // Seed one escape count so the escape is always encodable here.
        frequencies.increment(escape_symbol)?;
        let children = if has_children {
            let mut slots = Vec::with_capacity(symbol_limit as usize);
            slots.resize_with(symbol_limit as usize, || None);
            Some(slots)
        } else {
            None
        };
        Ok(Self {
            frequencies,
            children,
        })
    }

    /// The symbol distribution observed in this context.
    pub fn frequencies(&self) -> &SimpleFrequencyTable {
        &self.frequencies
    }

    /// The child context reached by the given symbol, or `None` if that
    /// slot has never been populated. Fails if this context is at the
    /// maximum depth and has no child slots at all.
    pub fn child(&self, symbol: u32) -> Result<Option<&Context>> {
        let children = self
            .children
            .as_ref()
            .ok_or(Error::Logic("context has no child slots"))?;
        let slot = children
            .get(symbol as usize)
            .ok_or(Error::SymbolOutOfRange {
                symbol,
                limit: children.len() as u32,
            })?;
        Ok(slot.as_deref())
    }
}

/// An adaptive variable-order model over `symbol_limit` symbols.
///
/// `model_order >= 0` allocates a root context; order −1 degenerates to
/// the unconditional flat distribution. The escape symbol must be below
/// the symbol limit and is given one count in every freshly allocated
/// context.
#[derive(Debug)]
pub struct PpmModel {
    model_order: i32,
    symbol_limit: u32,
    escape_symbol: u32,
    root: Option<Context>,
    order_minus1_freqs: FlatFrequencyTable,
}

impl PpmModel {
    /// Create an empty model.
    pub fn new(model_order: i32, symbol_limit: u32, escape_symbol: u32) -> Result<Self> {
        if model_order < -1 {
            return Err(Error::InvalidOrder(model_order));
        }
        if escape_symbol >= symbol_limit {
            return Err(Error::SymbolOutOfRange {
                symbol: escape_symbol,
                limit: symbol_limit,
            });
        }
        let root = if model_order >= 0 {
            Some(Context::new(symbol_limit, escape_symbol, model_order >= 1)?)
        } else {
            None
        };
        Ok(Self {
            model_order,
            symbol_limit,
            escape_symbol,
            root,
            order_minus1_freqs: FlatFrequencyTable::new(symbol_limit)?,
        })
    }

    /// The model order this model was built with.
    pub fn model_order(&self) -> i32 {
        self.model_order
    }

    /// The number of symbols, escape included.
    pub fn symbol_limit(&self) -> u32 {
        self.symbol_limit
    }

    /// The distinguished escape symbol.
    pub fn escape_symbol(&self) -> u32 {
        self.escape_symbol
    }

    /// The root context, absent for order −1.
    pub fn root(&self) -> Option<&Context> {
        self.root.as_ref()
    }

    /// The order-(−1) table, where every symbol is always representable.
    pub fn order_minus1_freqs(&self) -> &FlatFrequencyTable {
        &self.order_minus1_freqs
    }

    /// Record one occurrence of `symbol` in every context along the path
    /// from the root down `history`, allocating contexts on first use.
    ///
    /// `history` is in chronological order, newest symbol last, and must
    /// not be longer than the model order. A no-op at order −1.
    pub fn increment_contexts(&mut self, history: &[u32], symbol: u32) -> Result<()> {
        if self.model_order == -1 {
            return Ok(());
        }
        if history.len() > self.model_order as usize {
            return Err(Error::HistoryTooLong {
                length: history.len(),
                order: self.model_order,
            });
        }
        if symbol >= self.symbol_limit {
            return Err(Error::SymbolOutOfRange {
                symbol,
                limit: self.symbol_limit,
            });
        }

        let symbol_limit = self.symbol_limit;
        let escape_symbol = self.escape_symbol;
        let model_order = self.model_order;
        let mut ctx = self
            .root
            .as_mut()
            .ok_or(Error::Logic("root context missing"))?;
        ctx.frequencies.increment(symbol)?;

        for (depth, &sym) in history.iter().enumerate() {
            if sym >= symbol_limit {
                return Err(Error::SymbolOutOfRange {
                    symbol: sym,
                    limit: symbol_limit,
                });
            }
            let children = ctx
                .children
                .as_mut()
                .ok_or(Error::Logic("context has no child slots"))?;
            let slot = &mut children[sym as usize];
            if slot.is_none() {
                let deeper = (depth as i32 + 1) < model_order;
                *slot = Some(Box::new(Context::new(symbol_limit, escape_symbol, deeper)?));
            }
            ctx = match slot {
                Some(child) => &mut **child,
                None => return Err(Error::Logic("child slot empty after insertion")),
            };
            ctx.frequencies.increment(symbol)?;
        }
        Ok(())
    }
}
