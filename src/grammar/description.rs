use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::grammar::GrammarError;

/// Marks the end of input in lookaheads and in the ACTION table.
pub const END_OF_INPUT: &str = "$";

/// A grammar as described in JSON: the symbols, the start symbol, and for
/// each nonterminal its alternatives in order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grammar {
    #[serde(default)]
    pub terminals: Vec<String>,
    #[serde(default)]
    pub nonterminals: Vec<String>,
    #[serde(default)]
    pub start_symbol: String,
    #[serde(default)]
    pub productions: BTreeMap<String, Vec<Vec<Element>>>,
}

/// One entry in the right hand side of a production. Anything that is not
/// a string (such as an embedded semantic action) is carried along but takes
/// no part in table construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Element {
    Symbol(String),
    Action(serde_json::Value),
}

impl Element {
    pub fn symbol(&self) -> Option<&str> {
        match self {
            Element::Symbol(name) => Some(name),
            Element::Action(_) => None,
        }
    }
}

impl Grammar {
    pub fn is_terminal(&self, name: &str) -> bool {
        self.terminals
            .iter()
            .any(|terminal| terminal == name)
    }

    pub fn is_nonterminal(&self, name: &str) -> bool {
        self.nonterminals
            .iter()
            .any(|nonterminal| nonterminal == name)
    }

    /// The alternatives for a nonterminal with action elements dropped.
    pub fn alternatives(&self, head: &str) -> Vec<Vec<&str>> {
        match self
            .productions
            .get(head)
        {
            Some(alternatives) => alternatives
                .iter()
                .map(|body| {
                    body.iter()
                        .filter_map(Element::symbol)
                        .collect()
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Structural sanity check. This is cheap and stops at the first
    /// problem; it does not build any tables.
    pub fn validate(&self) -> Result<(), GrammarError> {
        if self
            .terminals
            .is_empty()
        {
            return Err(GrammarError::NoTerminals);
        }
        if self
            .nonterminals
            .is_empty()
        {
            return Err(GrammarError::NoNonterminals);
        }

        let mut terminals = HashSet::new();
        for name in &self.terminals {
            if name == END_OF_INPUT {
                return Err(GrammarError::ReservedSymbol(name.clone()));
            }
            if !terminals.insert(name.as_str()) {
                return Err(GrammarError::DuplicateTerminal(name.clone()));
            }
        }

        let mut nonterminals = HashSet::new();
        for name in &self.nonterminals {
            if name == END_OF_INPUT {
                return Err(GrammarError::ReservedSymbol(name.clone()));
            }
            if !nonterminals.insert(name.as_str()) {
                return Err(GrammarError::DuplicateNonterminal(name.clone()));
            }
            if terminals.contains(name.as_str()) {
                return Err(GrammarError::AmbiguousSymbol(name.clone()));
            }
        }

        if !nonterminals.contains(
            self.start_symbol
                .as_str(),
        ) {
            return Err(GrammarError::UnknownStartSymbol(
                self.start_symbol
                    .clone(),
            ));
        }

        for head in self
            .productions
            .keys()
        {
            if !nonterminals.contains(head.as_str()) {
                return Err(GrammarError::UnknownHead(head.clone()));
            }
        }

        for head in &self.nonterminals {
            let alternatives = self.alternatives(head);
            if alternatives.is_empty() {
                return Err(GrammarError::MissingProductions(head.clone()));
            }

            for symbol in alternatives
                .iter()
                .flatten()
            {
                if !terminals.contains(symbol) && !nonterminals.contains(symbol) {
                    return Err(GrammarError::UnknownSymbol(head.clone(), symbol.to_string()));
                }
            }
        }

        Ok(())
    }
}
