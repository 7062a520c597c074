//! Canonical LR(1) collection and ACTION/GOTO tables.
//!
//! Lookaheads are not computed from FIRST sets. When closure expands a
//! nonterminal, the new items inherit the lookahead of the item that caused
//! the expansion, so starting from `$` every lookahead in the collection is
//! `$`.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;

use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::grammar::{ConflictKind, Grammar, GrammarError, END_OF_INPUT};

/// Index into the interned symbols. Terminals come first, then `$`, then
/// the nonterminals, and last the augmented start symbol.
pub type Symbol = usize;

/// An LR(1) item: a production with a dot marking progress and one
/// lookahead terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
    pub production: usize,
    pub dot: usize,
    pub lookahead: Symbol,
}

pub type ItemSet = BTreeSet<Item>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Shift(usize),
    Reduce(usize),
    Accept,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shift(state) => write!(f, "s{}", state),
            Action::Reduce(production) => write!(f, "r{}", production),
            Action::Accept => f.write_str("acc"),
        }
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A production as numbered for reduce actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Production {
    pub head: String,
    pub body: Vec<String>,
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self
            .body
            .is_empty()
        {
            write!(f, "{} → ε", self.head)
        } else {
            write!(f, "{} → {}", self.head, self.body.join(" "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tables {
    pub states: usize,
    pub action: Vec<BTreeMap<String, Action>>,
    pub goto: Vec<BTreeMap<String, usize>>,
    pub productions: Vec<Production>,
}

/// Outcome of the LR(1) check in the shape callers outside Rust expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    #[serde(rename = "isLR1")]
    pub is_lr1: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    head: Symbol,
    body: Vec<Symbol>,
}

/// A grammar with its symbols interned and the augmented production
/// `S' → S` appended after the productions of the description.
#[derive(Debug, Clone)]
pub struct Augmented<'g> {
    names: Vec<&'g str>,
    start: String,
    end: Symbol,
    rules: Vec<Rule>,
    alternatives: Vec<Vec<usize>>,
}

/// The states of the automaton in creation order along with the transitions
/// out of each one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    pub states: Vec<ItemSet>,
    pub transitions: Vec<BTreeMap<Symbol, usize>>,
}

impl<'g> Augmented<'g> {
    pub fn new(grammar: &'g Grammar) -> Result<Augmented<'g>, GrammarError> {
        let mut names: Vec<&'g str> = grammar
            .terminals
            .iter()
            .map(String::as_str)
            .collect();
        let end = names.len();
        names.push(END_OF_INPUT);
        names.extend(
            grammar
                .nonterminals
                .iter()
                .map(String::as_str),
        );

        let ids: HashMap<&str, Symbol> = names
            .iter()
            .enumerate()
            .map(|(id, name)| (*name, id))
            .collect();
        let lookup = |head: &str, name: &str| {
            ids.get(name)
                .copied()
                .ok_or_else(|| GrammarError::UnknownSymbol(head.to_string(), name.to_string()))
        };

        let mut rules: Vec<Rule> = Vec::new();
        for head in &grammar.nonterminals {
            let id = lookup(head, head)?;
            for alternative in grammar.alternatives(head) {
                let body = alternative
                    .iter()
                    .map(|name| lookup(head, name))
                    .collect::<Result<Vec<Symbol>, GrammarError>>()?;
                let rule = Rule { head: id, body };

                // a repeated alternative is the same production
                if !rules.contains(&rule) {
                    rules.push(rule);
                }
            }
        }

        let start = fresh_name(grammar);
        let augmented = names.len();
        rules.push(Rule {
            head: augmented,
            body: vec![lookup(&start, &grammar.start_symbol)?],
        });

        let mut alternatives = vec![Vec::new(); augmented + 1];
        for (index, rule) in rules
            .iter()
            .enumerate()
        {
            alternatives[rule.head].push(index);
        }

        Ok(Augmented {
            names,
            start,
            end,
            rules,
            alternatives,
        })
    }

    pub fn name(&self, symbol: Symbol) -> &str {
        match self
            .names
            .get(symbol)
        {
            Some(name) => *name,
            None => self
                .start
                .as_str(),
        }
    }

    /// The symbol id of a name, if it was declared.
    pub fn symbol(&self, name: &str) -> Option<Symbol> {
        if name == self.start {
            return Some(self.names.len());
        }
        self.names
            .iter()
            .position(|candidate| *candidate == name)
    }

    /// Terminals, including `$`, have ids up to and including the end marker.
    pub fn is_terminal(&self, symbol: Symbol) -> bool {
        symbol <= self.end
    }

    fn augmented_rule(&self) -> usize {
        self.rules
            .len()
            - 1
    }

    pub fn start_item(&self) -> Item {
        Item {
            production: self.augmented_rule(),
            dot: 0,
            lookahead: self.end,
        }
    }

    /// The symbol immediately after the dot, or None if the item is complete.
    pub fn after_dot(&self, item: Item) -> Option<Symbol> {
        self.rules[item.production]
            .body
            .get(item.dot)
            .copied()
    }

    pub fn closure(&self, mut items: ItemSet) -> ItemSet {
        let mut pending: Vec<Item> = items
            .iter()
            .copied()
            .collect();

        while let Some(item) = pending.pop() {
            let Some(next) = self.after_dot(item) else {
                continue;
            };

            // terminals have no alternatives
            for &production in &self.alternatives[next] {
                let expanded = Item {
                    production,
                    dot: 0,
                    lookahead: item.lookahead,
                };
                if items.insert(expanded) {
                    pending.push(expanded);
                }
            }
        }

        items
    }

    pub fn goto(&self, items: &ItemSet, symbol: Symbol) -> ItemSet {
        let moved = items
            .iter()
            .filter(|item| self.after_dot(**item) == Some(symbol))
            .map(|item| Item {
                dot: item.dot + 1,
                ..*item
            })
            .collect();

        self.closure(moved)
    }

    /// Build every reachable state starting from the closure of the
    /// augmented start item. States are numbered in the order they are
    /// discovered, visiting transition symbols in id order.
    pub fn collection(&self) -> Collection {
        let first = self.closure(ItemSet::from([self.start_item()]));

        let mut states = vec![first.clone()];
        let mut transitions = vec![BTreeMap::new()];
        let mut known: HashMap<ItemSet, usize> = HashMap::from([(first, 0)]);

        let mut next = 0;
        while next < states.len() {
            let symbols: BTreeSet<Symbol> = states[next]
                .iter()
                .filter_map(|item| self.after_dot(*item))
                .collect();

            for symbol in symbols {
                let target = self.goto(&states[next], symbol);
                if target.is_empty() {
                    continue;
                }

                let index = match known.get(&target) {
                    Some(&index) => index,
                    None => {
                        let index = states.len();
                        known.insert(target.clone(), index);
                        states.push(target);
                        transitions.push(BTreeMap::new());
                        index
                    }
                };
                transitions[next].insert(symbol, index);
            }

            next += 1;
        }

        trace!(states = states.len(), "canonical collection complete");

        Collection {
            states,
            transitions,
        }
    }

    fn productions(&self) -> Vec<Production> {
        self.rules[..self.augmented_rule()]
            .iter()
            .map(|rule| Production {
                head: self
                    .name(rule.head)
                    .to_string(),
                body: rule
                    .body
                    .iter()
                    .map(|symbol| {
                        self.name(*symbol)
                            .to_string()
                    })
                    .collect(),
            })
            .collect()
    }

    /// Fill in the ACTION and GOTO tables, stopping at the first cell that
    /// would need two different actions.
    pub fn tables(&self, collection: &Collection) -> Result<Tables, GrammarError> {
        let count = collection
            .states
            .len();
        let mut action: Vec<BTreeMap<String, Action>> = vec![BTreeMap::new(); count];
        let mut goto: Vec<BTreeMap<String, usize>> = vec![BTreeMap::new(); count];

        for (state, items) in collection
            .states
            .iter()
            .enumerate()
        {
            for (&symbol, &target) in &collection.transitions[state] {
                if self.is_terminal(symbol) {
                    self.write(&mut action[state], state, symbol, Action::Shift(target))?;
                } else {
                    goto[state].insert(
                        self.name(symbol)
                            .to_string(),
                        target,
                    );
                }
            }

            for item in items {
                if self
                    .after_dot(*item)
                    .is_some()
                {
                    continue;
                }

                if item.production == self.augmented_rule() {
                    self.write(&mut action[state], state, self.end, Action::Accept)?;
                } else {
                    self.write(
                        &mut action[state],
                        state,
                        item.lookahead,
                        Action::Reduce(item.production),
                    )?;
                }
            }
        }

        Ok(Tables {
            states: count,
            action,
            goto,
            productions: self.productions(),
        })
    }

    fn write(
        &self,
        row: &mut BTreeMap<String, Action>,
        state: usize,
        symbol: Symbol,
        action: Action,
    ) -> Result<(), GrammarError> {
        let name = self.name(symbol);

        match row.get(name) {
            Some(existing) if *existing != action => {
                let kind = classify(*existing, action);
                debug!(%kind, state, symbol = name, "Conflict");
                Err(GrammarError::Conflict {
                    kind,
                    state,
                    symbol: name.to_string(),
                })
            }
            Some(_) => Ok(()),
            None => {
                row.insert(name.to_string(), action);
                Ok(())
            }
        }
    }
}

fn classify(first: Action, second: Action) -> ConflictKind {
    match (first, second) {
        (Action::Shift(_), Action::Shift(_)) => ConflictKind::ShiftShift,
        (Action::Reduce(_), Action::Reduce(_)) => ConflictKind::ReduceReduce,
        (Action::Accept, _) | (_, Action::Accept) => ConflictKind::AcceptReduce,
        _ => ConflictKind::ShiftReduce,
    }
}

/// The start symbol with enough primes appended to avoid every declared
/// name.
fn fresh_name(grammar: &Grammar) -> String {
    let mut name = format!("{}'", grammar.start_symbol);
    while grammar.is_terminal(&name) || grammar.is_nonterminal(&name) {
        name.push('\'');
    }
    name
}

/// Check the grammar description and construct its LR(1) tables.
pub fn build_lr1(grammar: &Grammar) -> Result<Tables, GrammarError> {
    grammar.validate()?;

    let augmented = Augmented::new(grammar)?;
    let collection = augmented.collection();
    debug!(
        "Built {} states from {} productions",
        collection
            .states
            .len(),
        augmented.augmented_rule()
    );

    augmented.tables(&collection)
}

pub fn check_lr1(grammar: &Grammar) -> Verdict {
    match build_lr1(grammar) {
        Ok(tables) => Verdict {
            is_lr1: true,
            message: format!("built {} states", tables.states),
        },
        Err(error) => Verdict {
            is_lr1: false,
            message: error.to_string(),
        },
    }
}

#[cfg(test)]
mod check {
    use super::*;

    fn grammar(json: &str) -> Grammar {
        serde_json::from_str(json).unwrap()
    }

    fn single() -> Grammar {
        grammar(
            r#"{ "terminals": ["a"], "nonterminals": ["S"], "startSymbol": "S",
                 "productions": { "S": [["a"]] } }"#,
        )
    }

    fn expressions() -> Grammar {
        grammar(
            r#"{ "terminals": ["+", "id"], "nonterminals": ["E"], "startSymbol": "E",
                 "productions": { "E": [["E", "+", "E"], ["id"]] } }"#,
        )
    }

    #[test]
    fn single_production_tables() {
        let tables = build_lr1(&single()).unwrap();

        assert_eq!(tables.states, 3);
        assert_eq!(tables.action[0].get("a"), Some(&Action::Shift(1)));
        assert_eq!(tables.action[1].get("$"), Some(&Action::Reduce(0)));
        assert_eq!(tables.action[2].get("$"), Some(&Action::Accept));
        assert_eq!(tables.goto[0].get("S"), Some(&2));
        assert_eq!(
            tables.productions,
            vec![Production {
                head: "S".to_string(),
                body: vec!["a".to_string()]
            }]
        );
    }

    #[test]
    fn closure_is_idempotent() {
        let g = expressions();
        let augmented = Augmented::new(&g).unwrap();

        let closed = augmented.closure(ItemSet::from([augmented.start_item()]));
        assert_eq!(closed.len(), 3);
        assert_eq!(augmented.closure(closed.clone()), closed);

        for state in augmented
            .collection()
            .states
        {
            assert_eq!(augmented.closure(state.clone()), state);
        }
    }

    #[test]
    fn closure_copies_parent_lookahead() {
        let g = expressions();
        let augmented = Augmented::new(&g).unwrap();
        let end = augmented
            .symbol("$")
            .unwrap();

        let closed = augmented.closure(ItemSet::from([augmented.start_item()]));
        assert!(closed
            .iter()
            .all(|item| item.lookahead == end));
    }

    #[test]
    fn goto_on_absent_symbol_is_empty() {
        let g = single();
        let augmented = Augmented::new(&g).unwrap();
        let closed = augmented.closure(ItemSet::from([augmented.start_item()]));

        let end = augmented
            .symbol("$")
            .unwrap();
        assert!(augmented
            .goto(&closed, end)
            .is_empty());
    }

    #[test]
    fn transitions_land_on_known_states() {
        let g = expressions();
        let augmented = Augmented::new(&g).unwrap();
        let collection = augmented.collection();

        for (state, edges) in collection
            .transitions
            .iter()
            .enumerate()
        {
            for (&symbol, &target) in edges {
                assert!(target < collection.states.len());
                assert_eq!(
                    augmented.goto(&collection.states[state], symbol),
                    collection.states[target]
                );
            }
        }
    }

    #[test]
    fn construction_is_deterministic() {
        let g = expressions();

        let first = build_lr1(&g).unwrap();
        let second = build_lr1(&g).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.states, 5);
    }

    #[test]
    fn reduce_reduce_conflict() {
        let g = grammar(
            r#"{ "terminals": ["a"], "nonterminals": ["S", "A", "B"], "startSymbol": "S",
                 "productions": { "S": [["A"], ["B"]], "A": [["a"]], "B": [["a"]] } }"#,
        );

        let result = build_lr1(&g);
        assert_eq!(
            result,
            Err(GrammarError::Conflict {
                kind: ConflictKind::ReduceReduce,
                state: 1,
                symbol: "$".to_string()
            })
        );

        let verdict = check_lr1(&g);
        assert!(!verdict.is_lr1);
        assert_eq!(
            verdict.message,
            "reduce/reduce conflict in state 1 on symbol '$'"
        );
    }

    #[test]
    fn accept_reduce_conflict() {
        let g = grammar(
            r#"{ "terminals": ["a"], "nonterminals": ["S"], "startSymbol": "S",
                 "productions": { "S": [["S"], ["a"]] } }"#,
        );

        assert!(matches!(
            build_lr1(&g),
            Err(GrammarError::Conflict {
                kind: ConflictKind::AcceptReduce,
                ..
            })
        ));
    }

    #[test]
    fn repeated_alternatives_are_one_production() {
        let g = grammar(
            r#"{ "terminals": ["a"], "nonterminals": ["S"], "startSymbol": "S",
                 "productions": { "S": [["a"], ["a"]] } }"#,
        );

        let tables = build_lr1(&g).unwrap();
        assert_eq!(
            tables
                .productions
                .len(),
            1
        );
    }

    #[test]
    fn augmented_start_avoids_declared_names() {
        let g = grammar(
            r#"{ "terminals": ["S'"], "nonterminals": ["S", "S''"], "startSymbol": "S",
                 "productions": { "S": [["S'"]], "S''": [["S'"]] } }"#,
        );
        let augmented = Augmented::new(&g).unwrap();

        let start = augmented.after_dot(augmented.start_item());
        assert_eq!(start, augmented.symbol("S"));
        assert_eq!(augmented.symbol("S'''"), Some(4));
        assert!(build_lr1(&g).is_ok());
    }

    #[test]
    fn epsilon_productions_reduce_on_end() {
        let g = grammar(
            r#"{ "terminals": ["a"], "nonterminals": ["S"], "startSymbol": "S",
                 "productions": { "S": [["a", "S"], []] } }"#,
        );

        let tables = build_lr1(&g).unwrap();
        assert_eq!(tables.action[0].get("$"), Some(&Action::Reduce(1)));
        assert_eq!(tables.action[0].get("a"), Some(&Action::Shift(1)));
    }

    #[test]
    fn verdict_serializes() {
        let verdict = check_lr1(&single());
        assert_eq!(
            serde_json::to_value(&verdict).unwrap(),
            serde_json::json!({ "isLR1": true, "message": "built 3 states" })
        );
    }

    #[test]
    fn sanity_failures_come_first() {
        let g = grammar(r#"{ "terminals": [], "nonterminals": ["S"], "startSymbol": "S" }"#);
        assert_eq!(build_lr1(&g), Err(GrammarError::NoTerminals));
    }
}
