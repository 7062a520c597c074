use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::language::{Position, PrimitiveType, SymbolKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    pub returns: Option<PrimitiveType>,
    pub declared: Position,
    pub forward: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope<'i> {
    pub name: &'i str,
    symbols: HashMap<&'i str, Symbol>,
}

impl<'i> Scope<'i> {
    fn new(name: &'i str) -> Scope<'i> {
        Scope {
            name,
            symbols: HashMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols
            .get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols
            .is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeError {
    NameConflict {
        name: String,
        kind: SymbolKind,
        position: Position,
        first: Position,
    },
    DuplicateParameter {
        name: String,
        position: Position,
    },
}

impl fmt::Display for ScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopeError::NameConflict {
                name, kind, first, ..
            } => write!(
                f,
                "{} name '{}' conflicts with the symbol declared on line {}",
                kind, name, first.line
            ),
            ScopeError::DuplicateParameter { name, .. } => {
                write!(f, "duplicate parameter '{}'", name)
            }
        }
    }
}

/// The stack of scopes active while parsing. The root (global) scope is
/// always present; each procedure or function pushes a child scope whose
/// parent is the scope beneath it on the stack. Popped scopes are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeTable<'i> {
    stack: Vec<Scope<'i>>,
}

impl<'i> Default for ScopeTable<'i> {
    fn default() -> Self {
        ScopeTable::new()
    }
}

impl<'i> ScopeTable<'i> {
    pub fn new() -> ScopeTable<'i> {
        ScopeTable {
            stack: vec![Scope::new("global")],
        }
    }

    pub fn current(&self) -> &Scope<'i> {
        // the root scope is never popped
        &self.stack[self.stack.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Scope<'i> {
        let top = self.stack.len() - 1;
        &mut self.stack[top]
    }

    pub fn depth(&self) -> usize {
        self.stack
            .len()
    }

    pub fn enter(&mut self, label: &'i str) {
        self.stack
            .push(Scope::new(label));
        trace!(path = ?self.path(), "enter scope");
    }

    /// Leaving the root scope is a no-op.
    pub fn exit(&mut self) {
        if self.stack.len() > 1 {
            if let Some(scope) = self
                .stack
                .pop()
            {
                trace!(
                    scope = scope.name,
                    symbols = scope.len(),
                    path = ?self.path(),
                    "exit scope"
                );
            }
        }
    }

    /// Discard everything but a fresh root scope.
    pub fn reset(&mut self) {
        self.stack
            .clear();
        self.stack
            .push(Scope::new("global"));
    }

    /// Names of the active scopes, outermost first.
    pub fn path(&self) -> Vec<&'i str> {
        self.stack
            .iter()
            .map(|scope| scope.name)
            .collect()
    }

    /// Find a symbol in the innermost scope that declares it.
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.stack
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
    }

    pub fn declare_procedure(
        &mut self,
        name: &'i str,
        position: Position,
        forward: bool,
    ) -> Result<(), ScopeError> {
        self.declare_routine(name, SymbolKind::Procedure, None, position, forward)
    }

    pub fn declare_function(
        &mut self,
        name: &'i str,
        returns: Option<PrimitiveType>,
        position: Position,
        forward: bool,
    ) -> Result<(), ScopeError> {
        self.declare_routine(name, SymbolKind::Function, returns, position, forward)
    }

    /// Variables never complete a forward declaration, so any existing local
    /// symbol of the same name is a conflict.
    pub fn declare_variable(&mut self, name: &'i str, position: Position) -> Result<(), ScopeError> {
        self.note_shadowing(name);
        let scope = self.current_mut();

        if let Some(existing) = scope.get(name) {
            return Err(ScopeError::NameConflict {
                name: name.to_string(),
                kind: SymbolKind::Variable,
                position,
                first: existing.declared,
            });
        }

        scope
            .symbols
            .insert(
                name,
                Symbol {
                    kind: SymbolKind::Variable,
                    returns: None,
                    declared: position,
                    forward: false,
                },
            );
        Ok(())
    }

    /// Check a parameter list for repeated names. Parameters are not kept
    /// in the symbol table.
    pub fn declare_params(&self, parameters: &[(&'i str, Position)]) -> Result<(), ScopeError> {
        let mut seen = Vec::with_capacity(parameters.len());

        for &(name, position) in parameters {
            if seen.contains(&name) {
                return Err(ScopeError::DuplicateParameter {
                    name: name.to_string(),
                    position,
                });
            }
            seen.push(name);
        }
        Ok(())
    }

    /// Whether declaring this name in the current scope would hide a symbol
    /// from an enclosing one.
    pub fn shadows(&self, name: &str) -> bool {
        self.current()
            .get(name)
            .is_none()
            && self
                .lookup(name)
                .is_some()
    }

    fn note_shadowing(&self, name: &str) {
        if self.shadows(name) {
            trace!(name, path = ?self.path(), "declaration shadows an enclosing scope");
        }
    }

    fn declare_routine(
        &mut self,
        name: &'i str,
        kind: SymbolKind,
        returns: Option<PrimitiveType>,
        position: Position,
        forward: bool,
    ) -> Result<(), ScopeError> {
        self.note_shadowing(name);
        let scope = self.current_mut();

        match scope
            .symbols
            .get_mut(name)
        {
            // completing an earlier forward declaration of the same kind
            Some(existing) if existing.forward && existing.kind == kind && !forward => {
                existing.forward = false;
                existing.returns = returns;
                trace!(name, "completed forward declaration");
                Ok(())
            }
            Some(existing) => Err(ScopeError::NameConflict {
                name: name.to_string(),
                kind,
                position,
                first: existing.declared,
            }),
            None => {
                scope
                    .symbols
                    .insert(
                        name,
                        Symbol {
                            kind,
                            returns,
                            declared: position,
                            forward,
                        },
                    );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: u32) -> Position {
        Position::new(line, 1, 0)
    }

    #[test]
    fn check_stack_operations() {
        let mut table = ScopeTable::new();

        assert_eq!(table.depth(), 1);
        assert_eq!(table.current().name, "global");

        table.enter("outer");
        assert_eq!(table.current().name, "outer");

        table.enter("inner");
        assert_eq!(table.path(), vec!["global", "outer", "inner"]);

        table.exit();
        assert_eq!(table.current().name, "outer");

        table.exit();
        assert_eq!(table.current().name, "global");

        // and if we exit again, we're still in the global scope
        table.exit();
        assert_eq!(table.depth(), 1);
        assert_eq!(table.current().name, "global");

        // now we try reset()
        table.enter("one");
        table.enter("two");
        table.reset();
        assert_eq!(table.path(), vec!["global"]);
    }

    #[test]
    fn forward_declaration_round_trip() {
        let mut table = ScopeTable::new();

        assert_eq!(table.declare_procedure("P", at(1), true), Ok(()));
        assert_eq!(
            table
                .lookup("P")
                .map(|symbol| symbol.forward),
            Some(true)
        );

        assert_eq!(table.declare_procedure("P", at(2), false), Ok(()));
        assert_eq!(
            table
                .lookup("P")
                .map(|symbol| symbol.forward),
            Some(false)
        );

        assert_eq!(
            table.declare_procedure("P", at(3), false),
            Err(ScopeError::NameConflict {
                name: "P".to_string(),
                kind: SymbolKind::Procedure,
                position: at(3),
                first: at(1),
            })
        );
    }

    #[test]
    fn forward_completion_requires_same_kind() {
        let mut table = ScopeTable::new();

        table
            .declare_procedure("F", at(1), true)
            .unwrap();
        let result = table.declare_function("F", Some(PrimitiveType::Integer), at(2), false);
        assert!(matches!(result, Err(ScopeError::NameConflict { .. })));
    }

    #[test]
    fn repeated_forward_is_a_conflict() {
        let mut table = ScopeTable::new();

        table
            .declare_procedure("P", at(1), true)
            .unwrap();
        let result = table.declare_procedure("P", at(2), true);
        assert!(matches!(result, Err(ScopeError::NameConflict { .. })));
    }

    #[test]
    fn function_completion_updates_return_type() {
        let mut table = ScopeTable::new();

        table
            .declare_function("F", Some(PrimitiveType::Integer), at(1), true)
            .unwrap();
        table
            .declare_function("F", Some(PrimitiveType::Real), at(5), false)
            .unwrap();

        let symbol = table
            .lookup("F")
            .unwrap();
        assert_eq!(symbol.returns, Some(PrimitiveType::Real));
        assert!(!symbol.forward);
        assert_eq!(symbol.declared, at(1));
    }

    #[test]
    fn shadowing_in_inner_scope_is_permitted() {
        let mut table = ScopeTable::new();

        table
            .declare_procedure("P", at(1), false)
            .unwrap();
        table.enter("P");
        assert_eq!(table.declare_procedure("P", at(3), false), Ok(()));
        assert_eq!(table.declare_variable("x", at(4)), Ok(()));
        table.exit();

        table.enter("Q");
        assert!(table.shadows("P"));
        assert!(!table.shadows("y"));
        table.exit();

        // the inner scope is gone along with its symbols
        assert_eq!(table.lookup("x"), None);
        assert_eq!(table.declare_variable("x", at(6)), Ok(()));
    }

    #[test]
    fn variables_conflict_with_anything_local() {
        let mut table = ScopeTable::new();

        table
            .declare_variable("a", at(1))
            .unwrap();
        assert!(matches!(
            table.declare_variable("a", at(1)),
            Err(ScopeError::NameConflict { .. })
        ));
        assert!(matches!(
            table.declare_procedure("a", at(2), false),
            Err(ScopeError::NameConflict { .. })
        ));
    }

    #[test]
    fn duplicate_parameters() {
        let table = ScopeTable::new();

        let parameters = [
            ("a", Position::new(1, 17, 16)),
            ("b", Position::new(1, 20, 19)),
            ("a", Position::new(1, 29, 28)),
        ];

        assert_eq!(
            table.declare_params(&parameters),
            Err(ScopeError::DuplicateParameter {
                name: "a".to_string(),
                position: Position::new(1, 29, 28),
            })
        );
        assert_eq!(table.declare_params(&parameters[..2]), Ok(()));
        assert_eq!(table.declare_params(&[]), Ok(()));

        // parameters are not entered as symbols
        assert!(table
            .current()
            .is_empty());
    }
}
