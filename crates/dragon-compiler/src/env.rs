use std::collections::HashMap;
use std::rc::Rc;

use crate::ast::Id;
use crate::intern::Symbol;
use crate::types::Type;

/// Chain of lexical scopes, innermost last.
///
/// Storage offsets come from a single counter that keeps growing across the
/// whole compilation; leaving a block does not give its storage back.
#[derive(Debug, Default)]
pub struct Env {
    scopes: Vec<HashMap<Symbol, Id>>,
    used: u32,
}

impl Env {
    pub fn new() -> Self { Self::default() }

    pub fn enter(&mut self) { self.scopes.push(HashMap::new()); }

    pub fn exit(&mut self) { self.scopes.pop(); }

    pub fn depth(&self) -> usize { self.scopes.len() }

    /// Binds `sym` in the innermost scope at the next free offset. A second
    /// declaration of the same name in one scope replaces the first.
    pub fn declare(&mut self, sym: Symbol, name: Rc<str>, ty: Type) -> Id {
        let id = Id { name, offset: self.used, ty };
        self.used = self.used.saturating_add(id.ty.width());
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(sym, id.clone());
        }
        id
    }

    pub fn lookup(&self, sym: Symbol) -> Option<&Id> { self.scopes.iter().rev().find_map(|scope| scope.get(&sym)) }
}
