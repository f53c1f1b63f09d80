use std::collections::HashMap;
use std::rc::Rc;

/// Handle to an interned identifier. Two symbols are equal exactly when
/// their spellings are.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Symbol(u32);

#[derive(Debug, Default)]
pub struct Interner {
    by_name: HashMap<Rc<str>, Symbol>,
    names: Vec<Rc<str>>,
}

impl Interner {
    pub fn new() -> Self { Self::default() }

    pub fn intern(&mut self, name: &str) -> Symbol {
        if let Some(&sym) = self.by_name.get(name) {
            return sym;
        }
        let sym = Symbol(self.names.len() as u32);
        let name: Rc<str> = Rc::from(name);
        self.names.push(Rc::clone(&name));
        self.by_name.insert(name, sym);
        sym
    }

    pub fn resolve(&self, sym: Symbol) -> &str { &self.names[sym.0 as usize] }

    /// Shared spelling, handed to declared variables so they can print
    /// themselves without going back to the interner.
    pub fn name(&self, sym: Symbol) -> Rc<str> { Rc::clone(&self.names[sym.0 as usize]) }

    pub fn len(&self) -> usize { self.names.len() }

    pub fn is_empty(&self) -> bool { self.names.is_empty() }
}
