//! Methods, classes and the whole subject program

use super::stmt::{sub_signature, LocalId, MethodId, MethodRef, Stmt, StmtId};
use super::types::Type;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Declared local variable
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Local {
    pub name: String,
    pub ty: Type,
}

impl Local {
    /// Compiler-introduced stack temporaries are named `$…`
    pub fn is_temporary(&self) -> bool {
        self.name.starts_with('$')
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub is_static: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Method {
    pub id: MethodId,
    pub class_name: String,
    pub name: String,
    pub params: Vec<Type>,
    pub ret: Type,
    pub is_static: bool,
    pub is_native: bool,
    pub is_abstract: bool,
    /// Declared as an analysis entry point
    pub is_entry: bool,
    pub locals: Vec<Local>,
    pub body: Vec<Stmt>,
    /// Bytecode offset of each statement, when the front end recorded them
    pub bytecode_offsets: Vec<Option<u32>>,
}

impl Method {
    /// JVM-style signature `<Class: name(Desc)Ret>`
    pub fn signature(&self) -> String {
        format!("<{}: {}>", self.class_name, self.sub_signature())
    }

    pub fn sub_signature(&self) -> String {
        sub_signature(&self.name, &self.params, &self.ret)
    }

    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }

    pub fn is_static_initializer(&self) -> bool {
        self.name == "<clinit>"
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.body[id.index()]
    }

    pub fn stmt_ids(&self) -> impl DoubleEndedIterator<Item = StmtId> + '_ {
        (0..self.body.len() as u32).map(StmtId)
    }

    pub fn local(&self, id: LocalId) -> &Local {
        &self.locals[id.index()]
    }

    pub fn local_ids(&self) -> impl Iterator<Item = LocalId> + '_ {
        (0..self.locals.len() as u32).map(LocalId)
    }

    pub fn local_by_name(&self, name: &str) -> Option<LocalId> {
        self.locals
            .iter()
            .position(|l| l.name == name)
            .map(|i| LocalId(i as u32))
    }

    /// Position of `local` among the non-temporary locals
    pub fn slot_of(&self, local: LocalId) -> Option<u32> {
        if self.local(local).is_temporary() {
            return None;
        }
        let slot = self.locals[..local.index()]
            .iter()
            .filter(|l| !l.is_temporary())
            .count();
        Some(slot as u32)
    }

    pub fn offset_of(&self, stmt: StmtId) -> Option<u32> {
        self.bytecode_offsets.get(stmt.index()).copied().flatten()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub superclass: Option<String>,
    /// Library classes are never analyzed or classified
    pub is_library: bool,
    pub fields: Vec<Field>,
    pub methods: Vec<MethodId>,
}

/// The whole subject program
///
/// Methods are stored flat and addressed by `MethodId`; classes keep the
/// declaration order of their methods.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub classes: Vec<Class>,
    pub methods: Vec<Method>,
    class_index: FxHashMap<String, usize>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, class: Class) {
        self.class_index
            .insert(class.name.clone(), self.classes.len());
        self.classes.push(class);
    }

    /// Add a method to an already-added class; returns its id
    pub fn add_method(&mut self, mut method: Method) -> MethodId {
        let id = MethodId(self.methods.len() as u32);
        method.id = id;
        if let Some(&ci) = self.class_index.get(&method.class_name) {
            self.classes[ci].methods.push(id);
        }
        self.methods.push(method);
        id
    }

    pub fn method(&self, id: MethodId) -> &Method {
        &self.methods[id.index()]
    }

    pub fn method_ids(&self) -> impl Iterator<Item = MethodId> + '_ {
        (0..self.methods.len() as u32).map(MethodId)
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.class_index.get(name).map(|&i| &self.classes[i])
    }

    pub fn class_of(&self, method: MethodId) -> Option<&Class> {
        self.class(&self.method(method).class_name)
    }

    /// Method declared directly in `class` with the given name and descriptor
    pub fn declared_method(&self, class: &str, sub_signature: &str) -> Option<MethodId> {
        self.class(class)?
            .methods
            .iter()
            .copied()
            .find(|&m| self.method(m).sub_signature() == sub_signature)
    }

    /// Resolve a method reference by walking up the superclass chain
    pub fn resolve(&self, mref: &MethodRef) -> Option<MethodId> {
        let sub = mref.sub_signature();
        let mut current = Some(mref.class.as_str());
        while let Some(name) = current {
            if let Some(m) = self.declared_method(name, &sub) {
                return Some(m);
            }
            current = self.class(name)?.superclass.as_deref();
        }
        None
    }

    /// Whether `class` equals `ancestor` or transitively extends it
    pub fn is_subclass_of(&self, class: &str, ancestor: &str) -> bool {
        let mut current = Some(class);
        while let Some(name) = current {
            if name == ancestor {
                return true;
            }
            current = self.class(name).and_then(|c| c.superclass.as_deref());
        }
        false
    }

    pub fn method_by_signature(&self, signature: &str) -> Option<MethodId> {
        self.methods
            .iter()
            .find(|m| m.signature() == signature)
            .map(|m| m.id)
    }

    pub fn is_library_method(&self, method: MethodId) -> bool {
        self.class_of(method).map_or(true, |c| c.is_library)
    }
}
