//! Three-address statements
//!
//! Every operand of an expression is an `Immediate` (a local or a constant),
//! so array bases and indices are syntactically restricted to the shapes the
//! analysis stages reason about. Nested expressions never appear.

use super::types::{Constant, Type};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a method in `Program::methods`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MethodId(pub u32);

/// Index of a local in `Method::locals`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LocalId(pub u32);

/// Position of a statement in `Method::body`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StmtId(pub u32);

impl MethodId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl LocalId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl StmtId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Operand: a local or a literal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Immediate {
    Local(LocalId),
    Const(Constant),
}

impl Immediate {
    pub fn as_local(&self) -> Option<LocalId> {
        match self {
            Immediate::Local(l) => Some(*l),
            Immediate::Const(_) => None,
        }
    }

    pub fn as_const(&self) -> Option<&Constant> {
        match self {
            Immediate::Const(c) => Some(c),
            Immediate::Local(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    Ushr,
    Cmp,
    Cmpl,
    Cmpg,
}

impl BinOp {
    pub fn from_symbol(s: &str) -> Option<BinOp> {
        Some(match s {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "%" => BinOp::Rem,
            "&" => BinOp::And,
            "|" => BinOp::Or,
            "^" => BinOp::Xor,
            "<<" => BinOp::Shl,
            ">>" => BinOp::Shr,
            ">>>" => BinOp::Ushr,
            "cmp" => BinOp::Cmp,
            "cmpl" => BinOp::Cmpl,
            "cmpg" => BinOp::Cmpg,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::And => "&",
            BinOp::Or => "|",
            BinOp::Xor => "^",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::Ushr => ">>>",
            BinOp::Cmp => "cmp",
            BinOp::Cmpl => "cmpl",
            BinOp::Cmpg => "cmpg",
        }
    }
}

/// Comparison operator of a conditional branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CondOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CondOp {
    pub fn from_symbol(s: &str) -> Option<CondOp> {
        Some(match s {
            "==" => CondOp::Eq,
            "!=" => CondOp::Ne,
            "<" => CondOp::Lt,
            "<=" => CondOp::Le,
            ">" => CondOp::Gt,
            ">=" => CondOp::Ge,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            CondOp::Eq => "==",
            CondOp::Ne => "!=",
            CondOp::Lt => "<",
            CondOp::Le => "<=",
            CondOp::Gt => ">",
            CondOp::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub op: CondOp,
    pub lhs: Immediate,
    pub rhs: Immediate,
}

/// `<Class: type name>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldRef {
    pub class: String,
    pub ty: Type,
    pub name: String,
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}: {} {}>", self.class, self.ty, self.name)
    }
}

/// `<Class: ret name(params)>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodRef {
    pub class: String,
    pub name: String,
    pub params: Vec<Type>,
    pub ret: Type,
}

impl MethodRef {
    /// Name plus JVM descriptor, e.g. `add(II)I`
    pub fn sub_signature(&self) -> String {
        sub_signature(&self.name, &self.params, &self.ret)
    }

    pub fn is_constructor(&self) -> bool {
        self.name == "<init>"
    }

    pub fn is_static_initializer(&self) -> bool {
        self.name == "<clinit>"
    }
}

impl fmt::Display for MethodRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
        write!(
            f,
            "<{}: {} {}({})>",
            self.class,
            self.ret,
            self.name,
            params.join(",")
        )
    }
}

/// Name plus JVM method descriptor
pub fn sub_signature(name: &str, params: &[Type], ret: &Type) -> String {
    let desc: String = params.iter().map(Type::descriptor).collect();
    format!("{}({}){}", name, desc, ret.descriptor())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvokeKind {
    Static,
    Virtual,
    Special,
    Interface,
}

impl InvokeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            InvokeKind::Static => "staticinvoke",
            InvokeKind::Virtual => "virtualinvoke",
            InvokeKind::Special => "specialinvoke",
            InvokeKind::Interface => "interfaceinvoke",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeExpr {
    pub kind: InvokeKind,
    /// Receiver local; `None` for static calls
    pub receiver: Option<LocalId>,
    pub method: MethodRef,
    pub args: Vec<Immediate>,
}

/// Right-hand side of an assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Rvalue {
    Use(Immediate),
    Binary {
        op: BinOp,
        lhs: Immediate,
        rhs: Immediate,
    },
    Neg(Immediate),
    Cast {
        ty: Type,
        value: Immediate,
    },
    Length(Immediate),
    ArrayRead {
        base: Immediate,
        index: Immediate,
    },
    InstanceField {
        base: LocalId,
        field: FieldRef,
    },
    StaticField(FieldRef),
    New(String),
    NewArray {
        elem: Type,
        size: Immediate,
    },
    NewMultiArray {
        elem: Type,
        sizes: Vec<Immediate>,
    },
    Invoke(InvokeExpr),
}

/// Left-hand side of an assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Place {
    Local(LocalId),
    ArrayElem { base: Immediate, index: Immediate },
    InstanceField { base: LocalId, field: FieldRef },
    StaticField(FieldRef),
}

/// Source of an identity statement (`l := @this`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IdentitySource {
    This,
    Parameter(u32),
    CaughtException,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Identity {
        local: LocalId,
        source: IdentitySource,
    },
    Assign {
        place: Place,
        value: Rvalue,
    },
    Invoke(InvokeExpr),
    If {
        cond: Condition,
        target: StmtId,
    },
    Goto(StmtId),
    Return(Option<Immediate>),
    Throw(Immediate),
    Nop,
}

/// Kind of an array element access
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccessKind {
    Read,
    Write,
}

impl Stmt {
    /// Local assigned by this statement, if any
    pub fn def_local(&self) -> Option<LocalId> {
        match self {
            Stmt::Identity { local, .. } => Some(*local),
            Stmt::Assign {
                place: Place::Local(l),
                ..
            } => Some(*l),
            _ => None,
        }
    }

    /// Locals read by this statement (including array bases, field bases and receivers)
    pub fn used_locals(&self) -> Vec<LocalId> {
        let mut out = Vec::new();
        match self {
            Stmt::Identity { .. } | Stmt::Goto(_) | Stmt::Nop | Stmt::Return(None) => {}
            Stmt::Assign { place, value } => {
                match place {
                    Place::Local(_) | Place::StaticField(_) => {}
                    Place::ArrayElem { base, index } => {
                        push_imm(&mut out, base);
                        push_imm(&mut out, index);
                    }
                    Place::InstanceField { base, .. } => out.push(*base),
                }
                rvalue_locals(value, &mut out);
            }
            Stmt::Invoke(inv) => invoke_locals(inv, &mut out),
            Stmt::If { cond, .. } => {
                push_imm(&mut out, &cond.lhs);
                push_imm(&mut out, &cond.rhs);
            }
            Stmt::Return(Some(v)) | Stmt::Throw(v) => push_imm(&mut out, v),
        }
        out.dedup();
        out
    }

    /// Invocation performed by this statement, if any
    pub fn invoke(&self) -> Option<&InvokeExpr> {
        match self {
            Stmt::Invoke(inv) => Some(inv),
            Stmt::Assign {
                value: Rvalue::Invoke(inv),
                ..
            } => Some(inv),
            _ => None,
        }
    }

    /// Array element access performed by this statement: (base, index, kind)
    pub fn array_access(&self) -> Option<(&Immediate, &Immediate, AccessKind)> {
        match self {
            Stmt::Assign {
                place: Place::ArrayElem { base, index },
                ..
            } => Some((base, index, AccessKind::Write)),
            Stmt::Assign {
                value: Rvalue::ArrayRead { base, index },
                ..
            } => Some((base, index, AccessKind::Read)),
            _ => None,
        }
    }

    /// Branch target of `if`/`goto`
    pub fn branch_target(&self) -> Option<StmtId> {
        match self {
            Stmt::If { target, .. } => Some(*target),
            Stmt::Goto(target) => Some(*target),
            _ => None,
        }
    }

    /// Whether control can fall through to the next statement
    pub fn falls_through(&self) -> bool {
        !matches!(self, Stmt::Goto(_) | Stmt::Return(_) | Stmt::Throw(_))
    }
}

fn push_imm(out: &mut Vec<LocalId>, imm: &Immediate) {
    if let Immediate::Local(l) = imm {
        out.push(*l);
    }
}

fn invoke_locals(inv: &InvokeExpr, out: &mut Vec<LocalId>) {
    if let Some(r) = inv.receiver {
        out.push(r);
    }
    for arg in &inv.args {
        push_imm(out, arg);
    }
}

fn rvalue_locals(value: &Rvalue, out: &mut Vec<LocalId>) {
    match value {
        Rvalue::Use(v) | Rvalue::Neg(v) | Rvalue::Length(v) => push_imm(out, v),
        Rvalue::Cast { value, .. } => push_imm(out, value),
        Rvalue::Binary { lhs, rhs, .. } => {
            push_imm(out, lhs);
            push_imm(out, rhs);
        }
        Rvalue::ArrayRead { base, index } => {
            push_imm(out, base);
            push_imm(out, index);
        }
        Rvalue::InstanceField { base, .. } => out.push(*base),
        Rvalue::StaticField(_) | Rvalue::New(_) => {}
        Rvalue::NewArray { size, .. } => push_imm(out, size),
        Rvalue::NewMultiArray { sizes, .. } => {
            for s in sizes {
                push_imm(out, s);
            }
        }
        Rvalue::Invoke(inv) => invoke_locals(inv, out),
    }
}
