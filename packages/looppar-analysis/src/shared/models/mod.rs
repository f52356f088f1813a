//! Subject-program IR
//!
//! A three-address, Jimple-like model standing in for the front end's output.

pub mod natural_loop;
pub mod program;
pub mod stmt;
pub mod types;

pub use natural_loop::NaturalLoop;
pub use program::{Class, Field, Local, Method, Program};
pub use stmt::{
    sub_signature, AccessKind, BinOp, CondOp, Condition, FieldRef, IdentitySource, Immediate,
    InvokeExpr, InvokeKind, LocalId, MethodId, MethodRef, Place, Rvalue, Stmt, StmtId,
};
pub use types::{Constant, Type};
